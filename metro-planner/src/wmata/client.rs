//! WMATA Rail Station Information HTTP client.
//!
//! Implements [`DirectoryProvider`] on top of the `jLines`, `jStations`,
//! `jSrcStationToDstStationInfo` and `jPath` endpoints. Requests are made
//! one at a time; rate limiting between phases is the planner's job.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::directory::{DirectoryError, DirectoryProvider, LineRecord, StationRecord};
use crate::domain::{LineCode, StationCode};

use super::convert::{
    convert_average_speed, convert_distances, convert_lines, convert_path, convert_stations,
};
use super::error::WmataError;
use super::types::{LinesResponse, PathResponse, StationToStationResponse, StationsResponse};

/// Default base URL for the WMATA rail API.
const DEFAULT_BASE_URL: &str = "https://api.wmata.com/Rail.svc/json";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the WMATA client.
#[derive(Debug, Clone)]
pub struct WmataConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API (defaults to production WMATA)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WmataConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// WMATA rail API client.
#[derive(Debug, Clone)]
pub struct WmataClient {
    http: reqwest::Client,
    base_url: String,
}

impl WmataClient {
    /// Create a new WMATA client with the given configuration.
    pub fn new(config: WmataConfig) -> Result<Self, WmataError> {
        let mut headers = HeaderMap::new();

        // WMATA accepts the key as an "api_key" header
        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(WmataError::InvalidApiKey)?;
        headers.insert(HeaderName::from_static("api_key"), api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{base_url}/{endpoint}` and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, WmataError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        trace!(%url, ?query, "WMATA request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WmataError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WmataError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WmataError::Status {
                endpoint,
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|source| WmataError::Json {
            endpoint,
            source,
            excerpt: body.chars().take(500).collect(),
        })
    }

    /// Fetch all lines.
    pub async fn get_lines(&self) -> Result<Vec<LineRecord>, WmataError> {
        let response: LinesResponse = self.get_json("jLines", &[]).await?;
        Ok(convert_lines(&response))
    }

    /// Fetch all station platforms.
    pub async fn get_stations(&self) -> Result<Vec<StationRecord>, WmataError> {
        let response: StationsResponse = self.get_json("jStations", &[]).await?;
        Ok(convert_stations(&response))
    }

    /// Fetch the average speed between two stations, in mph.
    pub async fn get_average_speed(
        &self,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Option<f64>, WmataError> {
        let response: StationToStationResponse = self
            .get_json(
                "jSrcStationToDstStationInfo",
                &[
                    ("FromStationCode", start.as_str()),
                    ("ToStationCode", end.as_str()),
                ],
            )
            .await?;
        convert_average_speed(&response).map_err(|source| WmataError::Conversion {
            endpoint: "jSrcStationToDstStationInfo",
            source,
        })
    }

    /// Fetch the ordered station codes between two stations.
    pub async fn get_path(
        &self,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Vec<StationCode>, WmataError> {
        let response: PathResponse = self
            .get_json(
                "jPath",
                &[
                    ("FromStationCode", start.as_str()),
                    ("ToStationCode", end.as_str()),
                ],
            )
            .await?;
        convert_path(&response).map_err(|source| WmataError::Conversion {
            endpoint: "jPath",
            source,
        })
    }

    /// Fetch the track distance from every station to `destination`.
    pub async fn get_distances_to(
        &self,
        destination: &StationCode,
    ) -> Result<HashMap<StationCode, f64>, WmataError> {
        let response: StationToStationResponse = self
            .get_json(
                "jSrcStationToDstStationInfo",
                &[("ToStationCode", destination.as_str())],
            )
            .await?;
        Ok(convert_distances(&response, destination))
    }
}

impl DirectoryProvider for WmataClient {
    async fn list_lines(&self) -> Result<Vec<LineRecord>, DirectoryError> {
        Ok(self.get_lines().await?)
    }

    async fn list_stations(&self) -> Result<Vec<StationRecord>, DirectoryError> {
        Ok(self.get_stations().await?)
    }

    async fn average_speed(
        &self,
        _line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Option<f64>, DirectoryError> {
        Ok(self.get_average_speed(start, end).await?)
    }

    async fn ordered_stations(
        &self,
        _line: &LineCode,
        start: &StationCode,
        end: &StationCode,
    ) -> Result<Vec<StationCode>, DirectoryError> {
        Ok(self.get_path(start, end).await?)
    }

    async fn distances_to(
        &self,
        destination: &StationCode,
    ) -> Result<HashMap<StationCode, f64>, DirectoryError> {
        Ok(self.get_distances_to(destination).await?)
    }
}
