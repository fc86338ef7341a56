use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use metro_planner::console::{
    DEFAULTS_NOTICE, DESTINATION_PROMPT, ORIGIN_PROMPT, format_outcome, is_exit, parse_request,
};
use metro_planner::directory::{
    CachingDirectory, DirectoryCache, DirectoryCacheConfig, DirectoryError, DirectoryProvider,
    StaticDirectory,
};
use metro_planner::planner::{DEFAULT_MAX_STEPS, PlanError, Planner, PlannerConfig};
use metro_planner::wmata::{WmataClient, WmataConfig};

/// Pause between request phases against the live API.
const LIVE_RATE_LIMIT_MS: u64 = 1000;

/// Interactive metro route planner
#[derive(Parser, Debug)]
#[command(name = "metro-planner")]
#[command(version)]
#[command(about = "Find a route between two metro stations")]
#[command(long_about = "Prompts for an origin and a destination station code and prints the
stations to pass through.

  metro-planner -k <API key>                        # live WMATA data
  metro-planner --fixture data/sample_network.json  # offline network

Logging goes to stderr and is controlled with RUST_LOG.")]
struct Cli {
    /// WMATA API key
    #[arg(short = 'k', long, env = "WMATA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the WMATA API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Plan against a JSON network fixture instead of the live API
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Keep line and station listings in this file between runs
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Maximum expansion steps per search
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Pause between request phases, in milliseconds (default 1000 live, 0 offline)
    #[arg(long)]
    rate_limit_ms: Option<u64>,
}

impl Cli {
    fn planner_config(&self) -> PlannerConfig {
        let default_ms = if self.fixture.is_some() {
            0
        } else {
            LIVE_RATE_LIMIT_MS
        };
        let delay = Duration::from_millis(self.rate_limit_ms.unwrap_or(default_ms));
        PlannerConfig::new(self.max_steps, delay)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Print a prompt and read one line. `None` at end of input.
fn prompt(text: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

async fn run<P: DirectoryProvider>(mut planner: Planner<P>) -> io::Result<()> {
    loop {
        let Some(origin) = prompt(ORIGIN_PROMPT)? else {
            return Ok(());
        };
        if is_exit(&origin) {
            return Ok(());
        }
        let Some(destination) = prompt(DESTINATION_PROMPT)? else {
            return Ok(());
        };

        let request = parse_request(&origin, &destination);
        if request.defaulted {
            println!("{DEFAULTS_NOTICE}");
        }

        match planner.plan(&request.origin, &request.destination).await {
            Ok(outcome) => print!("{}", format_outcome(&outcome)),
            Err(e) => {
                error!(error = %e, "route planning failed");
                eprintln!("Error: {e}");
                if let PlanError::Directory(DirectoryError::Remote(remote)) = &e
                    && remote.is_transient()
                {
                    eprintln!("The WMATA service may recover; try the request again later.");
                }
                if e.is_consistency_error() {
                    warn!("directory data inconsistent, refetching on next request");
                    planner.invalidate();
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = cli.planner_config();

    let result = if let Some(path) = &cli.fixture {
        let provider = match StaticDirectory::from_json_file(path) {
            Ok(provider) => provider,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        };
        info!(fixture = %path.display(), "using offline network");
        run(Planner::new(provider, config)).await
    } else {
        let Some(api_key) = &cli.api_key else {
            eprintln!("Error: an API key is required (-k <key> or WMATA_API_KEY), or use --fixture");
            return ExitCode::from(2);
        };

        let mut wmata_config = WmataConfig::new(api_key);
        if let Some(url) = &cli.base_url {
            wmata_config = wmata_config.with_base_url(url);
        }
        let client = match WmataClient::new(wmata_config) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("Error: failed to create WMATA client: {e}");
                return ExitCode::FAILURE;
            }
        };

        match &cli.cache {
            Some(path) => {
                let cache = DirectoryCache::new(DirectoryCacheConfig::new(path));
                info!(cache = %path.display(), "caching directory listings");
                run(Planner::new(CachingDirectory::new(client, cache), config)).await
            }
            None => run(Planner::new(client, config)).await,
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
