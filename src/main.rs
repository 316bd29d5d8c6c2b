mod pipeline;
mod prompt;
mod query;
mod recipe;
mod spoonacular;
mod store;

pub const USER_AGENT: &str = concat!("dinedecide/", env!("CARGO_PKG_VERSION"));

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::{error, info, warn};

use prompt::{Prefilled, Prompter};
use query::SearchMode;
use spoonacular::SpoonacularClient;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default per-request timeout, overridable with `DINEDECIDE_TIMEOUT_SECS`.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Search Spoonacular for recipes and merge their full details into a local JSON file.
///
/// Search criteria not given as flags are asked for interactively.
/// Requires `SPOONACULAR_API_KEY`.
#[derive(Parser, Debug)]
#[command(name = "dinedecide", version, about)]
struct Cli {
    /// JSON file to merge results into
    #[arg(long, default_value = "output.json")]
    output: PathBuf,

    /// Search type: 1/name, 2/cuisine, 3/diet, 4/intolerances
    #[arg(long, value_parser = SearchMode::from_selector)]
    mode: Option<SearchMode>,

    /// Search value for the chosen type (e.g. "pasta", "Indian", "vegan", "gluten")
    #[arg(long)]
    value: Option<String>,

    /// Number of recipes to fetch
    #[arg(long)]
    number: Option<u32>,

    /// Offset into the search results
    #[arg(long)]
    offset: Option<u32>,
}

impl Cli {
    fn prefilled(&self) -> Prefilled {
        Prefilled {
            mode: self.mode,
            value: self.value.clone(),
            number: self.number,
            offset: self.offset,
        }
    }
}

fn http_timeout() -> Duration {
    match env::var("DINEDECIDE_TIMEOUT_SECS") {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(value = %raw, "ignoring invalid DINEDECIDE_TIMEOUT_SECS");
                DEFAULT_HTTP_TIMEOUT
            }
        },
        Err(_) => DEFAULT_HTTP_TIMEOUT,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dinedecide=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(http_timeout())
        .build()?;
    let client = match SpoonacularClient::from_env(http) {
        Ok(client) => client,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let query = match Prompter::new(io::stdin().lock(), io::stdout()).read_query(cli.prefilled()) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    match pipeline::run(&client, &query, &cli.output).await {
        Ok(summary) => {
            info!(found = summary.found, "run complete");
            println!(
                "Fetched {} recipes ({} new, {} updated)",
                summary.found, summary.added, summary.replaced
            );
            println!(
                "Saved {} total recipes into {}",
                summary.total,
                summary.path.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "run aborted, output left unchanged");
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_prefill_the_query() {
        let cli = Cli::try_parse_from([
            "dinedecide",
            "--mode",
            "diet",
            "--value",
            "vegan",
            "--number",
            "3",
        ])
        .unwrap();
        let prefilled = cli.prefilled();
        assert_eq!(prefilled.mode, Some(SearchMode::Diet));
        assert_eq!(prefilled.value.as_deref(), Some("vegan"));
        assert_eq!(prefilled.number, Some(3));
        assert_eq!(prefilled.offset, None);
        assert_eq!(cli.output, PathBuf::from("output.json"));
    }

    #[test]
    fn unknown_mode_flag_is_rejected() {
        assert!(Cli::try_parse_from(["dinedecide", "--mode", "7"]).is_err());
    }
}
