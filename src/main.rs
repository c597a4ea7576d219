use anyhow::Result;
use clap::Parser;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use grapi_fetcher::{Config, EnvApiKeyProvider, ExtractorApi, ExtractorClient, FetchDataResponse, FetchError};

/// Fetch yearly category data from the grapi extractor
#[derive(Parser)]
#[command(name = "grapi-fetch")]
#[command(version)]
#[command(about = "Fetch yearly category data from the grapi extractor backend")]
#[command(long_about = "
Fetches one or more years concurrently and prints one JSON object per year.
The API key is read from NEXT_PUBLIC_API_KEY (a .env file is honoured).

Examples:
  grapi-fetch 2023
  grapi-fetch --summary 2021 2022 2023
  grapi-fetch --base-url http://localhost:8000 --timeout-ms 5000 2020
")]
struct Args {
    /// Years to fetch
    #[arg(required = true)]
    years: Vec<String>,

    /// Override the backend base URL (default: GRAPI_BASE_URL or the production backend)
    #[arg(long)]
    base_url: Option<String>,

    /// Override the request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print record counts per category instead of the records
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grapi_fetcher=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(ms) = args.timeout_ms {
        config.timeout = Duration::from_millis(ms);
    }

    let client = ExtractorClient::new(&config, EnvApiKeyProvider)?;
    let results = fetch_years(&client, &args.years).await;

    let mut failures = 0;
    for (year, result) in args.years.iter().zip(&results) {
        if result.is_err() {
            failures += 1;
        }
        println!("{}", serde_json::to_string_pretty(&render(year, result, args.summary))?);
    }

    if failures > 0 {
        eprintln!("❌ {} of {} years failed", failures, args.years.len());
        std::process::exit(1);
    }

    Ok(())
}

async fn fetch_years<A: ExtractorApi + Sync>(
    api: &A,
    years: &[String],
) -> Vec<Result<FetchDataResponse, FetchError>> {
    join_all(years.iter().map(|year| api.fetch_data(year))).await
}

/// One line of output per requested year
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum YearReport<'a> {
    Data {
        year: &'a str,
        status: u16,
        data: &'a Map<String, Value>,
    },
    Summary {
        year: &'a str,
        status: u16,
        categories: BTreeMap<&'a str, usize>,
    },
    Failed {
        year: &'a str,
        kind: String,
        error: String,
    },
}

fn render<'a>(
    year: &'a str,
    result: &'a Result<FetchDataResponse, FetchError>,
    summary: bool,
) -> YearReport<'a> {
    match result {
        Ok(response) if summary => YearReport::Summary {
            year,
            status: response.status,
            categories: response.record_counts().into_iter().collect(),
        },
        Ok(response) => YearReport::Data {
            year,
            status: response.status,
            data: &response.data,
        },
        Err(err) => YearReport::Failed {
            year,
            kind: err.kind().to_string(),
            error: err.to_string(),
        },
    }
}
