//! # Portal CLI (`portal`)
//!
//! A thin terminal driver over the Portal Client data layer. It exists to
//! exercise the library end to end: list a collection page by page, fetch a
//! single record by id, or resolve an arbitrary API URL.
//!
//! ## Usage
//!
//! ```bash
//! portal <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `portal list <endpoint>` | Page through a collection, printing rows as pages land |
//! | `portal get <endpoint> <id>` | Fetch one record by id |
//! | `portal resolve <url>` | Parse an API URL and fetch whatever it points at |
//!
//! ## Examples
//!
//! ```bash
//! # First three pages of characters filtered by name
//! portal list character --pages 3 --filter name=rick
//!
//! # One episode by id
//! portal get episode 28
//!
//! # Follow a cross-reference URL from a record
//! portal resolve https://rickandmortyapi.com/api/location/3
//! ```

use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use portal_client::config::{load_config, Config};
use portal_client::controller::{ListController, ListEvents};
use portal_client::endpoint::Endpoint;
use portal_client::mapper::{CharacterRow, EpisodeRow, LocationRow, RecordMapper};
use portal_client::request::ApiRequest;
use portal_client::service::ApiService;

/// Portal CLI — browse the Rick and Morty API from the terminal.
#[derive(Parser)]
#[command(
    name = "portal",
    about = "Browse the Rick and Morty API from the terminal",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults apply when
    /// omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Page through a collection.
    ///
    /// Fetches the first page, then follows the `next` cursor until the
    /// requested page count is reached or the collection runs out.
    List {
        /// Collection to list: `character`, `location`, or `episode`.
        endpoint: String,

        /// Number of pages to follow. Defaults to `cli.page_limit` from
        /// the config.
        #[arg(long)]
        pages: Option<usize>,

        /// List filter as `key=value` (e.g. `name=rick`, `status=alive`).
        /// May be repeated; order is preserved.
        #[arg(long = "filter")]
        filters: Vec<String>,
    },

    /// Fetch a single record by id.
    Get {
        /// Collection the record belongs to.
        endpoint: String,

        /// Numeric record id.
        id: u64,
    },

    /// Parse an API URL and fetch whatever it points at.
    ///
    /// Accepts any URL the API hands back — a page cursor or a record's
    /// cross-reference — and pretty-prints the response JSON. URLs outside
    /// the API base are rejected without a network call.
    Resolve {
        /// Absolute API URL.
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let service = Arc::new(ApiService::new(config.request.timeout())?);

    match cli.command {
        Commands::List {
            endpoint,
            pages,
            filters,
        } => {
            let endpoint = parse_endpoint(&endpoint)?;
            let query = parse_filters(&filters)?;
            let pages = pages.unwrap_or(config.cli.page_limit);
            run_list(endpoint, query, pages, service).await
        }
        Commands::Get { endpoint, id } => {
            let endpoint = parse_endpoint(&endpoint)?;
            run_get(endpoint, id, &service).await
        }
        Commands::Resolve { url } => run_resolve(&url, &service).await,
    }
}

fn parse_endpoint(token: &str) -> Result<Endpoint> {
    token
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown endpoint: '{}'. Available: character, location, episode", token))
}

fn parse_filters(filters: &[String]) -> Result<Vec<(String, String)>> {
    filters
        .iter()
        .map(|f| {
            f.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("Filter '{}' is not of the form key=value", f))
        })
        .collect()
}

/// One printable line per view-model row.
trait Row {
    fn line(&self) -> String;
}

impl Row for CharacterRow {
    fn line(&self) -> String {
        format!("{:>4}  {}  ({})", self.id, self.name, self.status_line)
    }
}

impl Row for LocationRow {
    fn line(&self) -> String {
        format!(
            "{:>4}  {}  ({}, {} residents)",
            self.id, self.name, self.summary, self.resident_count
        )
    }
}

impl Row for EpisodeRow {
    fn line(&self) -> String {
        format!("{:>4}  {}  ({})", self.id, self.name, self.subtitle)
    }
}

/// Collaborator that narrates pagination progress.
struct PrintEvents;

impl ListEvents for PrintEvents {
    fn initial_data_ready(&self) {
        println!("first page loaded");
    }
    fn items_inserted(&self, range: Range<usize>) {
        println!("appended rows {}..{}", range.start, range.end);
    }
}

async fn run_list(
    endpoint: Endpoint,
    query: Vec<(String, String)>,
    pages: usize,
    service: Arc<ApiService>,
) -> Result<()> {
    match endpoint {
        Endpoint::Character => {
            let controller = ListController::characters(service).with_query(query);
            drive_list(controller, pages).await
        }
        Endpoint::Location => {
            let controller = ListController::locations(service).with_query(query);
            drive_list(controller, pages).await
        }
        Endpoint::Episode => {
            let controller = ListController::episodes(service).with_query(query);
            drive_list(controller, pages).await
        }
    }
}

async fn drive_list<M>(controller: ListController<M>, pages: usize) -> Result<()>
where
    M: RecordMapper,
    M::ViewModel: Row,
{
    let events: Arc<dyn ListEvents> = Arc::new(PrintEvents);
    controller.set_events(&events);

    controller.fetch_first().await;
    if controller.is_empty() {
        bail!("No data — first page fetch failed or returned nothing");
    }

    let mut fetched = 1;
    while fetched < pages && controller.has_next_page() {
        controller.fetch_more(None).await;
        fetched += 1;
    }

    for row in controller.view_models() {
        println!("{}", row.line());
    }
    println!("{} items over {} page(s)", controller.len(), fetched);
    Ok(())
}

async fn run_get(endpoint: Endpoint, id: u64, service: &ApiService) -> Result<()> {
    let request = ApiRequest::record(endpoint, id);
    let record: serde_json::Value = service
        .execute(&request)
        .await
        .with_context(|| format!("Failed to fetch {} {}", endpoint, id))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn run_resolve(url: &str, service: &ApiService) -> Result<()> {
    if ApiRequest::parse(url).is_none() {
        bail!("Not a recognized API URL: {}", url);
    }
    let body: serde_json::Value = service
        .execute_url(url)
        .await
        .with_context(|| format!("Failed to resolve {}", url))?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
