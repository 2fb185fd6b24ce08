//! Command-line front end for the searchsync clients.
//!
//! Parsing and command execution live here so they can be driven from
//! tests; `main.rs` only installs logging and hands over stdout.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use searchsync_cloud::{
    CloudSearchConfig, DEFAULT_API_VERSION, DEFAULT_PAGE_SIZE, DEFAULT_REGION,
    DocumentBatchClient, Mode, QueryType, Rank, RankDirection, ResultSet, SearchClient,
    SearchOptions,
};
use searchsync_types::{FieldPayload, FieldValue, SyncOperation};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "searchsync")]
#[command(about = "Search and update a hosted search domain")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Search domain name
    #[arg(long, global = true, env = "CLOUDSEARCH_DOMAIN", default_value = "")]
    pub domain: String,

    /// Service region
    #[arg(long, global = true, env = "CLOUDSEARCH_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// API version path segment
    #[arg(long, global = true, env = "CLOUDSEARCH_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Base URL replacing both service hosts
    #[arg(long, global = true, env = "CLOUDSEARCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Skip all network calls
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Builds and validates the client config.
    pub fn config(&self) -> Result<CloudSearchConfig> {
        let mut config = CloudSearchConfig::new(self.domain.clone())
            .with_region(self.region.clone())
            .with_api_version(self.api_version.clone());
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if self.sandbox {
            config = config.with_mode(Mode::Sandbox);
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a search and print the hits
    Search(SearchArgs),

    /// Add or replace one document
    Add {
        /// Document id
        id: String,

        /// Field value as name=value; repeatable
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, FieldValue)>,
    },

    /// Remove documents by id
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Submit a JSON array of operations as one batch
    Batch {
        file: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search term, or a boolean expression with --boolean
    pub term: String,

    /// Treat the term as a boolean query
    #[arg(long)]
    pub boolean: bool,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Field to rank by
    #[arg(long)]
    pub rank: Option<String>,

    /// Rank descending
    #[arg(long, requires = "rank")]
    pub desc: bool,

    /// Comma-separated fields to return with each hit
    #[arg(long, value_delimiter = ',')]
    pub return_fields: Vec<String>,

    /// Extra boolean filter layered on a term query
    #[arg(long)]
    pub bq: Option<String>,

    /// Fetch every page instead of one
    #[arg(long)]
    pub all: bool,
}

impl SearchArgs {
    pub fn options(&self) -> SearchOptions {
        let mut options = SearchOptions::default().page_size(self.page_size);
        if self.boolean {
            options = options.query_type(QueryType::Boolean);
        }
        if let Some(page) = self.page {
            options = options.page(page);
        }
        if let Some(field) = &self.rank {
            let direction = if self.desc {
                RankDirection::Desc
            } else {
                RankDirection::Asc
            };
            options = options.rank((field.as_str(), direction));
        }
        if !self.return_fields.is_empty() {
            options = options.return_fields(self.return_fields.iter().cloned());
        }
        if let Some(bq) = &self.bq {
            options = options.boolean_query(bq.clone());
        }
        options
    }
}

/// Parses `name=value`. Values that read as integers are sent as integers,
/// everything else as text. An empty value is kept and dropped on add.
pub fn parse_field(raw: &str) -> Result<(String, FieldValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }
    let value = match value.parse::<i64>() {
        Ok(n) => FieldValue::Integer(n),
        Err(_) => FieldValue::Text(value.to_string()),
    };
    Ok((name.to_string(), value))
}

/// Reads a batch file: a JSON array of add/delete operations.
pub fn load_batch(path: &Path) -> Result<Vec<SyncOperation>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let ops = SyncOperation::decode_batch(&json)
        .with_context(|| format!("{} is not a valid operation batch", path.display()))?;
    Ok(ops)
}

/// Executes the parsed command, writing results to `out`.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = cli.global.config()?;

    match cli.command {
        Command::Search(args) => {
            let client = SearchClient::new(config)?;
            search(&client, &args, out).await
        }
        Command::Add { id, fields } => {
            let client = DocumentBatchClient::new(config)?;
            let payload: FieldPayload = fields.into_iter().collect();
            client.add(id.as_str(), payload).await?;
            writeln!(out, "added {id}")?;
            Ok(())
        }
        Command::Remove { ids } => {
            let client = DocumentBatchClient::new(config)?;
            let ops: Vec<SyncOperation> =
                ids.iter().map(|id| SyncOperation::delete(id.as_str())).collect();
            client.submit(&ops).await?;
            writeln!(out, "removed {}", ids.len())?;
            Ok(())
        }
        Command::Batch { file } => {
            let ops = load_batch(&file)?;
            if ops.is_empty() {
                bail!("{} contains no operations", file.display());
            }
            let client = DocumentBatchClient::new(config)?;
            client.submit(&ops).await?;
            info!(count = ops.len(), file = %file.display(), "batch submitted");
            writeln!(out, "submitted {} operations", ops.len())?;
            Ok(())
        }
    }
}

async fn search(client: &SearchClient, args: &SearchArgs, out: &mut impl Write) -> Result<()> {
    let options = args.options();

    if !args.all {
        let results = client.search(args.term.as_str(), &options).await?;
        print_page(&results, out)?;
        return Ok(());
    }

    let mut pages = client.pages(args.term.as_str(), options);
    while let Some(page) = pages.next_page().await? {
        print_page(&page, out)?;
    }
    Ok(())
}

fn print_page(results: &ResultSet, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "# page {} of {} ({} found)",
        results.current_page(),
        results.total_pages(),
        results.total_entries()
    )?;
    for hit in results {
        if hit.data.is_empty() {
            writeln!(out, "{}", hit.id)?;
        } else {
            writeln!(out, "{}\t{}", hit.id, serde_json::to_string(&hit.data)?)?;
        }
    }
    Ok(())
}
