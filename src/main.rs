//! addrtree CLI - build and query address trees from the command line
//!
//! Reads newline-separated address lists into a persisted nybble trie and
//! answers membership, prefix count and prefix listing queries against it.

use addrtree::input::read_addresses_from_path;
use addrtree::store::read_header;
use addrtree::{AddressTree, Config, Family, NybbleCodec, Prefix};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "addrtree")]
#[command(about = "A nybble trie for large IP address sets")]
#[command(version)]
struct Cli {
    /// Path to the tree snapshot (defaults to the configured tree_path)
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.config/addrtree/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat addresses as IPv4
    #[arg(short = '4', long, conflicts_with = "ipv6")]
    ipv4: bool,

    /// Treat addresses as IPv6
    #[arg(short = '6', long)]
    ipv6: bool,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Insertions between progress messages (0 disables them)
    #[arg(long)]
    progress_interval: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a new tree from an address list, replacing any existing one
    Build {
        /// File with one address per line
        input: PathBuf,
    },

    /// Add addresses from a list to the tree (created if missing)
    Add {
        /// File with one address per line
        input: PathBuf,
    },

    /// Check whether an address is in the tree
    Contains {
        /// The address to look up
        address: String,
    },

    /// Count addresses inside a prefix
    Count {
        /// Nybble-aligned prefix, e.g. 2001:db8::/32
        prefix: String,
    },

    /// List addresses, optionally restricted to a prefix
    List {
        /// Nybble-aligned prefix, e.g. 2001:db8::/32
        prefix: Option<String>,
        /// Maximum number of addresses to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show tree statistics
    Stats,

    /// Verify the tree's structure and counters
    Check,

    /// Show the effective configuration
    Config {
        /// Save the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let tree_path = cli.tree.clone().unwrap_or_else(|| config.tree_path.clone());
    let progress_interval = cli.progress_interval.unwrap_or(config.progress_interval);
    let family = resolve_family(&cli, &config, &tree_path);

    let ctx = RunContext {
        cli: &cli,
        config: &config,
        tree_path: &tree_path,
        progress_interval,
        family,
    };
    match family {
        Family::V4 => run::<Ipv4Addr>(&ctx),
        Family::V6 => run::<Ipv6Addr>(&ctx),
    }
}

struct RunContext<'a> {
    cli: &'a Cli,
    config: &'a Config,
    tree_path: &'a Path,
    progress_interval: usize,
    family: Family,
}

fn run<A>(ctx: &RunContext<'_>) -> anyhow::Result<()>
where
    A: NybbleCodec + FromStr + Display,
{
    let format = ctx.cli.format;

    match &ctx.cli.command {
        Commands::Build { input } => {
            let addresses: Vec<A> = read_addresses_from_path(input)
                .with_context(|| format!("Failed to read addresses from {}", input.display()))?;
            let mut tree = AddressTree::new();
            let summary = tree.insert_many(addresses, ctx.progress_interval);
            tree.save(ctx.tree_path)?;
            output(
                format,
                &serde_json::json!({
                    "status": "ok",
                    "path": ctx.tree_path.display().to_string(),
                    "family": ctx.family,
                    "added": summary.added,
                    "duplicates": summary.duplicates,
                    "total": tree.len()
                }),
            );
        }

        Commands::Add { input } => {
            let addresses: Vec<A> = read_addresses_from_path(input)
                .with_context(|| format!("Failed to read addresses from {}", input.display()))?;
            let mut tree = if ctx.tree_path.exists() {
                open_tree::<A>(ctx.tree_path)?
            } else {
                AddressTree::new()
            };
            let summary = tree.insert_many(addresses, ctx.progress_interval);
            tree.save(ctx.tree_path)?;
            output(
                format,
                &serde_json::json!({
                    "status": "ok",
                    "path": ctx.tree_path.display().to_string(),
                    "added": summary.added,
                    "duplicates": summary.duplicates,
                    "total": tree.len()
                }),
            );
        }

        Commands::Contains { address } => {
            let tree = open_tree::<A>(ctx.tree_path)?;
            let addr = address
                .parse::<A>()
                .map_err(|_| anyhow::anyhow!("Invalid {} address: {}", ctx.family, address))?;
            let present = tree.contains(&addr);
            output(
                format,
                &serde_json::json!({
                    "address": addr.to_string(),
                    "present": present
                }),
            );
            if !present {
                std::process::exit(1);
            }
        }

        Commands::Count { prefix } => {
            let tree = open_tree::<A>(ctx.tree_path)?;
            let prefix: Prefix<A> = prefix.parse()?;
            let count = tree.count_in_prefix(&prefix)?;
            output(
                format,
                &serde_json::json!({
                    "prefix": prefix.to_string(),
                    "count": count
                }),
            );
        }

        Commands::List { prefix, limit } => {
            let tree = open_tree::<A>(ctx.tree_path)?;
            let prefix = prefix.as_deref().map(str::parse::<Prefix<A>>).transpose()?;
            let mut iter = match &prefix {
                Some(prefix) => tree.iter_prefix(prefix)?,
                None => tree.iter(),
            };
            let addresses: Vec<String> = iter
                .by_ref()
                .take(limit.unwrap_or(usize::MAX))
                .map(|a| a.to_string())
                .collect();
            output(
                format,
                &serde_json::json!({
                    "prefix": prefix.map(|p| p.to_string()),
                    "count": addresses.len(),
                    "addresses": addresses,
                    "defects": iter.defects()
                }),
            );
        }

        Commands::Stats => {
            let tree = open_tree::<A>(ctx.tree_path)?;
            let header = read_header(ctx.tree_path)?;
            let stats = tree.stats();
            output(
                format,
                &serde_json::json!({
                    "path": ctx.tree_path.display().to_string(),
                    "family": header.family,
                    "checksum": header.checksum_hex(),
                    "addresses": stats.addresses,
                    "nodes": stats.nodes,
                    "terminals": stats.terminals,
                    "defects": stats.defects,
                    "nodes_per_depth": stats.nodes_per_depth,
                    "sharing_ratio": stats.sharing_ratio()
                }),
            );
        }

        Commands::Check => {
            let tree = open_tree::<A>(ctx.tree_path)?;
            match tree.verify() {
                Ok(()) => output(
                    format,
                    &serde_json::json!({
                        "status": "ok",
                        "addresses": tree.len()
                    }),
                ),
                Err(e) => {
                    output(
                        format,
                        &serde_json::json!({
                            "status": "error",
                            "message": e.to_string()
                        }),
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { write } => {
            let effective = Config {
                progress_interval: ctx.progress_interval,
                tree_path: ctx.tree_path.to_path_buf(),
                family: ctx.family,
            };
            let written = if *write {
                let path = match &ctx.cli.config {
                    Some(path) => path.clone(),
                    None => Config::default_path()?,
                };
                effective
                    .save_to(&path)
                    .with_context(|| format!("Failed to write config to {}", path.display()))?;
                tracing::info!(path = %path.display(), "Wrote config");
                Some(path.display().to_string())
            } else {
                None
            };
            output(
                format,
                &serde_json::json!({
                    "config": ctx.config,
                    "tree_path": ctx.tree_path.display().to_string(),
                    "family": ctx.family,
                    "progress_interval": ctx.progress_interval,
                    "written": written
                }),
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flags win, then the family recorded in an existing snapshot, then config
fn resolve_family(cli: &Cli, config: &Config, tree_path: &Path) -> Family {
    if cli.ipv4 {
        return Family::V4;
    }
    if cli.ipv6 {
        return Family::V6;
    }
    if tree_path.exists() {
        if let Ok(header) = read_header(tree_path) {
            return header.family;
        }
    }
    config.family
}

fn open_tree<A: NybbleCodec>(path: &Path) -> anyhow::Result<AddressTree<A>> {
    AddressTree::load(path)
        .with_context(|| format!("Failed to load address tree from {}", path.display()))
}

fn output(format: OutputFormat, value: &serde_json::Value) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to render output: {}", e),
    }
}
