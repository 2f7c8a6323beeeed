//! # Folio CLI (`folio`)
//!
//! Matches job-posting text against the portfolio catalog.
//!
//! ## Usage
//!
//! ```bash
//! folio --config ./config/folio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `folio keywords <text>` | Print the keywords extracted from a posting |
//! | `folio match <text>` | Print the best-matching catalog entries |
//! | `folio catalog` | List the loaded catalog |
//! | `folio serve` | Start the HTTP API |
//!
//! Text can also come from `--file <path>` or standard input.
//!
//! ## Examples
//!
//! ```bash
//! folio match "We need a Python/FastAPI backend engineer" --top-k 3
//! folio match --file posting.txt --links
//! curl -s https://jobs.example.com/123.txt | folio keywords --json
//! ```
//!
//! Logs go to stderr; `-v` raises verbosity and `RUST_LOG` overrides it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use folio::config::{load_config_or_default, Config};
use folio::matcher::{format_links, keyword_extractor, PortfolioMatcher};
use folio::server;

/// Folio — pick the portfolio projects worth citing for a job posting.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/folio.toml`. A missing file means built-in
    /// defaults; a malformed one is an error.
    #[arg(long, global = true, default_value = "./config/folio.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract keywords from a job posting.
    Keywords {
        /// Posting text. Read from --file or stdin when omitted.
        text: Option<String>,

        /// Read the posting from a file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print JSON instead of one keyword per line.
        #[arg(long)]
        json: bool,
    },

    /// Match a job posting against the catalog.
    Match {
        /// Posting text. Read from --file or stdin when omitted.
        text: Option<String>,

        /// Read the posting from a file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Number of matches to return (defaults to `[retrieval].top_k`).
        #[arg(long)]
        top_k: Option<usize>,

        /// Print the full match report as JSON.
        #[arg(long, conflicts_with = "links")]
        json: bool,

        /// Print matches as a Markdown link list.
        #[arg(long)]
        links: bool,
    },

    /// List the loaded catalog entries.
    Catalog {
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API on `[server].bind`.
    Serve,
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,folio=info,folio_core=info",
        1 => "info,folio=debug,folio_core=debug",
        2 => "debug,folio=trace,folio_core=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read posting: {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read posting from stdin")?;
    Ok(buf)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let cfg = load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Keywords { text, file, json } => {
            let text = read_input(text, file.as_deref())?;
            let keywords = keyword_extractor(&cfg.keywords).extract(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&keywords)?);
            } else {
                for keyword in &keywords {
                    println!("{}", keyword);
                }
            }
        }
        Commands::Match {
            text,
            file,
            top_k,
            json,
            links,
        } => {
            let text = read_input(text, file.as_deref())?;
            let (matcher, _) = PortfolioMatcher::open(&cfg);
            let report = matcher.match_text(&text, top_k);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if links {
                println!("{}", format_links(&report.matches));
            } else if report.matches.is_empty() {
                println!("No matching projects.");
            } else {
                for (i, m) in report.matches.iter().enumerate() {
                    println!(
                        "{}. [{:.3}] {} ({})",
                        i + 1,
                        m.score,
                        m.entry.title,
                        m.entry.link
                    );
                    if !m.entry.tech_stack.is_empty() {
                        println!("   stack: {}", m.entry.tech_stack);
                    }
                    if !m.entry.description.is_empty() {
                        println!("   {}", m.entry.description);
                    }
                }
            }
        }
        Commands::Catalog { json } => {
            let (matcher, source) = PortfolioMatcher::open(&cfg);
            let entries = matcher.store().entries();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("{} entries from {}", entries.len(), source);
                for entry in &entries {
                    println!("- {} [{}] {}", entry.title, entry.tech_stack, entry.link);
                }
            }
        }
        Commands::Serve => serve(cfg)?,
    }

    Ok(())
}

/// Runs the server on a dedicated runtime. The other commands stay off the
/// runtime because the remote embedders use blocking HTTP.
fn serve(cfg: Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::run_server(&cfg))
}
