//! Command-line interface definitions.
//!
//! Defines the CLI structure for quantfolio using `clap`: research queries,
//! paper trades, portfolio and history management, scraping, knowledge base
//! inspection, quotes and configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::infrastructure::paths;

/// NSE stock research assistant and paper-trading portfolio
#[derive(Parser, Debug)]
#[command(name = "quantfolio")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the quantfolio CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a research question about one or more NSE stocks
    Ask(AskArgs),

    /// Execute a paper trade from a plain-English instruction
    Trade(TradeArgs),

    /// Inspect or reset the paper portfolio
    #[command(subcommand)]
    Portfolio(PortfolioCommand),

    /// Manage saved queries
    #[command(subcommand)]
    History(HistoryCommand),

    /// Scrape company fundamentals into the local archive
    Scrape(ScrapeArgs),

    /// Inspect the knowledge base
    #[command(subcommand)]
    Kb(KbCommand),

    /// Show live price, fundamentals and technicals for a ticker
    Quote(QuoteArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the `ask` command.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Question, e.g. "How is TCS doing compared to Infosys?"
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl AskArgs {
    /// The query words joined back into one string.
    #[must_use]
    pub fn text(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for the `trade` command.
#[derive(Parser, Debug)]
pub struct TradeArgs {
    /// Instruction, e.g. "buy 10 shares of Reliance"
    #[arg(required = true, num_args = 1..)]
    pub instruction: Vec<String>,
}

impl TradeArgs {
    /// The instruction words joined back into one string.
    #[must_use]
    pub fn text(&self) -> String {
        self.instruction.join(" ")
    }
}

/// Subcommands for `portfolio`.
#[derive(Subcommand, Debug)]
pub enum PortfolioCommand {
    /// Holdings valued at live prices
    Show,
    /// Most recent trades
    Trades {
        /// Number of trades to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete every holding and trade
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Subcommands for `history`.
#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List saved queries, oldest first
    List,
    /// Delete one saved query
    Delete {
        /// Entry id as shown by `history list`
        id: i32,
    },
    /// Delete every saved query
    Clear,
}

/// Arguments for the `scrape` command.
#[derive(Parser, Debug)]
pub struct ScrapeArgs {
    /// Symbols to scrape (e.g. TCS INFY RELIANCE.NS)
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

/// Subcommands for `kb`.
#[derive(Subcommand, Debug)]
pub enum KbCommand {
    /// Index statistics
    Stats,
    /// Retrieve the chunks closest to a query
    Search(KbSearchArgs),
    /// Every chunk stored for one company
    Summary {
        /// Bare or suffixed symbol
        symbol: String,
    },
}

/// Arguments for `kb search`.
#[derive(Parser, Debug)]
pub struct KbSearchArgs {
    /// Search text
    pub query: String,

    /// Restrict results to one symbol
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Number of results (defaults to `knowledge.top_k`)
    #[arg(short)]
    pub k: Option<usize>,
}

/// Arguments for the `quote` command.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Ticker, with or without the exchange suffix
    pub ticker: String,
}

/// Subcommands for `config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a commented configuration file
    Init {
        /// Overwrite the file if it already exists
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Check the configuration file for errors
    Validate,
}
