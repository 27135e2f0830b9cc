//! Command dispatch.

use std::path::Path;

use tracing::debug;

use super::command::{
    Cli, Commands, ConfigCommand, HistoryCommand, KbCommand, PortfolioCommand,
};
use super::{ask, config, history, kb, output, portfolio, quote, scrape};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Load the configuration and start logging.
fn load(path: &Path) -> Result<Config> {
    let settings = Config::load_or_default(path)?;
    settings.init_logging(output::verbosity());
    debug!(config = %path.display(), "Configuration loaded");
    Ok(settings)
}

/// `config` subcommands work on the file itself and never load it, so a
/// broken file can still be inspected and regenerated.
fn execute_config(path: &Path, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init { force } => config::execute_init(path, force),
        ConfigCommand::Show => config::execute_show(path),
        ConfigCommand::Validate => config::execute_validate(path),
    }
}

/// Run a parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    let path = cli.config;

    match cli.command {
        Commands::Config(command) => execute_config(&path, command),
        Commands::Ask(args) => ask::execute_ask(&load(&path)?, &args.text()).await,
        Commands::Trade(args) => ask::execute_trade(&load(&path)?, &args.text()).await,
        Commands::Portfolio(PortfolioCommand::Show) => portfolio::execute_show(&load(&path)?).await,
        Commands::Portfolio(PortfolioCommand::Trades { limit }) => {
            portfolio::execute_trades(&load(&path)?, limit).await
        }
        Commands::Portfolio(PortfolioCommand::Reset { yes }) => {
            portfolio::execute_reset(&load(&path)?, yes).await
        }
        Commands::History(HistoryCommand::List) => history::execute_list(&load(&path)?).await,
        Commands::History(HistoryCommand::Delete { id }) => {
            history::execute_delete(&load(&path)?, id).await
        }
        Commands::History(HistoryCommand::Clear) => history::execute_clear(&load(&path)?).await,
        Commands::Scrape(args) => scrape::execute(&load(&path)?, &args.symbols).await,
        Commands::Kb(KbCommand::Stats) => kb::execute_stats(&load(&path)?),
        Commands::Kb(KbCommand::Search(args)) => {
            kb::execute_search(&load(&path)?, &args.query, args.ticker.as_deref(), args.k)
        }
        Commands::Kb(KbCommand::Summary { symbol }) => kb::execute_summary(&load(&path)?, &symbol),
        Commands::Quote(args) => quote::execute(&load(&path)?, &args.ticker).await,
    }
}
