use clap::Parser;
use tracing::error;

use quantfolio::adapter::inbound::cli::command::Cli;
use quantfolio::adapter::inbound::cli::output::{self, OutputConfig};
use quantfolio::adapter::inbound::cli::run;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(
        cli.json,
        cli.quiet,
        cli.verbose,
        cli.color,
    ));

    if let Err(e) = run::execute(cli).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
