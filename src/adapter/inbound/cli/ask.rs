//! Handlers for `ask` and `trade`.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::TradeOutcome;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::research::build_assistant;

/// Execute `ask`.
pub async fn execute_ask(config: &Config, query: &str) -> Result<()> {
    let mut assistant = build_assistant(config)?;

    let pb = output::spinner("Analyzing");
    let analysis = match assistant.analyze(query).await {
        Ok(analysis) => analysis,
        Err(err) => {
            output::spinner_fail(&pb, "Analysis failed");
            return Err(err);
        }
    };

    if analysis.tickers.is_empty() {
        output::spinner_fail(&pb, "No ticker found");
    } else {
        let tickers: Vec<&str> = analysis.tickers.iter().map(|t| t.as_str()).collect();
        output::spinner_success(&pb, &format!("Analyzed {}", tickers.join(", ")));
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "ask",
            "query": query,
            "tickers": analysis.tickers,
            "scraped": analysis.scraped,
            "answer": analysis.answer,
        }));
        return Ok(());
    }

    for symbol in &analysis.scraped {
        output::note(&format!("Scraped fresh data for {symbol}"));
    }
    output::body(&analysis.answer);
    Ok(())
}

/// Execute `trade`.
pub async fn execute_trade(config: &Config, instruction: &str) -> Result<()> {
    let assistant = build_assistant(config)?;

    let pb = output::spinner("Placing paper trade");
    let outcome = match assistant.trade(instruction).await {
        Ok(outcome) => outcome,
        Err(err) => {
            output::spinner_fail(&pb, "Trade failed");
            return Err(err);
        }
    };

    if output::is_json() {
        pb.finish_and_clear();
        output::json_output(json!({
            "command": "trade",
            "instruction": instruction,
            "outcome": outcome,
        }));
        return Ok(());
    }

    match outcome {
        TradeOutcome::Executed(execution) => {
            output::spinner_success(&pb, &execution.to_string());
        }
        TradeOutcome::Rejected { ticker, reason } => {
            pb.finish_and_clear();
            output::warning(&format!("{ticker}: {reason}"));
        }
    }
    Ok(())
}
