//! Handler for the `kb` command group.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::application::scrape::bare_symbol;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::research::{build_company_store, build_knowledge_base};

#[derive(Tabled)]
struct KindRow {
    #[tabled(rename = "Chunk type")]
    kind: String,
    #[tabled(rename = "Count")]
    count: usize,
}

/// Execute `kb stats`.
pub fn execute_stats(config: &Config) -> Result<()> {
    let kb = build_knowledge_base(config, build_company_store(config))?;
    let stats = kb.stats();

    if output::is_json() {
        output::json_output(json!({
            "command": "kb.stats",
            "data_dir": config.data_dir.display().to_string(),
            "stats": stats,
        }));
        return Ok(());
    }

    output::field("Data dir", config.data_dir.display());
    output::field("Companies", stats.total_companies);
    output::field("Chunks", stats.total_chunks);
    if let Some(at) = stats.last_refresh {
        output::field("Indexed at", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if stats.total_chunks == 0 {
        output::hint("quantfolio scrape TCS INFY");
        return Ok(());
    }

    output::field("Tickers", stats.companies.join(", "));
    output::section("Chunks by type");
    output::table(
        stats
            .chunk_types
            .iter()
            .map(|(kind, count)| KindRow {
                kind: kind.clone(),
                count: *count,
            }),
    );
    Ok(())
}

/// Execute `kb search`.
pub fn execute_search(
    config: &Config,
    query: &str,
    ticker: Option<&str>,
    k: Option<usize>,
) -> Result<()> {
    let mut kb = build_knowledge_base(config, build_company_store(config))?;
    let filter = ticker.map(bare_symbol);
    let k = k.unwrap_or(config.knowledge.top_k);
    let hits = kb.search(query, k, filter.as_deref())?;

    if output::is_json() {
        output::json_output(json!({
            "command": "kb.search",
            "query": query,
            "ticker": filter,
            "k": k,
            "hits": hits,
        }));
        return Ok(());
    }

    if hits.is_empty() {
        output::note(&format!("No relevant information found for the query: {query}"));
        return Ok(());
    }

    for hit in &hits {
        output::section(&format!(
            "{} ({}) - {} {}",
            hit.chunk.company,
            output::highlight(&hit.chunk.ticker),
            hit.chunk.kind.title(),
            output::muted(format!("[{:.3}]", hit.score))
        ));
        output::lines(&hit.chunk.text);
    }
    Ok(())
}

/// Execute `kb summary`.
pub fn execute_summary(config: &Config, symbol: &str) -> Result<()> {
    let mut kb = build_knowledge_base(config, build_company_store(config))?;
    let symbol = bare_symbol(symbol);
    let found = kb.contains(&symbol)?;
    let summary = kb.company_summary(&symbol)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "kb.summary",
            "ticker": symbol,
            "found": found,
            "summary": summary,
        }));
        return Ok(());
    }

    if !found {
        output::warning(&summary);
        output::hint(&format!("quantfolio scrape {symbol}"));
        return Ok(());
    }
    output::body(&summary);
    Ok(())
}
