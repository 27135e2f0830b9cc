//! Handler for the `scrape` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::research::{build_company_store, build_scrape_service};

/// Execute `scrape`. Fails only when every symbol failed.
pub async fn execute(config: &Config, symbols: &[String]) -> Result<()> {
    let service = build_scrape_service(config, build_company_store(config));

    let pb = output::spinner(&format!("Scraping {} symbol(s)", symbols.len()));
    let summary = service.scrape_and_save(symbols).await;

    if summary.failed.is_empty() {
        output::spinner_success(&pb, &format!("Scraped {}", summary.succeeded.len()));
    } else {
        output::spinner_fail(
            &pb,
            &format!(
                "Scraped {}, failed {}",
                summary.succeeded.len(),
                summary.failed.len()
            ),
        );
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "scrape",
            "succeeded": summary.succeeded,
            "failed": summary.failed,
        }));
    } else {
        for scraped in &summary.succeeded {
            output::success(&format!(
                "{} {} {}",
                output::highlight(&scraped.symbol),
                scraped.company,
                output::muted(scraped.path.display())
            ));
        }
        for failure in &summary.failed {
            output::warning(&format!("{}: {}", failure.symbol, failure.reason));
        }
    }

    if summary.succeeded.is_empty() && !summary.failed.is_empty() {
        return Err(Error::Scrape {
            ticker: symbols.join(","),
            reason: "no symbol could be scraped".to_string(),
        });
    }
    Ok(())
}
