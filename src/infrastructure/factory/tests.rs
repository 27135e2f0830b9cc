//! Tests for factory functions.
//!
//! Verifies that factory functions correctly build infrastructure components
//! based on configuration settings.

use std::time::Duration;

use crate::error::{ConfigError, Error};
use crate::infrastructure::config::llm::LlmProvider;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{llm, persistence, research};

fn temp_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::parse_toml("").expect("empty config should parse");
    config.database = dir.path().join("q.db");
    config.data_dir = dir.path().join("data");
    config
}

// ---------------------------------------------------------------------------
// LLM Factory Tests
// ---------------------------------------------------------------------------

mod llm_factory {
    use super::*;

    #[test]
    fn key_variable_follows_provider() {
        assert_eq!(llm::api_key_var(LlmProvider::Anthropic), "ANTHROPIC_API_KEY");
        assert_eq!(llm::api_key_var(LlmProvider::OpenAi), "OPENAI_API_KEY");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let original = std::env::var("OPENAI_API_KEY").ok();
        std::env::remove_var("OPENAI_API_KEY");

        let mut config = Config::default();
        config.llm.provider = LlmProvider::OpenAi;
        let result = llm::build_llm_client(&config);

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField {
                field: "OPENAI_API_KEY"
            }))
        ));

        if let Some(key) = original {
            std::env::set_var("OPENAI_API_KEY", key);
        }
    }
}

// ---------------------------------------------------------------------------
// Persistence and Research Factory Tests
// ---------------------------------------------------------------------------

mod research_factory {
    use super::*;

    #[test]
    fn stores_share_one_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);

        persistence::build_stores(&config).unwrap();

        assert!(config.database.exists());
    }

    #[test]
    fn knowledge_base_opens_on_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);

        let store = research::build_company_store(&config);
        let kb = research::build_knowledge_base(&config, store).unwrap();

        assert_eq!(kb.stats().total_chunks, 0);
    }

    #[test]
    fn pacing_comes_from_scraper_section() {
        let mut config = Config::default();
        config.scraper.delay_ms = 100;
        config.scraper.failure_delay_step_ms = 50;
        config.scraper.max_delay_ms = 120;

        let pacing = research::scrape_pacing(&config);

        assert_eq!(pacing.delay_after(0), Duration::from_millis(100));
        assert_eq!(pacing.delay_after(3), Duration::from_millis(120));
    }

    #[tokio::test]
    async fn portfolio_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);

        let portfolio = research::build_portfolio(&config).unwrap();

        assert!(portfolio.holdings().await.unwrap().is_empty());
    }
}
