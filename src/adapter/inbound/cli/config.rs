//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::diagnostic::{self, ConfigDiagnostic};
use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::settings::{Config, TEMPLATE};
use crate::infrastructure::factory::llm::api_key_var;

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, TEMPLATE)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.init",
            "path": path.display().to_string(),
        }));
        return Ok(());
    }

    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note("1. Set ANTHROPIC_API_KEY (or OPENAI_API_KEY) in your environment or .env");
    output::note("2. Run: quantfolio scrape TCS INFY");
    output::note("3. Run: quantfolio ask \"How is TCS doing?\"");
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;
    let rendered = config.to_toml()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        }));
        return Ok(());
    }

    output::field("Path", path.display());
    if !path.exists() {
        output::note("(file not found, showing defaults)");
    }
    output::section("Effective Configuration");
    output::body(&rendered);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

    let config = match Config::parse_toml(&content) {
        Ok(config) => config,
        Err(Error::Config(ConfigError::Parse(err))) => {
            if !output::is_json() {
                eprintln!(
                    "{}",
                    diagnostic::render(ConfigDiagnostic::from_toml(&err, &content))
                );
            }
            return Err(ConfigError::Parse(err).into());
        }
        Err(err) => return Err(err),
    };

    let warnings = validation_warnings(&config);

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
            "warnings": warnings,
        }));
        return Ok(());
    }

    output::field("Path", path.display());
    output::success("Config file is valid");
    if !warnings.is_empty() {
        output::section("Warnings");
        for warning in &warnings {
            output::warning(warning);
        }
    }
    Ok(())
}

/// Non-fatal problems: the configuration parses but some commands will
/// not work.
fn validation_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    let var = api_key_var(config.llm.provider);
    if std::env::var(var).map_or(true, |key| key.trim().is_empty()) {
        warnings.push(format!("{var} is not set; `ask` and `trade` will fail"));
    }
    if !config.data_dir.exists() {
        warnings.push(format!(
            "data directory {} does not exist yet; run `quantfolio scrape` first",
            config.data_dir.display()
        ));
    }

    warnings
}
