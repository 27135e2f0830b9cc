//! Isolated configuration for driving the binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary home: database, data directory and config file.
pub struct TestEnv {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_sections("")
    }

    /// `sections` is appended after the top-level keys, so it may only
    /// contain tables.
    pub fn with_sections(sections: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = dir.path().join("config.toml");
        let contents = format!(
            "database = '{}'\ndata_dir = '{}'\n\n[logging]\nlevel = \"warn\"\n\n{sections}",
            dir.path().join("quantfolio.db").display(),
            dir.path().join("data").display(),
        );
        fs::write(&config, contents).expect("write temp config");
        Self { dir, config }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn database(&self) -> PathBuf {
        self.dir.path().join("quantfolio.db")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The binary pointed at this environment, with no API keys visible.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("quantfolio").expect("binary built");
        cmd.current_dir(self.dir.path())
            .env_remove("ANTHROPIC_API_KEY")
            .env_remove("OPENAI_API_KEY")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}
