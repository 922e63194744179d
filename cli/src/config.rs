//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

/// Terminal client for the blog API.
#[derive(Debug, Clone, Parser)]
#[command(name = "blog", version, about)]
pub struct Config {
    /// Base URL of the blog API, including the `/api` prefix.
    #[arg(long, env = "BLOG_API_URL", default_value = "http://127.0.0.1:3000/api")]
    pub api_url: String,

    /// Directory holding the persisted credential token.
    #[arg(long, env = "BLOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Give up on a request after this many seconds.
    #[arg(long, env = "BLOG_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs_next::data_dir()
                .map(|dir| dir.join("blog"))
                .context("no platform data directory; pass --data-dir"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let config = Config::parse_from([
            "blog",
            "--api-url",
            "http://example.test/api",
            "--data-dir",
            "/tmp/blog-test",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(config.api_url, "http://example.test/api");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/blog-test"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
