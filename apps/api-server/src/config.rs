//! Application configuration loaded from command-line flags and environment variables.

use std::path::PathBuf;

use clap::Parser;

/// Application configuration.
///
/// Every flag falls back to an environment variable, then to a default.
#[derive(Debug, Clone, Parser)]
#[command(name = "api-server", version, about = "Postboard blog post API")]
pub struct AppConfig {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to.
    #[arg(long, env = "PORT", default_value_t = 5002)]
    pub port: u16,

    /// JSON file holding the post collection.
    #[arg(long, env = "POSTS_FILE", default_value = "data/posts.json")]
    pub posts_file: PathBuf,
}

impl AppConfig {
    /// Load configuration from the process arguments and environment.
    pub fn load() -> Self {
        Self::parse()
    }
}
