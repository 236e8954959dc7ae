use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ormpad-studio")]
#[command(about = "ormpad - a web playground for ORM snippets")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Address to bind to (localhost only by default)
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Database file (default: in-memory)
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Skip sample-data seeding at startup
    #[arg(long, default_value_t = false)]
    pub no_seed: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<PathBuf>,
    pub seed: bool,
}

impl From<Args> for StudioConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            database: args.database,
            seed: !args.no_seed,
        }
    }
}

impl StudioConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database: None,
            seed: true,
        }
    }
}
