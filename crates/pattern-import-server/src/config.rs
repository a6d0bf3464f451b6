use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Pattern import server
#[derive(Debug, Clone, Parser)]
#[command(name = "pattern-import-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Where converted PDF pages are written and served from
    #[arg(long, env = "OUTPUT_DIR", default_value = "./output")]
    pub output_dir: PathBuf,

    /// `pdftoppm` executable
    #[arg(long, env = "PDFTOPPM", default_value = "pdftoppm")]
    pub pdftoppm: PathBuf,

    /// Timeout for fetching share-link pages
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Skip the desktop-profile second fetch when a page yields no images
    #[arg(long, env = "NO_FALLBACK")]
    pub no_fallback: bool,
}

impl ServerConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}
