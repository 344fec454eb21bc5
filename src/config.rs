//! Server configuration via CLI flags.

use std::path::PathBuf;

use clap::Parser;

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("coworkerd")
        .join("store.sqlite3")
}

/// `coworkerd`: local-first filesystem coworker server.
#[derive(Parser, Debug, Clone)]
#[command(name = "coworkerd", about = "Plan/approve/execute job orchestration over a loopback HTTP interface")]
pub struct Config {
    /// Address to bind the HTTP gateway to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP gateway to.
    #[arg(long, default_value_t = 8765)]
    pub port: u16,

    /// Path to the SQLite store file.
    #[arg(long, default_value_os_t = default_store_path())]
    pub store: PathBuf,

    /// Default worker lease duration, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    pub lease_ms: i64,

    /// Number of concurrent worker tasks.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "coworkerd=debug".
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        use std::str::FromStr;
        let ip = std::net::IpAddr::from_str(&self.host)?;
        Ok(std::net::SocketAddr::new(ip, self.port))
    }
}
