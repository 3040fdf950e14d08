use clap::Parser;
use std::{
    net::{SocketAddr, ToSocketAddrs},
    path::PathBuf,
};

use crate::{
    chat::{LOG_SIZE, QUEUE_DEPTH},
    error::{config, AppResult},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "wschat", about = "WebSocket chat relay")]
pub struct Config {
    /// The HTTP address to bind to
    #[arg(long, env = "WSCHAT_ADDRESS", default_value = "0.0.0.0:8080")]
    pub address: String,

    /// The location of the static assets directory
    #[arg(long, env = "WSCHAT_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// The TLS cert file
    #[arg(long, env = "WSCHAT_TLS_CERT")]
    pub tls_cert: Option<PathBuf>,

    /// The TLS key file
    #[arg(long, env = "WSCHAT_TLS_KEY")]
    pub tls_key: Option<PathBuf>,

    /// Append every message to this file
    #[arg(long, env = "WSCHAT_TRANSCRIPT")]
    pub transcript: Option<PathBuf>,

    /// Per-consumer queue depth; full queues drop messages
    #[arg(long, default_value_t = QUEUE_DEPTH)]
    pub queue_depth: usize,

    /// Messages replayed to a client on join
    #[arg(long, default_value_t = LOG_SIZE)]
    pub scrollback: usize,
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        self.socket_addr()?;
        let meta = std::fs::metadata(&self.assets_dir)
            .map_err(|e| config(format!("assets dir {}: {e}", self.assets_dir.display())))?;
        if !meta.is_dir() {
            return Err(config("--assets-dir is not a directory"));
        }
        if self.tls_cert.is_some() != self.tls_key.is_some() {
            return Err(config("--tls-cert and --tls-key must both be provided"));
        }
        if self.queue_depth == 0 || self.scrollback == 0 {
            return Err(config("--queue-depth and --scrollback must be at least 1"));
        }
        Ok(())
    }

    /// `--address` resolved to the first matching socket address; hostnames are allowed.
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        self.address
            .to_socket_addrs()
            .map_err(|e| config(format!("address {}: {e}", self.address)))?
            .next()
            .ok_or_else(|| config(format!("address {} resolved to nothing", self.address)))
    }

    pub fn tls(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.tls_cert.as_ref().zip(self.tls_key.as_ref())
    }
}
