use std::fmt;
use std::path::PathBuf;

use clap::Parser;

/// Command-line options.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Minimal dual-stack HTTP/1.1 file server")]
pub struct Args {
    /// TCP port to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Directory served as the document root
    #[arg(short = 'r', long = "root", default_value = ".")]
    pub document_root: PathBuf,

    /// Directory for rolling log files
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,
}

/// Settings shared read-only by every connection.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub port: u16,
    pub document_root: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDocumentRoot(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDocumentRoot(p) => write!(f, "docroot invalid: {}", p.display()),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ListenerConfig {
    pub fn new(port: u16, document_root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let requested = document_root.into();
        let document_root = std::fs::canonicalize(&requested)
            .map_err(|_| ConfigError::InvalidDocumentRoot(requested.clone()))?;
        if !document_root.is_dir() {
            return Err(ConfigError::InvalidDocumentRoot(requested));
        }
        Ok(ListenerConfig {
            port,
            document_root,
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Self::new(args.port, &args.document_root)
    }
}
