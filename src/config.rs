use std::path::{Path, PathBuf};

use clap::Parser;

/// Fixed location of the per-country itinerary folders, relative to the root.
pub const COUNTRIES_DIR: &str = "data/Roadtripsprefabriques/countries";

pub const DEFAULT_PORT: u16 = 8030;

#[derive(Debug, Parser)]
#[command(name = "itinerary_devserver", about = "Local dev server for road-trip itinerary files")]
pub struct Args {
    /// Port to listen on
    #[arg(default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Directory served as static files and holding `data/`
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

// Resolved server configuration, handed to the router constructor.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub root: PathBuf,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            root: root.into(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn countries_dir(&self) -> PathBuf {
        self.root.join(COUNTRIES_DIR)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            root: args.root,
        }
    }
}
