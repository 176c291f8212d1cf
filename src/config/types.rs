use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub movie: MovieConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Page served at `/` and for every unmatched path
    #[serde(default = "default_index")]
    pub index: PathBuf,

    /// Interval between SSE keep-alive comments
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_index() -> PathBuf {
    PathBuf::from("./static/index.html")
}
fn default_keep_alive_secs() -> u64 {
    15
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            index: default_index(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieConfig {
    /// Gzip-compressed movie file
    #[serde(default = "default_movie_path")]
    pub path: PathBuf,
}

fn default_movie_path() -> PathBuf {
    PathBuf::from("./ASCIImation.txt.gz")
}

impl Default for MovieConfig {
    fn default() -> Self {
        Self {
            path: default_movie_path(),
        }
    }
}
