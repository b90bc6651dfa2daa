//! Server process configuration from environment variables

use std::env;
use std::path::PathBuf;

/// Settings the server binary reads at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Config {
    /// Read configuration from the environment, with defaults for every
    /// value so a bare `pitfall_server` run works.
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .unwrap_or(3000);
        let model_path = env::var("MODEL_PATH")
            .unwrap_or_else(|_| "pitfall_model.json".to_string())
            .into();
        Self {
            bind_addr,
            port,
            model_path,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
