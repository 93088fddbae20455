use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Runtime configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the knowledge JSON file
    pub knowledge_path: PathBuf,
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Maximum interactions retained in the history log
    pub history_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `FARM_KNOWLEDGE_PATH`: knowledge file (defaults to the bundled
    ///   `data/knowledge.json`)
    /// - `FARM_LISTEN_ADDR`: bind address (default "127.0.0.1:5000")
    /// - `FARM_HISTORY_CAPACITY`: history log size (default 100)
    ///
    /// The knowledge file must exist; a missing file fails startup
    /// rather than serving an empty knowledge base.
    pub fn from_env() -> Result<Self, AppError> {
        let knowledge_path = std::env::var("FARM_KNOWLEDGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/knowledge.json")
            });

        if !knowledge_path.exists() {
            return Err(AppError::Config(format!(
                "knowledge file not found at {}",
                knowledge_path.display()
            )));
        }

        let listen_addr =
            std::env::var("FARM_LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

        let history_capacity = match std::env::var("FARM_HISTORY_CAPACITY") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                AppError::Config(format!(
                    "FARM_HISTORY_CAPACITY must be a non-negative integer, got {raw:?}"
                ))
            })?,
            Err(_) => DEFAULT_HISTORY_CAPACITY,
        };

        Ok(Self {
            knowledge_path,
            listen_addr,
            history_capacity,
        })
    }
}
