use std::env;
use std::path::PathBuf;

pub const DEFAULT_STORAGE_DIR: &str = "./mcp_data";
pub const DEFAULT_SERVER_NAME: &str = "StudyAIDevelop";

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub server_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            storage_dir: env::var("MCP_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR)),
            server_name: env::var("MCP_SERVER_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVER_NAME.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage_dir, PathBuf::from("./mcp_data"));
        assert_eq!(config.server_name, "StudyAIDevelop");
    }
}
