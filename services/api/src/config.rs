//! Server configuration

use std::env;

/// Which community service implementation backs the routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-memory fixtures
    Fixture,
    /// Forward every call to a remote backend over HTTP
    Http,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: String,
    /// Community service implementation
    pub backend: Backend,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_BIND_ADDR`: listen address (default: "0.0.0.0:3001")
    /// - `API_BACKEND`: `fixture` or `http` (default: "fixture")
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env::var("API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());

        let backend = match env::var("API_BACKEND")
            .unwrap_or_else(|_| "fixture".to_string())
            .to_lowercase()
            .as_str()
        {
            "fixture" | "mock" => Backend::Fixture,
            "http" => Backend::Http,
            other => return Err(format!("Unknown API_BACKEND: {}", other)),
        };

        Ok(ServerConfig { bind_addr, backend })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        unsafe {
            env::remove_var("API_BIND_ADDR");
            env::remove_var("API_BACKEND");
        }

        let config = ServerConfig::from_env().expect("Failed to create server config");
        assert_eq!(config.bind_addr, "0.0.0.0:3001");
        assert_eq!(config.backend, Backend::Fixture);
    }

    #[test]
    #[serial]
    fn test_server_config_rejects_unknown_backend() {
        unsafe {
            env::set_var("API_BACKEND", "carrier-pigeon");
        }
        let result = ServerConfig::from_env();
        unsafe {
            env::remove_var("API_BACKEND");
        }

        assert!(result.is_err());
    }
}
