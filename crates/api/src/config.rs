use std::net::IpAddr;

use lumina_pipeline::ConfigError;

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development next to the storefront dev server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var        | Default                 |
    /// |----------------|-------------------------|
    /// | `HOST`         | `0.0.0.0`               |
    /// | `PORT`         | `3000`                  |
    /// | `CORS_ORIGINS` | `http://localhost:5173` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("HOST") {
            None => IpAddr::from([0, 0, 0, 0]),
            Some(value) => value.trim().parse().map_err(|e: std::net::AddrParseError| ConfigError {
                var: "HOST",
                reason: e.to_string(),
                value,
            })?,
        };

        let port = match lookup("PORT") {
            None => 3000,
            Some(value) => value.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError {
                var: "PORT",
                reason: e.to_string(),
                value,
            })?,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173".to_string()]);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = ServerConfig::from_lookup(|var| match var {
            "CORS_ORIGINS" => Some(" https://a.example , ,https://b.example".into()),
            "PORT" => Some("8080".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn bad_host_is_reported() {
        let err = ServerConfig::from_lookup(|var| (var == "HOST").then(|| "localhost:80".to_string()))
            .unwrap_err();
        assert_eq!(err.var, "HOST");
        assert_eq!(err.value, "localhost:80");

        let config = ServerConfig::from_lookup(|var| (var == "HOST").then(|| "::1".to_string())).unwrap();
        assert_eq!(config.host, "::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn bad_port_is_reported() {
        let err = ServerConfig::from_lookup(|var| (var == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert_eq!(err.var, "PORT");
        assert_eq!(err.value, "http");
    }
}
