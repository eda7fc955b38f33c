use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub db_connection_string: String,
    /// Base URL advertised in the OpenAPI document
    pub public_url: String,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://db.sqlite?mode=rwc";

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {}", raw))?,
            None => DEFAULT_PORT,
        };
        let db_connection_string =
            lookup("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let public_url =
            lookup("PUBLIC_URL").unwrap_or_else(|| format!("http://localhost:{}", port));
        Ok(Config {
            bind_addr,
            port,
            db_connection_string,
            public_url,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must not be 0".into());
        }
        if self.bind_addr.trim().is_empty() {
            return Err("BIND_ADDR is empty".into());
        }
        if self.db_connection_string.trim().is_empty() {
            return Err("DB_CONNECTION_STRING is empty".into());
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load_from(&[]).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.db_connection_string, DEFAULT_DB_CONNECTION_STRING);
        assert_eq!(config.public_url, "http://localhost:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_apply() {
        let config = load_from(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("DB_CONNECTION_STRING", "sqlite::memory:"),
        ])
        .unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.public_url, "http://localhost:8080");
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = load_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        let config = load_from(&[("PORT", "0")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_connection_string_is_rejected() {
        let config = load_from(&[("DB_CONNECTION_STRING", " ")]).unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            "DB_CONNECTION_STRING is empty"
        );
    }
}
