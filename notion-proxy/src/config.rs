// Proxy configuration, loaded from environment variables and CLI flags.

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid port {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Notion integration secret.
    pub notion_token: String,
    pub database_id: String,
    /// Number property the listing is sorted by, ascending.
    pub order_property: String,
    pub port: u16,
}

pub const DEFAULT_ORDER_PROPERTY: &str = "순서";
pub const DEFAULT_PORT: u16 = 8787;

impl Config {
    /// Environment variables:
    /// - `NOTION_TOKEN` (required)
    /// - `NOTION_DATABASE_ID` (required)
    /// - `NOTION_ORDER_PROPERTY` (default `순서`)
    /// - `PORT` (default 8787)
    ///
    /// `--port <PORT>` overrides `PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(|key| std::env::var(key).ok(), &args)
    }

    pub fn from_sources(
        env: impl Fn(&str) -> Option<String>,
        args: &[String],
    ) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let notion_token = required("NOTION_TOKEN")?;
        let database_id = required("NOTION_DATABASE_ID")?;
        let order_property = env("NOTION_ORDER_PROPERTY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ORDER_PROPERTY.to_string());

        let port = match parse_cli_value(args, "--port").or_else(|| env("PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            notion_token,
            database_id,
            order_property,
            port,
        })
    }
}

/// Parse a CLI flag value like `--port 8080`.
fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find_map(|pair| (pair[0] == flag).then(|| pair[1].clone()))
}
