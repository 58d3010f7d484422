//! Listener configuration from the environment.

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Address and port the HTTP server listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to the defaults when a
    /// variable is unset or `PORT` is not a valid port number.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::var("BIND_ADDR").ok(), std::env::var("PORT").ok())
    }

    fn from_vars(bind_addr: Option<String>, port: Option<String>) -> Self {
        let port = match port.as_deref().map(str::parse::<u16>) {
            Some(Ok(port)) => port,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid PORT: {e}");
                DEFAULT_PORT
            }
            None => DEFAULT_PORT,
        };

        Self {
            bind_addr: bind_addr
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
        }
    }
}
