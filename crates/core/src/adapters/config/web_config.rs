use std::fmt::Debug;

/// Signing key handed to the web layer. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Box<str>);

impl SecretKey {
    pub fn new(key: impl Into<Box<str>>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub secret_key: SecretKey,
    pub host: String,
    pub port: u16,
}

impl WebConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Verbose logging for development.
    pub debug: bool,
    pub otlp_endpoint: Option<String>,
}
