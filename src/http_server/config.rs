//! HTTP server configuration

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Address to bind to
    pub bind_addr: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means permissive (development)
    pub cors_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8750,
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// The socket address string to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
