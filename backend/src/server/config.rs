//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::Key;
use hearth::outbound::memory::LockoutConfig;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) lockout: Option<LockoutConfig>,
    pub(crate) seed_demo: bool,
}

impl ServerConfig {
    /// Construct a server configuration with default lockout thresholds and
    /// an empty identity store.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            lockout: Some(LockoutConfig::default()),
            seed_demo: false,
        }
    }

    /// Replace the lockout thresholds; `None` disables lockout.
    #[must_use]
    pub fn with_lockout(mut self, lockout: Option<LockoutConfig>) -> Self {
        self.lockout = lockout;
        self
    }

    /// Seed the demo household and administrator on startup.
    #[must_use]
    pub fn with_demo_seed(mut self, seed_demo: bool) -> Self {
        self.seed_demo = seed_demo;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
