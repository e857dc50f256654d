//! Request Context
//!
//! Identifies the connection a message arrived on, for log correlation.

use std::fmt;
use std::net::SocketAddr;

use uuid::Uuid;

/// Context for one client connection, attached to every log line it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Identifier assigned when the connection was accepted
    pub connection_id: Uuid,

    /// Remote address of the client, when known
    pub remote_addr: Option<SocketAddr>,
}

impl RequestContext {
    /// Create a context for a freshly accepted connection
    pub fn new() -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            remote_addr: None,
        }
    }

    /// Create context with client address
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remote_addr {
            Some(addr) => write!(f, "{addr}"),
            None => write!(f, "unknown"),
        }
    }
}
