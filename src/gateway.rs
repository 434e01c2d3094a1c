//! Best-effort detection of a running gateway
//!
//! The gateway is never signalled or managed; after a switch the caller is
//! only told whether a restart is needed for the change to take effect.

use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

use tracing::debug;

/// How long a connect attempt may take before the gateway counts as down
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// Detects whether the gateway is running
pub trait GatewayProbe {
    /// Whether the gateway appears to be up. Must not fail or block for long.
    fn is_running(&self) -> bool;

    /// Where the probe looks, for messages
    fn describe(&self) -> String;
}

/// Probe that tries a TCP connect to the gateway port on loopback
#[derive(Debug, Clone)]
pub struct TcpGatewayProbe {
    port: u16,
    timeout: Duration,
}

impl TcpGatewayProbe {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

impl GatewayProbe for TcpGatewayProbe {
    fn is_running(&self) -> bool {
        match TcpStream::connect_timeout(&self.addr(), self.timeout) {
            Ok(_) => true,
            Err(e) => {
                debug!(addr = %self.addr(), error = %e, "gateway not reachable");
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("port {}", self.port)
    }
}
