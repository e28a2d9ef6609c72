//! HTTP surface of the service.
//!
//! - `GET /search?query=` - organization lookup
//! - `GET /health` - readiness and dataset metadata

mod handlers;

pub use handlers::{router, AppState, HealthResponse, SearchParams};

use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::info;

/// Bind `addr`, falling back to IPv4-only when the dual-stack wildcard is unavailable.
pub async fn bind_with_fallback(addr: SocketAddr) -> std::io::Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if addr.ip().is_unspecified() && addr.is_ipv6() => {
            info!(error = %e, "IPv6 not available, falling back to IPv4 (0.0.0.0)");
            TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, addr.port()))).await
        }
        Err(e) => Err(e),
    }
}
