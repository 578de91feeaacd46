//! Per-client rate limiting for the creation API (token bucket).

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Sustained requests per second per client.
const PER_SECOND: u64 = 1;

/// Requests a client may burst before throttling starts.
const BURST_SIZE: u32 = 20;

/// Rate limiter keyed by the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Requires the
/// server to be run with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(PER_SECOND)
            .burst_size(BURST_SIZE)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter keyed by `X-Forwarded-For` / `X-Real-IP` / `Forwarded`.
///
/// Use only behind a trusted reverse proxy: the headers are client-controlled
/// otherwise. Falls back to the peer address when no header is present.
pub fn proxy_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(PER_SECOND)
            .burst_size(BURST_SIZE)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
