//! Admin session gate
//!
//! A single shared password in front of the read-only dashboard. Cosmetic:
//! no rate limiting, no expiry, no audit trail.

use tracing::{info, warn};

/// Shared admin password
pub const ADMIN_PASSWORD: &str = "1234";

#[derive(Debug, Clone, Copy, Default)]
pub struct AdminSession;

impl AdminSession {
    pub fn new() -> Self {
        Self
    }

    /// True when `password` matches the shared secret
    pub fn authenticate(&self, password: &str) -> bool {
        let ok = password == ADMIN_PASSWORD;
        if ok {
            info!("Admin login accepted");
        } else {
            warn!("Admin login rejected");
        }
        ok
    }
}
