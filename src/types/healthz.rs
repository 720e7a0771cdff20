use serde::{Deserialize, Serialize};

/// Body of `GET /healthz`. The client refuses to talk to a server whose clock
/// drifts too far from its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthzResponse {
    pub now: u64,
    pub time_zone: String,
    pub client_ip: Option<String>,
    pub version: Option<String>,

    /// Whether the record store answered a trivial read.
    #[serde(default)]
    pub database: bool,
}
