//! Response bodies.

use serde::Serialize;

/// Body of `GET /version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionResponse {
    pub version: String,
}
