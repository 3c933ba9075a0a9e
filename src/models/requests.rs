use crate::core::intake::RawIntake;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find mentor matches
///
/// Carries the raw intake answers plus paging/deadline hints. Deep
/// validation of the answers happens in the intake normalizer; only the
/// request shell is checked here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(flatten)]
    pub intake: RawIntake,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u16,
    /// Milliseconds the caller is still willing to wait; an already-spent
    /// budget aborts before the pipeline starts
    #[serde(rename = "deadlineMs", default)]
    pub deadline_ms: Option<u64>,
}

fn default_limit() -> u16 {
    20
}
