use serde::{Deserialize, Serialize};

pub const NOTE_VALID: &str = "Valid";
pub const NOTE_INVALID: &str = "Invalid";

/// A rule's objection to one test case. Any finding makes the case invalid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub message: String,
}
