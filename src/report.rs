use serde::Serialize;

pub const STATUS_OK: u16 = 200;
pub const STATUS_FAILED: u16 = 500;

/// What the Lambda invocation returns to its caller.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn new(success: bool, body: String) -> Self {
        HandlerResponse {
            status_code: if success { STATUS_OK } else { STATUS_FAILED },
            body,
        }
    }
}

/// Result of one step of a run. `count` is whatever was achieved before a
/// failure, so aborted steps still report their partial progress.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

impl StepOutcome {
    pub fn succeeded(count: usize, message: String) -> Self {
        StepOutcome {
            success: true,
            count,
            message,
        }
    }

    pub fn failed(count: usize, message: String) -> Self {
        StepOutcome {
            success: false,
            count,
            message,
        }
    }
}
