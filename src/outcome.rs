use serde_json::{json, Value};

use crate::FetchError;

/// Result envelope of one executor call.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Decoded JSON body of the first successful attempt.
    Success { data: Value, attempts: usize },
    /// Classified error of the last attempt made.
    Failure { error: FetchError, attempts: usize },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Number of attempts the executor made before returning.
    pub fn attempts(&self) -> usize {
        match self {
            Self::Success { attempts, .. } | Self::Failure { attempts, .. } => *attempts,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Renders the envelope as `{"success": true, "data": ..}` or
    /// `{"success": false, "error": ".."}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success { data, .. } => json!({ "success": true, "data": data }),
            Self::Failure { error, .. } => {
                json!({ "success": false, "error": error.to_string() })
            }
        }
    }

    pub fn into_result(self) -> Result<Value, FetchError> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }
}

impl From<FetchOutcome> for Result<Value, FetchError> {
    fn from(outcome: FetchOutcome) -> Self {
        outcome.into_result()
    }
}
