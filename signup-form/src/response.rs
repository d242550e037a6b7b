use serde::{Deserialize, Serialize};

use crate::{errors::ValidationErrorMap, http::ReceivedResponse};

/// Fallback notification when a failed response carries no message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Body returned by the signup endpoint. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrorMap>,
}

/// What a signup response means for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Success,
    /// Top-level failure, shown as a notification.
    Failure(String),
    /// Per-field failure, shown next to each input.
    FieldErrors(ValidationErrorMap),
}

impl ResponsePayload {
    /// A non-success status wins over field errors unless the body has no
    /// top-level message. Any `errors` mapping, even an empty one, blocks success.
    pub fn classify(status_code: u16, body: ResponseBody) -> Self {
        let success = (200..300).contains(&status_code);
        match (success, body.error, body.errors) {
            (false, Some(error), _) if !error.is_empty() => ResponsePayload::Failure(error),
            (_, _, Some(errors)) => ResponsePayload::FieldErrors(errors),
            (false, _, _) => ResponsePayload::Failure(GENERIC_ERROR_MESSAGE.to_string()),
            (true, _, _) => ResponsePayload::Success,
        }
    }
}

impl From<ReceivedResponse<ResponseBody>> for ResponsePayload {
    fn from(response: ReceivedResponse<ResponseBody>) -> Self {
        Self::classify(response.status_code, response.body)
    }
}
