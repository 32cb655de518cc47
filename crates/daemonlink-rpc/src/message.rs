use serde::{Deserialize, Serialize};

/// Status carried by a decoded response.
///
/// Zero is success; every other code is a daemon-defined failure that gets
/// classified through the channel's error table.
pub trait ResponseStatus {
    fn status_code(&self) -> i32;
    fn status_message(&self) -> &str;
}

/// Conventional reply shape for daemons that report failures through
/// `error` / `errorMessage` fields alongside the payload body.
///
/// The body is flattened into the same JSON object, so `T` should be a
/// struct or map of the payload fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub error: i32,
    #[serde(
        rename = "errorMessage",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub error_message: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn success(body: T) -> Self {
        Self {
            error: 0,
            error_message: String::new(),
            body,
        }
    }
}

impl<T: Default> Envelope<T> {
    pub fn failure(error: i32, message: impl Into<String>) -> Self {
        Self {
            error,
            error_message: message.into(),
            body: T::default(),
        }
    }
}

impl<T> ResponseStatus for Envelope<T> {
    fn status_code(&self) -> i32 {
        self.error
    }

    fn status_message(&self) -> &str {
        &self.error_message
    }
}
