use std::collections::HashMap;
use std::fmt;

/// A failure reported by the daemon through its response status field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonError {
    /// Raw status code from the response.
    pub code: i32,
    /// Caller-meaningful kind, when the code is registered in the table.
    pub kind: Option<String>,
    /// Human-readable message from the daemon.
    pub message: String,
}

impl fmt::Display for DaemonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{kind}: {} (status {})", self.message, self.code),
            None => write!(f, "daemon status {}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for DaemonError {}

/// Mapping from non-zero status codes to caller-meaningful error kinds.
///
/// The set of status codes is defined by the daemon's protocol version, so
/// the table is supplied by the caller-facing layer rather than baked in
/// here. Unregistered codes still classify into a [`DaemonError`] carrying
/// the raw code and message.
#[derive(Clone, Debug, Default)]
pub struct ErrorTable {
    kinds: HashMap<i32, String>,
}

impl ErrorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind name for a status code.
    pub fn with(mut self, code: i32, kind: impl Into<String>) -> Self {
        self.kinds.insert(code, kind.into());
        self
    }

    /// Kind registered for `code`, if any.
    pub fn kind(&self, code: i32) -> Option<&str> {
        self.kinds.get(&code).map(String::as_str)
    }

    /// Translate a non-success status into a typed error.
    pub fn classify(&self, code: i32, message: impl Into<String>) -> DaemonError {
        DaemonError {
            code,
            kind: self.kinds.get(&code).cloned(),
            message: message.into(),
        }
    }
}
