use std::time::{Duration, Instant};

use crate::error::{Result, RpcError};

/// Absolute expiry for one in-flight call.
///
/// Derived once when the call starts; every blocking operation within the
/// call recomputes its own time budget from it with [`remaining`]. An
/// unbounded deadline never expires.
///
/// [`remaining`]: Deadline::remaining
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Expiry>);

#[derive(Debug, Clone, Copy)]
struct Expiry {
    timeout: Duration,
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now. `None` gives an unbounded deadline.
    pub fn after(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|timeout| Expiry {
            timeout,
            at: Instant::now() + timeout,
        }))
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self(None)
    }

    /// Time left before expiry. `Ok(None)` means no bound.
    pub fn remaining(&self) -> Result<Option<Duration>> {
        match self.0 {
            None => Ok(None),
            Some(expiry) => {
                let now = Instant::now();
                if now >= expiry.at {
                    Err(RpcError::Timeout(expiry.timeout))
                } else {
                    Ok(Some(expiry.at - now))
                }
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_err()
    }

    /// The timeout error this deadline produces when a socket operation
    /// reports expiry first.
    pub(crate) fn timeout_error(&self) -> RpcError {
        RpcError::Timeout(self.0.map(|expiry| expiry.timeout).unwrap_or_default())
    }
}
