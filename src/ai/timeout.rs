//! Transport Deadlines
//!
//! Every outbound LLM call runs against an explicit `Deadline`. Expiry drops the
//! in-flight future, which aborts the underlying HTTP request.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::{Deadline, within_deadline};
//!
//! let deadline = Deadline::after(Duration::from_secs(55));
//! let text = within_deadline(deadline, transport.complete(&request)).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::constants::network as net_constants;
use crate::types::TransportError;

/// Point in time by which a transport call must finish
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Deadline `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    /// Total time the caller allowed
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left, zero once expired
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// True once no time is left
    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::after(Duration::from_secs(net_constants::DEFAULT_TIMEOUT_SECS))
    }
}

/// Run a transport future, failing with `TransportError::Timeout` once the
/// deadline passes. An already expired deadline never polls the future.
pub async fn within_deadline<T, F>(deadline: Deadline, future: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    if deadline.is_expired() {
        return Err(TransportError::Timeout(deadline.budget()));
    }

    match tokio::time::timeout_at(deadline.at(), future).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(deadline.budget())),
    }
}
