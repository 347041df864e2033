//! Time bounds for store and hashing calls.

use std::{future::Future, time::Duration};

use tokio::time::timeout;
use tracing::error;

use crate::auth::AuthServiceError;

/// Default bound applied to store and hash calls.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTimeouts {
    /// Limit for a single credential store round trip.
    pub store: Duration,

    /// Limit for a single password hash or verification.
    pub hash: Duration,
}

impl Default for AuthTimeouts {
    fn default() -> Self {
        Self {
            store: DEFAULT_OPERATION_TIMEOUT,
            hash: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

/// Run `future` under `limit`; an elapsed timer becomes [`AuthServiceError::ServiceUnavailable`].
pub(crate) async fn bounded<F>(
    limit: Duration,
    operation: &'static str,
    future: F,
) -> Result<F::Output, AuthServiceError>
where
    F: Future,
{
    timeout(limit, future).await.map_err(|elapsed| {
        error!(operation, ?limit, "{elapsed}");

        AuthServiceError::ServiceUnavailable
    })
}
