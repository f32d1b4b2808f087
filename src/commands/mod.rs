//! The two mediators holding all of the signup business logic. Each is run by
//! the HTTP layer inside a single database transaction: any error rolls the
//! whole invocation back, so no partial state is ever retained.

mod signup_finisher;
mod signup_starter;

use chrono::{DateTime, Duration, Utc};

pub use signup_finisher::{SignupFinisher, SignupFinisherOutcome};
pub use signup_starter::{SignupStarter, SignupStarterOutcome};

/// Maximum number of times we'll ever try to send a confirmation email to a
/// particular address.
pub const MAX_NUM_ATTEMPTS: i64 = 3;

/// After sending a confirmation email, don't send another one to the same
/// address for at least this long, even if the form is submitted again.
pub const RESEND_COOLDOWN_HOURS: i64 = 24;

/// Errors a mediator can fail with. Policy outcomes (rate limited, attempt
/// cap, unknown token) are not errors; they live on the outcome enums.
#[derive(thiserror::Error)]
pub enum SignupError {
    #[error("{0}")]
    InvalidEmail(String),
    /// A concurrent signup for the same address inserted its row first. The
    /// unique constraint aborts this transaction, so the caller has to retry
    /// rather than fall through to the resend path.
    #[error("another signup for this address is already in flight")]
    ConcurrentSignup,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

// Lets the mediators be used directly as `Connection::transaction` bodies.
impl From<diesel::result::Error> for SignupError {
    fn from(e: diesel::result::Error) -> Self {
        Self::Unexpected(e.into())
    }
}

/// The last confirmation email went out recently enough that sending another
/// one now would hand abusers a way to spam third-party addresses.
pub(crate) fn within_resend_cooldown(last_sent_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    last_sent_at + Duration::hours(RESEND_COOLDOWN_HOURS) > now
}

/// The attempt cap only applies while the signup is pending; a completed
/// signup can always ask for its link again.
pub(crate) fn attempts_exhausted(completed_at: Option<DateTime<Utc>>, num_attempts: i64) -> bool {
    completed_at.is_none() && num_attempts >= MAX_NUM_ATTEMPTS
}
