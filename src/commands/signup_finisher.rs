use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl};

use crate::commands::SignupError;
use crate::mail::MailApi;
use crate::models::Signup;

/// Takes an email that's already started the signup process and fully adds it
/// to the mailing list. It does this based on a token received through a
/// secret URL.
pub struct SignupFinisher {
    pub list_address: String,
    pub mail_api: Arc<dyn MailApi>,
    pub token: String,
}

/// Outcomes of a successful [`SignupFinisher`] run. An unknown token is a
/// normal, reportable outcome, never an error.
#[derive(Clone, Debug, PartialEq)]
pub enum SignupFinisherOutcome {
    SignupFinished { email: String },
    TokenNotFound,
}

impl SignupFinisher {
    #[tracing::instrument(name = "Finish a signup", skip(self, conn))]
    pub fn run(&self, conn: &PgConnection) -> Result<SignupFinisherOutcome, SignupError> {
        use crate::schema::signup;

        let row = signup::table
            .filter(signup::token.eq(&self.token))
            .first::<Signup>(conn)
            .optional()
            .context("Failed to query for token")?;

        let row = match row {
            Some(row) => row,
            None => return Ok(SignupFinisherOutcome::TokenNotFound),
        };

        // Mark the signup completed. The run is fully idempotent: if the
        // list-add below fails, the user can safely retry as many times as
        // necessary, and `completed_at` is simply re-set each time.
        // `last_sent_at` is left untouched; completion is signalled by
        // `completed_at` alone.
        diesel::update(signup::table.filter(signup::id.eq(row.id)))
            .set(signup::completed_at.eq(Utc::now()))
            .execute(conn)
            .context("Failed to update signup record")?;

        tracing::info!(email = %row.email, "Adding address to the list");
        self.mail_api
            .add_member(&self.list_address, &row.email)
            .context("Failed to add email to list")?;

        Ok(SignupFinisherOutcome::SignupFinished { email: row.email })
    }
}
