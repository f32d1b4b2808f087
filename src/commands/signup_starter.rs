use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use diesel::result::DatabaseErrorKind;
use diesel::{ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::commands::{attempts_exhausted, within_resend_cooldown, SignupError};
use crate::domain::SignupEmail;
use crate::mail::{MailApi, SendMessageParams};
use crate::models::{NewSignup, Signup};
use crate::render::Renderer;

/// Takes an email and begins the signup process for it.
///
/// Usually that involves dispatching an email to the address that contains a
/// secret URL that can be used to fully confirm the signup. If the
/// confirmation email was dispatched but not yet confirmed, it may be resent,
/// but only outside a rate-limited window and under an attempt cap.
pub struct SignupStarter {
    pub email: String,
    pub list_address: String,
    pub mail_api: Arc<dyn MailApi>,
    pub renderer: Arc<Renderer>,
    pub reply_to: String,
}

/// Mutually exclusive outcomes of a successful [`SignupStarter`] run.
#[derive(Clone, Debug, PartialEq)]
pub enum SignupStarterOutcome {
    NewSignup,
    ConfirmationResent,
    ConfirmationRateLimited,
    MaxNumAttempts,
}

impl SignupStarter {
    #[tracing::instrument(
        name = "Start a signup",
        skip(self, conn),
        fields(signup_email = %self.email)
    )]
    pub fn run(&self, conn: &PgConnection) -> Result<SignupStarterOutcome, SignupError> {
        use crate::schema::signup;

        // A regexp check won't catch every bad address; to some extent we
        // rely on the mail provider to do that work for us.
        let email = SignupEmail::parse(self.email.clone()).map_err(SignupError::InvalidEmail)?;

        let existing = signup::table
            .filter(signup::email.eq(email.as_ref()))
            .first::<Signup>(conn)
            .optional()
            .context("Failed to query for existing signup")?;

        let row = match existing {
            Some(row) => row,
            // The happy path: nothing in the database yet, so run the whole
            // process from scratch.
            None => {
                let token = Uuid::new_v4().to_string();
                diesel::insert_into(signup::table)
                    .values(NewSignup {
                        email: email.as_ref(),
                        token: &token,
                    })
                    .execute(conn)
                    .map_err(|e| match e {
                        diesel::result::Error::DatabaseError(
                            DatabaseErrorKind::UniqueViolation,
                            _,
                        ) => SignupError::ConcurrentSignup,
                        e => SignupError::Unexpected(
                            anyhow::Error::new(e).context("Failed to insert new signup row"),
                        ),
                    })?;

                self.send_confirmation_message(&token)?;
                return Ok(SignupStarterOutcome::NewSignup);
            }
        };

        if attempts_exhausted(row.completed_at, row.num_attempts) {
            tracing::info!("Too many signup attempts for email");
            return Ok(SignupStarterOutcome::MaxNumAttempts);
        }

        // We don't bail early on a completed signup: if the user unsubscribed
        // since, that happened entirely at the mail provider and isn't
        // reflected here, so they may legitimately want the link again. The
        // worst case is a confirmation mail to someone already subscribed.
        let now = Utc::now();
        if within_resend_cooldown(row.last_sent_at, now) {
            tracing::info!("Last send was too soon, not re-sending confirmation");
            return Ok(SignupStarterOutcome::ConfirmationRateLimited);
        }

        // Count the attempt only while the signup is still pending.
        let num_attempts = if row.completed_at.is_none() {
            row.num_attempts + 1
        } else {
            row.num_attempts
        };

        diesel::update(signup::table.filter(signup::id.eq(row.id)))
            .set((
                signup::last_sent_at.eq(now),
                signup::num_attempts.eq(num_attempts),
            ))
            .execute(conn)
            .context("Failed to update existing signup")?;

        self.send_confirmation_message(&row.token)?;
        Ok(SignupStarterOutcome::ConfirmationResent)
    }

    #[tracing::instrument(name = "Send the confirmation message", skip(self))]
    fn send_confirmation_message(&self, token: &str) -> Result<(), SignupError> {
        let contents_plain = self
            .renderer
            .render("confirm.txt", token)
            .context("Failed to render confirmation email (plain)")?
            .trim()
            .to_string();

        let contents_html = self
            .renderer
            .render("confirm.html", token)
            .context("Failed to render confirmation email (HTML)")?;

        // Inline CSS styling, since that's the only form of it most mail
        // clients will honor.
        let contents_html =
            css_inline::inline(&contents_html).context("Failed to inline CSS styling")?;

        self.mail_api
            .send_message(&SendMessageParams {
                contents_html,
                contents_plain,
                list_address: self.list_address.clone(),
                newsletter_name: self.renderer.meta().name.to_string(),
                recipient: self.email.clone(),
                reply_to: self.reply_to.clone(),
                subject: self.renderer.confirmation_subject(),
            })
            .context("Failed to send confirmation message")?;
        Ok(())
    }
}
