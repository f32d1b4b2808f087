use std::sync::Arc;

use diesel::Connection;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::State;

use crate::commands::{SignupError, SignupFinisher, SignupFinisherOutcome};
use crate::mail::MailApi;
use crate::newsletter::NewsletterMeta;
use crate::startup::SignupDbConn;

#[tracing::instrument(name = "Confirm a signup", skip(conn, mail_api, meta))]
#[get("/confirm/<token>")]
pub async fn finish_signup(
    token: String,
    conn: SignupDbConn,
    mail_api: &State<Arc<dyn MailApi>>,
    meta: &State<NewsletterMeta>,
) -> Result<Custom<String>, SignupError> {
    let finisher = SignupFinisher {
        list_address: meta.list_address.clone(),
        mail_api: Arc::clone(mail_api),
        token,
    };

    let outcome = conn
        .run(move |c| {
            let c: &diesel::PgConnection = c;
            c.transaction(|| finisher.run(c))
        })
        .await?;

    match outcome {
        SignupFinisherOutcome::TokenNotFound => Ok(Custom(
            Status::NotFound,
            String::from("We couldn't find that confirmation token."),
        )),
        SignupFinisherOutcome::SignupFinished { email } => Ok(Custom(
            Status::Ok,
            format!(
                "You've been signed up successfully. You'll receive your first \
                 edition of {} at {} the next time one is published.",
                meta.name, email
            ),
        )),
    }
}
