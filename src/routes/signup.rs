use std::sync::Arc;

use diesel::Connection;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::State;
use uuid::Uuid;

use crate::commands::{SignupError, SignupStarter, SignupStarterOutcome};
use crate::configuration::MailSettings;
use crate::mail::MailApi;
use crate::newsletter::NewsletterMeta;
use crate::render::Renderer;
use crate::startup::SignupDbConn;

#[derive(FromForm)]
pub struct SignupForm {
    email: String,
}

#[tracing::instrument(
    name = "Handle a signup submission",
    skip(form, conn, mail_api, renderer, meta, mail_settings),
    fields(
        request_id = %Uuid::new_v4(),
        signup_email = %form.email
    )
)]
#[post("/signup", data = "<form>")]
pub async fn start_signup(
    form: Form<SignupForm>,
    conn: SignupDbConn,
    mail_api: &State<Arc<dyn MailApi>>,
    renderer: &State<Arc<Renderer>>,
    meta: &State<NewsletterMeta>,
    mail_settings: &State<MailSettings>,
) -> Result<Custom<String>, SignupError> {
    let starter = SignupStarter {
        email: form.into_inner().email,
        list_address: meta.list_address.clone(),
        mail_api: Arc::clone(mail_api),
        renderer: Arc::clone(renderer),
        reply_to: mail_settings.reply_to.clone(),
    };

    let outcome = conn
        .run(move |c| {
            let c: &diesel::PgConnection = c;
            c.transaction(|| starter.run(c))
        })
        .await?;

    let message = match outcome {
        SignupStarterOutcome::NewSignup | SignupStarterOutcome::ConfirmationResent => format!(
            "Thanks for signing up for {}! Check your inbox for a confirmation link.",
            meta.name
        ),
        SignupStarterOutcome::ConfirmationRateLimited => String::from(
            "Looks like we sent you a confirmation quite recently. \
             Give it a little while, then try again.",
        ),
        SignupStarterOutcome::MaxNumAttempts => String::from(
            "We've tried sending a confirmation to that address a few times \
             already without luck, so we're going to stop here.",
        ),
    };
    Ok(Custom(Status::Ok, message))
}
