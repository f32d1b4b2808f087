use std::sync::Arc;

use newsletter_signup::configuration::get_configuration;
use newsletter_signup::mail::{FakeMailClient, MailApi, MailgunClient};
use newsletter_signup::startup::Application;
use newsletter_signup::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("newsletter-signup".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");

    let mail_api: Arc<dyn MailApi> = if configuration.mail.deliver {
        Arc::new(MailgunClient::new(&configuration.mail))
    } else {
        tracing::warn!("Mail delivery is disabled; using the recording fake client");
        Arc::new(FakeMailClient::new())
    };

    let application = Application::build(&configuration, mail_api).await?;
    application.server.launch().await?;
    Ok(())
}
