use anyhow::Context;
use chrono::Utc;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::configuration::MailSettings;
use crate::mail::{MailApi, SendMessageParams};

const MAILGUN_API_BASE: &str = "https://api.mailgun.net/v3";

/// [`MailApi`] implementation backed by Mailgun's HTTP API.
pub struct MailgunClient {
    api_key: Secret<String>,
    domain: String,
    timeout: Duration,
}

impl MailgunClient {
    pub fn new(settings: &MailSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            domain: settings.domain.clone(),
            timeout: Duration::from_secs(10),
        }
    }

    // Mediators run on the database pool's worker threads, so a blocking
    // client is appropriate here. It must be constructed on those threads
    // too: reqwest's blocking client may not live on the async runtime.
    fn http_client(&self) -> Result<reqwest::blocking::Client, anyhow::Error> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client for Mailgun")
    }
}

impl MailApi for MailgunClient {
    #[tracing::instrument(name = "Add a member to the mailing list", skip(self))]
    fn add_member(&self, list_address: &str, email: &str) -> Result<(), anyhow::Error> {
        let url = format!("{}/lists/{}/members", MAILGUN_API_BASE, list_address);
        let response = self
            .http_client()?
            .post(&url)
            .basic_auth("api", Some(self.api_key.expose_secret()))
            .form(&[
                ("address", email),
                // Re-adding an existing member is a no-op instead of an error.
                ("upsert", "yes"),
                (
                    "vars",
                    &serde_json::json!({
                        "newsletter-signup": true,
                        "newsletter-signup-timestamp": Utc::now().to_rfc3339(),
                    })
                    .to_string(),
                ),
            ])
            .send()
            .context("Failed to issue member-add request to Mailgun")?;
        interpret_response(response).context("Mailgun rejected the member-add request")
    }

    #[tracing::instrument(
        name = "Send a message through Mailgun",
        skip(self, params),
        fields(recipient = %params.recipient)
    )]
    fn send_message(&self, params: &SendMessageParams) -> Result<(), anyhow::Error> {
        let url = format!("{}/{}/messages", MAILGUN_API_BASE, self.domain);
        let from = format!("{} <{}>", params.newsletter_name, params.list_address);
        let response = self
            .http_client()?
            .post(&url)
            .basic_auth("api", Some(self.api_key.expose_secret()))
            .form(&[
                ("from", from.as_str()),
                ("to", params.recipient.as_str()),
                ("subject", params.subject.as_str()),
                ("text", params.contents_plain.as_str()),
                ("html", params.contents_html.as_str()),
                ("h:Reply-To", params.reply_to.as_str()),
            ])
            .send()
            .context("Failed to issue send-message request to Mailgun")?;
        interpret_response(response).context("Mailgun rejected the send-message request")
    }
}

fn interpret_response(response: reqwest::blocking::Response) -> Result<(), anyhow::Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().unwrap_or_else(|_| "(empty)".to_string());
    Err(anyhow::anyhow!(
        "got unexpected status code {} from Mailgun: {}",
        status,
        body
    ))
}
