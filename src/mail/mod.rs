mod mailgun;

use std::sync::Mutex;

pub use mailgun::MailgunClient;

/// Everything a signup needs from a mailing service: the ability to add a
/// confirmed member to a list, and to send a single message. Implemented by
/// [`MailgunClient`] for real delivery and by [`FakeMailClient`] for
/// development and tests.
pub trait MailApi: Send + Sync {
    /// Adds a member to a mailing list. Adding an address that is already on
    /// the list is a no-op at the provider, so this is safe to repeat.
    fn add_member(&self, list_address: &str, email: &str) -> Result<(), anyhow::Error>;

    /// Sends a single message to one recipient.
    fn send_message(&self, params: &SendMessageParams) -> Result<(), anyhow::Error>;
}

pub struct SendMessageParams {
    pub contents_html: String,
    pub contents_plain: String,
    pub list_address: String,
    pub newsletter_name: String,
    pub recipient: String,
    pub reply_to: String,
    pub subject: String,
}

/// Records mail calls in memory so tests can verify that they were (or were
/// not) made without any network I/O.
#[derive(Default)]
pub struct FakeMailClient {
    pub members_added: Mutex<Vec<MemberAdded>>,
    pub messages_sent: Mutex<Vec<MessageSent>>,
}

#[derive(Clone, Debug)]
pub struct MemberAdded {
    pub list_address: String,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct MessageSent {
    pub recipient: String,
    pub subject: String,
    pub contents_plain: String,
    pub contents_html: String,
}

impl FakeMailClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MailApi for FakeMailClient {
    fn add_member(&self, list_address: &str, email: &str) -> Result<(), anyhow::Error> {
        self.members_added.lock().unwrap().push(MemberAdded {
            list_address: list_address.to_string(),
            email: email.to_string(),
        });
        Ok(())
    }

    fn send_message(&self, params: &SendMessageParams) -> Result<(), anyhow::Error> {
        self.messages_sent.lock().unwrap().push(MessageSent {
            recipient: params.recipient.clone(),
            subject: params.subject.clone(),
            contents_plain: params.contents_plain.clone(),
            contents_html: params.contents_html.clone(),
        });
        Ok(())
    }
}
