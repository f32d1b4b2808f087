use diesel::prelude::*;
use diesel::{Connection, PgConnection};
use newsletter_signup::configuration::{get_configuration, Settings};
use newsletter_signup::mail::FakeMailClient;
use newsletter_signup::startup::Application;
use newsletter_signup::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use std::sync::Arc;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db_connection: PgConnection,
    pub mail_api: Arc<FakeMailClient>,
}

impl TestApp {
    pub async fn post_signup(&self, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/signup", &self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Extracts the confirmation link from the most recently recorded
    /// message, pointed at the test server's port.
    pub fn confirmation_link(&self) -> reqwest::Url {
        let messages = self.mail_api.messages_sent.lock().unwrap();
        let message = messages.last().expect("No messages were sent.");

        let links: Vec<_> = linkify::LinkFinder::new()
            .links(&message.contents_plain)
            .filter(|l| *l.kind() == linkify::LinkKind::Url)
            .collect();
        assert_eq!(links.len(), 1);

        let mut link = reqwest::Url::parse(links[0].as_str()).unwrap();
        assert_eq!(link.host_str().unwrap(), "127.0.0.1");
        link.set_port(Some(self.port)).unwrap();
        link
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.database.database_name = Uuid::new_v4().to_string();
        c
    };

    let db_connection = setup_database(&configuration);

    let mail_api = Arc::new(FakeMailClient::new());
    let app = Application::build(&configuration, mail_api.clone())
        .await
        .unwrap();
    let _ = tokio::spawn(app.server.launch());

    let port = app.port.get().await;
    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        db_connection,
        mail_api,
    }
}

fn setup_database(configuration: &Settings) -> PgConnection {
    let connection_string = configuration.database.connection_string_without_database();
    let connection =
        PgConnection::establish(&connection_string).expect("Failed to connect to Postgres.");

    diesel::sql_query(format!(
        "CREATE DATABASE \"{}\"",
        configuration.database.database_name
    ))
    .execute(&connection)
    .unwrap();

    let connection_string = configuration.database.connection_string();
    let connection =
        PgConnection::establish(&connection_string).expect("Failed to connect to Postgres.");

    diesel_migrations::run_pending_migrations(&connection).unwrap();
    connection
}
