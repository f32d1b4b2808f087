use std::sync::Arc;

use anyhow::Context;
use rocket::{Build, Ignite, Rocket};
use rocket_sync_db_pools::database;

use crate::bound_port;
use crate::bound_port::BoundPort;
use crate::catchers::*;
use crate::configuration::Settings;
use crate::mail::MailApi;
use crate::newsletter;
use crate::render::Renderer;
use crate::routes::*;

#[database("signup")]
pub struct SignupDbConn(diesel::PgConnection);

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: BoundPort,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        mail_api: Arc<dyn MailApi>,
    ) -> Result<Application, anyhow::Error> {
        let meta = newsletter::meta_for(
            &configuration.mail.domain,
            &configuration.mail.newsletter_id,
        )?;
        let renderer = Arc::new(Renderer::new(
            &configuration.application.templates_glob,
            meta.clone(),
            configuration.application.base_url.clone(),
        )?);

        let (port_reporter, port) = bound_port::pair();

        let server = rocket(configuration)
            .attach(port_reporter)
            .manage(mail_api)
            .manage(renderer)
            .manage(meta)
            .manage(configuration.mail.clone())
            .ignite()
            .await
            .context("Failed to ignite the Rocket application")?;

        Ok(Application { server, port })
    }
}

fn rocket(configuration: &Settings) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", configuration.application.port.unwrap_or(0)))
        .merge(("address", configuration.application.host))
        .merge((
            "databases.signup",
            rocket_sync_db_pools::Config {
                url: configuration.database.connection_string(),
                pool_size: 10,
                timeout: 5,
            },
        ));

    rocket::custom(figment)
        .attach(SignupDbConn::fairing())
        .mount("/", routes![health_check::health_check, start_signup, finish_signup])
        .register("/", catchers![unprocessable_entity_to_bad_request])
}
