#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;

pub mod bound_port;
pub mod catchers;
pub mod commands;
pub mod configuration;
pub mod domain;
pub mod mail;
pub mod models;
pub mod newsletter;
pub mod render;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod telemetry;
