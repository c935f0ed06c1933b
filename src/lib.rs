pub mod broadcast;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod routes;
pub mod startup;
pub mod subscription_store;
pub mod telemetry;
mod utils;
