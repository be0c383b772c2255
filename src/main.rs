use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::backend::BookingBackend;
use crate::calendar::WorkingCalendar;
use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::engine::AvailabilityEngine;
use crate::http::create_app;
use crate::local_bookings::LocalBookings;

mod backend;
mod calendar;
mod configuration;
mod configuration_handler;
mod engine;
mod error;
mod http;
mod local_bookings;
mod locale;
#[cfg(test)]
mod testutils;
mod types;

#[derive(Clone)]
pub struct AppState<T: BookingBackend> {
    backend: T,
    engine: Arc<AvailabilityEngine>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let engine_config = match configuration.engine_config() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "refusing to start with malformed configuration");
            std::process::exit(1);
        }
    };
    let engine = match AvailabilityEngine::new(engine_config, WorkingCalendar::italian()) {
        Ok(engine) => Arc::new(engine),
        Err(err) => {
            error!(%err, "refusing to start with malformed configuration");
            std::process::exit(1);
        }
    };

    let backend = LocalBookings::default();
    if let Some(doctor_id) = configuration.demo_doctor_id() {
        backend.seed_example_bookings(doctor_id);
    }

    let address = format!("0.0.0.0:{}", configuration.port());
    info!(%address, "appointment availability service listening");
    let listener = tokio::net::TcpListener::bind(address).await.unwrap();

    let app = create_app(backend, engine);
    axum::serve(listener, app).await.unwrap();
}
