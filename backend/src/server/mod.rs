//! Server construction and route wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, Scope, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::appointments::{
    appointment_document, appointment_letter, approve_appointment, clear_notification,
    create_appointment, list_appointments, remove_appointment,
};
use crate::inbound::http::bills::{bill_document, create_bill, list_bills, pay_bill};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::messages::{list_messages, send_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::treatments::{create_treatment, list_treatments};
use crate::inbound::http::users::{
    list_doctors, list_patients, list_staff, login, me, my_patients, register,
};
use crate::middleware::Trace;

/// The full `/api/v1` surface. Shared between the server factory and the
/// handler tests so both exercise identical routing.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(list_patients)
        .service(list_doctors)
        .service(list_staff)
        .service(my_patients)
        .service(me)
        .service(create_appointment)
        .service(list_appointments)
        .service(approve_appointment)
        .service(remove_appointment)
        .service(clear_notification)
        .service(appointment_letter)
        .service(appointment_document)
        .service(create_treatment)
        .service(list_treatments)
        .service(send_message)
        .service(list_messages)
        .service(create_bill)
        .service(list_bills)
        .service(pay_bill)
        .service(bill_document)
}

/// Construct an Actix HTTP server over in-memory ledgers.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(HttpState::in_memory(&config.secret));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .service(api_scope())
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run();

    health_state.mark_ready();
    Ok(server)
}
