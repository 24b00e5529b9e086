//! Liveness and readiness probes for orchestration and load balancers.

use actix_web::{HttpResponse, get, http::header, web};
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared probe state. Starts live but not ready; the server marks
/// itself ready once it is bound and listening.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready to receive traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe. 200 once the server can handle traffic, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. 200 while the process is alive, 503 once draining.
/// Call [`HealthState::mark_unhealthy`] before graceful shutdown.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::App;
    use rstest::rstest;

    #[rstest]
    #[actix_web::test]
    async fn readiness_flips_with_mark_ready() {
        let state = web::Data::new(HealthState::new());
        let app =
            actix_test::init_service(App::new().app_data(state.clone()).service(ready)).await;

        let before = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            before.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-store".as_slice())
        );

        state.mark_ready();
        let after = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(after.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_fails_after_mark_unhealthy() {
        let state = web::Data::new(HealthState::new());
        let app = actix_test::init_service(App::new().app_data(state.clone()).service(live)).await;

        let before = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(before.status(), StatusCode::OK);

        state.mark_unhealthy();
        let after = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(after.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
