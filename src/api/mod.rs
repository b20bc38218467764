// ============================================================================
// HTTP API
// ============================================================================
//
//   GET  /                     liveness text
//   POST /api/order            JSON order envelope
//   POST /api/order/process    urlencoded form, envelope in `orderData`
//   GET  /api/order            all orders
//   GET  /api/order/stream     live order events (text/event-stream)
//   GET  /api/order/{id}       single order
//
// ============================================================================

mod notifications;
mod orders;

use actix_cors::Cors;
use actix_web::error::UrlencodedError;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::order::OrderError;

/// Largest order body accepted, JSON or form encoded.
pub const ORDER_PAYLOAD_LIMIT: usize = 256 * 1024;

/// Cross-origin policy for the storefront at `client_url`. Credentials are
/// allowed, so the origin is always explicit.
pub fn cors(client_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(client_url)
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api/order")
            .app_data(web::PayloadConfig::new(ORDER_PAYLOAD_LIMIT))
            .app_data(
                web::FormConfig::default()
                    .limit(ORDER_PAYLOAD_LIMIT)
                    .error_handler(|err, _req| match err {
                        UrlencodedError::Overflow { limit, .. } => {
                            OrderError::PayloadTooLarge { limit }.into()
                        }
                        other => OrderError::InvalidInput(format!("invalid orderData form: {}", other)).into(),
                    }),
            )
            .route("", web::post().to(orders::submit_order))
            .route("", web::get().to(orders::list_orders))
            .route("/process", web::post().to(orders::process_order))
            // must precede the {id} route
            .route("/stream", web::get().to(notifications::order_stream))
            .route("/{id}", web::get().to(orders::get_order)),
    );
}

async fn index() -> &'static str {
    "Server is running!"
}

impl ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            OrderError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            OrderError::CustomerNotFound | OrderError::OrderNotFound => StatusCode::NOT_FOUND,
            OrderError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use std::sync::Arc;

    use crate::actors::{BroadcasterHandle, NotificationBroadcaster};
    use crate::domain::identity::{AccountRole, IdentityResolver};
    use crate::domain::order::OrderIntake;
    use crate::metrics::Metrics;
    use crate::store::{InMemoryIdentityStore, InMemoryOrderRepository};

    pub struct TestState {
        pub intake: web::Data<OrderIntake>,
        pub broadcaster: web::Data<BroadcasterHandle>,
    }

    /// In-memory wiring with one known customer, `u1` = Alice.
    /// Must run inside an actix system.
    pub async fn app_state() -> TestState {
        let metrics = Arc::new(Metrics::new().unwrap());
        let addr = NotificationBroadcaster::new(8, 64, metrics.clone()).spawn();
        let broadcaster = BroadcasterHandle::new(addr, metrics.clone());

        let accounts = Arc::new(InMemoryIdentityStore::new());
        accounts.insert("u1", "Alice", AccountRole::Customer).await;

        let intake = OrderIntake::new(
            IdentityResolver::new(accounts),
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(broadcaster.clone()),
            metrics,
        );

        TestState {
            intake: web::Data::new(intake),
            broadcaster: web::Data::new(broadcaster),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::app_state;
    use super::*;
    use crate::store::RepositoryError;
    use actix_web::http::Method;
    use actix_web::{test, App};

    const STOREFRONT: &str = "http://localhost:5173";

    #[actix_web::test]
    async fn test_index() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(&body[..], b"Server is running!");
    }

    #[actix_web::test]
    async fn test_error_status_codes() {
        assert_eq!(
            OrderError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(OrderError::CustomerNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            OrderError::PayloadTooLarge { limit: 16 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            OrderError::Persistence(RepositoryError::Storage("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_persistence_error_body_hides_details() {
        let err = OrderError::Persistence(RepositoryError::Storage("node 10.0.0.3 timed out".into()));
        let resp = err.error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["message"], "Error processing order");
        assert!(!body.to_string().contains("10.0.0.3"));
    }

    #[actix_web::test]
    async fn test_preflight_from_storefront_is_allowed() {
        let app = test::init_service(App::new().wrap(cors(STOREFRONT)).configure(configure)).await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/order")
            .insert_header((header::ORIGIN, STOREFRONT))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let headers = resp.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap().to_str().unwrap(),
            STOREFRONT
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap().to_str().unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn test_preflight_from_other_origin_is_refused() {
        let app = test::init_service(App::new().wrap(cors(STOREFRONT)).configure(configure)).await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/order")
            .insert_header((header::ORIGIN, "http://evil.example"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_client_error());
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[actix_web::test]
    async fn test_order_submission_carries_cors_headers() {
        let state = app_state().await;
        let app = test::init_service(
            App::new()
                .wrap(cors(STOREFRONT))
                .app_data(state.intake.clone())
                .app_data(state.broadcaster.clone())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/order")
            .insert_header((header::ORIGIN, STOREFRONT))
            .set_json(json!({
                "customer": "u1",
                "vendor": "v1",
                "costEstimate": 1,
                "items": [{}]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap().to_str().unwrap(),
            STOREFRONT
        );

        let req = test::TestRequest::get()
            .uri("/api/order")
            .insert_header((header::ORIGIN, STOREFRONT))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
