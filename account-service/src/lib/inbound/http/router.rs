use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_account::current_account;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::service::CredentialService;
use crate::domain::identity::filter::AuthenticationFilter;

pub struct AppState<R>
where
    R: AccountRepository,
{
    pub credential_service: Arc<CredentialService<R>>,
    pub authentication_filter: Arc<AuthenticationFilter<R>>,
}

impl<R> Clone for AppState<R>
where
    R: AccountRepository,
{
    fn clone(&self) -> Self {
        Self {
            credential_service: Arc::clone(&self.credential_service),
            authentication_filter: Arc::clone(&self.authentication_filter),
        }
    }
}

pub fn create_router<R>(
    credential_service: Arc<CredentialService<R>>,
    authentication_filter: Arc<AuthenticationFilter<R>>,
) -> Router
where
    R: AccountRepository,
{
    let state = AppState {
        credential_service,
        authentication_filter,
    };

    let routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(register::<R>))
        .route("/api/auth/login", post(login::<R>))
        .route("/api/accounts/me", get(current_account))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<R>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    routes
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
