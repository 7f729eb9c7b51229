use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::account::ports::AccountRepository;
use crate::domain::identity::models::FilterOutcome;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that runs the authentication filter once per request.
///
/// Requests without bearer credentials pass through untouched. A verified
/// identity is stored in the request extensions, where handlers read it with
/// `Extension<AuthenticatedIdentity>`. Every rejection gets the same 401.
pub async fn authenticate<R: AccountRepository>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Response {
    let authorization = req.headers().get(header::AUTHORIZATION).cloned();

    let outcome = state
        .authentication_filter
        .authenticate(authorization.as_ref().map(|value| value.as_bytes()))
        .await;

    match outcome {
        FilterOutcome::Anonymous => next.run(req).await,
        FilterOutcome::Authenticated(identity) => {
            tracing::debug!(principal = %identity.principal(), "Request authenticated");
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        FilterOutcome::Rejected(reason) => {
            tracing::warn!(
                reason = %reason,
                method = %req.method(),
                uri = %req.uri(),
                "Request authentication rejected"
            );
            ApiError::unauthorized().into_response()
        }
    }
}
