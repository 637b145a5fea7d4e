//! Request handlers for the development server.
//!
//! - `GET /_router/routes`: flattened route table as JSON
//! - `GET /_router/resolve?location=...`: resolve without navigating
//! - anything else: history-mode fallback serving the HTML shell
//!
//! `location` on the resolve endpoint is an app path such as
//! `/admin/users?page=2`. Neither the base nor the history mode is applied,
//! matching `view-router resolve`. Only the shell fallback strips the base,
//! because it receives browser request paths.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::navigation::{HistoryMode, Navigator};
use crate::routing::compose::NOT_FOUND_ROUTE;
use crate::routing::{ResolveError, RouteMatch, RouteSummary};

/// Header naming the route a shell response was served for.
pub const X_ROUTE: &str = "x-route";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub navigator: Arc<Navigator>,
    pub shell: Arc<str>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub location: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// JSON error response for the `/_router` API.
#[derive(Debug)]
pub struct ApiError(ResolveError);

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ResolveError::InvalidLocation { .. } | ResolveError::Params { .. } => {
                StatusCode::BAD_REQUEST
            }
            ResolveError::NoMatch(_) | ResolveError::UnknownName(_) => StatusCode::NOT_FOUND,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    Json(state.navigator.tree().routes())
}

pub async fn resolve_route(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<RouteMatch>, ApiError> {
    let route = state.navigator.resolve(&query.location)?;
    Ok(Json(route))
}

/// Serve the shell for any location the route table knows.
pub async fn history_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let location = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    // The browser only ever sends the path part, whatever the history mode.
    let path = HistoryMode::Web.location_to_path(state.navigator.base(), location);

    match state.navigator.resolve(&path) {
        Ok(route) => {
            let status = if route.name.as_deref() == Some(NOT_FOUND_ROUTE) {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            tracing::debug!(
                location = %location,
                route = route.name.as_deref().unwrap_or("-"),
                section = %route.section,
                "Serving shell"
            );
            shell_response(&state.shell, status, &route)
        }
        Err(e) => {
            tracing::debug!(location = %location, error = %e, "No route for location");
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                e.to_string(),
            )
                .into_response()
        }
    }
}

fn shell_response(shell: &str, status: StatusCode, route: &RouteMatch) -> Response {
    let mut response = (status, Html(shell.to_string())).into_response();
    let label = route
        .name
        .clone()
        .or_else(|| route.matched.last().map(|r| r.path.clone()));
    if let Some(value) = label.and_then(|l| HeaderValue::from_str(&l).ok()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(X_ROUTE), value);
    }
    response
}
