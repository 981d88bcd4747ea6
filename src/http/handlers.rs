//! Endpoint handlers.

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::response::GatewayError;
use crate::http::{pages, server::AppState};
use crate::protocol::rewrite_default_branch;
use crate::resolve::fetcher::{upload_pack_url, UPLOAD_PACK_SERVICE};
use crate::routing::{match_route, GatewayRoute, RouteError};

pub const ADVERTISEMENT_CONTENT_TYPE: &str = "application/x-git-upload-pack-advertisement";

/// Query parameters any endpoint may read.
///
/// A key given more than once keeps its first value; unknown keys are
/// ignored.
#[derive(Debug, Default, PartialEq)]
pub struct GatewayQuery {
    pub service: Option<String>,
    pub go_get: Option<String>,
}

impl GatewayQuery {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw else {
            return query;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "service" => &mut query.service,
                "go-get" => &mut query.go_get,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

/// Entry point for every request.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let query = GatewayQuery::parse(raw_query.as_deref());
    let request_id = request_id(&headers);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        "Handling request"
    );

    let result = match match_route(&method, uri.path()) {
        Ok(GatewayRoute::Home) => Ok(home(&state)),
        Ok(GatewayRoute::Package(pkg)) => Ok(package(&state, pkg, &query)),
        Ok(GatewayRoute::Discovery(pkg)) => git_service(&state, pkg, &query).await,
        Ok(GatewayRoute::UploadPack(pkg)) => git_upload_pack(&state, pkg).await,
        Err(RouteError::NotFound) => Err(GatewayError::NotFound),
        Err(RouteError::MethodNotAllowed) => Err(GatewayError::MethodNotAllowed),
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Request rejected");
            e.into_response()
        }
    }
}

fn home(state: &AppState) -> Response {
    pages::render_template(pages::HomeView::new(&state.site))
}

fn package(state: &AppState, pkg: &str, query: &GatewayQuery) -> Response {
    if query.go_get.as_deref() == Some("1") {
        return pages::render_template(pages::GoImportView::new(&state.site, pkg));
    }
    pages::render_template(pages::PackageView::new(&state.site, pkg))
}

/// `GET /{pkg}/info/refs?service=git-upload-pack`
///
/// Serves the upstream advertisement with `refs/heads/master` repointed at
/// the resolved version, so `go get` checks out that commit.
pub async fn git_service(
    state: &AppState,
    pkg: &str,
    query: &GatewayQuery,
) -> Result<Response, GatewayError> {
    match query.service.as_deref() {
        Some(UPLOAD_PACK_SERVICE) => {}
        other => {
            return Err(GatewayError::UnsupportedService(
                other.unwrap_or_default().to_string(),
            ))
        }
    }

    let resolved = state.resolver.resolve(pkg).await?;
    let body = rewrite_default_branch(&resolved.advertisement, &resolved.reference)?;

    Ok((
        [
            (header::CONTENT_TYPE, ADVERTISEMENT_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from(body),
    )
        .into_response())
}

/// `POST /{pkg}/git-upload-pack`
///
/// Pack negotiation happens directly with the upstream host.
pub async fn git_upload_pack(state: &AppState, pkg: &str) -> Result<Response, GatewayError> {
    let resolved = state.resolver.resolve(pkg).await?;

    // A base path that resolved upstream always forms a valid URL.
    let location = upload_pack_url(&state.upstream_scheme, &resolved.base_path)
        .map_err(|_| GatewayError::NotFound)?;

    tracing::debug!(location = %location, "Redirecting upload-pack");
    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response())
}
