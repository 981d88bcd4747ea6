//! Route matching logic.
//!
//! Routes, in order:
//! - `GET  /{pkg}/info/refs`
//! - `POST /{pkg}/git-upload-pack`
//! - `GET  /{pkg}`
//! - `GET  /`

use axum::http::Method;

const INFO_REFS_SUFFIX: &str = "/info/refs";
const UPLOAD_PACK_SUFFIX: &str = "/git-upload-pack";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayRoute<'a> {
    Home,
    Package(&'a str),
    Discovery(&'a str),
    UploadPack(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    NotFound,
    MethodNotAllowed,
}

pub fn match_route<'a>(method: &Method, path: &'a str) -> Result<GatewayRoute<'a>, RouteError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(RouteError::NotFound);
    };

    if rest.is_empty() {
        return if method == Method::GET {
            Ok(GatewayRoute::Home)
        } else {
            Err(RouteError::MethodNotAllowed)
        };
    }

    if method == Method::GET {
        if let Some(pkg) = package_before(rest, INFO_REFS_SUFFIX) {
            return Ok(GatewayRoute::Discovery(pkg));
        }
        return Ok(GatewayRoute::Package(rest));
    }

    if method == Method::POST {
        if let Some(pkg) = package_before(rest, UPLOAD_PACK_SUFFIX) {
            return Ok(GatewayRoute::UploadPack(pkg));
        }
    }

    Err(RouteError::MethodNotAllowed)
}

fn package_before<'a>(rest: &'a str, suffix: &str) -> Option<&'a str> {
    rest.strip_suffix(suffix).filter(|pkg| !pkg.is_empty())
}

/// Low-cardinality label for metrics.
pub fn route_label(method: &Method, path: &str) -> &'static str {
    match match_route(method, path) {
        Ok(GatewayRoute::Home) => "home",
        Ok(GatewayRoute::Package(_)) => "package",
        Ok(GatewayRoute::Discovery(_)) => "info_refs",
        Ok(GatewayRoute::UploadPack(_)) => "upload_pack",
        Err(_) => "none",
    }
}
