//! HTML pages for browsers and for `go get`'s meta-tag discovery.
//!
//! Templates live under `templates/` and are compiled in by askama, which
//! HTML-escapes every interpolated value.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::config::SiteConfig;

/// Landing page.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeView<'a> {
    pub hostname: &'a str,
    pub analytics_id: &'a str,
}

impl<'a> HomeView<'a> {
    pub fn new(site: &'a SiteConfig) -> Self {
        Self {
            hostname: &site.hostname,
            analytics_id: &site.analytics_id,
        }
    }
}

/// Human-readable page for one vantage path.
#[derive(Template)]
#[template(path = "package.html")]
pub struct PackageView<'a> {
    pub hostname: &'a str,
    pub path: &'a str,
    pub analytics_id: &'a str,
}

impl<'a> PackageView<'a> {
    pub fn new(site: &'a SiteConfig, path: &'a str) -> Self {
        Self {
            hostname: &site.hostname,
            path,
            analytics_id: &site.analytics_id,
        }
    }
}

/// Page carrying the `go-import` meta tag `go get` reads with `?go-get=1`.
#[derive(Template)]
#[template(path = "go_import.html")]
pub struct GoImportView<'a> {
    pub hostname: &'a str,
    pub path: &'a str,
    pub vcs: &'a str,
    pub analytics_id: &'a str,
}

impl<'a> GoImportView<'a> {
    pub fn new(site: &'a SiteConfig, path: &'a str) -> Self {
        Self {
            hostname: &site.hostname,
            path,
            vcs: &site.vcs,
            analytics_id: &site.analytics_id,
        }
    }
}

/// Render a view, falling back to a bare 500 when the template fails.
pub fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "500 internal server error").into_response()
        }
    }
}
