//! Authenticated HTTP client
//!
//! This module wraps the portal session used by the crawl, including:
//! - Form-based login
//! - GET/POST with CSRF token propagation
//! - Page reads with optional script rendering

mod form;
mod render;
mod session;

pub use form::{FormMethod, LoginForm, EMAIL_FIELD, LOGIN_FORM_ID, PASSWORD_FIELD};
pub use render::{Renderer, COOKIE_ENV};
pub use session::{
    build_http_client, ensure_success, PortalClient, CSRF_COOKIE, CSRF_FIELD, CSRF_HEADER,
};
