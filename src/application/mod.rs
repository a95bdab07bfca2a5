//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin CLI
//! a narrow API.
//!
//! # Available Services
//!
//! - [`services::short_url_service::ShortUrlService`] - Create, list and delete short URLs
//! - [`services::redirect_service::RedirectService`] - Cached short code resolution
//! - [`services::auth_service::AuthService`] - API token issuance and authentication

pub mod services;
