//! Business logic services for the application layer.

pub mod auth_service;
pub mod redirect_service;
pub mod short_url_service;

pub use auth_service::AuthService;
pub use redirect_service::{DEFAULT_REDIRECT_TTL, RedirectService};
pub use short_url_service::ShortUrlService;
