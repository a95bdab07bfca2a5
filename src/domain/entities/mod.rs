//! Core domain entities.
//!
//! - [`ShortUrl`] - A short code owned by a user, resolving to a long URL
//! - [`NewShortUrl`] - Input for creating a record
//! - [`Insertion`] - Result of an insert, including cap evictions
//! - [`CurrentUser`] - Authenticated caller identity

pub mod identity;
pub mod short_url;

pub use identity::CurrentUser;
pub use short_url::{Insertion, NewShortUrl, OWNER_URL_CAP, ShortUrl, sort_newest_first};
