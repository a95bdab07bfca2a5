//! Helper functions shared across layers.
//!
//! - [`code_generator`] - Short code and API token generation
//! - [`url_validator`] - Destination URL checks

pub mod code_generator;
pub mod url_validator;
