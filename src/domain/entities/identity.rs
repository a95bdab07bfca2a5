//! Identity of an authenticated caller.

/// The user a request was authenticated as.
///
/// Inserted into request extensions by the authentication middleware; the
/// `owner` value is what short URLs are recorded and filtered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub owner: String,
}

impl CurrentUser {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}
