//! DTOs for the API route listing.

use serde::Serialize;

/// One documented endpoint.
#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub auth: bool,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ApiIndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub routes: Vec<RouteInfo>,
}
