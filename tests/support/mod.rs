//! Shared helpers for the mock API tests.

#![allow(dead_code)]

use watson_sdk::auth::CredentialResolver;
use watson_sdk::prelude::*;
use wiremock::MockServer;

/// Options pointing at the mock server with Basic credentials and no
/// environment discovery.
pub fn basic_options(server: &MockServer) -> ServiceOptions {
    ServiceOptions::new()
        .url(format!("{}/api/", server.uri()))
        .basic_auth("user", "pass")
        .credential_resolver(CredentialResolver::empty())
}

/// `Basic base64("user:pass")`
pub const BASIC_USER_PASS: &str = "Basic dXNlcjpwYXNz";

/// PNG signature followed by an IHDR length.
pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// Lossy UTF-8 view of a request body, for multipart assertions.
pub fn body_text(request: &wiremock::Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}
