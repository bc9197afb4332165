//! Tinder API constants
//!
//! Fixed by the remote service contract; authenticated calls fail unless the
//! header name matches exactly.

/// Base URL every endpoint path is appended to
pub const BASE_URL: &str = "https://api.gotinder.com";

/// Header carrying the session token on authenticated calls
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Content type announced on every request, including form-encoded POSTs
pub const CONTENT_TYPE_JSON: &str = "application/json";
