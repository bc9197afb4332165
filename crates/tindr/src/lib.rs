//! Async client for the Tinder HTTP API
//!
//! A `Tindr` value is one logical session. It starts unauthenticated;
//! `authenticate` exchanges a Facebook token for a session token, which is
//! then attached as `X-Auth-Token` to every later request made through the
//! same instance.
//!
//! Request flow:
//! 1. A session operation builds a `RequestDescriptor` (method, path, payload)
//! 2. `Executor::configure_options` renders it into URL, headers and form body
//! 3. `Executor::execute` sends it, parses the body as JSON, then checks the status
//! 4. The parsed body (or an `Error`) is returned to the caller unchanged

pub mod constants;
pub mod error;
pub mod form;
pub mod request;
pub mod session;

pub use constants::*;
pub use error::{Error, Result};
pub use request::{Executor, Method, RequestDescriptor, RequestOptions};
pub use session::Tindr;
