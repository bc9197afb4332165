//! Types shared by the tindr client library and its command-line front end

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
