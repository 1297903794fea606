pub mod error;
pub mod model;
pub mod service;

#[rustfmt::skip]
pub use self::error::{ApiErrorDetail, Error, ErrorKind, Result};
