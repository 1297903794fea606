pub mod entity;
mod resource;
pub mod vo;

#[rustfmt::skip]
pub use self::resource::{Filter, Patch, Resource, Validate};
