//! Shared client core for every Watson service.
//!
//! Service clients (see [`crate::classifier`], [`crate::alchemy`]) are thin
//! wrappers over [`ServiceClient`]; the pieces live in submodules under
//! `src/client/`.

pub mod builder;
pub mod config;
pub mod core;
pub mod dispatch;
pub(crate) mod validation;

pub use builder::ServiceClientBuilder;
pub use config::{Credentials, ServiceConfiguration};
pub use core::{Service, ServiceClient};
pub use dispatch::{Dispatcher, Handler};
