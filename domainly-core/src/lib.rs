//! Core library for Domainly
//!
//! Owns the managed domain records, their persistent store, the parent/child
//! hierarchy, the hosts-file model, and the shared error type. The nginx
//! configuration parser and generator live in `domainly-config`.

pub mod domain;
pub mod error;
pub mod hierarchy;
pub mod hosts;
pub mod settings;
pub mod store;

pub use domain::{DomainForm, DomainRecord, DEFAULT_HTTP_PORT, LOOPBACK_ADDR};
pub use error::{Error, Result};
pub use hierarchy::HierarchyIndex;
pub use settings::Settings;
pub use store::DomainStore;
