//! Keyhold credential core: companies, passwords, sessions, API keys, and OAuth federation.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
