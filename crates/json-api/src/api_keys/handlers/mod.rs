//! API Key Handlers

pub(crate) mod generate;
pub(crate) mod show;
pub(crate) mod validate;
