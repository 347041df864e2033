//! Session Handlers

pub(crate) mod github;
pub(crate) mod login;
pub(crate) mod register;
