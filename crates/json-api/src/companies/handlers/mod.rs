//! Company Handlers

pub(crate) mod dashboard;
pub(crate) mod index;
pub(crate) mod toggle_status;
