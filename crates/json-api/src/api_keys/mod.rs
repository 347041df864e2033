//! API Keys

mod handlers;

pub(crate) use handlers::*;
