//! Account Settings

mod handlers;

pub(crate) use handlers::*;
