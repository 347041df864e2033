//! Authentication: bearer middleware, password sessions, and GitHub sign-in.

mod handlers;
pub(crate) mod middleware;
mod models;

pub(crate) use handlers::*;
