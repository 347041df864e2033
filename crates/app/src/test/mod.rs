//! Shared test support.


pub(crate) use context::TestContext;
pub(crate) use memory::{MemoryApiKeyCache, MemoryCompaniesRepository};
