//! Settings Handlers

pub(crate) mod password;
pub(crate) mod profile;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}
