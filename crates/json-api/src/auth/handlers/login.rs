//! Login Handler

use std::sync::Arc;

use keyhold_app::auth::Credentials;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{auth::models::SessionResponse, errors::ApiError, extensions::*, state::State};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Credentials {
            email: request.email,
            password: request.password,
        }
    }
}

/// Login Handler
#[endpoint(
    tags("auth"),
    summary = "Password Login",
    responses(
        (status_code = StatusCode::OK, description = "Signed in"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing fields"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let grant = state.app.auth.login(json.into_inner().into()).await?;

    Ok(Json(SessionResponse::new("Login successful", grant)))
}
