//! Change Password Handler

use std::sync::Arc;

use keyhold_app::auth::PasswordChange;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::{errors::ApiError, extensions::*, state::State};

/// Change Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,

    /// At least six characters
    #[serde(default)]
    pub new_password: String,
}

impl From<ChangePasswordRequest> for PasswordChange {
    fn from(request: ChangePasswordRequest) -> Self {
        PasswordChange {
            current_password: request.current_password,
            new_password: request.new_password,
        }
    }
}

/// Change Password Handler
#[endpoint(
    tags("settings"),
    summary = "Change Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Password updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing fields, short password, or no password set"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Current password is wrong"),
        (status_code = StatusCode::NOT_FOUND, description = "Company not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ChangePasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let company = depot.company_uuid_or_401()?;

    state
        .app
        .auth
        .change_password(company, json.into_inner().into())
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
