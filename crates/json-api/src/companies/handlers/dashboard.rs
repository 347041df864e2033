//! Dashboard Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{companies::models::DashboardCompany, errors::ApiError, extensions::*, state::State};

/// Dashboard Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DashboardResponse {
    pub company: DashboardCompany,
}

/// Dashboard Handler
#[endpoint(
    tags("companies"),
    summary = "Company Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The authenticated company"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::NOT_FOUND, description = "Company not found"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DashboardResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let company = depot.company_uuid_or_401()?;

    let record = state.app.auth.get_company(company).await?;

    Ok(Json(DashboardResponse {
        company: record.into(),
    }))
}
