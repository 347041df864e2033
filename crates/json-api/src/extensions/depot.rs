//! Depot helper extensions.

use std::any::Any;

use keyhold_app::domain::companies::records::CompanyUuid;
use salvo::prelude::Depot;

use crate::errors::ApiError;

/// Typed depot access for handlers.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    /// Record the company resolved from the bearer token.
    fn insert_company_uuid(&mut self, company: CompanyUuid);

    /// Company resolved by the auth middleware.
    fn company_uuid_or_401(&self) -> Result<CompanyUuid, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_ignored| ApiError::internal())
    }

    fn insert_company_uuid(&mut self, company: CompanyUuid) {
        self.inject(company);
    }

    fn company_uuid_or_401(&self) -> Result<CompanyUuid, ApiError> {
        self.obtain::<CompanyUuid>()
            .copied()
            .map_err(|_ignored| ApiError::unauthorized("Not authenticated"))
    }
}
