//! Companies Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};

use crate::domain::companies::{
    data::NewCompany,
    errors::CompaniesRepositoryError,
    records::{CompanyRecord, CompanyUuid, RotatedApiKey},
};

const CREATE_COMPANY_SQL: &str = include_str!("sql/create_company.sql");
const FIND_COMPANY_SQL: &str = include_str!("sql/find_company.sql");
const FIND_COMPANY_BY_EMAIL_SQL: &str = include_str!("sql/find_company_by_email.sql");
const FIND_COMPANY_BY_API_KEY_SQL: &str = include_str!("sql/find_company_by_api_key.sql");
const LIST_COMPANIES_SQL: &str = include_str!("sql/list_companies.sql");
const ROTATE_API_KEY_SQL: &str = include_str!("sql/rotate_api_key.sql");
const UPDATE_PASSWORD_HASH_SQL: &str = include_str!("sql/update_password_hash.sql");
const UPDATE_NAME_SQL: &str = include_str!("sql/update_name.sql");
const TOGGLE_ACTIVE_SQL: &str = include_str!("sql/toggle_active.sql");

/// Company persistence operations.
///
/// Emails passed in are expected to be normalised already, see
/// [`normalize_email`](crate::domain::companies::normalize_email).
#[automock]
#[async_trait]
pub trait CompaniesRepository: Send + Sync {
    /// Insert a company. A duplicate email yields [`CompaniesRepositoryError::AlreadyExists`].
    async fn create_company(
        &self,
        company: NewCompany,
    ) -> Result<CompanyRecord, CompaniesRepositoryError>;

    async fn find_company(
        &self,
        uuid: CompanyUuid,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError>;

    async fn find_company_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError>;

    async fn find_company_by_api_key(
        &self,
        api_key: &str,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError>;

    /// Replace the API key in one statement, returning both the replaced and the new key.
    async fn rotate_api_key(
        &self,
        uuid: CompanyUuid,
        api_key: String,
    ) -> Result<Option<RotatedApiKey>, CompaniesRepositoryError>;

    /// Returns `false` when no company matched.
    async fn update_password_hash(
        &self,
        uuid: CompanyUuid,
        password_hash: String,
    ) -> Result<bool, CompaniesRepositoryError>;

    async fn update_name(
        &self,
        uuid: CompanyUuid,
        name: String,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError>;

    /// Flip the `active` flag in place.
    async fn toggle_active(
        &self,
        uuid: CompanyUuid,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError>;

    /// All companies, oldest first.
    async fn list_companies(&self) -> Result<Vec<CompanyRecord>, CompaniesRepositoryError>;
}

/// PostgreSQL-backed companies repository.
#[derive(Debug, Clone)]
pub struct PgCompaniesRepository {
    pool: PgPool,
}

impl PgCompaniesRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompaniesRepository for PgCompaniesRepository {
    async fn create_company(
        &self,
        company: NewCompany,
    ) -> Result<CompanyRecord, CompaniesRepositoryError> {
        query_as::<Postgres, CompanyRecord>(CREATE_COMPANY_SQL)
            .bind(company.uuid.into_uuid())
            .bind(company.name)
            .bind(company.email)
            .bind(company.password_hash)
            .bind(company.api_key)
            .bind(company.github_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_company(
        &self,
        uuid: CompanyUuid,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError> {
        query_as::<Postgres, CompanyRecord>(FIND_COMPANY_SQL)
            .bind(uuid.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_company_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError> {
        query_as::<Postgres, CompanyRecord>(FIND_COMPANY_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_company_by_api_key(
        &self,
        api_key: &str,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError> {
        query_as::<Postgres, CompanyRecord>(FIND_COMPANY_BY_API_KEY_SQL)
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn rotate_api_key(
        &self,
        uuid: CompanyUuid,
        api_key: String,
    ) -> Result<Option<RotatedApiKey>, CompaniesRepositoryError> {
        query_as::<Postgres, RotatedApiKey>(ROTATE_API_KEY_SQL)
            .bind(uuid.into_uuid())
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn update_password_hash(
        &self,
        uuid: CompanyUuid,
        password_hash: String,
    ) -> Result<bool, CompaniesRepositoryError> {
        query(UPDATE_PASSWORD_HASH_SQL)
            .bind(uuid.into_uuid())
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(Into::into)
    }

    async fn update_name(
        &self,
        uuid: CompanyUuid,
        name: String,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError> {
        query_as::<Postgres, CompanyRecord>(UPDATE_NAME_SQL)
            .bind(uuid.into_uuid())
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn toggle_active(
        &self,
        uuid: CompanyUuid,
    ) -> Result<Option<CompanyRecord>, CompaniesRepositoryError> {
        query_as::<Postgres, CompanyRecord>(TOGGLE_ACTIVE_SQL)
            .bind(uuid.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn list_companies(&self) -> Result<Vec<CompanyRecord>, CompaniesRepositoryError> {
        query_as::<Postgres, CompanyRecord>(LIST_COMPANIES_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }
}

impl<'r> FromRow<'r, PgRow> for CompanyRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CompanyUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            api_key: row.try_get("api_key")?,
            active: row.try_get("active")?,
            github_id: row.try_get("github_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RotatedApiKey {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            previous: row.try_get("previous_api_key")?,
            current: row.try_get("current_api_key")?,
        })
    }
}
