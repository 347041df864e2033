//! Just-in-time provisioning and account linking for federated logins.

use std::{sync::Arc, time::Duration};

use tracing::{error, info};

use crate::{
    auth::{
        AuthServiceError, ResultExt as _,
        api_keys::{ApiKeyManager, generate_api_key},
        oauth::{FederationError, ProviderProfile},
        timeouts::bounded,
    },
    domain::companies::{
        CompaniesRepository, CompaniesRepositoryError,
        data::NewCompany,
        normalize_email,
        records::{CompanyRecord, CompanyUuid},
    },
};

/// Resolves a provider profile to exactly one local company per email.
#[derive(Clone)]
pub struct FederationAdapter {
    companies: Arc<dyn CompaniesRepository>,
    api_keys: ApiKeyManager,
    store_timeout: Duration,
}

impl FederationAdapter {
    #[must_use]
    pub fn new(
        companies: Arc<dyn CompaniesRepository>,
        api_keys: ApiKeyManager,
        store_timeout: Duration,
    ) -> Self {
        Self {
            companies,
            api_keys,
            store_timeout,
        }
    }

    /// Find the company for `profile`, provisioning one on first sight.
    ///
    /// Returning users are left untouched apart from a refreshed cache mirror. When a
    /// concurrent callback wins the insert race, the lookup is retried once and the winner's
    /// row is returned.
    ///
    /// # Errors
    ///
    /// [`FederationError::NoEmail`] when the profile has no usable email, or
    /// [`AuthServiceError::ServiceUnavailable`] when the store fails.
    pub async fn resolve(
        &self,
        profile: &ProviderProfile,
    ) -> Result<CompanyRecord, AuthServiceError> {
        let email = profile
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty())
            .ok_or(FederationError::NoEmail)?;

        if let Some(existing) = self.find_by_email(&email).await? {
            self.api_keys.mirror(&existing.api_key, existing.uuid).await;

            return Ok(existing);
        }

        let new_company = NewCompany {
            uuid: CompanyUuid::new(),
            name: profile.company_name(),
            email: email.clone(),
            password_hash: None,
            api_key: generate_api_key(),
            github_id: Some(profile.provider_id.clone()),
        };

        let created = bounded(
            self.store_timeout,
            "create_company",
            self.companies.create_company(new_company),
        )
        .await?;

        let company = match created {
            Ok(company) => {
                info!(company = %company.uuid, "provisioned company from federated login");

                company
            }
            Err(CompaniesRepositoryError::AlreadyExists) => {
                self.find_by_email(&email).await?.ok_or_else(|| {
                    error!("federated insert conflicted but no company holds the email");

                    AuthServiceError::ServiceUnavailable
                })?
            }
            Err(source) => return Err(source).or_unavailable("failed to provision company"),
        };

        self.api_keys.mirror(&company.api_key, company.uuid).await;

        Ok(company)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CompanyRecord>, AuthServiceError> {
        bounded(
            self.store_timeout,
            "find_company_by_email",
            self.companies.find_company_by_email(email),
        )
        .await?
        .or_unavailable("failed to look up company by email")
    }
}

impl std::fmt::Debug for FederationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FederationAdapter")
            .field("api_keys", &self.api_keys)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jiff::Timestamp;
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::{domain::companies::MockCompaniesRepository, test::MemoryCompaniesRepository};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn profile(email: Option<&str>) -> ProviderProfile {
        ProviderProfile {
            provider_id: "583231".to_string(),
            email: email.map(str::to_string),
            display_name: Some("The Octocat".to_string()),
            login: "octocat".to_string(),
        }
    }

    fn adapter(companies: Arc<dyn CompaniesRepository>) -> FederationAdapter {
        let api_keys = ApiKeyManager::new(companies.clone(), None, TIMEOUT);

        FederationAdapter::new(companies, api_keys, TIMEOUT)
    }

    fn record(email: &str) -> CompanyRecord {
        CompanyRecord {
            uuid: CompanyUuid::new(),
            name: "Winner".to_string(),
            email: email.to_string(),
            password_hash: None,
            api_key: "ak_winner".to_string(),
            active: true,
            github_id: Some("583231".to_string()),
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let companies = Arc::new(MemoryCompaniesRepository::default());

        let result = adapter(companies.clone()).resolve(&profile(None)).await;

        assert!(matches!(
            result,
            Err(AuthServiceError::Federation(FederationError::NoEmail))
        ));
        assert!(companies.is_empty());
    }

    #[tokio::test]
    async fn first_sight_provisions_without_password() -> TestResult {
        let companies = Arc::new(MemoryCompaniesRepository::default());

        let company = adapter(companies.clone())
            .resolve(&profile(Some("Octo@X.com")))
            .await?;

        assert_eq!(company.email, "octo@x.com");
        assert_eq!(company.name, "The Octocat");
        assert_eq!(company.github_id.as_deref(), Some("583231"));
        assert!(!company.has_password());
        assert!(company.api_key.starts_with("ak_"));

        Ok(())
    }

    #[tokio::test]
    async fn returning_user_is_not_overwritten() -> TestResult {
        let companies = Arc::new(MemoryCompaniesRepository::default());
        let existing = companies.insert(record("octo@x.com"));

        let mut other = profile(Some("octo@x.com"));

        other.display_name = Some("Renamed".to_string());
        other.provider_id = "999".to_string();

        let company = adapter(companies.clone()).resolve(&other).await?;

        assert_eq!(company, existing);

        Ok(())
    }

    #[tokio::test]
    async fn repeated_callbacks_resolve_to_one_company() -> TestResult {
        let companies = Arc::new(MemoryCompaniesRepository::default());
        let adapter = adapter(companies.clone());

        let first = adapter.resolve(&profile(Some("octo@x.com"))).await?;
        let second = adapter.resolve(&profile(Some("octo@x.com"))).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(companies.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_first_logins_converge() -> TestResult {
        let companies = Arc::new(MemoryCompaniesRepository::default());
        let adapter = adapter(companies.clone());
        let assertion = profile(Some("octo@x.com"));

        let (first, second) = tokio::join!(
            adapter.resolve(&assertion),
            adapter.resolve(&assertion)
        );

        assert_eq!(first?.uuid, second?.uuid);
        assert_eq!(companies.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn insert_conflict_retries_lookup_once() -> TestResult {
        let winner = record("octo@x.com");
        let expected = winner.uuid;
        let lookups = Arc::new(AtomicUsize::new(0));
        let mut companies = MockCompaniesRepository::new();

        let counter = lookups.clone();

        companies
            .expect_find_company_by_email()
            .with(eq("octo@x.com"))
            .times(2)
            .returning(move |_| {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);

                Ok((attempt > 0).then(|| winner.clone()))
            });

        companies
            .expect_create_company()
            .times(1)
            .returning(|_| Err(CompaniesRepositoryError::AlreadyExists));

        let company = adapter(Arc::new(companies))
            .resolve(&profile(Some("octo@x.com")))
            .await?;

        assert_eq!(company.uuid, expected);
        assert_eq!(lookups.load(Ordering::SeqCst), 2);

        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_unavailable() {
        let mut companies = MockCompaniesRepository::new();

        companies
            .expect_find_company_by_email()
            .returning(|_| Err(sqlx::Error::PoolTimedOut.into()));

        let result = adapter(Arc::new(companies))
            .resolve(&profile(Some("octo@x.com")))
            .await;

        assert!(matches!(result, Err(AuthServiceError::ServiceUnavailable)));
    }
}
