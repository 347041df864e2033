//! Auth gateway: the operations exposed to the HTTP layer.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::{
    auth::{
        AuthServiceError, ResultExt as _,
        api_keys::{ApiKeyManager, generate_api_key},
        cache::ApiKeyCache,
        models::{Credentials, PasswordChange, Registration, SessionGrant},
        oauth::{
            FederationAdapter, FederationError, OAuthProvider, OAuthProviderError,
            ProviderProfile,
        },
        password::SecretHasher,
        session::SessionTokens,
        timeouts::{AuthTimeouts, bounded},
        validation::{email_shape, password_length, require},
    },
    domain::companies::{
        CompaniesRepository, CompaniesRepositoryError,
        data::NewCompany,
        normalize_email,
        records::{CompanyRecord, CompanyUuid},
    },
};

const REGISTRATION_FIELDS_REQUIRED: &str = "All fields are required";
const LOGIN_FIELDS_REQUIRED: &str = "Email and password are required";
const PASSWORD_FIELDS_REQUIRED: &str = "Current and new password are required";
const NAME_REQUIRED: &str = "Name is required";

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a password account and sign it in.
    async fn register(&self, registration: Registration)
    -> Result<SessionGrant, AuthServiceError>;

    /// Password login.
    async fn login(&self, credentials: Credentials) -> Result<SessionGrant, AuthServiceError>;

    /// Provider authorize URL carrying a fresh signed `state`.
    fn oauth_begin(&self) -> Result<String, AuthServiceError>;

    /// Complete the provider redirect: check `state`, exchange `code`, federate, sign in.
    async fn oauth_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<SessionGrant, AuthServiceError>;

    /// Sign in from an already verified provider profile.
    async fn federated_login(
        &self,
        profile: ProviderProfile,
    ) -> Result<SessionGrant, AuthServiceError>;

    /// Resolve a bearer session token to its company.
    async fn authenticate(&self, bearer: &str) -> Result<CompanyUuid, AuthServiceError>;

    async fn get_company(&self, company: CompanyUuid) -> Result<CompanyRecord, AuthServiceError>;

    async fn get_api_key(&self, company: CompanyUuid) -> Result<String, AuthServiceError>;

    async fn rotate_api_key(&self, company: CompanyUuid) -> Result<String, AuthServiceError>;

    async fn change_password(
        &self,
        company: CompanyUuid,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError>;

    /// Company owning `api_key`, if any.
    async fn validate_api_key(
        &self,
        api_key: &str,
    ) -> Result<Option<CompanyUuid>, AuthServiceError>;

    async fn update_profile(
        &self,
        company: CompanyUuid,
        name: String,
    ) -> Result<CompanyRecord, AuthServiceError>;

    /// Flip a company's `active` flag.
    async fn toggle_company_status(
        &self,
        target: CompanyUuid,
    ) -> Result<CompanyRecord, AuthServiceError>;

    async fn list_companies(&self) -> Result<Vec<CompanyRecord>, AuthServiceError>;
}

/// [`AuthService`] over a companies repository, an optional key cache, and an optional
/// OAuth provider.
#[derive(Clone)]
pub struct AuthGateway {
    companies: Arc<dyn CompaniesRepository>,
    hasher: SecretHasher,
    sessions: SessionTokens,
    api_keys: ApiKeyManager,
    federation: FederationAdapter,
    provider: Option<Arc<dyn OAuthProvider>>,
    timeouts: AuthTimeouts,
}

impl AuthGateway {
    #[must_use]
    pub fn new(
        companies: Arc<dyn CompaniesRepository>,
        cache: Option<Arc<dyn ApiKeyCache>>,
        provider: Option<Arc<dyn OAuthProvider>>,
        sessions: SessionTokens,
        timeouts: AuthTimeouts,
    ) -> Self {
        let api_keys = ApiKeyManager::new(companies.clone(), cache, timeouts.store);
        let federation =
            FederationAdapter::new(companies.clone(), api_keys.clone(), timeouts.store);

        Self {
            companies,
            hasher: SecretHasher::new(),
            sessions,
            api_keys,
            federation,
            provider,
            timeouts,
        }
    }

    fn provider(&self) -> Result<&Arc<dyn OAuthProvider>, AuthServiceError> {
        self.provider.as_ref().ok_or_else(|| {
            error!("GitHub OAuth is not configured");

            AuthServiceError::ServiceUnavailable
        })
    }

    fn grant(&self, company: CompanyRecord) -> Result<SessionGrant, AuthServiceError> {
        let token = self
            .sessions
            .issue(company.uuid, &company.email)
            .or_unavailable("failed to sign session token")?;

        Ok(SessionGrant { company, token })
    }

    async fn find(&self, company: CompanyUuid) -> Result<Option<CompanyRecord>, AuthServiceError> {
        bounded(
            self.timeouts.store,
            "find_company",
            self.companies.find_company(company),
        )
        .await?
        .or_unavailable("failed to load company")
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CompanyRecord>, AuthServiceError> {
        bounded(
            self.timeouts.store,
            "find_company_by_email",
            self.companies.find_company_by_email(email),
        )
        .await?
        .or_unavailable("failed to look up company by email")
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthServiceError> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.to_string());

        bounded(
            self.timeouts.hash,
            "hash_password",
            spawn_blocking(move || hasher.hash(&password)),
        )
        .await?
        .or_unavailable("password hashing task failed")?
        .or_unavailable("failed to hash password")
    }

    async fn verify_password(
        &self,
        password: &str,
        digest: &str,
    ) -> Result<bool, AuthServiceError> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.to_string());
        let digest = digest.to_string();

        bounded(
            self.timeouts.hash,
            "verify_password",
            spawn_blocking(move || hasher.verify(&password, &digest)),
        )
        .await?
        .or_unavailable("password verification task failed")?
        .or_unavailable("failed to verify password")
    }
}

#[async_trait]
impl AuthService for AuthGateway {
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<SessionGrant, AuthServiceError> {
        let password = Zeroizing::new(registration.password);

        require(&registration.email, REGISTRATION_FIELDS_REQUIRED)?;
        require(&password, REGISTRATION_FIELDS_REQUIRED)?;
        require(&registration.name, REGISTRATION_FIELDS_REQUIRED)?;

        let email = normalize_email(&registration.email);

        email_shape(&email)?;
        password_length(&password)?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::Conflict);
        }

        let password_hash = self.hash_password(&password).await?;

        let created = bounded(
            self.timeouts.store,
            "create_company",
            self.companies.create_company(NewCompany {
                uuid: CompanyUuid::new(),
                name: registration.name.trim().to_string(),
                email,
                password_hash: Some(password_hash),
                api_key: generate_api_key(),
                github_id: None,
            }),
        )
        .await?;

        let company = match created {
            Ok(company) => company,
            Err(CompaniesRepositoryError::AlreadyExists) => return Err(AuthServiceError::Conflict),
            Err(source) => return Err(source).or_unavailable("failed to register company"),
        };

        info!(company = %company.uuid, "registered company");

        self.api_keys.mirror(&company.api_key, company.uuid).await;

        self.grant(company)
    }

    async fn login(&self, credentials: Credentials) -> Result<SessionGrant, AuthServiceError> {
        let password = Zeroizing::new(credentials.password);

        require(&credentials.email, LOGIN_FIELDS_REQUIRED)?;
        require(&password, LOGIN_FIELDS_REQUIRED)?;

        let company = self
            .find_by_email(&normalize_email(&credentials.email))
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let Some(digest) = company.password_hash.as_deref() else {
            debug!(company = %company.uuid, "password login on an account without a password");

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !self.verify_password(&password, digest).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        info!(company = %company.uuid, "password login");

        self.grant(company)
    }

    fn oauth_begin(&self) -> Result<String, AuthServiceError> {
        let provider = self.provider()?;

        let state = self
            .sessions
            .issue_oauth_state()
            .or_unavailable("failed to sign oauth state")?;

        Ok(provider.authorize_url(&state))
    }

    async fn oauth_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<SessionGrant, AuthServiceError> {
        let provider = self.provider()?;

        self.sessions.verify_oauth_state(state).map_err(|error| {
            warn!("rejected oauth state: {error}");

            FederationError::InvalidState
        })?;

        if code.trim().is_empty() {
            return Err(FederationError::Exchange("missing authorization code".to_string()).into());
        }

        let profile = provider
            .fetch_profile(code)
            .await
            .map_err(|error| match error {
                OAuthProviderError::Rejected(detail) => {
                    warn!("GitHub rejected the login: {detail}");

                    FederationError::Exchange(detail).into()
                }
                other => {
                    error!("GitHub login failed: {other}");

                    AuthServiceError::ServiceUnavailable
                }
            })?;

        self.federated_login(profile).await
    }

    async fn federated_login(
        &self,
        profile: ProviderProfile,
    ) -> Result<SessionGrant, AuthServiceError> {
        let company = self.federation.resolve(&profile).await?;

        info!(company = %company.uuid, "federated login");

        self.grant(company)
    }

    async fn authenticate(&self, bearer: &str) -> Result<CompanyUuid, AuthServiceError> {
        let claims = self.sessions.verify(bearer).map_err(|error| {
            debug!("rejected session token: {error}");

            AuthServiceError::Unauthenticated
        })?;

        self.find(claims.company_uuid())
            .await?
            .map(|company| company.uuid)
            .ok_or(AuthServiceError::Unauthenticated)
    }

    async fn get_company(&self, company: CompanyUuid) -> Result<CompanyRecord, AuthServiceError> {
        self.find(company).await?.ok_or(AuthServiceError::NotFound)
    }

    async fn get_api_key(&self, company: CompanyUuid) -> Result<String, AuthServiceError> {
        self.api_keys.get(company).await
    }

    async fn rotate_api_key(&self, company: CompanyUuid) -> Result<String, AuthServiceError> {
        self.api_keys.rotate(company).await
    }

    async fn change_password(
        &self,
        company: CompanyUuid,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError> {
        let current = Zeroizing::new(change.current_password);
        let new = Zeroizing::new(change.new_password);

        require(&current, PASSWORD_FIELDS_REQUIRED)?;
        require(&new, PASSWORD_FIELDS_REQUIRED)?;
        password_length(&new)?;

        let record = self.find(company).await?.ok_or(AuthServiceError::NotFound)?;

        let digest = record
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::NoPasswordSet)?;

        if !self.verify_password(&current, digest).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let new_hash = self.hash_password(&new).await?;

        let updated = bounded(
            self.timeouts.store,
            "update_password_hash",
            self.companies.update_password_hash(company, new_hash),
        )
        .await?
        .or_unavailable("failed to update password")?;

        if !updated {
            return Err(AuthServiceError::NotFound);
        }

        info!(company = %company, "changed password");

        Ok(())
    }

    async fn validate_api_key(
        &self,
        api_key: &str,
    ) -> Result<Option<CompanyUuid>, AuthServiceError> {
        self.api_keys.resolve(api_key).await
    }

    async fn update_profile(
        &self,
        company: CompanyUuid,
        name: String,
    ) -> Result<CompanyRecord, AuthServiceError> {
        require(&name, NAME_REQUIRED)?;

        bounded(
            self.timeouts.store,
            "update_name",
            self.companies.update_name(company, name.trim().to_string()),
        )
        .await?
        .or_unavailable("failed to update profile")?
        .ok_or(AuthServiceError::NotFound)
    }

    async fn toggle_company_status(
        &self,
        target: CompanyUuid,
    ) -> Result<CompanyRecord, AuthServiceError> {
        let company = bounded(
            self.timeouts.store,
            "toggle_active",
            self.companies.toggle_active(target),
        )
        .await?
        .or_unavailable("failed to toggle company status")?
        .ok_or(AuthServiceError::NotFound)?;

        info!(company = %company.uuid, active = company.active, "toggled company status");

        Ok(company)
    }

    async fn list_companies(&self) -> Result<Vec<CompanyRecord>, AuthServiceError> {
        bounded(
            self.timeouts.store,
            "list_companies",
            self.companies.list_companies(),
        )
        .await?
        .or_unavailable("failed to list companies")
    }
}

impl Debug for AuthGateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AuthGateway")
            .field("api_keys", &self.api_keys)
            .field("oauth", &self.provider.is_some())
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}
