//! Credential verification and principal normalization.
//!
//! Owns the three login flows: user, organization, and headquarters.
//! Every failure path returns the same generic outcome to prevent
//! account enumeration, and unknown accounts still pay for one hash so
//! response timing does not reveal existence.

use std::sync::Arc;

use async_trait::async_trait;
use vestry_core::{AppResult, TenantId};
use vestry_domain::{Affiliation, OrganizationSummary, Principal, UserId};

use crate::auth_event_service::{AuthEvent, AuthEventService};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User account row returned by directory queries.
#[derive(Debug, Clone)]
pub struct UserAccountRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Full display name.
    pub full_name: String,
    /// Canonical email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Tenant affiliation with kind discriminator.
    pub affiliation: Affiliation,
    /// Role names assigned to the user.
    pub roles: Vec<String>,
    /// Organization summary for the session, when affiliated with one.
    pub organization: Option<OrganizationSummary>,
}

/// Organization or headquarters account row returned by directory queries.
#[derive(Debug, Clone)]
pub struct TenantAccountRecord {
    /// Tenant identifier of the account.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Canonical email address.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Role names assigned to the account.
    pub roles: Vec<String>,
}

/// Repository port for principal lookups across the three account tables.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Finds a user account by email (case-insensitive).
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccountRecord>>;

    /// Finds an organization account by email (case-insensitive).
    async fn find_organization_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<TenantAccountRecord>>;

    /// Finds a headquarters account by email (case-insensitive).
    async fn find_headquarters_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<TenantAccountRecord>>;
}

/// Port for password hashing operations. Keeps the application layer free
/// of direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials verified; the caller can establish a session.
    Authenticated {
        /// The normalized principal, permissions not yet resolved.
        principal: Principal,
        /// Organization summary for the session.
        organization: Option<OrganizationSummary>,
    },
    /// Authentication failed. Generic outcome prevents enumeration.
    Failed,
}

/// Request context forwarded into auth events.
#[derive(Debug, Clone, Default)]
pub struct LoginContext {
    /// Client IP address, when available.
    pub ip_address: Option<String>,
    /// User-Agent header, when available.
    pub user_agent: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for the three login flows.
#[derive(Clone)]
pub struct LoginService {
    directory: Arc<dyn PrincipalDirectory>,
    password_hasher: Arc<dyn PasswordHasher>,
    auth_event_service: AuthEventService,
}

impl LoginService {
    /// Creates a new login service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn PrincipalDirectory>,
        password_hasher: Arc<dyn PasswordHasher>,
        auth_event_service: AuthEventService,
    ) -> Self {
        Self {
            directory,
            password_hasher,
            auth_event_service,
        }
    }

    /// Authenticates a user account.
    pub async fn login_user(
        &self,
        email: &str,
        password: &str,
        context: LoginContext,
    ) -> AppResult<LoginOutcome> {
        let account = self.directory.find_user_by_email(email).await?;

        let Some(account) = account else {
            // Always hash to keep timing uniform when the account is unknown.
            let _ = self.password_hasher.hash_password(password);
            return Ok(LoginOutcome::Failed);
        };

        if !self.verify_or_record_failure(
            password,
            &account.password_hash,
            account.id.to_string(),
            &context,
        )
        .await?
        {
            return Ok(LoginOutcome::Failed);
        }

        self.record_success(account.id.to_string(), &context)
            .await?;

        let organization = account.organization.clone();
        let principal = Principal::user(
            account.id,
            account.full_name,
            account.email,
            account.affiliation,
            account.roles,
        );

        Ok(LoginOutcome::Authenticated {
            principal,
            organization,
        })
    }

    /// Authenticates an organization account.
    pub async fn login_organization(
        &self,
        email: &str,
        password: &str,
        context: LoginContext,
    ) -> AppResult<LoginOutcome> {
        let account = self.directory.find_organization_by_email(email).await?;

        let Some(account) = account else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(LoginOutcome::Failed);
        };

        if !self.verify_or_record_failure(
            password,
            &account.password_hash,
            account.tenant_id.to_string(),
            &context,
        )
        .await?
        {
            return Ok(LoginOutcome::Failed);
        }

        self.record_success(account.tenant_id.to_string(), &context)
            .await?;

        let organization = Some(OrganizationSummary {
            tenant_id: account.tenant_id,
            name: account.name.clone(),
            email: Some(account.email.clone()),
        });
        let principal = Principal::organization(
            account.tenant_id,
            account.name,
            account.email,
            account.roles,
        );

        Ok(LoginOutcome::Authenticated {
            principal,
            organization,
        })
    }

    /// Authenticates a headquarters account.
    pub async fn login_headquarters(
        &self,
        email: &str,
        password: &str,
        context: LoginContext,
    ) -> AppResult<LoginOutcome> {
        let account = self.directory.find_headquarters_by_email(email).await?;

        let Some(account) = account else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(LoginOutcome::Failed);
        };

        if !self.verify_or_record_failure(
            password,
            &account.password_hash,
            account.tenant_id.to_string(),
            &context,
        )
        .await?
        {
            return Ok(LoginOutcome::Failed);
        }

        self.record_success(account.tenant_id.to_string(), &context)
            .await?;

        let principal = Principal::headquarters(
            account.tenant_id,
            account.name,
            account.email,
            account.roles,
        );

        Ok(LoginOutcome::Authenticated {
            principal,
            organization: None,
        })
    }

    async fn verify_or_record_failure(
        &self,
        password: &str,
        stored_hash: &str,
        subject: String,
        context: &LoginContext,
    ) -> AppResult<bool> {
        let password_valid = self.password_hasher.verify_password(password, stored_hash)?;

        if !password_valid {
            self.auth_event_service
                .record_event(AuthEvent {
                    subject: Some(subject),
                    event_type: "login_attempt".to_owned(),
                    outcome: "invalid_password".to_owned(),
                    ip_address: context.ip_address.clone(),
                    user_agent: context.user_agent.clone(),
                })
                .await?;
        }

        Ok(password_valid)
    }

    async fn record_success(&self, subject: String, context: &LoginContext) -> AppResult<()> {
        self.auth_event_service
            .record_event(AuthEvent {
                subject: Some(subject),
                event_type: "login_attempt".to_owned(),
                outcome: "success".to_owned(),
                ip_address: context.ip_address.clone(),
                user_agent: context.user_agent.clone(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use vestry_core::{AppResult, TenantId};
    use vestry_domain::{Affiliation, Principal, UserId};

    use crate::auth_event_service::{AuthEvent, AuthEventRepository, AuthEventService};

    use super::{
        LoginContext, LoginOutcome, LoginService, PasswordHasher, PrincipalDirectory,
        TenantAccountRecord, UserAccountRecord,
    };

    #[derive(Default)]
    struct FakeAuthEventRepository {
        events: Mutex<Vec<AuthEvent>>,
    }

    #[async_trait]
    impl AuthEventRepository for FakeAuthEventRepository {
        async fn record(&self, event: AuthEvent) -> AppResult<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    /// Plaintext "hasher" sufficient for exercising control flow.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash_password(&self, password: &str) -> AppResult<String> {
            Ok(format!("hashed:{password}"))
        }

        fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    struct FakeDirectory {
        user: Option<UserAccountRecord>,
        organization: Option<TenantAccountRecord>,
    }

    #[async_trait]
    impl PrincipalDirectory for FakeDirectory {
        async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccountRecord>> {
            Ok(self
                .user
                .clone()
                .filter(|account| account.email == email))
        }

        async fn find_organization_by_email(
            &self,
            email: &str,
        ) -> AppResult<Option<TenantAccountRecord>> {
            Ok(self
                .organization
                .clone()
                .filter(|account| account.email == email))
        }

        async fn find_headquarters_by_email(
            &self,
            _email: &str,
        ) -> AppResult<Option<TenantAccountRecord>> {
            Ok(None)
        }
    }

    fn service_with(directory: FakeDirectory) -> (LoginService, Arc<FakeAuthEventRepository>) {
        let events = Arc::new(FakeAuthEventRepository::default());
        let service = LoginService::new(
            Arc::new(directory),
            Arc::new(PlainHasher),
            AuthEventService::new(events.clone()),
        );
        (service, events)
    }

    fn sample_user() -> UserAccountRecord {
        UserAccountRecord {
            id: UserId::new(),
            full_name: "Grace Obi".to_owned(),
            email: "grace@example.org".to_owned(),
            password_hash: "hashed:correct-horse".to_owned(),
            affiliation: Affiliation::Organization(TenantId::new()),
            roles: vec!["Administrator".to_owned()],
            organization: None,
        }
    }

    #[tokio::test]
    async fn unknown_email_fails_generically() {
        let (service, _) = service_with(FakeDirectory {
            user: None,
            organization: None,
        });

        let outcome = service
            .login_user("nobody@example.org", "whatever", LoginContext::default())
            .await;
        assert!(matches!(outcome, Ok(LoginOutcome::Failed)));
    }

    #[tokio::test]
    async fn wrong_password_fails_and_records_event() {
        let (service, events) = service_with(FakeDirectory {
            user: Some(sample_user()),
            organization: None,
        });

        let outcome = service
            .login_user("grace@example.org", "wrong", LoginContext::default())
            .await;
        assert!(matches!(outcome, Ok(LoginOutcome::Failed)));

        let recorded = events.events.lock().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].outcome, "invalid_password");
    }

    #[tokio::test]
    async fn user_login_normalizes_principal() {
        let (service, _) = service_with(FakeDirectory {
            user: Some(sample_user()),
            organization: None,
        });

        let outcome = service
            .login_user("grace@example.org", "correct-horse", LoginContext::default())
            .await;

        let Ok(LoginOutcome::Authenticated { principal, .. }) = outcome else {
            panic!("expected authenticated outcome");
        };
        assert!(matches!(principal, Principal::User { .. }));
        assert_eq!(principal.primary_role_name(), Some("Administrator"));
        assert!(principal.permissions().is_empty());
    }

    #[tokio::test]
    async fn organization_login_builds_its_own_summary() {
        let tenant_id = TenantId::new();
        let (service, _) = service_with(FakeDirectory {
            user: None,
            organization: Some(TenantAccountRecord {
                tenant_id,
                name: "Hope Chapel".to_owned(),
                email: "office@hopechapel.org".to_owned(),
                password_hash: "hashed:secret-passphrase".to_owned(),
                roles: vec!["Administrator".to_owned()],
            }),
        });

        let outcome = service
            .login_organization(
                "office@hopechapel.org",
                "secret-passphrase",
                LoginContext::default(),
            )
            .await;

        let Ok(LoginOutcome::Authenticated {
            principal,
            organization,
        }) = outcome
        else {
            panic!("expected authenticated outcome");
        };
        assert_eq!(principal.tenant_id(), tenant_id);
        assert_eq!(
            organization.map(|summary| summary.name),
            Some("Hope Chapel".to_owned())
        );
    }
}
