use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use uuid::Uuid;

use mailer::{MailerError, MailerService, OtpMetadata, OtpSendRequest, OtpTemplate};

use crate::config::AuthFlowConfig;
use crate::contract::error::AuthFlowError;
use crate::contract::model::{Account, Role};
use crate::contract::ProfileRegistrar;
use crate::domain::code::{generate_otp_code, normalize_otp_input};
use crate::domain::cooldown::ResendCooldown;
use crate::domain::password::{hash_password, verify_password};
use crate::domain::pending::{PendingRegistration, PendingStore};
use crate::domain::role::{email_domain, is_allowed_email, resolve_role};
use crate::infra::storage::{entity, mapper};

/// Reply for a successful code dispatch.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub email: String,
    pub expires_in_minutes: i64,
    pub resend_cooldown_secs: u32,
}

/// Outcome of a resend request. `sent == false` means the cooldown guard
/// swallowed the request; that is not an error.
#[derive(Debug, Clone, Copy)]
pub struct ResendOutcome {
    pub sent: bool,
    pub seconds_remaining: u32,
}

/// Orchestrates the two-phase signup: dispatch a code, then verify it and
/// create the account in one server-side operation.
pub struct AuthFlowService {
    config: AuthFlowConfig,
    pool: SqlitePool,
    mailer: Arc<MailerService>,
    pending: PendingStore,
    profiles: Option<Arc<dyn ProfileRegistrar>>,
}

impl AuthFlowService {
    pub fn new(config: AuthFlowConfig, pool: SqlitePool, mailer: Arc<MailerService>) -> Self {
        Self {
            config,
            pool,
            mailer,
            pending: PendingStore::new(),
            profiles: None,
        }
    }

    /// Attach the profile registrar used after successful verification.
    pub fn with_profile_registrar(mut self, profiles: Arc<dyn ProfileRegistrar>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn config(&self) -> &AuthFlowConfig {
        &self.config
    }

    /// Phase one: validate, generate a code, email it, and retain the
    /// pending registration. Nothing is persisted; a dispatch failure leaves
    /// no state behind.
    pub async fn start_registration(
        &self,
        email: &str,
        password: &str,
        selected_role: Role,
    ) -> Result<RegistrationReceipt, AuthFlowError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthFlowError::MissingFields);
        }
        if password.len() < self.config.min_password_len {
            return Err(AuthFlowError::WeakPassword {
                min: self.config.min_password_len,
            });
        }
        if !is_allowed_email(email, &self.config) {
            return Err(AuthFlowError::domain_not_allowed(email));
        }
        if self.find_account(email).await?.is_some() {
            return Err(AuthFlowError::account_exists(email));
        }

        let code = generate_otp_code(self.config.otp_length);
        self.dispatch_code(email, &code).await?;

        let cooldown = ResendCooldown::new();
        cooldown.arm(self.config.resend_cooldown_secs);
        self.pending.insert(PendingRegistration {
            email: email.to_string(),
            password: password.to_string(),
            selected_role,
            code,
            created_at: Utc::now(),
            cooldown,
        });

        info!(email = %email, "verification code dispatched, registration pending");
        Ok(RegistrationReceipt {
            email: email.to_string(),
            expires_in_minutes: self.config.otp_expiry_minutes,
            resend_cooldown_secs: self.config.resend_cooldown_secs,
        })
    }

    /// Re-dispatch a fresh code. While the cooldown is active the request is
    /// silently ignored (`sent == false`), by design.
    pub async fn resend_code(&self, email: &str) -> Result<ResendOutcome, AuthFlowError> {
        let registration = self
            .pending
            .get(email)
            .ok_or_else(|| AuthFlowError::unknown_pending(email))?;

        if registration.is_expired(Utc::now(), self.config.otp_expiry_minutes) {
            self.pending.remove(email);
            return Err(AuthFlowError::CodeExpired);
        }

        if registration.cooldown.disabled() {
            return Ok(ResendOutcome {
                sent: false,
                seconds_remaining: registration.cooldown.seconds_remaining(),
            });
        }

        let code = generate_otp_code(self.config.otp_length);
        self.dispatch_code(&registration.email, &code).await?;

        self.pending.refresh_code(email, code, Utc::now());
        registration.cooldown.arm(self.config.resend_cooldown_secs);

        info!(email = %registration.email, "verification code resent");
        Ok(ResendOutcome {
            sent: true,
            seconds_remaining: self.config.resend_cooldown_secs,
        })
    }

    /// Phase two: compare the entered code and, on a match, create the
    /// account. Mismatches leave the pending registration valid with no
    /// retry cap; a match consumes it.
    pub async fn verify_and_create(
        &self,
        email: &str,
        entered_code: &str,
    ) -> Result<Account, AuthFlowError> {
        let registration = self
            .pending
            .get(email)
            .ok_or_else(|| AuthFlowError::unknown_pending(email))?;

        if registration.is_expired(Utc::now(), self.config.otp_expiry_minutes) {
            self.pending.remove(email);
            return Err(AuthFlowError::CodeExpired);
        }

        let normalized = normalize_otp_input(entered_code, self.config.otp_length);
        let matches: bool = normalized
            .as_bytes()
            .ct_eq(registration.code.as_bytes())
            .into();
        if !matches {
            return Err(AuthFlowError::CodeMismatch);
        }

        let role = resolve_role(&registration.email, registration.selected_role, &self.config);
        let row = entity::AccountRow {
            id: Uuid::new_v4().to_string(),
            email: registration.email.clone(),
            password_hash: hash_password(&registration.password)?,
            role: role.as_str().to_string(),
            email_domain: email_domain(&registration.email).to_string(),
            created_at: Utc::now(),
        };

        match entity::insert(&self.pool, &row).await {
            Ok(()) => {}
            Err(e) if entity::is_unique_violation(&e) => {
                self.pending.remove(email);
                return Err(AuthFlowError::account_exists(&registration.email));
            }
            Err(e) => return Err(AuthFlowError::internal(format!("account insert failed: {e}"))),
        }

        let account = mapper::row_to_account(row)?;

        // Companion profile creation is best-effort; a failure is logged and
        // never blocks the verified signup.
        if let Some(profiles) = &self.profiles {
            if let Err(e) = profiles
                .create_profile(account.id, &account.email, account.role)
                .await
            {
                warn!(email = %account.email, error = %e, "profile creation failed after signup");
            }
        }

        self.pending.remove(email);
        info!(email = %account.email, role = %account.role, "account created");
        Ok(account)
    }

    /// Password sign-in against the stored hash.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthFlowError> {
        let row = self
            .find_account(email.trim())
            .await?
            .ok_or(AuthFlowError::InvalidCredentials)?;

        if !verify_password(password, &row.password_hash) {
            return Err(AuthFlowError::InvalidCredentials);
        }
        mapper::row_to_account(row)
    }

    async fn find_account(&self, email: &str) -> Result<Option<entity::AccountRow>, AuthFlowError> {
        entity::find_by_email(&self.pool, email)
            .await
            .map_err(|e| AuthFlowError::internal(format!("account lookup failed: {e}")))
    }

    async fn dispatch_code(&self, email: &str, code: &str) -> Result<(), AuthFlowError> {
        let request = OtpSendRequest {
            email: email.to_string(),
            otp_code: code.to_string(),
            template: OtpTemplate::Verification,
            metadata: OtpMetadata::default(),
        };
        self.mailer
            .send_otp(&request)
            .await
            .map(|_| ())
            .map_err(map_mailer_error)
    }
}

/// Translate mailer failures into the signup taxonomy. The mailer returns
/// typed kinds, so this is a total match with no message inspection.
fn map_mailer_error(err: MailerError) -> AuthFlowError {
    match err {
        MailerError::RateLimited { seconds_remaining } => {
            AuthFlowError::RateLimited { seconds_remaining }
        }
        MailerError::Transport { message } | MailerError::InvalidConfig { message } => {
            AuthFlowError::delivery(message)
        }
        MailerError::MissingFields => AuthFlowError::MissingFields,
        MailerError::InvalidEmail { email } => AuthFlowError::domain_not_allowed(email),
    }
}
