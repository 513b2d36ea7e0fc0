use serde::{Deserialize, Serialize};

/// Signup flow configuration (section `auth_flow` in the module bag).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthFlowConfig {
    /// Exact set of acceptable email domain suffixes. This is an enumerated
    /// allow-list, not a general validator.
    pub allowed_domains: Vec<String>,
    /// Domain whose accounts are always administrators.
    pub admin_domain: String,
    /// Domain whose accounts are always faculty.
    pub faculty_domain: String,
    /// Number of digits in a verification code.
    pub otp_length: usize,
    /// Minutes a pending registration stays verifiable.
    pub otp_expiry_minutes: i64,
    /// Seconds the resend action stays disabled after a dispatch.
    pub resend_cooldown_secs: u32,
    /// Minimum accepted password length.
    pub min_password_len: usize,
}

impl Default for AuthFlowConfig {
    fn default() -> Self {
        Self {
            allowed_domains: vec![
                "@university.edu".to_string(),
                "@admin.university.edu".to_string(),
                "@faculty.university.edu".to_string(),
                "@gmail.com".to_string(),
            ],
            admin_domain: "@admin.university.edu".to_string(),
            faculty_domain: "@faculty.university.edu".to_string(),
            otp_length: 4,
            otp_expiry_minutes: 10,
            resend_cooldown_secs: 60,
            min_password_len: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_portal_policy() {
        let cfg = AuthFlowConfig::default();
        assert_eq!(cfg.allowed_domains.len(), 4);
        assert!(cfg.allowed_domains.contains(&"@gmail.com".to_string()));
        assert_eq!(cfg.otp_length, 4);
        assert_eq!(cfg.resend_cooldown_secs, 60);
    }
}
