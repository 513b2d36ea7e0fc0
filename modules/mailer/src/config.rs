use serde::{Deserialize, Serialize};

/// Mailer module configuration (section `mailer` in the module bag).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct MailerConfig {
    pub provider: MailerProviderConfig,
    /// Sender address placed on outgoing mail.
    pub from_address: String,
    /// Optional display name for the sender.
    pub from_name: Option<String>,
    /// Application name substituted into templates.
    pub app_name: String,
    /// Support contact substituted into templates.
    pub support_email: String,
    /// Advertised code lifetime, substituted into templates.
    pub expiry_minutes: u32,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            provider: MailerProviderConfig::Noop,
            from_address: "no-reply@university.edu".to_string(),
            from_name: Some("Campus Hub".to_string()),
            app_name: "Campus Hub".to_string(),
            support_email: "support@university.edu".to_string(),
            expiry_minutes: 10,
        }
    }
}

/// Transport selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MailerProviderConfig {
    /// Deliver over SMTP.
    Smtp {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        #[serde(default = "default_use_tls")]
        use_tls: bool,
    },
    /// Record mail in memory instead of sending (tests, local development).
    Noop,
}

fn default_use_tls() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_noop() {
        let cfg = MailerConfig::default();
        assert!(matches!(cfg.provider, MailerProviderConfig::Noop));
        assert_eq!(cfg.expiry_minutes, 10);
    }

    #[test]
    fn smtp_provider_deserializes_from_yaml_shape() {
        let json = serde_json::json!({
            "provider": {
                "type": "smtp",
                "host": "smtp.university.edu",
                "port": 587,
                "username": "mailer",
                "password": "secret"
            },
            "from_address": "portal@university.edu"
        });
        let cfg: MailerConfig = serde_json::from_value(json).unwrap();
        match cfg.provider {
            MailerProviderConfig::Smtp {
                host,
                port,
                use_tls,
                ..
            } => {
                assert_eq!(host, "smtp.university.edu");
                assert_eq!(port, 587);
                assert!(use_tls);
            }
            _ => panic!("expected smtp provider"),
        }
        assert_eq!(cfg.from_address, "portal@university.edu");
    }
}
