use crate::config::MailerConfig;
use crate::contract::model::{OtpMetadata, OtpTemplate};

/// Rendered email: subject plus HTML body.
#[derive(Debug, Clone)]
pub struct OtpEmailContent {
    pub subject: String,
    pub html: String,
}

const BASE_STYLES: &str = r#"
    body { font-family: Arial, sans-serif; color: #333; line-height: 1.6; margin: 0; padding: 0; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #eee; border-radius: 10px; }
    .header { background-color: #4F46E5; color: white; padding: 20px; border-radius: 10px 10px 0 0; margin: -20px -20px 20px; }
    .footer { font-size: 12px; color: #666; margin-top: 30px; padding-top: 10px; border-top: 1px solid #eee; }
    .otp-code { background-color: #f7f7f7; padding: 15px; border-radius: 5px; text-align: center; font-size: 24px; letter-spacing: 5px; font-weight: bold; margin: 20px 0; }
"#;

/// Resolved substitutions after applying configured defaults.
struct Substitutions {
    app_name: String,
    user_name: String,
    expiry_minutes: u32,
    support_email: String,
}

impl Substitutions {
    fn resolve(config: &MailerConfig, metadata: &OtpMetadata) -> Self {
        Self {
            app_name: metadata
                .app_name
                .clone()
                .unwrap_or_else(|| config.app_name.clone()),
            user_name: metadata
                .user_name
                .clone()
                .unwrap_or_else(|| "User".to_string()),
            expiry_minutes: metadata.expiry_minutes.unwrap_or(config.expiry_minutes),
            support_email: metadata
                .support_email
                .clone()
                .unwrap_or_else(|| config.support_email.clone()),
        }
    }
}

/// Render the selected template with the given code and metadata.
pub fn render(
    template: OtpTemplate,
    code: &str,
    config: &MailerConfig,
    metadata: &OtpMetadata,
) -> OtpEmailContent {
    let subs = Substitutions::resolve(config, metadata);
    let subject = match template {
        OtpTemplate::Verification => "Your Verification Code",
        OtpTemplate::ResetPassword => "Reset Your Password",
        OtpTemplate::Login => "Login Verification Code",
    }
    .to_string();

    let (heading, lead, closing) = match template {
        OtpTemplate::Verification => (
            format!("{} - Email Verification", subs.app_name),
            format!(
                "Thank you for registering with {}. Please use the following verification code to complete your registration:",
                subs.app_name
            ),
            "If you didn't request this code, please ignore this email.".to_string(),
        ),
        OtpTemplate::ResetPassword => (
            format!("{} - Password Reset", subs.app_name),
            "We received a request to reset your password. Please use the following code to verify your identity:".to_string(),
            format!(
                "If you didn't request a password reset, please ignore this email or contact support at {}.",
                subs.support_email
            ),
        ),
        OtpTemplate::Login => (
            format!("{} - Login Verification", subs.app_name),
            "Please use the following verification code to complete your login:".to_string(),
            format!(
                "If you didn't attempt to log in, please contact support immediately at {}.",
                subs.support_email
            ),
        ),
    };

    let html = format!(
        r#"<html>
  <head><style>{styles}</style></head>
  <body>
    <div class="container">
      <div class="header">
        <h2>{heading}</h2>
      </div>
      <p>Hello {user},</p>
      <p>{lead}</p>
      <div class="otp-code">{code}</div>
      <p>This code will expire in {expiry} minutes.</p>
      <p>{closing}</p>
      <div class="footer">
        <p>This is an automated message, please do not reply directly to this email.</p>
        <p>&copy; {app}. All rights reserved.</p>
      </div>
    </div>
  </body>
</html>"#,
        styles = BASE_STYLES,
        heading = heading,
        user = subs.user_name,
        lead = lead,
        code = code,
        expiry = subs.expiry_minutes,
        closing = closing,
        app = subs.app_name,
    );

    OtpEmailContent { subject, html }
}
