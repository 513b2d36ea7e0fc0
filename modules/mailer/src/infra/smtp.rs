use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::Mailer;
use crate::contract::error::MailerError;

/// SMTP transport over lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        use_tls: bool,
        from_address: &str,
        from_name: Option<&str>,
    ) -> Result<Self, MailerError> {
        let mut builder = if use_tls {
            let tls_params = TlsParameters::new(host.to_string())
                .map_err(|e| MailerError::invalid_config(format!("TLS configuration error: {e}")))?;

            // Port 465 uses implicit TLS (SMTPS), other ports use STARTTLS
            if port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                    .map_err(|e| MailerError::invalid_config(format!("SMTP relay error: {e}")))?
                    .port(port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| MailerError::invalid_config(format!("SMTP relay error: {e}")))?
                    .port(port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port)
        };

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        let from = match from_name {
            Some(name) => format!("{name} <{from_address}>"),
            None => from_address.to_string(),
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| MailerError::invalid_config(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| MailerError::invalid_email(format!("{to}: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| MailerError::transport(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::transport(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provider_creation_without_tls() {
        let mailer = SmtpMailer::new(
            "localhost",
            25,
            None,
            None,
            false,
            "portal@university.edu",
            None,
        );
        assert!(mailer.is_ok());
    }

    #[tokio::test]
    async fn provider_creation_with_credentials_and_tls() {
        let mailer = SmtpMailer::new(
            "smtp.university.edu",
            587,
            Some("mailer".into()),
            Some("secret".into()),
            true,
            "portal@university.edu",
            Some("Campus Hub"),
        );
        assert!(mailer.is_ok());
    }

    #[tokio::test]
    async fn implicit_tls_port_is_accepted() {
        let mailer = SmtpMailer::new(
            "smtp.university.edu",
            465,
            None,
            None,
            true,
            "portal@university.edu",
            None,
        );
        assert!(mailer.is_ok());
    }
}
