use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::EmailConfig,
    error::{AppError, Result},
    notifier::Notifier,
};

/// SMTP notifier. Disabled when no relay is configured, in which case the
/// dispatcher still writes in-app rows.
pub struct SmtpNotifier {
    config: EmailConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let transport = if config.enabled {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
                &config.smtp_host,
            )
            .map_err(|e| AppError::Internal(format!("SMTP relay setup failed: {}", e)))?
            .port(config.smtp_port);

            if let (Some(username), Some(password)) =
                (config.smtp_username.clone(), config.smtp_password.clone())
            {
                builder = builder.credentials(Credentials::new(username, password));
            }

            Some(builder.build())
        } else {
            None
        };

        Ok(Self { config, transport })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.config
                    .from_address
                    .parse()
                    .map_err(|e| AppError::Internal(format!("Bad from address: {}", e)))?,
            )
            .to(recipient
                .parse()
                .map_err(|e| AppError::Internal(format!("Bad recipient address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}
