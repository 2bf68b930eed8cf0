use async_trait::async_trait;

use crate::domain::auth::errors::EmailSendError;
use crate::domain::auth::ports::EmailSender;
use crate::domain::user::models::EmailAddress;

/// Email sender that records outgoing mail in the log instead of delivering it.
pub struct LoggingEmailSender {
    sender: String,
}

impl LoggingEmailSender {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailSendError> {
        tracing::info!(
            from = %self.sender,
            to = %to,
            subject = %subject,
            body = %body,
            "Outgoing email"
        );

        Ok(())
    }
}
