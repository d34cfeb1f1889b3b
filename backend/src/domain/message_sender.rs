//! Outbound delivery seam for daily updates.
//!
//! Dispatch only depends on the [`MessageSender`] trait; the SMTP-backed
//! sender is wired in at startup when mail settings are present, otherwise
//! sends are logged. Tests use a recording sender.

use anyhow::{Context, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::models::guardian::CommunicationChannel;

pub trait MessageSender: Send + Sync {
    fn send(
        &self,
        channel: CommunicationChannel,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<()>;
}

/// No-op sender used when no delivery provider is configured; every send
/// succeeds and is only logged.
pub struct LoggingSender;

impl MessageSender for LoggingSender {
    fn send(
        &self,
        channel: CommunicationChannel,
        recipient: &str,
        subject: &str,
        _body: &str,
    ) -> Result<()> {
        info!(
            "No delivery provider configured; logging {} message to {}: {}",
            channel.as_str(),
            recipient,
            subject
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

/// Delivers EMAIL-channel messages over SMTP. WhatsApp has no provider
/// integration; those sends are logged and treated as delivered.
pub struct SmtpEmailSender {
    config: SmtpConfig,
    transport: SmtpTransport,
}

impl SmtpEmailSender {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        info!(
            "Initializing SMTP sender for {}:{}",
            config.smtp_server, config.smtp_port
        );
        let tls_params = TlsParameters::new(config.smtp_server.clone())
            .context("Failed to create TLS parameters")?;
        let transport = SmtpTransport::relay(&config.smtp_server)
            .context("Failed to create SMTP relay")?
            .port(config.smtp_port)
            .tls(Tls::Required(tls_params))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self { config, transport })
    }
}

impl MessageSender for SmtpEmailSender {
    fn send(
        &self,
        channel: CommunicationChannel,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        match channel {
            CommunicationChannel::Email => {
                let email = Message::builder()
                    .from(
                        self.config
                            .from_email
                            .parse::<Mailbox>()
                            .context("Failed to parse from email")?,
                    )
                    .to(recipient
                        .parse::<Mailbox>()
                        .context("Failed to parse recipient email")?)
                    .subject(subject)
                    .body(body.to_string())
                    .context("Failed to build email")?;
                self.transport.send(&email).context("Failed to send email")?;
                info!("Daily update email sent to {}", recipient);
                Ok(())
            }
            CommunicationChannel::Whatsapp => {
                info!(
                    "WhatsApp provider not integrated; logging message to {}",
                    recipient
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedSend {
        pub channel: CommunicationChannel,
        pub recipient: String,
        pub subject: String,
        pub body: String,
    }

    /// Records every send; optionally fails for chosen recipients.
    #[derive(Default)]
    pub struct RecordingSender {
        pub sends: Mutex<Vec<RecordedSend>>,
        pub fail_recipients: Vec<String>,
    }

    impl RecordingSender {
        pub fn failing_for(recipients: &[&str]) -> Self {
            Self {
                sends: Mutex::new(Vec::new()),
                fail_recipients: recipients.iter().map(|r| r.to_string()).collect(),
            }
        }

        pub fn recorded(&self) -> Vec<RecordedSend> {
            self.sends.lock().unwrap().clone()
        }
    }

    impl MessageSender for RecordingSender {
        fn send(
            &self,
            channel: CommunicationChannel,
            recipient: &str,
            subject: &str,
            body: &str,
        ) -> Result<()> {
            if self.fail_recipients.iter().any(|r| r == recipient) {
                anyhow::bail!("simulated delivery failure for {}", recipient);
            }
            self.sends.lock().unwrap().push(RecordedSend {
                channel,
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }
    }
}
