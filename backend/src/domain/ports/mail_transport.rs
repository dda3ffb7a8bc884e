//! Driven port for outbound mail delivery.
//!
//! The OTP mailer drives this port once per candidate configuration: a cheap
//! `probe` first, then the real `send`. Adapters classify their failures so
//! the mailer can decide whether to keep exploring.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{OtpMessage, SmtpTarget};

use super::define_port_error;

define_port_error! {
    /// Failures reported by mail transport adapters.
    pub enum MailTransportError {
        /// Network-class failure (timeout, reset, refused, unknown host).
        Recoverable { message: String } => "recoverable transport failure: {message}",
        /// The server rejected the credentials.
        Authentication { message: String } => "authentication failed: {message}",
        /// The message could not be built (for example a malformed address).
        InvalidMessage { message: String } => "invalid message: {message}",
        /// Any other protocol or TLS failure.
        Other { message: String } => "transport failure: {message}",
    }
}

impl MailTransportError {
    /// Whether retrying against a different configuration is reasonable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable { .. })
    }

    /// Whether exploration must stop immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::InvalidMessage { .. }
        )
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Connect to `target` and complete the greeting and TLS handshake
    /// without sending anything.
    async fn probe(&self, target: &SmtpTarget) -> Result<(), MailTransportError>;

    /// Deliver `message` through `target`.
    async fn send(&self, target: &SmtpTarget, message: &OtpMessage)
    -> Result<(), MailTransportError>;
}

/// Transport that accepts every message without delivering it.
///
/// Used when no SMTP relay is configured so the mailer can still be built.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailTransport;

#[async_trait]
impl MailTransport for FixtureMailTransport {
    async fn probe(&self, target: &SmtpTarget) -> Result<(), MailTransportError> {
        info!(%target, "fixture transport probe");
        Ok(())
    }

    async fn send(
        &self,
        target: &SmtpTarget,
        message: &OtpMessage,
    ) -> Result<(), MailTransportError> {
        info!(%target, to = %message.to, "fixture transport discarded message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MailTransportError::recoverable("timed out"), true, false)]
    #[case(MailTransportError::authentication("535"), false, true)]
    #[case(MailTransportError::invalid_message("bad address"), false, true)]
    #[case(MailTransportError::other("tls"), false, false)]
    fn classifies_errors(
        #[case] error: MailTransportError,
        #[case] recoverable: bool,
        #[case] fatal: bool,
    ) {
        assert_eq!(error.is_recoverable(), recoverable);
        assert_eq!(error.is_fatal(), fatal);
    }
}
