//! One-time-password delivery over SMTP.
//!
//! [`OtpMailer`] walks an ordered list of [`SmtpTarget`] candidates one at a
//! time. Each candidate is probed before the real send. Probe failures of any
//! kind and recoverable send failures move on to the next candidate, while a
//! fatal send failure stops the walk. When nothing delivers, a development
//! fallback may hand the code back to the caller instead.
//!
//! The mailer never returns `Err`; every path ends in an [`OtpDelivery`].

mod config;
mod message;
mod target;

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{error, info, warn};

use crate::domain::ports::{MailTransport, MailTransportError};

pub use self::config::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_SMTP_TIMEOUT, MailerConfig, MailerConfigError, SmtpCredentials,
    SmtpSettings,
};
pub use self::message::{OTP_SUBJECT, OTP_VALIDITY_MINUTES, OtpMessage};
pub use self::target::{SecurityMode, SmtpTarget, candidate_targets};

const NOT_CONFIGURED: &str = "SMTP transport not configured";
const NO_CANDIDATES: &str = "no SMTP candidates to try";
const DEV_FALLBACK_MESSAGE: &str = "DEV fallback: OTP not delivered via SMTP";
const FAILED_MESSAGE: &str = "Failed to send OTP";

/// Outcome of one delivery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpDelivery {
    /// A candidate accepted the message.
    Sent {
        target: SmtpTarget,
        /// Candidates tried, including the successful one.
        attempts: u32,
    },
    /// Delivery was skipped or failed and the code is returned in clear.
    DevFallback { otp: String, warning: String },
    /// Delivery failed.
    Failed { error: String },
}

impl OtpDelivery {
    /// Whether the caller may treat the OTP as issued.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Caller-facing summary line.
    pub fn message(&self) -> String {
        match self {
            Self::Sent { target, .. } => format!("OTP sent successfully via {target}"),
            Self::DevFallback { .. } => DEV_FALLBACK_MESSAGE.to_owned(),
            Self::Failed { .. } => FAILED_MESSAGE.to_owned(),
        }
    }
}

#[derive(Serialize)]
struct OtpDeliveryBody<'a> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    otp: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for OtpDelivery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = OtpDeliveryBody {
            success: self.is_success(),
            message: self.message(),
            otp: None,
            warning: None,
            error: None,
        };
        match self {
            Self::Sent { .. } => {}
            Self::DevFallback { otp, warning } => {
                body.otp = Some(otp);
                body.warning = Some(warning);
            }
            Self::Failed { error } => body.error = Some(error),
        }
        body.serialize(serializer)
    }
}

/// Why a single candidate did not deliver.
enum AttemptError {
    /// Try the next candidate.
    Skipped(MailTransportError),
    /// Stop exploring.
    Fatal(MailTransportError),
}

impl From<MailTransportError> for AttemptError {
    fn from(err: MailTransportError) -> Self {
        if err.is_fatal() {
            Self::Fatal(err)
        } else {
            Self::Skipped(err)
        }
    }
}

/// Sends OTP emails through a [`MailTransport`].
#[derive(Clone)]
pub struct OtpMailer {
    transport: Arc<dyn MailTransport>,
    config: MailerConfig,
}

impl OtpMailer {
    /// Create a mailer over `transport` with explicit configuration.
    pub fn new(transport: Arc<dyn MailTransport>, config: MailerConfig) -> Self {
        Self { transport, config }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// Deliver `otp` to `recipient`.
    pub async fn send_otp(&self, recipient: &str, otp: &str) -> OtpDelivery {
        let Some(smtp) = self.config.smtp.as_ref() else {
            if self.config.dev_fallback_active() {
                warn!(%recipient, "{NOT_CONFIGURED}; returning OTP through dev fallback");
            } else {
                error!(%recipient, "{NOT_CONFIGURED}");
            }
            return self.fallback_or_fail(otp, NOT_CONFIGURED.to_owned());
        };

        let message = OtpMessage::new(smtp.from.as_str(), recipient, otp);
        let candidates = candidate_targets(&smtp.host, smtp.port, self.config.max_attempts);
        let mut last_error: Option<MailTransportError> = None;

        for (attempt, target) in (1_u32..).zip(candidates) {
            info!(
                attempt,
                host = %target.host,
                port = target.port,
                mode = %target.mode,
                "attempting OTP delivery"
            );
            match self.attempt(&target, &message).await {
                Ok(()) => {
                    info!(attempt, %target, %recipient, "OTP delivered");
                    return OtpDelivery::Sent {
                        target,
                        attempts: attempt,
                    };
                }
                Err(AttemptError::Skipped(err)) => {
                    warn!(attempt, %target, error = %err, "candidate failed; trying next");
                    last_error = Some(err);
                }
                Err(AttemptError::Fatal(err)) => {
                    error!(attempt, %target, error = %err, "fatal transport failure; giving up");
                    return OtpDelivery::Failed {
                        error: err.to_string(),
                    };
                }
            }
        }

        let last = last_error.map_or_else(|| NO_CANDIDATES.to_owned(), |err| err.to_string());
        error!(%recipient, error = %last, "all SMTP candidates exhausted");
        self.fallback_or_fail(otp, last)
    }

    async fn attempt(&self, target: &SmtpTarget, message: &OtpMessage) -> Result<(), AttemptError> {
        // Probes log in when credentials are set, so rejections can arrive here.
        self.transport
            .probe(target)
            .await
            .map_err(AttemptError::from)?;
        self.transport
            .send(target, message)
            .await
            .map_err(AttemptError::from)
    }

    fn fallback_or_fail(&self, otp: &str, last_error: String) -> OtpDelivery {
        if self.config.dev_fallback_active() {
            OtpDelivery::DevFallback {
                otp: otp.to_owned(),
                warning: format!("OTP not delivered: {last_error}"),
            }
        } else {
            OtpDelivery::Failed { error: last_error }
        }
    }
}
