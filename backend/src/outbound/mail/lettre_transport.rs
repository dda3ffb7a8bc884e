//! `MailTransport` adapter backed by lettre's async SMTP client.
//!
//! A fresh client is built per target so each probe or send uses exactly the
//! host, port and TLS mode the mailer asked for.

use std::error::Error as _;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::Error as SmtpError;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::domain::ports::{MailTransport, MailTransportError};
use crate::domain::{OtpMessage, SecurityMode, SmtpCredentials, SmtpTarget};

/// SMTP reply codes meaning the relay refused the login.
const AUTH_FAILURE_CODES: [&str; 3] = ["530", "534", "535"];

/// Sends mail through an SMTP relay with fixed credentials.
#[derive(Clone)]
pub struct LettreMailTransport {
    credentials: SmtpCredentials,
    timeout: Duration,
}

impl LettreMailTransport {
    /// Create a transport that authenticates with `credentials` and applies
    /// `timeout` to every connection.
    pub fn new(credentials: SmtpCredentials, timeout: Duration) -> Self {
        Self {
            credentials,
            timeout,
        }
    }

    fn client(
        &self,
        target: &SmtpTarget,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailTransportError> {
        let parameters = TlsParameters::new(target.host.clone()).map_err(|err| classify(&err))?;
        let tls = match target.mode {
            SecurityMode::StartTls => Tls::Required(parameters),
            SecurityMode::ImplicitTls => Tls::Wrapper(parameters),
        };
        let credentials = Credentials::new(
            self.credentials.username().to_owned(),
            self.credentials.password().to_owned(),
        );
        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(target.host.as_str())
                .port(target.port)
                .tls(tls)
                .credentials(credentials)
                .timeout(Some(self.timeout))
                .build(),
        )
    }
}

fn parse_mailbox(field: &str, value: &str) -> Result<Mailbox, MailTransportError> {
    value
        .parse()
        .map_err(|err| MailTransportError::invalid_message(format!("{field} address {value:?}: {err}")))
}

fn build_message(message: &OtpMessage) -> Result<Message, MailTransportError> {
    Message::builder()
        .from(parse_mailbox("from", &message.from)?)
        .to(parse_mailbox("to", &message.to)?)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(message.html.clone())
        .map_err(|err| MailTransportError::invalid_message(err.to_string()))
}

/// First I/O error in the source chain, if any.
fn io_kind(err: &SmtpError) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = inner.source();
    }
    None
}

fn classify(err: &SmtpError) -> MailTransportError {
    let status = err.status().map(|code| code.to_string());
    classify_parts(status.as_deref(), err.is_timeout(), io_kind(err), &err.to_string())
}

fn classify_parts(
    status: Option<&str>,
    timed_out: bool,
    io_kind: Option<io::ErrorKind>,
    message: &str,
) -> MailTransportError {
    if status.is_some_and(|code| AUTH_FAILURE_CODES.contains(&code)) {
        return MailTransportError::authentication(message);
    }
    let network = matches!(
        io_kind,
        Some(
            io::ErrorKind::TimedOut
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionAborted
        )
    );
    let lookup = message.contains("lookup") || message.contains("resolve");
    if timed_out || network || lookup {
        return MailTransportError::recoverable(message);
    }
    MailTransportError::other(message)
}

#[async_trait]
impl MailTransport for LettreMailTransport {
    async fn probe(&self, target: &SmtpTarget) -> Result<(), MailTransportError> {
        let client = self.client(target)?;
        match client.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailTransportError::recoverable("connection test failed")),
            Err(err) => {
                debug!(%target, error = %err, "smtp probe failed");
                Err(classify(&err))
            }
        }
    }

    async fn send(
        &self,
        target: &SmtpTarget,
        message: &OtpMessage,
    ) -> Result<(), MailTransportError> {
        let email = build_message(message)?;
        let client = self.client(target)?;
        let response = client.send(email).await.map_err(|err| {
            debug!(%target, error = %err, "smtp send failed");
            classify(&err)
        })?;
        debug!(%target, code = %response.code(), "smtp relay accepted message");
        Ok(())
    }
}
