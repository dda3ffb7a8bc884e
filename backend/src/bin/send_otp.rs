//! Deliver a single one-time password through the configured SMTP relay.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mockable::DefaultEnv;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use schoolemy_backend::domain::ports::{FixtureMailTransport, MailTransport};
use schoolemy_backend::domain::{MailerConfig, OtpMailer};
use schoolemy_backend::outbound::mail::LettreMailTransport;

/// `send-otp` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "send-otp",
    about = "Send a one-time password email using the SMTP_* environment settings",
    version
)]
struct CliArgs {
    /// Recipient email address.
    #[arg(long, value_name = "email")]
    to: String,
    /// Code to deliver.
    #[arg(long, value_name = "code")]
    otp: String,
    /// Pin a single SMTP port instead of exploring the defaults.
    #[arg(long, value_name = "port", value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
}

/// JSON logs on stderr so stdout carries only the delivery result.
fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
}

fn main() -> io::Result<ExitCode> {
    if let Err(error) = init_tracing() {
        warn!(%error, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<ExitCode> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let mut config = MailerConfig::from_env(&DefaultEnv::new())
        .map_err(|error| io::Error::other(format!("read mailer configuration: {error}")))?;
    if let (Some(port), Some(smtp)) = (args.port, config.smtp.as_mut()) {
        smtp.port = Some(port);
    }

    let transport: Arc<dyn MailTransport> = match &config.smtp {
        Some(smtp) => Arc::new(LettreMailTransport::new(smtp.credentials.clone(), smtp.timeout)),
        None => Arc::new(FixtureMailTransport),
    };
    let outcome = OtpMailer::new(transport, config)
        .send_otp(&args.to, &args.otp)
        .await;

    let body = serde_json::to_string(&outcome)
        .map_err(|error| io::Error::other(format!("encode outcome: {error}")))?;
    println!("{body}");

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn repeated_tracing_init_reports_instead_of_panicking() {
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }

    #[rstest]
    fn port_override_must_be_positive() {
        let parsed = CliArgs::try_parse_from([
            "send-otp", "--to", "a@x.com", "--otp", "1", "--port", "0",
        ]);
        assert!(parsed.is_err());
    }
}
