//! Mailer configuration read from the environment.
//!
//! The configuration is an explicit value handed to [`super::OtpMailer`];
//! nothing here is cached in process-wide state.

use std::fmt;
use std::time::Duration;

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

const HOST_ENV: &str = "SMTP_HOST";
const PORT_ENV: &str = "SMTP_PORT";
const USER_ENV: &str = "SMTP_USER";
const USER_FALLBACK_ENV: &str = "EMAIL_ADMIN";
const PASS_ENV: &str = "SMTP_PASS";
const PASS_FALLBACK_ENV: &str = "EMAIL_PASS";
const FROM_ENV: &str = "EMAIL_FROM";
const TIMEOUT_ENV: &str = "SMTP_TIMEOUT";
const MAX_ATTEMPTS_ENV: &str = "SMTP_MAX_ATTEMPTS";
const DEV_FALLBACK_ENV: &str = "DEV_EMAIL_FALLBACK";
const APP_ENV: &str = "APP_ENV";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const PORT_EXPECTED: &str = "a TCP port between 1 and 65535";
const MILLIS_EXPECTED: &str = "a positive number of milliseconds";
const ATTEMPTS_EXPECTED: &str = "a positive integer";

/// Default per-connection timeout.
pub const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_millis(30_000);
/// Default cap on candidate configurations tried per delivery.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Errors raised while reading mailer configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MailerConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// SMTP login. The password is wiped from memory on drop.
#[derive(Clone)]
pub struct SmtpCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl SmtpCredentials {
    /// Bundle a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Login name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login secret.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Relay settings present when SMTP delivery is configured.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    /// Explicitly pinned port; `None` explores the default candidates.
    pub port: Option<u16>,
    pub credentials: SmtpCredentials,
    /// Envelope and header sender.
    pub from: String,
    /// Per-connection timeout applied by the transport.
    pub timeout: Duration,
}

/// Complete mailer configuration.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// `None` when host or credentials are missing.
    pub smtp: Option<SmtpSettings>,
    /// Upper bound on candidate configurations tried per delivery.
    pub max_attempts: u32,
    /// Return the code to the caller when delivery is impossible.
    pub dev_fallback: bool,
    /// Production deployments never use the dev fallback.
    pub production: bool,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            smtp: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            dev_fallback: false,
            production: true,
        }
    }
}

impl MailerConfig {
    /// Read the configuration from environment variables.
    ///
    /// `SMTP_USER`/`SMTP_PASS` fall back to `EMAIL_ADMIN`/`EMAIL_PASS`, and
    /// `EMAIL_FROM` defaults to the SMTP user.
    ///
    /// # Examples
    /// ```
    /// use mockable::MockEnv;
    /// use schoolemy_backend::domain::MailerConfig;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "SMTP_HOST" => Some("smtp.example.com".to_owned()),
    ///     "SMTP_USER" => Some("mailer@example.com".to_owned()),
    ///     "SMTP_PASS" => Some("secret".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let config = MailerConfig::from_env(&env).expect("valid config");
    /// let smtp = config.smtp.expect("configured");
    /// assert_eq!(smtp.from, "mailer@example.com");
    /// assert_eq!(config.max_attempts, 3);
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, MailerConfigError> {
        let port = parse_env(env, PORT_ENV, PORT_EXPECTED, |raw| {
            raw.parse::<u16>().ok().filter(|port| *port > 0)
        })?;
        let timeout = parse_env(env, TIMEOUT_ENV, MILLIS_EXPECTED, |raw| {
            raw.parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis)
        })?
        .unwrap_or(DEFAULT_SMTP_TIMEOUT);
        let max_attempts = parse_env(env, MAX_ATTEMPTS_ENV, ATTEMPTS_EXPECTED, |raw| {
            raw.parse::<u32>().ok().filter(|attempts| *attempts > 0)
        })?
        .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let dev_fallback = parse_env(env, DEV_FALLBACK_ENV, BOOL_EXPECTED, parse_bool)?
            .unwrap_or(false);
        let production = non_empty(env, APP_ENV)
            .is_some_and(|value| value.eq_ignore_ascii_case("production"));

        let host = non_empty(env, HOST_ENV);
        let username = non_empty(env, USER_ENV).or_else(|| non_empty(env, USER_FALLBACK_ENV));
        let password = non_empty(env, PASS_ENV).or_else(|| non_empty(env, PASS_FALLBACK_ENV));

        let smtp = match (host, username, password) {
            (Some(host), Some(username), Some(password)) => {
                let from = non_empty(env, FROM_ENV).unwrap_or_else(|| username.clone());
                Some(SmtpSettings {
                    host,
                    port,
                    credentials: SmtpCredentials::new(username, password),
                    from,
                    timeout,
                })
            }
            (None, None, None) => None,
            _ => {
                warn!("SMTP configuration incomplete; host, user and password are all required");
                None
            }
        };

        Ok(Self {
            smtp,
            max_attempts,
            dev_fallback,
            production,
        })
    }

    /// Whether the insecure dev fallback may be used.
    pub fn dev_fallback_active(&self) -> bool {
        self.dev_fallback && !self.production
    }
}

fn non_empty<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_env<E, T, F>(
    env: &E,
    name: &'static str,
    expected: &'static str,
    parse: F,
) -> Result<Option<T>, MailerConfigError>
where
    E: Env,
    F: FnOnce(&str) -> Option<T>,
{
    match non_empty(env, name) {
        Some(value) => parse(&value)
            .map(Some)
            .ok_or(MailerConfigError::InvalidEnv {
                name,
                value,
                expected,
            }),
        None => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env_with(vars: &[(&'static str, &'static str)]) -> MockEnv {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |name| map.get(name).cloned());
        env
    }

    #[rstest]
    fn empty_environment_is_unconfigured() {
        let config = MailerConfig::from_env(&env_with(&[])).expect("valid config");
        assert!(config.smtp.is_none());
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert!(!config.dev_fallback);
        assert!(!config.production);
    }

    #[rstest]
    fn legacy_credential_names_are_honoured() {
        let env = env_with(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("EMAIL_ADMIN", "admin@example.com"),
            ("EMAIL_PASS", "hunter2"),
            ("EMAIL_FROM", "no-reply@example.com"),
        ]);
        let config = MailerConfig::from_env(&env).expect("valid config");
        let smtp = config.smtp.expect("configured");
        assert_eq!(smtp.credentials.username(), "admin@example.com");
        assert_eq!(smtp.credentials.password(), "hunter2");
        assert_eq!(smtp.from, "no-reply@example.com");
        assert_eq!(smtp.port, None);
        assert_eq!(smtp.timeout, DEFAULT_SMTP_TIMEOUT);
    }

    #[rstest]
    fn primary_names_take_precedence() {
        let env = env_with(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "primary@example.com"),
            ("EMAIL_ADMIN", "legacy@example.com"),
            ("SMTP_PASS", "p1"),
            ("EMAIL_PASS", "p2"),
            ("SMTP_PORT", "465"),
            ("SMTP_TIMEOUT", "5000"),
            ("SMTP_MAX_ATTEMPTS", "5"),
        ]);
        let config = MailerConfig::from_env(&env).expect("valid config");
        let smtp = config.smtp.expect("configured");
        assert_eq!(smtp.credentials.username(), "primary@example.com");
        assert_eq!(smtp.credentials.password(), "p1");
        assert_eq!(smtp.port, Some(465));
        assert_eq!(smtp.timeout, Duration::from_secs(5));
        assert_eq!(config.max_attempts, 5);
    }

    #[rstest]
    fn host_without_credentials_is_unconfigured() {
        let env = env_with(&[("SMTP_HOST", "smtp.example.com")]);
        let config = MailerConfig::from_env(&env).expect("valid config");
        assert!(config.smtp.is_none());
    }

    #[rstest]
    #[case("SMTP_PORT", "smtp")]
    #[case("SMTP_PORT", "0")]
    #[case("SMTP_TIMEOUT", "-1")]
    #[case("SMTP_MAX_ATTEMPTS", "0")]
    #[case("DEV_EMAIL_FALLBACK", "maybe")]
    fn invalid_values_are_rejected(#[case] name: &'static str, #[case] value: &'static str) {
        let err = MailerConfig::from_env(&env_with(&[(name, value)])).expect_err("invalid value");
        let MailerConfigError::InvalidEnv {
            name: reported,
            value: reported_value,
            ..
        } = err;
        assert_eq!(reported, name);
        assert_eq!(reported_value, value);
    }

    #[rstest]
    #[case(&[("DEV_EMAIL_FALLBACK", "true")], true)]
    #[case(&[("DEV_EMAIL_FALLBACK", "true"), ("APP_ENV", "production")], false)]
    #[case(&[("DEV_EMAIL_FALLBACK", "no"), ("APP_ENV", "development")], false)]
    fn dev_fallback_is_gated_on_environment(
        #[case] vars: &[(&'static str, &'static str)],
        #[case] expected: bool,
    ) {
        let config = MailerConfig::from_env(&env_with(vars)).expect("valid config");
        assert_eq!(config.dev_fallback_active(), expected);
    }

    #[rstest]
    fn credentials_debug_redacts_password() {
        let credentials = SmtpCredentials::new("user", "topsecret");
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("topsecret"));
    }
}
