//! SMTP candidate configurations and their exploration order.

use std::fmt;

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityMode {
    /// Plain connection upgraded with `STARTTLS`.
    StartTls,
    /// TLS from the first byte (SMTPS).
    ImplicitTls,
}

impl SecurityMode {
    /// Short label used in logs and delivery messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartTls => "starttls",
            Self::ImplicitTls => "tls",
        }
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (host, port, security mode) combination to try.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SmtpTarget {
    pub host: String,
    pub port: u16,
    pub mode: SecurityMode,
}

impl SmtpTarget {
    /// Build a target.
    pub fn new(host: impl Into<String>, port: u16, mode: SecurityMode) -> Self {
        Self {
            host: host.into(),
            port,
            mode,
        }
    }
}

impl fmt::Display for SmtpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.host, self.port, self.mode)
    }
}

/// Port/mode pairs explored when no port is pinned.
const EXPLORATION_ORDER: [(u16, SecurityMode); 7] = [
    (587, SecurityMode::StartTls),
    (587, SecurityMode::ImplicitTls),
    (465, SecurityMode::ImplicitTls),
    (25, SecurityMode::StartTls),
    (25, SecurityMode::ImplicitTls),
    (2525, SecurityMode::StartTls),
    (2525, SecurityMode::ImplicitTls),
];

/// Build the ordered candidate list, truncated to `max_attempts`.
///
/// A pinned port yields a single candidate using implicit TLS only on 465.
///
/// # Examples
/// ```
/// use schoolemy_backend::domain::{candidate_targets, SecurityMode};
///
/// let pinned = candidate_targets("smtp.example.com", Some(465), 3);
/// assert_eq!(pinned.len(), 1);
/// assert_eq!(pinned[0].mode, SecurityMode::ImplicitTls);
///
/// let explored = candidate_targets("smtp.example.com", None, 3);
/// let ports: Vec<u16> = explored.iter().map(|target| target.port).collect();
/// assert_eq!(ports, vec![587, 587, 465]);
/// ```
pub fn candidate_targets(host: &str, pinned_port: Option<u16>, max_attempts: u32) -> Vec<SmtpTarget> {
    let cap = usize::try_from(max_attempts).unwrap_or(usize::MAX);
    match pinned_port {
        Some(port) => {
            let mode = if port == 465 {
                SecurityMode::ImplicitTls
            } else {
                SecurityMode::StartTls
            };
            vec![SmtpTarget::new(host, port, mode)]
        }
        None => EXPLORATION_ORDER
            .iter()
            .take(cap)
            .map(|(port, mode)| SmtpTarget::new(host, *port, *mode))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(587, SecurityMode::StartTls)]
    #[case(465, SecurityMode::ImplicitTls)]
    #[case(2525, SecurityMode::StartTls)]
    fn pinned_port_yields_single_candidate(#[case] port: u16, #[case] mode: SecurityMode) {
        let targets = candidate_targets("relay", Some(port), 3);
        assert_eq!(targets, vec![SmtpTarget::new("relay", port, mode)]);
    }

    #[rstest]
    fn full_exploration_order_without_cap() {
        let targets = candidate_targets("relay", None, u32::MAX);
        let pairs: Vec<(u16, SecurityMode)> =
            targets.iter().map(|target| (target.port, target.mode)).collect();
        assert_eq!(pairs, EXPLORATION_ORDER.to_vec());
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 3)]
    #[case(10, 7)]
    fn exploration_is_capped(#[case] max_attempts: u32, #[case] expected: usize) {
        assert_eq!(candidate_targets("relay", None, max_attempts).len(), expected);
    }

    #[rstest]
    fn display_names_host_port_and_mode() {
        let target = SmtpTarget::new("smtp.example.com", 465, SecurityMode::ImplicitTls);
        assert_eq!(target.to_string(), "smtp.example.com:465 (tls)");
    }
}
