//! SMTP delivery adapters.

mod lettre_transport;

pub use lettre_transport::LettreMailTransport;
