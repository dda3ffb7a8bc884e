//! Outbound adapters implementing domain ports.
//!
//! - **mail**: SMTP delivery through `lettre`
//! - **persistence**: PostgreSQL profile store through Diesel

pub mod mail;
pub mod persistence;
