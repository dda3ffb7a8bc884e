//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod mail_transport;
mod profile_command;
mod profile_query;
mod user_profile_repository;

pub use mail_transport::{FixtureMailTransport, MailTransport, MailTransportError};
#[cfg(test)]
pub use mail_transport::MockMailTransport;
pub use profile_command::{FixtureProfileCommand, ProfileCommand};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_query::{FixtureProfileQuery, ProfileQuery};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use user_profile_repository::{UserProfileRepository, UserProfileRepositoryError};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
