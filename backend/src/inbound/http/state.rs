//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be tested against mocks without I/O.

use std::sync::Arc;

use crate::domain::ports::{FixtureProfileCommand, FixtureProfileQuery, ProfileCommand, ProfileQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub profile_query: Arc<dyn ProfileQuery>,
    pub profile_command: Arc<dyn ProfileCommand>,
}

impl HttpState {
    /// Bundle the profile ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use schoolemy_backend::domain::ports::{FixtureProfileCommand, FixtureProfileQuery};
    /// use schoolemy_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureProfileQuery), Arc::new(FixtureProfileCommand));
    /// let _query = state.profile_query.clone();
    /// ```
    pub fn new(profile_query: Arc<dyn ProfileQuery>, profile_command: Arc<dyn ProfileCommand>) -> Self {
        Self {
            profile_query,
            profile_command,
        }
    }

    /// State backed by in-memory fixture ports.
    pub fn fixtures() -> Self {
        Self::new(Arc::new(FixtureProfileQuery), Arc::new(FixtureProfileCommand))
    }
}
