//! Engine client: the controller's only view of the download engine.
//!
//! [`Engine`] is the seam between policy and I/O. [`QbitClient`] talks to the
//! qBittorrent Web API over libcurl; tests substitute scripted engines.

mod error;
mod qbittorrent;
#[cfg(test)]
pub(crate) mod scripted;

pub use error::{AuthError, Command, EngineCommandError, EngineError, TransportError};
pub use qbittorrent::QbitClient;

use crate::item::{Item, ItemId};

/// Authenticated session with the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    cookie: Option<String>,
}

impl Session {
    /// `cookie` is the `name=value` pair set at login, sent back verbatim. The
    /// engine lets operators rename it, so the name is not assumed. `None` when
    /// the engine skips authentication (e.g. localhost bypass).
    pub fn new(cookie: Option<String>) -> Self {
        Self { cookie }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }
}

/// Operations the controller needs from a download engine.
///
/// Calls are blocking and bounded by the client's request timeout. Batch
/// commands apply to the whole id set or fail as a whole.
pub trait Engine {
    /// Address shown in logs and diagnostics.
    fn host(&self) -> &str;

    /// Out-of-band credential check against the Web UI, without keeping a session.
    fn verify_web_ui(&self) -> Result<(), AuthError>;

    /// Log in and return a usable session.
    fn authenticate(&self) -> Result<Session, AuthError>;

    /// Engine version string; doubles as a connection check.
    fn version(&self, session: &Session) -> Result<String, TransportError>;

    fn list_items(&self, session: &Session) -> Result<Vec<Item>, TransportError>;

    fn pause(&self, session: &Session, ids: &[ItemId]) -> Result<(), EngineError>;

    fn resume(&self, session: &Session, ids: &[ItemId]) -> Result<(), EngineError>;
}
