//! Connection supervisor: owns the engine session and keeps it usable.
//!
//! State machine: `Disconnected -> Authenticating -> Connected`, back to
//! `Disconnected` on any transport or auth failure. Each operation gets at most
//! one transparent reconnect before its error is returned to the caller.

mod diagnose;
mod policy;

pub use diagnose::{likely_causes, startup_report};
pub use policy::{ReconnectPolicy, RetryDecision};

use std::fmt;

use crate::engine::{AuthError, Engine, EngineError, Session, TransportError};
use crate::item::{Item, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Authenticating,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Authenticating => "authenticating",
            ConnectionState::Connected => "connected",
        })
    }
}

pub struct Supervisor<E> {
    engine: E,
    policy: ReconnectPolicy,
    session: Option<Session>,
    state: ConnectionState,
}

impl<E: Engine> Supervisor<E> {
    pub fn new(engine: E, policy: ReconnectPolicy) -> Self {
        Self {
            engine,
            policy,
            session: None,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn transition(&mut self, to: ConnectionState) {
        if self.state != to {
            tracing::info!(host = %self.engine.host(), from = %self.state, to = %to, "engine connection {}", to);
            self.state = to;
        }
    }

    /// Verify Web UI access and log in, retrying per the policy.
    ///
    /// Blocks for the retry delay between attempts. Credential errors are not retried.
    pub fn connect(&mut self) -> Result<(), AuthError> {
        self.session = None;
        self.transition(ConnectionState::Authenticating);
        let mut attempt = 1u32;
        loop {
            let result = self
                .engine
                .verify_web_ui()
                .and_then(|()| self.engine.authenticate());
            match result {
                Ok(session) => {
                    self.session = Some(session);
                    self.transition(ConnectionState::Connected);
                    return Ok(());
                }
                Err(e) => {
                    tracing::error!(attempt, "connection attempt {} failed: {}", attempt, e);
                    match self.policy.decide(attempt, &e) {
                        RetryDecision::NoRetry => {
                            tracing::error!(attempts = attempt, "failed to connect to engine");
                            self.transition(ConnectionState::Disconnected);
                            return Err(e);
                        }
                        RetryDecision::RetryAfter(d) => {
                            tracing::info!("retrying in {} seconds", d.as_secs());
                            std::thread::sleep(d);
                            attempt += 1;
                        }
                    }
                }
            }
        }
    }

    /// Drop the session; the next operation reconnects.
    pub fn disconnect(&mut self) {
        self.session = None;
        self.transition(ConnectionState::Disconnected);
    }

    /// Run `op` with the current session, reconnecting at most once.
    fn with_session<T>(
        &mut self,
        what: &str,
        op: impl Fn(&E, &Session) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut reconnected = false;
        if self.session.is_none() {
            self.connect()?;
            reconnected = true;
        }
        loop {
            let result = match &self.session {
                Some(session) => op(&self.engine, session),
                None => Err(TransportError::NotConnected.into()),
            };
            match result {
                Err(e) if e.needs_reconnect() => {
                    tracing::warn!("{} failed: {}", what, e);
                    self.disconnect();
                    if reconnected {
                        return Err(e);
                    }
                    tracing::warn!("connection lost, attempting to reconnect");
                    self.connect()?;
                    reconnected = true;
                }
                other => return other,
            }
        }
    }

    pub fn version(&mut self) -> Result<String, EngineError> {
        self.with_session("version query", |e, s| Ok(e.version(s)?))
    }

    pub fn list_items(&mut self) -> Result<Vec<Item>, EngineError> {
        self.with_session("torrent listing", |e, s| Ok(e.list_items(s)?))
    }

    pub fn pause(&mut self, ids: &[ItemId]) -> Result<(), EngineError> {
        self.with_session("pause", |e, s| e.pause(s, ids))
    }

    pub fn resume(&mut self, ids: &[ItemId]) -> Result<(), EngineError> {
        self.with_session("resume", |e, s| e.resume(s, ids))
    }
}
