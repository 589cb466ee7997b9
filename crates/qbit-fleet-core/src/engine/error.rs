//! Engine error taxonomy.
//!
//! Auth failures and lost connections mean the session is suspect and trigger
//! the supervisor's reconnect path. Server errors, bad payloads and command
//! rejections come from a live session and do not.

use std::fmt;
use thiserror::Error;

/// Failure while verifying access or logging in.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("connection to {host} refused")]
    Refused { host: String },
    #[error("{host} is unreachable: {reason}")]
    Unreachable { host: String, reason: String },
    #[error("login to {host} timed out")]
    TimedOut { host: String },
    #[error("{host} rejected the username or password")]
    BadCredentials { host: String },
    #[error("{host} banned this client after too many failed logins")]
    Banned { host: String },
    #[error("unexpected login response from {host}: HTTP {status}: {body}")]
    Unexpected {
        host: String,
        status: u32,
        body: String,
    },
    #[error("logged in to {host} but the session is unusable")]
    Session {
        host: String,
        #[source]
        source: TransportError,
    },
}

impl AuthError {
    /// Map a transport failure during login to the matching auth diagnosis.
    pub fn from_transport(host: &str, err: TransportError) -> Self {
        let host = host.to_string();
        match err {
            TransportError::Refused => AuthError::Refused { host },
            TransportError::Timeout => AuthError::TimedOut { host },
            TransportError::Unreachable(reason) | TransportError::Other(reason) => {
                AuthError::Unreachable { host, reason }
            }
            other => AuthError::Session {
                host,
                source: other,
            },
        }
    }

    /// Credential problems do not go away by retrying.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            AuthError::BadCredentials { .. } | AuthError::Banned { .. }
        )
    }
}

/// Network-level failure of an authenticated call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection refused")]
    Refused,
    #[error("host unreachable: {0}")]
    Unreachable(String),
    #[error("request timed out")]
    Timeout,
    /// The engine no longer accepts our session cookie.
    #[error("session rejected by engine (HTTP 403)")]
    Forbidden,
    #[error("unexpected HTTP {0}")]
    Http(u32),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("no engine session")]
    NotConnected,
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// The connection or the session is gone; a fresh login may help.
    pub fn is_connection_loss(&self) -> bool {
        matches!(
            self,
            TransportError::Refused
                | TransportError::Unreachable(_)
                | TransportError::Timeout
                | TransportError::Forbidden
                | TransportError::NotConnected
        )
    }

    /// Classify a curl error into a transport kind.
    pub fn from_curl(e: &curl::Error) -> Self {
        if e.is_operation_timedout() {
            return TransportError::Timeout;
        }
        if e.is_couldnt_connect() {
            return TransportError::Refused;
        }
        if e.is_couldnt_resolve_host()
            || e.is_couldnt_resolve_proxy()
            || e.is_read_error()
            || e.is_recv_error()
            || e.is_send_error()
            || e.is_got_nothing()
        {
            return TransportError::Unreachable(e.to_string());
        }
        TransportError::Other(e.to_string())
    }
}

/// Batch command kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Pause => "pause",
            Command::Resume => "resume",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine answered but refused a whole pause/resume batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{command} of {count} torrent(s) rejected: HTTP {status}")]
pub struct EngineCommandError {
    pub command: Command,
    pub count: usize,
    pub status: u32,
}

/// Any failure of an engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Command(#[from] EngineCommandError),
}

impl EngineError {
    /// True when the session should be dropped and re-established.
    pub fn needs_reconnect(&self) -> bool {
        match self {
            EngineError::Auth(_) => true,
            EngineError::Transport(t) => t.is_connection_loss(),
            EngineError::Command(_) => false,
        }
    }
}
