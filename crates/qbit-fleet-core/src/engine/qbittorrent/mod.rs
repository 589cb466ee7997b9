//! qBittorrent Web API client (`/api/v2`).
//!
//! Every call is a fresh libcurl exchange carrying the session cookie obtained
//! at login. Newer engines renamed `pause`/`resume` to `stop`/`start`; the client
//! switches the first time the old endpoint answers 404 and stays switched.

mod http;
mod wire;

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use url::Url;

use crate::config::FleetConfig;
use crate::item::{Item, ItemId};

use self::http::HttpResponse;
use super::{AuthError, Command, Engine, EngineCommandError, EngineError, Session, TransportError};

const LOGIN_OK: &str = "Ok.";

/// Blocking client for one engine.
#[derive(Debug)]
pub struct QbitClient {
    host: String,
    base: Url,
    username: String,
    password: String,
    timeout: Duration,
    stop_start_endpoints: AtomicBool,
}

impl QbitClient {
    pub fn new(host: &str, username: &str, password: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            host: host.to_string(),
            base: base_url(host)?,
            username: username.to_string(),
            password: password.to_string(),
            timeout,
            stop_start_endpoints: AtomicBool::new(false),
        })
    }

    pub fn from_config(cfg: &FleetConfig) -> Result<Self> {
        Self::new(&cfg.host, &cfg.username, &cfg.password, cfg.request_timeout())
    }

    fn endpoint(&self, path: &str) -> Result<String, TransportError> {
        self.base
            .join(path)
            .map(String::from)
            .map_err(|e| TransportError::Other(format!("bad endpoint {path}: {e}")))
    }

    fn exchange(
        &self,
        path: &str,
        form: Option<&str>,
        session: Option<&Session>,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.endpoint(path)?;
        let cookie = session.and_then(Session::cookie);
        http::perform(&url, self.base.as_str(), self.timeout, form, cookie)
            .map_err(|e| TransportError::from_curl(&e))
    }

    /// Authenticated call that must answer 200.
    fn call(
        &self,
        path: &str,
        form: Option<&str>,
        session: &Session,
    ) -> Result<HttpResponse, TransportError> {
        let resp = self.exchange(path, form, Some(session))?;
        match resp.status {
            200 => Ok(resp),
            401 | 403 => Err(TransportError::Forbidden),
            code => Err(TransportError::Http(code)),
        }
    }

    fn login(&self) -> Result<HttpResponse, AuthError> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &self.username)
            .append_pair("password", &self.password)
            .finish();
        let resp = self
            .exchange("api/v2/auth/login", Some(&form), None)
            .map_err(|e| AuthError::from_transport(&self.host, e))?;
        check_login(&self.host, resp.status, &resp.text())?;
        Ok(resp)
    }

    fn command_path(&self, command: Command) -> &'static str {
        let renamed = self.stop_start_endpoints.load(Ordering::Relaxed);
        match (command, renamed) {
            (Command::Pause, false) => "api/v2/torrents/pause",
            (Command::Resume, false) => "api/v2/torrents/resume",
            (Command::Pause, true) => "api/v2/torrents/stop",
            (Command::Resume, true) => "api/v2/torrents/start",
        }
    }

    fn batch(&self, session: &Session, command: Command, ids: &[ItemId]) -> Result<(), EngineError> {
        if ids.is_empty() {
            return Ok(());
        }
        let hashes = ids.iter().map(ItemId::as_str).collect::<Vec<_>>().join("|");
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("hashes", &hashes)
            .finish();

        let mut resp = self.exchange(self.command_path(command), Some(&form), Some(session))?;
        if resp.status == 404 && !self.stop_start_endpoints.swap(true, Ordering::Relaxed) {
            tracing::info!(host = %self.host, "engine uses stop/start endpoints");
            resp = self.exchange(self.command_path(command), Some(&form), Some(session))?;
        }
        match resp.status {
            200 => Ok(()),
            401 | 403 => Err(TransportError::Forbidden.into()),
            status => Err(EngineCommandError {
                command,
                count: ids.len(),
                status,
            }
            .into()),
        }
    }
}

impl Engine for QbitClient {
    fn host(&self) -> &str {
        &self.host
    }

    fn verify_web_ui(&self) -> Result<(), AuthError> {
        self.login()?;
        tracing::info!(host = %self.host, "verified Web UI access");
        Ok(())
    }

    fn authenticate(&self) -> Result<Session, AuthError> {
        let resp = self.login()?;
        let session = Session::new(resp.session_cookie());
        let version = self.version(&session).map_err(|source| AuthError::Session {
            host: self.host.clone(),
            source,
        })?;
        tracing::debug!(host = %self.host, %version, "engine session established");
        Ok(session)
    }

    fn version(&self, session: &Session) -> Result<String, TransportError> {
        let resp = self.call("api/v2/app/version", None, session)?;
        Ok(resp.text().trim().to_string())
    }

    fn list_items(&self, session: &Session) -> Result<Vec<Item>, TransportError> {
        let resp = self.call("api/v2/torrents/info", None, session)?;
        wire::parse_torrent_list(&resp.body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn pause(&self, session: &Session, ids: &[ItemId]) -> Result<(), EngineError> {
        self.batch(session, Command::Pause, ids)
    }

    fn resume(&self, session: &Session, ids: &[ItemId]) -> Result<(), EngineError> {
        self.batch(session, Command::Resume, ids)
    }
}

/// Web UI base URL for `host`. A bare `host:port` means plain HTTP; any path is
/// kept (reverse-proxy prefixes) and given a trailing slash so joins append.
pub fn base_url(host: &str) -> Result<Url> {
    let host = host.trim();
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let mut url = Url::parse(&raw).with_context(|| format!("invalid engine address {host:?}"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Login succeeds only on HTTP 200 with the exact body `Ok.`.
fn check_login(host: &str, status: u32, body: &str) -> Result<(), AuthError> {
    let host = host.to_string();
    match status {
        200 if body == LOGIN_OK => Ok(()),
        200 => Err(AuthError::BadCredentials { host }),
        403 => Err(AuthError::Banned { host }),
        status => Err(AuthError::Unexpected {
            host,
            status,
            body: body.chars().take(200).collect(),
        }),
    }
}
