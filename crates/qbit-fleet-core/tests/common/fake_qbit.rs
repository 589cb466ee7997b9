//! Minimal HTTP/1.1 server emulating the qBittorrent Web API for integration tests.
//!
//! Serves login, version, torrent listing and pause/resume (or stop/start)
//! from shared in-memory state, and records every batch command it accepts.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeTorrent {
    pub hash: String,
    pub added_on: i64,
    pub progress: f64,
    pub size: i64,
    pub state: String,
}

impl FakeTorrent {
    pub fn new(hash: &str, progress: f64, added_on: i64, state: &str) -> Self {
        Self {
            hash: hash.to_string(),
            added_on,
            progress,
            size: 1 << 30,
            state: state.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct FakeState {
    pub username: String,
    pub password: String,
    /// Name of the session cookie; the engine lets operators change it.
    pub cookie_name: String,
    pub sid: String,
    pub torrents: Vec<FakeTorrent>,
    /// Login answers 403 (client banned).
    pub banned: bool,
    /// Only `/torrents/stop` and `/torrents/start` exist (newer engines).
    pub stop_start_only: bool,
    pub logins: u32,
    /// Accepted batch commands: (endpoint name, hashes).
    pub commands: Vec<(String, Vec<String>)>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "adminadmin".to_string(),
            cookie_name: "SID".to_string(),
            sid: "sid-0".to_string(),
            torrents: Vec::new(),
            banned: false,
            stop_start_only: false,
            logins: 0,
            commands: Vec::new(),
        }
    }
}

pub struct FakeQbit {
    /// `host:port` to put in the client config.
    pub host: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeQbit {
    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Invalidate the current session cookie, as an engine restart would.
    pub fn expire_session(&self) {
        let mut s = self.state();
        s.sid = format!("{}-expired", s.sid);
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(torrents: Vec<FakeTorrent>) -> FakeQbit {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(FakeState {
        torrents,
        ..FakeState::default()
    }));
    let shared = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &state));
        }
    });
    FakeQbit {
        host: format!("127.0.0.1:{}", port),
        state,
    }
}

/// An address nothing listens on (connection refused).
pub fn closed_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("127.0.0.1:{}", port)
}

struct Request {
    method: String,
    path: String,
    cookie: Option<String>,
    body: String,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let mut content_length = 0usize;
    let mut cookie = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("cookie") {
                cookie = Some(value.to_string());
            }
        }
    }
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..end]).into_owned();
    Some(Request {
        method,
        path,
        cookie,
        body,
    })
}

fn form_value(body: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn respond(stream: &mut TcpStream, status: &str, extra_headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
        status,
        body.len(),
        extra_headers,
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn handle(mut stream: TcpStream, state: &Mutex<FakeState>) {
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    let mut s = state.lock().unwrap();
    let expected = format!("{}={}", s.cookie_name, s.sid);
    let authed = req
        .cookie
        .as_deref()
        .map_or(false, |c| c.split(';').any(|p| p.trim() == expected));

    match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/api/v2/auth/login") => {
            if s.banned {
                respond(&mut stream, "403 Forbidden", "", "Your IP address has been banned");
                return;
            }
            let user = form_value(&req.body, "username");
            let pass = form_value(&req.body, "password");
            if user.as_deref() == Some(s.username.as_str())
                && pass.as_deref() == Some(s.password.as_str())
            {
                s.logins += 1;
                s.sid = format!("sid-{}", s.logins);
                let cookie = format!(
                    "set-cookie: {}={}; HttpOnly; path=/\r\n",
                    s.cookie_name, s.sid
                );
                respond(&mut stream, "200 OK", &cookie, "Ok.");
            } else {
                respond(&mut stream, "200 OK", "", "Fails.");
            }
        }
        (_, _) if !authed => respond(&mut stream, "403 Forbidden", "", "Forbidden"),
        ("GET", "/api/v2/app/version") => respond(&mut stream, "200 OK", "", "v4.6.2"),
        ("GET", "/api/v2/torrents/info") => {
            let list: Vec<serde_json::Value> = s
                .torrents
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "hash": t.hash,
                        "name": format!("torrent {}", t.hash),
                        "added_on": t.added_on,
                        "progress": t.progress,
                        "size": t.size,
                        "state": t.state,
                    })
                })
                .collect();
            let body = serde_json::Value::Array(list).to_string();
            respond(&mut stream, "200 OK", "content-type: application/json\r\n", &body);
        }
        ("POST", path) => {
            let name = path.trim_start_matches("/api/v2/torrents/");
            let (known, new_state) = match name {
                "pause" => (!s.stop_start_only, "pausedDL"),
                "resume" => (!s.stop_start_only, "queuedDL"),
                "stop" => (s.stop_start_only, "stoppedDL"),
                "start" => (s.stop_start_only, "queuedDL"),
                _ => (false, ""),
            };
            if !known {
                respond(&mut stream, "404 Not Found", "", "Not Found");
                return;
            }
            let hashes: Vec<String> = form_value(&req.body, "hashes")
                .unwrap_or_default()
                .split('|')
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect();
            for t in s.torrents.iter_mut().filter(|t| hashes.contains(&t.hash)) {
                t.state = new_state.to_string();
            }
            s.commands.push((name.to_string(), hashes));
            respond(&mut stream, "200 OK", "", "");
        }
        _ => respond(&mut stream, "404 Not Found", "", "Not Found"),
    }
}
