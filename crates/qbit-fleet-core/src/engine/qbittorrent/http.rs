//! One blocking HTTP exchange with the Web API over libcurl.

use std::str;
use std::time::Duration;

/// Raw response: status, header lines and body.
#[derive(Debug, Clone)]
pub(super) struct HttpResponse {
    pub status: u32,
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// First `name=value` pair set by a `Set-Cookie` header, attributes dropped.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers.iter().find_map(|line| {
            let (header, value) = line.split_once(':')?;
            if !header.trim().eq_ignore_ascii_case("set-cookie") {
                return None;
            }
            let pair = value.trim().split(';').next()?.trim();
            let (name, _) = pair.split_once('=')?;
            (!name.trim().is_empty()).then(|| pair.to_string())
        })
    }
}

/// Performs a GET (when `form` is `None`) or a form POST to `url`.
///
/// The Referer header is set to `referer` because the Web UI rejects
/// cross-origin requests. Runs in the current thread.
pub(super) fn perform(
    url: &str,
    referer: &str,
    timeout: Duration,
    form: Option<&str>,
    cookie: Option<&str>,
) -> Result<HttpResponse, curl::Error> {
    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    list.append(&format!("Referer: {}", referer))?;
    // No 100-continue round trip for small form bodies.
    list.append("Expect:")?;
    easy.http_headers(list)?;

    if let Some(cookie) = cookie {
        easy.cookie(cookie)?;
    }
    if let Some(form) = form {
        easy.post(true)?;
        easy.post_fields_copy(form.as_bytes())?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
