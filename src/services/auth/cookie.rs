/*
 * Responsibility
 * - セッション cookie (`token`) の読み出しと Set-Cookie 値の組み立て
 * - transport は cookie のみ（header / query は受け付けない）
 */
use axum::http::{HeaderMap, HeaderValue, header};

/// The one cookie this service trusts for authentication.
pub const SESSION_COOKIE: &str = "token";

/// Cookie attributes decided at startup (Secure only in production).
#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
    pub max_age_seconds: u64,
}

/// Extract the `token` cookie from the request headers, if present.
///
/// Handles multiple `Cookie` headers and multiple `name=value` pairs per
/// header. Returns the raw token string without attributes.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, token)) = pair.trim().split_once('=')
                && name.trim() == SESSION_COOKIE
                && !token.trim().is_empty()
            {
                return Some(token.trim().to_string());
            }
        }
    }
    None
}

/// Build the Set-Cookie value issued at login.
pub fn session_cookie(token: &str, opts: CookieOptions) -> HeaderValue {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, opts.max_age_seconds
    );
    if opts.secure {
        cookie.push_str("; Secure");
    }
    // The token is base64url + '.'; always a valid header value.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Build the Set-Cookie value that clears the session at logout.
pub fn clear_session_cookie(opts: CookieOptions) -> HeaderValue {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if opts.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_a_lone_token_cookie() {
        let headers = headers_with_cookie("token=abc.def.ghi");
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn reads_the_token_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; token=abc; tracking=1");
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn ignores_other_cookies_and_prefixed_names() {
        let headers = headers_with_cookie("access_token=zzz; tokenish=yyy");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let headers = headers_with_cookie("token=");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn no_cookie_header_yields_none() {
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn set_cookie_carries_security_attributes() {
        let opts = CookieOptions {
            secure: true,
            max_age_seconds: 60,
        };
        let value = session_cookie("abc", opts);
        let s = value.to_str().unwrap();
        assert!(s.starts_with("token=abc;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Lax"));
        assert!(s.contains("Max-Age=60"));
        assert!(s.contains("Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let opts = CookieOptions {
            secure: false,
            max_age_seconds: 60,
        };
        let s = clear_session_cookie(opts);
        let s = s.to_str().unwrap();
        assert!(s.starts_with("token=;"));
        assert!(s.contains("Max-Age=0"));
        assert!(!s.contains("Secure"));
    }
}
