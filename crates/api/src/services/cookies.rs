//! Session cookie helpers.
//!
//! The hosted auth service hands back an access/refresh token pair on sign-in.
//! Both are stored in httpOnly cookies so the admin pages and the admin API
//! can read them without exposing them to scripts.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::config::SessionConfig;

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

#[derive(Debug, Clone)]
pub struct CookieHelper {
    secure: bool,
    refresh_max_age_secs: i64,
}

impl CookieHelper {
    pub fn new(secure: bool, refresh_max_age_secs: i64) -> Self {
        Self {
            secure,
            refresh_max_age_secs,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.cookie_secure, config.refresh_cookie_max_age_secs)
    }

    /// Access cookie lives as long as the token itself.
    pub fn build_access_token_cookie(&self, token: &str, expires_in_secs: i64) -> String {
        self.build_cookie(ACCESS_TOKEN_COOKIE, token, expires_in_secs)
    }

    pub fn build_refresh_token_cookie(&self, token: &str) -> String {
        self.build_cookie(REFRESH_TOKEN_COOKIE, token, self.refresh_max_age_secs)
    }

    pub fn build_clear_cookie(&self, name: &str) -> String {
        let mut cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            name
        );
        self.push_attributes(&mut cookie);
        cookie
    }

    /// Appends both session cookies to a response.
    pub fn add_session_cookies(
        &self,
        headers: &mut HeaderMap,
        access_token: &str,
        expires_in_secs: i64,
        refresh_token: &str,
    ) {
        let cookies = [
            self.build_access_token_cookie(access_token, expires_in_secs),
            self.build_refresh_token_cookie(refresh_token),
        ];
        for cookie in cookies {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.append(SET_COOKIE, value);
            }
        }
    }

    /// Appends expired cookies so the browser drops the session.
    pub fn add_clear_cookies(&self, headers: &mut HeaderMap) {
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            if let Ok(value) = HeaderValue::from_str(&self.build_clear_cookie(name)) {
                headers.append(SET_COOKIE, value);
            }
        }
    }

    pub fn extract_access_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        extract_cookie(headers, ACCESS_TOKEN_COOKIE)
    }

    fn build_cookie(&self, name: &str, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{}={}; Path=/; Max-Age={}", name, value, max_age.max(0));
        self.push_attributes(&mut cookie);
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        cookie.push_str("; HttpOnly");
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=Lax");
    }
}

/// Extract a cookie value from request headers by name.
pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookie_header| cookie_header.split(';'))
        .map(str::trim)
        .find_map(|cookie| {
            let (cookie_name, cookie_value) = cookie.split_once('=')?;
            (cookie_name == name && !cookie_value.is_empty()).then_some(cookie_value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CookieHelper {
        CookieHelper::new(true, 2_592_000)
    }

    #[test]
    fn test_access_cookie_attributes() {
        let cookie = helper().build_access_token_cookie("abc", 3600);

        assert!(cookie.starts_with("sb-access-token=abc; Path=/; Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_refresh_cookie_uses_configured_age() {
        let cookie = helper().build_refresh_token_cookie("r1");
        assert!(cookie.contains("sb-refresh-token=r1"));
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_insecure_cookie() {
        let cookie = CookieHelper::new(false, 60).build_access_token_cookie("t", 60);
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_clear_cookies() {
        let mut headers = HeaderMap::new();
        helper().add_clear_cookies(&mut headers);

        let values: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.contains("Max-Age=0")));
        assert!(values[0].starts_with("sb-access-token=;"));
        assert!(values[1].starts_with("sb-refresh-token=;"));
    }

    #[test]
    fn test_add_session_cookies() {
        let mut headers = HeaderMap::new();
        helper().add_session_cookies(&mut headers, "access", 900, "refresh");
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=tok123; other=1"),
        );

        assert_eq!(helper().extract_access_token(&headers), Some("tok123"));
        assert_eq!(extract_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_empty_cookie_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sb-access-token="));
        assert_eq!(helper().extract_access_token(&headers), None);
    }
}
