//! Hilfsfunktionen rund um Requests: Token-Extraktion, Cookies, Fehlerantworten

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::rest::CookieKonfig;

/// Fehlerantwort fuer die REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Extrahiert Bearer-Token aus Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Liest den Wert eines Cookies aus allen `Cookie`-Headern
pub fn cookie_wert<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|zeile| zeile.split(';'))
        .filter_map(|paar| paar.trim().split_once('='))
        .find(|(schluessel, _)| *schluessel == name)
        .map(|(_, wert)| wert)
        .filter(|wert| !wert.is_empty())
}

/// Session-Token eines Requests: Cookie vor Bearer-Header
pub fn token_aus_headers<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    cookie_wert(headers, cookie_name).or_else(|| bearer_token(headers))
}

/// `Set-Cookie`-Wert fuer ein neues Session-Token
pub fn session_cookie(konfig: &CookieKonfig, token: &str, max_age_secs: i64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        konfig.name,
        token,
        max_age_secs.max(0)
    );
    if konfig.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie`-Wert, der das Session-Cookie im Browser entfernt
pub fn cookie_loeschen(konfig: &CookieKonfig) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", konfig.name);
    if konfig.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extrahieren() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer mein_token_123"),
        );
        assert_eq!(bearer_token(&headers), Some("mein_token_123"));
    }

    #[test]
    fn bearer_token_fehlt() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn cookie_aus_mehreren_paaren() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; oya_session=abc-123; lang=en"),
        );
        assert_eq!(cookie_wert(&headers, "oya_session"), Some("abc-123"));
        assert_eq!(cookie_wert(&headers, "fehlt"), None);
    }

    #[test]
    fn leeres_cookie_zaehlt_nicht() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("oya_session="));
        headers.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_aus_headers(&headers, "oya_session"), Some("xyz"));
    }

    #[test]
    fn cookie_hat_vorrang_vor_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("oya_session=aus_cookie"));
        headers.insert("authorization", HeaderValue::from_static("Bearer aus_header"));
        assert_eq!(token_aus_headers(&headers, "oya_session"), Some("aus_cookie"));
    }

    #[test]
    fn set_cookie_attribute() {
        let konfig = CookieKonfig {
            name: "oya_session".into(),
            secure: true,
        };
        let c = session_cookie(&konfig, "tok", 3600);
        assert!(c.starts_with("oya_session=tok;"));
        assert!(c.contains("HttpOnly"));
        assert!(c.contains("Max-Age=3600"));
        assert!(c.ends_with("; Secure"));

        let weg = cookie_loeschen(&CookieKonfig::default());
        assert!(weg.contains("Max-Age=0"));
        assert!(!weg.contains("Secure"));
    }
}
