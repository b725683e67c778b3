//! Locale prefixes on page URLs: `/` becomes `/<locale>/`, prefixed pages remember the choice.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use sheet_types::{Locale, LOCALE_COOKIE};

const EXEMPT_PREFIXES: [&str; 4] = ["/api/", "/pkg/", "/files/", "/assets/"];

/// Paths that are never locale-prefixed: API, assets and anything that looks like a file.
pub fn is_exempt(path: &str) -> bool {
    if EXEMPT_PREFIXES.iter().any(|p| path.starts_with(p)) || path == "/api" {
        return true;
    }
    if path == "/robots.txt" || path == "/sitemap.xml" || path.starts_with("/favicon.") {
        return true;
    }
    let last = path.rsplit('/').next().unwrap_or("");
    last.contains('.')
}

/// Supported locales from an `Accept-Language` header, best first.
pub fn accepted_locales(header: &str) -> Vec<Locale> {
    let mut ranked: Vec<(f32, usize, Locale)> = header
        .split(',')
        .enumerate()
        .filter_map(|(i, entry)| {
            let mut parts = entry.trim().split(';');
            let tag = parts.next()?.trim().to_ascii_lowercase();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q=").and_then(|q| q.parse::<f32>().ok()))
                .unwrap_or(1.0);
            let primary = tag.split('-').next().unwrap_or("");
            Locale::from_segment(primary).map(|l| (quality, i, l))
        })
        .filter(|(q, _, _)| *q > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut locales = Vec::new();
    for (_, _, locale) in ranked {
        if !locales.contains(&locale) {
            locales.push(locale);
        }
    }
    locales
}

/// Cookie first, then the browser's preference, then English.
pub fn detect_locale(headers: &HeaderMap) -> Locale {
    let fromCookie = CookieJar::from_headers(headers)
        .get(LOCALE_COOKIE)
        .and_then(|c| Locale::from_segment(c.value()));
    if let Some(locale) = fromCookie {
        return locale;
    }

    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| accepted_locales(h).into_iter().next())
        .unwrap_or_default()
}

fn locale_cookie(locale: Locale) -> String {
    format!("{LOCALE_COOKIE}={locale}; Path=/; Max-Age=31536000; SameSite=Lax")
}

pub async fn locale_redirect(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if is_exempt(&path) {
        return next.run(request).await;
    }

    if let Some((locale, _)) = Locale::split_path(&path) {
        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&locale_cookie(locale)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        return response;
    }

    let locale = detect_locale(request.headers());
    let mut target = locale.href(&path);
    if let Some(query) = request.uri().query() {
        target.push('?');
        target.push_str(query);
    }
    Redirect::temporary(&target).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exempt_paths() {
        assert!(is_exempt("/api/v1/parts"));
        assert!(is_exempt("/pkg/sheetmates.wasm"));
        assert!(is_exempt("/robots.txt"));
        assert!(is_exempt("/favicon.svg"));
        assert!(is_exempt("/brochure.pdf"));
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/pricing"));
        assert!(!is_exempt("/fr/upload"));
    }

    #[test]
    fn accept_language_ordering() {
        assert_eq!(
            accepted_locales("de-DE,de;q=0.9,cs;q=0.5,fr-FR;q=0.8"),
            vec![Locale::Fr, Locale::Cs]
        );
        assert_eq!(accepted_locales("en-US,en;q=0.9"), vec![Locale::En]);
        assert!(accepted_locales("ja,zh;q=0.5").is_empty());
        assert!(accepted_locales("fr;q=0").is_empty());
    }

    #[test]
    fn cookie_wins_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, "fr".parse().unwrap());
        assert_eq!(detect_locale(&headers), Locale::Fr);

        headers.insert(header::COOKIE, "locale=cs".parse().unwrap());
        assert_eq!(detect_locale(&headers), Locale::Cs);

        assert_eq!(detect_locale(&HeaderMap::new()), Locale::En);
    }
}
