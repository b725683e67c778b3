//! Crawler policy and sitemap.

use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};
use sheet_types::Locale;

use crate::state::AppState;

/// Public pages listed in the sitemap: path, priority, change frequency.
pub const SITEMAP_ROUTES: [(&str, f32, &str); 8] = [
    ("/", 1.0, "daily"),
    ("/sheets", 0.9, "daily"),
    ("/materials", 0.9, "weekly"),
    ("/upload", 0.8, "weekly"),
    ("/pricing", 0.8, "weekly"),
    ("/contact", 0.5, "monthly"),
    ("/login", 0.3, "monthly"),
    ("/signup", 0.3, "monthly"),
];

const ALLOW: [&str; 6] = ["/", "/en/", "/fr/", "/cs/", "/sheets", "/materials"];
const DISALLOW: [&str; 10] = [
    "/admin", "/admin/*", "/queue", "/queue/*", "/checkout", "/checkout/*", "/api", "/api/*",
    "/account", "/account/*",
];
const AI_CRAWLERS: [&str; 4] = ["GPTBot", "Google-Extended", "CCBot", "anthropic-ai"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/robots.txt", get(get_robots))
        .route("/sitemap.xml", get(get_sitemap))
}

pub fn robots_txt(siteUrl: &str) -> String {
    let mut out = String::from("User-agent: *\n");
    for path in ALLOW {
        out.push_str(&format!("Allow: {path}\n"));
    }
    for path in DISALLOW {
        // private pages live under every locale prefix too
        out.push_str(&format!("Disallow: {path}\n"));
        for locale in Locale::ALL {
            out.push_str(&format!("Disallow: /{locale}{path}\n"));
        }
    }
    for bot in AI_CRAWLERS {
        out.push_str(&format!("\nUser-agent: {bot}\nDisallow: /\n"));
    }
    out.push_str(&format!("\nSitemap: {}/sitemap.xml\n", siteUrl.trim_end_matches('/')));
    out
}

fn localized_url(siteUrl: &str, locale: Locale, path: &str) -> String {
    format!("{siteUrl}{}", locale.href(path))
}

pub fn sitemap_xml(siteUrl: &str) -> String {
    let siteUrl = siteUrl.trim_end_matches('/');
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );
    for locale in Locale::ALL {
        for (path, priority, changefreq) in SITEMAP_ROUTES {
            out.push_str("  <url>\n");
            out.push_str(&format!("    <loc>{}</loc>\n", localized_url(siteUrl, locale, path)));
            for alternate in Locale::ALL {
                out.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{alternate}\" href=\"{}\"/>\n",
                    localized_url(siteUrl, alternate, path)
                ));
            }
            out.push_str(&format!("    <changefreq>{changefreq}</changefreq>\n"));
            out.push_str(&format!("    <priority>{priority:.1}</priority>\n"));
            out.push_str("  </url>\n");
        }
    }
    out.push_str("</urlset>\n");
    out
}

async fn get_robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.site_url),
    )
}

async fn get_sitemap(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        sitemap_xml(&state.site_url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robots_blocks_private_sections_and_ai_crawlers() {
        let robots = robots_txt("https://sheetmates.com/");
        assert!(robots.contains("Disallow: /admin\n"));
        assert!(robots.contains("Disallow: /fr/checkout/*\n"));
        assert!(robots.contains("User-agent: GPTBot\nDisallow: /\n"));
        assert!(robots.ends_with("Sitemap: https://sheetmates.com/sitemap.xml\n"));
    }

    #[test]
    fn sitemap_lists_every_locale_with_alternates() {
        let xml = sitemap_xml("https://sheetmates.com");
        assert_eq!(xml.matches("<url>").count(), SITEMAP_ROUTES.len() * Locale::ALL.len());
        assert!(xml.contains("<loc>https://sheetmates.com/cs/pricing</loc>"));
        assert!(xml.contains("<loc>https://sheetmates.com/fr</loc>"));
        assert!(xml.contains("hreflang=\"fr\" href=\"https://sheetmates.com/fr/materials\""));
        assert!(!xml.contains("/admin"));
    }
}
