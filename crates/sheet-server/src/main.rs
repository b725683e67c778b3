#![allow(non_snake_case)]

#[cfg(feature = "ssr")]
mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Debug, Default)]
    #[serde(default)]
    pub struct Config {
        pub server: ServerConfig,
        pub auth: AuthConfig,
        pub storage: StorageConfig,
        pub payments: PaymentsConfig,
        pub site: SiteConfig,
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct ServerConfig {
        pub bind: String,
        pub port: u16,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: "0.0.0.0".into(),
                port: 3000,
            }
        }
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct AuthConfig {
        pub session_secret: String,
        pub session_ttl_hours: i64,
        pub admin_emails: Vec<String>,
    }

    impl Default for AuthConfig {
        fn default() -> Self {
            Self {
                session_secret: String::new(),
                session_ttl_hours: 24 * 7,
                admin_emails: Vec::new(),
            }
        }
    }

    pub const MIN_SESSION_SECRET_LEN: usize = 32;
    const PLACEHOLDER_SECRETS: [&str; 2] = ["change-me-on-first-run", "change-me"];

    impl AuthConfig {
        /// Why the session secret cannot be trusted to sign tokens, if it cannot.
        pub fn secret_problem(&self) -> Option<String> {
            let secret = self.session_secret.trim();
            if secret.is_empty() {
                Some("no session secret is configured".into())
            } else if PLACEHOLDER_SECRETS.contains(&secret) {
                Some("the session secret is the published placeholder".into())
            } else if secret.len() < MIN_SESSION_SECRET_LEN {
                Some(format!(
                    "the session secret is shorter than {MIN_SESSION_SECRET_LEN} characters"
                ))
            } else {
                None
            }
        }
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct StorageConfig {
        pub data_dir: String,
        pub public_base_url: String,
    }

    impl Default for StorageConfig {
        fn default() -> Self {
            Self {
                data_dir: "data".into(),
                public_base_url: "/files".into(),
            }
        }
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct PaymentsConfig {
        pub stripe_secret_key: Option<String>,
        pub webhook_secret: Option<String>,
        pub currency: String,
        pub app_url: String,
    }

    impl Default for PaymentsConfig {
        fn default() -> Self {
            Self {
                stripe_secret_key: None,
                webhook_secret: None,
                currency: "eur".into(),
                app_url: "http://localhost:3000".into(),
            }
        }
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct SiteConfig {
        pub base_url: String,
    }

    impl Default for SiteConfig {
        fn default() -> Self {
            Self {
                base_url: "https://sheetmates.com".into(),
            }
        }
    }

    pub fn load(path: &str) -> Config {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to parse config {path}: {e}, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read config {path}: {e}, using defaults");
                Config::default()
            }
        };
        apply_env(&mut config, |key| std::env::var(key).ok());
        config
    }

    /// Secrets from the environment win over the file.
    pub fn apply_env(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = var("STRIPE_SECRET_KEY") {
            config.payments.stripe_secret_key = Some(key);
        }
        if let Some(secret) = var("STRIPE_WEBHOOK_SECRET") {
            config.payments.webhook_secret = Some(secret);
        }
        if let Some(secret) = var("SESSION_SECRET") {
            config.auth.session_secret = secret;
        }
        if let Some(url) = var("APP_URL") {
            config.payments.app_url = url;
        }
    }

}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use std::path::Path;
    use std::sync::Arc;

    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use sheet_api::payments::StripeClient;
    use sheet_api::session::SessionKeys;
    use sheet_api::{AppState, PaymentSettings};
    use sheet_store::{DocumentStore, ObjectStorage, Store};
    use sheet_ui::{shell, App};
    use tower_http::services::ServeFile;
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let configPath = if let Some(idx) = args.iter().position(|a| a == "--config") {
        args.get(idx + 1)
            .cloned()
            .unwrap_or_else(|| "config.example.toml".into())
    } else {
        "config.example.toml".into()
    };

    let appConfig = config::load(&configPath);
    tracing::info!(
        "loaded config from {configPath}: data_dir={}, payments={}",
        appConfig.storage.data_dir,
        if appConfig.payments.stripe_secret_key.is_some() { "stripe" } else { "disabled" }
    );
    // anyone holding the secret can mint an admin session
    if let Some(problem) = appConfig.auth.secret_problem() {
        panic!(
            "refusing to start: {problem}; set SESSION_SECRET to at least {} random characters",
            config::MIN_SESSION_SECRET_LEN
        );
    }

    let dataDir = Path::new(&appConfig.storage.data_dir);
    let docs = DocumentStore::open(dataDir.join("store.json"))
        .await
        .unwrap_or_else(|e| panic!("failed to open document store in {}: {e}", dataDir.display()));
    let filesDir = dataDir.join("files");
    let objects = ObjectStorage::new(filesDir, &appConfig.storage.public_base_url);

    let payments = PaymentSettings {
        stripe: appConfig
            .payments
            .stripe_secret_key
            .as_deref()
            .map(StripeClient::new),
        webhook_secret: appConfig.payments.webhook_secret.clone(),
        currency: appConfig.payments.currency.clone(),
        app_url: appConfig.payments.app_url.trim_end_matches('/').to_string(),
    };

    let appState = AppState {
        store: Store::new(docs, objects),
        sessions: SessionKeys::new(&appConfig.auth.session_secret, appConfig.auth.session_ttl_hours)
            .with_secure(appConfig.payments.app_url.starts_with("https://")),
        admin_emails: Arc::new(appConfig.auth.admin_emails.clone()),
        payments: Arc::new(payments),
        site_url: appConfig.site.base_url.trim_end_matches('/').to_string(),
    };

    let conf = get_configuration(None).expect("failed to load Leptos configuration");
    let mut leptosOptions = conf.leptos_options;
    if std::env::var("LEPTOS_SITE_ADDR").is_err() {
        let configured = format!("{}:{}", appConfig.server.bind, appConfig.server.port);
        match configured.parse() {
            Ok(addr) => leptosOptions.site_addr = addr,
            Err(e) => tracing::warn!("invalid bind address {configured}: {e}"),
        }
    }
    let addr = leptosOptions.site_addr;
    let siteRoot = leptosOptions.site_root.to_string();

    let routes = generate_route_list(App);
    let apiRouter = sheet_api::api_router(appState.clone());

    let pages = Router::new()
        .leptos_routes_with_context(
            &leptosOptions,
            routes,
            {
                let appState = appState.clone();
                move || provide_context(appState.clone())
            },
            {
                let leptosOptions = leptosOptions.clone();
                move || shell(leptosOptions.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptosOptions);

    // the `/:locale` page route would otherwise claim the icon
    let app = Router::new()
        .route_service(
            "/favicon.svg",
            ServeFile::new(Path::new(&siteRoot).join("favicon.svg")),
        )
        .merge(apiRouter)
        .merge(pages);
    let app = sheet_api::with_site_layers(app, appState).layer(TraceLayer::new_for_http());

    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server exited with error");
}

#[cfg(not(feature = "ssr"))]
fn main() {}
