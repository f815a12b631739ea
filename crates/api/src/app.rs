use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use domain::store::Store;
use shared::session::{SessionError, SessionVerifier};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::rate_limit::routes as limited;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin_api,
    require_admin_page, security_headers_middleware, trace_id, FixedWindowLimiter,
    RateLimitScope, SecurityHeaderOptions,
};
use crate::routes::{
    admin, admin_content, admin_intakes, admin_settings, admin_subscribers, analytics, auth,
    cloudflare, content, health, intake, newsletter, theme,
};
use crate::services::{
    AuthClientError, CloudflareClient, CloudflareError, CookieHelper, HostedAuthClient,
};
use crate::theme_hub::ThemeHub;

/// Failures while assembling shared state at startup.
#[derive(Debug, Error)]
pub enum StateInitError {
    #[error("Session verifier: {0}")]
    Session(#[from] SessionError),

    #[error("Cloudflare client: {0}")]
    Cloudflare(#[from] CloudflareError),

    #[error("Hosted auth client: {0}")]
    HostedAuth(#[from] AuthClientError),
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub rate_limiter: Arc<FixedWindowLimiter>,
    pub theme_hub: Arc<ThemeHub>,
    pub session_verifier: Arc<SessionVerifier>,
    pub cloudflare: Arc<CloudflareClient>,
    pub auth_client: Arc<HostedAuthClient>,
    pub cookies: CookieHelper,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        theme_hub: Arc<ThemeHub>,
    ) -> Result<Self, StateInitError> {
        let session_verifier =
            SessionVerifier::new(&config.session.jwt_secret, config.session.leeway_secs)?;
        let cloudflare = CloudflareClient::new(config.cloudflare.clone())?;
        let auth_client = HostedAuthClient::new(config.hosted_auth.clone())?;
        let cookies = CookieHelper::from_config(&config.session);

        Ok(Self {
            store,
            config: Arc::new(config),
            rate_limiter: Arc::new(FixedWindowLimiter::new()),
            theme_hub,
            session_verifier: Arc::new(session_verifier),
            cloudflare: Arc::new(cloudflare),
            auth_client: Arc::new(auth_client),
            cookies,
        })
    }

    fn rate_limit_scope(&self, route: &'static str) -> RateLimitScope {
        let limits = &self.config.security.rate_limits;
        let rule = match route {
            limited::INTAKE => limits.intake,
            limited::NEWSLETTER => limits.newsletter,
            _ => limits.analytics,
        };
        RateLimitScope::new(
            self.rate_limiter.clone(),
            route,
            rule.into(),
            &self.config.security.ip_hash_salt,
            self.config.security.trust_proxy_headers,
        )
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public form endpoints, each with its own fixed window
    let intake_routes = Router::new()
        .route("/api/intake", post(intake::submit_intake))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit_scope(limited::INTAKE),
            rate_limit_middleware,
        ));
    let newsletter_routes = Router::new()
        .route("/api/newsletter", post(newsletter::subscribe))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit_scope(limited::NEWSLETTER),
            rate_limit_middleware,
        ));
    let analytics_routes = Router::new()
        .route("/api/analytics", post(analytics::record_event))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit_scope(limited::ANALYTICS),
            rate_limit_middleware,
        ));

    // Public read-only routes
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/posts", get(content::list_posts))
        .route("/api/posts/:slug", get(content::get_post))
        .route("/api/events", get(content::list_events))
        .route("/api/gallery", get(content::list_gallery))
        .route("/api/content", get(content::list_blocks))
        .route("/api/content/:section/:key", get(content::get_block))
        .route("/api/seo", get(content::get_seo))
        .route("/api/theme", get(theme::get_theme))
        .route("/api/theme.css", get(theme::get_theme_css))
        .route("/api/theme/stream", get(theme::theme_stream))
        // Checks the session itself through the AdminSession extractor
        .route("/api/cloudflare", get(cloudflare::zone_analytics));

    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/reset-password", post(auth::reset_password));

    // Admin JSON API (session required)
    let admin_api_routes = Router::new()
        .route(
            "/api/admin/posts",
            get(admin_content::list_posts).post(admin_content::create_post),
        )
        .route(
            "/api/admin/posts/:id",
            get(admin_content::get_post)
                .put(admin_content::update_post)
                .delete(admin_content::delete_post),
        )
        .route(
            "/api/admin/events",
            get(admin_content::list_events).post(admin_content::create_event),
        )
        .route(
            "/api/admin/events/:id",
            get(admin_content::get_event)
                .put(admin_content::update_event)
                .delete(admin_content::delete_event),
        )
        .route(
            "/api/admin/gallery",
            get(admin_content::list_gallery).post(admin_content::create_asset),
        )
        .route(
            "/api/admin/gallery/:id",
            put(admin_content::update_asset).delete(admin_content::delete_asset),
        )
        .route(
            "/api/admin/content",
            get(admin_content::list_blocks).post(admin_content::create_block),
        )
        .route(
            "/api/admin/content/:id",
            get(admin_content::get_block)
                .put(admin_content::update_block)
                .delete(admin_content::delete_block),
        )
        .route("/api/admin/intakes", get(admin_intakes::list_intakes))
        .route(
            "/api/admin/intakes/:id",
            get(admin_intakes::get_intake)
                .put(admin_intakes::update_intake)
                .delete(admin_intakes::delete_intake),
        )
        .route(
            "/api/admin/subscribers",
            get(admin_subscribers::list_subscribers),
        )
        .route(
            "/api/admin/subscribers/:id/active",
            put(admin_subscribers::set_active),
        )
        .route(
            "/api/admin/subscribers/:id",
            delete(admin_subscribers::delete_subscriber),
        )
        .route(
            "/api/admin/theme",
            get(admin_settings::get_theme).put(admin_settings::update_theme),
        )
        .route(
            "/api/admin/theme/preview",
            post(admin_settings::preview_theme),
        )
        .route(
            "/api/admin/theme/preview/clear",
            post(admin_settings::clear_preview),
        )
        .route(
            "/api/admin/seo",
            get(admin_settings::get_seo).put(admin_settings::update_seo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_api,
        ));

    // Dashboard pages redirect to the login page without a session
    let admin_page_routes = Router::new()
        .route("/admin", get(admin::admin_page))
        .route("/admin/*path", get(admin::admin_page))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_page,
        ));

    let header_options = SecurityHeaderOptions {
        hsts_enabled: config.security.hsts_enabled,
    };

    Router::new()
        .merge(intake_routes)
        .merge(newsletter_routes)
        .merge(analytics_routes)
        .merge(public_routes)
        .merge(auth_routes)
        .merge(admin_api_routes)
        .merge(admin_page_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(middleware::from_fn_with_state(
            header_options,
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
