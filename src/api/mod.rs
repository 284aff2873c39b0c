use crate::{
    api::handlers::{auth, health, members, root},
    cli::globals::GlobalArgs,
    provider::{HttpProvider, Provider},
};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod guard;
pub mod handlers;
mod openapi;
pub mod state;
pub mod subscription;

pub use openapi::ApiDoc;

use guard::GuardState;
use state::SiteConfig;
use subscription::SubscriptionGate;

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, globals: &GlobalArgs, config: SiteConfig) -> Result<()> {
    let provider: Arc<dyn Provider> = Arc::new(HttpProvider::new(
        &globals.provider_url,
        globals.provider_key.clone(),
    )?);

    let app = app(provider, Arc::new(config))?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Build the full router: routes, guard stages, and the shared layers.
///
/// # Errors
/// Returns an error if the configured site URL cannot become a CORS origin.
pub fn app(provider: Arc<dyn Provider>, config: Arc<SiteConfig>) -> Result<Router> {
    let guard_state = Arc::new(GuardState {
        provider: provider.clone(),
        config: config.clone(),
    });
    let gate = Arc::new(SubscriptionGate::new(provider.clone()));

    let origin = site_origin(config.site_url())?;
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true);

    // The directory sits behind both stages; the landing page only behind
    // the session guard.
    let gated = Router::new()
        .route("/espace-membres/annuaire", get(members::annuaire))
        .route_layer(middleware::from_fn_with_state(
            gate,
            subscription::require_subscription,
        ));

    let router = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/espace-membres/reset-password", post(auth::reset_password))
        .route("/auth/callback", get(auth::callback))
        .route("/espace-membres", get(members::landing))
        .merge(gated)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(
            guard_state,
            guard::session_guard,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(provider))
                .layer(Extension(config)),
        );

    Ok(router)
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn site_origin(site_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(site_url).with_context(|| format!("Invalid site URL: {site_url}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Site URL must include a valid host: {site_url}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build site origin header")
}
