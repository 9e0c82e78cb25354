//! sehati-api
//!
//! HTTP surface of the Sehati service: questionnaire submission and
//! scoring, administration of respondents, health units, users and
//! questions, and push notification routes.

use std::sync::Arc;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use config::ServerConfig;
use sehati_auth::session::SessionKeys;
use sehati_push::transport::{DisabledTransport, RelayTransport};
use sehati_push::PushTransport;
use sehati_storage::memory::MemoryStore;
use sehati_storage::rest::RestStore;
use sehati_storage::RecordStore;
use state::AppState;

/// Build shared state from configuration: store, push transport, keys.
pub async fn build_state(config: &ServerConfig) -> eyre::Result<AppState> {
    let store: Arc<dyn RecordStore> = match &config.store_url {
        Some(url) => {
            info!(url = %url, "using hosted record store");
            Arc::new(RestStore::new(url, &config.store_key)?)
        }
        None => {
            warn!("SEHATI_STORE_URL not set, records live in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let transport: Arc<dyn PushTransport> = match &config.push_relay_url {
        Some(url) => Arc::new(RelayTransport::new(url)?),
        None => {
            warn!("SEHATI_PUSH_RELAY_URL not set, push delivery disabled");
            Arc::new(DisabledTransport)
        }
    };

    let sessions = SessionKeys::new(config.session_secret.as_bytes(), config.session_ttl)?;

    if let Some((username, password)) = &config.bootstrap_admin {
        sehati_auth::flows::ensure_admin(store.as_ref(), username, password).await?;
    }

    Ok(AppState::new(
        store,
        transport,
        sessions,
        config.push_defaults.clone(),
    ))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route(
            "/api/questions",
            get(routes::questions::list_questions).post(routes::questions::create_question),
        )
        .route(
            "/api/questions/{id}",
            put(routes::questions::update_question)
                .delete(routes::questions::delete_question),
        )
        .route(
            "/api/health-units",
            get(routes::health_units::list_health_units)
                .post(routes::health_units::create_health_unit),
        )
        .route(
            "/api/health-units/{id}",
            get(routes::health_units::get_health_unit)
                .put(routes::health_units::update_health_unit)
                .delete(routes::health_units::delete_health_unit),
        )
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route(
            "/api/respondents",
            get(routes::respondents::list_respondents)
                .post(routes::respondents::create_respondent),
        )
        .route(
            "/api/respondents/{id}",
            get(routes::respondents::get_respondent)
                .put(routes::respondents::update_respondent)
                .delete(routes::respondents::delete_respondent),
        )
        .route(
            "/api/responses",
            get(routes::responses::list_responses).post(routes::responses::submit_response),
        )
        .route("/api/responses/{id}", get(routes::responses::get_response))
        .route("/api/push/send", post(routes::push::send))
        .route("/api/push/subscribe", post(routes::push::subscribe))
        .route("/api/push/unsubscribe", post(routes::push::unsubscribe))
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .route(
            "/api/notifications/events",
            get(routes::notifications::events),
        )
        .route(
            "/api/notifications/{id}/read",
            post(routes::notifications::mark_read),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/login", post(routes::auth::login))
        // Instruments (no auth)
        .route("/api/instruments", get(routes::instruments::list_instruments))
        .route(
            "/api/instruments/{id}",
            get(routes::instruments::get_instrument_detail),
        )
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
