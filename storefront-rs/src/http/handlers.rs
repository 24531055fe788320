use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::GlobalKeyExtractor,
    GovernorLayer,
};
use tracing::{debug, info, warn};

use crate::auth::verify_password;
use crate::db;
use crate::models::{LoginRequest, PricingPlan};

use super::auth::{require_admin, require_session, SESSION_COOKIE};
use super::error::ApiError;
use super::responses::{
    HealthResponse, LoginResponse, LogoutResponse, OrderResponse, UserResponse,
};
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(20)
            .burst_size(50)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .unwrap_or_else(|| unreachable!("default governor config is valid")),
    );

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/admin/pricing-plans", get(admin_pricing_plans))
        .route("/api/orders", get(list_orders))
        .layer(GovernorLayer::new(governor_conf))
        .layer(
            tower_http::request_id::SetRequestIdLayer::new(
                axum::http::header::HeaderName::from_static("x-request-id"),
                tower_http::request_id::MakeRequestUuid::default(),
            ),
        )
        .layer(tower_http::request_id::PropagateRequestIdLayer::new(
            axum::http::header::HeaderName::from_static("x-request-id"),
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let Some(user) = db::users::find_by_name(&state.pool, &request.name).await? else {
        warn!(name = %request.name, "login failed: unknown user");
        return Err(ApiError::Unauthorized);
    };
    if !verify_password(&request.password, &user.password_hash) {
        warn!(name = %user.name, "login failed: wrong password");
        return Err(ApiError::Unauthorized);
    }

    let token = state.sessions.create(user.id.clone());
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .build();
    info!(user = %user.name, "login succeeded");
    Ok((jar.add(cookie), Json(LoginResponse { user: user.into() })))
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
        debug!("session revoked");
    }
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), Json(LogoutResponse { success: "ok" }))
}

async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = require_session(&state, &jar)?;
    let Some(user) = db::users::find_by_id(&state.pool, &user_id).await? else {
        warn!("session user no longer exists");
        return Err(ApiError::Unauthorized);
    };
    Ok(Json(user.into()))
}

async fn admin_pricing_plans(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<PricingPlan>>, ApiError> {
    let user = require_admin(&state, &jar).await?;
    let plans = db::plans::list_plans(&state.pool).await?;
    debug!(user = %user.name, plans = plans.len(), "pricing plans requested");
    Ok(Json(plans))
}

async fn list_orders(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let user_id = require_session(&state, &jar)?;
    let orders = db::orders::list_for_user(&state.pool, &user_id).await?;
    debug!(user_id = %user_id, orders = orders.len(), "orders requested");
    Ok(Json(
        orders
            .into_iter()
            .map(OrderResponse::from)
            .collect::<Vec<_>>(),
    ))
}
