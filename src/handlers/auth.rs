use axum::{extract::State, Json};
use tower_cookies::{Cookie, Cookies};

use crate::{
    database::Database,
    models::{LoginRequest, UserResponse},
    utils::{create_token, verify_password, verify_token},
};

use super::ApiError;

const AUTH_COOKIE: &str = "auth_token";

pub async fn login(
    State(db): State<Database>,
    cookies: Cookies,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = db
        .read(|doc| doc.users.iter().find(|u| u.email == body.email).cloned())
        .await
        .filter(|user| verify_password(&body.password, &user.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let token = create_token(&user.id, user.email.clone()).map_err(|e| {
        log::error!("failed to issue session token: {}", e);
        ApiError::Internal
    })?;

    let cookie = Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(24))
        .build();
    cookies.add(cookie);

    Ok(Json(user.into()))
}

pub async fn logout(cookies: Cookies) -> Json<serde_json::Value> {
    cookies.remove(Cookie::from(AUTH_COOKIE));
    Json(serde_json::json!({ "message": "Logged out" }))
}

pub async fn me(
    State(db): State<Database>,
    cookies: Cookies,
) -> Result<Json<UserResponse>, ApiError> {
    let token = cookies
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Not logged in".to_string()))?;
    let claims = verify_token(&token)
        .map_err(|_| ApiError::Unauthorized("Session expired".to_string()))?;

    db.read(|doc| doc.users.iter().find(|u| u.id == claims.sub).cloned())
        .await
        .map(|user| Json(user.into()))
        .ok_or_else(|| ApiError::Unauthorized("Session expired".to_string()))
}
