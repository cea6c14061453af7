use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser},
        extractors::AuthUser,
        repo_types::User,
        services::{is_valid_email, verify_password, JwtKeys},
    },
    error::{ApiError, ApiJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("email and password required"));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }

    let db = state.read().await?;
    let Some(user) = User::find_by_email(&db, &payload.email) else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = %user.id, "verify_password failed");
        ApiError::Internal(e)
    })?;

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user)?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(user),
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id, name = %auth.name))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let db = state.read().await?;
    let user = User::find_by_id(&db, auth.id).ok_or_else(|| {
        warn!(user_id = %auth.id, "token refers to unknown user");
        ApiError::unauthorized("User not found")
    })?;
    Ok(Json(PublicUser::from(user)))
}

#[cfg(test)]
mod me_tests {
    use super::*;
    use crate::auth::repo_types::Role;

    #[test]
    fn public_user_serialization_omits_password() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "Bora Borrower".into(),
            email: "test@example.com".into(),
            role: Role::Borrower,
            password_hash: "$argon2id$secret".into(),
        };

        let json = serde_json::to_string(&PublicUser::from(&user)).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"role\":\"borrower\""));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
