//! Authentication handlers: register, login, current account.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::validate;
use quill_shared::dto::{AccountResponse, AuthResponse, LoginRequest, RegisterRequest};
use quill_shared::response::{ApiResponse, InvalidField};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn account_response(user: User) -> AccountResponse {
    AccountResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
    }
}

fn token_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = state
        .tokens
        .issue(user.id, &user.username)
        .map_err(|e| AppError::Internal(format!("token issue failed: {e}")))?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds() as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if let Err(errors) = validate::username(&req.username, &state.site) {
        return Err(AppError::Validation(
            errors
                .into_iter()
                .map(|e| InvalidField {
                    field: e.field.to_string(),
                    message: e.message,
                })
                .collect(),
        ));
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters".to_string(),
        ));
    }

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("username already taken".to_string()));
    }
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let user = User::new(req.username, req.email, password_hash);
    state.users.insert(&user).await?;

    tracing::info!(username = %user.username, "user registered");

    let token = token_response(&state, &user)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(token)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Same response for unknown user and wrong password.
    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    tracing::info!(username = %user.username, "user logged in");

    let token = token_response(&state, &user)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(token)))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(account_response(user))))
}
