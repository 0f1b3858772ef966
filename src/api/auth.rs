//! Authentication: password hashing, login/registration, bearer middleware.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use super::validation::{normalized, FieldCheck};
use crate::db::queries;
use crate::token::{self, Claims};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Bearer middleware for the protected listings.
///
/// A missing header is rejected as unauthenticated (401); a header that
/// fails verification (wrong scheme, bad signature, expired) as forbidden
/// (403). Decoded claims are attached to the request for handlers.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(auth_header) = auth_header else {
        return Err(ApiError::unauthenticated("No token provided"));
    };

    let bearer = auth_header.strip_prefix("Bearer ").unwrap_or("");
    let claims = token::verify(bearer, &state.config.auth.token_secret)
        .ok_or_else(|| ApiError::forbidden("Invalid or expired token"))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Normalized user object returned alongside the token. `empId` falls back
/// to the username for admins, which have no business identifier.
#[derive(Debug, Serialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    #[serde(rename = "empId")]
    pub emp_id: String,
    pub role: String,
    pub company: String,
    pub team: Option<String>,
    pub email: Option<String>,
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut fields = FieldCheck::new();
    let email = fields.require("email", req.email);
    let password = fields.require("password", req.password);
    let role = fields.require("role", req.role);
    let company = fields.require("company", req.company);
    fields.finish()?;

    let team = normalized(req.team);

    let (claims, user) = match role.as_str() {
        "admin" => {
            let admin = queries::find_admin_by_email(&state.db, &email)
                .await?
                .filter(|admin| verify_password(&password, &admin.password_hash))
                .ok_or_else(ApiError::invalid_credentials)?;

            let claims = Claims::new(
                admin.id,
                admin.username.clone(),
                admin.role.clone(),
                admin.company.clone(),
                None,
                state.config.auth.token_expiry_secs,
            );
            let user = AuthenticatedUser {
                id: admin.id,
                emp_id: admin.username.clone(),
                username: admin.username,
                role: admin.role,
                company: admin.company,
                team: None,
                email: admin.email,
            };
            (claims, user)
        }
        "employee" => {
            let employee =
                queries::find_employee_by_login(&state.db, &email, &company, team.as_deref())
                    .await?
                    .filter(|employee| verify_password(&password, &employee.password_hash))
                    .ok_or_else(ApiError::invalid_credentials)?;

            let claims = Claims::new(
                employee.id,
                employee.username.clone(),
                employee.role.clone(),
                employee.company.clone(),
                Some(employee.team.clone()),
                state.config.auth.token_expiry_secs,
            );
            let user = AuthenticatedUser {
                id: employee.id,
                username: employee.username,
                emp_id: employee.emp_id,
                role: employee.role,
                company: employee.company,
                team: Some(employee.team),
                email: Some(employee.email),
            };
            (claims, user)
        }
        _ => return Err(ApiError::validation("Invalid role")),
    };

    let token = token::issue(&claims, &state.config.auth.token_secret).map_err(|err| {
        tracing::error!(error = %err, "failed to sign session token");
        ApiError::internal("Failed to issue token")
    })?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    /// Optional: where ticket alerts for this admin go, and the login
    /// identifier. Most deployments register admins with their email as
    /// the username and leave this unset.
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let mut fields = FieldCheck::new();
    let username = fields.require("username", req.username);
    let password = fields.require("password", req.password);
    let role = fields.require("role", req.role);
    let company = fields.require("company", req.company);
    fields.finish()?;

    // Admins typically sign up with an email address as their username;
    // reuse it for notifications unless a separate address was given.
    let email = normalized(req.email).or_else(|| {
        username.contains('@').then(|| username.clone())
    });

    let password_hash = hash_password(&password).map_err(|err| {
        tracing::error!(error = %err, "failed to hash password");
        ApiError::internal("Failed to hash password")
    })?;

    let user_id = queries::insert_admin(
        &state.db,
        &username,
        &password_hash,
        &role,
        &company,
        email.as_deref(),
    )
    .await
    .map_err(|err| match err {
        crate::db::StoreError::Duplicate => {
            ApiError::duplicate("Username or email already exists")
        }
        other => other.into(),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert_ne!(hash, "correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        assert_ne!(a, b);
    }
}
