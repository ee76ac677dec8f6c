use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use innkeep_core::policy::Caller;

use crate::state::AppState;

pub const ROLE_CUSTOMER: &str = "CUSTOMER";
pub const ROLE_ADMIN: &str = "ADMIN";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

fn decode_caller(state: &AppState, req: &Request) -> Result<Caller, StatusCode> {
    // 1. Extract token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Decode and validate JWT
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let claims = token_data.claims;

    // 3. The core only ever sees an opaque identity plus the admin flag.
    match claims.role.as_str() {
        ROLE_CUSTOMER => Ok(Caller { user_id: claims.sub, is_admin: false }),
        ROLE_ADMIN => Ok(Caller { user_id: claims.sub, is_admin: true }),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

/// Any authenticated caller, customer or admin.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let caller = decode_caller(&state, &req)?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

/// Admin-only surface.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let caller = decode_caller(&state, &req)?;
    if !caller.is_admin {
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
