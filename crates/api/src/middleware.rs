use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use stockgate_auth::{validate_claims, GateKey, StaffClaims};
use stockgate_core::{TenantId, UserId};

use crate::context::{StaffContext, TenantContext};

/// Wire shape of a staff token (numeric timestamps, HS256-signed).
#[derive(Debug, Deserialize)]
struct WireClaims {
    sub: Uuid,
    tenant_id: Uuid,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct AuthState {
    pub decoding_key: Arc<jsonwebtoken::DecodingKey>,
}

impl AuthState {
    pub fn hs256(secret: &str) -> Self {
        Self {
            decoding_key: Arc::new(jsonwebtoken::DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Staff routes: Bearer token → tenant + staff context.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
    let decoded = jsonwebtoken::decode::<WireClaims>(token, &state.decoding_key, &validation)
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    let claims = StaffClaims {
        sub: UserId::from_uuid(decoded.claims.sub),
        tenant_id: TenantId::from_uuid(decoded.claims.tenant_id),
        issued_at: timestamp(decoded.claims.iat).ok_or(StatusCode::UNAUTHORIZED)?,
        expires_at: timestamp(decoded.claims.exp).ok_or(StatusCode::UNAUTHORIZED)?,
    };
    validate_claims(&claims, Utc::now()).map_err(|_e| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut()
        .insert(TenantContext::new(claims.tenant_id));
    req.extensions_mut().insert(StaffContext::new(claims.sub));

    Ok(next.run(req).await)
}

#[derive(Clone)]
pub struct GateAuthState {
    pub key: Arc<GateKey>,
}

/// Gate routes: shared device key + explicit tenant header, no user session.
pub async fn gate_auth_middleware(
    State(state): State<GateAuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let presented = req
        .headers()
        .get("x-gate-key")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !state.key.verify(presented) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let tenant = req
        .headers()
        .get("x-tenant-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<TenantId>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(TenantContext::new(tenant));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}
