use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;
use crate::models::TokenType;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

/// Resolves the bearer token into an `AuthUser` stored in request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let secret = req
        .app_data::<Data<Config>>()
        .map(|config| config.jwt_secret.clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    match authenticate(&req, &secret) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.call(req).await
        }
        Err(reason) => Ok(unauthorized(req, reason)),
    }
}

fn authenticate(req: &ServiceRequest, secret: &str) -> Result<AuthUser, &'static str> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header encoding")?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must start with Bearer")?;

    let claims = verify_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        "Invalid or expired token"
    })?;

    if claims.token_type != TokenType::Access {
        return Err("Access token required");
    }

    let role = Role::from_id(claims.role).ok_or("Invalid role")?;

    Ok(AuthUser {
        username: claims.sub,
        role,
    })
}

fn unauthorized(req: ServiceRequest, reason: &str) -> ServiceResponse<BoxBody> {
    tracing::warn!(path = %req.path(), reason, "Rejected unauthenticated request");
    let resp = HttpResponse::Unauthorized().json(json!({ "error": reason }));
    req.into_response(resp.map_into_boxed_body())
}
