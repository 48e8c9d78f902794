use crate::common::{Actor, AuthError, Role, UserId};
use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response, Extension};
use std::sync::Arc;
use tracing::debug;

/// Authenticated user information from JWT
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

/// Resolve the caller of a route that requires authentication.
pub fn require_auth(auth: Option<Extension<AuthUser>>) -> Result<Actor, AuthError> {
    auth.map(|Extension(user)| user.actor())
        .ok_or(AuthError::AuthenticationRequired)
}

/// Resolve the caller of a route restricted to `role`.
pub fn require_role(auth: Option<Extension<AuthUser>>, role: Role) -> Result<Actor, AuthError> {
    require_auth(auth)?.require(role)
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds AuthUser to request extensions.
/// If no token or invalid token, request continues without AuthUser (public access).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = extract_auth_user(&request, &jwt_service) {
        debug!(user_id = %user.user_id, role = %user.role, "authenticated request");
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: UserId::from_uuid(claims.user_id),
        role: claims.role,
    })
}
