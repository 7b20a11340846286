use axum::Json;

use crate::extract::CurrentSession;
use crate::response::ProtectedResponse;

/// GET /api/protected - placeholder for session-gated APIs
pub async fn protected(CurrentSession(session): CurrentSession) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is a protected API route".to_string(),
        user: session.user,
    })
}
