//! Notifications API
//!
//! Endpoints for the operator's notification feed:
//!
//! - GET    /api/notifications               - Current feed with unread count and badge
//! - POST   /api/notifications/read          - Mark notifications as read
//! - POST   /api/notifications/read-all      - Mark every visible notification as read
//! - POST   /api/notifications/:id/approve   - Approve the registration behind a notification

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::types::{MarkReadRequest, NotificationFeed};
use crate::AppState;

// =============================================================================
// Router
// =============================================================================

/// Create notifications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
        .route("/:id/approve", post(approve))
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub affected: usize,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/notifications
async fn list_notifications(State(state): State<AppState>) -> Json<ApiResponse<NotificationFeed>> {
    Json(ApiResponse {
        data: state.center.feed().await,
    })
}

/// POST /api/notifications/read
///
/// Mark specific notifications as read. An empty or missing `ids` list is a
/// no-op (use /read-all instead).
async fn mark_read(
    State(state): State<AppState>,
    Json(request): Json<MarkReadRequest>,
) -> Json<ApiResponse<SuccessResponse>> {
    let mut affected = 0;
    for id in request.ids.unwrap_or_default() {
        if state.center.mark_as_read(&id).await {
            affected += 1;
        }
    }

    Json(ApiResponse {
        data: SuccessResponse {
            success: true,
            affected,
        },
    })
}

/// POST /api/notifications/read-all
async fn mark_all_read(State(state): State<AppState>) -> Json<ApiResponse<SuccessResponse>> {
    let affected = state.center.mark_all_as_read().await;

    Json(ApiResponse {
        data: SuccessResponse {
            success: true,
            affected,
        },
    })
}

/// POST /api/notifications/:id/approve
///
/// 404 when `id` is not a current registration notification, 502 with the
/// backend's explanation when activation fails.
async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ApprovalResponse>>> {
    state.center.approve_notification(&id).await?;

    Ok(Json(ApiResponse {
        data: ApprovalResponse {
            success: true,
            message: state.center.locale().admin_activated().to_string(),
        },
    }))
}
