use crate::auth::auth::AuthUser;
use crate::reconcile::Reconciler;
use actix_web::{HttpResponse, Responder, web};

/// Run today's reconciliation immediately
#[utoipa::path(
    post,
    path = "/api/reconciliation/run",
    responses(
        (status = 200, description = "Reconciliation finished", body = crate::model::summary::ReconciliationSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Configuration incomplete", body = Object, example = json!({
            "message": "configuration document has no active block type"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reconciliation"
)]
pub async fn run_reconciliation(
    auth: AuthUser,
    reconciler: web::Data<Reconciler>,
) -> actix_web::Result<impl Responder> {
    auth.require_reconciler()?;

    tracing::info!(user = %auth.username, "Manual reconciliation requested");

    match reconciler.run_daily_reconciliation().await {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),

        Err(e) if e.is_configuration() => {
            tracing::warn!(error = %e, "Manual reconciliation refused");
            Ok(HttpResponse::Conflict().json(serde_json::json!({
                "message": e.to_string()
            })))
        }

        Err(e) => {
            tracing::error!(error = %e, user = %auth.username, "Manual reconciliation failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}
