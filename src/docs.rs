use crate::model::summary::ReconciliationSummary;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SICA Attendance Reconciler",
        version = "0.1.0",
        description = r#"
## SICA daily attendance reconciliation

Every night the reconciler compares the advisors' shift roster with the
check-ins recorded during the day, writes one report per shift and archives
the processed check-ins.

This API only exposes a manual trigger for operators. It requires a bearer
token whose role is **Admin** or **System**.
"#,
    ),
    paths(
        crate::api::reconciliation::run_reconciliation
    ),
    components(
        schemas(
            ReconciliationSummary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Reconciliation", description = "Daily attendance reconciliation"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
