use crate::model::attendance::{AttendanceRecord, AttendanceSummary};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance

Check-in / check-out tracking for the **Human Resource Management (HRM)** system.

### 🔹 Key Features
- Any number of sessions per day; check-out closes the most recent open one
- Today's sessions for the caller, or for every employee (HR/Admin)
- Yearly JSON backup, downloaded as a file (HR/Admin)

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::today_all,
        crate::api::attendance::download_backup
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceSummary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

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
