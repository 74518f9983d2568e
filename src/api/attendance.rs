use crate::auth::auth::AuthUser;
use crate::error::AttendanceError;
use crate::model::attendance::{AttendanceRecord, AttendanceSummary};
use crate::service::AttendanceService;
use crate::service::attendance::backup_file_name;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::debug;

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    responses(
        (status = 201, description = "New attendance session opened", body = AttendanceRecord),
        (status = 400, description = "Caller is not linked to an employee", body = Object, example = json!({
            "message": "Invalid employee"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    debug!(user_id = auth.user_id, user = %auth.username, "Check-in request");
    let record = service.check_in(auth.employee_id).await?;

    Ok(HttpResponse::Created().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/checkout",
    responses(
        (status = 200, description = "Most recent open session closed", body = AttendanceRecord),
        (status = 400, description = "Caller is not linked to an employee", body = Object, example = json!({
            "message": "Invalid employee"
        })),
        (status = 404, description = "No open session", body = Object, example = json!({
            "message": "No active check-in found. Please check in first."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    debug!(user_id = auth.user_id, user = %auth.username, "Check-out request");
    let record = service.check_out(auth.employee_id).await?;

    Ok(HttpResponse::Ok().json(record))
}

/// Caller's sessions for today
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's sessions, earliest first", body = Vec<AttendanceRecord>),
        (status = 400, description = "Caller is not linked to an employee"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    let records = service.today_attendance(auth.employee_id).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Every employee's sessions for today (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/attendance/today/all",
    responses(
        (status = 200, description = "Today's sessions across employees", body = Vec<AttendanceSummary>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today_all(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let rows = service.all_today_attendance().await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Export this year's attendance and download it (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/attendance/backup",
    responses(
        (status = 200, description = "JSON backup file", content_type = "application/json", body = Vec<AttendanceRecord>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No data for the current year or backup failed", body = Object, example = json!({
            "message": "No attendance data to backup"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn download_backup(
    req: HttpRequest,
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let backup = service.backup_attendance().await?;
    debug!(
        user_id = auth.user_id,
        backup_id = backup.backup.id,
        records = backup.record_count,
        "Serving attendance backup"
    );
    let file = NamedFile::open_async(&backup.path)
        .await
        .map_err(AttendanceError::from)?
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(backup_file_name(
                backup.backup.year,
            ))],
        });

    Ok(file.into_response(&req))
}
