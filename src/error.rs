use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Invalid employee")]
    InvalidEmployee,

    #[error("No active check-in found. Please check in first.")]
    NoActiveCheckIn,

    #[error("No attendance data to backup")]
    NoBackupData,

    #[error("Backup I/O failed: {0}")]
    BackupIo(#[from] std::io::Error),

    /// store failure while taking a backup
    #[error("Backup failed: {0}")]
    BackupFailed(anyhow::Error),

    #[error("Attendance store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::InvalidEmployee => StatusCode::BAD_REQUEST,
            // backup failures are reported to the caller as not found
            AttendanceError::NoActiveCheckIn
            | AttendanceError::NoBackupData
            | AttendanceError::BackupIo(_)
            | AttendanceError::BackupFailed(_) => StatusCode::NOT_FOUND,
            AttendanceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AttendanceError::BackupIo(_) | AttendanceError::BackupFailed(_) => {
                "Error creating or downloading backup".to_string()
            }
            AttendanceError::Store(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
