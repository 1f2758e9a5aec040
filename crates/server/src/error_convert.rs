use shared_types::AppError;

/// Convert a sqlx::Error into an AppError.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Case not found"),
        sqlx::Error::PoolTimedOut => {
            AppError::database("Case store unavailable: connection pool timed out")
        }
        _ => AppError::database(err.to_string()),
    }
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

impl SqlxErrorExt for sqlx::migrate::MigrateError {
    fn into_app_error(self) -> AppError {
        AppError::database(format!("Migration failed: {self}"))
    }
}
