use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use diesel::r2d2;
use serde_json::json;
use std::fmt;

/// Application-wide error types with user-friendly messages
#[derive(Debug, PartialEq)]
pub enum AppError {
    // Authorization
    Forbidden,

    // Validation Errors
    InvalidInput { field: String, message: String },
    DuplicateResource { resource: String },
    ResourceNotFound { resource: String },

    // Database Errors
    DatabaseError,
    ConnectionPoolError,

    // System Errors
    InternalError,
    ConfigurationError,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Forbidden => write!(f, "Access denied"),

            // Validation Errors
            AppError::InvalidInput { field, message } => write!(f, "Invalid {}: {}", field, message),
            AppError::DuplicateResource { resource } => write!(f, "{} already exists", resource),
            AppError::ResourceNotFound { resource } => write!(f, "{} not found", resource),

            // Database Errors
            AppError::DatabaseError => write!(f, "A database error occurred - please try again"),
            AppError::ConnectionPoolError => write!(f, "Service temporarily unavailable - please try again"),

            // System Errors
            AppError::InternalError => write!(f, "An unexpected error occurred - please try again"),
            AppError::ConfigurationError => write!(f, "System configuration error - contact support"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidInput { .. } => "INVALID_INPUT",
            AppError::DuplicateResource { .. } => "DUPLICATE_RESOURCE",
            AppError::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            AppError::DatabaseError => "DATABASE_ERROR",
            AppError::ConnectionPoolError => "CONNECTION_POOL_ERROR",
            AppError::InternalError => "INTERNAL_ERROR",
            AppError::ConfigurationError => "CONFIGURATION_ERROR",
        }
    }
}

/// Lets whatever HTTP layer hosts the services return `AppError` directly.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } | AppError::DuplicateResource { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DatabaseError
            | AppError::ConnectionPoolError
            | AppError::InternalError
            | AppError::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Log detailed error information for debugging
        match self {
            AppError::DatabaseError | AppError::ConnectionPoolError | AppError::InternalError => {
                log::error!("Server error: {:?}", self);
            }
            AppError::Forbidden => {
                log::warn!("Authorization failed: {:?}", self);
            }
            _ => {
                log::info!("Client error: {:?}", self);
            }
        }

        HttpResponse::build(self.status_code()).json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string()
            }
        }))
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Helper functions for common error conversions
impl AppError {
    pub fn invalid_input(field: &str, message: &str) -> Self {
        AppError::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn duplicate_resource(resource: &str) -> Self {
        AppError::DuplicateResource {
            resource: resource.to_string(),
        }
    }

    pub fn resource_not_found(resource: &str) -> Self {
        AppError::ResourceNotFound {
            resource: resource.to_string(),
        }
    }
}

/// Convert database connection pool errors
impl From<r2d2::PoolError> for AppError {
    fn from(err: r2d2::PoolError) -> Self {
        log::error!("Database connection pool error: {}", err);
        AppError::ConnectionPoolError
    }
}

/// Convert diesel database errors
impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match err {
            DieselError::NotFound => AppError::ResourceNotFound {
                resource: "Record".to_string(),
            },
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::DuplicateResource {
                    resource: "Record".to_string(),
                }
            }
            _ => {
                log::error!("Database error: {}", err);
                AppError::DatabaseError
            }
        }
    }
}

/// Convert user table errors
impl From<crate::models::user::UserTableError> for AppError {
    fn from(err: crate::models::user::UserTableError) -> Self {
        use crate::models::user::UserTableError;

        match err {
            UserTableError::EmailExists => AppError::duplicate_resource("User with this email"),
            UserTableError::InvalidEmail => AppError::invalid_input("email", "Invalid email format"),
            UserTableError::UserNotFound => AppError::resource_not_found("User"),
            UserTableError::DatabaseError => AppError::DatabaseError,
            UserTableError::Unauthorized => AppError::Forbidden,
        }
    }
}

/// Convert setting table errors
impl From<crate::models::setting::Error> for AppError {
    fn from(err: crate::models::setting::Error) -> Self {
        use crate::models::setting::Error as SettingError;

        match err {
            SettingError::SettingNotFound { key } => AppError::resource_not_found(&format!("Setting '{key}'")),
            SettingError::InvalidValue { key, .. } => AppError::invalid_input(&key, "Invalid setting value"),
            SettingError::DatabaseError => AppError::DatabaseError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::resource_not_found("Article").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::duplicate_resource("Category").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::invalid_input("keyword", "empty").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::DatabaseError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_body() {
        let resp = AppError::resource_not_found("Article").error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = resp.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
        assert_eq!(body["error"]["message"], "Article not found");
    }

    #[test]
    fn test_diesel_not_found_maps_to_not_found() {
        let err: AppError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, AppError::ResourceNotFound { .. }));
    }
}
