use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing host")]
    MissingHost,
    #[error("Not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResponse = Result<HttpResponse, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MissingHost | Self::Database(_) | Self::Template(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {self}");
            return HttpResponse::build(status)
                .content_type(ContentType::plaintext())
                .body("Internal server error");
        }
        HttpResponse::build(status)
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}
