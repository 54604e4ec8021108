use std::time::Duration;

use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header::ContentType},
};
use thiserror::Error;

/// Everything that can go wrong while serving `/cotacao`.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    #[error("quote provider answered with status {0}")]
    ProviderStatus(reqwest::StatusCode),

    #[error("quote provider did not answer within {0:?}")]
    ProviderTimeout(Duration),

    #[error("malformed quote payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("quote payload has an empty `{0}` field")]
    MissingField(&'static str),

    #[error("failed to persist quote: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("quote was not persisted within {0:?}")]
    StorageTimeout(Duration),
}

impl QuoteError {
    /// A deadline expired somewhere in the chain, as opposed to bad data or
    /// a broken dependency.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            QuoteError::ProviderTimeout(_) | QuoteError::StorageTimeout(_)
        )
    }
}

// The only caller is the local client, so the error text goes out as is.
impl ResponseError for QuoteError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}
