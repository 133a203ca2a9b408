use crate::client::ClientError;
use crate::storage::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("socket address parsing error: {0}")]
    SocketAddressParsingError(#[from] std::net::AddrParseError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to build backend client: {0}")]
    ClientError(#[from] ClientError),
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("unknown storage type `{0}`")]
    UnknownStorageType(String),
    #[error("file storage requires `storage.file_path`")]
    MissingStorageFile,
}

#[derive(Error, Debug)]
pub enum AppErrors {
    #[error("failed to render template: {0}")]
    TemplateError(#[from] askama::Error),
}

impl IntoResponse for AppErrors {
    fn into_response(self) -> Response {
        error!("request failed: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
