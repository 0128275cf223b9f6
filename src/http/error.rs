use rouille::Response;

use crate::storage::error::StorageError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        log::error!("storage failure while serving request: {err}");
        ApiError::Internal("internal server error".into())
    }
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => {
                Response::text(msg).with_status_code(status)
            }
        }
    }
}
