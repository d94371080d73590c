use semita_api::Error as ApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Error {
        Error::Api(ApiError::InvalidArgument(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Error {
        Error::Api(ApiError::NotFound(msg.into()))
    }
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            Error::Anyhow(err) => {
                tracing::error!(?err, "storage or internal error");
                #[cfg(not(test))]
                let err = ApiError::Storage(String::from("Internal error, see logs for details"));
                #[cfg(test)]
                let err = ApiError::Storage(format!("Internal error: {err:?}"));
                err
            }
            Error::Api(err) => {
                tracing::info!("returning error to client: {err}");
                err
            }
        };
        (err.status_code(), err.contents()).into_response()
    }
}
