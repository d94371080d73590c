use anyhow::{anyhow, Context};
use serde_json::json;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "error": msg,
                "type": "unknown",
            }),
            Error::InvalidArgument(msg) => json!({
                "error": msg,
                "type": "invalid-argument",
            }),
            Error::NotFound(msg) => json!({
                "error": msg,
                "type": "not-found",
            }),
            Error::Conflict(msg) => json!({
                "error": msg,
                "type": "conflict",
            }),
            Error::Storage(msg) => json!({
                "error": msg,
                "type": "storage",
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let message = String::from(
            data.get("error")
                .and_then(|msg| msg.as_str())
                .ok_or_else(|| anyhow!("error message is not a string"))?,
        );
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(message),
                "invalid-argument" => Error::InvalidArgument(message),
                "not-found" => Error::NotFound(message),
                "conflict" => Error::Conflict(message),
                "storage" => Error::Storage(message),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_round_trip_through_json() {
        let errors = vec![
            Error::Unknown(String::from("boom")),
            Error::InvalidArgument(String::from("title must not be empty")),
            Error::NotFound(String::from("complaint 42")),
            Error::Conflict(String::from("already voted")),
            Error::Storage(String::from("store unavailable")),
        ];
        for err in errors {
            let parsed = Error::parse(&err.contents()).expect("parsing error contents");
            assert_eq!(err, parsed);
        }
    }

    #[test]
    fn status_codes_are_non_2xx() {
        assert_eq!(
            Error::InvalidArgument(String::new()).status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound(String::new()).status_code(),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Storage(String::new()).status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
