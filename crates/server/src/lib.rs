use axum::{
    Extension, Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod server;
mod transactions;
mod validation;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{TransactionPut, TransactionView};
        pub use engine::{NewTransaction, Transaction, TransactionId};
    }

    pub mod sum {
        pub use api_types::sum::Sum;
    }

    pub use api_types::Status;
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    NotFound,
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::ParentNotFound(_) | EngineError::SelfParent(_) => StatusCode::BAD_REQUEST,
        EngineError::CyclicData(_) | EngineError::BrokenChain { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Conflict(_) => "conflict".to_string(),
        EngineError::ParentNotFound(_) => "parent not found".to_string(),
        err if err.is_corruption() => {
            tracing::error!("store corruption: {err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };
        tracing::debug!("responding {status}: {message}");

        // Read back by `error_path` to add the request path.
        let body = types::Status::new(message);
        (status, Extension(body.clone()), Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(format!("Invalid request: {}", value.body_text()))
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(format!("Invalid request: {}", value.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::TransactionId;

    fn status_of(err: EngineError) -> StatusCode {
        ServerError::from(err).into_response().status()
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        assert_eq!(
            status_of(EngineError::Conflict(TransactionId::new(1))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn engine_parent_errors_map_to_400() {
        assert_eq!(
            status_of(EngineError::ParentNotFound(TransactionId::new(1))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(EngineError::SelfParent(TransactionId::new(1))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn engine_corruption_maps_to_500() {
        assert_eq!(
            status_of(EngineError::CyclicData(TransactionId::new(1))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(EngineError::BrokenChain {
                from: TransactionId::new(1),
                missing: TransactionId::new(2),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn corruption_details_stay_in_logs() {
        let message = message_for_engine_error(EngineError::CyclicData(TransactionId::new(3)));
        assert_eq!(message, "internal server error");
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
