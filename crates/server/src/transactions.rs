//! Transactions API endpoints

use api_types::{
    Status,
    sum::Sum,
    transaction::{TransactionPut, TransactionView},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{ServerError, server::ServerState, validation};

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        kind: tx.kind,
        amount: tx.amount,
        parent_id: tx.parent_id.map(i64::from),
    }
}

pub async fn put_transaction(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TransactionPut>, JsonRejection>,
) -> Result<Json<Status>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    tracing::trace!("put_transaction {id} {payload:?}");

    let new = validation::validate(payload)?;
    state.engine.create(id, new)?;

    Ok(Json(Status::ok()))
}

pub async fn get_transaction(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(id) = id?;
    tracing::trace!("get_transaction {id}");

    state
        .engine
        .transaction(id)
        .map(|tx| Json(view(tx)))
        .ok_or(ServerError::NotFound)
}

pub async fn get_ids_by_type(
    State(state): State<ServerState>,
    Path(kind): Path<String>,
) -> Json<Vec<i64>> {
    tracing::trace!("get_ids_by_type {kind}");

    Json(
        state
            .engine
            .ids_by_type(&kind)
            .into_iter()
            .map(i64::from)
            .collect(),
    )
}

pub async fn get_sum(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Sum>, ServerError> {
    let Path(id) = id?;
    tracing::trace!("get_sum {id}");

    match state.engine.sum(id)? {
        Some(sum) => Ok(Json(Sum { sum })),
        None => Err(ServerError::NotFound),
    }
}
