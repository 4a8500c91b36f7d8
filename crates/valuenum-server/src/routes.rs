use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use valuenum_core::{
    calculate, CalculationInputs, CalculationRecord, CalculationResult, Claims, ConceptAccess,
    ConceptAccessCreate, SFormulaInputs, StatusCheck, StatusCheckCreate, WFormulaInputs,
};

use crate::{
    caller::{Authenticated, Caller},
    error::AppError,
    state::AppState,
};

const STATUS_LIST_LIMIT: usize = 1000;

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

pub async fn create_status_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StatusCheckCreate>, JsonRejection>,
) -> Result<Json<StatusCheck>, AppError> {
    let Json(create) = payload?;
    let check = StatusCheck::from(create);
    state.db.lock().await.record_status_check(&check)?;
    Ok(Json(check))
}

pub async fn list_status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StatusCheck>>, AppError> {
    let checks = state.db.lock().await.list_status_checks(STATUS_LIST_LIMIT)?;
    Ok(Json(checks))
}

#[derive(Debug, Serialize)]
pub struct ConceptAccessResponse {
    pub ok: bool,
    pub email_sent: bool,
    pub error: Option<String>,
    pub record_id: String,
}

pub async fn concepts_access_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConceptAccessCreate>, JsonRejection>,
) -> Result<Json<ConceptAccessResponse>, AppError> {
    let Json(create) = payload?;
    create.validate()?;

    let access = ConceptAccess::from(create);
    state.db.lock().await.record_concept_access(&access)?;
    info!(record_id = %access.id, "Concepts access recorded");

    let delivery = state.notifier.concept_access(&access).await;
    Ok(Json(ConceptAccessResponse {
        ok: true,
        email_sent: delivery.sent,
        error: delivery.error,
        record_id: access.id,
    }))
}

pub async fn s_formula_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    payload: Result<Json<SFormulaInputs>, JsonRejection>,
) -> Result<Json<CalculationResult>, AppError> {
    let Json(inputs) = payload?;
    evaluate_and_record(&state, &caller, CalculationInputs::S(inputs)).await
}

pub async fn w_formula_handler(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    payload: Result<Json<WFormulaInputs>, JsonRejection>,
) -> Result<Json<CalculationResult>, AppError> {
    let Json(inputs) = payload?;
    evaluate_and_record(&state, &caller, CalculationInputs::W(inputs)).await
}

async fn evaluate_and_record(
    state: &AppState,
    caller: &Caller,
    inputs: CalculationInputs,
) -> Result<Json<CalculationResult>, AppError> {
    let result = calculate(inputs)?;
    state
        .db
        .lock()
        .await
        .record_calculation(&result, caller.id())?;

    info!(
        id = result.id(),
        kind = %result.formula_kind(),
        value = result.value_number(),
        tier = %result.tier(),
        "Calculation recorded"
    );
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<CalculationRecord>>, AppError> {
    let Query(params) = params?;
    let limit = state.config.history.page_limit(params.limit);
    let records = state
        .db
        .lock()
        .await
        .calculation_history(&claims.sub, limit)?;
    Ok(Json(records))
}

pub async fn me_handler(Authenticated(claims): Authenticated) -> Json<Claims> {
    Json(claims)
}
