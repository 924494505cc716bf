use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ProductId, ProjectId, SpecificationId};
use super::repository::ProcurementStore;
use super::service::{ProcurementService, ProcurementServiceError};

/// Router builder exposing the engine's JSON API.
pub fn procurement_router<S>(service: Arc<ProcurementService<S>>) -> Router
where
    S: ProcurementStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/projects/:project_id/procurement/scenarios",
            get(scenarios_handler::<S>),
        )
        .route(
            "/api/v1/projects/:project_id/procurement/recommendations/:strategy",
            get(recommendations_handler::<S>),
        )
        .route(
            "/api/v1/projects/:project_id/procurement/risks",
            get(risks_handler::<S>),
        )
        .route(
            "/api/v1/projects/:project_id/procurement/savings",
            get(savings_handler::<S>),
        )
        .route(
            "/api/v1/projects/:project_id/procurement/consolidation",
            get(consolidation_handler::<S>),
        )
        .route(
            "/api/v1/projects/:project_id/procurement/comparison",
            get(comparison_handler::<S>),
        )
        .route(
            "/api/v1/projects/:project_id/procurement/strategy",
            put(set_strategy_handler::<S>),
        )
        .route(
            "/api/v1/specifications/:specification_id/comparison",
            get(specification_comparison_handler::<S>),
        )
        .route(
            "/api/v1/products/:product_id/comparison",
            get(product_comparison_handler::<S>),
        )
        .with_state(service)
}

/// Optional evaluation-date override; reports default to the local date.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TodayQuery {
    today: Option<NaiveDate>,
}

impl TodayQuery {
    fn resolve(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MatrixQuery {
    today: Option<NaiveDate>,
    #[serde(default)]
    include_extras: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StrategyUpdateRequest {
    strategy: String,
}

fn error_response(error: ProcurementServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn scenarios_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(project_id): Path<u64>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    match service.compare_scenarios(ProjectId(project_id), query.resolve()) {
        Ok(scenarios) => (StatusCode::OK, axum::Json(scenarios)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommendations_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path((project_id, strategy)): Path<(u64, String)>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    match service.vendor_recommendations(ProjectId(project_id), &strategy, query.resolve()) {
        Ok(recommendations) => (StatusCode::OK, axum::Json(recommendations)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn risks_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(project_id): Path<u64>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    match service.assess_project_risks(ProjectId(project_id), query.resolve()) {
        Ok(findings) => (StatusCode::OK, axum::Json(findings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn savings_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(project_id): Path<u64>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    match service.project_savings(ProjectId(project_id), query.resolve()) {
        Ok(savings) => (StatusCode::OK, axum::Json(savings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn consolidation_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(project_id): Path<u64>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    match service.vendor_consolidation(ProjectId(project_id), query.resolve()) {
        Ok(consolidation) => (StatusCode::OK, axum::Json(consolidation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn comparison_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(project_id): Path<u64>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    match service.procurement_comparison(ProjectId(project_id), query.resolve()) {
        Ok(comparison) => (StatusCode::OK, axum::Json(comparison)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_strategy_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(project_id): Path<u64>,
    axum::Json(request): axum::Json<StrategyUpdateRequest>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    match service.set_strategy(ProjectId(project_id), &request.strategy) {
        Ok(strategy) => (StatusCode::OK, axum::Json(strategy)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn specification_comparison_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(specification_id): Path<u64>,
    Query(query): Query<MatrixQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    match service.comparison_for_specification(
        SpecificationId(specification_id),
        query.include_extras,
        today,
    ) {
        Ok(matrix) => (StatusCode::OK, axum::Json(matrix)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn product_comparison_handler<S>(
    State(service): State<Arc<ProcurementService<S>>>,
    Path(product_id): Path<u64>,
    Query(query): Query<MatrixQuery>,
) -> Response
where
    S: ProcurementStore + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    match service.comparison_for_product(ProductId(product_id), query.include_extras, today) {
        Ok(matrix) => (StatusCode::OK, axum::Json(matrix)).into_response(),
        Err(error) => error_response(error),
    }
}
