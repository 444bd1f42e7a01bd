//! Drug catalog HTTP handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use remedi_commerce::catalog::{Drug, DrugQuery, DrugUpdate, NewDrug, DEFAULT_PER_PAGE};
use remedi_commerce::ids::DrugId;
use remedi_commerce::CommerceError;
use serde::Deserialize;
use serde_json::json;

/// Query string of `GET /drugs`.
#[derive(Debug, Deserialize)]
pub struct DrugListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub name: Option<String>,
    pub form: Option<String>,
    pub active_ingredient: Option<String>,
}

fn parse_drug_id(raw: String) -> Result<DrugId, ApiError> {
    let id = DrugId::new(raw);
    if !id.is_valid() {
        return Err(CommerceError::BadIdentifier(id.into_inner()).into());
    }
    Ok(id)
}

/// `GET /drugs` — filtered, paginated catalog listing.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DrugListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut query = DrugQuery::new().with_pagination(
        params.page.unwrap_or(1),
        params.per_page.unwrap_or(DEFAULT_PER_PAGE),
    );
    if let Some(name) = params.name {
        query = query.with_name(name);
    }
    if let Some(form) = params.form {
        query = query.with_form(form);
    }
    if let Some(ingredient) = params.active_ingredient {
        query = query.with_active_ingredient(ingredient);
    }

    let page = state.drugs.list(&query).await?;
    if page.out_of_range() {
        return Err(CommerceError::NoMorePages {
            requested: page.page,
            available: page.pages,
        }
        .into());
    }

    Ok(Json(json!({
        "data": page.data,
        "paging": {
            "total": page.total,
            "page": page.page,
            "pages": page.pages,
        },
    })))
}

/// `GET /drugs/forms` — distinct dosage forms.
pub async fn forms(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let forms = state.drugs.distinct_forms().await?;
    Ok(Json(json!({ "data": forms })))
}

/// `GET /drugs/{drugId}` — one drug.
pub async fn detail(
    State(state): State<AppState>,
    Path(drug_id): Path<String>,
) -> Result<Json<Drug>, ApiError> {
    let id = parse_drug_id(drug_id)?;
    let drug = state
        .drugs
        .find(&id)
        .await?
        .ok_or_else(|| CommerceError::DrugNotFound(id.to_string()))?;
    Ok(Json(drug))
}

/// `POST /drugs` — add a drug to the catalog.
///
/// The unique-name invariant is checked up front so the caller gets a
/// conflict rather than a generic store error.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewDrug>,
) -> Result<Json<Drug>, ApiError> {
    if state.drugs.find_by_name(&input.drug_name).await?.is_some() {
        return Err(CommerceError::DrugAlreadyExists(input.drug_name).into());
    }
    Ok(Json(state.drugs.create(input).await?))
}

/// `PUT`/`PATCH /drugs/{drugId}` — partial update.
pub async fn update(
    State(state): State<AppState>,
    Path(drug_id): Path<String>,
    Json(changes): Json<DrugUpdate>,
) -> Result<Json<Drug>, ApiError> {
    let id = parse_drug_id(drug_id)?;
    if changes.is_empty() {
        return Err(ApiError::BadRequest("nothing to update!".to_string()));
    }
    let updated = state
        .drugs
        .update(&id, changes)
        .await?
        .ok_or_else(|| CommerceError::DrugNotFound(id.to_string()))?;
    Ok(Json(updated))
}

/// `DELETE /drugs/{drugId}` — remove a drug from the catalog.
pub async fn remove(
    State(state): State<AppState>,
    Path(drug_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_drug_id(drug_id)?;
    if !state.drugs.delete(&id).await? {
        return Err(CommerceError::DrugNotFound(id.to_string()).into());
    }
    Ok(Json(json!({ "message": "Successfully deleted." })))
}
