//! Household-scoped record endpoints.
//!
//! ```text
//! GET /api/v1/records
//! GET /api/v1/records/{id}
//! POST /api/v1/records {"title":"Groceries","householdId":"…"}
//! ```
//!
//! Every call passes the caller's scope to the repository. Members never
//! need `householdId`; administrators must name the household a new record
//! belongs to.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::RecordRepositoryError;
use crate::domain::{
    Error, HouseholdId, HouseholdRecord, RecordId, RecordTitle, RecordValidationError,
    ScopeViolation,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::UserContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/records`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub title: String,
    #[serde(default)]
    pub household_id: Option<String>,
}

fn map_repository_error(err: RecordRepositoryError) -> Error {
    match err {
        RecordRepositoryError::OutOfScope => {
            Error::forbidden("household is outside the caller's scope")
        }
        RecordRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_scope_violation(violation: ScopeViolation) -> Error {
    match violation {
        ScopeViolation::OutsideHousehold => Error::forbidden(violation.to_string()),
        ScopeViolation::TargetHouseholdRequired => Error::invalid_request(violation.to_string())
            .with_details(json!({ "field": "householdId", "code": "household_required" })),
    }
}

fn invalid_field(field: &str, err: &impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// List the records visible to the caller.
#[get("/records")]
pub async fn list_records(
    state: web::Data<HttpState>,
    context: UserContext,
) -> ApiResult<web::Json<Vec<HouseholdRecord>>> {
    let scope = context.scope()?;
    let records = state
        .records
        .list(&scope)
        .await
        .map_err(map_repository_error)?;
    Ok(web::Json(records))
}

/// Fetch one record; records outside the caller's household are not found.
#[get("/records/{id}")]
pub async fn get_record(
    state: web::Data<HttpState>,
    context: UserContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<HouseholdRecord>> {
    let id = RecordId::new(path.into_inner()).map_err(|err| invalid_field("id", &err))?;
    let scope = context.scope()?;
    state
        .records
        .find(&scope, &id)
        .await
        .map_err(map_repository_error)?
        .map(web::Json)
        .ok_or_else(|| Error::not_found("record not found"))
}

/// Create a record in the caller's household.
#[post("/records")]
pub async fn create_record(
    state: web::Data<HttpState>,
    context: UserContext,
    payload: web::Json<CreateRecordRequest>,
) -> ApiResult<HttpResponse> {
    let CreateRecordRequest {
        title,
        household_id,
    } = payload.into_inner();
    let title =
        RecordTitle::new(title).map_err(|err: RecordValidationError| invalid_field("title", &err))?;
    let requested = household_id
        .map(HouseholdId::new)
        .transpose()
        .map_err(|err| invalid_field("householdId", &err))?;

    let scope = context.scope()?;
    let household = scope
        .target_household(requested)
        .map_err(map_scope_violation)?;
    let record = HouseholdRecord::new(RecordId::random(), household, title, state.clock.utc());
    state
        .records
        .insert(&scope, record.clone())
        .await
        .map_err(map_repository_error)?;
    Ok(HttpResponse::Created().json(record))
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
