//! Current-user endpoint.
//!
//! ```text
//! GET /api/v1/me
//! ```

use std::collections::BTreeSet;

use actix_web::{get, web};
use serde::Serialize;

use crate::domain::{HouseholdId, Role, UserId, UserName, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::UserContext;

/// Response body for `GET /api/v1/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: UserId,
    pub user_name: UserName,
    pub roles: BTreeSet<Role>,
    pub household_id: Option<HouseholdId>,
    pub is_admin: bool,
}

impl From<UserSummary> for MeResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            is_admin: summary.is_admin(),
            household_id: summary.household_id().copied(),
            roles: summary.roles().clone(),
            user_name: summary.user_name().clone(),
            user_id: summary.user_id().clone(),
        }
    }
}

/// Describe the signed-in caller.
#[get("/me")]
pub async fn current_user(context: UserContext) -> ApiResult<web::Json<MeResponse>> {
    Ok(web::Json(MeResponse::from(context.summary()?)))
}
