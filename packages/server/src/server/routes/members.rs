use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::common::{FamilyId, MemberId};
use crate::domains::member::activities;
use crate::domains::member::{CreateMemberInput, DeletedCount, MemberData, MemberPatch};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiJson, ApiPath};

type ApiResult<T> = Result<T, ApiError>;

fn to_data(members: Vec<crate::domains::member::Member>) -> Vec<MemberData> {
    members.into_iter().map(MemberData::from).collect()
}

/// GET /api/members
pub async fn list_members_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<MemberData>>> {
    let members = activities::list_members(&state.deps).await?;
    Ok(Json(to_data(members)))
}

/// GET /api/members/:member_id
pub async fn get_member_handler(
    State(state): State<AppState>,
    ApiPath(member_id): ApiPath<MemberId>,
) -> ApiResult<Json<MemberData>> {
    let member = activities::get_member(&member_id, &state.deps).await?;
    Ok(Json(member.into()))
}

/// GET /api/members/family/:family_id
pub async fn list_family_handler(
    State(state): State<AppState>,
    ApiPath(family_id): ApiPath<FamilyId>,
) -> ApiResult<Json<Vec<MemberData>>> {
    let members = activities::list_family(family_id, &state.deps).await?;
    Ok(Json(to_data(members)))
}

/// POST /api/members
pub async fn create_member_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateMemberInput>,
) -> ApiResult<(StatusCode, Json<MemberData>)> {
    let member = activities::create_member(input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// PUT /api/members/:member_id
pub async fn update_member_handler(
    State(state): State<AppState>,
    ApiPath(member_id): ApiPath<MemberId>,
    ApiJson(patch): ApiJson<MemberPatch>,
) -> ApiResult<Json<MemberData>> {
    let member = activities::update_member(&member_id, patch, &state.deps).await?;
    Ok(Json(member.into()))
}

/// POST /api/members/:member_id/spouse/:spouse_id
pub async fn link_spouses_handler(
    State(state): State<AppState>,
    ApiPath((member_id, spouse_id)): ApiPath<(MemberId, MemberId)>,
) -> ApiResult<Json<Vec<MemberData>>> {
    let (member, spouse) = activities::link_spouses(&member_id, &spouse_id, &state.deps).await?;
    Ok(Json(vec![member.into(), spouse.into()]))
}

/// DELETE /api/members/:member_id
pub async fn delete_member_handler(
    State(state): State<AppState>,
    ApiPath(member_id): ApiPath<MemberId>,
) -> ApiResult<Json<MemberData>> {
    let member = activities::delete_member(&member_id, &state.deps).await?;
    Ok(Json(member.into()))
}

/// DELETE /api/members/family/:family_id
pub async fn delete_family_handler(
    State(state): State<AppState>,
    ApiPath(family_id): ApiPath<FamilyId>,
) -> ApiResult<Json<DeletedCount>> {
    let count = activities::delete_family(family_id, &state.deps).await?;
    Ok(Json(DeletedCount { count }))
}
