use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::admin::AdminState;
use crate::directory::{DomainStatus, FailoverDirectory, SweepReport};

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub domains: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub primary: String,
    pub domain: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkOfflineRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAliasesRequest {
    pub aliases: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAliasesResponse {
    /// False when the list was empty and the current aliases were kept.
    pub updated: bool,
    pub status: DomainStatus,
}

fn directory(state: &AdminState, primary: &str) -> Result<Arc<FailoverDirectory>, StatusCode> {
    state.registry.get(primary).ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        domains: state.registry.len(),
    })
}

pub async fn list_domains(State(state): State<AdminState>) -> Json<Vec<DomainStatus>> {
    Json(state.registry.statuses())
}

pub async fn get_domain(
    State(state): State<AdminState>,
    Path(primary): Path<String>,
) -> Result<Json<DomainStatus>, StatusCode> {
    Ok(Json(directory(&state, &primary)?.status()))
}

pub async fn resolve_domain(
    State(state): State<AdminState>,
    Path(primary): Path<String>,
) -> Result<Json<ResolveResponse>, StatusCode> {
    let domain = directory(&state, &primary)?.domain_name_to_use();
    Ok(Json(ResolveResponse { primary, domain }))
}

pub async fn mark_offline(
    State(state): State<AdminState>,
    Path(primary): Path<String>,
    Json(body): Json<MarkOfflineRequest>,
) -> Result<Json<DomainStatus>, StatusCode> {
    let directory = directory(&state, &primary)?;
    directory.mark_domain_offline(&body.name);
    Ok(Json(directory.status()))
}

pub async fn update_aliases(
    State(state): State<AdminState>,
    Path(primary): Path<String>,
    Json(body): Json<UpdateAliasesRequest>,
) -> Result<Json<UpdateAliasesResponse>, StatusCode> {
    let directory = directory(&state, &primary)?;
    let updated = directory.update_alias_set(&body.aliases);
    Ok(Json(UpdateAliasesResponse {
        updated,
        status: directory.status(),
    }))
}

pub async fn trigger_sweep(State(state): State<AdminState>) -> Json<Vec<SweepReport>> {
    Json(state.registry.sweep_all().await)
}
