//! Route handlers

use crate::error::{FakeError, FakeResult};
use crate::state::{FakeState, RecordedRequest};
use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use rancher_common::{Cluster, Collection, SteveCollection, SteveObject};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

type AppState = Arc<FakeState>;

/// Record every request, then require the configured bearer token
pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.requests.lock().await.push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
    });

    let expected = format!("Bearer {}", state.token);
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);

    if !authorized {
        return FakeError::Unauthorized.into_response();
    }

    next.run(request).await
}

pub async fn list_clusters(
    State(state): State<AppState>,
    Query(filters): Query<HashMap<String, String>>,
) -> Json<Collection<Cluster>> {
    let data = state
        .clusters
        .iter()
        .filter(|cluster| {
            filters.iter().all(|(key, value)| match key.as_str() {
                "name" => &cluster.name == value,
                "id" => &cluster.id == value,
                "state" => &cluster.state == value,
                _ => true,
            })
        })
        .cloned()
        .collect();

    Json(Collection::new(data))
}

pub async fn get_cluster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> FakeResult<Json<Cluster>> {
    state
        .clusters
        .iter()
        .find(|cluster| cluster.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| FakeError::NotFound(format!("clusters.management.cattle.io \"{}\" not found", id)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    label_selector: Option<String>,
    limit: Option<usize>,
}

pub async fn list_objects(
    State(state): State<AppState>,
    Path(type_): Path<String>,
    Query(query): Query<ListQuery>,
) -> FakeResult<Json<SteveCollection>> {
    let store = state.objects.read().await;
    store
        .list(&type_, None, query.label_selector.as_deref(), query.limit)
        .map(Json)
}

pub async fn list_namespaced_objects(
    State(state): State<AppState>,
    Path((type_, namespace)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
) -> FakeResult<Json<SteveCollection>> {
    let store = state.objects.read().await;
    store
        .list(&type_, Some(&namespace), query.label_selector.as_deref(), query.limit)
        .map(Json)
}

pub async fn create_object(
    State(state): State<AppState>,
    Path(type_): Path<String>,
    Json(object): Json<SteveObject>,
) -> FakeResult<(StatusCode, Json<SteveObject>)> {
    let mut store = state.objects.write().await;
    let created = store.create(&type_, object)?;
    tracing::debug!(id = %created.id, type_ = %type_, "Fake created object");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_object(
    State(state): State<AppState>,
    Path((type_, namespace, name)): Path<(String, String, String)>,
) -> FakeResult<Json<SteveObject>> {
    let store = state.objects.read().await;
    store.get(&type_, &namespace, &name).map(Json)
}

pub async fn update_object(
    State(state): State<AppState>,
    Path((type_, namespace, name)): Path<(String, String, String)>,
    Json(object): Json<SteveObject>,
) -> FakeResult<Json<SteveObject>> {
    let mut store = state.objects.write().await;
    store.update(&type_, &namespace, &name, object).map(Json)
}

pub async fn delete_object(
    State(state): State<AppState>,
    Path((type_, namespace, name)): Path<(String, String, String)>,
) -> FakeResult<Json<SteveObject>> {
    let mut store = state.objects.write().await;
    let deleted = store.delete(&type_, &namespace, &name)?;
    tracing::debug!(id = %deleted.id, type_ = %type_, "Fake deleted object");
    Ok(Json(deleted))
}
