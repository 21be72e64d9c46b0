//! Taxonomy API Handlers

use axum::{
    Extension, Json,
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
};

use crate::api::SuccessResponse;
use crate::core::ServerState;
use crate::taxonomy::TaxonomyKind;
use crate::utils::AppResult;
use shared::models::{
    Product, TaxonomyNode, TaxonomyNodeDetail, TaxonomyNodeInput, TaxonomyTreeNode,
};

/// GET / - 嵌套列表
pub async fn list(
    State(state): State<ServerState>,
    Extension(kind): Extension<TaxonomyKind>,
) -> AppResult<Json<Vec<TaxonomyTreeNode>>> {
    Ok(Json(state.taxonomy(kind).list().await?))
}

/// GET /tree/root - 根节点及完整子树
pub async fn root_tree(
    State(state): State<ServerState>,
    Extension(kind): Extension<TaxonomyKind>,
) -> AppResult<Json<Vec<TaxonomyTreeNode>>> {
    Ok(Json(state.taxonomy(kind).root_tree().await?))
}

/// GET /{id} - 单个节点
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(kind): Extension<TaxonomyKind>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<TaxonomyNodeDetail>> {
    let Path(id) = path?;
    Ok(Json(state.taxonomy(kind).detail(id).await?))
}

/// POST / - 创建节点
pub async fn create(
    State(state): State<ServerState>,
    Extension(kind): Extension<TaxonomyKind>,
    payload: Result<Json<TaxonomyNodeInput>, JsonRejection>,
) -> AppResult<Json<TaxonomyNode>> {
    let Json(input) = payload?;
    Ok(Json(state.taxonomy(kind).create(input).await?))
}

/// PUT /{id} - 更新节点
pub async fn update(
    State(state): State<ServerState>,
    Extension(kind): Extension<TaxonomyKind>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaxonomyNodeInput>, JsonRejection>,
) -> AppResult<Json<TaxonomyNode>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    Ok(Json(state.taxonomy(kind).update(id, input).await?))
}

/// DELETE /{id} - 删除节点
pub async fn delete(
    State(state): State<ServerState>,
    Extension(kind): Extension<TaxonomyKind>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Path(id) = path?;
    state.taxonomy(kind).delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /{id}/products - 节点及后代下的商品
pub async fn products(
    State(state): State<ServerState>,
    Extension(kind): Extension<TaxonomyKind>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Path(id) = path?;
    Ok(Json(state.taxonomy(kind).products_under(id).await?))
}
