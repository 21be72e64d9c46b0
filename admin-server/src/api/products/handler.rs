//! Product API Handlers

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
};

use crate::api::SuccessResponse;
use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::db::repository::product::{self, ProductFields};
use crate::taxonomy::{TaxonomyError, TaxonomyKind};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, normalize_optional,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductFilter, ProductInput};

const RESOURCE: &str = "product";

/// Images per product
pub const MAX_IMAGES: usize = 5;

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("id", id)
}

fn map_repo_error(err: RepoError, id: i64) -> AppError {
    match err {
        RepoError::NotFound(_) => product_not_found(id),
        other => other.into(),
    }
}

/// The referenced node must exist; a dangling reference is a bad payload
async fn ensure_node(state: &ServerState, kind: TaxonomyKind, id: Option<i64>) -> AppResult<()> {
    let Some(id) = id else {
        return Ok(());
    };
    let field = match kind {
        TaxonomyKind::Category => "categoryId",
        TaxonomyKind::SearchTree => "searchTreeId",
    };
    match state.taxonomy(kind).get(id).await {
        Ok(_) => Ok(()),
        Err(TaxonomyError::NotFound { .. }) => Err(AppError::validation(format!(
            "{} {id} not found",
            kind.label()
        ))
        .with_detail("field", field)),
        Err(e) => Err(e.into()),
    }
}

/// Validate a payload and resolve it into column values
async fn prepare(state: &ServerState, input: ProductInput) -> AppResult<ProductFields> {
    let name = input.name.trim().to_string();
    validate_required_text(&name, "name", MAX_NAME_LEN)?;

    let description = normalize_optional(input.description);
    validate_optional_text(&description, "description", MAX_DESCRIPTION_LEN)?;

    if !input.price.is_finite() || input.price < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("Price must be a non-negative number, got {}", input.price),
        ));
    }

    // Blank rows come from untouched form lines
    let mut characteristics = Vec::with_capacity(input.characteristics.len());
    for c in input.characteristics {
        let name = c.name.trim().to_string();
        let value = c.value.trim().to_string();
        if name.is_empty() && value.is_empty() {
            continue;
        }
        validate_required_text(&name, "characteristic name", MAX_NAME_LEN)?;
        validate_optional_text(&Some(value.clone()), "characteristic value", MAX_NOTE_LEN)?;
        characteristics.push((name, value));
    }

    let images: Vec<String> = input
        .images
        .into_iter()
        .map(|i| i.url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();
    if images.len() > MAX_IMAGES {
        return Err(AppError::with_message(
            ErrorCode::ProductTooManyImages,
            format!("A product can have at most {MAX_IMAGES} images, got {}", images.len()),
        ));
    }
    for url in &images {
        validate_required_text(url, "image url", MAX_URL_LEN)?;
    }

    ensure_node(state, TaxonomyKind::Category, input.category_id).await?;
    ensure_node(state, TaxonomyKind::SearchTree, input.search_tree_id).await?;

    Ok(ProductFields {
        name,
        description,
        price: input.price,
        category_id: input.category_id,
        search_tree_id: input.search_tree_id,
        characteristics,
        images,
    })
}

/// GET /api/products - 商品列表 (可按分类 / 搜索树过滤，包含后代节点)
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ProductFilter>, QueryRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Query(filter) = query?;

    let products = match (filter.category_id, filter.search_tree_id) {
        (None, None) => product::find_all(state.pool()).await?,
        (Some(category_id), None) => state.categories.products_under(category_id).await?,
        (None, Some(node_id)) => state.search_tree.products_under(node_id).await?,
        (Some(category_id), Some(node_id)) => {
            let nodes = state.search_tree.descendants(node_id).await?;
            state
                .categories
                .products_under(category_id)
                .await?
                .into_iter()
                .filter(|p| p.search_tree_id.is_some_and(|id| nodes.contains(&id)))
                .collect()
        }
    };

    Ok(Json(products))
}

/// GET /api/products/{id} - 单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Product>> {
    let Path(id) = path?;
    let product = product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let Json(input) = payload?;
    let fields = prepare(&state, input).await?;

    let product = product::create(state.pool(), &fields).await?;

    audit_log!("create", format!("{RESOURCE}:{}", product.id), &product.name);
    Ok(Json(product))
}

/// PUT /api/products/{id} - 更新商品 (特性与图片整体替换)
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let fields = prepare(&state, input).await?;

    let product = product::update(state.pool(), id, &fields)
        .await
        .map_err(|e| map_repo_error(e, id))?;

    audit_log!("update", format!("{RESOURCE}:{id}"), &product.name);
    Ok(Json(product))
}

/// DELETE /api/products/{id} - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Path(id) = path?;
    product::delete(state.pool(), id)
        .await
        .map_err(|e| map_repo_error(e, id))?;

    audit_log!("delete", format!("{RESOURCE}:{id}"));
    Ok(Json(SuccessResponse::ok()))
}
