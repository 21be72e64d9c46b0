//! 分类 / 搜索树 API 集成测试
//!
//! 通过完整路由 (含中间件) 驱动真实 SQLite 数据库

mod common;

use common::{TestApp, ids};
use http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;

const CATEGORIES: &str = "/api/categories";
const SEARCH_TREE: &str = "/api/search-tree";

#[tokio::test]
async fn test_create_transliterates_slug_and_lists_in_root_tree() {
    let app = TestApp::new().await;

    let (status, node) = app.post(CATEGORIES, json!({ "name": "Електроніка" })).await;
    assert_eq!(status, StatusCode::OK, "{node}");
    assert_eq!(node["slug"], "elektronika");
    assert_eq!(node["name"], "Електроніка");
    assert!(node["id"].as_i64().is_some());
    assert!(node["parentId"].is_null());

    let (status, tree) = app.get(&format!("{CATEGORIES}/tree/root")).await;
    assert_eq!(status, StatusCode::OK);
    let roots = tree.as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["id"], node["id"]);
    assert_eq!(roots[0]["_count"]["children"], 0);
    assert_eq!(roots[0]["_count"]["products"], 0);
}

#[tokio::test]
async fn test_delete_blocked_by_children_until_child_removed() {
    let app = TestApp::new().await;
    let parent = app.create_node(CATEGORIES, json!({ "name": "Parent" })).await;
    let child = app
        .create_node(CATEGORIES, json!({ "name": "Child", "parentId": parent }))
        .await;

    let (status, body) = app.delete(&format!("{CATEGORIES}/{parent}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6102);
    assert!(body["error"].as_str().unwrap().contains("child"), "{body}");

    let (status, body) = app.delete(&format!("{CATEGORIES}/{child}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = app.delete(&format!("{CATEGORIES}/{parent}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("{CATEGORIES}/{parent}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6101);
}

#[tokio::test]
async fn test_delete_blocked_by_products_until_reassigned() {
    let app = TestApp::new().await;
    let first = app.create_node(CATEGORIES, json!({ "name": "Phones" })).await;
    let second = app.create_node(CATEGORIES, json!({ "name": "Tablets" })).await;

    let (status, product) = app
        .post(
            "/api/products",
            json!({ "name": "Pixel", "price": 499.0, "categoryId": first }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{product}");
    let product_id = product["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("{CATEGORIES}/{first}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6103);

    let (status, _) = app
        .put(
            &format!("/api/products/{product_id}"),
            json!({ "name": "Pixel", "price": 499.0, "categoryId": second }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&format!("{CATEGORIES}/{first}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_slug_is_bad_request() {
    let app = TestApp::new().await;
    app.create_node(CATEGORIES, json!({ "name": "Garden Tools" })).await;

    // Different spelling, same slug
    let (status, body) = app.post(CATEGORIES, json!({ "name": "garden  tools" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6104);
    assert_eq!(body["details"]["slug"], "garden-tools");
}

#[tokio::test]
async fn test_validation_and_malformed_requests() {
    let app = TestApp::new().await;

    let (status, body) = app.post(CATEGORIES, json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = app.post(CATEGORIES, json!({ "description": "no name" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let request = http::Request::builder()
        .method(http::Method::POST)
        .uri(CATEGORIES)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, bytes) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let (status, _) = app.get(&format!("{CATEGORIES}/not-a-number")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(CATEGORIES, json!({ "name": "Orphan", "parentId": 999 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6106);
}

#[tokio::test]
async fn test_string_parent_id_from_forms() {
    let app = TestApp::new().await;
    let parent = app.create_node(CATEGORIES, json!({ "name": "Books" })).await;

    let (status, node) = app
        .post(
            CATEGORIES,
            json!({ "name": "Poetry", "parentId": parent.to_string() }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{node}");
    assert_eq!(node["parentId"], parent);

    let (status, node) = app
        .post(CATEGORIES, json!({ "name": "Comics", "parentId": "" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{node}");
    assert!(node["parentId"].is_null());
}

#[tokio::test]
async fn test_update_recomputes_slug_and_clears_parent() {
    let app = TestApp::new().await;
    let parent = app.create_node(CATEGORIES, json!({ "name": "Audio" })).await;
    let child = app
        .create_node(
            CATEGORIES,
            json!({ "name": "Headphones", "parentId": parent, "seoTitle": "Buy" }),
        )
        .await;

    let (status, node) = app
        .put(&format!("{CATEGORIES}/{child}"), json!({ "name": "Ear Buds" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{node}");
    assert_eq!(node["slug"], "ear-buds");
    assert!(node["parentId"].is_null());
    assert!(node["seoTitle"].is_null());

    let (status, body) = app
        .put(&format!("{CATEGORIES}/424242"), json!({ "name": "Ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6101);
}

#[tokio::test]
async fn test_update_rejects_cycles() {
    let app = TestApp::new().await;
    let a = app.create_node(CATEGORIES, json!({ "name": "A" })).await;
    let b = app
        .create_node(CATEGORIES, json!({ "name": "B", "parentId": a }))
        .await;
    let c = app
        .create_node(CATEGORIES, json!({ "name": "C", "parentId": b }))
        .await;

    let (status, body) = app
        .put(&format!("{CATEGORIES}/{a}"), json!({ "name": "A", "parentId": c }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6105);

    let (status, body) = app
        .put(&format!("{CATEGORIES}/{b}"), json!({ "name": "B", "parentId": b }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6105);

    // Moving a leaf under a sibling branch is fine
    let (status, _) = app
        .put(&format!("{CATEGORIES}/{c}"), json!({ "name": "C", "parentId": a }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_is_nested_sorted_and_counted() {
    let app = TestApp::new().await;
    let root = app.create_node(CATEGORIES, json!({ "name": "Home" })).await;
    let zeta = app
        .create_node(CATEGORIES, json!({ "name": "zeta", "parentId": root }))
        .await;
    let alpha = app
        .create_node(CATEGORIES, json!({ "name": "Alpha", "parentId": root }))
        .await;
    let other = app.create_node(CATEGORIES, json!({ "name": "Garden" })).await;

    let (status, list) = app.get(CATEGORIES).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec![other, root]);

    let home = &list[1];
    assert_eq!(home["_count"]["children"], 2);
    assert_eq!(ids(&home["children"]), vec![alpha, zeta]);
    for child in home["children"].as_array().unwrap() {
        assert_eq!(child["parentId"], root);
    }
}

#[tokio::test]
async fn test_list_respects_depth_but_root_tree_does_not() {
    let app = TestApp::new().await;
    // Default depth is 4 levels; build 6
    let mut parent = app.create_node(CATEGORIES, json!({ "name": "L1" })).await;
    for level in 2..=6 {
        parent = app
            .create_node(
                CATEGORIES,
                json!({ "name": format!("L{level}"), "parentId": parent }),
            )
            .await;
    }

    fn depth(node: &serde_json::Value) -> usize {
        let children = node["children"].as_array().unwrap();
        1 + children.iter().map(depth).max().unwrap_or(0)
    }

    let (_, list) = app.get(CATEGORIES).await;
    assert_eq!(depth(&list[0]), app.state.config.tree_max_depth.clamp(1, 6));

    let (_, tree) = app.get(&format!("{CATEGORIES}/tree/root")).await;
    assert_eq!(depth(&tree[0]), 6);
}

#[tokio::test]
async fn test_detail_includes_parent_children_and_products() {
    let app = TestApp::new().await;
    let parent = app.create_node(CATEGORIES, json!({ "name": "Kitchen" })).await;
    let node = app
        .create_node(CATEGORIES, json!({ "name": "Knives", "parentId": parent }))
        .await;
    let leaf = app
        .create_node(CATEGORIES, json!({ "name": "Chef", "parentId": node }))
        .await;
    let (status, _) = app
        .post(
            "/api/products",
            json!({ "name": "Santoku", "price": 80, "categoryId": node }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, detail) = app.get(&format!("{CATEGORIES}/{node}")).await;
    assert_eq!(status, StatusCode::OK, "{detail}");
    assert_eq!(detail["slug"], "knives");
    assert_eq!(detail["parent"]["id"], parent);
    assert_eq!(ids(&detail["children"]), vec![leaf]);
    assert_eq!(detail["products"][0]["name"], "Santoku");
    assert_eq!(detail["_count"], json!({ "products": 1, "children": 1 }));
}

#[tokio::test]
async fn test_search_tree_products_include_descendants() {
    let app = TestApp::new().await;
    let a = app.create_node(SEARCH_TREE, json!({ "name": "Clothing" })).await;
    let b = app
        .create_node(SEARCH_TREE, json!({ "name": "Shoes", "parentId": a }))
        .await;
    let c = app
        .create_node(SEARCH_TREE, json!({ "name": "Boots", "parentId": b }))
        .await;

    for (name, node) in [("Coat", a), ("Sneaker", b), ("Chelsea", c)] {
        let (status, _) = app
            .post(
                "/api/products",
                json!({ "name": name, "price": 10, "searchTreeId": node }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let names = |list: &serde_json::Value| {
        let mut names: Vec<String> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        names
    };

    let (_, under_a) = app.get(&format!("{SEARCH_TREE}/{a}/products")).await;
    assert_eq!(names(&under_a), vec!["Chelsea", "Coat", "Sneaker"]);
    let (_, under_b) = app.get(&format!("{SEARCH_TREE}/{b}/products")).await;
    assert_eq!(names(&under_b), vec!["Chelsea", "Sneaker"]);
    let (_, under_c) = app.get(&format!("{SEARCH_TREE}/{c}/products")).await;
    assert_eq!(names(&under_c), vec!["Chelsea"]);

    let (status, _) = app.get(&format!("{SEARCH_TREE}/999/products")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_and_search_tree_are_separate() {
    let app = TestApp::new().await;
    let category = app.create_node(CATEGORIES, json!({ "name": "Toys" })).await;

    // Same slug is allowed in the other taxonomy
    let node = app.create_node(SEARCH_TREE, json!({ "name": "Toys" })).await;

    let (_, categories) = app.get(CATEGORIES).await;
    let (_, search_tree) = app.get(SEARCH_TREE).await;
    assert_eq!(ids(&categories), vec![category]);
    assert_eq!(ids(&search_tree), vec![node]);

    let (status, _) = app
        .post(CATEGORIES, json!({ "name": "Dolls", "parentId": node + 100 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_all_succeed() {
    let app = Arc::new(TestApp::new().await);
    let parent = app.create_node(CATEGORIES, json!({ "name": "Parent" })).await;

    let mut tasks = JoinSet::new();
    for i in 0..40 {
        let app = app.clone();
        tasks.spawn(async move {
            app.post(CATEGORIES, json!({ "name": format!("Child {i}"), "parentId": parent }))
                .await
        });
    }
    while let Some(result) = tasks.join_next().await {
        let (status, body) = result.unwrap();
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, detail) = app.get(&format!("{CATEGORIES}/{parent}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["children"].as_array().unwrap().len(), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_racing_product_create_never_orphans() {
    let app = Arc::new(TestApp::new().await);

    for round in 0..10 {
        let category = app
            .create_node(CATEGORIES, json!({ "name": format!("Round {round}") }))
            .await;

        let create = {
            let app = app.clone();
            tokio::spawn(async move {
                app.post(
                    "/api/products",
                    json!({ "name": "Racer", "price": 1.0, "categoryId": category }),
                )
                .await
            })
        };
        let delete = {
            let app = app.clone();
            tokio::spawn(async move { app.delete(&format!("{CATEGORIES}/{category}")).await })
        };
        let (created, created_body) = create.await.unwrap();
        let (deleted, deleted_body) = delete.await.unwrap();

        assert!(!created.is_server_error(), "{created_body}");
        assert!(!deleted.is_server_error(), "{deleted_body}");
        match (deleted, created) {
            (StatusCode::OK, StatusCode::BAD_REQUEST) => {}
            (StatusCode::BAD_REQUEST, StatusCode::OK) => {
                assert_eq!(deleted_body["code"], 6103, "{deleted_body}");
            }
            other => panic!("unexpected outcome {other:?}: {deleted_body} / {created_body}"),
        }
    }
}
