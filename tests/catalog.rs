use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

use catalog_server::category::CategoryBody;
use catalog_server::product::ProductBody;

#[macro_use]
mod common;

#[actix_web::test]
async fn create_category_then_list_it() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({ "name": "Hot Drinks", "is_active": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: CategoryBody = test::read_body_json(resp).await;
    assert_eq!(created.name, "Hot Drinks".to_string());
    assert!(created.is_active);

    let req = TestRequest::get().uri("/api/categories").to_request();
    let categories: Vec<CategoryBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, created.id);
}

#[actix_web::test]
async fn update_missing_category_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::put()
        .uri("/api/categories/999")
        .set_json(json!({ "name": "Hot Drinks" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Category not found");
    assert_eq!(body["code"], "E4041001");
}

#[actix_web::test]
async fn blank_category_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({ "name": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_json_uses_error_format() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::post()
        .uri("/api/categories")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E4001000");
}

#[actix_web::test]
async fn category_with_products_cannot_be_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({ "name": "Desserts" }))
        .to_request();
    let category: CategoryBody = test::call_and_read_body_json(&app, req).await;

    let req = TestRequest::post()
        .uri("/api/products")
        .set_json(json!({
            "name": "Baklava",
            "price": 80,
            "category_id": category.id,
            "ingredients": ["pastry", "pistachio"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: ProductBody = test::read_body_json(resp).await;
    assert_eq!(product.category_name, Some("Desserts".to_string()));

    let req = TestRequest::delete()
        .uri(&format!("/api/categories/{}", category.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri(&format!("/api/products?category_id={}", category.id))
        .to_request();
    let products: Vec<ProductBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(products.len(), 1);
}

#[actix_web::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn unknown_path_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::get().uri("/api/menus").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E4041000");
}
