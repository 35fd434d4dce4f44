use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::Value;

use catalog_server::upload::UploadBody;

#[macro_use]
mod common;

const BOUNDARY: &str = "catalog-boundary";

fn multipart(folder: Option<&str>, filename: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(folder) = folder {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"folder\"\r\n\r\n{}\r\n",
                BOUNDARY, folder
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> TestRequest {
    TestRequest::post()
        .uri("/api/upload")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

#[actix_web::test]
async fn image_is_stored_under_folder() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let body = multipart(Some("sliders"), "Banner.PNG", b"not really a png");
    let req = upload_request(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: UploadBody = test::read_body_json(resp).await;
    assert!(body.success);
    assert!(body.url.starts_with("/public/uploads/sliders/"));
    assert!(body.url.ends_with(".png"));

    let relative = body.url.trim_start_matches("/public/uploads/");
    let stored = std::fs::read(dir.path().join(relative)).unwrap();
    assert_eq!(stored, b"not really a png".to_vec());
}

#[actix_web::test]
async fn folder_defaults_to_general() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = upload_request(multipart(None, "cup.jpg", b"jpeg bytes")).to_request();
    let body: UploadBody = test::call_and_read_body_json(&app, req).await;

    assert!(body.url.starts_with("/public/uploads/general/"));
}

#[actix_web::test]
async fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = upload_request(multipart(None, "menu.pdf", b"%PDF")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E4001012");
}

#[actix_web::test]
async fn traversal_folder_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = upload_request(multipart(Some("../etc"), "cup.gif", b"gif")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E4001013");
}

#[actix_web::test]
async fn oversized_image_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let contents = vec![0u8; common::MAX_UPLOAD_BYTES + 1];
    let req = upload_request(multipart(None, "big.png", &contents)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E4001014");
}

#[actix_web::test]
async fn oversized_folder_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let folder = "a".repeat(catalog_server::upload::MAX_FOLDER_BYTES + 1);
    let req = upload_request(multipart(Some(folder.as_str()), "cup.png", b"png")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E4001014");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
