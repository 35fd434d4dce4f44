#![allow(dead_code)]

use std::path::Path;

use catalog_server::config::UploadSettings;

pub const MAX_UPLOAD_BYTES: usize = 1024;

pub fn upload_settings(root: &Path) -> UploadSettings {
    UploadSettings {
        root: root.to_path_buf(),
        max_bytes: MAX_UPLOAD_BYTES,
    }
}

/// Builds the full application around an in-memory database.
macro_rules! catalog_app {
    ($upload_root:expr) => {{
        let db = catalog_server::database::SqliteDatabase::in_memory()
            .await
            .unwrap();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(
                    Box::new(db) as Box<dyn catalog_server::database::Database>
                ))
                .app_data(actix_web::web::Data::new(common::upload_settings(
                    $upload_root,
                )))
                .configure(catalog_server::configure)
                .default_service(actix_web::web::to(catalog_server::not_found)),
        )
        .await
    }};
}
