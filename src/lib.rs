use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod branch;
pub mod campaign;
pub mod category;
pub mod config;
pub mod database;
pub mod error;
pub mod faq;
pub mod health;
pub mod notification;
pub mod ordering;
pub mod product;
pub mod progress;
pub mod seed;
pub mod slider;
pub mod story;
pub mod typedid;
pub mod upload;
pub mod user;
pub mod utils;

use config::Config;
use database::{Database, SqliteDatabase};
use error::Error;

/// Registers the extractor error handlers and every endpoint. Application
/// state (`Data<Box<dyn Database>>` and `Data<UploadSettings>`) is left to the
/// caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(health::health)
    .service(category::endpoints::get_categories)
    .service(category::endpoints::create_category)
    .service(category::endpoints::update_category)
    .service(category::endpoints::delete_category)
    .service(product::endpoints::get_products)
    .service(product::endpoints::get_product_by_id)
    .service(product::endpoints::create_product)
    .service(product::endpoints::update_product)
    .service(product::endpoints::delete_product)
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::get_active_campaigns)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::update_campaign)
    .service(campaign::endpoints::delete_campaign)
    .service(progress::endpoints::get_user_progress)
    .service(progress::endpoints::get_user_campaign_progress)
    .service(progress::endpoints::increment_progress)
    .service(progress::endpoints::claim_reward)
    .service(branch::endpoints::get_branches)
    .service(branch::endpoints::create_branch)
    .service(branch::endpoints::update_branch)
    .service(branch::endpoints::delete_branch)
    .service(notification::endpoints::get_notifications)
    .service(notification::endpoints::get_notifications_for_user)
    .service(notification::endpoints::create_notification)
    .service(notification::endpoints::update_notification)
    .service(notification::endpoints::delete_notification)
    .service(notification::endpoints::mark_notification_read)
    .service(notification::endpoints::mark_all_notifications_read)
    .service(slider::endpoints::reorder_sliders)
    .service(slider::endpoints::get_sliders)
    .service(slider::endpoints::create_slider)
    .service(slider::endpoints::update_slider)
    .service(slider::endpoints::delete_slider)
    .service(slider::endpoints::move_slider)
    .service(story::endpoints::reorder_stories)
    .service(story::endpoints::get_stories)
    .service(story::endpoints::create_story)
    .service(story::endpoints::update_story)
    .service(story::endpoints::delete_story)
    .service(story::endpoints::move_story)
    .service(story::endpoints::reorder_story_items)
    .service(story::endpoints::get_story_items)
    .service(story::endpoints::create_story_item)
    .service(story::endpoints::update_story_item)
    .service(story::endpoints::delete_story_item)
    .service(story::endpoints::delete_story_items)
    .service(story::endpoints::move_story_item)
    .service(faq::endpoints::reorder_faqs)
    .service(faq::endpoints::get_faqs)
    .service(faq::endpoints::create_faq)
    .service(faq::endpoints::update_faq)
    .service(faq::endpoints::delete_faq)
    .service(faq::endpoints::move_faq)
    .service(upload::endpoints::upload_image);
}

pub async fn not_found() -> HttpResponse {
    Error::PathNotFound.error_response()
}

/// Opens the database, seeds it if asked to, and serves until shutdown.
pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.database_url);
    let db = SqliteDatabase::connect(&config.database_url).await?;

    if config.seed {
        seed::seed(&db).await?;
    }

    let upload = config.upload.clone();
    info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(Box::new(db.clone()) as Box<dyn Database>))
            .app_data(Data::new(upload.clone()))
            .wrap(TracingLogger::default())
            .configure(configure)
            .default_service(web::to(not_found))
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await?;

    Ok(())
}
