use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

use catalog_server::campaign::CampaignBody;
use catalog_server::progress::{ClaimRewardBody, ProgressBody, ProgressState};

#[macro_use]
mod common;

#[actix_web::test]
async fn coffee_card_flow() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::post()
        .uri("/api/campaigns")
        .set_json(json!({
            "title": "Tenth Coffee Free",
            "campaign_type": "buy_x_get_y",
            "required_count": 3,
            "reward_count": 1,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let campaign: CampaignBody = test::read_body_json(resp).await;

    let progress_uri = format!("/api/user-campaign-progress/ayse/{}", campaign.id);

    let req = TestRequest::get().uri(&progress_uri).to_request();
    let progress: ProgressBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(progress.current_count, 0);
    assert_eq!(progress.state, ProgressState::NotStarted);

    let req = TestRequest::post()
        .uri(&format!("{}/claim-reward", progress_uri))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Campaign not completed yet");

    for expected in 1..=3 {
        let req = TestRequest::post()
            .uri(&format!("{}/increment", progress_uri))
            .to_request();
        let progress: ProgressBody = test::call_and_read_body_json(&app, req).await;
        assert_eq!(progress.current_count, expected);
    }

    let req = TestRequest::post()
        .uri(&format!("{}/increment", progress_uri))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Campaign already completed");

    let req = TestRequest::post()
        .uri(&format!("{}/claim-reward", progress_uri))
        .to_request();
    let claimed: ClaimRewardBody = test::call_and_read_body_json(&app, req).await;
    assert!(claimed.success);
    assert_eq!(claimed.reward.count, 1);
    assert_eq!(claimed.progress.state, ProgressState::Rewarded);
    assert!(claimed.progress.reward_claimed_at.is_some());

    let req = TestRequest::post()
        .uri(&format!("{}/claim-reward", progress_uri))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri("/api/user-campaign-progress/ayse")
        .to_request();
    let entries: Vec<ProgressBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].campaign.id, campaign.id);
}

#[actix_web::test]
async fn active_campaigns_route_is_not_an_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::post()
        .uri("/api/campaigns")
        .set_json(json!({ "title": "Paused", "is_active": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = TestRequest::get().uri("/api/campaigns/active").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let active: Vec<CampaignBody> = test::read_body_json(resp).await;
    assert!(active.is_empty());
}

#[actix_web::test]
async fn increment_unknown_campaign_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = catalog_app!(dir.path());

    let req = TestRequest::post()
        .uri("/api/user-campaign-progress/ayse/77/increment")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
