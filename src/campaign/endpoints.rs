use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::product::ProductId;
use crate::utils::{default_true, optional_text, require_text, MessageBody};

use super::{manager, Campaign, CampaignFields, CampaignId, CampaignType};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveCampaignBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub campaign_type: CampaignType,
    pub required_count: Option<i32>,
    pub reward_count: Option<i32>,
    pub reward_product_id: Option<ProductId>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveCampaignBody {
    fn into_fields(self) -> Result<CampaignFields, Error> {
        let required_count = self.required_count.unwrap_or(1);
        if required_count <= 0 {
            return Err(Error::InvalidField {
                field: "required_count",
                reason: "must be greater than zero",
            });
        }

        let reward_count = self.reward_count.unwrap_or(1);
        if reward_count < 0 {
            return Err(Error::InvalidField {
                field: "reward_count",
                reason: "must not be negative",
            });
        }

        Ok(CampaignFields {
            title: require_text("title", self.title)?,
            description: optional_text(self.description),
            image_url: optional_text(self.image_url),
            campaign_type: self.campaign_type,
            required_count,
            reward_count,
            reward_product_id: self.reward_product_id,
            start_date: parse_date("start_date", self.start_date, NaiveTime::MIN)?,
            end_date: parse_date(
                "end_date",
                self.end_date,
                NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
            )?,
            is_active: self.is_active,
        })
    }
}

/// Accepts either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which
/// is taken at `time_of_day` UTC.
fn parse_date(
    field: &'static str,
    value: Option<String>,
    time_of_day: NaiveTime,
) -> Result<Option<DateTime<Utc>>, Error> {
    let value = match optional_text(value) {
        Some(value) => value,
        None => return Ok(None),
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(|date| Some(date.and_time(time_of_day).and_utc()))
        .map_err(|_| Error::InvalidField {
            field,
            reason: "must be a date (YYYY-MM-DD) or an RFC 3339 timestamp",
        })
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub campaign_type: CampaignType,
    pub required_count: i32,
    pub reward_count: i32,
    pub reward_product_id: Option<ProductId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            title: campaign.title,
            description: campaign.description,
            image_url: campaign.image_url,
            campaign_type: campaign.campaign_type,
            required_count: campaign.required_count,
            reward_count: campaign.reward_count,
            reward_product_id: campaign.reward_product_id,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            is_active: campaign.is_active,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        }
    }
}

#[get("/api/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: Data<Box<dyn Database>>) -> Result<Json<Vec<CampaignBody>>, Error> {
    let campaigns = manager::get_campaigns(&***db).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[get("/api/campaigns/active")]
#[tracing::instrument(skip(db))]
pub async fn get_active_campaigns(
    db: Data<Box<dyn Database>>,
) -> Result<Json<Vec<CampaignBody>>, Error> {
    let campaigns = manager::get_active_campaigns(&***db).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[get("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[post("/api/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<SaveCampaignBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let campaign = manager::create_campaign(&***db, fields).await?;

    Ok(HttpResponse::Created().json(CampaignBody::render(campaign)))
}

#[put("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<SaveCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let campaign = manager::update_campaign(&***db, campaign_id, fields).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[delete("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<MessageBody>, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(&***db, campaign_id).await?;

    Ok(Json(MessageBody::new("Campaign deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dates_cover_the_whole_day() {
        let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap();

        let start = parse_date("start_date", Some("2026-03-01".into()), NaiveTime::MIN)
            .unwrap()
            .unwrap();
        let finish = parse_date("end_date", Some("2026-03-01".into()), end)
            .unwrap()
            .unwrap();

        assert_eq!(start.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert_eq!(finish.to_rfc3339(), "2026-03-01T23:59:59+00:00");
    }

    #[test]
    fn timestamps_and_blanks_are_accepted() {
        let parsed = parse_date("start_date", Some("2026-03-01T10:30:00+03:00".into()), NaiveTime::MIN)
            .unwrap()
            .unwrap();

        assert_eq!(parsed.to_rfc3339(), "2026-03-01T07:30:00+00:00");
        assert_eq!(parse_date("start_date", Some(" ".into()), NaiveTime::MIN), Ok(None));
    }

    #[test]
    fn unparseable_dates_are_rejected() {
        assert!(matches!(
            parse_date("end_date", Some("next week".into()), NaiveTime::MIN),
            Err(Error::InvalidField { field: "end_date", .. })
        ));
    }
}
