use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_multipart::MultipartError;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use serde::{Serialize, Serializer};
use sqlx::migrate::MigrateError;
use sqlx::Error as DatabaseError;

use crate::branch::BranchId;
use crate::campaign::CampaignId;
use crate::category::CategoryId;
use crate::faq::FaqId;
use crate::notification::NotificationId;
use crate::ordering::OrderingError;
use crate::product::ProductId;
use crate::slider::SliderId;
use crate::story::{StoryId, StoryItemId};
use crate::user::UserId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    #[serde(serialize_with = "display")]
    InvalidMultipart(#[derivative(PartialEq = "ignore")] MultipartError),
    MissingField {
        field: &'static str,
    },
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    InvalidOrdering {
        reason: OrderingError,
    },
    CategoryHasProducts {
        category_id: CategoryId,
        product_count: i64,
    },
    CampaignAlreadyCompleted {
        user_id: UserId,
        campaign_id: CampaignId,
    },
    CampaignNotCompleted {
        user_id: UserId,
        campaign_id: CampaignId,
        current_count: i32,
        required_count: i32,
    },
    RewardAlreadyClaimed {
        user_id: UserId,
        campaign_id: CampaignId,
    },
    MissingUploadFile,
    UnsupportedFileType {
        filename: String,
    },
    InvalidUploadFolder {
        folder: String,
    },
    UploadTooLarge {
        max_bytes: usize,
    },

    // 404
    PathNotFound,
    CategoryNotFound {
        category_id: CategoryId,
    },
    ProductNotFound {
        product_id: ProductId,
    },
    CampaignNotFound {
        campaign_id: CampaignId,
    },
    ProgressNotFound {
        user_id: UserId,
        campaign_id: CampaignId,
    },
    BranchNotFound {
        branch_id: BranchId,
    },
    NotificationNotFound {
        notification_id: NotificationId,
    },
    SliderNotFound {
        slider_id: SliderId,
    },
    StoryNotFound {
        story_id: StoryId,
    },
    StoryItemNotFound {
        story_item_id: StoryItemId,
    },
    FaqNotFound {
        faq_id: FaqId,
    },

    // 500
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedMigration(#[derivative(PartialEq = "ignore")] MigrateError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
    InvalidConfig {
        key: &'static str,
        value: String,
    },
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidQuery(_) => "E4001002",
            Error::InvalidMultipart(_) => "E4001003",
            Error::MissingField { .. } => "E4001004",
            Error::InvalidField { .. } => "E4001005",
            Error::InvalidOrdering { .. } => "E4001006",
            Error::CategoryHasProducts { .. } => "E4001007",
            Error::CampaignAlreadyCompleted { .. } => "E4001008",
            Error::CampaignNotCompleted { .. } => "E4001009",
            Error::RewardAlreadyClaimed { .. } => "E4001010",
            Error::MissingUploadFile => "E4001011",
            Error::UnsupportedFileType { .. } => "E4001012",
            Error::InvalidUploadFolder { .. } => "E4001013",
            Error::UploadTooLarge { .. } => "E4001014",
            Error::PathNotFound => "E4041000",
            Error::CategoryNotFound { .. } => "E4041001",
            Error::ProductNotFound { .. } => "E4041002",
            Error::CampaignNotFound { .. } => "E4041003",
            Error::ProgressNotFound { .. } => "E4041004",
            Error::BranchNotFound { .. } => "E4041005",
            Error::NotificationNotFound { .. } => "E4041006",
            Error::SliderNotFound { .. } => "E4041007",
            Error::StoryNotFound { .. } => "E4041008",
            Error::StoryItemNotFound { .. } => "E4041009",
            Error::FaqNotFound { .. } => "E4041010",
            Error::FailedDatabaseCall(_) => "E5001000",
            Error::FailedMigration(_) => "E5001001",
            Error::IoError(_) => "E5001002",
            Error::InvalidConfig { .. } => "E5001003",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::InvalidMultipart(_) => "The given multipart form could not be parsed",
            Error::MissingField { .. } => "A required field is missing",
            Error::InvalidField { .. } => "A field has an invalid value",
            Error::InvalidOrdering { .. } => "The given order is not a permutation of the list",
            Error::CategoryHasProducts { .. } => {
                "The category still has products; delete them first"
            }
            Error::CampaignAlreadyCompleted { .. } => "Campaign already completed",
            Error::CampaignNotCompleted { .. } => "Campaign not completed yet",
            Error::RewardAlreadyClaimed { .. } => "Reward already claimed",
            Error::MissingUploadFile => "No file was received in the image field",
            Error::UnsupportedFileType { .. } => "Only jpg, jpeg, png and gif images can be uploaded",
            Error::InvalidUploadFolder { .. } => "The upload folder name is not allowed",
            Error::UploadTooLarge { .. } => "The uploaded file is too large",
            Error::PathNotFound => "The requested path was not found",
            Error::CategoryNotFound { .. } => "Category not found",
            Error::ProductNotFound { .. } => "Product not found",
            Error::CampaignNotFound { .. } => "Campaign not found",
            Error::ProgressNotFound { .. } => "Campaign progress not found",
            Error::BranchNotFound { .. } => "Branch not found",
            Error::NotificationNotFound { .. } => "Notification not found",
            Error::SliderNotFound { .. } => "Slider not found",
            Error::StoryNotFound { .. } => "Story not found",
            Error::StoryItemNotFound { .. } => "Story item not found",
            Error::FaqNotFound { .. } => "FAQ not found",
            Error::FailedDatabaseCall(_) => "Internal server error",
            Error::FailedMigration(_) => "Internal server error",
            Error::IoError(_) => "Internal server error",
            Error::InvalidConfig { .. } => "Internal server error",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::InvalidMultipart(_) => StatusCode::BAD_REQUEST,
            Error::MissingField { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidField { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidOrdering { .. } => StatusCode::BAD_REQUEST,
            Error::CategoryHasProducts { .. } => StatusCode::BAD_REQUEST,
            Error::CampaignAlreadyCompleted { .. } => StatusCode::BAD_REQUEST,
            Error::CampaignNotCompleted { .. } => StatusCode::BAD_REQUEST,
            Error::RewardAlreadyClaimed { .. } => StatusCode::BAD_REQUEST,
            Error::MissingUploadFile => StatusCode::BAD_REQUEST,
            Error::UnsupportedFileType { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidUploadFolder { .. } => StatusCode::BAD_REQUEST,
            Error::UploadTooLarge { .. } => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CategoryNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ProgressNotFound { .. } => StatusCode::NOT_FOUND,
            Error::BranchNotFound { .. } => StatusCode::NOT_FOUND,
            Error::NotificationNotFound { .. } => StatusCode::NOT_FOUND,
            Error::SliderNotFound { .. } => StatusCode::NOT_FOUND,
            Error::StoryNotFound { .. } => StatusCode::NOT_FOUND,
            Error::StoryItemNotFound { .. } => StatusCode::NOT_FOUND,
            Error::FaqNotFound { .. } => StatusCode::NOT_FOUND,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedMigration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidConfig { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error: &'static str,
            code: &'static str,
            details: &'a Error,
        }

        if self.status_code().is_server_error() {
            tracing::error!(code = self.error_code(), "request failed: {}", self);
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            error: self.error_message(),
            code: self.error_code(),
            details: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<MigrateError> for Error {
    fn from(error: MigrateError) -> Error {
        Error::FailedMigration(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl From<MultipartError> for Error {
    fn from(error: MultipartError) -> Error {
        Error::InvalidMultipart(error)
    }
}

impl From<OrderingError> for Error {
    fn from(reason: OrderingError) -> Error {
        Error::InvalidOrdering { reason }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::InvalidMultipart(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedMigration(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
