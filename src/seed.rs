use chrono::{Duration, Utc};
use serde_json::json;

use crate::branch::{self, BranchFields};
use crate::campaign::{self, CampaignFields, CampaignType};
use crate::category::{self, CategoryFields};
use crate::database::Database;
use crate::error::Error;
use crate::faq::{self, FaqFields};
use crate::notification::{self, NotificationFields, NotificationKind, TargetAudience};
use crate::product::{self, ProductFields};
use crate::slider::{self, SliderFields};
use crate::story::{self, StoryFields, StoryItemFields};

/// Fills an empty database with a small sample menu. Does nothing if any
/// category already exists.
#[tracing::instrument(skip(db))]
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    if !category::manager::get_categories(db).await?.is_empty() {
        tracing::info!("database already has data, skipping seed");
        return Ok(());
    }

    let hot_drinks = category::manager::create_category(
        db,
        CategoryFields {
            name: "Hot Drinks".to_string(),
            description: Some("Coffee, tea and everything warm".to_string()),
            image_url: None,
            is_active: true,
        },
    )
    .await?;

    let desserts = category::manager::create_category(
        db,
        CategoryFields {
            name: "Desserts".to_string(),
            description: None,
            image_url: None,
            is_active: true,
        },
    )
    .await?;

    let coffee = product::manager::create_product(
        db,
        ProductFields {
            name: "Turkish Coffee".to_string(),
            description: Some("Brewed slowly in a copper pot".to_string()),
            price: 45.0,
            category_id: Some(hot_drinks.id),
            image_url: None,
            is_popular: true,
            is_available: true,
            ingredients: vec!["coffee".to_string(), "water".to_string()],
        },
    )
    .await?;

    product::manager::create_product(
        db,
        ProductFields {
            name: "Latte".to_string(),
            description: None,
            price: 60.0,
            category_id: Some(hot_drinks.id),
            image_url: None,
            is_popular: false,
            is_available: true,
            ingredients: vec!["espresso".to_string(), "milk".to_string()],
        },
    )
    .await?;

    product::manager::create_product(
        db,
        ProductFields {
            name: "Baklava".to_string(),
            description: None,
            price: 80.0,
            category_id: Some(desserts.id),
            image_url: None,
            is_popular: true,
            is_available: true,
            ingredients: vec![
                "pastry".to_string(),
                "pistachio".to_string(),
                "syrup".to_string(),
            ],
        },
    )
    .await?;

    let now = Utc::now();
    campaign::manager::create_campaign(
        db,
        CampaignFields {
            title: "Ninth Coffee Free".to_string(),
            description: Some("Buy nine coffees and the next one is on us".to_string()),
            image_url: None,
            campaign_type: CampaignType::BuyXGetY,
            required_count: 9,
            reward_count: 1,
            reward_product_id: Some(coffee.id),
            start_date: Some(now),
            end_date: Some(now + Duration::days(90)),
            is_active: true,
        },
    )
    .await?;

    branch::manager::create_branch(
        db,
        BranchFields {
            name: "Central".to_string(),
            address: "1 Market Square".to_string(),
            location: "1 Market Square".to_string(),
            phone: "+90 212 000 00 00".to_string(),
            email: None,
            latitude: 41.0082,
            longitude: 28.9784,
            working_hours: Some(json!({ "weekdays": "08:00-22:00", "weekend": "09:00-23:00" })),
            is_active: true,
        },
    )
    .await?;

    notification::manager::create_notification(
        db,
        NotificationFields {
            user_id: None,
            title: "Welcome".to_string(),
            message: "Our loyalty campaign has started".to_string(),
            kind: NotificationKind::Info,
            target_audience: TargetAudience::All,
            scheduled_for: now,
            expires_at: now + Duration::days(30),
            is_active: true,
        },
    )
    .await?;

    for title in ["Fresh Roasts", "Summer Menu"] {
        slider::manager::create_slider(
            db,
            SliderFields {
                title: title.to_string(),
                description: None,
                image_url: None,
                link_url: None,
                is_active: true,
            },
        )
        .await?;
    }

    let story = story::manager::create_story(
        db,
        StoryFields {
            title: "Behind the Bar".to_string(),
            description: None,
            image_url: None,
            is_active: true,
        },
    )
    .await?;

    for description in ["Grinding the beans", "Pouring the milk"] {
        story::manager::create_story_item(
            db,
            StoryItemFields {
                story_id: story.id,
                image_url: None,
                description: Some(description.to_string()),
                is_active: true,
            },
        )
        .await?;
    }

    let faqs = [
        ("Do you deliver?", "Only from the Central branch for now."),
        ("How does the coffee card work?", "Every coffee counts, the tenth is free."),
    ];
    for (question, answer) in faqs {
        faq::manager::create_faq(
            db,
            FaqFields {
                question: question.to_string(),
                answer: answer.to_string(),
                category: Some("General".to_string()),
                is_active: true,
            },
        )
        .await?;
    }

    tracing::info!("seeded sample data");

    Ok(())
}
