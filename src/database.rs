use std::marker::PhantomData;
use std::str::FromStr;
use std::time::Duration;

use derivative::Derivative;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::branch::db::BranchStore;
use crate::branch::Branch;
use crate::campaign::db::CampaignStore;
use crate::campaign::Campaign;
use crate::category::db::CategoryStore;
use crate::category::Category;
use crate::error::Error;
use crate::faq::db::FaqStore;
use crate::faq::Faq;
use crate::notification::db::NotificationStore;
use crate::notification::Notification;
use crate::product::db::ProductStore;
use crate::product::Product;
use crate::progress::db::ProgressStore;
use crate::progress::CampaignProgress;
use crate::slider::db::SliderStore;
use crate::slider::Slider;
use crate::story::db::StoryStore;
use crate::story::Story;

pub trait Database: Send + Sync {
    fn categories(&self) -> &dyn CategoryStore;
    fn products(&self) -> &dyn ProductStore;
    fn campaigns(&self) -> &dyn CampaignStore;
    fn progress(&self) -> &dyn ProgressStore;
    fn branches(&self) -> &dyn BranchStore;
    fn notifications(&self) -> &dyn NotificationStore;
    fn sliders(&self) -> &dyn SliderStore;
    fn stories(&self) -> &dyn StoryStore;
    fn faqs(&self) -> &dyn FaqStore;
}

/// Handle on the table that stores `T`.
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = ""))]
pub struct Table<T> {
    pool: SqlitePool,
    #[derivative(Debug = "ignore")]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Table<T> {
    fn new(pool: SqlitePool) -> Table<T> {
        Table {
            pool,
            _marker: PhantomData,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

pub type SqliteCategoryStore = Table<Category>;
pub type SqliteProductStore = Table<Product>;
pub type SqliteCampaignStore = Table<Campaign>;
pub type SqliteProgressStore = Table<CampaignProgress>;
pub type SqliteBranchStore = Table<Branch>;
pub type SqliteNotificationStore = Table<Notification>;
pub type SqliteSliderStore = Table<Slider>;
pub type SqliteStoryStore = Table<Story>;
pub type SqliteFaqStore = Table<Faq>;

#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    categories: SqliteCategoryStore,
    products: SqliteProductStore,
    campaigns: SqliteCampaignStore,
    progress: SqliteProgressStore,
    branches: SqliteBranchStore,
    notifications: SqliteNotificationStore,
    sliders: SqliteSliderStore,
    stories: SqliteStoryStore,
    faqs: SqliteFaqStore,
}

impl SqliteDatabase {
    pub fn new(pool: SqlitePool) -> SqliteDatabase {
        SqliteDatabase {
            categories: Table::new(pool.clone()),
            products: Table::new(pool.clone()),
            campaigns: Table::new(pool.clone()),
            progress: Table::new(pool.clone()),
            branches: Table::new(pool.clone()),
            notifications: Table::new(pool.clone()),
            sliders: Table::new(pool.clone()),
            stories: Table::new(pool.clone()),
            faqs: Table::new(pool),
        }
    }

    /// Opens (creating if needed) the database at `url` and brings its schema
    /// up to date.
    #[tracing::instrument]
    pub async fn connect(url: &str) -> Result<SqliteDatabase, Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        SqliteDatabase::initialize(pool).await
    }

    /// A private, migrated database that lives as long as the returned value.
    ///
    /// The pool is pinned to one connection since every sqlite memory
    /// connection would otherwise see its own empty database.
    pub async fn in_memory() -> Result<SqliteDatabase, Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        SqliteDatabase::initialize(pool).await
    }

    async fn initialize(pool: SqlitePool) -> Result<SqliteDatabase, Error> {
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(SqliteDatabase::new(pool))
    }
}

impl Database for SqliteDatabase {
    fn categories(&self) -> &dyn CategoryStore {
        &self.categories
    }

    fn products(&self) -> &dyn ProductStore {
        &self.products
    }

    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn progress(&self) -> &dyn ProgressStore {
        &self.progress
    }

    fn branches(&self) -> &dyn BranchStore {
        &self.branches
    }

    fn notifications(&self) -> &dyn NotificationStore {
        &self.notifications
    }

    fn sliders(&self) -> &dyn SliderStore {
        &self.sliders
    }

    fn stories(&self) -> &dyn StoryStore {
        &self.stories
    }

    fn faqs(&self) -> &dyn FaqStore {
        &self.faqs
    }
}
