//! Nutrition planner REST client for Rust
//!
//! This crate provides typed access to the meal, ingredient, nutrition
//! calculation and daily log endpoints of the nutrition planner API.

pub mod fetch;
pub mod models;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::fetch::Fetch;
pub use crate::models::{
    ComposedIngredientLine, DailyLogEntry, EntryId, Ingredient, Meal, MealId, NewDailyEntry,
    NewMeal, Nutrients, NutritionRequest,
};

/// Result type
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response carrying an `{error}` body; displays the server text verbatim
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// Non-2xx response without a usable body
    #[error("HTTP error! status: {}", .status.as_u16())]
    Http { status: StatusCode },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Ingredient not found: {0}")]
    UnknownIngredient(String),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api { status, .. } | ApiError::Http { status } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }
}

/// Operations offered by the nutrition planner API.
///
/// Controllers are written against this trait rather than the HTTP client.
#[async_trait]
pub trait NutritionApi: Send + Sync {
    /// `GET /api/meals`
    async fn list_meals(&self) -> Result<Vec<Meal>>;

    /// `POST /api/meals`
    async fn create_meal(&self, meal: &NewMeal) -> Result<Value>;

    /// `GET /api/ingredients`
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>>;

    /// `POST /api/calculate-nutrition`
    async fn calculate_nutrition(&self, request: &NutritionRequest)
        -> Result<ComposedIngredientLine>;

    /// `GET /api/daily-nutrition/{date}`
    async fn daily_entries(&self, date: NaiveDate) -> Result<Vec<DailyLogEntry>>;

    /// `POST /api/daily-nutrition/{date}`
    async fn add_daily_entry(&self, date: NaiveDate, entry: &NewDailyEntry) -> Result<Value>;

    /// `DELETE /api/daily-nutrition/{date}/entry/{entry_id}`
    async fn remove_daily_entry(&self, date: NaiveDate, entry_id: EntryId) -> Result<()>;

    /// `DELETE /api/daily-nutrition/{date}`
    async fn clear_daily_entries(&self, date: NaiveDate) -> Result<()>;
}

/// HTTP implementation of [`NutritionApi`]
#[derive(Debug, Clone)]
pub struct NutritionClient {
    base_url: Url,
    http_client: Client,
}

impl NutritionClient {
    /// Create a client rooted at `base_url` (the API lives under `/api`)
    pub fn new(base_url: &str, http_client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::UrlParse(url::ParseError::EmptyHost))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn daily_endpoint(&self, date: NaiveDate, tail: &[&str]) -> Result<Url> {
        let date = date.format("%Y-%m-%d").to_string();
        let mut segments = vec!["daily-nutrition", date.as_str()];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }
}

#[async_trait]
impl NutritionApi for NutritionClient {
    async fn list_meals(&self) -> Result<Vec<Meal>> {
        let meals: Vec<Meal> = Fetch::get(&self.http_client, self.endpoint(&["meals"])?)
            .execute()
            .await?;
        debug!("Loaded {} meals", meals.len());
        Ok(meals)
    }

    async fn create_meal(&self, meal: &NewMeal) -> Result<Value> {
        Fetch::post(&self.http_client, self.endpoint(&["meals"])?)
            .json(meal)?
            .execute()
            .await
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        let ingredients: Vec<Ingredient> =
            Fetch::get(&self.http_client, self.endpoint(&["ingredients"])?)
                .execute()
                .await?;
        debug!("Loaded {} ingredients", ingredients.len());
        Ok(ingredients)
    }

    async fn calculate_nutrition(
        &self,
        request: &NutritionRequest,
    ) -> Result<ComposedIngredientLine> {
        let line: ComposedIngredientLine =
            Fetch::post(&self.http_client, self.endpoint(&["calculate-nutrition"])?)
                .json(request)?
                .execute()
                .await?;

        // the server answers `{}` for names it does not know
        if line.name.is_empty() {
            return Err(ApiError::UnknownIngredient(request.name.clone()));
        }
        Ok(line)
    }

    async fn daily_entries(&self, date: NaiveDate) -> Result<Vec<DailyLogEntry>> {
        let entries: Vec<DailyLogEntry> =
            Fetch::get(&self.http_client, self.daily_endpoint(date, &[])?)
                .execute()
                .await?;
        debug!("Loaded {} entries for {}", entries.len(), date);
        Ok(entries)
    }

    async fn add_daily_entry(&self, date: NaiveDate, entry: &NewDailyEntry) -> Result<Value> {
        Fetch::post(&self.http_client, self.daily_endpoint(date, &[])?)
            .json(entry)?
            .execute()
            .await
    }

    async fn remove_daily_entry(&self, date: NaiveDate, entry_id: EntryId) -> Result<()> {
        let entry_id = entry_id.to_string();
        Fetch::delete(
            &self.http_client,
            self.daily_endpoint(date, &["entry", entry_id.as_str()])?,
        )
        .execute_empty()
        .await
    }

    async fn clear_daily_entries(&self, date: NaiveDate) -> Result<()> {
        Fetch::delete(&self.http_client, self.daily_endpoint(date, &[])?)
            .execute_empty()
            .await
    }
}
