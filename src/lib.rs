//! Nutrition Planner Client Library
//!
//! Meal composition and daily nutrition tracking on top of the nutrition
//! planner REST API. Controllers keep their state explicitly and expose typed
//! views; rendering those views is left to the caller (see [`render`]).

pub mod aggregate;
pub mod config;
pub mod daily_log;
pub mod error;
pub mod goals;
pub mod meal_builder;
pub mod notify;
pub mod render;

use chrono::NaiveDate;

use crate::config::{ClientOptions, PlannerConfig};
use crate::daily_log::DailyLog;
use crate::error::Result;
use crate::meal_builder::MealBuilder;

pub use nutrition_planner_api as api;
use nutrition_planner_api::NutritionClient;

/// The main entry point for the planner client
pub struct Planner {
    /// Resolved configuration
    pub config: PlannerConfig,
    /// HTTP client for the nutrition API
    pub api: NutritionClient,
}

impl Planner {
    /// Create a new planner client
    ///
    /// # Example
    ///
    /// ```
    /// use nutrition_planner::Planner;
    ///
    /// let planner = Planner::new("http://localhost:5000").unwrap();
    /// ```
    pub fn new(api_url: &str) -> Result<Self> {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Create a new planner client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use nutrition_planner::{Planner, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_notice_ttl(Duration::from_secs(10));
    /// let planner = Planner::new_with_options("http://localhost:5000", options).unwrap();
    /// ```
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Result<Self> {
        Self::from_config(PlannerConfig::new(api_url, options)?)
    }

    pub fn from_config(config: PlannerConfig) -> Result<Self> {
        let api = config.api_client()?;
        Ok(Self { config, api })
    }

    /// Start composing a new meal
    pub fn meal_builder(&self) -> MealBuilder<NutritionClient> {
        MealBuilder::new(self.api.clone(), self.config.options.notice_ttl)
    }

    /// Open the daily log for `date`
    pub fn daily_log(&self, date: NaiveDate) -> DailyLog<NutritionClient> {
        DailyLog::new(self.api.clone(), date, self.config.options.notice_ttl)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, PlannerConfig};
    pub use crate::daily_log::{Confirm, DailyLog};
    pub use crate::error::{Error, Result};
    pub use crate::meal_builder::{MealBuilder, MealDraft};
    pub use crate::Planner;
    pub use nutrition_planner_api::{NutritionApi, NutritionClient};
}
