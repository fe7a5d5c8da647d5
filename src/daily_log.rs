//! Adding meals to a calendar date and tracking the day against its goals
//!
//! Every successful mutation is followed by a full resync: the meal catalog
//! is reloaded first (remaining servings change), then the date's entries.
//! Nothing is patched locally. Operations take `&mut self`, so a reload
//! for an old date can never land after a newer one.

use chrono::NaiveDate;
use log::info;
use std::time::Duration;

use nutrition_planner_api::{DailyLogEntry, EntryId, Meal, MealId, NewDailyEntry, NutritionApi, Nutrients};

use crate::aggregate::DayTotals;
use crate::error::{Error, Result};
use crate::goals::{DailyGoals, GoalProgress};
use crate::notify::{Notice, NoticeBoard};

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Remaining-servings status of a meal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Availability {
    /// Meal predates serving tracking
    NotTracked,
    Empty,
    /// One serving or less left
    Low(f64),
    Available(f64),
}

impl Availability {
    pub fn of(meal: &Meal) -> Self {
        match meal.servings_remaining {
            None => Availability::NotTracked,
            Some(remaining) if remaining <= 0.0 => Availability::Empty,
            Some(remaining) if remaining <= 1.0 => Availability::Low(remaining),
            Some(remaining) => Availability::Available(remaining),
        }
    }
}

/// An entry of the meal picker
#[derive(Debug, Clone, PartialEq)]
pub struct MealOption {
    pub meal_id: MealId,
    pub label: String,
    pub disabled: bool,
}

impl MealOption {
    pub fn of(meal: &Meal) -> Self {
        let label = match meal.servings_remaining {
            Some(remaining) if remaining <= 0.0 => format!(
                "{} ({} remaining of {}) - EMPTY",
                meal.meal_name, remaining, meal.servings
            ),
            Some(remaining) => format!(
                "{} ({} remaining of {})",
                meal.meal_name, remaining, meal.servings
            ),
            None => format!("{} ({} servings)", meal.meal_name, meal.servings),
        };
        Self {
            meal_id: meal.meal_id,
            label,
            disabled: meal.is_exhausted(),
        }
    }
}

/// Preview of the selected meal
#[derive(Debug, Clone, PartialEq)]
pub struct MealPreview {
    pub meal_name: String,
    pub per_serving: Nutrients,
    pub servings: f64,
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub entry_id: EntryId,
    pub meal_name: String,
    pub servings: f64,
    pub consumed: Nutrients,
}

/// Everything a front end needs to draw one day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLogView {
    pub date: NaiveDate,
    pub options: Vec<MealOption>,
    pub preview: Option<MealPreview>,
    pub can_add: bool,
    pub rows: Vec<EntryRow>,
    pub totals: DayTotals,
    pub progress: Vec<GoalProgress>,
    pub notice: Option<Notice>,
}

/// Daily nutrition controller
pub struct DailyLog<A> {
    api: A,
    date: NaiveDate,
    meals: Vec<Meal>,
    entries: Vec<DailyLogEntry>,
    selected: Option<MealId>,
    goals: DailyGoals,
    notices: NoticeBoard,
}

impl<A: NutritionApi> DailyLog<A> {
    pub fn new(api: A, date: NaiveDate, notice_ttl: Duration) -> Self {
        Self {
            api,
            date,
            meals: Vec::new(),
            entries: Vec::new(),
            selected: None,
            goals: DailyGoals::default(),
            notices: NoticeBoard::new(notice_ttl),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn entries(&self) -> &[DailyLogEntry] {
        &self.entries
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn selected_meal(&self) -> Option<&Meal> {
        let id = self.selected?;
        self.meals.iter().find(|m| m.meal_id == id)
    }

    /// Reload the meal catalog
    pub async fn load_meals(&mut self) -> Result<()> {
        match self.api.list_meals().await {
            Ok(meals) => {
                self.meals = meals;
                // a selection that vanished from the catalog is dropped
                if self.selected_meal().is_none() {
                    self.selected = None;
                }
                Ok(())
            }
            Err(e) => Err(self.fail("loading meals", e.into())),
        }
    }

    /// Reload the meal catalog, announcing start and completion
    pub async fn refresh_meals(&mut self) -> Result<()> {
        self.notices.info("Refreshing meals...");
        self.load_meals().await?;
        self.notices.success("Meals refreshed successfully!");
        Ok(())
    }

    /// Reload the entries of the current date
    pub async fn load_entries(&mut self) -> Result<()> {
        match self.api.daily_entries(self.date).await {
            Ok(entries) => {
                self.entries = entries;
                Ok(())
            }
            Err(e) => Err(self.fail("loading daily nutrition", e.into())),
        }
    }

    /// Reload meals, then entries. Both are attempted; the last failure is
    /// returned, matching the notice left on the board.
    pub async fn resync(&mut self) -> Result<()> {
        let meals = self.load_meals().await;
        let entries = self.load_entries().await;
        entries.and(meals)
    }

    /// Switch to `date` and load its entries. Returns `false` if the date
    /// did not change. On failure the previous date and entries are kept.
    pub async fn change_date(&mut self, date: NaiveDate) -> Result<bool> {
        if date == self.date {
            return Ok(false);
        }
        match self.api.daily_entries(date).await {
            Ok(entries) => {
                self.date = date;
                self.entries = entries;
                Ok(true)
            }
            Err(e) => Err(self.fail("loading daily nutrition", e.into())),
        }
    }

    /// Pick the meal to add; `None` clears the selection
    pub fn select_meal(&mut self, meal_id: Option<MealId>) -> Result<()> {
        let Some(meal_id) = meal_id else {
            self.selected = None;
            return Ok(());
        };

        let outcome = match self.meals.iter().find(|m| m.meal_id == meal_id) {
            None => Err(Error::validation(format!("Unknown meal: {}", meal_id))),
            Some(meal) if meal.is_exhausted() => Err(Error::validation(format!(
                "\"{}\" has no servings remaining",
                meal.meal_name
            ))),
            Some(_) => Ok(()),
        };

        match outcome {
            Ok(()) => {
                self.selected = Some(meal_id);
                Ok(())
            }
            Err(e) => {
                self.selected = None;
                Err(self.fail("selecting meal", e))
            }
        }
    }

    /// Log `servings` of the selected meal on the current date
    pub async fn add_meal_to_day(&mut self, servings: f64) -> Result<()> {
        let meal = self
            .check_add(servings)
            .map_err(|e| self.fail("adding meal", e))?;

        let request = NewDailyEntry {
            meal_id: meal.meal_id,
            servings,
        };
        if let Err(e) = self.api.add_daily_entry(self.date, &request).await {
            return Err(self.fail("adding meal", e.into()));
        }

        info!(
            "Added {} serving(s) of meal {} to {}",
            servings, meal.meal_id, self.date
        );
        self.notices.success(format!(
            "Added {} serving(s) of \"{}\" to {}",
            servings, meal.meal_name, self.date
        ));
        self.selected = None;
        self.resync().await
    }

    fn check_add(&self, servings: f64) -> Result<Meal> {
        let meal = self
            .selected_meal()
            .ok_or_else(|| Error::validation("Please select a meal first"))?;

        if !servings.is_finite() || servings <= 0.0 {
            return Err(Error::validation("Servings must be greater than 0"));
        }
        if !meal.can_serve(servings) {
            return Err(Error::validation(format!(
                "Not enough servings available. Requested: {}, Available: {}",
                servings,
                meal.servings_remaining.unwrap_or_default()
            )));
        }
        Ok(meal.clone())
    }

    /// Remove one entry after confirmation. Returns `false` if declined.
    pub async fn remove_entry<C: Confirm + ?Sized>(
        &mut self,
        entry_id: EntryId,
        confirm: &C,
    ) -> Result<bool> {
        if !confirm.confirm("Are you sure you want to remove this meal from today?") {
            return Ok(false);
        }

        if let Err(e) = self.api.remove_daily_entry(self.date, entry_id).await {
            return Err(self.fail("removing meal", e.into()));
        }

        info!("Removed entry {} from {}", entry_id, self.date);
        self.notices.info("Meal removed from daily nutrition");
        self.resync().await?;
        Ok(true)
    }

    /// Remove every entry of the current date after confirmation
    pub async fn clear_day<C: Confirm + ?Sized>(&mut self, confirm: &C) -> Result<bool> {
        let prompt = format!("Are you sure you want to clear ALL meals from {}?", self.date);
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        if let Err(e) = self.api.clear_daily_entries(self.date).await {
            return Err(self.fail("clearing day", e.into()));
        }

        info!("Cleared {}", self.date);
        self.notices.info(format!("Cleared all meals for {}", self.date));
        self.resync().await?;
        Ok(true)
    }

    pub fn totals(&self) -> DayTotals {
        DayTotals::from_entries(&self.entries)
    }

    pub fn view(&self) -> DailyLogView {
        let totals = self.totals();
        let preview = self.selected_meal().map(|meal| MealPreview {
            meal_name: meal.meal_name.clone(),
            per_serving: meal.per_serving(),
            servings: meal.servings,
            availability: Availability::of(meal),
        });

        DailyLogView {
            date: self.date,
            options: self.meals.iter().map(MealOption::of).collect(),
            can_add: preview.is_some(),
            preview,
            rows: self
                .entries
                .iter()
                .map(|entry| EntryRow {
                    entry_id: entry.entry_id,
                    meal_name: entry.meal_name.clone(),
                    servings: entry.servings_consumed,
                    consumed: entry.consumed(),
                })
                .collect(),
            progress: self.goals.progress(&totals.nutrients),
            totals,
            notice: self.notices.current().cloned(),
        }
    }

    fn fail(&mut self, action: &str, err: Error) -> Error {
        self.notices.report(action, &err);
        err
    }
}
