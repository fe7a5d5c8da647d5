//! Composing a meal from ingredients and saving it
//!
//! [`MealDraft`] is the plain state of the meal under construction. Its totals
//! are always recomputed from the lines. [`MealBuilder`] drives a draft
//! against a [`NutritionApi`] and records the outcome of every action on its
//! notice board.

use log::info;
use serde_json::Value;
use std::time::Duration;

use nutrition_planner_api::{
    ComposedIngredientLine, Ingredient, NewMeal, NutritionApi, NutritionRequest, Nutrients,
};

use crate::aggregate;
use crate::error::{Error, Result};
use crate::notify::{Notice, NoticeBoard};

/// Where the draft is in its lifecycle. A successful save clears the draft,
/// so a saved meal is observed as `Empty` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionState {
    Empty,
    Composing,
}

/// The meal under construction
#[derive(Debug, Clone, PartialEq)]
pub struct MealDraft {
    lines: Vec<ComposedIngredientLine>,
    name: String,
    servings: u32,
}

impl Default for MealDraft {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            name: String::new(),
            servings: 1,
        }
    }
}

impl MealDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CompositionState {
        if self.lines.is_empty() {
            CompositionState::Empty
        } else {
            CompositionState::Composing
        }
    }

    pub fn lines(&self) -> &[ComposedIngredientLine] {
        &self.lines
    }

    pub fn push(&mut self, line: ComposedIngredientLine) {
        self.lines.push(line);
    }

    /// Remove the line at `index`, keeping the order of the others
    pub fn remove(&mut self, index: usize) -> Result<ComposedIngredientLine> {
        if index >= self.lines.len() {
            return Err(Error::validation(format!(
                "No ingredient at position {} (meal has {})",
                index,
                self.lines.len()
            )));
        }
        Ok(self.lines.remove(index))
    }

    /// Drop every line and reset name and servings
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn set_servings(&mut self, servings: u32) {
        self.servings = servings;
    }

    pub fn totals(&self) -> Nutrients {
        aggregate::totals(&self.lines)
    }

    /// Per-serving totals. A zero serving count displays as one serving.
    pub fn per_serving(&self) -> Nutrients {
        self.totals() / f64::from(self.servings.max(1))
    }

    /// Check the draft and build the request body for saving it
    pub fn to_new_meal(&self) -> Result<NewMeal> {
        let meal_name = self.name.trim();
        if meal_name.is_empty() {
            return Err(Error::validation("Please enter a meal name"));
        }
        if self.lines.is_empty() {
            return Err(Error::validation("Please add at least one ingredient"));
        }
        if self.servings < 1 {
            return Err(Error::validation("Servings must be at least 1"));
        }
        Ok(NewMeal {
            meal_name: meal_name.to_string(),
            servings: self.servings,
            ingredients: self.lines.clone(),
        })
    }
}

/// One row of the ingredient table
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRow {
    pub index: usize,
    pub name: String,
    pub amount: String,
    pub nutrients: Nutrients,
}

/// Everything a front end needs to draw the meal builder
#[derive(Debug, Clone, PartialEq)]
pub struct MealBuilderView {
    pub state: CompositionState,
    pub unit_label: String,
    pub can_add: bool,
    pub can_save: bool,
    pub meal_name: String,
    pub servings: u32,
    pub rows: Vec<IngredientRow>,
    pub totals: Nutrients,
    pub per_serving: Nutrients,
    pub notice: Option<Notice>,
}

/// Meal builder controller
pub struct MealBuilder<A> {
    api: A,
    catalog: Vec<Ingredient>,
    selected: Option<Ingredient>,
    draft: MealDraft,
    notices: NoticeBoard,
}

impl<A: NutritionApi> MealBuilder<A> {
    pub fn new(api: A, notice_ttl: Duration) -> Self {
        Self {
            api,
            catalog: Vec::new(),
            selected: None,
            draft: MealDraft::default(),
            notices: NoticeBoard::new(notice_ttl),
        }
    }

    pub fn catalog(&self) -> &[Ingredient] {
        &self.catalog
    }

    pub fn selected(&self) -> Option<&Ingredient> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> &MealDraft {
        &self.draft
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Fetch the ingredient catalog
    pub async fn load_ingredients(&mut self) -> Result<()> {
        match self.api.list_ingredients().await {
            Ok(ingredients) => {
                self.catalog = ingredients;
                Ok(())
            }
            Err(e) => Err(self.fail("loading ingredients", e.into())),
        }
    }

    /// Select an ingredient by name; `None` clears the selection
    pub fn select_ingredient(&mut self, name: Option<&str>) -> Result<()> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            self.selected = None;
            return Ok(());
        };

        match self.catalog.iter().find(|i| i.name == name).cloned() {
            Some(ingredient) => {
                self.selected = Some(ingredient);
                Ok(())
            }
            None => {
                self.selected = None;
                Err(self.fail(
                    "selecting ingredient",
                    Error::validation(format!("Unknown ingredient: {}", name)),
                ))
            }
        }
    }

    /// Calculate the selected ingredient at `quantity` and append it
    pub async fn add_ingredient(&mut self, quantity: f64) -> Result<()> {
        let selected = self
            .selected
            .clone()
            .filter(|_| quantity.is_finite() && quantity > 0.0);
        let Some(ingredient) = selected else {
            return Err(self.fail(
                "adding ingredient",
                Error::validation("Please select an ingredient and enter a valid quantity"),
            ));
        };

        let request = NutritionRequest {
            name: ingredient.name,
            quantity,
        };
        match self.api.calculate_nutrition(&request).await {
            Ok(line) => {
                self.draft.push(line);
                self.selected = None;
                Ok(())
            }
            Err(e) => Err(self.fail("calculating nutrition", e.into())),
        }
    }

    pub fn remove_ingredient(&mut self, index: usize) -> Result<ComposedIngredientLine> {
        self.draft
            .remove(index)
            .map_err(|e| self.fail("removing ingredient", e))
    }

    pub fn set_meal_name(&mut self, name: impl Into<String>) {
        self.draft.set_name(name);
    }

    pub fn set_servings(&mut self, servings: u32) {
        self.draft.set_servings(servings);
    }

    /// Discard the draft
    pub fn clear_meal(&mut self) {
        self.draft.clear();
        self.notices.info("Meal cleared");
    }

    /// Validate and persist the draft. The draft is kept when saving fails.
    pub async fn save_meal(&mut self) -> Result<Value> {
        let meal = self
            .draft
            .to_new_meal()
            .map_err(|e| self.fail("saving meal", e))?;

        match self.api.create_meal(&meal).await {
            Ok(created) => {
                info!(
                    "Saved meal {:?} ({} lines, {} servings)",
                    meal.meal_name,
                    meal.ingredients.len(),
                    meal.servings
                );
                // reset without clear_meal(), which would replace the success notice
                self.draft.clear();
                self.selected = None;
                self.notices.success(format!(
                    "Meal \"{}\" saved successfully with {} serving(s)!",
                    meal.meal_name, meal.servings
                ));
                Ok(created)
            }
            Err(e) => Err(self.fail("saving meal", e.into())),
        }
    }

    pub fn view(&self) -> MealBuilderView {
        let rows = self
            .draft
            .lines()
            .iter()
            .enumerate()
            .map(|(index, line)| IngredientRow {
                index,
                name: line.name.clone(),
                amount: format!("{} {}", line.quantity, line.unit_def),
                nutrients: line.nutrients,
            })
            .collect();

        MealBuilderView {
            state: self.draft.state(),
            unit_label: self
                .selected
                .as_ref()
                .map(Ingredient::unit_label)
                .unwrap_or_else(|| "Select ingredient first".to_string()),
            can_add: self.selected.is_some(),
            can_save: !self.draft.lines().is_empty(),
            meal_name: self.draft.name().to_string(),
            servings: self.draft.servings(),
            rows,
            totals: self.draft.totals(),
            per_serving: self.draft.per_serving(),
            notice: self.notices.current().cloned(),
        }
    }

    fn fail(&mut self, action: &str, err: Error) -> Error {
        self.notices.report(action, &err);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, calories: f64) -> ComposedIngredientLine {
        ComposedIngredientLine {
            name: name.to_string(),
            quantity: 1.0,
            unit_def: "cup".to_string(),
            nutrients: Nutrients {
                calories,
                protein: calories / 10.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_state_follows_lines() {
        let mut draft = MealDraft::new();
        assert_eq!(draft.state(), CompositionState::Empty);

        draft.push(line("a", 1.0));
        assert_eq!(draft.state(), CompositionState::Composing);

        draft.remove(0).unwrap();
        assert_eq!(draft.state(), CompositionState::Empty);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut draft = MealDraft::new();
        draft.push(line("first", 1.0));
        draft.push(line("second", 2.0));
        draft.push(line("third", 3.0));

        let removed = draft.remove(1).unwrap();
        assert_eq!(removed.name, "second");

        let names: Vec<_> = draft.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["first", "third"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut draft = MealDraft::new();
        draft.push(line("only", 1.0));
        assert!(draft.remove(1).unwrap_err().is_validation());
        assert_eq!(draft.lines().len(), 1);
    }

    #[test]
    fn test_add_then_remove_restores_totals() {
        let mut draft = MealDraft::new();
        draft.push(line("a", 120.25));
        draft.push(line("b", 33.3));
        let before = draft.totals();

        draft.push(line("c", 77.7));
        assert_ne!(draft.totals(), before);
        draft.remove(2).unwrap();
        assert_eq!(draft.totals(), before);
    }

    #[test]
    fn test_per_serving_tracks_serving_count() {
        let mut draft = MealDraft::new();
        draft.push(line("a", 300.0));
        draft.push(line("b", 100.0));

        assert_eq!(draft.per_serving().calories, 400.0);
        draft.set_servings(4);
        assert_eq!(draft.per_serving().calories, 100.0);
        draft.set_servings(0);
        assert_eq!(draft.per_serving().calories, 400.0);
    }

    #[test]
    fn test_to_new_meal_validation() {
        let mut draft = MealDraft::new();
        draft.set_name("   ");
        draft.push(line("a", 1.0));
        assert_eq!(
            draft.to_new_meal().unwrap_err().to_string(),
            "Please enter a meal name"
        );

        draft.set_name(" Soup ");
        draft.set_servings(0);
        assert_eq!(
            draft.to_new_meal().unwrap_err().to_string(),
            "Servings must be at least 1"
        );

        draft.set_servings(3);
        let meal = draft.to_new_meal().unwrap();
        assert_eq!(meal.meal_name, "Soup");
        assert_eq!(meal.servings, 3);
        assert_eq!(meal.ingredients.len(), 1);

        draft.clear();
        draft.set_name("Soup");
        assert_eq!(
            draft.to_new_meal().unwrap_err().to_string(),
            "Please add at least one ingredient"
        );
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut draft = MealDraft::new();
        draft.set_name("Pasta");
        draft.set_servings(6);
        draft.push(line("a", 1.0));
        draft.clear();
        assert_eq!(draft, MealDraft::default());
        assert_eq!(draft.servings(), 1);
    }
}
