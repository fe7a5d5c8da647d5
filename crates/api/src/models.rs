//! Wire types exchanged with the nutrition REST API

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul};

/// Identifier of a saved meal
pub type MealId = i64;

/// Identifier of a daily log entry
pub type EntryId = i64;

/// Lenient numeric decoding.
///
/// The API stores its tables as CSV, so numbers sometimes arrive as strings,
/// `null`, or not at all. Anything that is not a finite number decodes as zero.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(crate) fn coerce(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
        };
        number.filter(|n| n.is_finite())
    }

    pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value).unwrap_or(0.0))
    }

    pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => None,
            other => Some(coerce(&other).unwrap_or(0.0)),
        })
    }
}

/// The nine tracked nutrient amounts.
///
/// Field names on the wire follow the calculation endpoint
/// (`dietary_fibre_g`, `sodium_mg`, `calcium_mg`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    #[serde(default, deserialize_with = "lenient::number")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fat_total: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fat_saturated: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub carbohydrate: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sugars: f64,
    #[serde(rename = "dietary_fibre_g", default, deserialize_with = "lenient::number")]
    pub dietary_fibre: f64,
    #[serde(rename = "sodium_mg", default, deserialize_with = "lenient::number")]
    pub sodium: f64,
    #[serde(rename = "calcium_mg", default, deserialize_with = "lenient::number")]
    pub calcium: f64,
}

impl Nutrients {
    /// Apply `f` to every field
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: f(self.calories),
            protein: f(self.protein),
            fat_total: f(self.fat_total),
            fat_saturated: f(self.fat_saturated),
            carbohydrate: f(self.carbohydrate),
            sugars: f(self.sugars),
            dietary_fibre: f(self.dietary_fibre),
            sodium: f(self.sodium),
            calcium: f(self.calcium),
        }
    }

    /// Combine two records field by field
    pub fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            calories: f(self.calories, other.calories),
            protein: f(self.protein, other.protein),
            fat_total: f(self.fat_total, other.fat_total),
            fat_saturated: f(self.fat_saturated, other.fat_saturated),
            carbohydrate: f(self.carbohydrate, other.carbohydrate),
            sugars: f(self.sugars, other.sugars),
            dietary_fibre: f(self.dietary_fibre, other.dietary_fibre),
            sodium: f(self.sodium, other.sodium),
            calcium: f(self.calcium, other.calcium),
        }
    }
}

impl Add for Nutrients {
    type Output = Nutrients;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl AddAssign for Nutrients {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Nutrients {
    type Output = Nutrients;

    fn mul(self, rhs: f64) -> Self::Output {
        self.map(|v| v * rhs)
    }
}

impl Div<f64> for Nutrients {
    type Output = Nutrients;

    fn div(self, rhs: f64) -> Self::Output {
        self.map(|v| v / rhs)
    }
}

impl Sum for Nutrients {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrients::default(), Add::add)
    }
}

impl<'a> Sum<&'a Nutrients> for Nutrients {
    fn sum<I: Iterator<Item = &'a Nutrients>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Reference ingredient from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub unit_size: f64,
    #[serde(default)]
    pub unit_def: String,
}

impl Ingredient {
    /// Human readable reference unit, e.g. `100 g`
    pub fn unit_label(&self) -> String {
        format!("{} {}", self.unit_size, self.unit_def)
    }
}

/// Nutrient breakdown of one ingredient at a given quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedIngredientLine {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: f64,
    #[serde(default)]
    pub unit_def: String,
    #[serde(flatten)]
    pub nutrients: Nutrients,
}

/// Body of `POST /api/calculate-nutrition`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionRequest {
    pub name: String,
    pub quantity: f64,
}

/// A saved meal with per-serving nutrition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal_id: MealId,
    #[serde(default)]
    pub meal_name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub servings: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub calories_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub protein_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fat_total_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fat_saturated_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub carbohydrate_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sugars_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub dietary_fibre_g_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sodium_mg_per_serving: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub calcium_mg_per_serving: f64,
    /// `None` for meals created before remaining servings were tracked
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub servings_remaining: Option<f64>,
}

impl Meal {
    pub fn per_serving(&self) -> Nutrients {
        Nutrients {
            calories: self.calories_per_serving,
            protein: self.protein_per_serving,
            fat_total: self.fat_total_per_serving,
            fat_saturated: self.fat_saturated_per_serving,
            carbohydrate: self.carbohydrate_per_serving,
            sugars: self.sugars_per_serving,
            dietary_fibre: self.dietary_fibre_g_per_serving,
            sodium: self.sodium_mg_per_serving,
            calcium: self.calcium_mg_per_serving,
        }
    }

    /// True when remaining servings are tracked and none are left
    pub fn is_exhausted(&self) -> bool {
        matches!(self.servings_remaining, Some(remaining) if remaining <= 0.0)
    }

    /// Whether `servings` can be taken from this meal
    pub fn can_serve(&self, servings: f64) -> bool {
        match self.servings_remaining {
            Some(remaining) => servings <= remaining,
            None => true,
        }
    }
}

/// Body of `POST /api/meals`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMeal {
    pub meal_name: String,
    pub servings: u32,
    pub ingredients: Vec<ComposedIngredientLine>,
}

/// One meal consumed on a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub entry_id: EntryId,
    #[serde(default)]
    pub meal_name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub servings_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub calories_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub protein_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fat_total_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fat_saturated_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub carbohydrate_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sugars_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub dietary_fibre_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sodium_consumed: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub calcium_consumed: f64,
}

impl DailyLogEntry {
    pub fn consumed(&self) -> Nutrients {
        Nutrients {
            calories: self.calories_consumed,
            protein: self.protein_consumed,
            fat_total: self.fat_total_consumed,
            fat_saturated: self.fat_saturated_consumed,
            carbohydrate: self.carbohydrate_consumed,
            sugars: self.sugars_consumed,
            dietary_fibre: self.dietary_fibre_consumed,
            sodium: self.sodium_consumed,
            calcium: self.calcium_consumed,
        }
    }
}

/// Body of `POST /api/daily-nutrition/{date}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDailyEntry {
    pub meal_id: MealId,
    pub servings: f64,
}

/// Error payload returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
