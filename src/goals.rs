//! Progress of the day's totals against fixed daily goals

use nutrition_planner_api::Nutrients;
use std::fmt;

/// How close a nutrient is to its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// 100% or more
    Met,
    /// 75% up to (not including) 100%
    Near,
    /// below 75%
    Behind,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Met => "met",
            Band::Near => "near",
            Band::Behind => "behind",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `min(current / goal * 100, 100)`
pub fn percentage(current: f64, goal: f64) -> f64 {
    (current / goal * 100.0).min(100.0)
}

pub fn classify(percentage: f64) -> Band {
    if percentage >= 100.0 {
        Band::Met
    } else if percentage >= 75.0 {
        Band::Near
    } else {
        Band::Behind
    }
}

/// Nutrients that carry a daily goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalNutrient {
    Calories,
    Protein,
    Fat,
    Carbohydrate,
    Fibre,
}

impl GoalNutrient {
    /// Display order
    pub const ALL: [GoalNutrient; 5] = [
        GoalNutrient::Calories,
        GoalNutrient::Protein,
        GoalNutrient::Fat,
        GoalNutrient::Carbohydrate,
        GoalNutrient::Fibre,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GoalNutrient::Calories => "Calories",
            GoalNutrient::Protein => "Protein",
            GoalNutrient::Fat => "Fat",
            GoalNutrient::Carbohydrate => "Carbs",
            GoalNutrient::Fibre => "Fibre",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            GoalNutrient::Calories => "kcal",
            _ => "g",
        }
    }

    fn amount(&self, nutrients: &Nutrients) -> f64 {
        match self {
            GoalNutrient::Calories => nutrients.calories,
            GoalNutrient::Protein => nutrients.protein,
            GoalNutrient::Fat => nutrients.fat_total,
            GoalNutrient::Carbohydrate => nutrients.carbohydrate,
            GoalNutrient::Fibre => nutrients.dietary_fibre,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub nutrient: GoalNutrient,
    pub current: f64,
    pub goal: f64,
    pub percentage: f64,
    pub band: Band,
}

impl GoalProgress {
    pub fn new(nutrient: GoalNutrient, current: f64, goal: f64) -> Self {
        let percentage = percentage(current, goal);
        Self {
            nutrient,
            current,
            goal,
            percentage,
            band: classify(percentage),
        }
    }
}

/// The fixed daily targets. There is no way to change them at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyGoals {
    calories: f64,
    protein: f64,
    fat: f64,
    carbohydrate: f64,
    fibre: f64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calories: 2500.0,
            protein: 150.0,
            fat: 65.0,
            carbohydrate: 250.0,
            fibre: 25.0,
        }
    }
}

impl DailyGoals {
    pub fn goal(&self, nutrient: GoalNutrient) -> f64 {
        match nutrient {
            GoalNutrient::Calories => self.calories,
            GoalNutrient::Protein => self.protein,
            GoalNutrient::Fat => self.fat,
            GoalNutrient::Carbohydrate => self.carbohydrate,
            GoalNutrient::Fibre => self.fibre,
        }
    }

    pub fn progress(&self, totals: &Nutrients) -> Vec<GoalProgress> {
        GoalNutrient::ALL
            .iter()
            .map(|&nutrient| GoalProgress::new(nutrient, nutrient.amount(totals), self.goal(nutrient)))
            .collect()
    }
}
