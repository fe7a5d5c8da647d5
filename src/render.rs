//! Text rendering of the controller views

use std::fmt::Write;

use nutrition_planner_api::{Ingredient, Nutrients};

use crate::aggregate::format_amount;
use crate::daily_log::{Availability, DailyLogView};
use crate::goals::GoalProgress;
use crate::meal_builder::MealBuilderView;
use crate::notify::Notice;

const BAR_WIDTH: usize = 20;

pub fn notice(notice: &Notice) -> String {
    format!("[{}] {}", notice.level, notice.message)
}

/// `[################----] 80.0% near`
pub fn progress_bar(progress: &GoalProgress) -> String {
    let filled = ((progress.percentage.max(0.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "[{}{}] {:>5}% {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        format_amount(progress.percentage),
        progress.band
    )
}

pub fn ingredients(ingredients: &[Ingredient]) -> String {
    let mut out = String::new();
    for ingredient in ingredients {
        let _ = writeln!(out, "{:<30} per {}", ingredient.name, ingredient.unit_label());
    }
    out
}

fn nutrient_header() -> String {
    format!(
        "{:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "kcal", "protein", "fat", "sat fat", "carbs", "sugars", "fibre", "sodium", "calcium"
    )
}

fn nutrient_cells(n: &Nutrients) -> String {
    [
        n.calories,
        n.protein,
        n.fat_total,
        n.fat_saturated,
        n.carbohydrate,
        n.sugars,
        n.dietary_fibre,
        n.sodium,
        n.calcium,
    ]
    .iter()
    .map(|v| format!("{:>8}", format_amount(*v)))
    .collect::<Vec<_>>()
    .join(" ")
}

pub fn meal_builder(view: &MealBuilderView) -> String {
    let mut out = String::new();

    if let Some(n) = &view.notice {
        let _ = writeln!(out, "{}", notice(n));
    }

    let name = if view.meal_name.trim().is_empty() {
        "(unnamed meal)"
    } else {
        view.meal_name.as_str()
    };
    let _ = writeln!(out, "{} - {} serving(s)", name, view.servings);
    let _ = writeln!(out, "{:>3} {:<24} {:<12} {}", "#", "ingredient", "amount", nutrient_header());

    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:>3} {:<24} {:<12} {}",
            row.index,
            row.name,
            row.amount,
            nutrient_cells(&row.nutrients)
        );
    }

    let _ = writeln!(out, "{:>3} {:<24} {:<12} {}", "", "total", "", nutrient_cells(&view.totals));
    let _ = writeln!(
        out,
        "{:>3} {:<24} {:<12} {}",
        "",
        "per serving",
        "",
        nutrient_cells(&view.per_serving)
    );
    out
}

pub fn meal_options(view: &DailyLogView) -> String {
    let mut out = String::new();
    for option in &view.options {
        let marker = if option.disabled { "x" } else { " " };
        let _ = writeln!(out, "[{}] {:>4}  {}", marker, option.meal_id, option.label);
    }
    out
}

fn availability(availability: &Availability) -> String {
    match availability {
        Availability::NotTracked => "Not tracked (old meal)".to_string(),
        Availability::Empty => "0 - EMPTY".to_string(),
        Availability::Low(remaining) => format!("{} - LOW", remaining),
        Availability::Available(remaining) => remaining.to_string(),
    }
}

pub fn daily_log(view: &DailyLogView) -> String {
    let mut out = String::new();

    if let Some(n) = &view.notice {
        let _ = writeln!(out, "{}", notice(n));
    }

    let _ = writeln!(out, "Daily nutrition for {}", view.date);

    if let Some(preview) = &view.preview {
        let _ = writeln!(
            out,
            "Selected: {} ({} servings, remaining: {})",
            preview.meal_name,
            preview.servings,
            availability(&preview.availability)
        );
        let _ = writeln!(out, "  per serving: {}", nutrient_cells(&preview.per_serving));
    }

    let _ = writeln!(out, "{:>5} {:<24} {:>8} {}", "id", "meal", "servings", nutrient_header());
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:>5} {:<24} {:>8} {}",
            row.entry_id,
            row.meal_name,
            format_amount(row.servings),
            nutrient_cells(&row.consumed)
        );
    }
    let _ = writeln!(
        out,
        "{:>5} {:<24} {:>8} {}",
        "",
        "total",
        format_amount(view.totals.servings),
        nutrient_cells(&view.totals.nutrients)
    );

    let _ = writeln!(out);
    for progress in &view.progress {
        let _ = writeln!(
            out,
            "{:<9} {:>8} / {:<6} {:<4} {}",
            progress.nutrient.label(),
            format_amount(progress.current),
            progress.goal,
            progress.nutrient.unit(),
            progress_bar(progress)
        );
    }
    out
}
