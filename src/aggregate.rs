//! Nutrient totals for a meal draft and for a day

use nutrition_planner_api::{ComposedIngredientLine, DailyLogEntry, Nutrients};

use crate::error::{Error, Result};

/// Field-wise sum over the draft lines
pub fn totals<'a, I>(lines: I) -> Nutrients
where
    I: IntoIterator<Item = &'a ComposedIngredientLine>,
{
    lines.into_iter().map(|line| line.nutrients).sum()
}

/// `totals` split evenly across `servings` portions
pub fn per_serving(totals: Nutrients, servings: u32) -> Result<Nutrients> {
    if servings == 0 {
        return Err(Error::validation("Servings must be at least 1"));
    }
    Ok(totals / f64::from(servings))
}

/// What was eaten on one date
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayTotals {
    pub servings: f64,
    pub nutrients: Nutrients,
}

impl DayTotals {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a DailyLogEntry>,
    {
        entries
            .into_iter()
            .fold(DayTotals::default(), |mut acc, entry| {
                acc.servings += entry.servings_consumed;
                acc.nutrients += entry.consumed();
                acc
            })
    }
}

/// One-decimal display form. Never parse this back into a stored value.
pub fn format_amount(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, calories: f64, protein: f64, sodium: f64) -> ComposedIngredientLine {
        ComposedIngredientLine {
            name: name.to_string(),
            quantity: 100.0,
            unit_def: "g".to_string(),
            nutrients: Nutrients {
                calories,
                protein,
                sodium,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_totals_two_lines() {
        let lines = vec![line("Rice", 100.0, 2.0, 1.0), line("Beans", 50.0, 7.5, 3.0)];
        let sum = totals(&lines);
        assert_eq!(sum.calories, 150.0);
        assert_eq!(format_amount(sum.calories), "150.0");
        assert_eq!(sum.protein, 9.5);
        assert_eq!(sum.sodium, 4.0);
        assert_eq!(sum.calcium, 0.0);
    }

    #[test]
    fn test_totals_order_independent() {
        let lines = vec![
            line("a", 12.5, 1.0, 0.25),
            line("b", 200.0, 4.0, 0.5),
            line("c", 3.0, 16.0, 2.0),
        ];
        let mut reversed = lines.clone();
        reversed.reverse();
        assert_eq!(totals(&lines), totals(&reversed));
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(totals(&[]), Nutrients::default());
    }

    #[test]
    fn test_per_serving_reproduces_totals() {
        let sum = totals(&[line("a", 733.3, 21.7, 5.1), line("b", 18.9, 0.3, 12.0)]);
        for servings in 1..=12u32 {
            let portion = per_serving(sum, servings).unwrap();
            let back = portion * f64::from(servings);
            assert!((back.calories - sum.calories).abs() < 1e-9);
            assert!((back.protein - sum.protein).abs() < 1e-9);
            assert!((back.sodium - sum.sodium).abs() < 1e-9);
        }
    }

    #[test]
    fn test_per_serving_rejects_zero() {
        assert!(per_serving(Nutrients::default(), 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_day_totals() {
        let entry = |servings: f64, calories: f64| DailyLogEntry {
            entry_id: 1,
            meal_name: "x".to_string(),
            servings_consumed: servings,
            calories_consumed: calories,
            protein_consumed: 10.0,
            fat_total_consumed: 0.0,
            fat_saturated_consumed: 0.0,
            carbohydrate_consumed: 0.0,
            sugars_consumed: 0.0,
            dietary_fibre_consumed: 2.0,
            sodium_consumed: 0.0,
            calcium_consumed: 0.0,
        };

        let day = DayTotals::from_entries(&[entry(1.5, 600.0), entry(0.5, 200.0)]);
        assert_eq!(day.servings, 2.0);
        assert_eq!(day.nutrients.calories, 800.0);
        assert_eq!(day.nutrients.protein, 20.0);
        assert_eq!(day.nutrients.dietary_fibre, 4.0);
    }

    #[test]
    fn test_format_amount_rounds_for_display_only() {
        assert_eq!(format_amount(0.0), "0.0");
        assert_eq!(format_amount(12.34), "12.3");
        assert_eq!(format_amount(12.36), "12.4");
    }
}
