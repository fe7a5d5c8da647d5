use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::debug;
use std::io::{self, Write};

use nutrition_planner::config::PlannerConfig;
use nutrition_planner::error::Result;
use nutrition_planner::notify::NoticeBoard;
use nutrition_planner::{render, Planner};

#[derive(Parser, Debug)]
#[command(name = "nutrition-planner", version)]
#[command(about = "Build meals and track daily nutrition against goals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL. Falls back to NUTRITION_API_URL, then http://localhost:5000
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the ingredient catalog
    Ingredients,
    /// List saved meals and their remaining servings
    Meals,
    /// Compose a meal from ingredients and save it
    Build {
        /// Name of the meal
        #[arg(long)]
        name: String,
        /// Number of servings the meal makes
        #[arg(long, default_value_t = 1)]
        servings: u32,
        /// Ingredient and quantity as NAME=QUANTITY; repeat for each ingredient
        #[arg(long = "ingredient", value_parser = parse_ingredient, required = true)]
        ingredients: Vec<(String, f64)>,
    },
    /// Work with the daily nutrition log
    Day {
        #[command(subcommand)]
        command: DayCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DayCommands {
    /// Show entries, totals and goal progress
    Show {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Add servings of a meal to the day
    Add {
        /// Meal id, see `meals`
        #[arg(long)]
        meal: i64,
        #[arg(long, default_value_t = 1.0)]
        servings: f64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Remove one entry from the day
    Remove {
        #[arg(long)]
        entry: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Remove every entry of the day
    Clear {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn parse_ingredient(raw: &str) -> std::result::Result<(String, f64), String> {
    let (name, quantity) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=QUANTITY, got {:?}", raw))?;
    let quantity = quantity
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid quantity {:?} for {:?}", quantity, name))?;
    Ok((name.trim().to_string(), quantity))
}

fn confirm_on_stdin(assume_yes: bool) -> impl Fn(&str) -> bool {
    move |prompt: &str| {
        if assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Surface a failed action as the notice the controller posted for it
fn reported<T>(result: Result<T>, notices: &NoticeBoard) -> anyhow::Result<T> {
    result.map_err(|e| match notices.current() {
        Some(notice) => anyhow::anyhow!(notice.message.clone()),
        None => e.into(),
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PlannerConfig::from_env().context("Failed to read configuration")?;
    if let Some(url) = &cli.api_url {
        config = PlannerConfig::new(url, config.options.clone())?;
    }
    debug!("Using API at {}", config.api_url);
    let planner = Planner::from_config(config)?;

    match cli.command {
        Commands::Ingredients => {
            let mut builder = planner.meal_builder();
            reported(builder.load_ingredients().await, builder.notices())?;
            print!("{}", render::ingredients(builder.catalog()));
        }
        Commands::Meals => {
            let mut log = planner.daily_log(today());
            reported(log.load_meals().await, log.notices())?;
            print!("{}", render::meal_options(&log.view()));
        }
        Commands::Build {
            name,
            servings,
            ingredients,
        } => {
            let mut builder = planner.meal_builder();
            reported(builder.load_ingredients().await, builder.notices())?;

            for (ingredient, quantity) in &ingredients {
                let selected = builder.select_ingredient(Some(ingredient.as_str()));
                reported(selected, builder.notices())?;
                reported(builder.add_ingredient(*quantity).await, builder.notices())?;
            }

            builder.set_meal_name(name);
            builder.set_servings(servings);
            print!("{}", render::meal_builder(&builder.view()));

            reported(builder.save_meal().await, builder.notices())?;
            if let Some(notice) = builder.notices().current() {
                println!("{}", render::notice(notice));
            }
        }
        Commands::Day { command } => match command {
            DayCommands::Show { date } => {
                let mut log = planner.daily_log(date.unwrap_or_else(today));
                reported(log.resync().await, log.notices())?;
                print!("{}", render::daily_log(&log.view()));
            }
            DayCommands::Add {
                meal,
                servings,
                date,
            } => {
                let mut log = planner.daily_log(date.unwrap_or_else(today));
                reported(log.load_meals().await, log.notices())?;
                reported(log.select_meal(Some(meal)), log.notices())?;
                reported(log.add_meal_to_day(servings).await, log.notices())?;
                print!("{}", render::daily_log(&log.view()));
            }
            DayCommands::Remove { entry, date, yes } => {
                let mut log = planner.daily_log(date.unwrap_or_else(today));
                let confirm = confirm_on_stdin(yes);
                if reported(log.remove_entry(entry, &confirm).await, log.notices())? {
                    print!("{}", render::daily_log(&log.view()));
                }
            }
            DayCommands::Clear { date, yes } => {
                let mut log = planner.daily_log(date.unwrap_or_else(today));
                let confirm = confirm_on_stdin(yes);
                if reported(log.clear_day(&confirm).await, log.notices())? {
                    print!("{}", render::daily_log(&log.view()));
                }
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
