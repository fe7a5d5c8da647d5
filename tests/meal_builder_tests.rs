use std::time::Duration;

use nutrition_planner::meal_builder::{CompositionState, MealBuilder};
use nutrition_planner::notify::Level;
use nutrition_planner_api::NutritionClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn builder(server: &MockServer) -> MealBuilder<NutritionClient> {
    let api = NutritionClient::new(&server.uri(), reqwest::Client::new()).unwrap();
    MealBuilder::new(api, Duration::from_secs(5))
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/ingredients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Rice", "unit_size": 100, "unit_def": "g" },
            { "name": "Beans", "unit_size": 100, "unit_def": "g" },
            { "name": "Salsa", "unit_size": 1, "unit_def": "tbsp" }
        ])))
        .mount(server)
        .await;
}

// Echoes back a line with 1 kcal per unit of quantity
async fn mount_calculator(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/calculate-nutrition"))
        .respond_with(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let quantity = body["quantity"].as_f64().unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "name": body["name"],
                "quantity": quantity,
                "unit_def": "g",
                "calories": quantity,
                "protein": quantity / 10.0,
                "fat_total": 0.0,
                "fat_saturated": 0.0,
                "carbohydrate": quantity / 2.0,
                "sugars": 0.0,
                "dietary_fibre_g": 1.0,
                "sodium_mg": 0.0,
                "calcium_mg": 0.0
            }))
        })
        .mount(server)
        .await;
}

async fn add(builder: &mut MealBuilder<NutritionClient>, name: &str, quantity: f64) {
    builder.select_ingredient(Some(name)).unwrap();
    builder.add_ingredient(quantity).await.unwrap();
}

#[tokio::test]
async fn test_compose_and_totals() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_calculator(&server).await;

    let mut builder = builder(&server);
    builder.load_ingredients().await.unwrap();
    assert_eq!(builder.catalog().len(), 3);
    assert_eq!(builder.view().unit_label, "Select ingredient first");
    assert!(!builder.view().can_add);

    builder.select_ingredient(Some("Salsa")).unwrap();
    let view = builder.view();
    assert_eq!(view.unit_label, "1 tbsp");
    assert!(view.can_add);

    builder.add_ingredient(100.0).await.unwrap();
    add(&mut builder, "Beans", 50.0).await;

    let view = builder.view();
    assert_eq!(view.state, CompositionState::Composing);
    assert!(view.can_save);
    // selection is cleared after each add
    assert!(!view.can_add);
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[1].amount, "50 g");
    assert_eq!(view.totals.calories, 150.0);
    assert_eq!(view.totals.dietary_fibre, 2.0);

    builder.set_servings(3);
    assert_eq!(builder.view().per_serving.calories, 50.0);
}

#[tokio::test]
async fn test_remove_by_index_keeps_order() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_calculator(&server).await;

    let mut builder = builder(&server);
    builder.load_ingredients().await.unwrap();
    add(&mut builder, "Rice", 10.0).await;
    add(&mut builder, "Beans", 20.0).await;
    add(&mut builder, "Salsa", 30.0).await;

    let removed = builder.remove_ingredient(1).unwrap();
    assert_eq!(removed.name, "Beans");

    let names: Vec<_> = builder.view().rows.into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Rice", "Salsa"]);
    assert_eq!(builder.view().totals.calories, 40.0);

    builder.remove_ingredient(0).unwrap();
    builder.remove_ingredient(0).unwrap();
    assert_eq!(builder.view().state, CompositionState::Empty);

    assert!(builder.remove_ingredient(0).is_err());
    assert_eq!(builder.notices().current().unwrap().level, Level::Warning);
}

#[tokio::test]
async fn test_invalid_quantity_makes_no_request() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/calculate-nutrition"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.load_ingredients().await.unwrap();

    // nothing selected
    assert!(builder.add_ingredient(10.0).await.unwrap_err().is_validation());

    builder.select_ingredient(Some("Rice")).unwrap();
    for quantity in [0.0, -5.0, f64::NAN] {
        assert!(builder.add_ingredient(quantity).await.unwrap_err().is_validation());
    }

    let notice = builder.notices().current().unwrap();
    assert_eq!(notice.level, Level::Warning);
    assert_eq!(
        notice.message,
        "Please select an ingredient and enter a valid quantity"
    );
    assert!(builder.select_ingredient(Some("Caviar")).is_err());
}

#[tokio::test]
async fn test_save_empty_meal_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/meals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.set_meal_name("Nothing");

    let err = builder.save_meal().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        builder.notices().current().unwrap().message,
        "Please add at least one ingredient"
    );
}

#[tokio::test]
async fn test_save_success_clears_draft() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_calculator(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/meals"))
        .and(body_partial_json(json!({ "meal_name": "Burrito bowl", "servings": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meal_id": 12 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.load_ingredients().await.unwrap();
    add(&mut builder, "Rice", 150.0).await;
    add(&mut builder, "Beans", 80.0).await;
    builder.set_meal_name("  Burrito bowl ");
    builder.set_servings(2);

    let created = builder.save_meal().await.unwrap();
    assert_eq!(created["meal_id"], 12);

    let view = builder.view();
    assert_eq!(view.state, CompositionState::Empty);
    assert_eq!(view.meal_name, "");
    assert_eq!(view.servings, 1);

    let notice = view.notice.unwrap();
    assert_eq!(notice.level, Level::Success);
    assert_eq!(
        notice.message,
        "Meal \"Burrito bowl\" saved successfully with 2 serving(s)!"
    );
}

#[tokio::test]
async fn test_save_failure_keeps_draft() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_calculator(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/meals"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })),
        )
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.load_ingredients().await.unwrap();
    add(&mut builder, "Rice", 150.0).await;
    builder.set_meal_name("Plain rice");

    assert!(builder.save_meal().await.is_err());

    let view = builder.view();
    assert_eq!(view.state, CompositionState::Composing);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.meal_name, "Plain rice");

    let notice = view.notice.unwrap();
    assert_eq!(notice.level, Level::Danger);
    assert_eq!(notice.message, "Error saving meal: disk full");
}

#[tokio::test]
async fn test_clear_meal() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_calculator(&server).await;

    let mut builder = builder(&server);
    builder.load_ingredients().await.unwrap();
    add(&mut builder, "Rice", 150.0).await;
    builder.set_meal_name("Scrap");
    builder.set_servings(4);

    builder.clear_meal();

    let view = builder.view();
    assert_eq!(view.state, CompositionState::Empty);
    assert_eq!(view.servings, 1);
    assert!(!view.can_save);
    assert_eq!(view.notice.unwrap().message, "Meal cleared");
}

#[tokio::test]
async fn test_catalog_load_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ingredients"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    assert!(builder.load_ingredients().await.is_err());
    assert!(builder.catalog().is_empty());
    assert_eq!(
        builder.notices().current().unwrap().message,
        "Error loading ingredients: HTTP error! status: 503"
    );
}
