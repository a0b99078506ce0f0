//! Integration tests for the catalog GraphQL API against `PostgreSQL`.
//!
//! Run with `CATALOG_TEST_DATABASE_URL` set:
//! `cargo test -p catalog-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use catalog_core::{CategoryId, Name, Price};
use catalog_integration_tests::{TestContext, unique_name};
use catalog_server::db::{CategoryRepository, ProductRepository, RepositoryError};
use catalog_server::models::ProductDraft;
use serde_json::{Value, json};

const CREATE_CATEGORY: &str = r"
    mutation($name: String!) {
        createCategory(name: $name) { category { id name description } }
    }
";

const UPDATE_CATEGORY: &str = r"
    mutation($id: ID, $name: String!) {
        updateCategory(id: $id, name: $name) { category { id name } }
    }
";

const CREATE_PRODUCT: &str = r"
    mutation($input: ProductInput!) {
        createProduct(input: $input) {
            product { id name description price quantity category { id name } }
        }
    }
";

const UPDATE_PRODUCT: &str = r"
    mutation($id: ID, $input: ProductInput!) {
        updateProduct(id: $id, input: $input) {
            product { id name description price quantity category { id name } }
        }
    }
";

const PRODUCTS: &str = r"
    query($category: String) {
        products(category: $category) { id name price category { name } }
    }
";

async fn context() -> TestContext {
    TestContext::new()
        .await
        .expect("test database should be reachable")
}

/// Create a category and return its id.
async fn create_category(ctx: &TestContext, name: &str) -> String {
    let outcome = ctx
        .execute(CREATE_CATEGORY, json!({ "name": name }))
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    outcome.data["createCategory"]["category"]["id"]
        .as_str()
        .unwrap()
        .to_owned()
}

fn product_input(name: &str, price: f64, category: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "quantity": 3,
        "category": category.parse::<i32>().unwrap(),
    })
}

/// Create a product and return the `product` object.
async fn create_product(ctx: &TestContext, name: &str, price: f64, category: &str) -> Value {
    let outcome = ctx
        .execute(
            CREATE_PRODUCT,
            json!({ "input": product_input(name, price, category) }),
        )
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    outcome.data["createProduct"]["product"].clone()
}

async fn count_categories_named(ctx: &TestContext, name: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM catalog.category WHERE name = $1")
        .bind(name)
        .fetch_one(&ctx.pool)
        .await
        .unwrap()
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_created_category_is_listed_once() {
    let ctx = context().await;
    let name = unique_name("Tools");
    let id = create_category(&ctx, &name).await;

    let outcome = ctx
        .execute("{ categories { id name description } }", json!({}))
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

    let matching: Vec<&Value> = outcome.data["categories"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["name"] == json!(name))
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["id"], json!(id));
    assert_eq!(matching[0]["description"], json!(""));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_duplicate_category_name_is_rejected() {
    let ctx = context().await;
    let name = unique_name("Tools");
    create_category(&ctx, &name).await;

    let outcome = ctx
        .execute(CREATE_CATEGORY, json!({ "name": name }))
        .await
        .unwrap();

    assert_eq!(outcome.first_code(), Some("UNIQUENESS_VIOLATION"));
    assert_eq!(outcome.data, Value::Null);
    assert_eq!(count_categories_named(&ctx, &name).await, 1);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_update_category_renames() {
    let ctx = context().await;
    let id = create_category(&ctx, &unique_name("Tools")).await;
    let renamed = unique_name("Hardware");

    let outcome = ctx
        .execute(UPDATE_CATEGORY, json!({ "id": id, "name": renamed }))
        .await
        .unwrap();

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.data["updateCategory"]["category"]["id"], json!(id));
    assert_eq!(
        outcome.data["updateCategory"]["category"]["name"],
        json!(renamed)
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_update_category_to_taken_name_is_rejected() {
    let ctx = context().await;
    let taken = unique_name("Tools");
    create_category(&ctx, &taken).await;
    let original = unique_name("Parts");
    let id = create_category(&ctx, &original).await;

    let outcome = ctx
        .execute(UPDATE_CATEGORY, json!({ "id": id, "name": taken }))
        .await
        .unwrap();

    assert_eq!(outcome.first_code(), Some("UNIQUENESS_VIOLATION"));
    assert_eq!(count_categories_named(&ctx, &original).await, 1);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_update_missing_category_is_not_found() {
    let ctx = context().await;

    let outcome = ctx
        .execute(
            UPDATE_CATEGORY,
            json!({ "id": i32::MAX.to_string(), "name": unique_name("Ghost") }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.first_code(), Some("NOT_FOUND"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_categories_include_their_products() {
    let ctx = context().await;
    let name = unique_name("Tools");
    let id = create_category(&ctx, &name).await;
    create_product(&ctx, "Hammer", 10.0, &id).await;
    create_product(&ctx, "Saw", 12.5, &id).await;

    let outcome = ctx
        .execute("{ categories { name products { name price } } }", json!({}))
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

    let category = outcome.data["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == json!(name))
        .unwrap();
    let mut names: Vec<&str> = category["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["Hammer", "Saw"]);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_price_is_rounded_to_two_places() {
    let ctx = context().await;
    let category = create_category(&ctx, &unique_name("Tools")).await;

    let product = create_product(&ctx, "Level", 19.999, &category).await;

    assert_eq!(product["price"], json!("20.00"));
    let stored: String =
        sqlx::query_scalar("SELECT price::text FROM catalog.product WHERE id = $1")
            .bind(product["id"].as_str().unwrap().parse::<i32>().unwrap())
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(stored, "20.00");
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_price_round_trips_without_drift() {
    let ctx = context().await;
    let category = create_category(&ctx, &unique_name("Tools")).await;
    let product = create_product(&ctx, "Chisel", 19.99, &category).await;
    let id = product["id"].as_str().unwrap().to_owned();

    for _ in 0..5 {
        let outcome = ctx
            .execute(
                UPDATE_PRODUCT,
                json!({ "id": id, "input": product_input("Chisel", 19.99, &category) }),
            )
            .await
            .unwrap();
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert_eq!(
            outcome.data["updateProduct"]["product"]["price"],
            json!("19.99")
        );
    }
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_out_of_range_price_is_rejected() {
    let ctx = context().await;
    let category = create_category(&ctx, &unique_name("Tools")).await;

    let outcome = ctx
        .execute(
            CREATE_PRODUCT,
            json!({ "input": product_input("Yacht", 123_456_789.0, &category) }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.first_code(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_products_filter_by_category_name() {
    let ctx = context().await;
    let tools_name = unique_name("Tools");
    let tools = create_category(&ctx, &tools_name).await;
    let parts = create_category(&ctx, &unique_name("Parts")).await;
    create_product(&ctx, "Hammer", 10.0, &tools).await;
    create_product(&ctx, "Wrench", 8.0, &tools).await;
    create_product(&ctx, "Bolt", 0.1, &parts).await;

    let outcome = ctx
        .execute(PRODUCTS, json!({ "category": tools_name }))
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

    let products = outcome.data["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(
        products
            .iter()
            .all(|p| p["category"]["name"] == json!(tools_name))
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_unknown_category_filter_yields_empty_list() {
    let ctx = context().await;

    let outcome = ctx
        .execute(PRODUCTS, json!({ "category": unique_name("Nowhere") }))
        .await
        .unwrap();

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.data["products"], json!([]));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_create_product_with_missing_category_is_rejected() {
    let ctx = context().await;

    let outcome = ctx
        .execute(
            CREATE_PRODUCT,
            json!({ "input": product_input("Orphan", 1.0, &i32::MAX.to_string()) }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.first_code(), Some("FOREIGN_KEY_VIOLATION"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_update_product_with_missing_category_leaves_record_unchanged() {
    let ctx = context().await;
    let category = create_category(&ctx, &unique_name("Tools")).await;
    let product = create_product(&ctx, "Hammer", 10.0, &category).await;
    let id = product["id"].as_str().unwrap().to_owned();

    let mut input = product_input("Renamed", 99.0, &category);
    input["category"] = json!(i32::MAX);
    let outcome = ctx
        .execute(UPDATE_PRODUCT, json!({ "id": id, "input": input }))
        .await
        .unwrap();
    assert_eq!(outcome.first_code(), Some("FOREIGN_KEY_VIOLATION"));

    let (name, price, category_id): (String, String, i32) = sqlx::query_as(
        "SELECT name, price::text, category_id FROM catalog.product WHERE id = $1",
    )
    .bind(id.parse::<i32>().unwrap())
    .fetch_one(&ctx.pool)
    .await
    .unwrap();
    assert_eq!(name, "Hammer");
    assert_eq!(price, "10.00");
    assert_eq!(category_id.to_string(), category);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_update_product_overwrites_every_field() {
    let ctx = context().await;
    let first = create_category(&ctx, &unique_name("Tools")).await;
    let second_name = unique_name("Parts");
    let second = create_category(&ctx, &second_name).await;
    let product = create_product(&ctx, "Hammer", 10.0, &first).await;

    let outcome = ctx
        .execute(
            UPDATE_PRODUCT,
            json!({
                "id": product["id"],
                "input": {
                    "name": "Mallet",
                    "description": "Rubber head",
                    "price": 7.5,
                    "quantity": 9,
                    "category": second.parse::<i32>().unwrap(),
                },
            }),
        )
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

    let updated = &outcome.data["updateProduct"]["product"];
    assert_eq!(updated["id"], product["id"]);
    assert_eq!(updated["name"], json!("Mallet"));
    assert_eq!(updated["description"], json!("Rubber head"));
    assert_eq!(updated["price"], json!("7.50"));
    assert_eq!(updated["quantity"], json!(9));
    assert_eq!(updated["category"]["name"], json!(second_name));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_update_missing_product_is_not_found() {
    let ctx = context().await;
    let category = create_category(&ctx, &unique_name("Tools")).await;

    let outcome = ctx
        .execute(
            UPDATE_PRODUCT,
            json!({
                "id": i32::MAX.to_string(),
                "input": product_input("Ghost", 1.0, &category),
            }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.first_code(), Some("NOT_FOUND"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_padded_category_name_is_stored_and_filtered_as_given() {
    let ctx = context().await;
    let name = format!(" {} ", unique_name("Tools"));
    let id = create_category(&ctx, &name).await;
    create_product(&ctx, "Hammer", 10.0, &id).await;

    assert_eq!(count_categories_named(&ctx, &name).await, 1);
    assert_eq!(count_categories_named(&ctx, name.trim()).await, 0);

    let outcome = ctx
        .execute(PRODUCTS, json!({ "category": name }))
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

    let products = outcome.data["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["category"]["name"], json!(name));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_rows_written_outside_the_api_are_listed() {
    let ctx = context().await;
    let padded = format!("  {}", unique_name("Legacy"));

    let category_id: i32 =
        sqlx::query_scalar("INSERT INTO catalog.category (name) VALUES ($1) RETURNING id")
            .bind(&padded)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    sqlx::query(
        "INSERT INTO catalog.product (name, price, quantity, category_id) VALUES ('', 1.50, 0, $1)",
    )
    .bind(category_id)
    .execute(&ctx.pool)
    .await
    .unwrap();

    let outcome = ctx
        .execute("{ categories { name products { name price } } }", json!({}))
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

    let category = outcome.data["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == json!(padded))
        .unwrap();
    assert_eq!(category["products"][0]["name"], json!(""));
    assert_eq!(category["products"][0]["price"], json!("1.50"));

    let outcome = ctx
        .execute(PRODUCTS, json!({ "category": padded }))
        .await
        .unwrap();
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(outcome.data["products"][0]["name"], json!(""));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_update_without_id_is_not_found() {
    let ctx = context().await;
    let category = create_category(&ctx, &unique_name("Tools")).await;

    let outcome = ctx
        .execute(
            UPDATE_PRODUCT,
            json!({ "input": product_input("Ghost", 1.0, &category) }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.first_code(), Some("NOT_FOUND"));
}

// =============================================================================
// Storage-level behavior
// =============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_category_is_created_with_its_products_atomically() {
    let ctx = context().await;
    let repo = CategoryRepository::new(&ctx.pool);
    let name = Name::parse(&unique_name("Tools")).unwrap();
    let drafts = vec![
        ProductDraft {
            name: Name::parse("Hammer").unwrap(),
            description: String::new(),
            price: Price::from_f64(10.0).unwrap(),
            quantity: 1,
        },
        ProductDraft {
            name: Name::parse("Saw").unwrap(),
            description: String::new(),
            price: Price::from_f64(12.0).unwrap(),
            quantity: 2,
        },
    ];

    let category = repo
        .create_with_products(&name, "Hand tools", &drafts)
        .await
        .unwrap();
    let products = ProductRepository::new(&ctx.pool)
        .list_for_categories(&[category.id])
        .await
        .unwrap();
    assert_eq!(products.len(), 2);

    let again = repo.create_with_products(&name, "", &drafts).await;
    assert!(matches!(again, Err(RepositoryError::Conflict(_))));

    let stored: i64 = sqlx::query_scalar(
        r"
        SELECT COUNT(*) FROM catalog.product p
        JOIN catalog.category c ON c.id = p.category_id
        WHERE c.name = $1
        ",
    )
    .bind(name.as_str())
    .fetch_one(&ctx.pool)
    .await
    .unwrap();
    assert_eq!(stored, 2);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (CATALOG_TEST_DATABASE_URL)"]
async fn test_deleting_category_cascades_to_products() {
    let ctx = context().await;
    let category = create_category(&ctx, &unique_name("Tools")).await;
    create_product(&ctx, "Hammer", 10.0, &category).await;
    create_product(&ctx, "Saw", 12.0, &category).await;
    let id = CategoryId::new(category.parse().unwrap());

    let removed = CategoryRepository::new(&ctx.pool).delete(id).await.unwrap();
    assert_eq!(removed, 2);

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM catalog.product WHERE category_id = $1")
            .bind(id)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);

    let again = CategoryRepository::new(&ctx.pool).delete(id).await;
    assert!(matches!(again, Err(RepositoryError::NotFound)));
}
