//! Database integration tests
//!
//! These tests exercise the libsql adapter against in-memory and file-backed
//! SQLite.

use cookbook::db::{
    DatabaseProvider, FavoriteRepository, IngredientRepository, RecipeRepository, TursoClient,
    UserRepository,
};
use cookbook::types::{AppError, FavoriteState, Ingredient, ResolvedRecipe};

async fn create_test_client() -> TursoClient {
    TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

async fn seed_recipe(client: &TursoClient, name: &str, ingredients: &[&str]) -> i64 {
    let mut resolved = Vec::new();
    for ingredient in ingredients {
        resolved.push(
            client
                .get_or_create_ingredient(ingredient)
                .await
                .expect("ingredient"),
        );
    }

    client
        .create_recipe(&ResolvedRecipe {
            name: name.to_string(),
            making: format!("make {}", name),
            ingredients: resolved,
        })
        .await
        .expect("recipe")
        .id
}

fn names(ingredients: &[Ingredient]) -> Vec<&str> {
    ingredients.iter().map(|i| i.name.as_str()).collect()
}

#[tokio::test]
async fn test_memory_connections_share_one_database() {
    let client = create_test_client().await;
    client.create_ingredient("thyme").await.expect("insert");

    // A second connection handle must see the same rows.
    let conn = client.connection().await.expect("connection");
    let mut rows = conn
        .query("SELECT COUNT(*) FROM ingredients", ())
        .await
        .expect("query");
    let row = rows.next().await.expect("row").expect("one row");
    assert_eq!(row.get::<i64>(0).expect("count"), 1);
}

#[tokio::test]
async fn test_local_file_database_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("cookbook.db");
    let path = path.to_str().expect("utf-8 path");

    {
        let client = DatabaseProvider::from_url(path)
            .create_client()
            .await
            .expect("open file db");
        client.create_ingredient("rosemary").await.expect("insert");
    }

    let reopened = TursoClient::new_local(path).await.expect("reopen");
    let all = reopened.find_all_ingredients().await.expect("list");
    assert_eq!(names(&all), vec!["rosemary"]);
}

#[tokio::test]
async fn test_ingredients_listed_in_id_order() {
    let client = create_test_client().await;
    for name in ["flour", "egg", "milk"] {
        client.create_ingredient(name).await.expect("insert");
    }

    let all = client.find_all_ingredients().await.expect("list");
    assert_eq!(names(&all), vec!["flour", "egg", "milk"]);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_ingredient_names_are_case_sensitive() {
    let client = create_test_client().await;
    client.create_ingredient("Sugar").await.expect("insert");
    client
        .create_ingredient("sugar")
        .await
        .expect("different case is a different name");

    assert!(client.ingredient_exists_by_name("Sugar").await.expect("exists"));
    assert!(!client.ingredient_exists_by_name("SUGAR").await.expect("exists"));
}

#[tokio::test]
async fn test_find_ingredients_by_names_skips_unknown() {
    let client = create_test_client().await;
    client.create_ingredient("flour").await.expect("insert");
    client.create_ingredient("egg").await.expect("insert");

    let found = client
        .find_ingredients_by_names(&["egg".to_string(), "sugar".to_string()])
        .await
        .expect("lookup");
    assert_eq!(names(&found), vec!["egg"]);

    let none = client.find_ingredients_by_names(&[]).await.expect("lookup");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_create_recipe_attaches_ingredients() {
    let client = create_test_client().await;
    let id = seed_recipe(&client, "pancake", &["flour", "egg"]).await;

    let all = client.find_all_recipes().await.expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(names(&all[0].ingredients), vec!["flour", "egg"]);
}

#[tokio::test]
async fn test_duplicate_recipe_leaves_no_partial_rows() {
    let client = create_test_client().await;
    seed_recipe(&client, "pancake", &["flour", "egg"]).await;
    let milk = client.create_ingredient("milk").await.expect("insert");

    let err = client
        .create_recipe(&ResolvedRecipe {
            name: "pancake".to_string(),
            making: "again".to_string(),
            ingredients: vec![milk],
        })
        .await
        .expect_err("duplicate name");
    assert!(matches!(err, AppError::DuplicateKey(_)));

    let conn = client.connection().await.expect("connection");
    let mut rows = conn
        .query("SELECT COUNT(*) FROM recipe_ingredients", ())
        .await
        .expect("query");
    let row = rows.next().await.expect("row").expect("one row");
    assert_eq!(row.get::<i64>(0).expect("count"), 2);
}

#[tokio::test]
async fn test_recipe_with_unknown_ingredient_id_rolls_back() {
    let client = create_test_client().await;

    let err = client
        .create_recipe(&ResolvedRecipe {
            name: "ghost soup".to_string(),
            making: "boil".to_string(),
            ingredients: vec![Ingredient {
                id: 999,
                name: "ghost".to_string(),
            }],
        })
        .await
        .expect_err("foreign key violation");
    assert!(matches!(err, AppError::Database(_)));

    assert!(!client.recipe_exists_by_name("ghost soup").await.expect("exists"));
}

#[tokio::test]
async fn test_filter_by_any_ingredient() {
    let client = create_test_client().await;
    let r1 = seed_recipe(&client, "r1", &["a", "b"]).await;
    let r2 = seed_recipe(&client, "r2", &["b", "c"]).await;
    let r3 = seed_recipe(&client, "r3", &["c"]).await;

    let ids = |recipes: Vec<cookbook::types::Recipe>| -> Vec<i64> {
        recipes.into_iter().map(|r| r.id).collect()
    };

    let by_a = client
        .find_recipes_by_any_ingredient(&["a".to_string()])
        .await
        .expect("filter");
    assert_eq!(ids(by_a), vec![r1]);

    let by_b = client
        .find_recipes_by_any_ingredient(&["b".to_string()])
        .await
        .expect("filter");
    assert_eq!(ids(by_b), vec![r1, r2]);

    let by_a_c = client
        .find_recipes_by_any_ingredient(&["a".to_string(), "c".to_string()])
        .await
        .expect("filter");
    assert_eq!(ids(by_a_c), vec![r1, r2, r3]);
}

#[tokio::test]
async fn test_filtered_recipes_carry_full_ingredient_list() {
    let client = create_test_client().await;
    seed_recipe(&client, "r1", &["a", "b"]).await;

    let found = client
        .find_recipes_by_any_ingredient(&["a".to_string()])
        .await
        .expect("filter");
    assert_eq!(names(&found[0].ingredients), vec!["a", "b"]);
}

#[tokio::test]
async fn test_find_recipe_by_id() {
    let client = create_test_client().await;
    let id = seed_recipe(&client, "toast", &["bread"]).await;

    let found = client.find_recipe_by_id(id).await.expect("lookup");
    assert_eq!(found.map(|r| r.name), Some("toast".to_string()));
    assert!(client.find_recipe_by_id(id + 100).await.expect("lookup").is_none());
}

#[tokio::test]
async fn test_toggle_favorite_flips_state() {
    let client = create_test_client().await;
    let user = client.create_user("alice", "hash", false).await.expect("user");
    let recipe = seed_recipe(&client, "toast", &["bread"]).await;

    let first = client.toggle_favorite(user.id, recipe).await.expect("toggle");
    assert_eq!(first, FavoriteState::Present);
    assert!(client.favorite_exists(user.id, recipe).await.expect("exists"));

    let second = client.toggle_favorite(user.id, recipe).await.expect("toggle");
    assert_eq!(second, FavoriteState::Absent);
    assert!(!client.favorite_exists(user.id, recipe).await.expect("exists"));
}

#[tokio::test]
async fn test_add_and_remove_favorite() {
    let client = create_test_client().await;
    let user = client.create_user("bob", "hash", false).await.expect("user");
    let recipe = seed_recipe(&client, "salad", &["lettuce", "tomato"]).await;

    client.add_favorite(user.id, recipe).await.expect("add");
    client.add_favorite(user.id, recipe).await.expect("add twice is a no-op");

    let favorites = client.find_favorites_by_user(user.id).await.expect("list");
    assert_eq!(favorites.len(), 1);
    assert_eq!(names(&favorites[0].ingredients), vec!["lettuce", "tomato"]);

    client.remove_favorite(user.id, recipe).await.expect("remove");
    assert!(client.find_favorites_by_user(user.id).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let client = create_test_client().await;
    let alice = client.create_user("alice", "hash", false).await.expect("user");
    let bob = client.create_user("bob", "hash", false).await.expect("user");
    let recipe = seed_recipe(&client, "soup", &["water"]).await;

    client.toggle_favorite(alice.id, recipe).await.expect("toggle");

    assert_eq!(client.find_favorites_by_user(alice.id).await.expect("list").len(), 1);
    assert!(client.find_favorites_by_user(bob.id).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_create_duplicate_user_fails() {
    let client = create_test_client().await;
    client.create_user("alice", "hash", false).await.expect("first");

    let err = client
        .create_user("alice", "other", true)
        .await
        .expect_err("duplicate username");
    match err {
        AppError::DuplicateKey(msg) => assert_eq!(msg, "username 'alice' already exists."),
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[tokio::test]
async fn test_user_lookup_and_password_update() {
    let client = create_test_client().await;
    let created = client.create_user("carol", "old-hash", true).await.expect("user");

    let by_name = client
        .find_user_by_username("carol")
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(by_name.id, created.id);
    assert!(by_name.is_admin);

    client
        .update_password(created.id, "new-hash")
        .await
        .expect("update");
    let by_id = client
        .find_user_by_id(created.id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(by_id.password_hash, "new-hash");

    assert!(client.find_user_by_username("nobody").await.expect("lookup").is_none());
}

#[tokio::test]
async fn test_update_password_unknown_user() {
    let client = create_test_client().await;
    let err = client
        .update_password(404, "hash")
        .await
        .expect_err("no such user");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_toggles_keep_parity() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("toggle.db");
    let client = std::sync::Arc::new(
        TursoClient::new_local(path.to_str().expect("utf-8 path"))
            .await
            .expect("open file db"),
    );

    let mut users = Vec::new();
    for name in ["ann", "ben", "cat", "dan"] {
        users.push(client.create_user(name, "hash", false).await.expect("user").id);
    }
    let mut recipes = Vec::new();
    for name in ["r1", "r2", "r3", "r4", "r5"] {
        recipes.push(seed_recipe(&client, name, &[name]).await);
    }

    // Four toggles per pair, except (ann, r1) which gets three.
    let mut handles = Vec::new();
    for &user in &users {
        for &recipe in &recipes {
            let toggles = if (user, recipe) == (users[0], recipes[0]) { 3 } else { 4 };
            for _ in 0..toggles {
                let client = client.clone();
                handles.push(tokio::spawn(async move {
                    client.toggle_favorite(user, recipe).await
                }));
            }
        }
    }

    for handle in handles {
        handle.await.expect("task").expect("toggle");
    }

    let ann = client.find_favorites_by_user(users[0]).await.expect("list");
    assert_eq!(ann.iter().map(|r| r.id).collect::<Vec<_>>(), vec![recipes[0]]);
    for &user in &users[1..] {
        assert!(client.find_favorites_by_user(user).await.expect("list").is_empty());
    }

    let conn = client.connection().await.expect("connection");
    let mut rows = conn
        .query("SELECT COUNT(*) FROM user_favorites", ())
        .await
        .expect("query");
    let row = rows.next().await.expect("row").expect("one row");
    assert_eq!(row.get::<i64>(0).expect("count"), 1);
}
