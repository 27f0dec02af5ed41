//! Runs against a live PostgreSQL named by `DATABASE_URL`:
//! `cargo test --test postgres -- --ignored`.

use chrono::{Duration, Utc};
use dotenv::dotenv;
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use std::sync::Arc;
use taskkeeper::auth::{PasswordHasher, TokenService};
use taskkeeper::models::{TaskFilter, TaskInput, TaskStatus, TaskUpdate};
use taskkeeper::store::{PgTaskRepository, PgUserRepository, StoreError};
use taskkeeper::AppState;
use uuid::Uuid;

async fn pool() -> PgPool {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn state(pool: &PgPool) -> AppState {
    AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgTaskRepository::new(pool.clone())),
        TokenService::new(b"postgres-test-secret"),
        PasswordHasher::new(4),
    )
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_credentials_round_trip() {
    let pool = pool().await;
    let state = state(&pool);
    let email = unique_email("ann");

    let user = state
        .credentials
        .create("Ann", &email.to_uppercase(), "pw1")
        .await
        .unwrap();
    assert_eq!(user.email, email);

    let duplicate = state.credentials.create("Ann", &email, "pw2").await;
    assert!(matches!(duplicate, Err(StoreError::EmailTaken)));

    let found = state.credentials.find_by_id(user.id).await.unwrap();
    assert_eq!(found, Some(user.clone()));

    let credentials = state
        .credentials
        .find_credentials_by_email(&email)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(credentials.password_hash, "pw1");

    assert!(state.credentials.authenticate(&email, "pw1").await.unwrap().is_some());
    assert!(state.credentials.authenticate(&email, "pw2").await.unwrap().is_none());

    cleanup_user(&pool, &email).await;
}

#[actix_rt::test]
#[ignore = "requires DATABASE_URL"]
async fn test_tasks_are_scoped_to_their_owner() {
    let pool = pool().await;
    let state = state(&pool);
    let ann_email = unique_email("ann");
    let bob_email = unique_email("bob");
    let ann = state.credentials.create("Ann", &ann_email, "pw1").await.unwrap();
    let bob = state.credentials.create("Bob", &bob_email, "pw2").await.unwrap();

    let task = state
        .tasks
        .create(
            ann.id,
            TaskInput {
                title: "Buy 100% milk_".into(),
                due_date: Some(Utc::now() + Duration::days(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(task.owner_id, ann.id);
    assert_eq!(task.status, TaskStatus::Pending);

    // LIKE metacharacters in the search are matched literally.
    let filter = TaskFilter {
        search: Some("100% MILK_".into()),
        ..Default::default()
    };
    assert_eq!(state.tasks.list(ann.id, &filter).await.unwrap().len(), 1);
    let filter = TaskFilter {
        search: Some("1%k".into()),
        ..Default::default()
    };
    assert!(state.tasks.list(ann.id, &filter).await.unwrap().is_empty());

    assert!(matches!(
        state.tasks.get(bob.id, task.id).await,
        Err(StoreError::NotFound)
    ));
    assert!(state.tasks.list(bob.id, &TaskFilter::default()).await.unwrap().is_empty());

    let changes = TaskUpdate {
        status: Some(TaskStatus::Completed),
        due_date: Some(None),
        ..Default::default()
    };
    assert!(matches!(
        state.tasks.update(bob.id, task.id, changes.clone()).await,
        Err(StoreError::NotFound)
    ));
    let updated = state.tasks.update(ann.id, task.id, changes).await.unwrap();
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.title, task.title);

    let stats = state.tasks.stats(ann.id).await.unwrap();
    assert_eq!((stats.total, stats.completed, stats.upcoming), (1, 1, 0));

    let deleted = state.tasks.delete(ann.id, task.id).await.unwrap();
    assert_eq!(deleted.id, task.id);
    assert!(matches!(
        state.tasks.delete(ann.id, task.id).await,
        Err(StoreError::NotFound)
    ));

    cleanup_user(&pool, &ann_email).await;
    cleanup_user(&pool, &bob_email).await;
}
