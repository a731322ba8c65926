//! Runs against a throwaway database named by `TEST_DATABASE_URL`:
//! `cargo test --test postgres_users -- --ignored`

use std::sync::Arc;

use portfolio_api::{
    db::postgres::{create_pool, run_migrations},
    entities::user::{UserInsert, UserRole},
    repositories::{sqlx_repo::SqlxUserRepo, user::UserRepository},
};

fn insert(n: usize) -> UserInsert {
    UserInsert {
        name: format!("User {n}"),
        email: format!("user{n}@example.com"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        role: UserRole::User,
    }
}

#[tokio::test]
#[ignore = "needs a disposable Postgres in TEST_DATABASE_URL"]
async fn concurrent_first_sign_ups_produce_one_admin() {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL");
    let pool = create_pool(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    sqlx::query("TRUNCATE users CASCADE").execute(&pool).await.unwrap();

    let repo = Arc::new(SqlxUserRepo::new(pool.clone()));
    let tasks: Vec<_> = (0..8)
        .map(|n| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create_user(&insert(n)).await })
        })
        .collect();

    let mut admins = 0;
    for task in tasks {
        if task.await.unwrap().unwrap().role == UserRole::Admin {
            admins += 1;
        }
    }
    assert_eq!(admins, 1);
    assert_eq!(repo.count_users().await.unwrap(), 8);
}
