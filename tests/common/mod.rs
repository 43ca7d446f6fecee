#![allow(dead_code)]

use ruqanda::answer::{self, NewAnswerData};
use ruqanda::orm::{answers, comments, questions, votes};
use ruqanda::question::{self, NewQuestionData};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema, Statement,
};
use std::sync::atomic::{AtomicU32, Ordering};

static DB_SEQ: AtomicU32 = AtomicU32::new(0);

/// Opens a throwaway SQLite database with the crate's tables and the
/// vote uniqueness index the toggle protocol depends on.
pub async fn connect() -> DatabaseConnection {
    // A bare `sqlite::memory:` database does not survive here: each
    // `#[actix_rt::test]` runs on its own runtime, and the process-global pool
    // installed by `init_global_db` is maintained by a background task tied to
    // the runtime of whichever test created it. When that test's runtime is
    // dropped, the pool's last connection closes and SQLite discards the
    // in-memory database, so the next test reconnects to an empty one. A
    // file-backed database persists across connections and runtimes, so every
    // caller of the shared pool sees the seeded schema. Each `connect()` uses
    // a unique file to keep the per-test databases isolated.
    let id = DB_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!("ruqanda_test_{}_{id}.sqlite", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let mut opt = ConnectOptions::new(url);
    opt.min_connections(1);
    let db = Database::connect(opt)
        .await
        .expect("sqlite connection was not established");

    let schema = Schema::new(DbBackend::Sqlite);
    for stmt in [
        schema.create_table_from_entity(questions::Entity),
        schema.create_table_from_entity(answers::Entity),
        schema.create_table_from_entity(comments::Entity),
        schema.create_table_from_entity(votes::Entity),
    ] {
        db.execute(db.get_database_backend().build(&stmt))
            .await
            .expect("failed to create table");
    }

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        "CREATE UNIQUE INDEX idx_votes_voter_target \
         ON votes (user_id, target_kind, target_id)"
            .to_owned(),
    ))
    .await
    .expect("failed to create vote unique index");

    db
}

/// Installs a fresh sqlite pool as the process pool for handler tests.
/// The first caller wins; later callers share its database.
pub async fn init_global_db() -> &'static DatabaseConnection {
    let db = connect().await;
    ruqanda::db::set_db_pool(db)
}

pub async fn seed_question(db: &DatabaseConnection, author_id: i32) -> questions::Model {
    question::create_question(
        db,
        author_id,
        NewQuestionData {
            title: "What is ownership?".to_owned(),
            description: "Asking for a friend.".to_owned(),
        },
    )
    .await
    .expect("failed to seed question")
}

pub async fn seed_answer(
    db: &DatabaseConnection,
    author_id: i32,
) -> (questions::Model, answers::Model) {
    let question = seed_question(db, author_id).await;
    let answer = answer::create_answer(
        db,
        author_id,
        question.id,
        NewAnswerData {
            content: "The borrow checker explains it best.".to_owned(),
        },
    )
    .await
    .expect("failed to seed answer");
    (question, answer)
}
