use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::infrastructure::schema::create_tables;

/// Fresh in-memory SQLite database with both tables created.
///
/// A single pooled connection keeps every query on the same memory database.
pub async fn in_memory_database() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    create_tables(&db).await.unwrap();
    db
}
