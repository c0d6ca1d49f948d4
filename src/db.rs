use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::error::RepoResult;

const FILE_PRAGMAS: &[&str] =
    &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA cache_size=-64000"];

/// Opens the pool and brings the schema up to date.
///
/// An in-memory database lives only as long as its connection, so those
/// pools are pinned to a single connection.
pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> RepoResult<DatabaseConnection> {
    let in_memory = database_url.contains(":memory:");

    let mut opts = ConnectOptions::new(database_url.to_string());
    opts.sqlx_logging(false);
    if in_memory {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(max_connections.max(1));
    }
    let db = Database::connect(opts).await?;

    if !in_memory {
        for pragma in FILE_PRAGMAS {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys=ON".to_string(),
    ))
    .await?;

    Migrator::up(&db, None).await?;
    tracing::debug!(database_url, "database ready");
    Ok(db)
}
