//! Throwaway database and documents directory for tests

use std::path::PathBuf;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig};

pub struct TestEnv {
    pub db: DatabaseConnection,
    pub dir: PathBuf,
}

impl TestEnv {
    /// Fresh SQLite file with migrations applied, under a unique temp dir.
    pub async fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("livecolab-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create test dir");

        let db_path = dir.join("test.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 2,
        };
        let db = init_database(&config).await.expect("open test database");
        Migrator::up(&db, None).await.expect("run migrations");

        Self { db, dir }
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.dir.join("UserDocuments")
    }

    pub async fn cleanup(self) {
        let _ = self.db.close().await;
        let _ = tokio::fs::remove_dir_all(&self.dir).await;
    }
}
