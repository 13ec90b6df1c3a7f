#![allow(dead_code)]

use chrono::NaiveDate;
use client_management::db::{DbPool, establish_connection_pool, run_migrations};
use client_management::domain::client::{Client, NewClient};
use client_management::repository::{ClientWriter, DieselRepository};
use diesel::connection::SimpleConnection;
use tempfile::TempDir;

/// A migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("non utf-8 temp path"))
            .expect("failed to create pool");
        run_migrations(&pool).expect("failed to run migrations");
        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool.clone())
    }

    /// Adds a row in another table that references the client through a
    /// foreign key.
    pub fn reference_client(&self, client_id: i32) {
        let mut conn = self.pool.get().expect("failed to get connection");
        conn.batch_execute(
            "CREATE TABLE IF NOT EXISTS client_orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                client_id INTEGER NOT NULL REFERENCES clients(id)
            );",
        )
        .expect("failed to create referencing table");
        conn.batch_execute(&format!(
            "INSERT INTO client_orders (client_id) VALUES ({client_id});"
        ))
        .expect("failed to insert referencing row");
    }

    pub fn insert_client(&self, name: &str, income: f64, children: i32) -> Client {
        self.repo()
            .create_client(&new_client(name, income, children))
            .expect("failed to insert client")
    }
}

pub fn new_client(name: &str, income: f64, children: i32) -> NewClient {
    NewClient::new(
        name.to_string(),
        "12345678901".to_string(),
        income,
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        children,
    )
}
