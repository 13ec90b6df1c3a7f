use client_management::db::run_migrations;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new("test_in_memory_connection.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_migrations_are_applied_once() {
    let test_db = common::TestDb::new("test_migrations_are_applied_once.db");
    assert_eq!(run_migrations(test_db.pool()).unwrap(), 0);
}
