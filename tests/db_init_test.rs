use cairn::db;
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("new.db");

    // Should not exist yet
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();

    // Should have been created
    assert!(db_path.exists());

    // Should be functional
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_nodes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn health_check_passes_on_valid_db() {
    let conn = db::open_memory_database().unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::schema::SCHEMA_VERSION);
    assert_eq!(report.node_count, 0);
    assert_eq!(report.edge_count, 0);
    assert_eq!(report.dangling_edges, 0);
}

#[test]
fn busy_timeout_is_set() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("test.db");

    let conn = db::open_database(&db_path).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn deleting_a_node_cascades_to_its_edges() {
    let conn = db::open_memory_database().unwrap();
    conn.execute_batch(
        "INSERT INTO memory_nodes (id, type, content, created_at, updated_at)
         VALUES ('a', 'entity', 'Alice', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z'),
                ('b', 'event', 'Standup', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z');
         INSERT INTO memory_edges (source_id, target_id, relationship, created_at)
         VALUES ('a', 'b', 'involves', '2024-01-01T00:00:00Z');
         DELETE FROM memory_nodes WHERE id = 'a';",
    )
    .unwrap();

    let edges: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_edges", [], |r| r.get(0))
        .unwrap();
    assert_eq!(edges, 0);

    // Edge relationships are checked against the known set
    let result = conn.execute(
        "INSERT INTO memory_edges (source_id, target_id, relationship, created_at)
         VALUES ('b', 'b', 'likes', '2024-01-01T00:00:00Z')",
        [],
    );
    assert!(result.is_err(), "unknown relationship should be rejected by CHECK constraint");
}
