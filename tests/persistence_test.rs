mod helpers;

use cairn::db::persist::{self, Storage};
use cairn::db::{self, check_database_health};
use cairn::{GraphDocument, GraphHandle, MemoryGraph, Metadata, RelationshipType};
use helpers::{insert, link, sample_graph, TestStore};
use std::collections::BTreeSet;

fn edge_triples(graph: &MemoryGraph) -> Vec<(String, String, RelationshipType)> {
    let mut triples: Vec<_> = graph
        .edges()
        .map(|e| (e.source_id.clone(), e.target_id.clone(), e.relationship))
        .collect();
    triples.sort_by(|a, b| (&a.0, &a.1, a.2).cmp(&(&b.0, &b.1, b.2)));
    triples
}

fn node_pairs(graph: &MemoryGraph) -> BTreeSet<(String, String)> {
    graph
        .nodes()
        .map(|n| (n.id.clone(), n.content.clone()))
        .collect()
}

fn linked_sample() -> MemoryGraph {
    let mut graph = sample_graph();
    link(&mut graph, "n1", "n2", RelationshipType::RelatedTo);
    link(&mut graph, "n1", "n2", RelationshipType::RelatedTo);
    link(&mut graph, "n2", "n2", RelationshipType::Updated);
    graph
}

#[test]
fn save_then_load_preserves_nodes_and_edges() {
    let store = TestStore::new();
    let graph = linked_sample();

    let mut storage = store.open();
    storage.save_all(&graph).unwrap();
    drop(storage);

    let loaded = store.open().load_all().unwrap();
    assert_eq!(node_pairs(&loaded), node_pairs(&graph));
    assert_eq!(edge_triples(&loaded), edge_triples(&graph));
}

#[test]
fn save_writes_backup_document() {
    let store = TestStore::new();
    let mut storage = store.open();
    storage.save_all(&linked_sample()).unwrap();

    let doc = persist::read_document(&store.backup_path).unwrap();
    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.edges.len(), 3);
}

#[test]
fn backup_disabled_writes_nothing() {
    let store = TestStore::new();
    let conn = db::open_database(&store.db_path).unwrap();
    let mut storage = Storage::new(conn, Some(store.backup_path.clone()), false);
    storage.save_all(&sample_graph()).unwrap();

    assert!(!store.backup_path.exists());
}

#[test]
fn every_save_replaces_the_previous_one() {
    let store = TestStore::new();
    let mut storage = store.open();
    storage.save_all(&linked_sample()).unwrap();

    let mut graph = storage.load_all().unwrap();
    graph.remove_node("n1").unwrap();
    storage.save_all(&graph).unwrap();

    let report = check_database_health(storage.conn()).unwrap();
    assert_eq!(report.node_count, 1);
    assert_eq!(report.edge_count, 1);
    assert_eq!(report.dangling_edges, 0);
}

#[test]
fn readers_never_see_a_half_written_save() {
    let store = TestStore::new();
    let mut writer = store.open();
    writer.save_all(&linked_sample()).unwrap();

    let reader = store.open();
    let mut bigger = linked_sample();
    for i in 0..200 {
        insert(&mut bigger, &format!("extra{i}"), "filler", 0.1);
    }

    let observed = std::thread::scope(|s| {
        let handle = s.spawn(move || {
            let mut counts = Vec::new();
            for _ in 0..20 {
                counts.push(persist::load_graph(reader.conn()).unwrap().node_count());
            }
            counts
        });
        writer.save_all(&bigger).unwrap();
        handle.join().unwrap()
    });

    assert!(observed.iter().all(|&n| n == 2 || n == 202), "{observed:?}");
}

#[test]
fn empty_primary_falls_back_to_backup() {
    let store = TestStore::new();
    persist::write_document(&store.backup_path, &linked_sample().to_document()).unwrap();

    let graph = store.open().load_all().unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn populated_primary_wins_over_backup() {
    let store = TestStore::new();
    let mut storage = store.open();
    storage.save_all(&sample_graph()).unwrap();

    let mut other = MemoryGraph::new();
    insert(&mut other, "stale", "from an old backup", 0.5);
    persist::write_document(&store.backup_path, &other.to_document()).unwrap();

    let graph = storage.load_all().unwrap();
    assert!(graph.contains("n1"));
    assert!(!graph.contains("stale"));
}

#[test]
fn corrupt_primary_falls_back_to_backup() {
    let store = TestStore::new();
    let mut storage = store.open();
    storage.save_all(&linked_sample()).unwrap();

    storage
        .conn()
        .execute(
            "UPDATE memory_nodes SET created_at = 'not a timestamp' WHERE id = 'n1'",
            [],
        )
        .unwrap();
    assert!(persist::load_graph(storage.conn()).is_err());

    let graph = storage.load_all().unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn corrupt_primary_without_backup_reports_error() {
    let store = TestStore::new();
    let conn = db::open_database(&store.db_path).unwrap();
    let mut storage = Storage::new(conn, None, false);
    storage.save_all(&sample_graph()).unwrap();
    storage
        .conn()
        .execute(
            "UPDATE memory_nodes SET metadata = '{broken' WHERE id = 'n2'",
            [],
        )
        .unwrap();

    assert!(storage.load_all().is_err());
}

#[test]
fn empty_store_loads_empty_graph() {
    let store = TestStore::new();
    let graph = store.open().load_all().unwrap();
    assert!(graph.is_empty());
}

#[test]
fn handle_save_and_load() {
    let store = TestStore::new();
    let mut storage = store.open();

    let handle = GraphHandle::new(linked_sample());
    handle.get_node("n1").unwrap();
    let summary = handle.save(&mut storage).unwrap();
    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.edges, 3);

    let restored = GraphHandle::default();
    restored.load(&storage).unwrap();
    assert_eq!(restored.peek_node("n1").unwrap().access_count, 1);
}

#[test]
fn metadata_and_timestamps_survive_storage() {
    let store = TestStore::new();
    let mut graph = MemoryGraph::new();
    let mut meta = Metadata::new();
    meta.insert("tags".into(), serde_json::json!(["work", "weekly"]));
    graph
        .add_node(helpers::node("m", "standup", 0.4).with_metadata(meta.clone()))
        .unwrap();
    graph
        .add_edge("m", "m", RelationshipType::SimilarTo, meta.clone())
        .unwrap();
    let before = graph.to_document();

    let mut storage = store.open();
    storage.save_all(&graph).unwrap();
    let after = storage.load_all().unwrap().to_document();

    assert_eq!(after.nodes, before.nodes);
    assert_eq!(after.edges, before.edges);
}

#[test]
fn import_skips_existing_nodes_and_dangling_edges() {
    let mut graph = sample_graph();
    let json = serde_json::json!({
        "nodes": [
            {"id": "n1", "type": "concept", "content": "duplicate", "metadata": {},
             "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z",
             "importance": 0.1, "access_count": 0},
            {"id": "n9", "type": "task", "content": "new task", "metadata": {},
             "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
        ],
        "edges": [
            {"source": "n9", "target": "n1", "relationship": "part_of"},
            {"source": "n9", "target": "ghost", "relationship": "part_of"}
        ]
    });
    let doc: GraphDocument = serde_json::from_value(json).unwrap();

    let summary = graph.import_document(doc).unwrap();
    assert_eq!(summary.nodes_imported, 1);
    assert_eq!(summary.nodes_skipped, 1);
    assert_eq!(summary.edges_imported, 1);
    assert_eq!(summary.edges_skipped, 1);
    assert_eq!(graph.peek_node("n1").unwrap().content, "User likes Python");
    assert_eq!(graph.peek_node("n9").unwrap().importance, 0.5);
}
