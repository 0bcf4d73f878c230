//! The shared backend suite, run against the in-memory datastore.

use std::time::Duration;

use inferadb_tuple::testing::{self, DatastoreTester};
use inferadb_tuple::tuple::{self, create};
use inferadb_tuple::types::RelationshipFilter;
use inferadb_tuple::{ConsistencyRequirement, ErrorKind, resolve_revision, token};

use crate::common::{MemoryTester, init_tracing};

#[tokio::test]
async fn test_memory_datastore_conformance() {
    init_tracing();
    testing::test_all(&MemoryTester::default()).await.unwrap();
}

#[tokio::test]
async fn test_conformance_with_minimal_watch_buffer() {
    init_tracing();
    let tester = MemoryTester { watch_buffer_length: 8 };
    testing::check_watch(&tester).await.unwrap();
}

#[tokio::test]
async fn test_trait_object_datastores_are_independent() {
    let tester = MemoryTester::default();
    let a = tester.new(Duration::ZERO).unwrap();
    let b = tester.new(Duration::ZERO).unwrap();
    assert_ne!(a.unique_id(), b.unique_id());

    let t = tuple::parse("document:readme#viewer@user:alice").unwrap();
    a.write_tuples(vec![], vec![create(t)]).await.unwrap();

    let head = b.head_revision().await.unwrap();
    let found = b
        .query_tuples(RelationshipFilter::new("document"), head)
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_token_from_another_datastore_is_rejected_when_ahead() {
    let tester = MemoryTester::default();
    let writer = tester.new(Duration::ZERO).unwrap();
    let t = tuple::parse("document:readme#viewer@user:alice").unwrap();

    // Give the reader a head that is older than the writer's revision.
    let reader = tester.new(Duration::ZERO).unwrap();
    let written = writer.write_tuples(vec![], vec![create(t)]).await.unwrap();
    let minted = token::new_from_revision(&written);

    let err = resolve_revision(&*reader, &ConsistencyRequirement::AtExactSnapshot(minted))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRevision);
}

#[tokio::test]
async fn test_minimize_latency_reads_are_not_ahead_of_head() {
    let tester = MemoryTester::default();
    let ds = tester.new(Duration::from_secs(30)).unwrap();
    for id in ["a1", "a2", "a3"] {
        let t = tuple::parse(&format!("document:{id}#viewer@user:alice")).unwrap();
        ds.write_tuples(vec![], vec![create(t)]).await.unwrap();
    }

    let revision = resolve_revision(&*ds, &ConsistencyRequirement::MinimizeLatency)
        .await
        .unwrap();
    assert!(revision <= ds.head_revision().await.unwrap());
}
