//! Behavioural checks every datastore backend must pass.

use std::time::Duration;

use bigdecimal::BigDecimal;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::datastore::{Datastore, RevisionChanges, resolve_revision};
use crate::error::{Error, ErrorKind, Result};
use crate::token;
use crate::tuple::{self, RelationTuple, create, delete, touch};
use crate::types::{
    ConsistencyRequirement, ConsistencyToken, RelationshipFilter, Revision, SubjectFilter,
};

const WATCH_TIMEOUT: Duration = Duration::from_secs(5);
const FUZZING_WINDOW: Duration = Duration::from_secs(60);

/// Builds fresh, empty backend instances for the conformance suite.
pub trait DatastoreTester {
    /// Returns a new empty datastore using the given fuzzing window.
    fn new(&self, revision_fuzzing_window: Duration) -> Result<Box<dyn Datastore>>;
}

/// Runs every conformance check against backends built by `tester`.
pub async fn test_all<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    check_simple(tester).await?;
    check_create_conflict(tester).await?;
    check_preconditions(tester).await?;
    check_revision_ordering(tester).await?;
    check_revision_fuzzing(tester).await?;
    check_invalid_revision(tester).await?;
    check_delete_relationships(tester).await?;
    check_watch(tester).await?;
    check_consistency_tokens(tester).await?;

    #[cfg(feature = "tracing")]
    tracing::debug!("datastore passed all conformance checks");

    Ok(())
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition { Ok(()) } else { Err(Error::internal(message())) }
}

fn ensure_kind<T>(result: Result<T>, expected: ErrorKind, check: &str) -> Result<()> {
    match result {
        Ok(_) => Err(Error::internal(format!("{check}: expected {expected} error, got success"))),
        Err(err) if err.kind() == expected => Ok(()),
        Err(err) => Err(Error::internal(format!("{check}: expected {expected} error, got {err}"))),
    }
}

fn fixture(value: &str) -> Result<RelationTuple> {
    tuple::parse(value)
        .ok_or_else(|| Error::internal(format!("fixture tuple {value} does not parse")))
}

fn sorted(mut tuples: Vec<RelationTuple>) -> Vec<RelationTuple> {
    tuples.sort();
    tuples
}

async fn next_change(
    stream: &mut BoxStream<'static, Result<RevisionChanges>>,
) -> Result<RevisionChanges> {
    match tokio::time::timeout(WATCH_TIMEOUT, stream.next()).await {
        Ok(Some(changes)) => changes,
        Ok(None) => Err(Error::internal("watch: stream ended early")),
        Err(_) => Err(Error::internal("watch: timed out waiting for changes")),
    }
}

/// Writes tuples, reads them back through several filters, then deletes one.
pub async fn check_simple<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    ensure(ds.is_ready().await?, || "simple: datastore is not ready".into())?;

    let mut tuples = Vec::new();
    for i in 0..10 {
        tuples.push(fixture(&format!("document:doc{i}#viewer@user:user{i}"))?);
    }
    let subject_set = fixture("document:doc0#viewer@group:eng#member")?;
    tuples.push(subject_set.clone());

    let written = ds
        .write_tuples(vec![], tuples.iter().cloned().map(touch).collect())
        .await?;

    let all = ds
        .query_tuples(RelationshipFilter::new("document"), written.clone())
        .await?;
    ensure(sorted(all) == sorted(tuples.clone()), || {
        "simple: reading by resource type did not return every written tuple".into()
    })?;

    let doc0 = ds
        .query_tuples(
            RelationshipFilter::new("document").with_resource_id("doc0"),
            written.clone(),
        )
        .await?;
    ensure(doc0.len() == 2, || format!("simple: expected 2 tuples for doc0, got {}", doc0.len()))?;

    let groups = ds
        .query_tuples(
            RelationshipFilter::new("document")
                .with_relation("viewer")
                .with_subject_filter(SubjectFilter::new("group")),
            written.clone(),
        )
        .await?;
    ensure(groups == vec![subject_set], || {
        "simple: subject filter did not isolate the subject set".into()
    })?;

    let other = ds
        .query_tuples(RelationshipFilter::new("folder"), written.clone())
        .await?;
    ensure(other.is_empty(), || "simple: unrelated namespace returned tuples".into())?;

    let removed = tuples[0].clone();
    let deleted = ds.write_tuples(vec![], vec![delete(removed.clone())]).await?;
    ensure(deleted > written, || "simple: delete did not advance the revision".into())?;

    let after = ds
        .query_tuples(RelationshipFilter::new("document"), deleted)
        .await?;
    ensure(!after.contains(&removed), || "simple: deleted tuple still visible".into())?;
    ensure(after.len() == tuples.len() - 1, || {
        format!("simple: expected {} tuples after delete, got {}", tuples.len() - 1, after.len())
    })?;

    let before = ds
        .query_tuples(RelationshipFilter::new("document"), written)
        .await?;
    ensure(before.contains(&removed), || {
        "simple: deleted tuple missing from the earlier snapshot".into()
    })
}

/// CREATE of an existing tuple fails and leaves the rest of the batch unapplied.
pub async fn check_create_conflict<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    let existing = fixture("document:doc1#viewer@user:alice")?;
    let bystander = fixture("document:doc2#viewer@user:bob")?;

    ds.write_tuples(vec![], vec![create(existing.clone())]).await?;

    let result = ds
        .write_tuples(vec![], vec![create(bystander.clone()), create(existing)])
        .await;
    ensure_kind(result, ErrorKind::Conflict, "create conflict")?;

    let head = ds.head_revision().await?;
    let found = ds
        .query_tuples(RelationshipFilter::new("document"), head)
        .await?;
    ensure(!found.contains(&bystander), || {
        "create conflict: failed batch was partially applied".into()
    })?;

    ds.write_tuples(vec![], vec![touch(bystander)]).await?;
    Ok(())
}

/// Writes only apply when every precondition tuple exists.
pub async fn check_preconditions<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    let precondition = fixture("folder:root#owner@user:alice")?;
    let update = fixture("document:doc1#parent@folder:root")?;

    let result = ds
        .write_tuples(vec![precondition.clone()], vec![touch(update.clone())])
        .await;
    ensure_kind(result, ErrorKind::FailedPrecondition, "preconditions")?;

    let head = ds.head_revision().await?;
    let found = ds
        .query_tuples(RelationshipFilter::new("document"), head)
        .await?;
    ensure(found.is_empty(), || "preconditions: update applied despite failure".into())?;

    ds.write_tuples(vec![], vec![touch(precondition.clone())]).await?;
    let written = ds
        .write_tuples(vec![precondition], vec![touch(update.clone())])
        .await?;
    let found = ds
        .query_tuples(RelationshipFilter::new("document"), written)
        .await?;
    ensure(found == vec![update], || "preconditions: satisfied write not visible".into())
}

/// Write revisions strictly increase and never exceed the head.
pub async fn check_revision_ordering<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    let mut previous = ds.head_revision().await?;

    for i in 0..5 {
        let t = fixture(&format!("document:doc{i}#viewer@user:alice"))?;
        let revision = ds.write_tuples(vec![], vec![touch(t)]).await?;
        ensure(revision > previous, || {
            format!("revision ordering: {revision} does not follow {previous}")
        })?;
        previous = revision;
    }

    let head = ds.head_revision().await?;
    ensure(head >= previous, || {
        format!("revision ordering: head {head} is behind last write {previous}")
    })
}

/// Optimized revisions stay readable and never run ahead of the head.
pub async fn check_revision_fuzzing<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let fuzzed = tester.new(FUZZING_WINDOW)?;
    ensure(fuzzed.revision_fuzzing_window() == FUZZING_WINDOW, || {
        "revision fuzzing: backend did not keep its fuzzing window".into()
    })?;

    for i in 0..5 {
        let t = fixture(&format!("document:doc{i}#viewer@user:alice"))?;
        fuzzed.write_tuples(vec![], vec![touch(t)]).await?;
    }
    for _ in 0..10 {
        let optimized = fuzzed.optimized_revision().await?;
        let head = fuzzed.head_revision().await?;
        ensure(optimized <= head, || {
            format!("revision fuzzing: optimized {optimized} is ahead of head {head}")
        })?;
        fuzzed.check_revision(&optimized).await?;
    }

    let exact = tester.new(Duration::ZERO)?;
    let t = fixture("document:doc1#viewer@user:alice")?;
    let written = exact.write_tuples(vec![], vec![touch(t.clone())]).await?;
    let optimized = exact.optimized_revision().await?;
    ensure(optimized >= written, || {
        format!("revision fuzzing: zero window returned stale revision {optimized}")
    })?;
    let found = exact
        .query_tuples(RelationshipFilter::new("document"), optimized)
        .await?;
    ensure(found == vec![t], || "revision fuzzing: zero window read missed a write".into())
}

/// Revisions beyond the head are rejected by checks and reads.
pub async fn check_invalid_revision<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    let t = fixture("document:doc1#viewer@user:alice")?;
    let written = ds.write_tuples(vec![], vec![touch(t)]).await?;
    ds.check_revision(&written).await?;

    let head = ds.head_revision().await?;
    ds.check_revision(&head).await?;

    let future = Revision::from(head.as_decimal() + BigDecimal::from(1_000_000_000_000_i64));
    ensure_kind(
        ds.check_revision(&future).await,
        ErrorKind::InvalidRevision,
        "invalid revision check",
    )?;
    ensure_kind(
        ds.query_tuples(RelationshipFilter::new("document"), future).await,
        ErrorKind::InvalidRevision,
        "invalid revision read",
    )
}

/// Deleting by filter removes exactly the matching tuples.
pub async fn check_delete_relationships<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    let doc1_viewer = fixture("document:doc1#viewer@user:alice")?;
    let doc1_editor = fixture("document:doc1#editor@user:bob")?;
    let doc2_viewer = fixture("document:doc2#viewer@user:alice")?;
    let folder_viewer = fixture("folder:f1#viewer@user:alice")?;

    ds.write_tuples(
        vec![],
        vec![
            touch(doc1_viewer.clone()),
            touch(doc1_editor.clone()),
            touch(doc2_viewer.clone()),
            touch(folder_viewer.clone()),
        ],
    )
    .await?;

    let missing = fixture("folder:f1#owner@user:nobody")?;
    let result = ds
        .delete_relationships(vec![missing], RelationshipFilter::new("document"))
        .await;
    ensure_kind(result, ErrorKind::FailedPrecondition, "delete preconditions")?;

    let revision = ds
        .delete_relationships(
            vec![folder_viewer.clone()],
            RelationshipFilter::new("document").with_relation("viewer"),
        )
        .await?;

    let documents = ds
        .query_tuples(RelationshipFilter::new("document"), revision.clone())
        .await?;
    ensure(documents == vec![doc1_editor], || {
        format!("delete relationships: expected only the editor tuple, got {documents:?}")
    })?;

    let folders = ds
        .query_tuples(RelationshipFilter::new("folder"), revision)
        .await?;
    ensure(folders == vec![folder_viewer], || {
        "delete relationships: filter removed tuples outside its namespace".into()
    })
}

/// Watchers see every later change, in commit order.
pub async fn check_watch<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    let start = ds.head_revision().await?;
    let mut stream = ds.watch(start);

    let first = fixture("document:doc1#viewer@user:alice")?;
    let second = fixture("document:doc2#viewer@user:bob")?;

    let mut expected = Vec::new();
    let rev = ds.write_tuples(vec![], vec![create(first.clone())]).await?;
    expected.push((rev, vec![create(first.clone())]));
    let rev = ds.write_tuples(vec![], vec![touch(second.clone())]).await?;
    expected.push((rev, vec![touch(second)]));
    let rev = ds.write_tuples(vec![], vec![delete(first.clone())]).await?;
    expected.push((rev, vec![delete(first)]));

    for (revision, changes) in expected {
        let received = next_change(&mut stream).await?;
        ensure(received.revision == revision, || {
            format!("watch: expected revision {revision}, got {}", received.revision)
        })?;
        ensure(received.changes == changes, || {
            format!("watch: unexpected changes at revision {revision}")
        })?;
    }
    Ok(())
}

/// Tokens minted from a write resolve back to a revision that sees the write.
pub async fn check_consistency_tokens<T: DatastoreTester + ?Sized>(tester: &T) -> Result<()> {
    let ds = tester.new(Duration::ZERO)?;
    let t = fixture("document:doc1#viewer@user:alice")?;
    let written = ds.write_tuples(vec![], vec![touch(t.clone())]).await?;
    let minted = token::new_from_revision(&written);

    let exact = resolve_revision(
        &*ds,
        &ConsistencyRequirement::AtExactSnapshot(minted.clone()),
    )
    .await?;
    ensure(exact == written, || {
        format!("consistency tokens: exact snapshot resolved to {exact}, wrote at {written}")
    })?;

    let fresh =
        resolve_revision(&*ds, &ConsistencyRequirement::AtLeastAsFresh(minted)).await?;
    ensure(fresh >= written, || {
        format!("consistency tokens: at-least-as-fresh resolved to stale {fresh}")
    })?;

    let full = resolve_revision(&*ds, &ConsistencyRequirement::FullyConsistent).await?;
    let head = ds.head_revision().await?;
    ensure(full == head, || "consistency tokens: fully consistent is not the head".into())?;

    let found = ds
        .query_tuples(RelationshipFilter::new("document"), exact)
        .await?;
    ensure(found == vec![t], || "consistency tokens: snapshot read missed the write".into())?;

    let garbage = ConsistencyToken::new("not a token");
    ensure_kind(
        resolve_revision(&*ds, &ConsistencyRequirement::AtExactSnapshot(garbage)).await,
        ErrorKind::InvalidToken,
        "consistency tokens",
    )
}
