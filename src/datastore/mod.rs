//! The storage backend boundary.
//!
//! A [`Datastore`] persists relation tuples and tags every write with a
//! [`Revision`]. Revisions leave the process only inside consistency tokens;
//! [`resolve_revision`] turns a client's [`ConsistencyRequirement`] back into
//! the revision a read should use.
//!
//! ```text
//! write_tuples ──► Revision ──► token::new_from_revision ──► client
//! client ──► ConsistencyRequirement ──► resolve_revision ──► query_tuples
//! ```
//!
//! [`InMemoryDatastore`] is the reference backend. Other backends prove
//! themselves against [`testing::test_all`](crate::testing::test_all).

mod memory;

use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::BoxStream;

pub use memory::InMemoryDatastore;

use crate::error::Result;
use crate::token;
use crate::tuple::{RelationTuple, RelationTupleUpdate};
use crate::types::{ConsistencyRequirement, RelationshipFilter, Revision};

/// The tuple updates committed at one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionChanges {
    /// The revision the changes were committed at.
    pub revision: Revision,

    /// The applied updates, in the order they were submitted.
    pub changes: Vec<RelationTupleUpdate>,
}

/// Object-safe trait implemented by every storage backend.
///
/// ## Revision Contract
///
/// - Revisions returned by writes are strictly increasing.
/// - A revision returned by a write, or by [`head_revision`](Self::head_revision),
///   stays readable through [`query_tuples`](Self::query_tuples) for at least the
///   backend's garbage collection window.
/// - Each `write_tuples` batch is applied atomically: every update lands at the
///   same revision, or none do.
///
/// The trait is object-safe, so callers can hold `Box<dyn Datastore>` or
/// `Arc<dyn Datastore>`.
pub trait Datastore: Send + Sync {
    /// Identifier unique to this backend instance.
    fn unique_id(&self) -> &str;

    /// The staleness tolerance this backend was constructed with.
    fn revision_fuzzing_window(&self) -> Duration;

    /// Returns `true` once the backend can serve requests.
    fn is_ready(&self) -> BoxFuture<'_, Result<bool>>;

    /// The most recent committed revision.
    fn head_revision(&self) -> BoxFuture<'_, Result<Revision>>;

    /// A recent revision, at most the fuzzing window behind the head.
    ///
    /// Reads at the optimized revision may miss writes committed within the
    /// window in exchange for better snapshot reuse.
    fn optimized_revision(&self) -> BoxFuture<'_, Result<Revision>>;

    /// Fails with [`ErrorKind::InvalidRevision`](crate::ErrorKind::InvalidRevision)
    /// if `revision` cannot be read.
    fn check_revision<'a>(&'a self, revision: &'a Revision) -> BoxFuture<'a, Result<()>>;

    /// Applies `updates` atomically if every tuple in `preconditions` exists.
    ///
    /// Returns the revision the batch was committed at.
    fn write_tuples(
        &self,
        preconditions: Vec<RelationTuple>,
        updates: Vec<RelationTupleUpdate>,
    ) -> BoxFuture<'_, Result<Revision>>;

    /// Deletes every tuple matching `filter` if every precondition exists.
    fn delete_relationships(
        &self,
        preconditions: Vec<RelationTuple>,
        filter: RelationshipFilter,
    ) -> BoxFuture<'_, Result<Revision>>;

    /// Returns the tuples matching `filter` as of `revision`.
    fn query_tuples(
        &self,
        filter: RelationshipFilter,
        revision: Revision,
    ) -> BoxFuture<'_, Result<Vec<RelationTuple>>>;

    /// Streams every change committed after `after_revision`.
    ///
    /// If `after_revision` fails [`check_revision`](Self::check_revision), the
    /// stream yields that error and ends.
    ///
    /// The stream ends with an [`ErrorKind::Unavailable`](crate::ErrorKind::Unavailable)
    /// error if the watcher falls behind the backend's change buffer.
    fn watch(&self, after_revision: Revision) -> BoxStream<'static, Result<RevisionChanges>>;
}

/// Picks the revision a read should be served at.
///
/// | Requirement        | Revision                                       |
/// |--------------------|------------------------------------------------|
/// | `MinimizeLatency`  | optimized revision                             |
/// | `AtLeastAsFresh`   | the newer of the token's and the optimized one |
/// | `AtExactSnapshot`  | the token's revision, if still readable        |
/// | `FullyConsistent`  | head revision                                  |
///
/// Token decode failures surface as
/// [`ErrorKind::InvalidToken`](crate::ErrorKind::InvalidToken).
pub async fn resolve_revision(
    datastore: &dyn Datastore,
    requirement: &ConsistencyRequirement,
) -> Result<Revision> {
    match requirement {
        ConsistencyRequirement::MinimizeLatency => datastore.optimized_revision().await,
        ConsistencyRequirement::AtLeastAsFresh(token) => {
            let requested = token::decode_revision(Some(token))?;
            let optimized = datastore.optimized_revision().await?;
            if requested > optimized {
                datastore.check_revision(&requested).await?;
                Ok(requested)
            } else {
                Ok(optimized)
            }
        },
        ConsistencyRequirement::AtExactSnapshot(token) => {
            let requested = token::decode_revision(Some(token))?;
            datastore.check_revision(&requested).await?;
            Ok(requested)
        },
        ConsistencyRequirement::FullyConsistent => datastore.head_revision().await,
    }
}
