//! InMemoryDatastore: the reference backend.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::{Datastore, RevisionChanges};
use crate::config::DatastoreConfig;
use crate::error::{Error, Result};
use crate::tuple::{Operation, RelationTuple, RelationTupleUpdate};
use crate::types::{RelationshipFilter, Revision};

/// A multi-version, in-process datastore.
///
/// Every tuple remembers the revision it was created at and, once deleted,
/// the revision it was deleted at, so reads at any retained revision see a
/// consistent snapshot. Revisions are nanosecond wall-clock timestamps, bumped
/// when needed so they stay strictly increasing.
///
/// Clones share the same underlying store.
///
/// ## Example
///
/// ```rust
/// use inferadb_tuple::datastore::{Datastore, InMemoryDatastore};
/// use inferadb_tuple::tuple;
/// use inferadb_tuple::types::RelationshipFilter;
/// use std::time::Duration;
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let datastore = InMemoryDatastore::with_fuzzing_window(Duration::ZERO).unwrap();
///
/// let t = tuple::parse("document:readme#viewer@user:alice").unwrap();
/// let revision = datastore
///     .write_tuples(vec![], vec![tuple::create(t.clone())])
///     .await
///     .unwrap();
///
/// let found = datastore
///     .query_tuples(RelationshipFilter::new("document"), revision)
///     .await
///     .unwrap();
/// assert_eq!(found, vec![t]);
/// # });
/// ```
#[derive(Clone)]
pub struct InMemoryDatastore {
    id: String,
    config: DatastoreConfig,
    state: Arc<RwLock<State>>,
    changes: broadcast::Sender<RevisionChanges>,
}

struct StoredTuple {
    tuple: RelationTuple,
    created_at: Revision,
    deleted_at: Option<Revision>,
}

impl StoredTuple {
    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    fn is_live_at(&self, revision: &Revision) -> bool {
        self.created_at <= *revision && self.deleted_at.as_ref().is_none_or(|d| d > revision)
    }
}

struct Commit {
    nanos: i64,
    changes: Vec<RelationTupleUpdate>,
}

impl Commit {
    fn to_changes(&self) -> RevisionChanges {
        RevisionChanges {
            revision: Revision::from(self.nanos),
            changes: self.changes.clone(),
        }
    }
}

struct State {
    tuples: Vec<StoredTuple>,
    /// Index into `tuples` of every version live at the head.
    live: HashMap<RelationTuple, usize>,
    commits: Vec<Commit>,
    head: i64,
}

impl State {
    fn next_revision(&mut self) -> i64 {
        self.head = now_nanos().max(self.head.saturating_add(1));
        self.head
    }

    fn live_index(&self, tuple: &RelationTuple) -> Option<usize> {
        self.live.get(tuple).copied()
    }

    fn insert(&mut self, tuple: RelationTuple, revision: Revision) {
        self.live.insert(tuple.clone(), self.tuples.len());
        self.tuples.push(StoredTuple {
            tuple,
            created_at: revision,
            deleted_at: None,
        });
    }

    fn mark_deleted(&mut self, index: usize, revision: Revision) -> Option<RelationTuple> {
        let stored = self.tuples.get_mut(index)?;
        stored.deleted_at = Some(revision);
        self.live.remove(&stored.tuple);
        Some(stored.tuple.clone())
    }

    fn reindex(&mut self) {
        self.live = self
            .tuples
            .iter()
            .enumerate()
            .filter(|(_, stored)| stored.is_live())
            .map(|(index, stored)| (stored.tuple.clone(), index))
            .collect();
    }

    fn check_preconditions(&self, preconditions: &[RelationTuple]) -> Result<()> {
        for precondition in preconditions {
            if self.live_index(precondition).is_none() {
                return Err(Error::failed_precondition(format!(
                    "precondition tuple {precondition} does not exist"
                )));
            }
        }
        Ok(())
    }

    fn commit(&mut self, nanos: i64, changes: Vec<RelationTupleUpdate>) -> RevisionChanges {
        let commit = Commit { nanos, changes };
        let changes = commit.to_changes();
        self.commits.push(commit);
        changes
    }
}

fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

fn duration_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

impl InMemoryDatastore {
    /// Creates an empty datastore.
    ///
    /// Fails if `config` does not [validate](DatastoreConfig::validate).
    pub fn new(config: DatastoreConfig) -> Result<Self> {
        config.validate()?;

        let (changes, _) = broadcast::channel(config.watch_buffer_length);
        let mut state = State {
            tuples: Vec::new(),
            live: HashMap::new(),
            commits: Vec::new(),
            head: 0,
        };
        let initial = state.next_revision();
        state.commit(initial, Vec::new());

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            config,
            state: Arc::new(RwLock::new(state)),
            changes,
        })
    }

    /// Creates an empty datastore with default settings and the given window.
    pub fn with_fuzzing_window(revision_fuzzing_window: Duration) -> Result<Self> {
        Self::new(DatastoreConfig::with_fuzzing_window(revision_fuzzing_window))
    }

    /// Returns the configuration this datastore was built with.
    pub fn config(&self) -> &DatastoreConfig {
        &self.config
    }

    /// Returns the number of tuples live at the head revision.
    pub fn len(&self) -> usize {
        self.state.read().live.len()
    }

    /// Returns `true` if no tuples are live at the head revision.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops deleted tuples and change history older than the gc window.
    ///
    /// The head revision always survives. Returns the number of tuple
    /// versions removed.
    pub fn collect_garbage(&self) -> usize {
        let cutoff = self.gc_cutoff();
        let mut state = self.state.write();

        let before = state.tuples.len();
        state
            .tuples
            .retain(|stored| stored.deleted_at.as_ref().is_none_or(|d| *d >= cutoff));
        let removed = before - state.tuples.len();
        if removed > 0 {
            state.reindex();
        }

        let head = state.head;
        state
            .commits
            .retain(|commit| commit.nanos == head || Revision::from(commit.nanos) >= cutoff);

        #[cfg(feature = "tracing")]
        tracing::debug!(datastore = %self.id, removed, "collected garbage");

        removed
    }

    fn gc_cutoff(&self) -> Revision {
        let gc_window = duration_nanos(self.config.gc_window);
        Revision::from(now_nanos().saturating_sub(gc_window))
    }

    fn check_revision_sync(&self, state: &State, revision: &Revision) -> Result<()> {
        let head = Revision::from(state.head);
        if *revision > head {
            #[cfg(feature = "tracing")]
            tracing::warn!(%revision, %head, "rejected revision from the future");
            return Err(Error::invalid_revision(format!(
                "revision {revision} is newer than the head revision"
            )));
        }

        let oldest = self.gc_cutoff();
        if *revision < head && *revision < oldest {
            #[cfg(feature = "tracing")]
            tracing::warn!(%revision, %oldest, "rejected stale revision");
            return Err(Error::invalid_revision(format!(
                "revision {revision} is older than the gc window"
            )));
        }
        Ok(())
    }

    fn optimized_revision_sync(&self) -> Revision {
        let state = self.state.read();
        let window = duration_nanos(self.config.revision_fuzzing_window);
        if window == 0 {
            return Revision::from(state.head);
        }

        let lower_bound = now_nanos().saturating_sub(window);
        let candidates: Vec<i64> = state
            .commits
            .iter()
            .map(|commit| commit.nanos)
            .filter(|nanos| *nanos >= lower_bound)
            .collect();

        if candidates.is_empty() {
            return Revision::from(state.head);
        }
        Revision::from(candidates[fastrand::usize(..candidates.len())])
    }

    fn write_tuples_sync(
        &self,
        preconditions: &[RelationTuple],
        updates: Vec<RelationTupleUpdate>,
    ) -> Result<Revision> {
        for precondition in preconditions {
            precondition.validate()?;
        }
        let mut seen = HashSet::with_capacity(updates.len());
        for update in &updates {
            update.tuple.validate()?;
            if !seen.insert(&update.tuple) {
                return Err(Error::invalid_argument(format!(
                    "found more than one update for tuple {}",
                    update.tuple
                )));
            }
        }

        let mut state = self.state.write();
        state.check_preconditions(preconditions)?;
        for update in &updates {
            if update.operation == Operation::Create && state.live_index(&update.tuple).is_some() {
                return Err(Error::conflict(format!(
                    "tuple {} already exists",
                    update.tuple
                )));
            }
        }

        let nanos = state.next_revision();
        let revision = Revision::from(nanos);
        for update in &updates {
            let existing = state.live_index(&update.tuple);
            match (update.operation, existing) {
                (Operation::Create | Operation::Touch, None) => {
                    state.insert(update.tuple.clone(), revision.clone());
                },
                (Operation::Delete, Some(index)) => {
                    state.mark_deleted(index, revision.clone());
                },
                (Operation::Touch, Some(_)) | (Operation::Delete, None) => {},
                (Operation::Create, Some(_)) => {
                    return Err(Error::internal("create conflict detected after validation"));
                },
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            datastore = %self.id,
            %revision,
            updates = updates.len(),
            "applied tuple updates"
        );

        let changes = state.commit(nanos, updates);
        // No receivers just means nobody is watching.
        let _ = self.changes.send(changes);
        Ok(revision)
    }

    fn delete_relationships_sync(
        &self,
        preconditions: &[RelationTuple],
        filter: &RelationshipFilter,
    ) -> Result<Revision> {
        filter.validate()?;
        for precondition in preconditions {
            precondition.validate()?;
        }

        let mut state = self.state.write();
        state.check_preconditions(preconditions)?;

        let nanos = state.next_revision();
        let revision = Revision::from(nanos);
        let mut matched: Vec<usize> = state
            .live
            .iter()
            .filter(|(tuple, _)| filter.matches(tuple))
            .map(|(_, index)| *index)
            .collect();
        // Report deletions in write order.
        matched.sort_unstable();

        let deleted: Vec<RelationTupleUpdate> = matched
            .into_iter()
            .filter_map(|index| state.mark_deleted(index, revision.clone()))
            .map(|tuple| RelationTupleUpdate::new(Operation::Delete, tuple))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            datastore = %self.id,
            %revision,
            deleted = deleted.len(),
            "deleted relationships"
        );

        let changes = state.commit(nanos, deleted);
        let _ = self.changes.send(changes);
        Ok(revision)
    }

    fn query_tuples_sync(
        &self,
        filter: &RelationshipFilter,
        revision: &Revision,
    ) -> Result<Vec<RelationTuple>> {
        filter.validate()?;

        let state = self.state.read();
        self.check_revision_sync(&state, revision)?;
        Ok(state
            .tuples
            .iter()
            .filter(|stored| stored.is_live_at(revision) && filter.matches(&stored.tuple))
            .map(|stored| stored.tuple.clone())
            .collect())
    }
}

impl std::fmt::Debug for InMemoryDatastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDatastore")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Datastore for InMemoryDatastore {
    fn unique_id(&self) -> &str {
        &self.id
    }

    fn revision_fuzzing_window(&self) -> Duration {
        self.config.revision_fuzzing_window
    }

    fn is_ready(&self) -> BoxFuture<'_, Result<bool>> {
        Box::pin(async move { Ok(true) })
    }

    fn head_revision(&self) -> BoxFuture<'_, Result<Revision>> {
        let head = Revision::from(self.state.read().head);
        Box::pin(async move { Ok(head) })
    }

    fn optimized_revision(&self) -> BoxFuture<'_, Result<Revision>> {
        let revision = self.optimized_revision_sync();
        Box::pin(async move { Ok(revision) })
    }

    fn check_revision<'a>(&'a self, revision: &'a Revision) -> BoxFuture<'a, Result<()>> {
        let result = self.check_revision_sync(&self.state.read(), revision);
        Box::pin(async move { result })
    }

    fn write_tuples(
        &self,
        preconditions: Vec<RelationTuple>,
        updates: Vec<RelationTupleUpdate>,
    ) -> BoxFuture<'_, Result<Revision>> {
        let result = self.write_tuples_sync(&preconditions, updates);
        Box::pin(async move { result })
    }

    fn delete_relationships(
        &self,
        preconditions: Vec<RelationTuple>,
        filter: RelationshipFilter,
    ) -> BoxFuture<'_, Result<Revision>> {
        let result = self.delete_relationships_sync(&preconditions, &filter);
        Box::pin(async move { result })
    }

    fn query_tuples(
        &self,
        filter: RelationshipFilter,
        revision: Revision,
    ) -> BoxFuture<'_, Result<Vec<RelationTuple>>> {
        let result = self.query_tuples_sync(&filter, &revision);
        Box::pin(async move { result })
    }

    fn watch(&self, after_revision: Revision) -> BoxStream<'static, Result<RevisionChanges>> {
        // Subscribe under the read lock: writers publish under the write lock,
        // so nothing falls between the backlog and the live feed.
        let (backlog, receiver) = {
            let state = self.state.read();
            // History older than the gc window may already be collected.
            if let Err(err) = self.check_revision_sync(&state, &after_revision) {
                return stream::once(futures::future::ready(Err(err))).boxed();
            }
            let backlog: Vec<Result<RevisionChanges>> = state
                .commits
                .iter()
                .filter(|commit| {
                    !commit.changes.is_empty() && Revision::from(commit.nanos) > after_revision
                })
                .map(|commit| Ok(commit.to_changes()))
                .collect();
            (backlog, self.changes.subscribe())
        };

        let live = stream::unfold(Some(receiver), |receiver| async move {
            let mut receiver = receiver?;
            match receiver.recv().await {
                Ok(changes) => Some((Ok(changes), Some(receiver))),
                Err(RecvError::Lagged(skipped)) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(skipped, "watcher fell behind the change buffer");
                    Some((
                        Err(Error::unavailable(format!(
                            "watch disconnected after missing {skipped} change batches"
                        ))),
                        None,
                    ))
                },
                Err(RecvError::Closed) => None,
            }
        })
        .filter(move |item| {
            let keep = match item {
                Ok(changes) => !changes.changes.is_empty() && changes.revision > after_revision,
                Err(_) => true,
            };
            futures::future::ready(keep)
        });

        stream::iter(backlog).chain(live).boxed()
    }
}
