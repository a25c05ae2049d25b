use std::path::Path;
use std::sync::Arc;

use tracing::info;

use chronicle_diff::{aggregate, diff_entries, diff_trees, ExtractedDataDiff, FileDiff};
use chronicle_events::{EventBus, EventFilter, EventStream};
use chronicle_providers::{
    AcquisitionEngine, AcquisitionOutcome, FileLifecycleStore, InMemoryLifecycleStore,
    LifecycleStore, PollConfig, Provider,
};
use chronicle_refs::{FileHeadStore, HeadStore, InMemoryHeadStore};
use chronicle_staging::{OverlayStore, PendingSnapshot, StagingError, StagingPipeline};
use chronicle_store::{FileObjectStore, InMemoryObjectStore, ObjectStore, TreeEntry};
use chronicle_types::{ObjectId, ProviderFile};

use crate::error::SdkResult;
use crate::log::{CommitRef, LogEntry};

/// Result of running a provider acquisition through the vault.
#[derive(Debug)]
pub enum Acquisition {
    /// Files were acquired and staged; promote or discard next.
    Staged(PendingSnapshot),
    /// The run was cancelled; nothing was staged.
    Cancelled,
}

/// A personal-data vault: versioned history of everything the providers
/// have extracted, with staging and structured diffs.
pub struct Chronicle<S, H, L> {
    store: Arc<S>,
    head: Arc<H>,
    lifecycle: Arc<L>,
    bus: Arc<EventBus>,
    pipeline: StagingPipeline<S, H>,
}

/// Fully in-memory vault, for tests and embedding.
pub type MemoryChronicle = Chronicle<InMemoryObjectStore, InMemoryHeadStore, InMemoryLifecycleStore>;

/// Durable vault in a directory on disk.
pub type FileChronicle = Chronicle<FileObjectStore, FileHeadStore, FileLifecycleStore>;

impl MemoryChronicle {
    pub fn in_memory() -> Self {
        Self::assemble(
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(InMemoryHeadStore::new()),
            Arc::new(InMemoryLifecycleStore::new()),
        )
    }
}

impl FileChronicle {
    /// Open (or initialize) a vault directory.
    ///
    /// Layout: `objects/` for the content store, `HEAD` for the current
    /// commit, `lifecycle/` for persisted acquisition state.
    pub fn open(root: impl AsRef<Path>) -> SdkResult<Self> {
        let root = root.as_ref();
        let store = Arc::new(FileObjectStore::open(root)?);
        let head = Arc::new(FileHeadStore::open(root)?);
        let lifecycle = Arc::new(FileLifecycleStore::open(root.join("lifecycle"))?);
        info!(vault = %root.display(), "vault opened");
        Ok(Self::assemble(store, head, lifecycle))
    }
}

impl<S: ObjectStore, H: HeadStore, L: LifecycleStore> Chronicle<S, H, L> {
    fn assemble(store: Arc<S>, head: Arc<H>, lifecycle: Arc<L>) -> Self {
        let bus = Arc::new(EventBus::new());
        let pipeline = StagingPipeline::new(store.clone(), head.clone(), bus.clone());
        Self {
            store,
            head,
            lifecycle,
            bus,
            pipeline,
        }
    }

    /// Id of the latest commit, if any.
    pub fn head(&self) -> SdkResult<Option<ObjectId>> {
        Ok(self.head.head()?)
    }

    // ---- History ----

    /// Full history, newest first, with a synthetic entry for the staged
    /// snapshot when one exists.
    pub fn log(&self) -> SdkResult<Vec<LogEntry>> {
        let head = self.head.head()?;
        let mut entries = Vec::new();

        if let Some(snapshot) = self.pipeline.pending() {
            entries.push(LogEntry {
                id: None,
                parent: head,
                timestamp: snapshot.staged_at,
                message: snapshot.message,
                provider: snapshot.provider,
                pending: true,
            });
        }

        for (id, commit) in chronicle_store::log(self.store.as_ref(), head)? {
            entries.push(LogEntry {
                id: Some(id),
                parent: commit.parent,
                timestamp: commit.timestamp,
                message: commit.message,
                provider: commit.provider,
                pending: false,
            });
        }
        Ok(entries)
    }

    // ---- Diffing ----

    /// Per-file diffs of a snapshot against its parent.
    ///
    /// For a commit the parent is its recorded parent (the empty tree for
    /// the first commit); for the pending snapshot it is the current head.
    pub fn file_diffs(&self, commit_ref: CommitRef) -> SdkResult<Vec<FileDiff>> {
        match commit_ref {
            CommitRef::Commit(id) => {
                let commit = self.store.read_commit(&id)?;
                let parent_tree = match commit.parent {
                    Some(parent) => Some(self.store.read_commit(&parent)?.tree),
                    None => None,
                };
                Ok(diff_trees(
                    self.store.as_ref(),
                    parent_tree.as_ref(),
                    &commit.tree,
                )?)
            }
            CommitRef::Pending => {
                let snapshot = self
                    .pipeline
                    .pending()
                    .ok_or(StagingError::NothingStaged)?;
                let base = self.head_entries()?;
                let overlay = OverlayStore::new(self.store.as_ref(), &snapshot);
                Ok(diff_entries(&overlay, &base, &snapshot.entries)?)
            }
        }
    }

    /// Aggregated record diff of a snapshot against its parent, sorted by
    /// record type.
    pub fn diff(&self, commit_ref: CommitRef) -> SdkResult<ExtractedDataDiff> {
        Ok(aggregate(&self.file_diffs(commit_ref)?))
    }

    /// Aggregated record diff between two arbitrary commits.
    pub fn diff_between(&self, old: &ObjectId, new: &ObjectId) -> SdkResult<ExtractedDataDiff> {
        let old_tree = self.store.read_commit(old)?.tree;
        let new_tree = self.store.read_commit(new)?.tree;
        let diffs = diff_trees(self.store.as_ref(), Some(&old_tree), &new_tree)?;
        Ok(aggregate(&diffs))
    }

    // ---- Staging ----

    pub fn stage(
        &self,
        provider: &str,
        message: &str,
        files: &[ProviderFile],
    ) -> SdkResult<PendingSnapshot> {
        Ok(self.pipeline.stage(provider, message, files)?)
    }

    pub fn promote(&self) -> SdkResult<ObjectId> {
        Ok(self.pipeline.promote()?)
    }

    pub fn discard(&self) -> SdkResult<()> {
        Ok(self.pipeline.discard()?)
    }

    pub fn has_pending(&self) -> bool {
        self.pipeline.has_pending()
    }

    // ---- Events ----

    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        self.bus.subscribe(filter)
    }

    // ---- Acquisition ----

    /// An engine for running one provider's acquisition, sharing this
    /// vault's event bus and persisted lifecycle state. Use this instead
    /// of [`Chronicle::acquire`] when you need the cancellation handle.
    pub fn acquisition_engine<P: Provider>(
        &self,
        provider: P,
        poll: PollConfig,
    ) -> AcquisitionEngine<P, L> {
        AcquisitionEngine::new(provider, self.lifecycle.clone(), self.bus.clone(), poll)
    }

    /// Run a provider acquisition to completion and stage its output.
    pub async fn acquire<P: Provider>(
        &self,
        provider: P,
        message: &str,
        poll: PollConfig,
    ) -> SdkResult<Acquisition> {
        let key = provider.key().to_string();
        let engine = self.acquisition_engine(provider, poll);
        match engine.run().await? {
            AcquisitionOutcome::Complete(files) => {
                let snapshot = self.stage(&key, message, &files)?;
                Ok(Acquisition::Staged(snapshot))
            }
            AcquisitionOutcome::Cancelled => Ok(Acquisition::Cancelled),
        }
    }

    fn head_entries(&self) -> SdkResult<Vec<TreeEntry>> {
        match self.head.head()? {
            Some(id) => {
                let commit = self.store.read_commit(&id)?;
                Ok(self.store.read_tree(&commit.tree)?.entries)
            }
            None => Ok(Vec::new()),
        }
    }
}
