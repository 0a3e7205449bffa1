/// Repository module
///
/// This module provides the domain data layer for the application. It
/// holds an in-memory snapshot of every collection and writes through to
/// the persistent store, refreshing the affected snapshot after each
/// mutation so reads always reflect the latest committed state.
///
/// List accessors are synchronous and return cloned snapshots; mutating
/// operations are async and go through the store. The repository applies
/// the domain policies the store deliberately does not know about:
/// subject cascades, note timestamp stamping, and chat session ordering.
mod subject_repo;
mod task_repo;
mod exam_repo;
mod note_repo;
mod goal_repo;
mod event_repo;
mod chat_repo;

pub use chat_repo::ReplyChunk;
pub use subject_repo::{CascadeFailure, CascadeReport};

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::errors::{Error, Result};
use crate::models::{ChatSession, Exam, Goal, Note, Subject, Task, TimetableEvent};
use crate::store::{Collection, LocalStore};

/// The domain repository
///
/// A `Repository` owns a handle to the persistent store and one cached
/// snapshot per collection. It is cheap to share behind an `Arc`; all
/// methods take `&self`.
pub struct Repository {
    store: Arc<LocalStore>,
    subjects: RwLock<Vec<Subject>>,
    tasks: RwLock<Vec<Task>>,
    exams: RwLock<Vec<Exam>>,
    notes: RwLock<Vec<Note>>,
    goals: RwLock<Vec<Goal>>,
    events: RwLock<Vec<TimetableEvent>>,
    chats: RwLock<Vec<ChatSession>>,
}

impl Repository {
    /// Opens the repository over the given store
    ///
    /// Opens the store if it is not open yet, then loads every collection
    /// concurrently into the in-memory caches. Chat sessions are sorted
    /// most recently updated first; all other collections keep storage
    /// order.
    ///
    /// ### Arguments
    ///
    /// * `store` - The persistent store to read from and write through to
    ///
    /// ### Errors
    ///
    /// Returns an error if the store cannot be opened, a collection fails
    /// to load, or a stored payload no longer decodes as its entity type.
    #[instrument(skip(store))]
    pub async fn open(store: Arc<LocalStore>) -> Result<Self> {
        store.open().await?;

        let (subjects, tasks, exams, notes, goals, events, mut chats) = tokio::try_join!(
            load_collection::<Subject>(&store, Collection::Subjects),
            load_collection::<Task>(&store, Collection::Tasks),
            load_collection::<Exam>(&store, Collection::Exams),
            load_collection::<Note>(&store, Collection::Notes),
            load_collection::<Goal>(&store, Collection::Goals),
            load_collection::<TimetableEvent>(&store, Collection::Events),
            load_collection::<ChatSession>(&store, Collection::Chats),
        )?;
        chat_repo::sort_sessions(&mut chats);

        info!(
            subjects = subjects.len(),
            tasks = tasks.len(),
            exams = exams.len(),
            notes = notes.len(),
            goals = goals.len(),
            events = events.len(),
            chats = chats.len(),
            "Repository opened"
        );

        Ok(Self {
            store,
            subjects: RwLock::new(subjects),
            tasks: RwLock::new(tasks),
            exams: RwLock::new(exams),
            notes: RwLock::new(notes),
            goals: RwLock::new(goals),
            events: RwLock::new(events),
            chats: RwLock::new(chats),
        })
    }

    pub(crate) fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// Reloads every cached snapshot from the store
    ///
    /// Used by the bulk import and restore flows, which write many records
    /// directly and refresh once at the end.
    pub(crate) async fn refresh_all(&self) -> Result<()> {
        tokio::try_join!(
            self.refresh_subjects(),
            self.refresh_tasks(),
            self.refresh_exams(),
            self.refresh_notes(),
            self.refresh_goals(),
            self.refresh_events(),
            self.refresh_chats(),
        )?;
        Ok(())
    }
}

/// Loads and decodes every record of one collection
pub(crate) async fn load_collection<T: DeserializeOwned>(
    store: &LocalStore,
    collection: Collection,
) -> Result<Vec<T>> {
    let stored_records = store.get_all(collection).await?;

    let mut entities = Vec::with_capacity(stored_records.len());
    for record in stored_records {
        let id = record.get_id();
        let entity = serde_json::from_value(record.into_payload())
            .map_err(|source| Error::Corrupt { collection, id, source })?;
        entities.push(entity);
    }
    Ok(entities)
}

/// Encodes an entity into its stored JSON payload form
pub(crate) fn encode<T: Serialize>(entity: &T) -> Result<serde_json::Value> {
    serde_json::to_value(entity).map_err(Error::Codec)
}
