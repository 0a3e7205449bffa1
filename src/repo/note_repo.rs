use tracing::{debug, info, instrument};

use crate::dto::CreateNoteDto;
use crate::errors::Result;
use crate::models::Note;
use crate::store::Collection;

use super::{Repository, encode, load_collection};

impl Repository {
    /// Returns a snapshot of all notes
    pub fn get_notes(&self) -> Vec<Note> {
        self.notes.read().expect("cache lock poisoned").clone()
    }

    /// Looks up a single note by id
    pub fn get_note(&self, id: &str) -> Option<Note> {
        self.notes
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|n| n.get_id() == id)
            .cloned()
    }

    /// Returns the notes that belong to one subject, in stored order
    pub fn get_notes_for_subject(&self, subject_id: &str) -> Vec<Note> {
        self.notes
            .read()
            .expect("cache lock poisoned")
            .iter()
            .filter(|n| n.get_subject_id().as_deref() == Some(subject_id))
            .cloned()
            .collect()
    }

    /// Creates a new note
    ///
    /// Both timestamps are stamped here and start equal; the note begins
    /// unread and not important. An empty-string subject or topic coming
    /// from the host's forms is normalized to no value.
    ///
    /// ### Arguments
    ///
    /// * `dto` - The creation payload from the host application
    ///
    /// ### Returns
    ///
    /// The newly created note
    ///
    /// ### Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self, dto), fields(title = %dto.title))]
    pub async fn add_note(&self, dto: CreateNoteDto) -> Result<Note> {
        debug!("Creating new note");

        let subject_id = dto.subject_id.filter(|s| !s.is_empty());
        let topic = dto.topic.filter(|t| !t.is_empty());
        let note = Note::new(
            subject_id,
            topic,
            dto.title,
            dto.content,
            dto.attachments,
            dto.tags,
        );
        let payload = encode(&note)?;
        self.store
            .add(Collection::Notes, &note.get_id(), payload)
            .await?;
        self.refresh_notes().await?;

        info!("Successfully created note with id: {}", note.get_id());
        Ok(note)
    }

    /// Saves a full note record, stamping its modification time
    ///
    /// The note's `last_modified` is advanced to now before the write, so
    /// every update through the repository moves it forward. Saving a note
    /// whose id is not present stores it as a new record.
    ///
    /// ### Returns
    ///
    /// The note as stored, with its refreshed modification time
    #[instrument(skip(self, note), fields(note_id = %note.get_id()))]
    pub async fn update_note(&self, mut note: Note) -> Result<Note> {
        note.touch();
        let payload = encode(&note)?;
        self.store
            .put(Collection::Notes, &note.get_id(), payload)
            .await?;
        self.refresh_notes().await?;
        Ok(note)
    }

    /// Deletes a note by id; deleting an unknown id is a no-op
    #[instrument(skip(self), fields(note_id = %id))]
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        self.store.remove(Collection::Notes, id).await?;
        self.refresh_notes().await
    }

    pub(crate) async fn refresh_notes(&self) -> Result<()> {
        let fresh = load_collection::<Note>(&self.store, Collection::Notes).await?;
        *self.notes.write().expect("cache lock poisoned") = fresh;
        Ok(())
    }
}
