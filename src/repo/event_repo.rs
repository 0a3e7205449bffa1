use tracing::{debug, info, instrument};

use crate::dto::CreateEventDto;
use crate::errors::Result;
use crate::models::TimetableEvent;
use crate::store::Collection;

use super::{Repository, encode, load_collection};

impl Repository {
    /// Returns a snapshot of all timetable events
    pub fn get_events(&self) -> Vec<TimetableEvent> {
        self.events.read().expect("cache lock poisoned").clone()
    }

    /// Looks up a single event by id
    pub fn get_event(&self, id: &str) -> Option<TimetableEvent> {
        self.events
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|e| e.get_id() == id)
            .cloned()
    }

    /// Creates a new timetable event
    ///
    /// ### Arguments
    ///
    /// * `dto` - The creation payload from the host application
    ///
    /// ### Returns
    ///
    /// The newly created event
    ///
    /// ### Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self, dto), fields(title = %dto.title))]
    pub async fn add_event(&self, dto: CreateEventDto) -> Result<TimetableEvent> {
        debug!("Creating new timetable event");

        let event = TimetableEvent::new(
            dto.subject_id,
            dto.title,
            dto.date,
            dto.start_time,
            dto.end_time,
            dto.color,
        );
        let payload = encode(&event)?;
        self.store
            .add(Collection::Events, &event.get_id(), payload)
            .await?;
        self.refresh_events().await?;

        info!("Successfully created event with id: {}", event.get_id());
        Ok(event)
    }

    /// Saves a full event record, replacing whatever is stored under its id
    #[instrument(skip(self, event), fields(event_id = %event.get_id()))]
    pub async fn update_event(&self, event: TimetableEvent) -> Result<()> {
        let payload = encode(&event)?;
        self.store
            .put(Collection::Events, &event.get_id(), payload)
            .await?;
        self.refresh_events().await
    }

    /// Deletes an event by id; deleting an unknown id is a no-op
    #[instrument(skip(self), fields(event_id = %id))]
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.store.remove(Collection::Events, id).await?;
        self.refresh_events().await
    }

    pub(crate) async fn refresh_events(&self) -> Result<()> {
        let fresh = load_collection::<TimetableEvent>(&self.store, Collection::Events).await?;
        *self.events.write().expect("cache lock poisoned") = fresh;
        Ok(())
    }
}
