use tracing::{debug, info, instrument};

use crate::dto::CreateTaskDto;
use crate::errors::Result;
use crate::models::Task;
use crate::store::Collection;

use super::{Repository, encode, load_collection};

impl Repository {
    /// Returns a snapshot of all tasks
    pub fn get_tasks(&self) -> Vec<Task> {
        self.tasks.read().expect("cache lock poisoned").clone()
    }

    /// Looks up a single task by id
    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.tasks
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|t| t.get_id() == id)
            .cloned()
    }

    /// Creates a new task
    ///
    /// ### Arguments
    ///
    /// * `dto` - The creation payload from the host application
    ///
    /// ### Returns
    ///
    /// The newly created task
    ///
    /// ### Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self, dto), fields(title = %dto.title))]
    pub async fn add_task(&self, dto: CreateTaskDto) -> Result<Task> {
        debug!("Creating new task");

        let task = Task::new(
            dto.subject_id,
            dto.title,
            dto.deadline,
            dto.priority,
            dto.status,
        );
        let payload = encode(&task)?;
        self.store
            .add(Collection::Tasks, &task.get_id(), payload)
            .await?;
        self.refresh_tasks().await?;

        info!("Successfully created task with id: {}", task.get_id());
        Ok(task)
    }

    /// Saves a full task record, replacing whatever is stored under its id
    ///
    /// Saving a task whose id is not present stores it as a new record.
    #[instrument(skip(self, task), fields(task_id = %task.get_id()))]
    pub async fn update_task(&self, task: Task) -> Result<()> {
        let payload = encode(&task)?;
        self.store
            .put(Collection::Tasks, &task.get_id(), payload)
            .await?;
        self.refresh_tasks().await
    }

    /// Deletes a task by id; deleting an unknown id is a no-op
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.store.remove(Collection::Tasks, id).await?;
        self.refresh_tasks().await
    }

    pub(crate) async fn refresh_tasks(&self) -> Result<()> {
        let fresh = load_collection::<Task>(&self.store, Collection::Tasks).await?;
        *self.tasks.write().expect("cache lock poisoned") = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
