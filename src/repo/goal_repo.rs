use tracing::{debug, info, instrument};

use crate::dto::CreateGoalDto;
use crate::errors::Result;
use crate::models::Goal;
use crate::store::Collection;

use super::{Repository, encode, load_collection};

impl Repository {
    /// Returns a snapshot of all goals
    pub fn get_goals(&self) -> Vec<Goal> {
        self.goals.read().expect("cache lock poisoned").clone()
    }

    /// Looks up a single goal by id
    pub fn get_goal(&self, id: &str) -> Option<Goal> {
        self.goals
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|g| g.get_id() == id)
            .cloned()
    }

    /// Creates a new goal
    ///
    /// ### Arguments
    ///
    /// * `dto` - The creation payload from the host application
    ///
    /// ### Returns
    ///
    /// The newly created goal
    ///
    /// ### Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self, dto), fields(title = %dto.title))]
    pub async fn add_goal(&self, dto: CreateGoalDto) -> Result<Goal> {
        debug!("Creating new goal");

        let goal = Goal::new(dto.title, dto.description, dto.target_date, dto.status);
        let payload = encode(&goal)?;
        self.store
            .add(Collection::Goals, &goal.get_id(), payload)
            .await?;
        self.refresh_goals().await?;

        info!("Successfully created goal with id: {}", goal.get_id());
        Ok(goal)
    }

    /// Saves a full goal record, replacing whatever is stored under its id
    #[instrument(skip(self, goal), fields(goal_id = %goal.get_id()))]
    pub async fn update_goal(&self, goal: Goal) -> Result<()> {
        let payload = encode(&goal)?;
        self.store
            .put(Collection::Goals, &goal.get_id(), payload)
            .await?;
        self.refresh_goals().await
    }

    /// Deletes a goal by id; deleting an unknown id is a no-op
    #[instrument(skip(self), fields(goal_id = %id))]
    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        self.store.remove(Collection::Goals, id).await?;
        self.refresh_goals().await
    }

    pub(crate) async fn refresh_goals(&self) -> Result<()> {
        let fresh = load_collection::<Goal>(&self.store, Collection::Goals).await?;
        *self.goals.write().expect("cache lock poisoned") = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
