use tracing::{debug, info, instrument};

use crate::dto::CreateExamDto;
use crate::errors::Result;
use crate::models::Exam;
use crate::store::Collection;

use super::{Repository, encode, load_collection};

impl Repository {
    /// Returns a snapshot of all exams
    pub fn get_exams(&self) -> Vec<Exam> {
        self.exams.read().expect("cache lock poisoned").clone()
    }

    /// Looks up a single exam by id
    pub fn get_exam(&self, id: &str) -> Option<Exam> {
        self.exams
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|e| e.get_id() == id)
            .cloned()
    }

    /// Creates a new exam
    ///
    /// ### Arguments
    ///
    /// * `dto` - The creation payload from the host application
    ///
    /// ### Returns
    ///
    /// The newly created exam
    ///
    /// ### Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self, dto), fields(title = %dto.title))]
    pub async fn add_exam(&self, dto: CreateExamDto) -> Result<Exam> {
        debug!("Creating new exam");

        let exam = Exam::new(dto.subject_id, dto.title, dto.date, dto.kind);
        let payload = encode(&exam)?;
        self.store
            .add(Collection::Exams, &exam.get_id(), payload)
            .await?;
        self.refresh_exams().await?;

        info!("Successfully created exam with id: {}", exam.get_id());
        Ok(exam)
    }

    /// Saves a full exam record, replacing whatever is stored under its id
    #[instrument(skip(self, exam), fields(exam_id = %exam.get_id()))]
    pub async fn update_exam(&self, exam: Exam) -> Result<()> {
        let payload = encode(&exam)?;
        self.store
            .put(Collection::Exams, &exam.get_id(), payload)
            .await?;
        self.refresh_exams().await
    }

    /// Deletes an exam by id; deleting an unknown id is a no-op
    #[instrument(skip(self), fields(exam_id = %id))]
    pub async fn delete_exam(&self, id: &str) -> Result<()> {
        self.store.remove(Collection::Exams, id).await?;
        self.refresh_exams().await
    }

    pub(crate) async fn refresh_exams(&self) -> Result<()> {
        let fresh = load_collection::<Exam>(&self.store, Collection::Exams).await?;
        *self.exams.write().expect("cache lock poisoned") = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
