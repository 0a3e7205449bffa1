use tracing::{debug, info, instrument, warn};

use crate::dto::CreateSubjectDto;
use crate::errors::Result;
use crate::models::Subject;
use crate::store::Collection;

use super::{Repository, encode, load_collection};

/// The outcome of a subject cascade delete
///
/// The cascade is best-effort: every dependent record is attempted even
/// when an earlier removal fails, and the report lists both what was
/// removed and what was not.
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    /// Records removed, in removal order
    pub deleted: Vec<(Collection, String)>,
    /// Records that could not be removed
    pub failed: Vec<CascadeFailure>,
}

impl CascadeReport {
    /// True when every dependent record and the subject itself were removed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// One record the cascade failed to remove
#[derive(Debug, Clone)]
pub struct CascadeFailure {
    pub collection: Collection,
    pub id: String,
    pub reason: String,
}

impl Repository {
    /// Returns a snapshot of all subjects
    pub fn get_subjects(&self) -> Vec<Subject> {
        self.subjects.read().expect("cache lock poisoned").clone()
    }

    /// Looks up a single subject by id
    pub fn get_subject(&self, id: &str) -> Option<Subject> {
        self.subjects
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|s| s.get_id() == id)
            .cloned()
    }

    /// Creates a new subject
    ///
    /// The subject starts with zero progress; id assignment happens here.
    ///
    /// ### Arguments
    ///
    /// * `dto` - The creation payload from the host application
    ///
    /// ### Returns
    ///
    /// The newly created subject
    ///
    /// ### Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self, dto), fields(title = %dto.title))]
    pub async fn add_subject(&self, dto: CreateSubjectDto) -> Result<Subject> {
        debug!("Creating new subject");

        let subject = Subject::new(dto.title, dto.kind, dto.instructor, dto.semester, dto.color);
        let payload = encode(&subject)?;
        self.store
            .add(Collection::Subjects, &subject.get_id(), payload)
            .await?;
        self.refresh_subjects().await?;

        info!("Successfully created subject with id: {}", subject.get_id());
        Ok(subject)
    }

    /// Saves a full subject record, replacing whatever is stored under its id
    ///
    /// Saving a subject whose id is not present stores it as a new record.
    #[instrument(skip(self, subject), fields(subject_id = %subject.get_id()))]
    pub async fn update_subject(&self, subject: Subject) -> Result<()> {
        let payload = encode(&subject)?;
        self.store
            .put(Collection::Subjects, &subject.get_id(), payload)
            .await?;
        self.refresh_subjects().await
    }

    /// Deletes a subject together with its dependent records
    ///
    /// Tasks, exams, and notes referencing the subject are removed first;
    /// the subject itself is removed only once every dependent went. The
    /// cascade never stops at the first failure: each removal is attempted
    /// independently and the outcome of all of them is reported. Timetable
    /// events are not part of the cascade and keep their subject reference.
    ///
    /// ### Arguments
    ///
    /// * `id` - The id of the subject to delete
    ///
    /// ### Returns
    ///
    /// A report listing removed records and any that could not be removed
    ///
    /// ### Errors
    ///
    /// Returns an error only when refreshing the caches afterwards fails;
    /// individual removal failures are carried in the report instead.
    #[instrument(skip(self), fields(subject_id = %id))]
    pub async fn delete_subject(&self, id: &str) -> Result<CascadeReport> {
        debug!("Deleting subject with cascade");

        let mut report = CascadeReport::default();

        let dependent_tasks: Vec<String> = self
            .get_tasks()
            .into_iter()
            .filter(|t| t.get_subject_id().as_deref() == Some(id))
            .map(|t| t.get_id())
            .collect();
        let dependent_exams: Vec<String> = self
            .get_exams()
            .into_iter()
            .filter(|e| e.get_subject_id() == id)
            .map(|e| e.get_id())
            .collect();
        let dependent_notes: Vec<String> = self
            .get_notes()
            .into_iter()
            .filter(|n| n.get_subject_id().as_deref() == Some(id))
            .map(|n| n.get_id())
            .collect();

        for (collection, ids) in [
            (Collection::Tasks, dependent_tasks),
            (Collection::Exams, dependent_exams),
            (Collection::Notes, dependent_notes),
        ] {
            for record_id in ids {
                match self.store.remove(collection, &record_id).await {
                    Ok(()) => report.deleted.push((collection, record_id)),
                    Err(err) => {
                        warn!(collection = %collection, id = %record_id, error = %err, "Cascade removal failed");
                        report.failed.push(CascadeFailure {
                            collection,
                            id: record_id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        // The subject goes last, and only once all its dependents are gone,
        // so a partial cascade can be re-run.
        if report.failed.is_empty() {
            match self.store.remove(Collection::Subjects, id).await {
                Ok(()) => report.deleted.push((Collection::Subjects, id.to_string())),
                Err(err) => {
                    warn!(subject_id = %id, error = %err, "Subject removal failed");
                    report.failed.push(CascadeFailure {
                        collection: Collection::Subjects,
                        id: id.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        } else {
            warn!(
                failed = report.failed.len(),
                "Keeping subject: cascade incomplete"
            );
        }

        // Caches must reflect whatever the cascade actually removed
        tokio::try_join!(
            self.refresh_subjects(),
            self.refresh_tasks(),
            self.refresh_exams(),
            self.refresh_notes(),
        )?;

        info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Subject cascade finished"
        );
        Ok(report)
    }

    pub(crate) async fn refresh_subjects(&self) -> Result<()> {
        let fresh = load_collection::<Subject>(&self.store, Collection::Subjects).await?;
        *self.subjects.write().expect("cache lock poisoned") = fresh;
        Ok(())
    }
}
