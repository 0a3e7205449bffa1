use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::csv::{self, HeaderMap};
use crate::errors::{Error, Result};
use crate::ids;
use crate::models::{
    Exam, Goal, GoalStatus, Priority, Subject, SubjectKind, Task, TaskStatus, TimetableEvent,
};
use crate::repo::{Repository, encode, load_collection};
use crate::store::Collection;

/// Counts produced by a bulk CSV import
///
/// `imported` is the number of records actually written; `skipped` counts
/// rows that were too short or had no title. The two never overlap, so
/// `imported + skipped` is the number of data rows in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Canonical download file name for a CSV export of the collection
///
/// Events travel as `timetable.csv`; notes and chats have no CSV form.
pub fn csv_file_name(collection: Collection) -> Option<&'static str> {
    match collection {
        Collection::Subjects => Some("subjects.csv"),
        Collection::Tasks => Some("tasks.csv"),
        Collection::Exams => Some("exams.csv"),
        Collection::Goals => Some("goals.csv"),
        Collection::Events => Some("timetable.csv"),
        Collection::Notes | Collection::Chats => None,
    }
}

/// Canonical file name for a full JSON backup taken today
pub fn backup_file_name() -> String {
    format!("studivance-backup-{}.json", ids::today_string())
}

impl Repository {
    /// Renders every subject as CSV
    ///
    /// Columns are `title,type,instructor,semester,progress,color`, the
    /// subject's own fields minus the id. An empty collection renders as
    /// the empty string, with no header row.
    ///
    /// ### Returns
    ///
    /// The CSV text, without a trailing newline
    #[instrument(skip(self))]
    pub async fn export_subjects_csv(&self) -> Result<String> {
        let subjects: Vec<Subject> = load_collection(self.store(), Collection::Subjects).await?;
        if subjects.is_empty() {
            return Ok(String::new());
        }

        let mut rows = vec![header_row(&[
            "title",
            "type",
            "instructor",
            "semester",
            "progress",
            "color",
        ])];
        for subject in &subjects {
            rows.push(vec![
                subject.get_title(),
                subject.get_kind().to_string(),
                subject.get_instructor().unwrap_or_default(),
                subject.get_semester().unwrap_or_default(),
                subject.get_progress().to_string(),
                subject.get_color(),
            ]);
        }
        Ok(csv::to_csv(&rows))
    }

    /// Renders every task as CSV
    ///
    /// Columns are `Title,Subject,Deadline,Priority,Status`. The subject
    /// column carries the subject's title, `General` for tasks without
    /// one, and `Unknown` when the referenced subject no longer exists.
    #[instrument(skip(self))]
    pub async fn export_tasks_csv(&self) -> Result<String> {
        let tasks: Vec<Task> = load_collection(self.store(), Collection::Tasks).await?;
        if tasks.is_empty() {
            return Ok(String::new());
        }
        let titles = self.subject_titles_by_id().await?;

        let mut rows = vec![header_row(&[
            "Title", "Subject", "Deadline", "Priority", "Status",
        ])];
        for task in &tasks {
            let subject = match task.get_subject_id() {
                Some(id) => titles
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                None => "General".to_string(),
            };
            rows.push(vec![
                task.get_title(),
                subject,
                task.get_deadline(),
                task.get_priority().to_string(),
                task.get_status().to_string(),
            ]);
        }
        Ok(csv::to_csv(&rows))
    }

    /// Renders every exam as CSV
    ///
    /// Columns are `Title,Subject,Date,Type`, with `Unknown` when the
    /// exam's subject cannot be resolved.
    #[instrument(skip(self))]
    pub async fn export_exams_csv(&self) -> Result<String> {
        let exams: Vec<Exam> = load_collection(self.store(), Collection::Exams).await?;
        if exams.is_empty() {
            return Ok(String::new());
        }
        let titles = self.subject_titles_by_id().await?;

        let mut rows = vec![header_row(&["Title", "Subject", "Date", "Type"])];
        for exam in &exams {
            let subject = titles
                .get(&exam.get_subject_id())
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());
            rows.push(vec![
                exam.get_title(),
                subject,
                exam.get_date(),
                exam.get_kind().to_string(),
            ]);
        }
        Ok(csv::to_csv(&rows))
    }

    /// Renders every goal as CSV with columns
    /// `Title,Description,TargetDate,Status`
    #[instrument(skip(self))]
    pub async fn export_goals_csv(&self) -> Result<String> {
        let goals: Vec<Goal> = load_collection(self.store(), Collection::Goals).await?;
        if goals.is_empty() {
            return Ok(String::new());
        }

        let mut rows = vec![header_row(&["Title", "Description", "TargetDate", "Status"])];
        for goal in &goals {
            rows.push(vec![
                goal.get_title(),
                goal.get_description(),
                goal.get_target_date(),
                goal.get_status().to_string(),
            ]);
        }
        Ok(csv::to_csv(&rows))
    }

    /// Renders every timetable event as CSV
    ///
    /// Columns are `Title,Subject,Date,StartTime,EndTime`. The subject
    /// column carries the subject's title, `Custom Event` for events
    /// without one, and `Unknown` when the referenced subject no longer
    /// exists.
    #[instrument(skip(self))]
    pub async fn export_events_csv(&self) -> Result<String> {
        let events: Vec<TimetableEvent> =
            load_collection(self.store(), Collection::Events).await?;
        if events.is_empty() {
            return Ok(String::new());
        }
        let titles = self.subject_titles_by_id().await?;

        let mut rows = vec![header_row(&[
            "Title",
            "Subject",
            "Date",
            "StartTime",
            "EndTime",
        ])];
        for event in &events {
            let subject = match event.get_subject_id() {
                Some(id) => titles
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                None => "Custom Event".to_string(),
            };
            rows.push(vec![
                event.get_title(),
                subject,
                event.get_date(),
                event.get_start_time(),
                event.get_end_time(),
            ]);
        }
        Ok(csv::to_csv(&rows))
    }

    /// Imports subjects from CSV text
    ///
    /// Expects the column layout written by `export_subjects_csv`,
    /// matched case-insensitively. Rows shorter than half the header
    /// count and rows without a title are skipped. Absent or blank
    /// fields fall back to type Theory, progress 0, and color `#1C1C1C`;
    /// blank instructor and semester cells import as no value at all.
    /// Every imported subject gets a fresh id.
    ///
    /// ### Arguments
    ///
    /// * `text` - The CSV file contents
    ///
    /// ### Returns
    ///
    /// An [`ImportReport`] with imported and skipped row counts
    ///
    /// ### Errors
    ///
    /// Returns `Error::MalformedImport` when the file has fewer than two
    /// rows or no title column.
    #[instrument(skip(self, text))]
    pub async fn import_subjects_csv(&self, text: &str) -> Result<ImportReport> {
        let (headers, rows) = parse_import(text)?;

        let mut batch = Vec::new();
        let mut skipped = 0;
        for (index, row) in rows.iter().enumerate() {
            if row.len() * 2 < headers.len() {
                warn!(row = index, "Skipping short subject row");
                skipped += 1;
                continue;
            }
            let title = headers.get(row, "title");
            if title.is_empty() {
                warn!(row = index, "Skipping subject row without a title");
                skipped += 1;
                continue;
            }

            let kind: SubjectKind = headers.get(row, "type").parse().unwrap_or_default();
            let instructor = non_empty(headers.get(row, "instructor"));
            let semester = non_empty(headers.get(row, "semester"));
            let color = cell_or(headers.get(row, "color"), "#1C1C1C");
            let progress = headers.get(row, "progress").parse().unwrap_or(0);

            let mut subject = Subject::new(title.to_string(), kind, instructor, semester, color);
            subject.set_progress(progress);
            batch.push((subject.get_id(), encode(&subject)?));
        }

        let report = ImportReport {
            imported: batch.len(),
            skipped,
        };
        let written = self.write_batch(Collection::Subjects, batch).await;
        self.refresh_subjects().await?;
        written?;

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "Imported subjects from CSV"
        );
        Ok(report)
    }

    /// Imports tasks from CSV text
    ///
    /// Expects the column layout written by `export_tasks_csv`. The
    /// subject column is matched case-insensitively against current
    /// subject titles; an unmatched or blank name imports as a general
    /// task. Absent or blank fields fall back to a deadline of today,
    /// Medium priority, and Pending status.
    ///
    /// ### Errors
    ///
    /// Returns `Error::MalformedImport` when the file has fewer than two
    /// rows or no title column.
    #[instrument(skip(self, text))]
    pub async fn import_tasks_csv(&self, text: &str) -> Result<ImportReport> {
        let (headers, rows) = parse_import(text)?;
        let subjects = self.subjects_by_lower_title().await?;

        let mut batch = Vec::new();
        let mut skipped = 0;
        for (index, row) in rows.iter().enumerate() {
            if row.len() * 2 < headers.len() {
                warn!(row = index, "Skipping short task row");
                skipped += 1;
                continue;
            }
            let title = headers.get(row, "title");
            if title.is_empty() {
                warn!(row = index, "Skipping task row without a title");
                skipped += 1;
                continue;
            }

            let subject_name = headers.get(row, "subject");
            let subject_id = if subject_name.is_empty() {
                None
            } else {
                subjects
                    .get(&subject_name.to_lowercase())
                    .map(Subject::get_id)
            };
            let deadline = cell_or(headers.get(row, "deadline"), &ids::today_string());
            let priority: Priority = headers.get(row, "priority").parse().unwrap_or_default();
            let status: TaskStatus = headers.get(row, "status").parse().unwrap_or_default();

            let task = Task::new(subject_id, title.to_string(), deadline, priority, status);
            batch.push((task.get_id(), encode(&task)?));
        }

        let report = ImportReport {
            imported: batch.len(),
            skipped,
        };
        let written = self.write_batch(Collection::Tasks, batch).await;
        self.refresh_tasks().await?;
        written?;

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "Imported tasks from CSV"
        );
        Ok(report)
    }

    /// Imports exams from CSV text
    ///
    /// Expects the column layout written by `export_exams_csv`. An
    /// unmatched subject name imports with an empty subject id; absent
    /// or blank fields fall back to a date of today and type Theory.
    ///
    /// ### Errors
    ///
    /// Returns `Error::MalformedImport` when the file has fewer than two
    /// rows or no title column.
    #[instrument(skip(self, text))]
    pub async fn import_exams_csv(&self, text: &str) -> Result<ImportReport> {
        let (headers, rows) = parse_import(text)?;
        let subjects = self.subjects_by_lower_title().await?;

        let mut batch = Vec::new();
        let mut skipped = 0;
        for (index, row) in rows.iter().enumerate() {
            if row.len() * 2 < headers.len() {
                warn!(row = index, "Skipping short exam row");
                skipped += 1;
                continue;
            }
            let title = headers.get(row, "title");
            if title.is_empty() {
                warn!(row = index, "Skipping exam row without a title");
                skipped += 1;
                continue;
            }

            let subject_name = headers.get(row, "subject");
            let subject_id = if subject_name.is_empty() {
                String::new()
            } else {
                subjects
                    .get(&subject_name.to_lowercase())
                    .map(Subject::get_id)
                    .unwrap_or_default()
            };
            let date = cell_or(headers.get(row, "date"), &ids::today_string());
            let kind: SubjectKind = headers.get(row, "type").parse().unwrap_or_default();

            let exam = Exam::new(subject_id, title.to_string(), date, kind);
            batch.push((exam.get_id(), encode(&exam)?));
        }

        let report = ImportReport {
            imported: batch.len(),
            skipped,
        };
        let written = self.write_batch(Collection::Exams, batch).await;
        self.refresh_exams().await?;
        written?;

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "Imported exams from CSV"
        );
        Ok(report)
    }

    /// Imports goals from CSV text
    ///
    /// Expects the column layout written by `export_goals_csv`. Absent
    /// or blank fields fall back to an empty description, a target date
    /// of today, and Not Started status.
    ///
    /// ### Errors
    ///
    /// Returns `Error::MalformedImport` when the file has fewer than two
    /// rows or no title column.
    #[instrument(skip(self, text))]
    pub async fn import_goals_csv(&self, text: &str) -> Result<ImportReport> {
        let (headers, rows) = parse_import(text)?;

        let mut batch = Vec::new();
        let mut skipped = 0;
        for (index, row) in rows.iter().enumerate() {
            if row.len() * 2 < headers.len() {
                warn!(row = index, "Skipping short goal row");
                skipped += 1;
                continue;
            }
            let title = headers.get(row, "title");
            if title.is_empty() {
                warn!(row = index, "Skipping goal row without a title");
                skipped += 1;
                continue;
            }

            let description = headers.get(row, "description").to_string();
            let target_date = cell_or(headers.get(row, "targetdate"), &ids::today_string());
            let status: GoalStatus = headers.get(row, "status").parse().unwrap_or_default();

            let goal = Goal::new(title.to_string(), description, target_date, status);
            batch.push((goal.get_id(), encode(&goal)?));
        }

        let report = ImportReport {
            imported: batch.len(),
            skipped,
        };
        let written = self.write_batch(Collection::Goals, batch).await;
        self.refresh_goals().await?;
        written?;

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "Imported goals from CSV"
        );
        Ok(report)
    }

    /// Imports timetable events from CSV text
    ///
    /// Expects the column layout written by `export_events_csv`. An
    /// unmatched or blank subject name imports as a custom event; a
    /// resolved subject also lends the event its color. Absent or blank
    /// fields fall back to a date of today and a 09:00 to 10:00 slot,
    /// with color `#1C1C1C` when no subject supplies one.
    ///
    /// ### Errors
    ///
    /// Returns `Error::MalformedImport` when the file has fewer than two
    /// rows or no title column.
    #[instrument(skip(self, text))]
    pub async fn import_events_csv(&self, text: &str) -> Result<ImportReport> {
        let (headers, rows) = parse_import(text)?;
        let subjects = self.subjects_by_lower_title().await?;

        let mut batch = Vec::new();
        let mut skipped = 0;
        for (index, row) in rows.iter().enumerate() {
            if row.len() * 2 < headers.len() {
                warn!(row = index, "Skipping short event row");
                skipped += 1;
                continue;
            }
            let title = headers.get(row, "title");
            if title.is_empty() {
                warn!(row = index, "Skipping event row without a title");
                skipped += 1;
                continue;
            }

            let subject_name = headers.get(row, "subject");
            let subject = if subject_name.is_empty() {
                None
            } else {
                subjects.get(&subject_name.to_lowercase())
            };
            let date = cell_or(headers.get(row, "date"), &ids::today_string());
            let start_time = cell_or(headers.get(row, "starttime"), "09:00");
            let end_time = cell_or(headers.get(row, "endtime"), "10:00");
            let color = subject
                .map(Subject::get_color)
                .unwrap_or_else(|| "#1C1C1C".to_string());

            let event = TimetableEvent::new(
                subject.map(Subject::get_id),
                title.to_string(),
                date,
                start_time,
                end_time,
                color,
            );
            batch.push((event.get_id(), encode(&event)?));
        }

        let report = ImportReport {
            imported: batch.len(),
            skipped,
        };
        let written = self.write_batch(Collection::Events, batch).await;
        self.refresh_events().await?;
        written?;

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "Imported events from CSV"
        );
        Ok(report)
    }

    /// Serializes every collection into one pretty-printed JSON object
    ///
    /// Keys are collection names and values are arrays of the raw stored
    /// payloads, untouched by any entity type, so a backup restores
    /// bit-for-bit through `restore_json`.
    #[instrument(skip(self))]
    pub async fn backup_json(&self) -> Result<String> {
        let mut backup = serde_json::Map::new();
        for collection in Collection::ALL {
            let records = self.store().get_all(collection).await?;
            let payloads: Vec<serde_json::Value> = records
                .into_iter()
                .map(|record| record.into_payload())
                .collect();
            backup.insert(
                collection.as_str().to_string(),
                serde_json::Value::Array(payloads),
            );
        }

        info!("Created full backup");
        serde_json::to_string_pretty(&serde_json::Value::Object(backup)).map_err(Error::Codec)
    }

    /// Replaces the contents of every collection from a backup produced
    /// by `backup_json`
    ///
    /// The whole file is validated before anything is touched, then each
    /// collection is cleared and repopulated verbatim. A storage failure
    /// partway leaves earlier collections restored; the caches are
    /// refreshed to whatever the store now holds either way.
    ///
    /// ### Returns
    ///
    /// The total number of records restored
    ///
    /// ### Errors
    ///
    /// Returns `Error::MalformedImport` when the text is not a JSON
    /// object, a collection key is missing, a collection is not an
    /// array, or a record lacks a string `id`.
    #[instrument(skip(self, text))]
    pub async fn restore_json(&self, text: &str) -> Result<usize> {
        let backup: serde_json::Value = serde_json::from_str(text)
            .map_err(|err| Error::malformed(format!("not valid JSON: {err}")))?;
        let Some(backup) = backup.as_object() else {
            return Err(Error::malformed("top level is not an object"));
        };

        let mut batches = Vec::new();
        let mut total = 0;
        for collection in Collection::ALL {
            let Some(value) = backup.get(collection.as_str()) else {
                return Err(Error::malformed(format!("missing collection: {collection}")));
            };
            let Some(records) = value.as_array() else {
                return Err(Error::malformed(format!(
                    "collection {collection} is not an array"
                )));
            };

            let mut batch = Vec::with_capacity(records.len());
            for record in records {
                let Some(id) = record.get("id").and_then(serde_json::Value::as_str) else {
                    return Err(Error::malformed(format!(
                        "record in {collection} has no string id"
                    )));
                };
                batch.push((id.to_string(), record.clone()));
            }
            total += batch.len();
            batches.push((collection, batch));
        }

        let restored = self.restore_batches(batches).await;
        self.refresh_all().await?;
        restored?;

        info!(total, "Restored all collections from backup");
        Ok(total)
    }

    /// Maps subject id to title for export lookups
    async fn subject_titles_by_id(&self) -> Result<HashMap<String, String>> {
        let subjects: Vec<Subject> = load_collection(self.store(), Collection::Subjects).await?;
        Ok(subjects
            .into_iter()
            .map(|subject| (subject.get_id(), subject.get_title()))
            .collect())
    }

    /// Maps lowercased title to subject for import lookups
    async fn subjects_by_lower_title(&self) -> Result<HashMap<String, Subject>> {
        let subjects: Vec<Subject> = load_collection(self.store(), Collection::Subjects).await?;
        Ok(subjects
            .into_iter()
            .map(|subject| (subject.get_title().to_lowercase(), subject))
            .collect())
    }

    /// Adds every record of a pre-encoded batch to one collection
    async fn write_batch(
        &self,
        collection: Collection,
        batch: Vec<(String, serde_json::Value)>,
    ) -> Result<()> {
        for (id, payload) in batch {
            self.store().add(collection, &id, payload).await?;
        }
        Ok(())
    }

    /// Clears and rewrites each collection in turn
    async fn restore_batches(
        &self,
        batches: Vec<(Collection, Vec<(String, serde_json::Value)>)>,
    ) -> Result<()> {
        for (collection, batch) in batches {
            self.store().clear(collection).await?;
            self.write_batch(collection, batch).await?;
        }
        Ok(())
    }
}

/// Splits parsed CSV into a header map and data rows
///
/// Fails when the file cannot hold at least a header row and one data
/// row, or when no title column is present.
fn parse_import(text: &str) -> Result<(HeaderMap, Vec<Vec<String>>)> {
    let mut parsed = csv::parse_csv(text);
    if parsed.len() < 2 {
        return Err(Error::malformed("file is empty or not CSV"));
    }

    let headers = HeaderMap::new(&parsed[0]);
    if !headers.contains("title") {
        return Err(Error::malformed("missing required title column"));
    }

    let rows = parsed.split_off(1);
    Ok((headers, rows))
}

fn header_row(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn cell_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
