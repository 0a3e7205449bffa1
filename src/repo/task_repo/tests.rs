use crate::models::{Priority, TaskStatus};
use crate::repo::tests::setup_test_repo;
use crate::test_utils::{sample_subject_dto, sample_task_dto};

#[tokio::test]
async fn test_add_task() {
    let repo = setup_test_repo().await;

    let subject = repo.add_subject(sample_subject_dto()).await.unwrap();
    let task = repo
        .add_task(sample_task_dto(Some(subject.get_id())))
        .await
        .unwrap();

    assert_eq!(task.get_title(), "Problem set 1");
    assert_eq!(task.get_subject_id(), Some(subject.get_id()));
    assert_eq!(task.get_priority(), Priority::Medium);
    assert_eq!(task.get_status(), TaskStatus::Pending);

    let tasks = repo.get_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].get_id(), task.get_id());
}

#[tokio::test]
async fn test_add_task_without_subject() {
    let repo = setup_test_repo().await;

    let task = repo.add_task(sample_task_dto(None)).await.unwrap();

    assert!(task.get_subject_id().is_none());
    assert_eq!(repo.get_tasks().len(), 1);
}

#[tokio::test]
async fn test_get_task_by_id() {
    let repo = setup_test_repo().await;

    let task = repo.add_task(sample_task_dto(None)).await.unwrap();

    let found = repo.get_task(&task.get_id());
    assert_eq!(found.map(|t| t.get_id()), Some(task.get_id()));
    assert!(repo.get_task("missing").is_none());
}

#[tokio::test]
async fn test_update_task_status() {
    let repo = setup_test_repo().await;

    let mut task = repo.add_task(sample_task_dto(None)).await.unwrap();
    task.set_status(TaskStatus::Submitted);
    task.set_priority(Priority::High);

    repo.update_task(task.clone()).await.unwrap();

    let tasks = repo.get_tasks();
    assert_eq!(tasks[0].get_status(), TaskStatus::Submitted);
    assert_eq!(tasks[0].get_priority(), Priority::High);
}

#[tokio::test]
async fn test_delete_task_is_idempotent() {
    let repo = setup_test_repo().await;

    let task = repo.add_task(sample_task_dto(None)).await.unwrap();

    repo.delete_task(&task.get_id()).await.unwrap();
    assert!(repo.get_tasks().is_empty());

    // Deleting the same id again is not an error
    repo.delete_task(&task.get_id()).await.unwrap();
    repo.delete_task("never-existed").await.unwrap();
}

#[tokio::test]
async fn test_tasks_survive_reopen() {
    let (store, repo) = crate::repo::tests::setup_test_repo_with_store().await;

    let task = repo.add_task(sample_task_dto(None)).await.unwrap();
    drop(repo);

    let reopened = crate::repo::Repository::open(store).await.unwrap();
    let tasks = reopened.get_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].get_id(), task.get_id());
    assert_eq!(tasks[0].get_title(), task.get_title());
}
