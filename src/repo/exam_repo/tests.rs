use crate::models::SubjectKind;
use crate::repo::tests::setup_test_repo;
use crate::test_utils::{sample_exam_dto, sample_subject_dto};

#[tokio::test]
async fn test_add_exam() {
    let repo = setup_test_repo().await;

    let subject = repo.add_subject(sample_subject_dto()).await.unwrap();
    let exam = repo.add_exam(sample_exam_dto(&subject.get_id())).await.unwrap();

    assert_eq!(exam.get_title(), "Midterm");
    assert_eq!(exam.get_subject_id(), subject.get_id());
    assert_eq!(exam.get_kind(), SubjectKind::Theory);

    let exams = repo.get_exams();
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0].get_id(), exam.get_id());
}

#[tokio::test]
async fn test_get_exam_by_id() {
    let repo = setup_test_repo().await;

    let subject = repo.add_subject(sample_subject_dto()).await.unwrap();
    let exam = repo.add_exam(sample_exam_dto(&subject.get_id())).await.unwrap();

    let found = repo.get_exam(&exam.get_id());
    assert_eq!(found.map(|e| e.get_id()), Some(exam.get_id()));
    assert!(repo.get_exam("missing").is_none());
}

#[tokio::test]
async fn test_update_exam_date() {
    let repo = setup_test_repo().await;

    let subject = repo.add_subject(sample_subject_dto()).await.unwrap();
    let mut exam = repo.add_exam(sample_exam_dto(&subject.get_id())).await.unwrap();
    exam.set_date("2026-11-20".to_string());

    repo.update_exam(exam).await.unwrap();

    assert_eq!(repo.get_exams()[0].get_date(), "2026-11-20");
}

#[tokio::test]
async fn test_delete_exam_is_idempotent() {
    let repo = setup_test_repo().await;

    let subject = repo.add_subject(sample_subject_dto()).await.unwrap();
    let exam = repo.add_exam(sample_exam_dto(&subject.get_id())).await.unwrap();

    repo.delete_exam(&exam.get_id()).await.unwrap();
    assert!(repo.get_exams().is_empty());

    repo.delete_exam(&exam.get_id()).await.unwrap();
}
