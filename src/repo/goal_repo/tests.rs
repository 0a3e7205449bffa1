use crate::models::GoalStatus;
use crate::repo::tests::setup_test_repo;
use crate::test_utils::sample_goal_dto;

#[tokio::test]
async fn test_add_goal() {
    let repo = setup_test_repo().await;

    let goal = repo.add_goal(sample_goal_dto()).await.unwrap();

    assert_eq!(goal.get_title(), "Pass all finals");
    assert_eq!(goal.get_status(), GoalStatus::NotStarted);

    let goals = repo.get_goals();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].get_id(), goal.get_id());
}

#[tokio::test]
async fn test_get_goal_by_id() {
    let repo = setup_test_repo().await;

    let goal = repo.add_goal(sample_goal_dto()).await.unwrap();

    let found = repo.get_goal(&goal.get_id());
    assert_eq!(found.map(|g| g.get_id()), Some(goal.get_id()));
    assert!(repo.get_goal("missing").is_none());
}

#[tokio::test]
async fn test_update_goal_progress() {
    let repo = setup_test_repo().await;

    let mut goal = repo.add_goal(sample_goal_dto()).await.unwrap();
    goal.set_status(GoalStatus::InProgress);
    repo.update_goal(goal.clone()).await.unwrap();

    assert_eq!(repo.get_goals()[0].get_status(), GoalStatus::InProgress);

    goal.set_status(GoalStatus::Completed);
    repo.update_goal(goal).await.unwrap();

    assert_eq!(repo.get_goals()[0].get_status(), GoalStatus::Completed);
}

#[tokio::test]
async fn test_delete_goal_is_idempotent() {
    let repo = setup_test_repo().await;

    let goal = repo.add_goal(sample_goal_dto()).await.unwrap();

    repo.delete_goal(&goal.get_id()).await.unwrap();
    assert!(repo.get_goals().is_empty());

    repo.delete_goal(&goal.get_id()).await.unwrap();
}
