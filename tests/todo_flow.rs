//! End-to-end action tests against an in-memory sqlite database

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use taskdeck::actions::{
    AdminDeleteTodoAction, ConfirmSubtasksAction, CreateTodoAction, DeleteTodoAction,
    ListAllTodosAction, ListCalendarTodosAction, ListTodosAction, ToggleTodoAction, TodoChanges,
    UpdateTodoAction,
};
use taskdeck::analyzer::ProposedSubtask;
use taskdeck::auth;
use taskdeck::config::DatabaseConfig;
use taskdeck::db::DbConnection;
use taskdeck::error::Error;
use taskdeck::migrations::Migrator;
use taskdeck::models::users;

async fn test_db() -> DbConnection {
    // In-memory sqlite needs a single connection or each pooled
    // connection sees its own empty database
    let config = DatabaseConfig::builder()
        .url("sqlite::memory:")
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(5)
        .logging(false)
        .build();

    let db = DbConnection::connect(&config)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(db.inner(), None).await.expect("run migrations");
    db
}

async fn signed_up_user(db: &DbConnection, email: &str) -> users::Model {
    let (user, _session) = auth::sign_up(db.inner(), "Test User", email, "password123")
        .await
        .expect("sign up");
    user
}

async fn promote_to_admin(db: &DbConnection, user: users::Model) -> users::Model {
    let mut active: users::ActiveModel = user.into();
    active.role = Set(users::ROLE_ADMIN.to_string());
    active.update(db.inner()).await.expect("promote user")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn sign_up_then_sign_in() {
    let db = test_db().await;
    let user = signed_up_user(&db, "alice@example.com").await;
    assert_eq!(user.role, users::ROLE_USER);

    let (signed_in, session) = auth::sign_in(db.inner(), "alice@example.com", "password123")
        .await
        .expect("sign in");
    assert_eq!(signed_in.id, user.id);
    assert_eq!(session.user_id, user.id);

    let err = auth::sign_in(db.inner(), "alice@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = test_db().await;
    signed_up_user(&db, "bob@example.com").await;

    let err = auth::sign_up(db.inner(), "Other", "bob@example.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn created_todos_list_as_nested_groups() {
    let db = test_db().await;
    let user = signed_up_user(&db, "carol@example.com").await;

    let root = CreateTodoAction::new(db.clone())
        .execute(user.id, "Plan trip".to_string(), Some(date(2099, 6, 10)), None)
        .await
        .expect("create root");
    let child = CreateTodoAction::new(db.clone())
        .execute(
            user.id,
            "Book flights".to_string(),
            Some(date(2099, 6, 5)),
            Some(root.id),
        )
        .await
        .expect("create child");

    let groups = ListTodosAction::new(db.clone()).execute(user.id).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].todo.id, root.id);
    assert_eq!(groups[0].children.len(), 1);
    assert_eq!(groups[0].children[0].id, child.id);
}

#[tokio::test]
async fn creating_under_someone_elses_parent_fails() {
    let db = test_db().await;
    let owner = signed_up_user(&db, "owner@example.com").await;
    let intruder = signed_up_user(&db, "intruder@example.com").await;

    let root = CreateTodoAction::new(db.clone())
        .execute(owner.id, "Private".to_string(), None, None)
        .await
        .unwrap();

    let err = CreateTodoAction::new(db.clone())
        .execute(intruder.id, "Sneaky".to_string(), None, Some(root.id))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn toggle_flips_completion_only_for_the_owner() {
    let db = test_db().await;
    let owner = signed_up_user(&db, "dave@example.com").await;
    let other = signed_up_user(&db, "eve@example.com").await;

    let todo = CreateTodoAction::new(db.clone())
        .execute(owner.id, "Water plants".to_string(), None, None)
        .await
        .unwrap();
    assert!(!todo.completed);

    let toggled = ToggleTodoAction::new(db.clone())
        .execute(owner.id, todo.id)
        .await
        .unwrap();
    assert!(toggled.completed);

    let err = ToggleTodoAction::new(db.clone())
        .execute(other.id, todo.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized));

    let err = ToggleTodoAction::new(db.clone())
        .execute(owner.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
}

#[tokio::test]
async fn update_applies_only_provided_fields() {
    let db = test_db().await;
    let user = signed_up_user(&db, "frank@example.com").await;

    let todo = CreateTodoAction::new(db.clone())
        .execute(user.id, "Old title".to_string(), Some(date(2099, 1, 1)), None)
        .await
        .unwrap();

    let updated = UpdateTodoAction::new(db.clone())
        .execute(
            user.id,
            todo.id,
            TodoChanges {
                title: Some("New title".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "New title");
    assert_eq!(updated.due_date, Some(date(2099, 1, 1)));
    assert!(!updated.completed);
}

#[tokio::test]
async fn delete_removes_the_todo_and_its_children() {
    let db = test_db().await;
    let user = signed_up_user(&db, "grace@example.com").await;

    let root = CreateTodoAction::new(db.clone())
        .execute(user.id, "Parent".to_string(), None, None)
        .await
        .unwrap();
    CreateTodoAction::new(db.clone())
        .execute(user.id, "Child".to_string(), None, Some(root.id))
        .await
        .unwrap();

    DeleteTodoAction::new(db.clone())
        .execute(user.id, root.id)
        .await
        .unwrap();

    let groups = ListTodosAction::new(db.clone()).execute(user.id).await.unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn confirm_creates_parent_with_latest_due_date() {
    let db = test_db().await;
    let user = signed_up_user(&db, "heidi@example.com").await;

    let subtasks = vec![
        ProposedSubtask {
            id: "1".to_string(),
            name: "Draft outline".to_string(),
            date: date(2099, 4, 1),
            parent: "Write report".to_string(),
        },
        ProposedSubtask {
            id: "2".to_string(),
            name: "Final review".to_string(),
            date: date(2099, 4, 7),
            parent: "Write report".to_string(),
        },
    ];

    let (parent, children) = ConfirmSubtasksAction::new(db.clone())
        .execute(user.id, subtasks)
        .await
        .unwrap();

    assert_eq!(parent.title, "Write report");
    assert_eq!(parent.due_date, Some(date(2099, 4, 7)));
    assert!(parent.parent_id.is_none());
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| c.parent_id == Some(parent.id)));
    assert_eq!(children[0].due_date, Some(date(2099, 4, 1)));
}

#[tokio::test]
async fn calendar_buckets_only_the_users_dated_todos() {
    let db = test_db().await;
    let user = signed_up_user(&db, "judy@example.com").await;
    let other = signed_up_user(&db, "karl@example.com").await;

    CreateTodoAction::new(db.clone())
        .execute(user.id, "Dated".to_string(), Some(date(2099, 5, 2)), None)
        .await
        .unwrap();
    CreateTodoAction::new(db.clone())
        .execute(user.id, "Also dated".to_string(), Some(date(2099, 5, 2)), None)
        .await
        .unwrap();
    CreateTodoAction::new(db.clone())
        .execute(user.id, "Undated".to_string(), None, None)
        .await
        .unwrap();
    CreateTodoAction::new(db.clone())
        .execute(other.id, "Someone else's".to_string(), Some(date(2099, 5, 2)), None)
        .await
        .unwrap();

    let days = ListCalendarTodosAction::new(db.clone())
        .execute(user.id)
        .await
        .unwrap();

    assert_eq!(days.len(), 1);
    let titles: Vec<&str> = days[&date(2099, 5, 2)]
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Dated", "Also dated"]);
}

#[tokio::test]
async fn confirm_rejects_blank_subtask_and_parent_names() {
    let db = test_db().await;
    let user = signed_up_user(&db, "mallory@example.com").await;

    let subtasks = vec![
        ProposedSubtask {
            id: "1".to_string(),
            name: "  ".to_string(),
            date: date(2099, 4, 1),
            parent: "".to_string(),
        },
        ProposedSubtask {
            id: "2".to_string(),
            name: "Valid step".to_string(),
            date: date(2099, 4, 2),
            parent: "".to_string(),
        },
    ];

    let err = ConfirmSubtasksAction::new(db.clone())
        .execute(user.id, subtasks)
        .await
        .unwrap_err();

    match err {
        Error::Validation(errors) => {
            assert!(errors.errors.contains_key("parent"));
            assert!(errors.errors.contains_key("subtasks[0].name"));
            assert!(!errors.errors.contains_key("subtasks[1].name"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let groups = ListTodosAction::new(db.clone()).execute(user.id).await.unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn confirm_rejects_an_empty_proposal() {
    let db = test_db().await;
    let user = signed_up_user(&db, "ivan@example.com").await;

    let err = ConfirmSubtasksAction::new(db.clone())
        .execute(user.id, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));
}

#[tokio::test]
async fn admin_sees_everyones_todos_and_can_delete_them() {
    let db = test_db().await;
    let alice = signed_up_user(&db, "alice2@example.com").await;
    let bob = signed_up_user(&db, "bob2@example.com").await;
    promote_to_admin(&db, bob.clone()).await;

    let root = CreateTodoAction::new(db.clone())
        .execute(alice.id, "Alice's todo".to_string(), None, None)
        .await
        .unwrap();
    CreateTodoAction::new(db.clone())
        .execute(alice.id, "Alice's subtask".to_string(), None, Some(root.id))
        .await
        .unwrap();

    let rows = ListAllTodosAction::new(db.clone()).execute().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|r| r.user_email.as_deref() == Some("alice2@example.com")));

    AdminDeleteTodoAction::new(db.clone())
        .execute(root.id)
        .await
        .unwrap();

    let rows = ListAllTodosAction::new(db.clone()).execute().await.unwrap();
    assert!(rows.is_empty());

    let err = AdminDeleteTodoAction::new(db.clone())
        .execute(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
