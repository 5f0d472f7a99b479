//! Todo actions
//!
//! Every mutation is scoped by `(id, user_id)`. A todo that exists but
//! belongs to someone else is indistinguishable from one that does not
//! exist; both fail with `Unauthorized`.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::db::DbConnection;
use crate::error::Error;
use crate::models::todos;
use crate::organizer::{self, TodoGroup};

pub struct CreateTodoAction {
    db: DbConnection,
}

impl CreateTodoAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        title: String,
        due_date: Option<NaiveDate>,
        parent_id: Option<Uuid>,
    ) -> Result<todos::Model, Error> {
        if let Some(parent_id) = parent_id {
            let parent = todos::Entity::find()
                .filter(todos::Column::Id.eq(parent_id))
                .filter(todos::Column::UserId.eq(user_id))
                .one(self.db.inner())
                .await?;
            if parent.is_none() {
                return Err(Error::not_found("parent todo"));
            }
        }

        let now = Utc::now();
        let todo = todos::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            completed: Set(false),
            due_date: Set(due_date),
            user_id: Set(user_id),
            parent_id: Set(parent_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.inner())
        .await?;

        Ok(todo)
    }
}

pub struct ListTodosAction {
    db: DbConnection,
}

impl ListTodosAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// The user's todos, organized into root groups with nested children
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<TodoGroup>, Error> {
        let todos = todos::Entity::find()
            .filter(todos::Column::UserId.eq(user_id))
            .all(self.db.inner())
            .await?;
        Ok(organizer::organize(todos))
    }
}

pub struct ListCalendarTodosAction {
    db: DbConnection,
}

impl ListCalendarTodosAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// The user's dated todos bucketed by due date; undated todos are
    /// excluded
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<BTreeMap<NaiveDate, Vec<todos::Model>>, Error> {
        let dated = todos::Entity::find()
            .filter(todos::Column::UserId.eq(user_id))
            .filter(todos::Column::DueDate.is_not_null())
            .all(self.db.inner())
            .await?;
        Ok(organizer::group_by_due_date(dated))
    }
}

pub struct ToggleTodoAction {
    db: DbConnection,
}

impl ToggleTodoAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<todos::Model, Error> {
        let todo = todos::Entity::find()
            .filter(todos::Column::Id.eq(id))
            .filter(todos::Column::UserId.eq(user_id))
            .one(self.db.inner())
            .await?
            .ok_or(Error::Unauthorized)?;

        let result = todos::Entity::update_many()
            .col_expr(todos::Column::Completed, Expr::value(!todo.completed))
            .col_expr(todos::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(todos::Column::Id.eq(id))
            .filter(todos::Column::UserId.eq(user_id))
            .exec(self.db.inner())
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::Unauthorized);
        }

        let updated = todos::Entity::find_by_id(id)
            .one(self.db.inner())
            .await?
            .ok_or(Error::Unauthorized)?;
        Ok(updated)
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Default, Clone)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

pub struct UpdateTodoAction {
    db: DbConnection,
}

impl UpdateTodoAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: TodoChanges,
    ) -> Result<todos::Model, Error> {
        let todo = todos::Entity::find()
            .filter(todos::Column::Id.eq(id))
            .filter(todos::Column::UserId.eq(user_id))
            .one(self.db.inner())
            .await?
            .ok_or(Error::Unauthorized)?;

        let mut active: todos::ActiveModel = todo.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(due_date) = changes.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(completed) = changes.completed {
            active.completed = Set(completed);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(self.db.inner()).await?;
        Ok(updated)
    }
}

pub struct DeleteTodoAction {
    db: DbConnection,
}

impl DeleteTodoAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Delete a todo and its direct children in one transaction
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), Error> {
        self.db
            .inner()
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    todos::Entity::delete_many()
                        .filter(todos::Column::ParentId.eq(id))
                        .filter(todos::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?;

                    let result = todos::Entity::delete_many()
                        .filter(todos::Column::Id.eq(id))
                        .filter(todos::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?;

                    if result.rows_affected == 0 {
                        return Err(Error::Unauthorized);
                    }
                    Ok(())
                })
            })
            .await
            .map_err(super::unwrap_txn)
    }
}
