//! Admin actions

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::db::DbConnection;
use crate::error::Error;
use crate::models::{todos, users};

/// A todo joined with its owner, for the admin overview
#[derive(Debug, Clone, Serialize)]
pub struct AdminTodoRow {
    #[serde(flatten)]
    pub todo: todos::Model,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

pub struct ListAllTodosAction {
    db: DbConnection,
}

impl ListAllTodosAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Every todo in the system, newest first, with owner details
    pub async fn execute(&self) -> Result<Vec<AdminTodoRow>, Error> {
        let rows = todos::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(todos::Column::CreatedAt)
            .all(self.db.inner())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(todo, user)| AdminTodoRow {
                todo,
                user_name: user.as_ref().map(|u| u.name.clone()),
                user_email: user.map(|u| u.email),
            })
            .collect())
    }
}

pub struct AdminDeleteTodoAction {
    db: DbConnection,
}

impl AdminDeleteTodoAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Delete any user's todo along with its direct children
    pub async fn execute(&self, id: Uuid) -> Result<(), Error> {
        self.db
            .inner()
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    todos::Entity::delete_many()
                        .filter(todos::Column::ParentId.eq(id))
                        .exec(txn)
                        .await?;

                    let result = todos::Entity::delete_many()
                        .filter(todos::Column::Id.eq(id))
                        .exec(txn)
                        .await?;

                    if result.rows_affected == 0 {
                        return Err(Error::not_found("todo"));
                    }
                    Ok(())
                })
            })
            .await
            .map_err(super::unwrap_txn)
    }
}
