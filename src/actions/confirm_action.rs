//! Confirming analyzer proposals
//!
//! Turns an accepted set of proposed subtasks into real rows: one parent
//! todo named after the shared parent label, due on the latest child date,
//! plus one child per subtask. All inserts happen in one transaction.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use uuid::Uuid;

use crate::analyzer::ProposedSubtask;
use crate::db::DbConnection;
use crate::error::{Error, ValidationErrors};
use crate::models::todos;

pub struct ConfirmSubtasksAction {
    db: DbConnection,
}

impl ConfirmSubtasksAction {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        subtasks: Vec<ProposedSubtask>,
    ) -> Result<(todos::Model, Vec<todos::Model>), Error> {
        if subtasks.is_empty() {
            return Err(Error::bad_request("No subtasks provided"));
        }

        // Proposals are client-editable; titles must stay non-empty
        let mut errors = ValidationErrors::new();
        if subtasks[0].parent.trim().is_empty() {
            errors.add("parent", "Parent task name cannot be empty");
        }
        for (index, subtask) in subtasks.iter().enumerate() {
            if subtask.name.trim().is_empty() {
                errors.add(
                    format!("subtasks[{}].name", index),
                    "Subtask name cannot be empty",
                );
            }
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let parent_title = subtasks[0].parent.clone();
        let parent_due = subtasks.iter().map(|s| s.date).max();

        self.db
            .inner()
            .transaction::<_, (todos::Model, Vec<todos::Model>), Error>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let parent = todos::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        title: Set(parent_title),
                        completed: Set(false),
                        due_date: Set(parent_due),
                        user_id: Set(user_id),
                        parent_id: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    let mut children = Vec::with_capacity(subtasks.len());
                    for subtask in subtasks {
                        let child = todos::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            title: Set(subtask.name),
                            completed: Set(false),
                            due_date: Set(Some(subtask.date)),
                            user_id: Set(user_id),
                            parent_id: Set(Some(parent.id)),
                            created_at: Set(now),
                            updated_at: Set(now),
                        }
                        .insert(txn)
                        .await?;
                        children.push(child);
                    }

                    Ok((parent, children))
                })
            })
            .await
            .map_err(super::unwrap_txn)
    }
}
