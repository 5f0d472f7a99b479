//! Actions
//!
//! One struct per use case, holding its database handle and exposing a
//! single `execute`. Controllers stay thin; everything testable lives here.

mod admin_action;
mod confirm_action;
mod todo_action;

pub use admin_action::{AdminDeleteTodoAction, AdminTodoRow, ListAllTodosAction};
pub use confirm_action::ConfirmSubtasksAction;
pub use todo_action::{
    CreateTodoAction, DeleteTodoAction, ListCalendarTodosAction, ListTodosAction,
    ToggleTodoAction, TodoChanges, UpdateTodoAction,
};

use sea_orm::TransactionError;

use crate::error::Error;

fn unwrap_txn(err: TransactionError<Error>) -> Error {
    match err {
        TransactionError::Connection(db) => Error::from(db),
        TransactionError::Transaction(e) => e,
    }
}
