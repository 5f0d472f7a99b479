//! taskdeck
//!
//! A todo-list backend with hierarchical todos, a calendar view, an admin
//! overview, and an AI-assisted analyzer that breaks free-text tasks into
//! dated subtasks.

pub mod actions;
pub mod analyzer;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod http;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod organizer;
pub mod routes;
pub mod routing;
pub mod server;
