#![doc = "The `taskkeeper` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, credential and task stores, token"]
#![doc = "authentication, routing configuration, and error handling of the TaskKeeper"]
#![doc = "backend. The binary (`main.rs`) wires them to PostgreSQL and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
