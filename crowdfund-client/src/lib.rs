//! Client-side orchestration for the crowdfunding dApp: the session stores,
//! the project query and mutation facades, and the presentation rules the
//! front-end renders with. Project accounting lives in the contract; this
//! crate only reads it, submits intents and re-reads.

pub mod abi;
pub mod auth;
pub mod config;
pub mod contract;
pub mod errors;
pub mod models;
mod mutations;
mod projects;
pub mod routes;
pub mod session;
pub mod store;
pub mod view;
pub mod wallet;

pub use mutations::{parse_duration_days, parse_ether_amount, parse_project_id};
pub use projects::total_pages_after;
pub use store::{ActionOutcome, DAppStore};
