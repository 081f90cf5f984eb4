//! Decision-support service for selecting 4D BIM scheduling software.

// Core error handling
pub mod errors;

// Matching core
pub mod matcher;

// Data model
pub mod project;
pub mod software;

// Project repository
pub mod store;
pub mod store_json;
pub mod store_sled;

// Roles & request policy
pub mod role;
pub mod role_policy;

// Configuration & CLI
pub mod cli;
pub mod config;

// Web server interface
pub mod app_state;
pub mod web;


pub use errors::{DssError, DssResult};
pub use matcher::{
    exact_constraint_match, max_score, nearest_neighbours, proximity, software_scores, Neighbour,
};
pub use project::{AttributeVector, ConstraintVector, ProjectRecord};
pub use software::SoftwareApp;
