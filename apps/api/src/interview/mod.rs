pub mod controller;
pub mod handlers;
pub mod machine;
pub mod prompt_builder;
pub mod prompts;
pub mod questions;
pub mod scoring;
pub mod session;
pub mod store;
pub mod summary;
pub mod validation;
