pub mod filters;
pub mod handlers;
pub mod posting;
pub mod prompts;
pub mod repository;
pub mod rewrite;
