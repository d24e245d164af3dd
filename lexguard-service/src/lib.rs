pub mod config;
pub mod handlers;
pub mod prompts;
pub mod services;
pub mod startup;
