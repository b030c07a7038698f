pub mod classify;
pub mod client_env;
pub mod config;
pub mod history;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod privacy;
pub mod session;
