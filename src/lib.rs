pub mod ai_structs;
pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod file_analyzer;
pub mod logging;
pub mod mime_gate;
pub mod models;
pub mod naming;
pub mod pipeline;
pub mod providers;
