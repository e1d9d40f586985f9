// src/handlers/mod.rs
pub mod projects;
pub mod status;
