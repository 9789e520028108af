pub mod cli;
pub mod config;
pub mod decision;
pub mod error;
pub mod event;
pub mod ipc;
pub mod process;
pub mod security;
