pub mod database;
pub mod file;
pub mod memory;
pub mod repository;
pub mod upload;
