pub mod history;
pub mod occupancy;
