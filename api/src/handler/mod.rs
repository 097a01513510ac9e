pub mod health;
pub mod report;
pub mod reservation;
pub mod space;
