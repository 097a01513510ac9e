pub mod health;
pub mod parking;
pub mod report;
pub mod reservation;
pub mod space;
pub mod upload;
