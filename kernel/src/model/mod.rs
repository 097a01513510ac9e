pub mod id;
pub mod report;
pub mod reservation;
pub mod space;
