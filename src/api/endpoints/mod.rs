pub mod care_events;
pub mod documents;
pub mod health;
pub mod reports;
pub mod residents;
