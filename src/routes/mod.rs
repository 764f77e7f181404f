pub mod announcements;
pub mod extract;
pub mod health;
pub mod metrics;
