pub mod announcements;
pub mod auth;
pub mod clock;
pub mod metrics;
pub mod timestamps;
