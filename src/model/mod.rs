pub mod attendance;
pub mod configuration;
pub mod report;
pub mod role;
pub mod shift;
pub mod summary;
