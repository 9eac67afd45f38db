pub mod access;
pub mod attendance;
pub mod eligibility;
pub mod enrollment;
pub mod notifications;
