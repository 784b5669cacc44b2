//! Cloudlet scheduling disciplines.

pub mod space_shared;
pub mod time_shared;

pub use space_shared::SpaceSharedScheduler;
pub use time_shared::TimeSharedScheduler;
