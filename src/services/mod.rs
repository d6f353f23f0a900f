pub mod conflict;
pub mod import;
pub mod schedule;
pub mod timefmt;

pub use import::ImportService;
pub use schedule::ScheduleService;
