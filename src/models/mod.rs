pub mod directory;
pub mod import;
pub mod session;

pub use directory::{
    NewSectionRequest, NewSubjectRequest, NewTeacherRequest, Section, Subject, Teacher,
};
pub use import::{ImportRequest, ImportRow, ImportSummary, SkippedRow};
pub use session::{
    ClassMode, NewSessionRequest, Quarter, ScheduleFilter, Session, SessionView,
    UpdateSessionRequest,
};
