//! In-memory ownership of the session's student records, split across logical
//! submodules.

mod catalog;
mod notice;
mod students;

pub use catalog::{CourseCatalog, UNKNOWN_COURSE};
pub use notice::{LogSink, Notice, NoticeBoard, NoticeKind, NoticeSink};
pub use students::{StoreError, StudentStore};
