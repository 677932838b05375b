use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Whether a mutating store operation went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Transient, user-facing outcome of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

/// Fire-and-forget receiver for store notices.
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

/// Sink that only writes notices to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl NoticeSink for LogSink {
    fn notify(&mut self, notice: Notice) {
        log_notice(&notice);
    }
}

/// Shared queue of notices. The store owns one handle and the UI keeps a
/// clone so it can drain pending notices into its status line after each
/// action. Single-threaded on purpose: the whole app runs on one thread.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    pending: Rc<RefCell<VecDeque<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl NoticeSink for NoticeBoard {
    fn notify(&mut self, notice: Notice) {
        log_notice(&notice);
        self.pending.borrow_mut().push_back(notice);
    }
}

fn log_notice(notice: &Notice) {
    match notice.kind {
        NoticeKind::Success => tracing::info!(message = %notice.message, "notice"),
        NoticeKind::Failure => tracing::warn!(message = %notice.message, "notice"),
    }
}
