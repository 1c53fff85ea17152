use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSize {
    Sm,
    Md,
    Lg,
    Xl,
}

/// One-shot, single-slot message shown by the notification shell. Opening a
/// new notice replaces whatever is currently displayed; notices are never
/// queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub size: NoticeSize,
}

impl Notice {
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Success,
            size: NoticeSize::Md,
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Error,
            size: NoticeSize::Md,
        }
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Info,
            size: NoticeSize::Md,
        }
    }

    pub fn sized(mut self, size: NoticeSize) -> Self {
        self.size = size;
        self
    }
}

pub trait NotificationShell: Send + Sync {
    fn open(&self, notice: Notice);
    fn close(&self);
}

/// Default in-process shell: an explicit state container passed by reference
/// to whatever renders it, never an ambient global.
#[derive(Default)]
pub struct SingleSlotShell {
    slot: Mutex<Option<Notice>>,
}

impl SingleSlotShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Notice> {
        self.guard().clone()
    }

    fn guard(&self) -> MutexGuard<'_, Option<Notice>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationShell for SingleSlotShell {
    fn open(&self, notice: Notice) {
        *self.guard() = Some(notice);
    }

    fn close(&self) {
        *self.guard() = None;
    }
}
