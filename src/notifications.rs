use serde::Serialize;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl Display for NoticeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// A toast shown once on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Most toasts kept between page renders; older ones are dropped first.
pub const MAX_PENDING_NOTICES: usize = 5;

#[derive(Debug, Default)]
pub struct Notices(VecDeque<Notice>);

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        if self.0.len() == MAX_PENDING_NOTICES {
            self.0.pop_front();
        }
        self.0.push_back(notice);
    }

    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.0).into()
    }
}
