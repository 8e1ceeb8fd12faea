//! Transient user notices with explicit expiry.
//!
//! DESIGN
//! ======
//! Notices carry an absolute deadline instead of owning a timer. The app tick
//! calls [`NoticeQueue::expire`] with the current time, so dismissal order is
//! deterministic and testable without a browser clock.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    /// Blocking guidance for an incomplete form; styled as a warning.
    Warning,
}

impl NoticeKind {
    /// CSS modifier for the toast.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast success",
            Self::Error => "toast error",
            Self::Warning => "toast warning",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
    /// Epoch milliseconds after which the notice is dropped.
    pub expires_at_ms: u64,
}

/// FIFO of live notices. The newest notice is the one rendered.
#[derive(Clone, Debug, Default)]
pub struct NoticeQueue {
    items: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    /// Queue a notice that lives for `ttl_ms` starting at `now_ms`.
    pub fn push(&mut self, kind: NoticeKind, text: impl Into<String>, now_ms: u64, ttl_ms: u64) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notice { id, kind, text: text.into(), expires_at_ms: now_ms.saturating_add(ttl_ms) });
        id
    }

    /// Drop every notice whose deadline is at or before `now_ms`.
    /// Returns how many were removed.
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at_ms > now_ms);
        before - self.items.len()
    }

    /// Some notice is due for expiry at `now_ms`.
    #[must_use]
    pub fn has_expired(&self, now_ms: u64) -> bool {
        self.items.iter().any(|n| n.expires_at_ms <= now_ms)
    }

    /// Dismiss a notice early (user clicked the toast).
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn current(&self) -> Option<&Notice> {
        self.items.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
