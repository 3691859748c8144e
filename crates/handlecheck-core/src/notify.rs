// Notification center: a single transient toast.
//
// A new notification replaces the current one in one step, so there is never
// a moment with two visible. Each toast slides in, stays for the configured
// time, slides out and is removed by `tick`.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::Timings;

/// Slide-in length.
pub const ENTER_DURATION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// Parse a kind name; anything unrecognized is `Info`.
    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "success" => NotificationKind::Success,
            "error" => NotificationKind::Error,
            "warning" => NotificationKind::Warning,
            _ => NotificationKind::Info,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✔",
            NotificationKind::Error => "✖",
            NotificationKind::Warning => "⚠",
            NotificationKind::Info => "ℹ",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            NotificationKind::Success => (0x4c, 0xaf, 0x50),
            NotificationKind::Error => (0xf4, 0x43, 0x36),
            NotificationKind::Warning => (0xff, 0x98, 0x00),
            NotificationKind::Info => (0x00, 0x88, 0xcc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Shown,
    Leaving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    current: Option<Notification>,
    next_id: u64,
    visible_for: Duration,
    slide_out: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        NotificationCenter::new(&Timings::default())
    }
}

impl NotificationCenter {
    pub fn new(timing: &Timings) -> Self {
        NotificationCenter {
            current: None,
            next_id: 1,
            visible_for: timing.notification(),
            slide_out: timing.slide_out(),
        }
    }

    /// Show `message`, evicting whatever is displayed. Returns the new id.
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.current = Some(Notification {
            id,
            message: message.into(),
            kind,
            shown_at: now,
            phase: Phase::Entering,
        });
        id
    }

    /// Close button. Ignores ids that are no longer displayed.
    pub fn dismiss(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
            return true;
        }
        false
    }

    /// Advance the phase of the current toast and drop it once its slide-out
    /// has finished. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        let age = now.saturating_duration_since(current.shown_at);
        if age >= self.visible_for + self.slide_out {
            self.current = None;
            return true;
        }
        let phase = if age >= self.visible_for {
            Phase::Leaving
        } else if age >= ENTER_DURATION {
            Phase::Shown
        } else {
            Phase::Entering
        };
        if phase != current.phase {
            current.phase = phase;
            return true;
        }
        false
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
