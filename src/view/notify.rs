//! Transient user notifications.

use std::time::{Duration, Instant};

/// How long a notification stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Oldest notices are dropped past this many
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) < NOTICE_TTL
    }
}

/// Keeps the most recent notices; only the latest one is shown, and only
/// until it expires or is hidden.
#[derive(Debug, Default)]
pub struct Notifier {
    history: Vec<Notice>,
    hidden: bool,
    errors: bool,
}

impl Notifier {
    pub fn success(&mut self, message: impl Into<String>) {
        self.raise(NoticeKind::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(NoticeKind::Error, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.raise(NoticeKind::Info, message.into());
    }

    fn raise(&mut self, kind: NoticeKind, message: String) {
        match kind {
            NoticeKind::Error => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }
        self.hidden = false;
        self.errors |= kind == NoticeKind::Error;
        self.history.push(Notice {
            kind,
            message,
            raised_at: Instant::now(),
        });
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// The notice on screen at `now`, if any
    pub fn visible(&self, now: Instant) -> Option<&Notice> {
        if self.hidden {
            return None;
        }
        self.history.last().filter(|n| n.is_visible_at(now))
    }

    pub fn history(&self) -> &[Notice] {
        &self.history
    }

    pub fn last(&self) -> Option<&Notice> {
        self.history.last()
    }

    pub fn has_errors(&self) -> bool {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_notice_is_visible_until_expiry() {
        let mut notifier = Notifier::default();
        notifier.info("Carregando dados...");
        notifier.error("Erro ao carregar dados");

        let raised = notifier.last().unwrap().raised_at;
        let shown = notifier.visible(raised).unwrap();
        assert_eq!(shown.kind, NoticeKind::Error);
        assert!(notifier.visible(raised + NOTICE_TTL).is_none());
        assert!(notifier.has_errors());
    }

    #[test]
    fn hide_clears_until_next_notice() {
        let mut notifier = Notifier::default();
        notifier.info("Carregando dados...");
        notifier.hide();
        let now = Instant::now();
        assert!(notifier.visible(now).is_none());

        notifier.success("ok");
        let raised = notifier.last().unwrap().raised_at;
        assert!(notifier.visible(raised).is_some());
        assert_eq!(notifier.history().len(), 2);
    }

    #[test]
    fn history_keeps_only_recent_notices() {
        let mut notifier = Notifier::default();
        notifier.error("Erro ao processar dados");
        for i in 0..HISTORY_LIMIT {
            notifier.info(format!("Carregando {}", i));
        }

        assert_eq!(notifier.history().len(), HISTORY_LIMIT);
        assert_eq!(notifier.history()[0].message, "Carregando 0");
        assert!(notifier.has_errors());
    }
}
