//! Non-blocking, dismissible user notices (toast-level).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Oldest notices are dropped beyond this many.
const MAX_ACTIVE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// A favorite/rating change failed and was rolled back.
    Mutation,
    /// A search or detail fetch failed.
    Query,
    /// Login was rejected.
    Auth,
    /// The session ended (e.g. the server rejected the credential).
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Shared notice list. Clones share the same board.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Arc<watch::Sender<Vec<Notice>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    pub fn new() -> Self {
        let (notices, _) = watch::channel(Vec::new());
        Self {
            notices: Arc::new(notices),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Adds a notice and returns its id.
    pub fn push(&self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notice = Notice {
            id,
            kind,
            message: message.into(),
        };
        tracing::debug!(id, ?kind, message = %notice.message, "notice");
        self.notices.send_modify(|notices| {
            notices.push(notice);
            if notices.len() > MAX_ACTIVE {
                let excess = notices.len() - MAX_ACTIVE;
                notices.drain(..excess);
            }
        });
        id
    }

    /// Removes a notice. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        self.notices.send_if_modified(|notices| {
            let before = notices.len();
            notices.retain(|notice| notice.id != id);
            notices.len() != before
        })
    }

    pub fn active(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Notice>> {
        self.notices.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_dismiss() {
        let board = NoticeBoard::new();
        let first = board.push(NoticeKind::Mutation, "Could not save rating");
        let second = board.push(NoticeKind::Query, "Search failed");
        assert_ne!(first, second);
        assert_eq!(board.active().len(), 2);

        assert!(board.dismiss(first));
        assert!(!board.dismiss(first));
        let active = board.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NoticeKind::Query);
    }

    #[test]
    fn clones_share_the_board() {
        let board = NoticeBoard::new();
        let clone = board.clone();
        clone.push(NoticeKind::Auth, "Login failed");
        assert_eq!(board.active()[0].message, "Login failed");
    }

    #[test]
    fn oldest_notices_are_dropped() {
        let board = NoticeBoard::new();
        for i in 0..(MAX_ACTIVE + 5) {
            board.push(NoticeKind::Mutation, format!("n{}", i));
        }
        let active = board.active();
        assert_eq!(active.len(), MAX_ACTIVE);
        assert_eq!(active[0].message, "n5");
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let board = NoticeBoard::new();
        let mut receiver = board.subscribe();
        board.push(NoticeKind::Session, "Signed out");
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().len(), 1);
    }
}
