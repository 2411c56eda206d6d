//! Forward/backward navigation over a fixed set of cards.
//!
//! [`PagerState`] is a plain value with explicit transitions; the dispatcher
//! keeps one per sent message in a [`PagerRegistry`]. Time is always passed
//! in so tests can drive expiry without sleeping.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{card::DisplayCard, domain::MessageRef};

/// Most cards a single pager will hold.
pub const MAX_CARDS: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerPhase {
    Active(usize),
    Expired,
}

/// Outcome of one navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Index changed; the card at this index should be re-rendered.
    Moved(usize),
    /// Already at the boundary. Acknowledged, nothing to re-render.
    Unchanged,
    /// The pager timed out (or never existed); controls are inert.
    Expired,
}

#[derive(Clone, Debug)]
pub struct PagerState {
    cards: Vec<DisplayCard>,
    index: usize,
    timeout: Duration,
    last_activity: Instant,
    expired: bool,
}

/// Build a pager anchored at index 0, or `None` when there is nothing to show.
pub fn paginate(
    mut cards: Vec<DisplayCard>,
    timeout: Duration,
    now: Instant,
) -> Option<PagerState> {
    if cards.is_empty() {
        return None;
    }
    cards.truncate(MAX_CARDS);
    Some(PagerState {
        cards,
        index: 0,
        timeout,
        last_activity: now,
        expired: false,
    })
}

impl PagerState {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cards(&self) -> &[DisplayCard] {
        &self.cards
    }

    pub fn current(&self) -> &DisplayCard {
        &self.cards[self.index]
    }

    /// HTML for the current card, with its 1-based position.
    pub fn current_html(&self) -> String {
        self.current().to_html(self.index + 1, self.cards.len())
    }

    /// Instant after which the pager expires unless navigated again.
    pub fn deadline(&self) -> Instant {
        self.last_activity + self.timeout
    }

    pub fn phase_at(&self, now: Instant) -> PagerPhase {
        if self.is_expired_at(now) {
            PagerPhase::Expired
        } else {
            PagerPhase::Active(self.index)
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expired || now.saturating_duration_since(self.last_activity) >= self.timeout
    }

    pub fn advance(&mut self) -> Navigation {
        self.advance_at(Instant::now())
    }

    pub fn retreat(&mut self) -> Navigation {
        self.retreat_at(Instant::now())
    }

    pub fn advance_at(&mut self, now: Instant) -> Navigation {
        self.navigate_at(Direction::Next, now)
    }

    pub fn retreat_at(&mut self, now: Instant) -> Navigation {
        self.navigate_at(Direction::Previous, now)
    }

    pub fn navigate_at(&mut self, direction: Direction, now: Instant) -> Navigation {
        if self.is_expired_at(now) {
            self.expired = true;
            return Navigation::Expired;
        }

        // Boundary no-ops still count as activity.
        self.last_activity = now;

        match direction {
            Direction::Previous if self.index > 0 => {
                self.index -= 1;
                Navigation::Moved(self.index)
            }
            Direction::Next if self.index + 1 < self.cards.len() => {
                self.index += 1;
                Navigation::Moved(self.index)
            }
            _ => Navigation::Unchanged,
        }
    }
}

/// Result of navigating a registered pager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationResult {
    pub outcome: Navigation,
    /// Present only when `outcome` is `Moved`.
    pub html: Option<String>,
}

/// Expiry check result for the dispatcher's timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Removed just now; the message's controls should be stripped.
    Expired,
    /// Still active; check again at this instant.
    Pending(Instant),
    /// Not registered (already expired and removed).
    Missing,
}

/// Pagers keyed by the message that displays them.
#[derive(Default)]
pub struct PagerRegistry {
    inner: Mutex<HashMap<MessageRef, PagerState>>,
}

impl PagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, msg: MessageRef, state: PagerState) {
        self.inner.lock().await.insert(msg, state);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn navigate(
        &self,
        msg: MessageRef,
        direction: Direction,
        now: Instant,
    ) -> NavigationResult {
        let mut map = self.inner.lock().await;
        let Some(state) = map.get_mut(&msg) else {
            return NavigationResult {
                outcome: Navigation::Expired,
                html: None,
            };
        };

        let outcome = state.navigate_at(direction, now);
        let html = match outcome {
            Navigation::Moved(_) => Some(state.current_html()),
            Navigation::Unchanged => None,
            Navigation::Expired => {
                map.remove(&msg);
                None
            }
        };
        NavigationResult { outcome, html }
    }

    pub async fn expire_if_idle(&self, msg: MessageRef, now: Instant) -> Expiry {
        let mut map = self.inner.lock().await;
        let Some(state) = map.get(&msg) else {
            return Expiry::Missing;
        };
        if state.is_expired_at(now) {
            map.remove(&msg);
            Expiry::Expired
        } else {
            Expiry::Pending(state.deadline())
        }
    }
}
