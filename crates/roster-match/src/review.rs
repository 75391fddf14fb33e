//! Review workflow as a pure state machine.
//!
//! A [`ReviewSession`] is a snapshot of the ledger's review queue plus a
//! cursor. Applying a [`ReviewAction`] returns the next session and, for
//! decisions, the [`ReviewCommand`] the caller should hand to
//! [`WarningLedger::apply`](crate::WarningLedger::apply). The session never
//! touches the ledger itself.

use roster_model::{WarningId, WarningStatus};

use crate::ledger::WarningLedger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Next,
    Previous,
    /// Move the cursor to a queue position; out-of-range positions are ignored.
    Jump(usize),
    /// Replace the suggested canonical name for the current entry.
    Edit(String),
    Accept,
    Reject,
}

/// Ledger mutation requested by a review decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    Resolve {
        id: WarningId,
        corrected: Option<String>,
    },
    Dismiss {
        id: WarningId,
    },
}

impl ReviewCommand {
    pub fn id(&self) -> WarningId {
        match self {
            Self::Resolve { id, .. } | Self::Dismiss { id } => *id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReviewItem {
    id: WarningId,
    status: WarningStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSession {
    items: Vec<ReviewItem>,
    position: usize,
    draft: Option<String>,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewStep {
    pub session: ReviewSession,
    pub command: Option<ReviewCommand>,
}

impl ReviewSession {
    /// Snapshot the ledger's queue with the cursor on the first pending entry.
    pub fn open(ledger: &WarningLedger) -> Self {
        let items: Vec<ReviewItem> = ledger
            .queue()
            .into_iter()
            .map(|w| ReviewItem {
                id: w.id,
                status: w.status,
            })
            .collect();
        let position = items
            .iter()
            .position(|item| item.status == WarningStatus::Pending)
            .unwrap_or(0);
        Self {
            items,
            position,
            draft: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<WarningId> {
        self.items.get(self.position).map(|item| item.id)
    }

    /// Status of the current entry as seen by this session.
    pub fn current_status(&self) -> Option<WarningStatus> {
        self.items.get(self.position).map(|item| item.status)
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Entries still pending in this session.
    pub fn remaining(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == WarningStatus::Pending)
            .count()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    #[must_use]
    pub fn apply(&self, action: ReviewAction) -> ReviewStep {
        let mut next = self.clone();
        let command = match action {
            ReviewAction::Next => {
                next.move_to((self.position + 1).min(self.items.len().saturating_sub(1)));
                None
            }
            ReviewAction::Previous => {
                next.move_to(self.position.saturating_sub(1));
                None
            }
            ReviewAction::Jump(position) => {
                if position < self.items.len() {
                    next.move_to(position);
                }
                None
            }
            ReviewAction::Edit(name) => {
                let name = name.trim();
                next.draft = (!name.is_empty()).then(|| name.to_string());
                None
            }
            ReviewAction::Accept => next.decide(WarningStatus::Accepted),
            ReviewAction::Reject => next.decide(WarningStatus::Rejected),
        };
        ReviewStep {
            session: next,
            command,
        }
    }

    fn move_to(&mut self, position: usize) {
        if position != self.position {
            self.draft = None;
        }
        self.position = position;
    }

    fn decide(&mut self, status: WarningStatus) -> Option<ReviewCommand> {
        let item = self.items.get_mut(self.position)?;
        item.status = status;
        let id = item.id;
        let draft = self.draft.take();
        let command = match status {
            WarningStatus::Rejected => ReviewCommand::Dismiss { id },
            _ => ReviewCommand::Resolve {
                id,
                corrected: draft,
            },
        };
        if let Some(pending) = self.next_pending() {
            self.position = pending;
        }
        Some(command)
    }

    /// First pending entry after the cursor, wrapping to the start.
    fn next_pending(&self) -> Option<usize> {
        let len = self.items.len();
        (1..=len)
            .map(|offset| (self.position + offset) % len)
            .find(|index| self.items[*index].status == WarningStatus::Pending)
    }
}
