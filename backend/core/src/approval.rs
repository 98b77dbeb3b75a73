//! Per-channel human approval gate.
//!
//! Nothing leaves the system without an explicit export action on its
//! channel. There is no rejected or edited state — a draft is either
//! exported as-is or ignored.

use serde::{Deserialize, Serialize};

use crate::error::RestockError;
use crate::types::Channel;

/// Lifecycle of one channel's draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    NotGenerated,
    Unapproved,
    Approved,
}

/// Tracks approval status for all three channels. Channels are independent:
/// approving one never touches the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalBoard {
    whatsapp: DraftStatus,
    json: DraftStatus,
    pdf: DraftStatus,
}

impl Default for ApprovalBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalBoard {
    pub fn new() -> Self {
        Self {
            whatsapp: DraftStatus::NotGenerated,
            json: DraftStatus::NotGenerated,
            pdf: DraftStatus::NotGenerated,
        }
    }

    pub fn status(&self, channel: Channel) -> DraftStatus {
        match channel {
            Channel::Whatsapp => self.whatsapp,
            Channel::Json => self.json,
            Channel::Pdf => self.pdf,
        }
    }

    fn slot(&mut self, channel: Channel) -> &mut DraftStatus {
        match channel {
            Channel::Whatsapp => &mut self.whatsapp,
            Channel::Json => &mut self.json,
            Channel::Pdf => &mut self.pdf,
        }
    }

    /// A fresh draft set landed: every channel goes back to awaiting
    /// approval, discarding any previous approvals.
    pub fn mark_generated(&mut self) {
        for channel in Channel::ALL {
            *self.slot(channel) = DraftStatus::Unapproved;
        }
    }

    /// Record an export action on one channel. Exporting again is a no-op;
    /// exporting before any draft exists is a precondition error.
    pub fn approve(&mut self, channel: Channel) -> Result<(), RestockError> {
        let slot = self.slot(channel);
        match *slot {
            DraftStatus::NotGenerated => Err(RestockError::Precondition(format!(
                "no {channel} draft has been generated yet"
            ))),
            DraftStatus::Unapproved | DraftStatus::Approved => {
                *slot = DraftStatus::Approved;
                Ok(())
            }
        }
    }

    pub fn is_approved(&self, channel: Channel) -> bool {
        self.status(channel) == DraftStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_board_has_nothing_generated() {
        let board = ApprovalBoard::new();
        for channel in Channel::ALL {
            assert_eq!(board.status(channel), DraftStatus::NotGenerated);
        }
    }

    #[test]
    fn approve_before_generation_is_rejected() {
        let mut board = ApprovalBoard::new();
        assert!(board.approve(Channel::Whatsapp).is_err());
        assert_eq!(board.status(Channel::Whatsapp), DraftStatus::NotGenerated);
    }

    #[test]
    fn channels_approve_independently() {
        let mut board = ApprovalBoard::new();
        board.mark_generated();
        board.approve(Channel::Json).unwrap();
        assert!(board.is_approved(Channel::Json));
        assert_eq!(board.status(Channel::Whatsapp), DraftStatus::Unapproved);
        assert_eq!(board.status(Channel::Pdf), DraftStatus::Unapproved);
    }

    #[test]
    fn regeneration_resets_approvals() {
        let mut board = ApprovalBoard::new();
        board.mark_generated();
        board.approve(Channel::Pdf).unwrap();
        board.mark_generated();
        assert_eq!(board.status(Channel::Pdf), DraftStatus::Unapproved);
    }

    #[test]
    fn approving_twice_stays_approved() {
        let mut board = ApprovalBoard::new();
        board.mark_generated();
        board.approve(Channel::Whatsapp).unwrap();
        board.approve(Channel::Whatsapp).unwrap();
        assert!(board.is_approved(Channel::Whatsapp));
    }
}
