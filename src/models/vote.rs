use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// A like or a dislike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Like,
    Dislike,
}

impl VoteType {
    pub fn opposite(self) -> Self {
        match self {
            VoteType::Like => VoteType::Dislike,
            VoteType::Dislike => VoteType::Like,
        }
    }
}

impl Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteType::Like => write!(f, "like"),
            VoteType::Dislike => write!(f, "dislike"),
        }
    }
}

/// Per-book counters for the current session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteTally {
    pub likes: u32,
    pub dislikes: u32,
    /// What this session last voted, if anything
    pub user_vote: Option<VoteType>,
}

impl VoteTally {
    /// Applies a vote, returning false when it repeats the current one
    pub fn cast(&mut self, vote: VoteType) -> bool {
        if self.user_vote == Some(vote) {
            return false;
        }

        if self.user_vote == Some(vote.opposite()) {
            let previous = self.counter_mut(vote.opposite());
            *previous = previous.saturating_sub(1);
        }

        let current = self.counter_mut(vote);
        *current = current.saturating_add(1);
        self.user_vote = Some(vote);
        true
    }

    fn counter_mut(&mut self, vote: VoteType) -> &mut u32 {
        match vote {
            VoteType::Like => &mut self.likes,
            VoteType::Dislike => &mut self.dislikes,
        }
    }
}

/// Tallies keyed by book name, created on first access
#[derive(Debug, Clone, Default)]
pub struct TallyBoard {
    tallies: HashMap<String, VoteTally>,
}

impl TallyBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tally for `book`, starting it at (0, 0, none) if needed
    pub fn entry(&mut self, book: &str) -> &mut VoteTally {
        self.tallies.entry(book.to_string()).or_default()
    }

    pub fn get(&self, book: &str) -> Option<&VoteTally> {
        self.tallies.get(book)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_type_serialization() {
        assert_eq!(serde_json::to_string(&VoteType::Like).unwrap(), "\"like\"");
        let vote: VoteType = serde_json::from_str("\"dislike\"").unwrap();
        assert_eq!(vote, VoteType::Dislike);
        assert_eq!(vote.opposite(), VoteType::Like);
    }

    #[test]
    fn test_first_vote() {
        let mut tally = VoteTally::default();
        assert!(tally.cast(VoteType::Like));
        assert_eq!(tally.likes, 1);
        assert_eq!(tally.dislikes, 0);
        assert_eq!(tally.user_vote, Some(VoteType::Like));
    }

    #[test]
    fn test_repeat_vote_is_noop() {
        let mut tally = VoteTally::default();
        tally.cast(VoteType::Like);
        let before = tally;

        assert!(!tally.cast(VoteType::Like));
        assert_eq!(tally, before);
    }

    #[test]
    fn test_switching_moves_one_count() {
        let mut tally = VoteTally::default();
        tally.cast(VoteType::Like);
        tally.cast(VoteType::Dislike);
        assert_eq!(tally.likes, 0);
        assert_eq!(tally.dislikes, 1);
        assert_eq!(tally.user_vote, Some(VoteType::Dislike));

        tally.cast(VoteType::Like);
        assert_eq!(tally.likes, 1);
        assert_eq!(tally.dislikes, 0);
    }

    #[test]
    fn test_switching_never_goes_negative() {
        let mut tally = VoteTally {
            likes: 0,
            dislikes: 0,
            user_vote: Some(VoteType::Like),
        };
        tally.cast(VoteType::Dislike);
        assert_eq!(tally.likes, 0);
        assert_eq!(tally.dislikes, 1);
    }

    #[test]
    fn test_board_creates_tally_on_first_access() {
        let mut board = TallyBoard::new();
        assert!(board.get("Verity").is_none());

        let tally = board.entry("Verity");
        assert_eq!(*tally, VoteTally::default());
        tally.cast(VoteType::Dislike);

        assert_eq!(board.get("Verity").unwrap().dislikes, 1);
        assert_eq!(board.len(), 1);
    }
}
