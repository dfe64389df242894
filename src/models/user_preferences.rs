use serde::{Deserialize, Serialize};

use super::VoteType;

/// A user's persisted like and dislike lists
///
/// Both lists keep insertion order and never share a name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceRecord {
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

/// Partial write of a preference record. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<Vec<String>>,
}

impl PreferenceRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    fn list_mut(&mut self, vote: VoteType) -> &mut Vec<String> {
        match vote {
            VoteType::Like => &mut self.likes,
            VoteType::Dislike => &mut self.dislikes,
        }
    }

    /// Records a vote for `book`, moving it out of the opposite list
    pub fn record_vote(&mut self, book: &str, vote: VoteType) {
        let target = self.list_mut(vote);
        if !target.iter().any(|name| name == book) {
            target.push(book.to_string());
        }
        self.list_mut(vote.opposite()).retain(|name| name != book);
    }

    pub fn likes_book(&self, book: &str) -> bool {
        self.likes.iter().any(|name| name == book)
    }

    pub fn dislikes_book(&self, book: &str) -> bool {
        self.dislikes.iter().any(|name| name == book)
    }

    /// True when no name appears in both lists
    pub fn is_disjoint(&self) -> bool {
        !self.likes.iter().any(|name| self.dislikes_book(name))
    }

    /// Update that writes both lists
    pub fn as_update(&self) -> PreferenceUpdate {
        PreferenceUpdate {
            likes: Some(self.likes.clone()),
            dislikes: Some(self.dislikes.clone()),
        }
    }

    /// Merges an update into this record
    pub fn merge(&mut self, update: &PreferenceUpdate) {
        if let Some(likes) = &update.likes {
            self.likes = likes.clone();
        }
        if let Some(dislikes) = &update.dislikes {
            self.dislikes = dislikes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let record = PreferenceRecord::new();
        assert!(record.likes.is_empty());
        assert!(record.dislikes.is_empty());
        assert!(record.is_disjoint());
    }

    #[test]
    fn test_record_like_keeps_insertion_order() {
        let mut record = PreferenceRecord::new();
        record.record_vote("Verity", VoteType::Like);
        record.record_vote("Ikigai", VoteType::Like);
        record.record_vote("Verity", VoteType::Like);
        assert_eq!(record.likes, vec!["Verity", "Ikigai"]);
    }

    #[test]
    fn test_vote_moves_between_lists() {
        let mut record = PreferenceRecord::new();
        record.record_vote("Verity", VoteType::Like);
        record.record_vote("Verity", VoteType::Dislike);
        assert!(!record.likes_book("Verity"));
        assert!(record.dislikes_book("Verity"));
        assert!(record.is_disjoint());
    }

    #[test]
    fn test_disjoint_after_mixed_sequence() {
        let mut record = PreferenceRecord::new();
        let votes = [
            ("Verity", VoteType::Like),
            ("Ikigai", VoteType::Dislike),
            ("Icebreaker", VoteType::Like),
            ("Ikigai", VoteType::Like),
            ("Verity", VoteType::Dislike),
            ("Icebreaker", VoteType::Like),
        ];
        for (book, vote) in votes {
            record.record_vote(book, vote);
            assert!(record.is_disjoint());
        }
        assert_eq!(record.likes, vec!["Icebreaker", "Ikigai"]);
        assert_eq!(record.dislikes, vec!["Verity"]);
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let mut record = PreferenceRecord {
            likes: vec!["Verity".to_string()],
            dislikes: vec!["Ikigai".to_string()],
        };
        record.merge(&PreferenceUpdate {
            likes: Some(vec![]),
            dislikes: None,
        });
        assert!(record.likes.is_empty());
        assert_eq!(record.dislikes, vec!["Ikigai"]);
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let record: PreferenceRecord = serde_json::from_str(r#"{"likes": ["Verity"]}"#).unwrap();
        assert_eq!(record.likes, vec!["Verity"]);
        assert!(record.dislikes.is_empty());
    }
}
