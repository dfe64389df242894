mod book;
mod catalog;
mod session;
mod user_preferences;
mod vote;

pub use book::{Book, Genre};
pub use catalog::{Catalog, Shelf};
pub use session::{Session, UserId};
pub use user_preferences::{PreferenceRecord, PreferenceUpdate};
pub use vote::{TallyBoard, VoteTally, VoteType};
