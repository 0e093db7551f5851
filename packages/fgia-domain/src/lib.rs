pub mod access;
pub mod knowledge;
pub mod matcher;

pub use access::{AccessPolicy, GateDecision, UserRole};
pub use knowledge::{KnowledgeBase, KnowledgeEntry, KnowledgeError, Priority};
pub use matcher::{MatchResult, find_match};
