//! Attack Labels
//!
//! Fixed taxonomy the classifier was trained on.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

/// Class index → label, in training order
pub const ATTACK_LABELS: [&str; 3] = ["DDoS", "Intrusion", "Malware"];

/// Attack category predicted for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackType {
    DDoS,
    Intrusion,
    Malware,
}

impl AttackType {
    pub const ALL: [AttackType; 3] = [AttackType::DDoS, AttackType::Intrusion, AttackType::Malware];

    /// Map a classifier output index to its label
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            AttackType::DDoS => 0,
            AttackType::Intrusion => 1,
            AttackType::Malware => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        ATTACK_LABELS[self.index()]
    }
}

impl std::fmt::Display for AttackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
