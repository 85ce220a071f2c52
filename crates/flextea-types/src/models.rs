use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{MessageId, UserId};

/// Post categories, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Gossip,
    Suggestion,
    Complaint,
    Appreciation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Gossip,
        Category::Suggestion,
        Category::Complaint,
        Category::Appreciation,
    ];

    /// Resolve a 1-based menu selection.
    pub fn from_menu_index(n: usize) -> Option<Category> {
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Gossip => "Gossip",
            Category::Suggestion => "Suggestion",
            Category::Complaint => "Complaint",
            Category::Appreciation => "Appreciation",
        }
    }
}

/// Audience scopes, in menu order. Only `AllFlexway` changes routing; the
/// office, store and team labels all resolve to the author's own group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    MyOffice,
    SpecificStore,
    SpecificTeam,
    AllFlexway,
}

impl Audience {
    pub const ALL: [Audience; 4] = [
        Audience::MyOffice,
        Audience::SpecificStore,
        Audience::SpecificTeam,
        Audience::AllFlexway,
    ];

    /// Resolve a 1-based menu selection.
    pub fn from_menu_index(n: usize) -> Option<Audience> {
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Audience::MyOffice => "My Office",
            Audience::SpecificStore => "A Specific Store",
            Audience::SpecificTeam => "A Specific Team",
            Audience::AllFlexway => "All Flexway",
        }
    }

    /// True for the one scope that expands past the author's group.
    pub fn routes_to_everyone(&self) -> bool {
        matches!(self, Audience::AllFlexway)
    }
}

/// A posted anonymous message. Immutable once created; the author id never
/// leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author: UserId,
    pub category: Category,
    pub audience: Audience,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_indices_are_one_based() {
        assert_eq!(Category::from_menu_index(1), Some(Category::Gossip));
        assert_eq!(Category::from_menu_index(4), Some(Category::Appreciation));
        assert_eq!(Category::from_menu_index(0), None);
        assert_eq!(Category::from_menu_index(5), None);

        assert_eq!(Audience::from_menu_index(1), Some(Audience::MyOffice));
        assert_eq!(Audience::from_menu_index(4), Some(Audience::AllFlexway));
        assert_eq!(Audience::from_menu_index(0), None);
        assert_eq!(Audience::from_menu_index(5), None);
    }

    #[test]
    fn only_all_flexway_routes_past_the_group() {
        for audience in Audience::ALL {
            assert_eq!(
                audience.routes_to_everyone(),
                audience == Audience::AllFlexway
            );
        }
    }
}
