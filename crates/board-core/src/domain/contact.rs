//! Contact Entity
//!
//! Assignee directory. Tasks reference contacts by email.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// Avatar background
    #[serde(default)]
    pub color: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            color: None,
        }
    }

    /// First letter of the first and last word, uppercased
    pub fn initials(&self) -> String {
        let mut words = self.name.split_whitespace();
        let first = words.next().and_then(|w| w.chars().next());
        let last = words.last().and_then(|w| w.chars().next());
        first
            .into_iter()
            .chain(last)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Entity for Contact {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        if self.id.is_empty() {
            self.id = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(Contact::new("Ada Lovelace", "ada@example.com").initials(), "AL");
        assert_eq!(Contact::new("grace brewster hopper", "g@example.com").initials(), "GH");
        assert_eq!(Contact::new("Plato", "p@example.com").initials(), "P");
        assert_eq!(Contact::new("  ", "x@example.com").initials(), "");
    }
}
