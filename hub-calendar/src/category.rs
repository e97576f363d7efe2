//! The fixed category taxonomy and its display registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Exam,
    Holiday,
    UniversityEvent,
    DepartmentEvent,
    Deadline,
    Personal,
}

/// Display attributes of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryDefinition {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct ParseCategoryError(pub String);

impl Category {
    /// Every category, in registry order.
    pub const ALL: [Category; 6] = [
        Category::Exam,
        Category::Holiday,
        Category::UniversityEvent,
        Category::DepartmentEvent,
        Category::Deadline,
        Category::Personal,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Exam => "Exam",
            Category::Holiday => "Holiday",
            Category::UniversityEvent => "UniversityEvent",
            Category::DepartmentEvent => "DepartmentEvent",
            Category::Deadline => "Deadline",
            Category::Personal => "Personal",
        }
    }

    /// Resolves the label and color shown for this category.
    pub fn definition(self) -> CategoryDefinition {
        let (label, color) = match self {
            Category::Exam => ("Exam", "#ef4444"),
            Category::Holiday => ("Holiday", "#22c55e"),
            Category::UniversityEvent => ("University Event", "#3b82f6"),
            Category::DepartmentEvent => ("Department Event", "#a855f7"),
            Category::Deadline => ("Deadline", "#f97316"),
            Category::Personal => ("Personal", "#64748b"),
        };

        CategoryDefinition { label, color }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

pub fn resolve_category(category: Category) -> CategoryDefinition {
    category.definition()
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// A set of active categories, as toggled by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CategorySet(u8);

impl CategorySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Category::ALL.into_iter().collect()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }

    pub fn remove(&mut self, category: Category) {
        self.0 &= !category.bit();
    }

    /// Flips membership of `category`, returning whether it is now active.
    pub fn toggle(&mut self, category: Category) -> bool {
        self.0 ^= category.bit();
        self.contains(category)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = CategorySet::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

/// Parses a comma separated list of category keys. An empty string is the empty set.
impl FromStr for CategorySet {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(Category::from_str)
            .collect()
    }
}

impl Serialize for CategorySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>(), Ok(category));
        }
        assert_eq!(
            "Seminar".parse::<Category>(),
            Err(ParseCategoryError("Seminar".to_string()))
        );
    }

    #[test]
    fn registry_labels() {
        assert_eq!(resolve_category(Category::Exam).label, "Exam");
        assert_eq!(
            resolve_category(Category::UniversityEvent).label,
            "University Event"
        );
        assert_eq!(resolve_category(Category::Holiday).color, "#22c55e");
    }

    #[test]
    fn set_toggle() {
        let mut set = CategorySet::all();
        assert_eq!(set.len(), 6);

        assert!(!set.toggle(Category::Holiday));
        assert!(!set.contains(Category::Holiday));
        assert!(set.contains(Category::Exam));

        assert!(set.toggle(Category::Holiday));
        assert_eq!(set, CategorySet::all());
    }

    #[test]
    fn set_from_str() {
        let set: CategorySet = "Exam, Deadline".parse().unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Category::Exam, Category::Deadline]
        );

        assert!("".parse::<CategorySet>().unwrap().is_empty());
        assert!("Exam,Party".parse::<CategorySet>().is_err());
    }

    #[test]
    fn set_serializes_as_keys() {
        let set: CategorySet = [Category::Holiday, Category::Exam].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["Exam","Holiday"]"#
        );
    }
}
