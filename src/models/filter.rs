use std::fmt;

use super::{Difficulty, GrammarPoint};

/// One axis of the question filter: either unfiltered or a concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Copy + PartialEq> Scope<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Scope::All => None,
            Scope::Only(v) => Some(v),
        }
    }

    /// Steps `All -> values[0] -> ... -> values[n-1] -> All`.
    pub fn cycle(self, values: &[T]) -> Self {
        match self {
            Scope::All => values.first().copied().map_or(Scope::All, Scope::Only),
            Scope::Only(current) => {
                let next = values
                    .iter()
                    .position(|v| *v == current)
                    .and_then(|i| values.get(i + 1));
                next.copied().map_or(Scope::All, Scope::Only)
            }
        }
    }
}

impl<T> From<Option<T>> for Scope<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scope::All, Scope::Only)
    }
}

/// The (difficulty, category) pair a batch is requested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuizFilter {
    pub difficulty: Scope<Difficulty>,
    pub category: Scope<GrammarPoint>,
}

impl QuizFilter {
    pub fn new(difficulty: Scope<Difficulty>, category: Scope<GrammarPoint>) -> Self {
        Self {
            difficulty,
            category,
        }
    }

    pub fn with_next_difficulty(self) -> Self {
        Self {
            difficulty: self.difficulty.cycle(&Difficulty::ALL),
            ..self
        }
    }

    pub fn with_next_category(self) -> Self {
        Self {
            category: self.category.cycle(&GrammarPoint::ALL),
            ..self
        }
    }

    pub fn difficulty_label(&self) -> String {
        match self.difficulty {
            Scope::All => "All Levels / 全部难度".to_string(),
            Scope::Only(d) => format!("{} / {}", d.label(), d.zh_label()),
        }
    }

    pub fn category_label(&self) -> String {
        match self.category {
            Scope::All => "All Categories / 全部类别".to_string(),
            Scope::Only(c) => format!("{} / {}", c.label(), c.zh_label()),
        }
    }
}

impl fmt::Display for QuizFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let difficulty = self.difficulty.value().map_or("All", Difficulty::label);
        let category = self.category.value().map_or("All", GrammarPoint::label);
        write!(f, "difficulty={} category={}", difficulty, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_through_all() {
        let mut scope = Scope::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            scope = scope.cycle(&Difficulty::ALL);
            seen.push(scope);
        }
        assert_eq!(
            seen,
            vec![
                Scope::Only(Difficulty::Beginner),
                Scope::Only(Difficulty::Intermediate),
                Scope::Only(Difficulty::Advanced),
                Scope::All,
            ]
        );
    }

    #[test]
    fn test_category_cycle_visits_every_topic() {
        let mut filter = QuizFilter::default();
        for expected in GrammarPoint::ALL {
            filter = filter.with_next_category();
            assert_eq!(filter.category, Scope::Only(expected));
        }
        assert_eq!(filter.with_next_category().category, Scope::All);
        assert_eq!(filter.difficulty, Scope::All);
    }

    #[test]
    fn test_display() {
        let filter = QuizFilter::new(Scope::Only(Difficulty::Advanced), Scope::All);
        assert_eq!(filter.to_string(), "difficulty=Advanced category=All");
    }
}
