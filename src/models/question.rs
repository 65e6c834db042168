use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Placeholder standing in for the blank when a sentence is rendered as text.
pub const BLANK_MARKER: &str = "[___]";

/// Returned when a label does not name any known difficulty or grammar point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{label}`")]
pub struct UnknownLabel {
    kind: &'static str,
    label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Label used on the wire and in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn zh_label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "初级",
            Difficulty::Intermediate => "中级",
            Difficulty::Advanced => "高级",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLabel {
                kind: "difficulty",
                label: s.to_string(),
            })
    }
}

/// The grammar topics a question can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarPoint {
    NonFinite,
    RelativeClause,
    AdverbialClause,
    Inversion,
    Subjunctive,
    Conjunctions,
}

impl GrammarPoint {
    pub const ALL: [GrammarPoint; 6] = [
        GrammarPoint::NonFinite,
        GrammarPoint::RelativeClause,
        GrammarPoint::AdverbialClause,
        GrammarPoint::Inversion,
        GrammarPoint::Subjunctive,
        GrammarPoint::Conjunctions,
    ];

    /// Label used on the wire and in prompts.
    pub fn label(self) -> &'static str {
        match self {
            GrammarPoint::NonFinite => "Non-finite Verbs",
            GrammarPoint::RelativeClause => "Relative Clauses",
            GrammarPoint::AdverbialClause => "Adverbial Clauses",
            GrammarPoint::Inversion => "Inversion",
            GrammarPoint::Subjunctive => "Subjunctive Mood",
            GrammarPoint::Conjunctions => "Conjunctions",
        }
    }

    pub fn zh_label(self) -> &'static str {
        match self {
            GrammarPoint::NonFinite => "非谓语动词",
            GrammarPoint::RelativeClause => "定语从句",
            GrammarPoint::AdverbialClause => "状语从句",
            GrammarPoint::Inversion => "倒装句",
            GrammarPoint::Subjunctive => "虚拟语气",
            GrammarPoint::Conjunctions => "连词",
        }
    }

    /// Short name accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            GrammarPoint::NonFinite => "non-finite",
            GrammarPoint::RelativeClause => "relative",
            GrammarPoint::AdverbialClause => "adverbial",
            GrammarPoint::Inversion => "inversion",
            GrammarPoint::Subjunctive => "subjunctive",
            GrammarPoint::Conjunctions => "conjunctions",
        }
    }
}

impl fmt::Display for GrammarPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GrammarPoint {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(wanted) || g.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLabel {
                kind: "grammar point",
                label: s.to_string(),
            })
    }
}

/// Teaching notes attached to a question, shown once it has been answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub rule: String,
    /// Never empty for a validated question.
    pub examples: Vec<String>,
    pub common_errors: String,
}

/// A fill-in-the-blank question. The blank sits between `sentence_before`
/// and `sentence_after`, and `correct_answer` is always one of `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub sentence_before: String,
    pub sentence_after: String,
    pub options: [String; 4],
    pub correct_answer: String,
    pub difficulty: Difficulty,
    pub category: GrammarPoint,
    pub explanation: Explanation,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }

    /// The sentence with the blank written out as [`BLANK_MARKER`].
    pub fn rendered_sentence(&self) -> String {
        [
            self.sentence_before.trim(),
            BLANK_MARKER,
            self.sentence_after.trim(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}
