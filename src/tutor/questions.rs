//! Batch generation: prompt, response schema, and turning the model's JSON
//! into validated [`Question`]s.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::gemini::{GenerateRequest, LanguageModel, ModelError};
use crate::models::{Difficulty, Explanation, GrammarPoint, Question, QuizFilter, Scope};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("model output is not a list of questions: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model returned no questions")]
    NoQuestions,

    #[error("question {index} rejected: {issue}")]
    InvalidQuestion { index: usize, issue: ValidationIssue },
}

/// Why a generated question could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("expected 4 options, got {0}")]
    OptionCount(usize),

    #[error("option `{0}` appears more than once")]
    DuplicateOption(String),

    #[error("sentence has no text around the blank")]
    EmptySentence,

    #[error("correct answer `{0}` is not one of the options")]
    AnswerNotAnOption(String),

    #[error("missing `{0}`")]
    MissingField(&'static str),

    #[error("explanation has no examples")]
    NoExamples,

    #[error("unrecognised difficulty `{0}`")]
    UnknownDifficulty(String),

    #[error("unrecognised category `{0}`")]
    UnknownCategory(String),
}

/// Asks the language model for batches of questions.
#[derive(Clone)]
pub struct QuestionGenerator {
    model: Arc<dyn LanguageModel>,
    learner_language: String,
}

impl QuestionGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, learner_language: impl Into<String>) -> Self {
        Self {
            model,
            learner_language: learner_language.into(),
        }
    }

    /// Requests `count` questions matching `filter`. Nothing is retried or
    /// cached; each call goes to the model.
    pub async fn generate(
        &self,
        filter: QuizFilter,
        count: usize,
    ) -> Result<Vec<Question>, GenerationError> {
        let prompt = build_prompt(filter, count, &self.learner_language);
        info!(%filter, count, "requesting question batch");

        let text = self
            .model
            .generate(GenerateRequest::json(prompt, question_schema()))
            .await?;

        let questions = parse_batch(&text, filter, count)?;
        info!(count = questions.len(), "question batch accepted");
        Ok(questions)
    }
}

fn build_prompt(filter: QuizFilter, count: usize, learner_language: &str) -> String {
    let difficulty = match filter.difficulty {
        Scope::All => "Mixed (Beginner to Advanced)".to_string(),
        Scope::Only(d) => d.label().to_string(),
    };
    let focus = match filter.category {
        Scope::All => "Mixed grammar (non-finite verbs, relative clauses, etc.)".to_string(),
        Scope::Only(c) => c.label().to_string(),
    };

    format!(
        "Write exactly {count} English grammar fill-in-the-blank questions for \
         {learner_language}-speaking middle school students.\n\
         Difficulty level: {difficulty}\n\
         Grammar focus: {focus}\n\
         \n\
         Rules:\n\
         1. Each question is one coherent sentence containing exactly ONE blank.\n\
         2. Put the text before the blank in sentenceBefore and the text after it in sentenceAfter.\n\
         3. Place the blank exactly where the grammar point is tested.\n\
         4. Give exactly 4 options; exactly one is correct and correctAnswer repeats it verbatim.\n\
         5. Make the distractors plausible but grammatically wrong.\n\
         6. Write the explanation bilingually (English and {learner_language}): the rule, \
         at least one example sentence, and the common traps.\n\
         \n\
         Answer with a JSON array of question objects only."
    )
}

/// Response schema in the `generateContent` schema dialect.
fn question_schema() -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.label()).collect();
    let categories: Vec<&str> = GrammarPoint::ALL.iter().map(|c| c.label()).collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "sentenceBefore": { "type": "STRING" },
                "sentenceAfter": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswer": { "type": "STRING" },
                "difficulty": { "type": "STRING", "format": "enum", "enum": difficulties },
                "category": { "type": "STRING", "format": "enum", "enum": categories },
                "explanation": {
                    "type": "OBJECT",
                    "properties": {
                        "rule": { "type": "STRING" },
                        "examples": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "commonErrors": { "type": "STRING" }
                    },
                    "required": ["rule", "examples", "commonErrors"]
                }
            },
            "required": [
                "id", "sentenceBefore", "sentenceAfter", "options",
                "correctAnswer", "difficulty", "category", "explanation"
            ]
        }
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    id: Option<String>,
    sentence_before: Option<String>,
    sentence_after: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: Option<String>,
    difficulty: Option<String>,
    category: Option<String>,
    explanation: Option<RawExplanation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExplanation {
    #[serde(default)]
    rule: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    common_errors: String,
}

/// Parses the model's text into at most `count` questions, backfilling ids
/// and tags and rejecting the whole batch if any question is unusable.
pub fn parse_batch(
    text: &str,
    filter: QuizFilter,
    count: usize,
) -> Result<Vec<Question>, GenerationError> {
    let mut raw: Vec<RawQuestion> = serde_json::from_str(strip_code_fence(text))?;
    if raw.is_empty() {
        return Err(GenerationError::NoQuestions);
    }
    if raw.len() > count {
        debug!(returned = raw.len(), count, "truncating oversized batch");
        raw.truncate(count);
    }

    let mut seen_ids = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut question = normalize(raw, filter)
                .map_err(|issue| GenerationError::InvalidQuestion { index, issue })?;
            if !seen_ids.insert(question.id.clone()) {
                warn!(id = %question.id, "duplicate question id, assigning a fresh one");
                question.id = synthesize_id();
                seen_ids.insert(question.id.clone());
            }
            Ok(question)
        })
        .collect()
}

fn normalize(raw: RawQuestion, filter: QuizFilter) -> Result<Question, ValidationIssue> {
    let id = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(synthesize_id);

    let sentence_before = raw.sentence_before.unwrap_or_default();
    let sentence_after = raw.sentence_after.unwrap_or_default();
    if sentence_before.trim().is_empty() && sentence_after.trim().is_empty() {
        return Err(ValidationIssue::EmptySentence);
    }

    let options: [String; 4] = raw
        .options
        .try_into()
        .map_err(|options: Vec<String>| ValidationIssue::OptionCount(options.len()))?;
    for (i, option) in options.iter().enumerate() {
        if options[..i].contains(option) {
            return Err(ValidationIssue::DuplicateOption(option.clone()));
        }
    }

    let correct_answer = raw
        .correct_answer
        .ok_or(ValidationIssue::MissingField("correctAnswer"))?;
    if !options.contains(&correct_answer) {
        return Err(ValidationIssue::AnswerNotAnOption(correct_answer));
    }

    let difficulty = resolve(raw.difficulty, filter.difficulty)
        .map_err(ValidationIssue::UnknownDifficulty)?;
    let category =
        resolve(raw.category, filter.category).map_err(ValidationIssue::UnknownCategory)?;

    let explanation = raw
        .explanation
        .ok_or(ValidationIssue::MissingField("explanation"))?;
    if explanation.examples.is_empty() {
        return Err(ValidationIssue::NoExamples);
    }

    Ok(Question {
        id,
        sentence_before,
        sentence_after,
        options,
        correct_answer,
        difficulty,
        category,
        explanation: Explanation {
            rule: explanation.rule,
            examples: explanation.examples,
            common_errors: explanation.common_errors,
        },
    })
}

/// Parses a tag, falling back to the filter's value when the tag is missing
/// or unrecognised. Errors with the offending label when there is nothing to
/// fall back to.
fn resolve<T>(label: Option<String>, scope: Scope<T>) -> Result<T, String>
where
    T: std::str::FromStr + Copy + PartialEq,
{
    let label = label.unwrap_or_default();
    label
        .parse::<T>()
        .ok()
        .or_else(|| scope.value())
        .ok_or(label)
}

fn synthesize_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}
