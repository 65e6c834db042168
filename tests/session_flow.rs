//! End-to-end quiz flows against a scripted language model.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossterm::event::KeyCode;
use grammar_tutor::gemini::{GenerateRequest, LanguageModel, ModelError};
use grammar_tutor::locale::{ENCOURAGEMENT_PHRASES, EXPLANATION_UNAVAILABLE, GENERATION_FAILED};
use grammar_tutor::session::{BATCH_SIZE, Insight};
use grammar_tutor::{
    App, Control, Difficulty, Explainer, GrammarPoint, Phase, QuestionGenerator, QuizFilter,
    Scope, fetch_batch, fetch_explanation,
};
use serde_json::{Value, json};

/// Replays canned replies in order and remembers every prompt it was sent.
#[derive(Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    fn reply(&self, reply: Result<String, ModelError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ModelError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ModelError::EmptyResponse))
    }
}

fn batch(count: usize) -> String {
    let questions: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("q{}", i),
                "sentenceBefore": "The book",
                "sentenceAfter": "cover is red belongs to me.",
                "options": ["whose", "which", "that", "who"],
                "correctAnswer": "whose",
                "difficulty": "Beginner",
                "category": "Relative Clauses",
                "explanation": {
                    "rule": "whose shows possession.",
                    "examples": ["The girl whose bag is blue is Amy."],
                    "commonErrors": "Using which for possession."
                }
            })
        })
        .collect();
    Value::Array(questions).to_string()
}

struct Harness {
    model: Arc<ScriptedModel>,
    generator: QuestionGenerator,
    explainer: Explainer,
}

impl Harness {
    fn new() -> Self {
        let model = Arc::new(ScriptedModel::default());
        let shared: Arc<dyn LanguageModel> = model.clone();
        Self {
            generator: QuestionGenerator::new(Arc::clone(&shared), "Chinese"),
            explainer: Explainer::new(shared, "Chinese"),
            model,
        }
    }

    /// Performs whatever request a key press produced and feeds it back.
    async fn press(&self, app: &mut App, key: KeyCode) {
        match app.handle_key(key) {
            Control::Fetch(request) => app.apply(fetch_batch(&self.generator, request).await),
            Control::Explain(request) => app.apply(fetch_explanation(&self.explainer, request).await),
            Control::Continue | Control::Quit => {}
        }
    }

    async fn start(&self, filter: QuizFilter) -> App {
        let (mut app, request) = App::new(filter);
        app.apply(fetch_batch(&self.generator, request).await);
        app
    }
}

async fn answer_all(harness: &Harness, app: &mut App, keys: &[char]) {
    for key in keys {
        harness.press(app, KeyCode::Char(*key)).await;
        harness.press(app, KeyCode::Enter).await;
        harness.press(app, KeyCode::Enter).await;
    }
}

#[tokio::test]
async fn test_all_correct_scores_full_marks() {
    let harness = Harness::new();
    harness.model.reply(Ok(batch(BATCH_SIZE)));

    let mut app = harness.start(QuizFilter::default()).await;
    answer_all(&harness, &mut app, &['a'; BATCH_SIZE]).await;

    assert_eq!(app.session().phase(), &Phase::Result);
    let score = app.session().score();
    assert_eq!((score.correct, score.total, score.accuracy), (5, 5, 100));
    assert_eq!(score.encouragement, ENCOURAGEMENT_PHRASES[ENCOURAGEMENT_PHRASES.len() - 1]);
}

#[tokio::test]
async fn test_two_of_five_is_forty_percent() {
    let harness = Harness::new();
    harness.model.reply(Ok(batch(BATCH_SIZE)));
    for _ in 0..3 {
        harness.model.reply(Ok("Use whose for possession.".to_string()));
    }

    let mut app = harness.start(QuizFilter::default()).await;
    answer_all(&harness, &mut app, &['a', 'b', 'a', 'c', 'd']).await;

    assert_eq!(app.session().phase(), &Phase::Result);
    let score = app.session().score();
    assert_eq!((score.correct, score.total, score.accuracy), (2, 5, 40));
    assert_eq!(app.session().answers().iter().filter(|a| !a.is_correct).count(), 3);
}

#[tokio::test]
async fn test_failed_fetch_then_retry_uses_same_filter() {
    let harness = Harness::new();
    harness.model.reply(Err(ModelError::Status {
        status: 503,
        body: "unavailable".to_string(),
    }));
    harness.model.reply(Ok(batch(BATCH_SIZE)));

    let filter = QuizFilter::new(
        Scope::Only(Difficulty::Intermediate),
        Scope::Only(GrammarPoint::RelativeClause),
    );
    let mut app = harness.start(filter).await;
    let Phase::Error { message, detail } = app.session().phase() else {
        panic!("expected error phase");
    };
    assert_eq!(message, GENERATION_FAILED);
    assert!(detail.contains("503"));

    let Control::Fetch(request) = app.handle_key(KeyCode::Char('r')) else {
        panic!("retry should fetch");
    };
    assert_eq!(request.filter, filter);
    app.apply(fetch_batch(&harness.generator, request).await);
    assert_eq!(app.session().phase(), &Phase::AwaitingSelection);

    let prompts: Vec<String> = harness.model.requests().into_iter().map(|r| r.prompt).collect();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
    assert!(prompts[0].contains("Relative Clauses"));
}

#[tokio::test]
async fn test_wrong_answer_gets_explanation() {
    let harness = Harness::new();
    harness.model.reply(Ok(batch(BATCH_SIZE)));
    harness.model.reply(Ok("\"whose\" 表示所属关系。".to_string()));

    let mut app = harness.start(QuizFilter::default()).await;
    app.handle_key(KeyCode::Char('b'));
    let Control::Explain(request) = app.handle_key(KeyCode::Enter) else {
        panic!("wrong answer should ask for an explanation");
    };
    assert_eq!(app.session().insight(), &Insight::Pending);
    assert_eq!(request.sentence, "The book [___] cover is red belongs to me.");

    app.apply(fetch_explanation(&harness.explainer, request).await);
    assert_eq!(app.session().phase(), &Phase::Submitted);
    assert_eq!(
        app.session().insight(),
        &Insight::Ready("\"whose\" 表示所属关系。".to_string())
    );

    let answer = &app.session().answers()[0];
    assert_eq!(answer.selected_option, "which");
    assert!(!answer.is_correct);

    let explain_request = &harness.model.requests()[1];
    assert!(explain_request.response_schema.is_none());
    assert_eq!(explain_request.temperature, Some(0.7));
}

#[tokio::test]
async fn test_explanation_failure_falls_back() {
    let harness = Harness::new();
    harness.model.reply(Ok(batch(BATCH_SIZE)));
    harness.model.reply(Err(ModelError::Status {
        status: 500,
        body: String::new(),
    }));

    let mut app = harness.start(QuizFilter::default()).await;
    harness.press(&mut app, KeyCode::Char('c')).await;
    harness.press(&mut app, KeyCode::Enter).await;

    assert_eq!(
        app.session().insight(),
        &Insight::Ready(EXPLANATION_UNAVAILABLE.to_string())
    );
    harness.press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.session().phase(), &Phase::AwaitingSelection);
    assert_eq!(app.session().current_index(), 1);
}

#[tokio::test]
async fn test_filter_change_discards_batch() {
    let harness = Harness::new();
    harness.model.reply(Ok(batch(BATCH_SIZE)));

    let mut app = harness.start(QuizFilter::default()).await;
    app.handle_key(KeyCode::Char('a'));
    app.handle_key(KeyCode::Enter);
    app.handle_key(KeyCode::Enter);
    assert_eq!(app.session().answers().len(), 1);

    let Control::Fetch(request) = app.handle_key(KeyCode::Char('f')) else {
        panic!("filter change should fetch");
    };
    assert_eq!(app.session().phase(), &Phase::Loading);
    assert!(app.session().answers().is_empty());
    assert!(app.session().questions().is_empty());
    assert_eq!(request.filter.difficulty, Scope::Only(Difficulty::Beginner));
}

#[tokio::test]
async fn test_invalid_batch_is_rejected() {
    let harness = Harness::new();
    let mut questions: Value = serde_json::from_str(&batch(BATCH_SIZE)).unwrap();
    questions[2]["correctAnswer"] = json!("whom");
    harness.model.reply(Ok(questions.to_string()));

    let app = harness.start(QuizFilter::default()).await;
    assert!(matches!(app.session().phase(), Phase::Error { .. }));
}

#[tokio::test]
async fn test_new_batch_after_result() {
    let harness = Harness::new();
    harness.model.reply(Ok(batch(BATCH_SIZE)));
    harness.model.reply(Ok(batch(BATCH_SIZE)));

    let mut app = harness.start(QuizFilter::default()).await;
    answer_all(&harness, &mut app, &['a'; BATCH_SIZE]).await;
    assert_eq!(app.session().phase(), &Phase::Result);

    harness.press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.session().phase(), &Phase::AwaitingSelection);
    assert!(app.session().answers().is_empty());
    assert_eq!(app.session().current_index(), 0);
}
