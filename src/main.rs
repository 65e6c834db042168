use std::sync::Arc;

use clap::Parser;
use grammar_tutor::config::Config;
use grammar_tutor::{Difficulty, GeminiClient, GrammarPoint, QuizFilter, Tutor, logging};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Only ask questions of this level (beginner, intermediate, advanced)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Only ask about this topic (non-finite, relative, adverbial, inversion, subjunctive, conjunctions)
    #[arg(short, long)]
    category: Option<GrammarPoint>,

    /// Model name, overriding GEMINI_MODEL
    #[arg(long)]
    model: Option<String>,

    /// API base URL, overriding GEMINI_API_BASE
    #[arg(long)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(api_base) = args.api_base {
        config.api_base = api_base;
    }

    let _log_guard = logging::init(&config);
    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; model requests will be rejected");
    }

    let filter = QuizFilter::new(args.difficulty.into(), args.category.into());
    let model = Arc::new(GeminiClient::new(
        config.api_key.clone(),
        &config.model,
        &config.api_base,
    ));
    info!(model = model.model(), %filter, "starting grammar tutor");

    let tutor = Tutor::new(model, filter, &config.learner_language);

    if let Err(e) = tutor.run().await {
        eprintln!("Error running grammar tutor: {}", e);
        std::process::exit(1);
    }
}
