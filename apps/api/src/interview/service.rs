//! Question generation and answer evaluation backends.
//!
//! Default: `LlmAssessmentService` (hosted model through `LlmClient`).
//! Tests use a scripted fake so the conversation logic runs without a network.
//!
//! `AppState` holds an `Arc<dyn AssessmentService>`, chosen at startup.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::interview::prompts::{
    DEFAULT_POSITION, EVALUATION_PROMPT_TEMPLATE, EVALUATION_TEMPERATURE,
    QUESTION_PROMPT_TEMPLATE, QUESTION_TEMPERATURE, UNKNOWN_EXPERIENCE,
};
use crate::llm_client::prompts::{fill, INTERVIEWER_GUARDRAIL, PLAIN_OUTPUT_INSTRUCTION};
use crate::llm_client::LlmClient;

/// Polite acknowledgement used when evaluation fails.
pub const EVALUATION_FALLBACK: &str =
    "Unable to evaluate answer at this time. Thank you for your response!";

/// Everything the generator needs to pick the next question.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest<'a> {
    pub tech_stack: &'a [String],
    pub experience: Option<&'a str>,
    pub position: Option<&'a str>,
    /// 1-based.
    pub question_number: usize,
    pub total_questions: usize,
}

/// The question/evaluation trait. Implement this to swap backends without
/// touching the conversation logic.
#[async_trait]
pub trait AssessmentService: Send + Sync {
    /// Returns a single-line question.
    async fn generate_question(&self, request: &QuestionRequest<'_>) -> Result<String, AppError>;

    /// Returns a freeform evaluation of `answer`.
    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        tech_context: &str,
    ) -> Result<String, AppError>;
}

/// Deterministic stand-in question used when generation fails.
pub fn fallback_question(tech_stack: &[String]) -> String {
    let tech = tech_stack
        .first()
        .map(String::as_str)
        .unwrap_or("your primary technology");
    format!("Describe your experience working with {tech} in a production environment.")
}

/// Collapses a model reply into a single clean line.
///
/// Strips a leading `Question:` / `Q1:` label, markdown emphasis and wrapping
/// quotes, and joins wrapped lines.
pub fn normalize_question(raw: &str) -> String {
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut text = joined.trim().trim_matches('*').trim();

    if let Some((head, rest)) = text.split_once(':') {
        let head_lower = head.trim().trim_matches('*').to_lowercase();
        let is_label = head_lower == "question"
            || (head_lower.starts_with('q')
                && head_lower.len() <= 3
                && head_lower[1..].chars().all(|c| c.is_ascii_digit()))
            || (head_lower.starts_with("question ")
                && head_lower["question ".len()..]
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == '/'));
        if is_label {
            text = rest.trim().trim_matches('*').trim();
        }
    }

    strip_wrapping_quotes(text).to_string()
}

/// Removes one pair of quotes that wraps the whole text. A lone or unmatched
/// quote at either end is kept.
fn strip_wrapping_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('“', '”')];
    for (open, close) in PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

/// Builds the question-generation prompt. Candidate values are inserted verbatim.
pub fn question_prompt(request: &QuestionRequest<'_>) -> String {
    let tech_stack = request.tech_stack.join(", ");
    let question_number = request.question_number.to_string();
    let total_questions = request.total_questions.to_string();
    let prompt = fill(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("position", request.position.unwrap_or(DEFAULT_POSITION)),
            ("tech_stack", tech_stack.as_str()),
            ("experience", request.experience.unwrap_or(UNKNOWN_EXPERIENCE)),
            ("question_number", question_number.as_str()),
            ("total_questions", total_questions.as_str()),
        ],
    );
    format!("{prompt}\n{PLAIN_OUTPUT_INSTRUCTION}")
}

pub fn evaluation_prompt(question: &str, answer: &str, tech_context: &str) -> String {
    let prompt = fill(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("tech_context", tech_context),
            ("question", question),
            ("answer", answer),
        ],
    );
    format!("{prompt}\n{INTERVIEWER_GUARDRAIL}")
}

/// Hosted-model backend. All calls go through the shared `LlmClient`.
pub struct LlmAssessmentService(pub LlmClient);

#[async_trait]
impl AssessmentService for LlmAssessmentService {
    async fn generate_question(&self, request: &QuestionRequest<'_>) -> Result<String, AppError> {
        let prompt = question_prompt(request);

        let raw = self
            .0
            .call_text(&prompt, QUESTION_TEMPERATURE)
            .await
            .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

        let question = normalize_question(&raw);
        if question.is_empty() {
            return Err(AppError::Llm(
                "Question generation returned no usable text".to_string(),
            ));
        }
        debug!(
            "Generated question {}/{}",
            request.question_number, request.total_questions
        );
        Ok(question)
    }

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        tech_context: &str,
    ) -> Result<String, AppError> {
        let prompt = evaluation_prompt(question, answer, tech_context);

        self.0
            .call_text(&prompt, EVALUATION_TEMPERATURE)
            .await
            .map_err(|e| AppError::Llm(format!("Answer evaluation failed: {e}")))
    }
}
