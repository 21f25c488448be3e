//! Plain-text session export.
//!
//! Layout: banner, candidate fields, conversation (assistant turns flush left,
//! candidate turns right-aligned in a 60-column frame), answered questions,
//! metadata, closing banner.

use chrono::{DateTime, Utc};

use crate::interview::session::Session;
use crate::interview::transcript::Role;

const EXPORT_WIDTH: usize = 60;

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("talentscout_session_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

pub fn render_export(session: &Session, now: DateTime<Utc>) -> String {
    let banner = "=".repeat(EXPORT_WIDTH);
    let mut lines: Vec<String> = vec![
        banner.clone(),
        "TALENTSCOUT SESSION EXPORT".to_string(),
        banner.clone(),
        format!("Export Date: {}", now.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Session Phase: {}", session.phase.title()),
        String::new(),
    ];

    let fields = session.candidate.fields();
    if !fields.is_empty() {
        lines.push("CANDIDATE INFORMATION:".to_string());
        lines.push("-".repeat(25));
        for (label, value) in fields {
            lines.push(format!("{label}: {value}"));
        }
        lines.push(String::new());
    }

    lines.push("CONVERSATION HISTORY:".to_string());
    lines.push("-".repeat(25));
    for message in session.messages.replay() {
        match message.role {
            Role::Assistant => {
                lines.push("AI Assistant:".to_string());
                lines.push(message.content.clone());
            }
            Role::User => {
                lines.push(right_align("User:"));
                for line in message.content.split('\n') {
                    lines.extend(wrap(line, EXPORT_WIDTH).iter().map(|l| right_align(l)));
                }
            }
        }
        lines.push(String::new());
    }

    if !session.technical_responses.is_empty() {
        lines.push("TECHNICAL ASSESSMENT SUMMARY:".to_string());
        lines.push("-".repeat(35));
        for response in &session.technical_responses {
            lines.push(format!("Question {}:", response.question_number));
            lines.push(format!("Q: {}", response.question));
            lines.push(format!("A: {}", response.answer));
            lines.push(String::new());
        }
    }

    lines.push("SESSION METADATA:".to_string());
    lines.push("-".repeat(20));
    lines.push(format!("Total Questions: {}", session.total_questions));
    lines.push(format!("Questions Answered: {}", session.answered()));
    lines.push(format!("Completion Status: {}", session.phase.title()));
    lines.push(String::new());
    lines.push(banner.clone());
    lines.push("END OF SESSION EXPORT".to_string());
    lines.push(banner);

    lines.join("\n")
}

fn right_align(text: &str) -> String {
    format!("{text:>width$}", width = EXPORT_WIDTH)
}

/// Greedy word wrap. Lines that already fit are returned unchanged; a single
/// word longer than `width` gets a line of its own.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let candidate_len = current.chars().count() + word.chars().count() + 1;
        if candidate_len <= width {
            current.push_str(word);
            current.push(' ');
        } else {
            if !current.is_empty() {
                out.push(current.trim().to_string());
            }
            current = format!("{word} ");
        }
    }
    if !current.is_empty() {
        out.push(current.trim().to_string());
    }
    out
}
