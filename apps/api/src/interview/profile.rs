//! Candidate profile accumulator.
//!
//! Fields are written once, in conversation order, and never cleared except by
//! a full session reset.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Placeholder used by the final summary for fields never collected.
pub const NOT_PROVIDED: &str = "_Not provided_";
/// Live summary text before anything has been collected.
pub const EMPTY_LIVE_SUMMARY: &str = "_No information yet…_";

/// Scalar profile fields, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Location,
    Experience,
    Position,
}

impl ProfileField {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Email => "Email",
            ProfileField::Phone => "Phone",
            ProfileField::Location => "Location",
            ProfileField::Experience => "Experience",
            ProfileField::Position => "Position",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// Free text; the candidate may answer "5", "5 years" or "about a decade".
    pub experience: Option<String>,
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tech_stack: Vec<String>,
}

impl CandidateProfile {
    fn slot(&mut self, field: ProfileField) -> &mut Option<String> {
        match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Location => &mut self.location,
            ProfileField::Experience => &mut self.experience,
            ProfileField::Position => &mut self.position,
        }
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Name => self.name.as_deref(),
            ProfileField::Email => self.email.as_deref(),
            ProfileField::Phone => self.phone.as_deref(),
            ProfileField::Location => self.location.as_deref(),
            ProfileField::Experience => self.experience.as_deref(),
            ProfileField::Position => self.position.as_deref(),
        }
    }

    /// Stores a trimmed value. Returns `false` and leaves the profile untouched
    /// if the field was already recorded.
    pub fn record(&mut self, field: ProfileField, value: &str) -> bool {
        let slot = self.slot(field);
        if slot.is_some() {
            warn!("Ignoring second write to profile field {}", field.label());
            return false;
        }
        *slot = Some(value.trim().to_string());
        true
    }

    /// Stores the tech stack. Returns `false` if a stack was already recorded.
    pub fn record_tech_stack(&mut self, techs: Vec<String>) -> bool {
        if !self.tech_stack.is_empty() {
            warn!("Ignoring second write to profile tech stack");
            return false;
        }
        self.tech_stack = techs;
        true
    }

    pub fn tech_context(&self) -> String {
        self.tech_stack.join(", ")
    }

    /// Present fields as `(label, value)` pairs, in collection order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields: Vec<(&'static str, String)> = [
            ProfileField::Name,
            ProfileField::Email,
            ProfileField::Phone,
            ProfileField::Location,
            ProfileField::Experience,
            ProfileField::Position,
        ]
        .iter()
        .filter_map(|f| self.get(*f).map(|v| (f.label(), v.to_string())))
        .collect();

        if !self.tech_stack.is_empty() {
            fields.push(("Tech Stack", self.tech_context()));
        }
        fields
    }

    /// Sidebar view: only the fields collected so far.
    pub fn live_summary(&self) -> String {
        let lines: Vec<String> = self
            .fields()
            .into_iter()
            .map(|(label, value)| {
                let label = if label == "Tech Stack" { "Tech-Stack" } else { label };
                format!("**{label}**: {value}")
            })
            .collect();

        if lines.is_empty() {
            EMPTY_LIVE_SUMMARY.to_string()
        } else {
            lines.join("\n\n")
        }
    }

    /// End-of-interview summary: every field, with gaps marked.
    pub fn final_summary(&self) -> String {
        let value = |field: ProfileField| self.get(field).unwrap_or(NOT_PROVIDED).to_string();
        let stack = if self.tech_stack.is_empty() {
            NOT_PROVIDED.to_string()
        } else {
            self.tech_context()
        };

        format!(
            "### Application Summary\n\
             **Name:** {}  \n\
             **Email:** {}  \n\
             **Phone:** {}  \n\
             **Experience:** {}  \n\
             **Position:** {}  \n\
             **Location:** {}  \n\
             **Tech-Stack:** {}",
            value(ProfileField::Name),
            value(ProfileField::Email),
            value(ProfileField::Phone),
            value(ProfileField::Experience),
            value(ProfileField::Position),
            value(ProfileField::Location),
            stack,
        )
    }
}

/// Splits a comma-separated list into trimmed, non-empty, distinct labels.
///
/// Duplicates are matched case-insensitively; the first spelling wins.
pub fn parse_tech_stack(input: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Minimal syntactic email check.
pub fn looks_like_email(input: &str) -> bool {
    input.contains('@') && input.contains('.')
}
