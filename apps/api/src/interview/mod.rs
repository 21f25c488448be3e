// Candidate intake interview: consent → profile → tech stack → assessment → summary.
// All model calls go through an `AssessmentService`; nothing here talks to the network directly.

pub mod assessment;
pub mod export;
pub mod handlers;
pub mod machine;
pub mod phase;
pub mod profile;
pub mod progress;
pub mod prompts;
pub mod service;
pub mod session;
pub mod store;
pub mod transcript;

#[cfg(test)]
pub(crate) mod fakes;
