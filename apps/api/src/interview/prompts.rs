// All LLM prompt constants for the interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Sampling temperature for question generation; varied questions are wanted.
pub const QUESTION_TEMPERATURE: f32 = 0.8;
/// Sampling temperature for answer evaluation; consistency is wanted.
pub const EVALUATION_TEMPERATURE: f32 = 0.3;

/// Question generation prompt. Replace `{position}`, `{tech_stack}`,
/// `{experience}`, `{question_number}` and `{total_questions}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = "\
Generate 1 technical interview question for a {position} role. \
Focus on the following technologies: {tech_stack}. \
Make it practical and relevant to real-world development scenarios. \
The question should be answerable in one short line. \
This is question {question_number} of {total_questions}; do not repeat earlier topics. \
Candidate experience, as they described it: {experience}.";

/// Answer evaluation prompt. Replace `{tech_context}`, `{question}` and `{answer}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = "\
You are an expert technical interviewer evaluating a candidate's response. \
Your role is strictly limited to technical interview evaluation.

Technology context: {tech_context}
Question: '{question}'
Candidate's answer: '{answer}'

Provide a brief evaluation covering:
1. Technical accuracy (0-10)
2. Completeness (0-10)
3. Clarity of explanation (0-10)
4. Correctness of explanation (0-10)
5. Brief constructive feedback
Keep the response concise and professional.";

/// Position assumed when none was collected.
pub const DEFAULT_POSITION: &str = "Software Developer";
/// Experience phrase used when none was collected.
pub const UNKNOWN_EXPERIENCE: &str = "not stated";
