//! Request Composer
//!
//! Builds the provider-neutral request for one analysis: a single
//! instructional text block, the encoded attachments in upload order, and the
//! shared response-schema descriptor.

use crate::{attachment::Attachment, schema::response_schema};
use serde_json::Value;

/// Stands in for a text input the user left blank.
pub const EMPTY_INPUT_MARKER: &str = "None provided";

/// A fully assembled request, independent of any provider wire format.
#[derive(Debug, Clone)]
pub struct ComposedRequest {
    /// The instructional block, sent as the first part of the request.
    pub prompt: String,
    /// Syllabus attachments first, then question attachments.
    pub attachments: Vec<Attachment>,
    /// The structure the backend must answer with.
    pub response_schema: &'static Value,
}

/// Text is embedded exactly as given; only an empty input gets the marker.
fn text_or_marker(text: &str) -> &str {
    if text.is_empty() {
        EMPTY_INPUT_MARKER
    } else {
        text
    }
}

fn build_prompt(syllabus_text: &str, questions_text: &str) -> String {
    format!(
        "Analyze the provided syllabus and past exam questions to create a strategic exam preparation plan.

INSTRUCTIONS:
1. Cross-reference the syllabus topics with the past exam questions.
2. Identify recurring patterns: which topics are high-yield (frequently asked)?
3. Determine the required preparation depth (Basic recall vs. Complex Application).
4. Provide a structured, prioritized study roadmap.

PASTED SYLLABUS TEXT:
{}

PASTED QUESTIONS TEXT:
{}
",
        text_or_marker(syllabus_text),
        text_or_marker(questions_text)
    )
}

/// Composes the request for one analysis.
///
/// Pure: no I/O, nothing is truncated or dropped.
pub fn compose(
    syllabus_text: &str,
    questions_text: &str,
    syllabus_attachments: Vec<Attachment>,
    question_attachments: Vec<Attachment>,
) -> ComposedRequest {
    let mut attachments = syllabus_attachments;
    attachments.extend(question_attachments);

    ComposedRequest {
        prompt: build_prompt(syllabus_text, questions_text),
        attachments,
        response_schema: response_schema(),
    }
}
