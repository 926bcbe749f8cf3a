//! Turn a word entry into a styled span sequence.
//!
//! Line structure is carried by [`InlineSpan::line_break`] spans; the
//! layout pass splits on them.

use super::entry::{Sense, WordEntry};
use super::markup;
use super::types::{InlineSpan, InlineStyle, SpanRole};

/// Marker placed before each example.
pub const EXAMPLE_BULLET: &str = "    • ";

fn role_span(text: impl Into<String>, role: SpanRole) -> InlineSpan {
    InlineSpan::new(text, InlineStyle::with_role(role))
}

fn blank_line(spans: &mut Vec<InlineSpan>) {
    spans.push(InlineSpan::line_break());
}

/// Compose the display spans for `entry`.
///
/// Language groups are emitted in the order they appear in `entry`;
/// groups without senses are skipped.
pub fn compose(entry: &WordEntry) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    spans.push(role_span(entry.word.clone(), SpanRole::Title));
    spans.push(InlineSpan::line_break());
    blank_line(&mut spans);

    for group in entry.groups.iter().filter(|g| !g.senses.is_empty()) {
        spans.push(role_span(group.language.clone(), SpanRole::Language));
        spans.push(InlineSpan::line_break());
        blank_line(&mut spans);

        for (index, sense) in group.senses.iter().enumerate() {
            compose_sense(&mut spans, index + 1, sense);
            blank_line(&mut spans);
        }
        blank_line(&mut spans);
    }

    if entry.sense_count() == 0 {
        spans.push(InlineSpan::new(
            format!("No definitions found for \"{}\".", entry.word),
            InlineStyle {
                italic: true,
                ..InlineStyle::default()
            },
        ));
        spans.push(InlineSpan::line_break());
    }

    spans
}

fn compose_sense(spans: &mut Vec<InlineSpan>, ordinal: usize, sense: &Sense) {
    spans.push(role_span(format!("{ordinal}. "), SpanRole::Ordinal));
    spans.push(role_span(
        sense.part_of_speech.clone(),
        SpanRole::PartOfSpeech,
    ));
    if let Some(gender) = &sense.gender {
        spans.push(role_span(format!(" ({gender})"), SpanRole::Gender));
    }
    spans.push(role_span(": ", SpanRole::Body));
    spans.extend(markup::render(&sense.definition));
    spans.push(InlineSpan::line_break());

    for example in &sense.examples {
        let rendered = markup::render(example);
        if rendered.is_empty() {
            continue;
        }
        spans.push(role_span(EXAMPLE_BULLET, SpanRole::Bullet));
        spans.extend(rendered);
        spans.push(InlineSpan::line_break());
    }
}
