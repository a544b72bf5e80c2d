use std::panic;

use log::{debug, trace, warn};
use thiserror::Error;

use crate::block::{ContentBlock, ParsedResult};

/// Row terminator appended to every aligned row
const ROW_END: &str = "\\\\[0.5em]";

/// Reasons a solution falls back to raw text
#[derive(Debug, Error)]
pub(crate) enum ParseFailure {
    #[error("input is not valid UTF-8 (invalid sequence at byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
    #[error("failed to format solution: {0}")]
    Panicked(String),
}

/// Parse solver output into renderable blocks.
///
/// Never fails: anything that goes wrong while formatting yields a result
/// with `error` set and the raw input as a single text block.
pub fn parse(text: &str) -> ParsedResult {
    parse_with(text, format_sections)
}

fn parse_with<F>(text: &str, format: F) -> ParsedResult
where
    F: FnOnce(&str) -> Vec<ContentBlock> + panic::UnwindSafe,
{
    if text.is_empty() {
        return ParsedResult::default();
    }

    match try_parse(text, format) {
        Ok(blocks) => ParsedResult::parsed(blocks),
        Err(failure) => fall_back(text, failure),
    }
}

/// Parse raw bytes, treating undecodable input as a parse failure.
pub fn parse_bytes(bytes: &[u8]) -> ParsedResult {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse(text),
        Err(e) => fall_back(
            &String::from_utf8_lossy(bytes),
            ParseFailure::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            },
        ),
    }
}

fn fall_back(original: &str, failure: ParseFailure) -> ParsedResult {
    warn!("Error parsing math solution: {failure}");
    ParsedResult::fallback(original, failure.to_string())
}

fn try_parse<F>(text: &str, format: F) -> Result<Vec<ContentBlock>, ParseFailure>
where
    F: FnOnce(&str) -> Vec<ContentBlock> + panic::UnwindSafe,
{
    panic::catch_unwind(move || format(text)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        ParseFailure::Panicked(message)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Steps,
    Final,
    Verify,
}

impl Section {
    const ALL: [Section; 3] = [Section::Steps, Section::Final, Section::Verify];

    fn keyword(self) -> &'static str {
        match self {
            Section::Steps => "STEPS:",
            Section::Final => "FINAL:",
            Section::Verify => "VERIFY:",
        }
    }

    fn from_header(header: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| header.starts_with(section.keyword()))
    }

    fn starts(text: &str) -> bool {
        Self::from_header(text).is_some()
    }

    fn blocks(self, body: &str) -> Vec<ContentBlock> {
        match self {
            Section::Steps => steps_blocks(body),
            Section::Final => final_blocks(body),
            Section::Verify => verify_blocks(body),
        }
    }
}

fn format_sections(text: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    for section in split_sections(text) {
        let (header, body) = header_and_body(section);
        match Section::from_header(header) {
            Some(kind) => {
                debug!("formatting {} section ({} bytes)", kind.keyword(), body.len());
                blocks.extend(kind.blocks(body));
            }
            None => trace!("skipping unrecognized section {header:?}"),
        }
    }

    blocks
}

/// Split before every newline that is followed by a section keyword.
/// The newline itself is dropped; the keyword stays with its section.
fn split_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;

    for (idx, _) in text.match_indices('\n') {
        if Section::starts(&text[idx + 1..]) {
            sections.push(&text[start..idx]);
            start = idx + 1;
        }
    }
    sections.push(&text[start..]);

    sections
}

fn header_and_body(section: &str) -> (&str, &str) {
    let section = section.trim();
    match section.split_once('\n') {
        Some((header, rest)) => (header, rest.trim()),
        None => (section, ""),
    }
}

fn body_lines(body: &str) -> Vec<&str> {
    body.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Left and right side of a line with exactly one `=`.
fn split_equation(line: &str) -> Option<(&str, &str)> {
    let (left, right) = line.split_once('=')?;
    (!right.contains('=')).then_some((left, right))
}

fn left_side(line: &str) -> &str {
    line.split_once('=').map_or(line, |(left, _)| left)
}

/// Label describing the operation between two consecutive steps.
///
/// Purely textual: only the operators present on each left-hand side are
/// inspected, so unusual layouts can be labelled wrongly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepExplanation {
    Given,
    CombineLikeTerms,
    SubtractFromBothSides,
    Multiply,
    DivideBothSides,
    Simplify,
}

impl StepExplanation {
    fn between(previous: &str, current: &str) -> Self {
        if previous.contains('+') && !current.contains('+') {
            Self::CombineLikeTerms
        } else if previous.contains('-') && !current.contains('-') {
            Self::SubtractFromBothSides
        } else if previous.contains(['*', '×']) {
            Self::Multiply
        } else if previous.contains('/') {
            Self::DivideBothSides
        } else {
            // a `frac` on the current side reads as a simplification too
            Self::Simplify
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Given => "(given)",
            Self::CombineLikeTerms => "combine like terms",
            Self::SubtractFromBothSides => "subtract from both sides",
            Self::Multiply => "multiply",
            Self::DivideBothSides => "divide both sides",
            Self::Simplify => "simplify",
        }
    }
}

fn steps_blocks(body: &str) -> Vec<ContentBlock> {
    let equations = body_lines(body);

    let rows: Vec<String> = equations
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let Some((left, right)) = split_equation(line) else {
                return format!("&= {line}{ROW_END}");
            };
            let explanation = if index == 0 {
                StepExplanation::Given
            } else {
                StepExplanation::between(left_side(equations[index - 1]), left)
            };
            format!(
                "{left} &= {right} &&\\quad\\text{{{}}}{ROW_END}",
                explanation.label()
            )
        })
        .collect();

    vec![
        ContentBlock::text("Solution:"),
        ContentBlock::align(rows.join("\n")),
    ]
}

fn final_blocks(body: &str) -> Vec<ContentBlock> {
    vec![
        ContentBlock::text("\nTherefore,"),
        ContentBlock::inline_math(body.trim()),
        ContentBlock::text("."),
    ]
}

fn verify_blocks(body: &str) -> Vec<ContentBlock> {
    let rows: Vec<String> = body_lines(body)
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            if index == 0 {
                let (left, right) = step.split_once('=').unwrap_or((step, ""));
                format!("{left} &= {right}{ROW_END}")
            } else if step.contains('=') {
                format!("&= {step}\\quad\\checkmark{ROW_END}")
            } else {
                format!("&= {step}{ROW_END}")
            }
        })
        .collect();

    vec![
        ContentBlock::text("\nVerification:"),
        ContentBlock::align(rows.join("\n")),
        ContentBlock::text("\nThe solution is verified."),
    ]
}
