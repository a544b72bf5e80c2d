//! Renderers for parsed solutions.
//!
//! Both renderers share [`layout`], which groups blocks into paragraphs of
//! prose and inline math, separated by displayed equation blocks.

pub mod html;
pub mod latex;

use crate::block::ContentBlock;

/// A run of inline content inside a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inline<'a> {
    Text(&'a str),
    Math(&'a str),
}

impl Inline<'_> {
    /// Trailing punctuation attaches to the previous run without a space
    pub(crate) fn attaches_to_previous(&self) -> bool {
        match self {
            Inline::Text(text) => text.starts_with(['.', ',', ';', ':', '!', '?']),
            Inline::Math(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item<'a> {
    Paragraph(Vec<Inline<'a>>),
    Display(&'a str),
}

pub(crate) fn layout(blocks: &[ContentBlock]) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut runs = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Text { content } => {
                // A leading newline starts a new paragraph
                if content.starts_with('\n') {
                    flush(&mut runs, &mut items);
                }
                let text = content.trim();
                if !text.is_empty() {
                    runs.push(Inline::Text(text));
                }
            }
            ContentBlock::InlineMath { content } => {
                let math = content.trim();
                if !math.is_empty() {
                    runs.push(Inline::Math(math));
                }
            }
            ContentBlock::AlignBlock { content } => {
                flush(&mut runs, &mut items);
                items.push(Item::Display(content));
            }
        }
    }
    flush(&mut runs, &mut items);

    items
}

fn flush<'a>(runs: &mut Vec<Inline<'a>>, items: &mut Vec<Item<'a>>) {
    if !runs.is_empty() {
        items.push(Item::Paragraph(std::mem::take(runs)));
    }
}
