use crate::block::ContentBlock;
use crate::config::LatexConfig;

use super::{Inline, Item, layout};

const PREAMBLE: &str =
    "\\documentclass{article}\n\\usepackage{amsmath}\n\\usepackage{amssymb}\n\n\\begin{document}\n\n";

/// Convert blocks to LaTeX source
pub fn blocks_to_latex(blocks: &[ContentBlock], config: &LatexConfig) -> String {
    let mut out = String::new();

    if config.standalone {
        out.push_str(PREAMBLE);
    }

    for (i, item) in layout(blocks).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match item {
            Item::Paragraph(runs) => {
                runs_to_latex(runs, &mut out);
                out.push('\n');
            }
            Item::Display(content) => {
                display_to_latex(content, &config.environment, &mut out);
            }
        }
    }

    if config.standalone {
        out.push_str("\n\\end{document}\n");
    }

    out
}

fn runs_to_latex(runs: &[Inline], out: &mut String) {
    for (i, run) in runs.iter().enumerate() {
        if i > 0 && !run.attaches_to_previous() {
            out.push(' ');
        }
        match run {
            Inline::Text(text) => escape_text(text, out),
            Inline::Math(math) => {
                out.push('$');
                out.push_str(math);
                out.push('$');
            }
        }
    }
}

fn display_to_latex(content: &str, environment: &str, out: &mut String) {
    out.push_str(&format!("\\begin{{{environment}}}\n"));
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("\\end{{{environment}}}\n"));
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
}
