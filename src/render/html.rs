//! HTML output with math rendered to MathML.
//!
//! Math is untrusted: anything `pulldown-latex` cannot render is shown as the
//! escaped source in the configured error colour instead.

use html_escape::{encode_double_quoted_attribute, encode_text};
use log::debug;
use pulldown_latex::config::DisplayMode;
use pulldown_latex::{Parser, RenderConfig, Storage, mathml::push_mathml};

use crate::block::{ContentBlock, ParsedResult};
use crate::config::HtmlConfig;

use super::{Inline, Item, layout};

/// Convert a parse result to HTML, including the parse error notice if any.
pub fn result_to_html(result: &ParsedResult, config: &HtmlConfig) -> String {
    let mut body = String::new();

    if let Some(error) = &result.error {
        body.push_str("<div class=\"parse-error\">\n<p>Error parsing solution: ");
        body.push_str(&encode_text(&error.message));
        body.push_str("</p>\n<pre>");
        body.push_str(&encode_text(&error.original_content));
        body.push_str("</pre>\n</div>\n");
    }
    body.push_str(&blocks_to_html(&result.blocks, config));

    if config.standalone {
        standalone_page(&body, config)
    } else {
        body
    }
}

/// Convert blocks to an HTML fragment
pub fn blocks_to_html(blocks: &[ContentBlock], config: &HtmlConfig) -> String {
    let mut out = String::new();

    for item in layout(blocks) {
        match item {
            Item::Paragraph(runs) => {
                out.push_str("<p>");
                for (i, run) in runs.iter().enumerate() {
                    if i > 0 && !run.attaches_to_previous() {
                        out.push(' ');
                    }
                    match run {
                        Inline::Text(text) => out.push_str(&encode_text(text)),
                        Inline::Math(math) => {
                            out.push_str(&render_math(math, DisplayMode::Inline, config))
                        }
                    }
                }
                out.push_str("</p>\n");
            }
            Item::Display(content) => {
                let source = format!("\\begin{{aligned}}\n{content}\n\\end{{aligned}}");
                out.push_str("<div class=\"math-display\">");
                out.push_str(&render_math(&source, DisplayMode::Block, config));
                out.push_str("</div>\n");
            }
        }
    }

    out
}

fn render_math(latex: &str, display_mode: DisplayMode, config: &HtmlConfig) -> String {
    let storage = Storage::new();
    let parser = Parser::new(latex, &storage);
    let mut render_config: RenderConfig = Default::default();
    render_config.display_mode = display_mode;
    let mut mathml = String::new();

    // some parse errors are written into the output instead of being returned
    match push_mathml(&mut mathml, parser, render_config) {
        Ok(()) if !(mathml.contains("parsing error") && mathml.contains("╭─►")) => mathml,
        Ok(()) => {
            debug!("math failed to render: {latex:?}");
            error_fragment(latex, config)
        }
        Err(e) => {
            debug!("math failed to render: {e}");
            error_fragment(latex, config)
        }
    }
}

fn error_fragment(latex: &str, config: &HtmlConfig) -> String {
    format!(
        "<span class=\"math-error\" style=\"color: {}\">{}</span>",
        encode_double_quoted_attribute(&config.error_color),
        encode_text(latex)
    )
}

fn standalone_page(body: &str, config: &HtmlConfig) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        encode_text(&config.title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, solution_to_html};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn escapes_prose() {
        let blocks = vec![ContentBlock::text("a < b & c")];
        assert_eq!(
            blocks_to_html(&blocks, &HtmlConfig::default()),
            "<p>a &lt; b &amp; c</p>\n"
        );
    }

    #[test]
    fn inline_math_stays_in_paragraph() {
        let html = blocks_to_html(&parse("FINAL:\nx = 4").blocks, &HtmlConfig::default());
        assert!(html.starts_with("<p>Therefore, "));
        assert!(html.contains("<math"));
        assert!(html.ends_with(".</p>\n"));
    }

    #[test]
    fn align_blocks_are_displayed() {
        let html = blocks_to_html(&parse("STEPS:\nx+1=2\nx=1").blocks, &HtmlConfig::default());
        assert!(html.starts_with("<p>Solution:</p>\n<div class=\"math-display\">"));
        assert!(html.ends_with("</div>\n"));
    }

    #[test]
    fn error_fragment_is_marked() {
        let config = HtmlConfig {
            error_color: "#f00".to_string(),
            ..HtmlConfig::default()
        };
        assert_eq!(
            error_fragment("\\frac{a<b}{", &config),
            "<span class=\"math-error\" style=\"color: #f00\">\\frac{a&lt;b}{</span>"
        );
    }

    #[rstest]
    #[case::unclosed_group("\\frac{1}{")]
    #[case::unknown_command("\\notacommand x")]
    #[case::double_superscript("x^^2")]
    fn unrenderable_math_is_marked(#[case] math: &str) {
        assert_eq!(
            solution_to_html(&format!("FINAL:\n{math}")),
            format!(
                "<p>Therefore, <span class=\"math-error\" style=\"color: #EF4444\">{math}</span>.</p>\n"
            )
        );
    }

    #[test]
    fn unrenderable_display_math_is_marked() {
        let html = blocks_to_html(
            &[ContentBlock::align("\\begin{foo} x")],
            &HtmlConfig::default(),
        );
        assert_eq!(
            html,
            "<div class=\"math-display\"><span class=\"math-error\" style=\"color: #EF4444\">\
             \\begin{aligned}\n\\begin{foo} x\n\\end{aligned}</span></div>\n"
        );
    }

    #[test]
    fn parse_error_notice() {
        let result = ParsedResult::fallback("STEPS:\n<x>", "bad input");
        let html = result_to_html(&result, &HtmlConfig::default());
        assert_eq!(
            html,
            "<div class=\"parse-error\">\n<p>Error parsing solution: bad input</p>\n\
             <pre>STEPS:\n&lt;x&gt;</pre>\n</div>\n\
             <p>STEPS:\n&lt;x&gt;</p>\n"
        );
    }

    #[test]
    fn standalone_page_has_title() {
        let config = HtmlConfig {
            standalone: true,
            title: "2x + 5 = 13".to_string(),
            ..HtmlConfig::default()
        };
        let html = result_to_html(&ParsedResult::default(), &config);
        assert_eq!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>2x + 5 = 13</title>\n</head>\n<body>\n</body>\n</html>\n"
        );
    }
}
