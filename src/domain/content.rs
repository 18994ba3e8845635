//! Markdown-subset parser for post bodies.
//!
//! Post bodies are written in a constrained dialect (`#`/`##`/`###`
//! headings, `-`/`*` list items, ``` code lines, `![alt](url)` images) and
//! delivered to the clients as an ordered sequence of typed blocks. Anything
//! outside the dialect passes through as literal paragraph text.

use serde::Serialize;

/// One classified unit of post content.
///
/// The emitted sequence preserves the reading order of the source text;
/// blank lines separate blocks and never become blocks themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    ListItem { text: String },
    Image { alt: String, url: String },
    Code { text: String },
}

/// Parse a raw body into content blocks.
///
/// Total over every input: malformed syntax degrades to paragraph text and
/// the empty string yields an empty sequence. A line is classified against
/// the patterns in fixed order (heading, image, list, code fence) and the
/// first match wins; everything else accumulates into the current paragraph
/// until a blank line or block marker flushes it.
///
/// Code fences are single-line: each ``` line becomes its own block with the
/// fences stripped, and fenced regions are NOT accumulated across lines.
/// This mirrors the long-standing behavior the stored content was authored
/// against; changing it would re-flow existing posts.
pub fn parse_content(raw: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut paragraph = String::new();

    for line in raw.lines() {
        let line = line.trim();

        if line.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(rest) = line.strip_prefix("# ") {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Heading {
                level: 1,
                text: rest.trim().to_string(),
            });
            continue;
        }
        if let Some(rest) = line.strip_prefix("## ") {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Heading {
                level: 2,
                text: rest.trim().to_string(),
            });
            continue;
        }
        if let Some(rest) = line.strip_prefix("### ") {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Heading {
                level: 3,
                text: rest.trim().to_string(),
            });
            continue;
        }

        let images = scan_image_refs(line);
        if !images.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            for (alt, url) in images {
                blocks.push(ContentBlock::Image { alt, url });
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::ListItem {
                text: rest.trim().to_string(),
            });
            continue;
        }

        if line.starts_with("```") {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(ContentBlock::Code {
                text: line.replace("```", "").trim().to_string(),
            });
            continue;
        }

        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        paragraph.push_str(line);
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(paragraph: &mut String, blocks: &mut Vec<ContentBlock>) {
    if paragraph.is_empty() {
        return;
    }
    blocks.push(ContentBlock::Paragraph {
        text: std::mem::take(paragraph),
    });
}

/// Collect every non-overlapping `![alt](url)` reference, left to right.
///
/// Matching is lazy: alt text runs to the first `](` and the url to the
/// first `)`, so an unterminated reference ends the scan and the line falls
/// through to paragraph accumulation.
fn scan_image_refs(line: &str) -> Vec<(String, String)> {
    let mut refs = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find("![") {
        let after_bang = &rest[start + 2..];
        let Some(mid) = after_bang.find("](") else {
            break;
        };
        let after_paren = &after_bang[mid + 2..];
        let Some(end) = after_paren.find(')') else {
            break;
        };

        refs.push((
            after_bang[..mid].to_string(),
            after_paren[..end].to_string(),
        ));
        rest = &after_paren[end + 1..];
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> ContentBlock {
        ContentBlock::Paragraph {
            text: text.to_string(),
        }
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(parse_content("").is_empty());
        assert!(parse_content("\n\n\n").is_empty());
    }

    #[test]
    fn adjacent_lines_merge_into_one_paragraph() {
        assert_eq!(parse_content("Hello\nWorld"), vec![paragraph("Hello World")]);
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        assert_eq!(
            parse_content("Hello\n\nWorld"),
            vec![paragraph("Hello"), paragraph("World")]
        );
    }

    #[test]
    fn heading_flushes_pending_paragraph() {
        assert_eq!(
            parse_content("Intro text\n## Section\nBody"),
            vec![
                paragraph("Intro text"),
                ContentBlock::Heading {
                    level: 2,
                    text: "Section".to_string()
                },
                paragraph("Body"),
            ]
        );
    }

    #[test]
    fn heading_levels_are_distinguished() {
        assert_eq!(
            parse_content("# One\n## Two\n### Three"),
            vec![
                ContentBlock::Heading {
                    level: 1,
                    text: "One".to_string()
                },
                ContentBlock::Heading {
                    level: 2,
                    text: "Two".to_string()
                },
                ContentBlock::Heading {
                    level: 3,
                    text: "Three".to_string()
                },
            ]
        );
    }

    #[test]
    fn image_line_emits_image_and_no_paragraph() {
        assert_eq!(
            parse_content("![a](http://x/y.png)"),
            vec![ContentBlock::Image {
                alt: "a".to_string(),
                url: "http://x/y.png".to_string()
            }]
        );
    }

    #[test]
    fn multiple_images_on_one_line_emit_in_order() {
        assert_eq!(
            parse_content("![one](u1) and ![two](u2)"),
            vec![
                ContentBlock::Image {
                    alt: "one".to_string(),
                    url: "u1".to_string()
                },
                ContentBlock::Image {
                    alt: "two".to_string(),
                    url: "u2".to_string()
                },
            ]
        );
    }

    #[test]
    fn unterminated_image_falls_through_to_paragraph() {
        assert_eq!(parse_content("![alt]("), vec![paragraph("![alt](")]);
    }

    #[test]
    fn list_items_are_independent_lines() {
        assert_eq!(
            parse_content("- one\n- two"),
            vec![
                ContentBlock::ListItem {
                    text: "one".to_string()
                },
                ContentBlock::ListItem {
                    text: "two".to_string()
                },
            ]
        );
    }

    #[test]
    fn star_marker_also_makes_a_list_item() {
        assert_eq!(
            parse_content("* starred"),
            vec![ContentBlock::ListItem {
                text: "starred".to_string()
            }]
        );
    }

    #[test]
    fn fence_lines_become_single_line_code_blocks() {
        // Each delimiter line is its own block; fenced regions do not merge.
        assert_eq!(
            parse_content("```rust\nlet x = 1;\n```"),
            vec![
                ContentBlock::Code {
                    text: "rust".to_string()
                },
                paragraph("let x = 1;"),
                ContentBlock::Code {
                    text: String::new()
                },
            ]
        );
    }

    #[test]
    fn heading_then_text_matches_reading_order() {
        assert_eq!(
            parse_content("# Title\nSome text"),
            vec![
                ContentBlock::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                paragraph("Some text"),
            ]
        );
    }

    #[test]
    fn unknown_markdown_passes_through_as_text() {
        assert_eq!(
            parse_content("**bold** and [link](u) stay literal"),
            vec![paragraph("**bold** and [link](u) stay literal")]
        );
    }

    #[test]
    fn trailing_paragraph_is_flushed() {
        assert_eq!(
            parse_content("- item\nclosing words"),
            vec![
                ContentBlock::ListItem {
                    text: "item".to_string()
                },
                paragraph("closing words"),
            ]
        );
    }

    #[test]
    fn parsing_is_pure() {
        let input = "# T\n\nbody\n- a\n![x](u)";
        assert_eq!(parse_content(input), parse_content(input));
    }

    #[test]
    fn arabic_text_flows_through_unchanged() {
        assert_eq!(
            parse_content("## مقدمة\nمرحبا بالعالم"),
            vec![
                ContentBlock::Heading {
                    level: 2,
                    text: "مقدمة".to_string()
                },
                paragraph("مرحبا بالعالم"),
            ]
        );
    }
}
