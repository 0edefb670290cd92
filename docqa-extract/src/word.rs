//! Word-processor loader (.docx, .doc): paragraphs joined into a single unit.
//!
//! Legacy .doc files are routed through the same reader; genuinely old binary
//! documents fail parsing and surface as an extraction failure.

use crate::{DocumentUnit, ExtractError, Result, SourceFormat};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::path::Path;

pub fn load(path: &Path) -> Result<Vec<DocumentUnit>> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| ExtractError::extraction(path, e))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let text = paragraph_text(&paragraph.children);
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    let content = paragraphs.join("\n\n");
    Ok(vec![DocumentUnit::new(content, path, 0, SourceFormat::Word)])
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for piece in &run.children {
                    match piece {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push(' '),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => {
                text.push_str(&paragraph_text(&link.children));
            }
            _ => {}
        }
    }
    text.trim().to_string()
}
