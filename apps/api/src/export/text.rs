//! Plain-text encoder.
//!
//! Contact block first, then the summary, then one block per non-empty
//! section. Blocks are separated by exactly one blank line and the output
//! ends with a single newline.

use crate::document::flatten::{FlatDocument, FlatRow, FlatSection};
use crate::models::document::SectionKind;

pub fn encode_text(doc: &FlatDocument) -> String {
    let p = &doc.personal;
    let mut contact = vec![
        format!("NAME: {}", p.full_name),
        format!("EMAIL: {}", p.email),
        format!("PHONE: {}", p.phone),
        format!("ADDRESS: {}", p.address),
    ];
    if let Some(url) = p.linkedin_url.as_deref().filter(|u| !u.is_empty()) {
        contact.push(format!("LINKEDIN: {url}"));
    }
    if let Some(url) = p.portfolio_url.as_deref().filter(|u| !u.is_empty()) {
        contact.push(format!("PORTFOLIO: {url}"));
    }

    let mut blocks = vec![
        contact.join("\n"),
        format!("SUMMARY:\n{}", p.summary),
    ];
    blocks.extend(doc.sections.iter().map(section_block));

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn section_block(section: &FlatSection) -> String {
    let mut lines = vec![format!("{}:", section.heading)];
    for row in &section.rows {
        row_lines(section.kind, row, &mut lines);
    }
    lines.join("\n")
}

fn row_lines(kind: SectionKind, row: &FlatRow, lines: &mut Vec<String>) {
    match kind {
        SectionKind::Education | SectionKind::Experience => {
            lines.push(format!(
                "- {} at {} ({} - {})",
                row.title, row.subtitle, row.start, row.end
            ));
            if !row.description.is_empty() {
                lines.push(format!("  {}", row.description));
            }
        }
        SectionKind::Skill => {
            lines.push(format!("- {} ({}%)", row.title, row.proficiency.unwrap_or(0)));
        }
        SectionKind::Research => {
            lines.push(format!("- {} ({}): {}", row.title, row.date, row.description));
        }
        SectionKind::Publication | SectionKind::Award => {
            lines.push(format!("- {} ({}, {})", row.title, row.subtitle, row.date));
        }
    }
}
