//! Flattening, the one place that decides section order, which sections are
//! present, and how each row reads. The text encoder and every HTML template
//! consume a [`FlatDocument`]; none of them re-derive these rules.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::document::view::DocumentView;
use crate::models::document::{DocType, PersonalDetail, SectionKind};

/// Literal end label for entries marked current.
pub const PRESENT: &str = "Present";

#[derive(Debug, Error, PartialEq)]
pub enum FlattenError {
    #[error("document has no personal details")]
    MissingPersonalDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatDocument {
    pub doc_type: DocType,
    pub doc_label: &'static str,
    pub title: String,
    pub personal: PersonalDetail,
    /// Non-empty sections only, in canonical order.
    pub sections: Vec<FlatSection>,
}

#[cfg(test)]
impl FlatDocument {
    pub fn section(&self, kind: SectionKind) -> Option<&FlatSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlatSection {
    pub kind: SectionKind,
    pub name: &'static str,
    pub heading: &'static str,
    pub label: &'static str,
    pub rows: Vec<FlatRow>,
}

/// A section row with every field already formatted for output.
///
/// | kind        | title    | subtitle    | start/end | date |
/// |-------------|----------|-------------|-----------|------|
/// | education   | degree   | institution | yes       |      |
/// | experience  | position | company     | yes       |      |
/// | skill       | name     |             |           |      |
/// | research    | title    |             |           | yes  |
/// | publication | title    | publisher   |           | yes  |
/// | award       | title    | issuer      |           | yes  |
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FlatRow {
    pub title: String,
    pub subtitle: String,
    pub start: String,
    /// `Present` for current entries, whatever end date is stored.
    pub end: String,
    pub is_current: bool,
    pub date: String,
    pub description: String,
    pub proficiency: Option<i32>,
    pub url: Option<String>,
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn end_label(end: Option<NaiveDate>, is_current: bool) -> String {
    if is_current {
        PRESENT.to_string()
    } else {
        fmt_date(end)
    }
}

/// Projects any document view into the ordered, presence-filtered form.
///
/// Sections are included by row presence, not by document type: a resume
/// that still holds CV-only rows renders them.
pub fn flatten(view: &dyn DocumentView) -> Result<FlatDocument, FlattenError> {
    let personal = view
        .personal_detail()
        .cloned()
        .ok_or(FlattenError::MissingPersonalDetail)?;

    let sections = SectionKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let rows = flatten_rows(view, kind);
            (!rows.is_empty()).then(|| FlatSection {
                kind,
                name: kind.as_str(),
                heading: kind.heading(),
                label: kind.label(),
                rows,
            })
        })
        .collect();

    let doc_type = view.doc_type();
    Ok(FlatDocument {
        doc_type,
        doc_label: doc_type.label(),
        title: view.title().to_string(),
        personal,
        sections,
    })
}

fn flatten_rows(view: &dyn DocumentView, kind: SectionKind) -> Vec<FlatRow> {
    match kind {
        SectionKind::Education => view
            .education()
            .iter()
            .map(|e| FlatRow {
                title: e.degree.clone(),
                subtitle: e.institution.clone(),
                start: fmt_date(Some(e.start_date)),
                end: end_label(e.end_date, e.is_current),
                is_current: e.is_current,
                description: e.description.clone(),
                ..Default::default()
            })
            .collect(),
        SectionKind::Experience => view
            .experience()
            .iter()
            .map(|e| FlatRow {
                title: e.position.clone(),
                subtitle: e.company.clone(),
                start: fmt_date(Some(e.start_date)),
                end: end_label(e.end_date, e.is_current),
                is_current: e.is_current,
                description: e.description.clone(),
                ..Default::default()
            })
            .collect(),
        SectionKind::Skill => view
            .skills()
            .iter()
            .map(|s| FlatRow {
                title: s.name.clone(),
                proficiency: Some(s.proficiency),
                ..Default::default()
            })
            .collect(),
        SectionKind::Research => view
            .research()
            .iter()
            .map(|r| FlatRow {
                title: r.title.clone(),
                date: fmt_date(r.date),
                description: r.description.clone(),
                ..Default::default()
            })
            .collect(),
        SectionKind::Publication => view
            .publications()
            .iter()
            .map(|p| FlatRow {
                title: p.title.clone(),
                subtitle: p.publisher.clone(),
                date: fmt_date(p.date),
                url: p.url.clone().filter(|u| !u.is_empty()),
                ..Default::default()
            })
            .collect(),
        SectionKind::Award => view
            .awards()
            .iter()
            .map(|a| FlatRow {
                title: a.title.clone(),
                subtitle: a.issuer.clone(),
                date: fmt_date(a.date),
                ..Default::default()
            })
            .collect(),
    }
}
