//! Section registry: which sections participate for which document type,
//! and the field schema each one is validated against.
//!
//! The form endpoints, the validator and the blank-form skeleton all read
//! from the same static table, so a section can only be persisted if it is
//! declared here for the document's type.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::document::{DocType, SectionKind};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line free text.
    LongText,
    Email,
    /// ISO `YYYY-MM-DD`.
    Date,
    Flag,
    /// Integer percentage, 0–100.
    Percent,
    Url,
    /// Opaque reference to an uploaded image.
    Image,
}

impl FieldKind {
    /// Value a blank form row starts with.
    pub fn blank_value(&self) -> Value {
        match self {
            FieldKind::Flag => Value::Bool(false),
            FieldKind::Percent => Value::from(50),
            FieldKind::Date | FieldKind::Url | FieldKind::Image => Value::Null,
            FieldKind::Text | FieldKind::LongText | FieldKind::Email => {
                Value::String(String::new())
            }
        }
    }

    /// Flags and percentages always carry a value, so they never make a row
    /// count as filled in.
    pub fn counts_toward_content(&self) -> bool {
        !matches!(self, FieldKind::Flag | FieldKind::Percent)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_len: Option<usize>,
}

const fn field(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
    max_len: Option<usize>,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
        max_len,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionDescriptor {
    pub kind: SectionKind,
    pub name: &'static str,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub allow_multiple: bool,
    /// Blank instances shown by an empty form.
    pub default_rows: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Schemas
// ────────────────────────────────────────────────────────────────────────────

pub const PERSONAL_FIELDS: &[FieldSpec] = &[
    field("image", "Photo", FieldKind::Image, false, None),
    field("full_name", "Full name", FieldKind::Text, true, Some(200)),
    field("email", "Email", FieldKind::Email, true, Some(254)),
    field("phone", "Phone", FieldKind::Text, true, Some(20)),
    field("address", "Address", FieldKind::Text, false, Some(255)),
    field("linkedin_url", "LinkedIn", FieldKind::Url, false, Some(200)),
    field("portfolio_url", "Portfolio", FieldKind::Url, false, Some(200)),
    field("summary", "Summary", FieldKind::LongText, false, None),
];

const EDUCATION_FIELDS: &[FieldSpec] = &[
    field("institution", "Institution", FieldKind::Text, true, Some(200)),
    field("degree", "Degree", FieldKind::Text, true, Some(200)),
    field("start_date", "Start date", FieldKind::Date, true, None),
    field("end_date", "End date", FieldKind::Date, false, None),
    field("is_current", "Currently studying", FieldKind::Flag, false, None),
    field("description", "Description", FieldKind::LongText, false, None),
];

const EXPERIENCE_FIELDS: &[FieldSpec] = &[
    field("company", "Company", FieldKind::Text, true, Some(200)),
    field("position", "Position", FieldKind::Text, true, Some(200)),
    field("start_date", "Start date", FieldKind::Date, true, None),
    field("end_date", "End date", FieldKind::Date, false, None),
    field("is_current", "Current position", FieldKind::Flag, false, None),
    field("description", "Description", FieldKind::LongText, false, None),
];

const SKILL_FIELDS: &[FieldSpec] = &[
    field("name", "Skill", FieldKind::Text, true, Some(100)),
    field("proficiency", "Proficiency", FieldKind::Percent, false, None),
];

const RESEARCH_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text, true, Some(255)),
    field("description", "Description", FieldKind::LongText, false, None),
    field("date", "Date", FieldKind::Date, false, None),
];

const PUBLICATION_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text, true, Some(255)),
    field("publisher", "Publisher", FieldKind::Text, false, Some(255)),
    field("date", "Date", FieldKind::Date, false, None),
    field("url", "URL", FieldKind::Url, false, Some(200)),
];

const AWARD_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text, true, Some(200)),
    field("issuer", "Issuer", FieldKind::Text, true, Some(200)),
    field("date", "Date", FieldKind::Date, false, None),
];

/// Indexed in `SectionKind::ALL` order.
static SECTIONS: [SectionDescriptor; 6] = [
    SectionDescriptor {
        kind: SectionKind::Education,
        name: "education",
        label: "Education",
        fields: EDUCATION_FIELDS,
        allow_multiple: true,
        default_rows: 1,
    },
    SectionDescriptor {
        kind: SectionKind::Experience,
        name: "experience",
        label: "Experience",
        fields: EXPERIENCE_FIELDS,
        allow_multiple: true,
        default_rows: 1,
    },
    SectionDescriptor {
        kind: SectionKind::Skill,
        name: "skill",
        label: "Skills",
        fields: SKILL_FIELDS,
        allow_multiple: true,
        default_rows: 3,
    },
    SectionDescriptor {
        kind: SectionKind::Research,
        name: "research",
        label: "Research",
        fields: RESEARCH_FIELDS,
        allow_multiple: true,
        default_rows: 1,
    },
    SectionDescriptor {
        kind: SectionKind::Publication,
        name: "publication",
        label: "Publications",
        fields: PUBLICATION_FIELDS,
        allow_multiple: true,
        default_rows: 1,
    },
    SectionDescriptor {
        kind: SectionKind::Award,
        name: "award",
        label: "Awards",
        fields: AWARD_FIELDS,
        allow_multiple: true,
        default_rows: 1,
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Lookups
// ────────────────────────────────────────────────────────────────────────────

pub fn descriptor(kind: SectionKind) -> &'static SectionDescriptor {
    let idx = match kind {
        SectionKind::Education => 0,
        SectionKind::Experience => 1,
        SectionKind::Skill => 2,
        SectionKind::Research => 3,
        SectionKind::Publication => 4,
        SectionKind::Award => 5,
    };
    &SECTIONS[idx]
}

/// Ordered section descriptors participating in a document type.
pub fn sections_for(doc_type: DocType) -> Vec<&'static SectionDescriptor> {
    doc_type.sections().into_iter().map(descriptor).collect()
}

/// Registry membership check used on save. `None` means the section must be
/// ignored for this document type.
pub fn lookup(doc_type: DocType, name: &str) -> Option<&'static SectionDescriptor> {
    SectionKind::from_name(name)
        .filter(|kind| doc_type.sections().contains(kind))
        .map(descriptor)
}

/// A blank row with every field at its starting value.
pub fn blank_row(fields: &[FieldSpec]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| (f.name.to_string(), f.kind.blank_value()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Empty form skeleton
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SectionSkeleton {
    pub section: &'static SectionDescriptor,
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSkeleton {
    pub doc_type: DocType,
    pub personal_fields: &'static [FieldSpec],
    pub personal: Map<String, Value>,
    pub sections: Vec<SectionSkeleton>,
}

/// The layout of an empty create form for a document type.
pub fn form_skeleton(doc_type: DocType) -> FormSkeleton {
    FormSkeleton {
        doc_type,
        personal_fields: PERSONAL_FIELDS,
        personal: blank_row(PERSONAL_FIELDS),
        sections: sections_for(doc_type)
            .into_iter()
            .map(|section| SectionSkeleton {
                section,
                rows: (0..section.default_rows)
                    .map(|_| blank_row(section.fields))
                    .collect(),
            })
            .collect(),
    }
}
