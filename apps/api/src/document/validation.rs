//! Form submission validation.
//!
//! A submission is checked field by field against the registry schema,
//! normalized, and only then deserialized into typed rows. Every error is
//! collected so the form can be re-presented with all messages at once;
//! nothing reaches the store unless the whole submission is valid.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::document::registry::{self, FieldKind, FieldSpec, SectionDescriptor, PERSONAL_FIELDS};
use crate::document::view::{get_sections, is_cv_section, DocumentAggregate};
use crate::models::document::{
    Award, DocType, Education, Experience, PersonalDetail, Publication, Research, SectionKind,
    Skill,
};
use crate::render::catalog::TemplateCatalog;

pub type RowInput = Map<String, Value>;

const DEFAULT_TITLE: &str = "My Document";
const TITLE_MAX_LEN: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / error types
// ────────────────────────────────────────────────────────────────────────────

/// Body of a create or edit submission. Section rows are loose JSON objects
/// keyed by registry section name; they are typed only after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSubmission {
    pub owner_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub personal: RowInput,
    #[serde(default)]
    pub sections: BTreeMap<String, Vec<RowInput>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    /// `document`, `personal`, or a section name.
    pub section: String,
    pub row: Option<usize>,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormErrors {
    pub fields: Vec<FieldError>,
}

impl FormErrors {
    fn push(&mut self, section: &str, row: Option<usize>, field: &str, message: impl Into<String>) {
        self.fields.push(FieldError {
            section: section.to_string(),
            row,
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} invalid field(s)", self.fields.len())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validated output
// ────────────────────────────────────────────────────────────────────────────

/// Typed rows per section. `None` means the section was not part of the
/// submission and stored rows must be left untouched; `Some` replaces them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionRows {
    pub education: Option<Vec<Education>>,
    pub experience: Option<Vec<Experience>>,
    pub skills: Option<Vec<Skill>>,
    pub research: Option<Vec<Research>>,
    pub publications: Option<Vec<Publication>>,
    pub awards: Option<Vec<Award>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    pub doc_type: DocType,
    pub title: String,
    /// Always an allowlisted template id.
    pub template_name: String,
    pub personal: PersonalDetail,
    pub sections: SectionRows,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Validates a full submission. `fallback_doc_type` applies when the body
/// does not name one (the `?type=` of a create, or the stored type on edit).
pub fn validate_submission(
    submission: &DocumentSubmission,
    fallback_doc_type: DocType,
    catalog: &TemplateCatalog,
) -> Result<ValidatedDocument, FormErrors> {
    let mut errors = FormErrors::default();

    let doc_type = match submission.doc_type.as_deref() {
        None | Some("") => fallback_doc_type,
        Some(raw) => DocType::parse(raw).unwrap_or_else(|| {
            errors.push("document", None, "doc_type", "Select a valid choice: resume or cv.");
            fallback_doc_type
        }),
    };

    let title = submission
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string();
    if title.chars().count() > TITLE_MAX_LEN {
        errors.push(
            "document",
            None,
            "title",
            format!("Ensure this value has at most {TITLE_MAX_LEN} characters."),
        );
    }

    let requested_template = submission.template_name.as_deref().unwrap_or_default();
    let template = catalog.resolve(requested_template);
    if !requested_template.is_empty() && !catalog.contains(requested_template) {
        warn!("Unknown template '{requested_template}' on save, storing {}", template.id);
    }

    let personal = validate_row::<PersonalDetail>(
        "personal",
        None,
        PERSONAL_FIELDS,
        &submission.personal,
        &mut errors,
    );

    let mut sections = SectionRows::default();
    for (name, rows) in &submission.sections {
        let Some(descriptor) = registry::lookup(doc_type, name) else {
            if is_cv_section(name) {
                warn!(
                    "Ignoring CV-only section '{name}' on a {} document",
                    doc_type.as_str()
                );
            } else {
                warn!("Ignoring unknown section '{name}'");
            }
            continue;
        };
        collect_section(descriptor, rows, &mut sections, &mut errors);
    }

    match personal {
        Some(personal) if errors.is_empty() => Ok(ValidatedDocument {
            doc_type,
            title,
            template_name: template.id.to_string(),
            personal,
            sections,
        }),
        _ => Err(errors),
    }
}

fn collect_section(
    descriptor: &SectionDescriptor,
    rows: &[RowInput],
    out: &mut SectionRows,
    errors: &mut FormErrors,
) {
    let filled: Vec<(usize, &RowInput)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !is_blank_row(descriptor.fields, row))
        .collect();

    if !descriptor.allow_multiple && filled.len() > 1 {
        errors.push(descriptor.name, None, "__all__", "Only one entry is allowed.");
    }

    fn typed<T: DeserializeOwned>(
        descriptor: &SectionDescriptor,
        filled: &[(usize, &RowInput)],
        errors: &mut FormErrors,
    ) -> Vec<(usize, T)> {
        filled
            .iter()
            .filter_map(|(i, row)| {
                validate_row::<T>(descriptor.name, Some(*i), descriptor.fields, row, errors)
                    .map(|typed| (*i, typed))
            })
            .collect()
    }

    fn untagged<T>(rows: Vec<(usize, T)>) -> Vec<T> {
        rows.into_iter().map(|(_, row)| row).collect()
    }

    match descriptor.kind {
        SectionKind::Education => {
            let rows: Vec<(usize, Education)> = typed(descriptor, &filled, errors);
            for (i, row) in &rows {
                check_period(descriptor.name, *i, row.start_date, row.end_date, row.is_current, errors);
            }
            out.education = Some(untagged(rows));
        }
        SectionKind::Experience => {
            let rows: Vec<(usize, Experience)> = typed(descriptor, &filled, errors);
            for (i, row) in &rows {
                check_period(descriptor.name, *i, row.start_date, row.end_date, row.is_current, errors);
            }
            out.experience = Some(untagged(rows));
        }
        SectionKind::Skill => out.skills = Some(untagged(typed(descriptor, &filled, errors))),
        SectionKind::Research => out.research = Some(untagged(typed(descriptor, &filled, errors))),
        SectionKind::Publication => {
            out.publications = Some(untagged(typed(descriptor, &filled, errors)))
        }
        SectionKind::Award => out.awards = Some(untagged(typed(descriptor, &filled, errors))),
    }
}

/// An end date before the start is only an error when the entry is not current
/// (a current entry's end date is ignored everywhere).
fn check_period(
    section: &str,
    row: usize,
    start: NaiveDate,
    end: Option<NaiveDate>,
    is_current: bool,
    errors: &mut FormErrors,
) {
    if let Some(end) = end {
        if !is_current && end < start {
            errors.push(section, Some(row), "end_date", "End date cannot be before start date.");
        }
    }
}

/// Blank "extra" rows of a form are skipped rather than rejected.
fn is_blank_row(fields: &[FieldSpec], row: &RowInput) -> bool {
    fields
        .iter()
        .filter(|f| f.kind.counts_toward_content())
        .all(|f| is_blank(row.get(f.name)))
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Validates one row against its schema and deserializes it. Returns `None`
/// after recording errors.
fn validate_row<T: DeserializeOwned>(
    section: &str,
    row: Option<usize>,
    fields: &[FieldSpec],
    input: &RowInput,
    errors: &mut FormErrors,
) -> Option<T> {
    let before = errors.fields.len();
    let mut normalized = Map::new();

    for spec in fields {
        match normalize_field(spec, input.get(spec.name)) {
            Ok(value) => {
                normalized.insert(spec.name.to_string(), value);
            }
            Err(message) => errors.push(section, row, spec.name, message),
        }
    }

    if errors.fields.len() > before {
        return None;
    }

    match serde_json::from_value(Value::Object(normalized)) {
        Ok(typed) => Some(typed),
        Err(e) => {
            errors.push(section, row, "__all__", e.to_string());
            None
        }
    }
}

/// Checks a single field value and returns its normalized form.
fn normalize_field(spec: &FieldSpec, value: Option<&Value>) -> Result<Value, String> {
    if is_blank(value) {
        if spec.required {
            return Err("This field is required.".to_string());
        }
        return Ok(spec.kind.blank_value());
    }
    let value = value.unwrap_or(&Value::Null);

    match spec.kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Image => {
            let s = as_text(value)?;
            check_len(spec, &s)?;
            Ok(Value::String(s))
        }
        FieldKind::Email => {
            let s = as_text(value)?;
            check_len(spec, &s)?;
            if !is_valid_email(&s) {
                return Err("Enter a valid email address.".to_string());
            }
            Ok(Value::String(s))
        }
        FieldKind::Url => {
            let s = normalize_url(&as_text(value)?)?;
            check_len(spec, &s)?;
            Ok(Value::String(s))
        }
        FieldKind::Date => {
            let s = as_text(value)?;
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(|_| Value::String(s))
                .map_err(|_| "Enter a valid date (YYYY-MM-DD).".to_string())
        }
        FieldKind::Flag => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) if matches!(s.as_str(), "on" | "true" | "1") => Ok(Value::Bool(true)),
            Value::String(s) if matches!(s.as_str(), "off" | "false" | "0") => {
                Ok(Value::Bool(false))
            }
            _ => Err("Enter true or false.".to_string()),
        },
        FieldKind::Percent => {
            let n = match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(|| "Enter a whole number.".to_string())?;
            if !(0..=100).contains(&n) {
                return Err("Ensure this value is between 0 and 100.".to_string());
            }
            Ok(Value::from(n))
        }
    }
}

fn as_text(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| "Enter text.".to_string())
}

fn check_len(spec: &FieldSpec, s: &str) -> Result<(), String> {
    match spec.max_len {
        Some(max) if s.chars().count() > max => Err(format!(
            "Ensure this value has at most {max} characters."
        )),
        _ => Ok(()),
    }
}

fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

/// Accepts bare hosts like `linkedin.com/in/x` by assuming https.
fn normalize_url(raw: &str) -> Result<String, String> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    match Url::parse(&candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
            Ok(candidate)
        }
        _ => Err("Enter a valid URL.".to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Edit form
// ────────────────────────────────────────────────────────────────────────────

/// Projects a stored document back into submission shape, so that submitting
/// it unchanged is a no-op.
pub fn edit_form(aggregate: &DocumentAggregate) -> DocumentSubmission {
    fn rows<T: Serialize>(items: &[T]) -> Vec<RowInput> {
        items
            .iter()
            .filter_map(|item| match serde_json::to_value(item) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            })
            .collect()
    }

    let doc = &aggregate.document;
    let sections = get_sections(doc.doc_type())
        .into_iter()
        .filter_map(|name| {
            let section_rows = match SectionKind::from_name(name)? {
                SectionKind::Education => rows(&aggregate.education),
                SectionKind::Experience => rows(&aggregate.experience),
                SectionKind::Skill => rows(&aggregate.skills),
                SectionKind::Research => rows(&aggregate.research),
                SectionKind::Publication => rows(&aggregate.publications),
                SectionKind::Award => rows(&aggregate.awards),
            };
            Some((name.to_string(), section_rows))
        })
        .collect();

    let personal = aggregate
        .personal_detail
        .as_ref()
        .map(|p| rows(std::slice::from_ref(p)).into_iter().next().unwrap_or_default())
        .unwrap_or_else(|| registry::blank_row(PERSONAL_FIELDS));

    DocumentSubmission {
        owner_id: doc.owner_id,
        title: Some(doc.title.clone()),
        template_name: Some(doc.template_name.clone()),
        doc_type: Some(doc.doc_type.clone()),
        personal,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::view::tests::{date, make_document};
    use serde_json::json;

    fn personal_input() -> RowInput {
        json!({
            "full_name": "Jane Q Public",
            "email": "jane@example.com",
            "phone": "+1 555 0100",
            "address": "Lisbon, Portugal",
            "linkedin_url": "linkedin.com/in/janeq",
            "summary": "Systems engineer."
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn submission(doc_type: &str, sections: Value) -> DocumentSubmission {
        serde_json::from_value(json!({
            "owner_id": Uuid::new_v4(),
            "title": "Platform CV",
            "template_name": "tokyo",
            "doc_type": doc_type,
            "personal": personal_input(),
            "sections": sections,
        }))
        .unwrap()
    }

    fn edu(institution: &str) -> Value {
        json!({
            "institution": institution,
            "degree": "BSc",
            "start_date": "2012-09-01",
            "end_date": "2015-06-30",
            "is_current": false,
            "description": ""
        })
    }

    fn exp(company: &str, current: bool) -> Value {
        json!({
            "company": company,
            "position": "Engineer",
            "start_date": "2016-01-01",
            "end_date": null,
            "is_current": current,
            "description": "Built things"
        })
    }

    #[test]
    fn test_valid_submission_types_rows() {
        let catalog = TemplateCatalog::builtin();
        let sub = submission(
            "cv",
            json!({
                "education": [edu("MIT")],
                "experience": [exp("Acme", true)],
                "skill": [{"name": "Rust", "proficiency": 90}],
            }),
        );
        let doc = validate_submission(&sub, DocType::Resume, &catalog).unwrap();
        assert_eq!(doc.doc_type, DocType::Cv);
        assert_eq!(doc.template_name, "tokyo");
        assert_eq!(doc.personal.full_name, "Jane Q Public");
        assert_eq!(
            doc.personal.linkedin_url.as_deref(),
            Some("https://linkedin.com/in/janeq")
        );
        assert_eq!(doc.personal.portfolio_url, None);
        let education = doc.sections.education.unwrap();
        assert_eq!(education[0].start_date, date(2012, 9, 1));
        assert!(doc.sections.experience.unwrap()[0].is_current);
        assert_eq!(doc.sections.skills.unwrap()[0].proficiency, 90);
        assert!(doc.sections.research.is_none(), "unsubmitted section stays None");
    }

    #[test]
    fn test_blank_extra_rows_are_skipped() {
        let catalog = TemplateCatalog::builtin();
        let sub = submission(
            "resume",
            json!({
                "skill": [
                    {"name": "Rust", "proficiency": 80},
                    {"name": "", "proficiency": 50},
                    {"name": "   ", "proficiency": 50}
                ]
            }),
        );
        let doc = validate_submission(&sub, DocType::Resume, &catalog).unwrap();
        assert_eq!(doc.sections.skills.unwrap().len(), 1);
    }

    #[test]
    fn test_cv_sections_ignored_on_resume() {
        let catalog = TemplateCatalog::builtin();
        let sub = submission(
            "resume",
            json!({
                "award": [{"title": "Best Paper", "issuer": "ACM"}],
                "hobbies": [{"name": "chess"}]
            }),
        );
        let doc = validate_submission(&sub, DocType::Resume, &catalog).unwrap();
        assert!(doc.sections.awards.is_none());
        assert_eq!(doc.sections, SectionRows::default());
    }

    #[test]
    fn test_unknown_template_falls_back_on_save() {
        let catalog = TemplateCatalog::builtin();
        let mut sub = submission("resume", json!({}));
        sub.template_name = Some("../../etc/passwd".to_string());
        let doc = validate_submission(&sub, DocType::Resume, &catalog).unwrap();
        assert_eq!(doc.template_name, "modern");
    }

    #[test]
    fn test_one_bad_row_rejects_whole_submission() {
        let catalog = TemplateCatalog::builtin();
        let sub = submission(
            "resume",
            json!({
                "education": [edu("MIT"), {"institution": "Nowhere", "degree": "", "start_date": "yesterday"}],
            }),
        );
        let errors = validate_submission(&sub, DocType::Resume, &catalog).unwrap_err();
        let fields: Vec<_> = errors
            .fields
            .iter()
            .map(|e| (e.section.as_str(), e.row, e.field.as_str()))
            .collect();
        assert!(fields.contains(&("education", Some(1), "degree")));
        assert!(fields.contains(&("education", Some(1), "start_date")));
        assert_eq!(errors.fields.len(), 2);
    }

    #[test]
    fn test_personal_required_fields() {
        let catalog = TemplateCatalog::builtin();
        let mut sub = submission("resume", json!({}));
        sub.personal = Map::new();
        let errors = validate_submission(&sub, DocType::Resume, &catalog).unwrap_err();
        let missing: Vec<_> = errors
            .fields
            .iter()
            .filter(|e| e.section == "personal")
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(missing, vec!["full_name", "email", "phone"]);
    }

    #[test]
    fn test_field_rules() {
        let catalog = TemplateCatalog::builtin();
        let mut sub = submission(
            "cv",
            json!({
                "skill": [{"name": "Rust", "proficiency": 140}],
                "publication": [{"title": "Paper", "url": "ftp://example.com/x"}],
            }),
        );
        sub.personal
            .insert("email".to_string(), Value::String("not-an-email".to_string()));
        sub.personal
            .insert("phone".to_string(), Value::String("1".repeat(21)));
        let errors = validate_submission(&sub, DocType::Cv, &catalog).unwrap_err();
        let fields: Vec<_> = errors.fields.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"proficiency"));
        assert!(fields.contains(&"url"));
    }

    #[test]
    fn test_end_before_start_only_rejected_when_not_current() {
        let catalog = TemplateCatalog::builtin();
        let mut bad = exp("Acme", false);
        bad["end_date"] = json!("2015-01-01");
        let mut current = exp("Initech", true);
        current["end_date"] = json!("2015-01-01");

        let sub = submission("resume", json!({ "experience": [current.clone()] }));
        assert!(validate_submission(&sub, DocType::Resume, &catalog).is_ok());

        let sub = submission("resume", json!({ "experience": [bad, current] }));
        let errors = validate_submission(&sub, DocType::Resume, &catalog).unwrap_err();
        assert_eq!(errors.fields.len(), 1);
        assert_eq!(errors.fields[0].row, Some(0));
        assert_eq!(errors.fields[0].field, "end_date");
    }

    #[test]
    fn test_invalid_doc_type_is_a_field_error() {
        let catalog = TemplateCatalog::builtin();
        let sub = submission("letter", json!({}));
        let errors = validate_submission(&sub, DocType::Resume, &catalog).unwrap_err();
        assert_eq!(errors.fields[0].field, "doc_type");
    }

    #[test]
    fn test_edit_round_trip_preserves_counts_and_order() {
        let catalog = TemplateCatalog::builtin();
        let sub = submission(
            "cv",
            json!({
                "education": [edu("First"), edu("Second"), edu("Third")],
                "experience": [exp("Alpha", true), exp("Beta", false)],
            }),
        );
        let created = validate_submission(&sub, DocType::Cv, &catalog).unwrap();

        let mut document = make_document(DocType::Cv);
        document.template_name = created.template_name.clone();
        let aggregate = DocumentAggregate {
            document,
            personal_detail: Some(created.personal.clone()),
            education: created.sections.education.clone().unwrap(),
            experience: created.sections.experience.clone().unwrap(),
            skills: vec![],
            research: vec![],
            publications: vec![],
            awards: vec![],
        };

        let resubmitted = validate_submission(&edit_form(&aggregate), DocType::Cv, &catalog).unwrap();
        let education = resubmitted.sections.education.unwrap();
        let experience = resubmitted.sections.experience.unwrap();
        assert_eq!(education.len(), 3);
        assert_eq!(experience.len(), 2);
        let names: Vec<_> = education.iter().map(|e| e.institution.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert_eq!(education, aggregate.education);
        assert_eq!(experience, aggregate.experience);
        assert_eq!(resubmitted.personal, created.personal);
    }

    #[test]
    fn test_edit_form_without_personal_detail_is_blank() {
        let aggregate = DocumentAggregate::new(make_document(DocType::Resume));
        let form = edit_form(&aggregate);
        assert_eq!(form.personal.get("full_name"), Some(&json!("")));
        assert!(!form.sections.contains_key("award"));
    }

    #[test]
    fn test_edit_form_lists_registered_sections_for_type() {
        let cv = edit_form(&DocumentAggregate::new(make_document(DocType::Cv)));
        let names: Vec<_> = cv.sections.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["award", "education", "experience", "publication", "research", "skill"]
        );

        let mut resume = DocumentAggregate::new(make_document(DocType::Resume));
        resume.awards.push(Award {
            title: "Kept in storage".to_string(),
            issuer: "ACM".to_string(),
            date: None,
        });
        let form = edit_form(&resume);
        assert_eq!(form.sections.len(), 3);
        assert!(!form.sections.contains_key("award"));
    }
}
