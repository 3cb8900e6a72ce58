//! The in-memory aggregate of a resume/CV and the read-only
//! `DocumentView` capability shared by stored documents and the demo sample.

use serde::Serialize;

use crate::models::document::{
    Award, DocType, DocumentRow, Education, Experience, PersonalDetail, Publication, Research,
    SectionKind, Skill,
};

/// Read-only view over a document and its sections.
///
/// Everything downstream of persistence (flattening, templates, encoders)
/// consumes this trait, never a concrete aggregate.
pub trait DocumentView: Send + Sync {
    fn doc_type(&self) -> DocType;
    fn title(&self) -> &str;
    fn template_name(&self) -> &str;
    fn personal_detail(&self) -> Option<&PersonalDetail>;
    fn education(&self) -> &[Education];
    fn experience(&self) -> &[Experience];
    fn skills(&self) -> &[Skill];
    fn research(&self) -> &[Research];
    fn publications(&self) -> &[Publication];
    fn awards(&self) -> &[Award];
}

/// A persisted document with its personal detail and every child section,
/// each list in stored (insertion) order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAggregate {
    pub document: DocumentRow,
    pub personal_detail: Option<PersonalDetail>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub research: Vec<Research>,
    pub publications: Vec<Publication>,
    pub awards: Vec<Award>,
}

impl DocumentAggregate {
    pub fn new(document: DocumentRow) -> Self {
        Self {
            document,
            personal_detail: None,
            education: Vec::new(),
            experience: Vec::new(),
            skills: Vec::new(),
            research: Vec::new(),
            publications: Vec::new(),
            awards: Vec::new(),
        }
    }
}

impl DocumentView for DocumentAggregate {
    fn doc_type(&self) -> DocType {
        self.document.doc_type()
    }

    fn title(&self) -> &str {
        &self.document.title
    }

    fn template_name(&self) -> &str {
        &self.document.template_name
    }

    fn personal_detail(&self) -> Option<&PersonalDetail> {
        self.personal_detail.as_ref()
    }

    fn education(&self) -> &[Education] {
        &self.education
    }

    fn experience(&self) -> &[Experience] {
        &self.experience
    }

    fn skills(&self) -> &[Skill] {
        &self.skills
    }

    fn research(&self) -> &[Research] {
        &self.research
    }

    fn publications(&self) -> &[Publication] {
        &self.publications
    }

    fn awards(&self) -> &[Award] {
        &self.awards
    }
}

/// Ordered section names applicable to a document type.
pub fn get_sections(doc_type: DocType) -> Vec<&'static str> {
    doc_type.sections().iter().map(|k| k.as_str()).collect()
}

/// Whether the named section is CV-only. Unknown names are not.
pub fn is_cv_section(name: &str) -> bool {
    SectionKind::from_name(name).is_some_and(|k| k.is_cv_only())
}
