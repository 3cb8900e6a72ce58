use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    #[default]
    Resume,
    Cv,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Resume => "resume",
            DocType::Cv => "cv",
        }
    }

    /// Human label used in filenames and headings ("Resume" / "CV").
    pub fn label(&self) -> &'static str {
        match self {
            DocType::Resume => "Resume",
            DocType::Cv => "CV",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "resume" => Some(DocType::Resume),
            "cv" => Some(DocType::Cv),
            _ => None,
        }
    }

    /// Section kinds that participate in this document type, in display order.
    pub fn sections(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .iter()
            .copied()
            .filter(|kind| *self == DocType::Cv || !kind.is_cv_only())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Education,
    Experience,
    Skill,
    Research,
    Publication,
    Award,
}

impl SectionKind {
    /// Every kind, in the canonical display/export order.
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Skill,
        SectionKind::Research,
        SectionKind::Publication,
        SectionKind::Award,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Skill => "skill",
            SectionKind::Research => "research",
            SectionKind::Publication => "publication",
            SectionKind::Award => "award",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SectionKind::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Research, publications and awards only belong on a CV.
    pub fn is_cv_only(&self) -> bool {
        matches!(
            self,
            SectionKind::Research | SectionKind::Publication | SectionKind::Award
        )
    }

    /// Plain-text export heading.
    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Education => "EDUCATION",
            SectionKind::Experience => "EXPERIENCE",
            SectionKind::Skill => "SKILLS",
            SectionKind::Research => "RESEARCH",
            SectionKind::Publication => "PUBLICATIONS",
            SectionKind::Award => "AWARDS",
        }
    }

    /// Title-case label used by the HTML templates and the form.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Education => "Education",
            SectionKind::Experience => "Experience",
            SectionKind::Skill => "Skills",
            SectionKind::Research => "Research",
            SectionKind::Publication => "Publications",
            SectionKind::Award => "Awards",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Skill => "skills",
            SectionKind::Research => "research",
            SectionKind::Publication => "publications",
            SectionKind::Award => "awards",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub doc_type: String,
    pub title: String,
    pub template_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRow {
    /// Stored values outside the known set read back as a resume.
    pub fn doc_type(&self) -> DocType {
        DocType::parse(&self.doc_type).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PersonalDetail {
    pub image: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Skill {
    pub name: String,
    #[serde(default = "default_proficiency")]
    pub proficiency: i32,
}

fn default_proficiency() -> i32 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Research {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Publication {
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    pub date: Option<NaiveDate>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Award {
    pub title: String,
    pub issuer: String,
    pub date: Option<NaiveDate>,
}
