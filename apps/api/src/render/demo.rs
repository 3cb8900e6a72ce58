//! Fixed sample document for the template gallery previews.

use chrono::NaiveDate;

use crate::document::view::DocumentView;
use crate::models::document::{
    Award, DocType, Education, Experience, PersonalDetail, Publication, Research, Skill,
};
use crate::render::catalog::DEFAULT_TEMPLATE;

/// A complete CV with every section populated. Built fresh per request and
/// never persisted.
#[derive(Debug, Clone)]
pub struct DemoDocument {
    personal: PersonalDetail,
    education: Vec<Education>,
    experience: Vec<Experience>,
    skills: Vec<Skill>,
    research: Vec<Research>,
    publications: Vec<Publication>,
    awards: Vec<Award>,
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    // constant inputs below are all valid calendar dates
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn skill(name: &str, proficiency: i32) -> Skill {
    Skill {
        name: name.to_string(),
        proficiency,
    }
}

impl DemoDocument {
    pub fn sample() -> Self {
        let personal = PersonalDetail {
            image: None,
            full_name: "Alex Rivera".to_string(),
            email: "alex.rivera@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            address: "San Francisco, CA".to_string(),
            linkedin_url: Some("https://linkedin.com/in/alexrivera".to_string()),
            portfolio_url: Some("https://alexrivera.design".to_string()),
            summary: "Innovative Creative Director with 8+ years of experience in digital \
                      branding and UI/UX design. Proven track record of leading \
                      high-performance teams to deliver award-winning campaigns. Passionate \
                      about user-centric design and storytelling."
                .to_string(),
        };

        let experience = vec![
            Experience {
                company: "TechFlow Inc.".to_string(),
                position: "Senior Product Designer".to_string(),
                start_date: ymd(2020, 3, 1),
                end_date: None,
                is_current: true,
                description: "Lead design systems and manage a team of 5 designers. \
                              Increased user engagement by 40% through UI overhaul."
                    .to_string(),
            },
            Experience {
                company: "CreativAgency".to_string(),
                position: "UX Designer".to_string(),
                start_date: ymd(2017, 6, 1),
                end_date: Some(ymd(2020, 2, 29)),
                is_current: false,
                description: "Designed web and mobile interfaces for Fortune 500 clients. \
                              Conducted user research and usability testing."
                    .to_string(),
            },
        ];

        let education = vec![
            Education {
                institution: "Design Academy".to_string(),
                degree: "Master of Interaction Design".to_string(),
                start_date: ymd(2015, 9, 1),
                end_date: Some(ymd(2017, 6, 30)),
                is_current: false,
                description: "Focus on Human-Computer Interaction.".to_string(),
            },
            Education {
                institution: "University of Arts".to_string(),
                degree: "Bachelor of Fine Arts".to_string(),
                start_date: ymd(2011, 9, 1),
                end_date: Some(ymd(2015, 6, 30)),
                is_current: false,
                description: "Major in Graphic Design.".to_string(),
            },
        ];

        let skills = vec![
            skill("UI/UX Design", 95),
            skill("Figma & Sketch", 90),
            skill("HTML/CSS", 80),
            skill("Brand Identity", 85),
            skill("Team Leadership", 90),
        ];

        Self {
            personal,
            education,
            experience,
            skills,
            research: vec![Research {
                title: "User Empathy in Digital Products".to_string(),
                description: "Published research on how emotional design affects user \
                              retention."
                    .to_string(),
                date: Some(ymd(2019, 1, 1)),
            }],
            publications: vec![Publication {
                title: "The Future of Minimalist UI".to_string(),
                publisher: "Design Weekly".to_string(),
                date: Some(ymd(2021, 1, 1)),
                url: Some("https://designweekly.com/minimalist".to_string()),
            }],
            awards: vec![Award {
                title: "Best Mobile App Design".to_string(),
                issuer: "Tech Design Awards".to_string(),
                date: Some(ymd(2022, 1, 1)),
            }],
        }
    }
}

impl DocumentView for DemoDocument {
    fn doc_type(&self) -> DocType {
        DocType::Cv
    }

    fn title(&self) -> &str {
        "Sample CV"
    }

    fn template_name(&self) -> &str {
        DEFAULT_TEMPLATE
    }

    fn personal_detail(&self) -> Option<&PersonalDetail> {
        Some(&self.personal)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::flatten::{flatten, PRESENT};
    use crate::models::document::SectionKind;

    #[test]
    fn test_sample_has_expected_shape() {
        let demo = DemoDocument::sample();
        assert_eq!(demo.doc_type(), DocType::Cv);
        assert_eq!(demo.experience().len(), 2);
        assert_eq!(demo.education().len(), 2);
        assert_eq!(demo.skills().len(), 5);
        assert_eq!(demo.research().len(), 1);
        assert_eq!(demo.publications().len(), 1);
        assert_eq!(demo.awards().len(), 1);
        assert!(demo.experience()[0].is_current);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = flatten(&DemoDocument::sample()).unwrap();
        let b = flatten(&DemoDocument::sample()).unwrap();
        assert_eq!(a.personal, b.personal);
        assert_eq!(a.sections.len(), b.sections.len());
        for (x, y) in a.sections.iter().zip(&b.sections) {
            assert_eq!(x.rows, y.rows);
        }
    }

    #[test]
    fn test_sample_flattens_every_section() {
        let flat = flatten(&DemoDocument::sample()).unwrap();
        assert_eq!(flat.sections.len(), SectionKind::ALL.len());
        let first_job = &flat.section(SectionKind::Experience).unwrap().rows[0];
        assert_eq!(first_job.title, "Senior Product Designer");
        assert_eq!(first_job.end, PRESENT);
    }
}
