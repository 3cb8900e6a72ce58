//! HTML rendering. All layouts are compiled into the binary at startup, so a
//! template is addressed only through its catalog descriptor.

use tera::{Context, Tera};
use thiserror::Error;

use crate::document::flatten::{flatten, FlatDocument, FlattenError};
use crate::document::view::DocumentView;
use crate::render::catalog::TemplateDescriptor;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render: {0}")]
    Flatten(#[from] FlattenError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

const SOURCES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    (
        "partials/section.html",
        include_str!("../../templates/partials/section.html"),
    ),
    (
        "partials/contact.html",
        include_str!("../../templates/partials/contact.html"),
    ),
    (
        "layouts/single_column.html",
        include_str!("../../templates/layouts/single_column.html"),
    ),
    (
        "layouts/classic.html",
        include_str!("../../templates/layouts/classic.html"),
    ),
    (
        "layouts/timeline.html",
        include_str!("../../templates/layouts/timeline.html"),
    ),
    (
        "layouts/compact.html",
        include_str!("../../templates/layouts/compact.html"),
    ),
    (
        "layouts/sidebar.html",
        include_str!("../../templates/layouts/sidebar.html"),
    ),
];

pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Compiles every layout. Fails at startup rather than on first request.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(SOURCES.iter().copied())?;
        Ok(Self { tera })
    }

    /// Renders a flattened document with a resolved template.
    ///
    /// `base_url`, when given, is emitted as `<base href>` so that relative
    /// asset references resolve outside a browser (PDF conversion).
    pub fn render(
        &self,
        template: &TemplateDescriptor,
        document: &FlatDocument,
        base_url: Option<&str>,
    ) -> Result<String, RenderError> {
        let mut ctx = Context::new();
        ctx.insert("document", document);
        ctx.insert("personal", &document.personal);
        ctx.insert("theme", template);
        ctx.insert("base_url", &base_url);
        Ok(self.tera.render(template.layout.template_file(), &ctx)?)
    }

    /// Flattens and renders in one step, for callers holding a view.
    pub fn render_view(
        &self,
        template: &TemplateDescriptor,
        view: &dyn DocumentView,
        base_url: Option<&str>,
    ) -> Result<String, RenderError> {
        let flat = flatten(view)?;
        self.render(template, &flat, base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::view::tests::{date, make_document, make_personal};
    use crate::document::view::DocumentAggregate;
    use crate::models::document::{DocType, Experience, Skill};
    use crate::render::catalog::TemplateCatalog;

    fn sample() -> FlatDocument {
        let mut agg = DocumentAggregate::new(make_document(DocType::Resume));
        agg.personal_detail = Some(make_personal());
        agg.experience.push(Experience {
            company: "Acme <Labs>".to_string(),
            position: "Staff Engineer".to_string(),
            start_date: date(2019, 4, 1),
            end_date: Some(date(2020, 12, 31)),
            is_current: true,
            description: "Ran the platform team.".to_string(),
        });
        agg.skills.push(Skill {
            name: "Rust".to_string(),
            proficiency: 85,
        });
        flatten(&agg).unwrap()
    }

    #[test]
    fn test_every_catalog_template_renders() {
        let engine = TemplateEngine::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let doc = sample();
        for t in catalog.all() {
            let html = engine
                .render(t, &doc, None)
                .unwrap_or_else(|e| panic!("{} failed: {e:?}", t.id));
            assert!(html.contains("Jane Q Public"), "{} lacks the name", t.id);
            assert!(html.contains("Staff Engineer"), "{} lacks experience", t.id);
            assert!(html.contains(t.accent), "{} lacks its accent", t.id);
        }
    }

    #[test]
    fn test_current_entry_renders_present_on_screen() {
        let engine = TemplateEngine::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let html = engine
            .render(catalog.resolve("modern"), &sample(), None)
            .unwrap();
        assert!(html.contains("Present"));
        assert!(!html.contains("2020-12-31"), "stored end date must not leak");
    }

    #[test]
    fn test_user_content_is_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let html = engine
            .render(catalog.resolve("classic"), &sample(), None)
            .unwrap();
        assert!(html.contains("Acme &lt;Labs&gt;"));
        assert!(!html.contains("Acme <Labs>"));
    }

    #[test]
    fn test_base_url_only_when_requested() {
        let engine = TemplateEngine::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let t = catalog.resolve("tokyo");
        let without = engine.render(t, &sample(), None).unwrap();
        assert!(!without.contains("<base "));
        let with = engine
            .render(t, &sample(), Some("https://cv.example.com/"))
            .unwrap();
        assert!(with.contains("<base href=\"https://cv.example.com/\">"));
    }

    #[test]
    fn test_render_view_requires_personal_detail() {
        let engine = TemplateEngine::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let agg = DocumentAggregate::new(make_document(DocType::Cv));
        let err = engine
            .render_view(catalog.default_template(), &agg, None)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Flatten(FlattenError::MissingPersonalDetail)
        ));
    }

    #[test]
    fn test_empty_sections_have_no_heading() {
        let engine = TemplateEngine::new().unwrap();
        let catalog = TemplateCatalog::builtin();
        let html = engine
            .render(catalog.resolve("modern"), &sample(), None)
            .unwrap();
        assert!(html.contains(">Experience<"));
        assert!(!html.contains(">Education<"));
        assert!(!html.contains(">Awards<"));
    }
}
