//! Template catalog and resolver.
//!
//! The catalog is an immutable table built once at startup and shared via
//! `AppState`. Every template identifier coming from a request or from a
//! stored document goes through [`TemplateCatalog::resolve`]; the renderer
//! only ever sees a `&TemplateDescriptor`, never a raw string.

use std::collections::HashMap;

use serde::Serialize;

pub const DEFAULT_TEMPLATE: &str = "modern";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Core,
    CitySidebarLeft,
    CityClassic,
    CitySidebarRight,
}

/// The shared page structures the visual templates are built on.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    SingleColumn,
    Classic,
    Timeline,
    Compact,
    SidebarLeft,
    SidebarRight,
}

impl Layout {
    /// Name of the compiled template backing this layout.
    pub fn template_file(&self) -> &'static str {
        match self {
            Layout::SingleColumn => "layouts/single_column.html",
            Layout::Classic => "layouts/classic.html",
            Layout::Timeline => "layouts/timeline.html",
            Layout::Compact => "layouts/compact.html",
            Layout::SidebarLeft | Layout::SidebarRight => "layouts/sidebar.html",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemplateDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub collection: Collection,
    pub layout: Layout,
    /// CSS colour for headings and rules.
    pub accent: &'static str,
    /// CSS font stack.
    pub font: &'static str,
}

const SANS: &str = "'Helvetica Neue', Arial, sans-serif";
const SERIF: &str = "Georgia, 'Times New Roman', serif";
const MONO: &str = "'JetBrains Mono', Consolas, monospace";

const fn tpl(
    id: &'static str,
    label: &'static str,
    collection: Collection,
    layout: Layout,
    accent: &'static str,
    font: &'static str,
) -> TemplateDescriptor {
    TemplateDescriptor {
        id,
        label,
        collection,
        layout,
        accent,
        font,
    }
}

use Collection::{CityClassic, CitySidebarLeft, CitySidebarRight, Core};
use Layout::{Classic, Compact, SidebarLeft, SidebarRight, SingleColumn, Timeline};

const BUILTIN: &[TemplateDescriptor] = &[
    tpl("modern", "Modern", Core, SingleColumn, "#2563eb", SANS),
    tpl("classic", "Classic", Core, Classic, "#111827", SERIF),
    tpl("creative", "Creative", Core, SidebarLeft, "#db2777", SANS),
    tpl("elegant", "Elegant Serif", Core, Classic, "#7c6f64", SERIF),
    tpl("executive", "Executive Pro", Core, SingleColumn, "#1e3a5f", SERIF),
    tpl("minimalist", "Minimalist Clean", Core, Compact, "#374151", SANS),
    tpl("timeline", "Vertical Timeline", Core, Timeline, "#0d9488", SANS),
    tpl("tech", "Tech Modern", Core, SidebarLeft, "#16a34a", MONO),
    tpl("academic", "Academic Professional", Core, Classic, "#7f1d1d", SERIF),
    tpl("designer", "Designer Bold", Core, SidebarRight, "#f97316", SANS),
    tpl("compact", "Compact Single Page", Core, Compact, "#4b5563", SANS),
    // City collection, sidebar left
    tpl("newyork", "New York (Modern Blue)", CitySidebarLeft, SidebarLeft, "#1d4ed8", SANS),
    tpl("london", "London (Royal)", CitySidebarLeft, SidebarLeft, "#4c1d95", SERIF),
    tpl("paris", "Paris (Chic)", CitySidebarLeft, SidebarLeft, "#be185d", SERIF),
    tpl("tokyo", "Tokyo (Clean)", CitySidebarLeft, SidebarLeft, "#dc2626", SANS),
    tpl("sidney", "Sidney (Ocean)", CitySidebarLeft, SidebarLeft, "#0284c7", SANS),
    tpl("dubai", "Dubai (Gold)", CitySidebarLeft, SidebarLeft, "#b45309", SERIF),
    tpl("singapore", "Singapore (Efficient)", CitySidebarLeft, SidebarLeft, "#b91c1c", SANS),
    tpl("hongkong", "Hong Kong (Dynamic)", CitySidebarLeft, SidebarLeft, "#c2410c", SANS),
    tpl("losangeles", "Los Angeles (Creative)", CitySidebarLeft, SidebarLeft, "#9333ea", SANS),
    tpl("toronto", "Toronto (Structure)", CitySidebarLeft, SidebarLeft, "#991b1b", SANS),
    // City collection, classic
    tpl("berlin", "Berlin (Industrial)", CityClassic, Classic, "#3f3f46", SANS),
    tpl("rome", "Rome (Classic)", CityClassic, Classic, "#9a3412", SERIF),
    tpl("madrid", "Madrid (Warm)", CityClassic, Classic, "#c2410c", SERIF),
    tpl("lisbon", "Lisbon (Sunny)", CityClassic, Classic, "#ca8a04", SANS),
    tpl("vienna", "Vienna (Elegant)", CityClassic, Classic, "#831843", SERIF),
    tpl("prague", "Prague (Historic)", CityClassic, Classic, "#78350f", SERIF),
    tpl("budapest", "Budapest (Bold)", CityClassic, Classic, "#15803d", SANS),
    tpl("warsaw", "Warsaw (Sturdy)", CityClassic, Classic, "#b91c1c", SANS),
    tpl("oslo", "Oslo (Minimal)", CityClassic, Compact, "#1e40af", SANS),
    tpl("stockholm", "Stockholm (Clean)", CityClassic, Compact, "#0369a1", SANS),
    // City collection, sidebar right
    tpl("chicago", "Chicago (Bold)", CitySidebarRight, SidebarRight, "#1e293b", SANS),
    tpl("miami", "Miami (Vibrant)", CitySidebarRight, SidebarRight, "#0891b2", SANS),
    tpl("seattle", "Seattle (Green)", CitySidebarRight, SidebarRight, "#166534", SANS),
    tpl("austin", "Austin (Fresh)", CitySidebarRight, SidebarRight, "#65a30d", SANS),
    tpl("denver", "Denver (Nature)", CitySidebarRight, SidebarRight, "#4d7c0f", SERIF),
    tpl("boston", "Boston (Academic)", CitySidebarRight, SidebarRight, "#7f1d1d", SERIF),
    tpl("atlanta", "Atlanta (Peach)", CitySidebarRight, SidebarRight, "#ea580c", SANS),
    tpl("houston", "Houston (Space)", CitySidebarRight, SidebarRight, "#312e81", SANS),
    tpl("phoenix", "Phoenix (Desert)", CitySidebarRight, SidebarRight, "#b45309", SANS),
    tpl("lasvegas", "Las Vegas (Night)", CitySidebarRight, SidebarRight, "#a21caf", SANS),
];

/// Allowlist of template identifiers with their descriptors.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    entries: Vec<TemplateDescriptor>,
    index: HashMap<&'static str, usize>,
    default_idx: usize,
}

impl TemplateCatalog {
    /// The built-in template set with `modern` as the fallback.
    pub fn builtin() -> Self {
        let entries = BUILTIN.to_vec();
        let index: HashMap<_, _> = entries
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, i))
            .collect();
        let default_idx = index.get(DEFAULT_TEMPLATE).copied().unwrap_or(0);
        Self {
            entries,
            index,
            default_idx,
        }
    }

    /// Exact-match lookup; anything outside the allowlist yields the default.
    pub fn resolve(&self, requested: &str) -> &TemplateDescriptor {
        match self.index.get(requested) {
            Some(&i) => &self.entries[i],
            None => {
                tracing::debug!("Unknown template '{requested}', using {DEFAULT_TEMPLATE}");
                self.default_template()
            }
        }
    }

    /// A `template` override, when present, wins over the stored value.
    pub fn resolve_override(&self, requested: Option<&str>, stored: &str) -> &TemplateDescriptor {
        self.resolve(requested.unwrap_or(stored))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn default_template(&self) -> &TemplateDescriptor {
        &self.entries[self.default_idx]
    }

    pub fn all(&self) -> &[TemplateDescriptor] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_size() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.all().len(), 41);
        assert_eq!(catalog.index.len(), 41, "template ids must be unique");
    }

    #[test]
    fn test_known_ids_resolve_unchanged() {
        let catalog = TemplateCatalog::builtin();
        for t in catalog.all() {
            assert_eq!(catalog.resolve(t.id).id, t.id);
            // idempotent
            assert_eq!(catalog.resolve(catalog.resolve(t.id).id).id, t.id);
        }
    }

    #[test]
    fn test_unknown_ids_fall_back_to_default() {
        let catalog = TemplateCatalog::builtin();
        for requested in [
            "",
            "Modern",
            "modern ",
            "../settings",
            "modern.html",
            "/etc/passwd",
            "tokyo/../../secret",
            "newyork\0",
        ] {
            assert_eq!(
                catalog.resolve(requested).id,
                DEFAULT_TEMPLATE,
                "'{requested}' must fall back"
            );
        }
    }

    #[test]
    fn test_override_takes_precedence_over_stored() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.resolve_override(Some("oslo"), "tokyo").id, "oslo");
        assert_eq!(catalog.resolve_override(None, "tokyo").id, "tokyo");
        assert_eq!(
            catalog.resolve_override(Some("nope"), "tokyo").id,
            DEFAULT_TEMPLATE
        );
    }

    #[test]
    fn test_sidebar_layouts_share_a_template_file() {
        assert_eq!(
            Layout::SidebarLeft.template_file(),
            Layout::SidebarRight.template_file()
        );
    }
}
