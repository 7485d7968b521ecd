//! Service catalog and icon glyphs.
//!
//! The catalog is an ordered, read-only list of services. Each service carries
//! a [`Glyph`]: anything that can produce a stroke outline at a given size and
//! colour. The built-in glyph set covers the default catalog; hosts can supply
//! their own (SVG paths, sprites) by implementing the trait.

use std::sync::Arc;

use glam::Vec2;

use crate::error::{SceneError, SceneResult};

/// Straight-line outline of a glyph in a centred box of side `size`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOutline {
    /// Line segments in glyph space, `+y` up, origin at the centre.
    pub strokes: Vec<[Vec2; 2]>,
    /// Linear RGBA colour.
    pub color: [f32; 4],
    pub size: f32,
}

/// Something that can be drawn as a service icon.
pub trait Glyph: Send + Sync + std::fmt::Debug {
    /// Short identifier, e.g. `"briefcase"`.
    fn name(&self) -> &str;

    /// Produce the outline scaled to `size`.
    fn render(&self, size: f32, color: [f32; 4]) -> GlyphOutline;
}

/// Built-in stroke glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinGlyph {
    Briefcase,
    Sparkles,
    Megaphone,
    Globe,
    Smartphone,
    PenTool,
    Flask,
    Video,
    Database,
}

impl BuiltinGlyph {
    /// Unit-box polylines (coordinates in `[-0.5, 0.5]`).
    fn polylines(self) -> Vec<Vec<Vec2>> {
        let v = Vec2::new;
        match self {
            Self::Briefcase => vec![
                rect(v(-0.45, -0.35), v(0.45, 0.25)),
                vec![v(-0.15, 0.25), v(-0.15, 0.4), v(0.15, 0.4), v(0.15, 0.25)],
                vec![v(-0.45, 0.0), v(0.45, 0.0)],
            ],
            Self::Sparkles => vec![
                star(v(-0.1, 0.0), 0.35, 0.08),
                star(v(0.3, 0.3), 0.15, 0.04),
                star(v(0.3, -0.3), 0.1, 0.03),
            ],
            Self::Megaphone => vec![
                vec![
                    v(-0.4, 0.1),
                    v(-0.4, -0.1),
                    v(-0.1, -0.1),
                    v(0.35, -0.35),
                    v(0.35, 0.35),
                    v(-0.1, 0.1),
                    v(-0.4, 0.1),
                ],
                vec![v(-0.3, -0.1), v(-0.2, -0.4), v(-0.1, -0.4), v(-0.15, -0.1)],
            ],
            Self::Globe => vec![
                circle(Vec2::ZERO, 0.45, 24),
                ellipse(Vec2::ZERO, 0.2, 0.45, 16),
                vec![v(-0.45, 0.0), v(0.45, 0.0)],
                vec![v(0.0, -0.45), v(0.0, 0.45)],
            ],
            Self::Smartphone => vec![
                rect(v(-0.25, -0.45), v(0.25, 0.45)),
                vec![v(-0.05, -0.35), v(0.05, -0.35)],
            ],
            Self::PenTool => vec![
                vec![v(-0.05, 0.45), v(0.3, 0.1), v(0.0, -0.2), v(-0.3, 0.1), v(-0.05, 0.45)],
                vec![v(0.0, -0.2), v(-0.35, -0.45)],
                vec![v(-0.1, 0.05), v(0.05, 0.05)],
            ],
            Self::Flask => vec![
                vec![
                    v(-0.1, 0.45),
                    v(-0.1, 0.1),
                    v(-0.38, -0.4),
                    v(0.38, -0.4),
                    v(0.1, 0.1),
                    v(0.1, 0.45),
                ],
                vec![v(-0.18, 0.45), v(0.18, 0.45)],
                vec![v(-0.24, -0.15), v(0.24, -0.15)],
            ],
            Self::Video => vec![
                rect(v(-0.45, -0.25), v(0.15, 0.25)),
                vec![v(0.15, 0.0), v(0.45, 0.2), v(0.45, -0.2), v(0.15, 0.0)],
            ],
            Self::Database => vec![
                ellipse(v(0.0, 0.3), 0.35, 0.12, 16),
                vec![v(-0.35, 0.3), v(-0.35, -0.3)],
                vec![v(0.35, 0.3), v(0.35, -0.3)],
                half_ellipse(v(0.0, 0.0), 0.35, 0.12, 8),
                half_ellipse(v(0.0, -0.3), 0.35, 0.12, 8),
            ],
        }
    }
}

impl Glyph for BuiltinGlyph {
    fn name(&self) -> &str {
        match self {
            Self::Briefcase => "briefcase",
            Self::Sparkles => "sparkles",
            Self::Megaphone => "megaphone",
            Self::Globe => "globe",
            Self::Smartphone => "smartphone",
            Self::PenTool => "pen-tool",
            Self::Flask => "flask",
            Self::Video => "video",
            Self::Database => "database",
        }
    }

    fn render(&self, size: f32, color: [f32; 4]) -> GlyphOutline {
        let strokes = self
            .polylines()
            .iter()
            .flat_map(|line| line.windows(2).map(|w| [w[0] * size, w[1] * size]).collect::<Vec<_>>())
            .collect();
        GlyphOutline {
            strokes,
            color,
            size,
        }
    }
}

fn rect(min: Vec2, max: Vec2) -> Vec<Vec2> {
    vec![
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        min,
    ]
}

#[allow(clippy::cast_precision_loss)]
fn ellipse(center: Vec2, rx: f32, ry: f32, segments: usize) -> Vec<Vec2> {
    (0..=segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            center + Vec2::new(a.cos() * rx, a.sin() * ry)
        })
        .collect()
}

/// Lower half of an ellipse, left to right.
#[allow(clippy::cast_precision_loss)]
fn half_ellipse(center: Vec2, rx: f32, ry: f32, segments: usize) -> Vec<Vec2> {
    (0..=segments)
        .map(|i| {
            let a = std::f32::consts::PI + i as f32 / segments as f32 * std::f32::consts::PI;
            center + Vec2::new(a.cos() * rx, a.sin() * ry)
        })
        .collect()
}

fn circle(center: Vec2, r: f32, segments: usize) -> Vec<Vec2> {
    ellipse(center, r, r, segments)
}

/// Four-pointed star.
fn star(center: Vec2, outer: f32, inner: f32) -> Vec<Vec2> {
    let points = [
        Vec2::new(0.0, outer),
        Vec2::new(inner, inner),
        Vec2::new(outer, 0.0),
        Vec2::new(inner, -inner),
        Vec2::new(0.0, -outer),
        Vec2::new(-inner, -inner),
        Vec2::new(-outer, 0.0),
        Vec2::new(-inner, inner),
        Vec2::new(0.0, outer),
    ];
    points.iter().map(|p| center + *p).collect()
}

/// A consulting service offered by the firm.
#[derive(Debug, Clone)]
pub struct Service {
    /// Unique, URL-safe identifier.
    pub id: String,
    pub title: String,
    pub description: String,
    pub glyph: Arc<dyn Glyph>,
}

impl Service {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        glyph: Arc<dyn Glyph>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            glyph,
        }
    }
}

/// Ordered, immutable list of services with unique ids.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    /// Build a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfiguration`] if two services share an id
    /// or an id is empty.
    pub fn new(services: Vec<Service>) -> SceneResult<Self> {
        for (i, service) in services.iter().enumerate() {
            if service.id.is_empty() {
                return Err(SceneError::invalid("catalog", format!("service {i} has an empty id")));
            }
            if services[..i].iter().any(|other| other.id == service.id) {
                return Err(SceneError::invalid(
                    "catalog",
                    format!("duplicate service id '{}'", service.id),
                ));
            }
        }
        Ok(Self { services })
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Service> {
        self.services.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.services.iter().position(|s| s.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Service> {
        self.index_of(id).map(|i| &self.services[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Service> {
        self.services.iter()
    }
}

impl<'a> IntoIterator for &'a ServiceCatalog {
    type Item = &'a Service;
    type IntoIter = std::slice::Iter<'a, Service>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Default for ServiceCatalog {
    /// The firm's nine services.
    fn default() -> Self {
        let entries: [(&str, &str, &str, BuiltinGlyph); 9] = [
            (
                "consultation",
                "Consultation",
                "Expert guidance in marketing, media production, brand development, engineering, and research, all tailored to meet your unique goals.",
                BuiltinGlyph::Briefcase,
            ),
            (
                "content-creation",
                "Content Creation",
                "Creating unforgettable product with top industry talents and teams for a lasting impact.",
                BuiltinGlyph::Sparkles,
            ),
            (
                "marketing",
                "Marketing",
                "From product placement to national advertising campaigns, we can help you identify your company\u{2019}s goals and achieve results.",
                BuiltinGlyph::Megaphone,
            ),
            (
                "web-development",
                "Web Development",
                "Modern, responsive websites built for performance and conversion.",
                BuiltinGlyph::Globe,
            ),
            (
                "app-development",
                "App Development",
                "Cross-platform apps designed for clarity, speed, and scalability.",
                BuiltinGlyph::Smartphone,
            ),
            (
                "graphic-design",
                "Graphic Design",
                "Branding, visuals, and UI assets that stay consistent and memorable.",
                BuiltinGlyph::PenTool,
            ),
            (
                "research-development",
                "Research & Development",
                "Strategic experimentation, prototyping, and technical exploration.",
                BuiltinGlyph::Flask,
            ),
            (
                "video-editing",
                "Video Editing",
                "Clean edits, motion, and story-driven post production.",
                BuiltinGlyph::Video,
            ),
            (
                "data-entry",
                "Data Entry",
                "Accurate, structured data support for fast operations.",
                BuiltinGlyph::Database,
            ),
        ];

        Self {
            services: entries
                .into_iter()
                .map(|(id, title, description, glyph)| {
                    Service::new(id, title, description, Arc::new(glyph))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = ServiceCatalog::default();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.index_of("web-development"), Some(3));
        assert_eq!(catalog.find("data-entry").unwrap().title, "Data Entry");
        assert!(catalog.find("missing").is_none());
        // Ids are unique.
        assert!(ServiceCatalog::new(catalog.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let glyph: Arc<dyn Glyph> = Arc::new(BuiltinGlyph::Globe);
        let result = ServiceCatalog::new(vec![
            Service::new("a", "A", "", glyph.clone()),
            Service::new("a", "A again", "", glyph),
        ]);
        assert!(matches!(result, Err(SceneError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_glyph_outline_scales() {
        let outline = BuiltinGlyph::Smartphone.render(2.0, [1.0; 4]);
        assert!(!outline.strokes.is_empty());
        for [a, b] in &outline.strokes {
            assert!(a.abs().max_element() <= 1.0 + 1e-6);
            assert!(b.abs().max_element() <= 1.0 + 1e-6);
        }
        assert_eq!(BuiltinGlyph::Smartphone.name(), "smartphone");
    }

    #[test]
    fn test_every_builtin_glyph_draws() {
        for service in &ServiceCatalog::default() {
            let outline = service.glyph.render(1.0, [1.0; 4]);
            assert!(outline.strokes.len() >= 2, "{} is empty", service.glyph.name());
        }
    }
}
