//! Scene files and replay
//!
//! A scene describes a viewport and a vertical stack of boundary sections:
//!
//! ```toml
//! viewport = { width = 400, height = 600 }
//! leading_space = "200px"
//! scroll = [0, 150, 400, 900, 300]
//!
//! [[section]]
//! name = "intro"
//! height = "900px"
//! target = { margin_top = "20px", height = "100px" }
//!
//! [[section]]
//! name = "details"
//! height = "1200px"
//! target = { margin_top = "1em", padding_top = "8px", height = "64px" }
//! ```
//!
//! Each section gets a top marker at its start (shifted by the computed top
//! offset), its sticky target, and a bottom marker at its end sized to the
//! computed bottom height.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tack_core::{BoundarySection, SentinelGeometry, StickyHandlers, Transition, ViewportContext};
use tack_platform::{BoxMetrics, ElementId, Length, LengthContext, Rect};

use crate::error::{Result, SceneError};
use crate::host::HeadlessHost;

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ViewportSpec {
    #[serde(default = "default_viewport_width")]
    pub width: f32,
    #[serde(default = "default_viewport_height")]
    pub height: f32,
}

fn default_viewport_width() -> f32 {
    400.0
}

fn default_viewport_height() -> f32 {
    600.0
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

/// Font sizes used to resolve `em` and `rem`
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FontSpec {
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_font_size")]
    pub root_font_size: f32,
}

fn default_font_size() -> f32 {
    16.0
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            root_font_size: default_font_size(),
        }
    }
}

fn default_zero() -> String {
    "0px".to_string()
}

/// Box metrics of a sticky target, as CSS length strings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetSpec {
    #[serde(default = "default_zero")]
    pub margin_top: String,
    #[serde(default = "default_zero")]
    pub padding_top: String,
    pub height: String,
    #[serde(default = "default_zero")]
    pub padding_bottom: String,
}

impl TargetSpec {
    fn metrics(&self, section: &str) -> Result<BoxMetrics> {
        Ok(BoxMetrics {
            margin_top: parse_length(section, "margin_top", &self.margin_top)?,
            padding_top: parse_length(section, "padding_top", &self.padding_top)?,
            height: parse_length(section, "height", &self.height)?,
            padding_bottom: parse_length(section, "padding_bottom", &self.padding_bottom)?,
        })
    }
}

/// One boundary section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SectionSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Section height; grown to fit the target if smaller
    pub height: String,
    pub target: TargetSpec,
}

/// A complete scene file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneSpec {
    /// Content above the first section
    #[serde(default = "default_zero")]
    pub leading_space: String,
    /// Scroll offsets to replay, in order
    #[serde(default)]
    pub scroll: Vec<f32>,
    #[serde(default)]
    pub viewport: ViewportSpec,
    #[serde(default)]
    pub fonts: FontSpec,
    #[serde(default, rename = "section")]
    pub sections: Vec<SectionSpec>,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            leading_space: default_zero(),
            scroll: Vec::new(),
            viewport: ViewportSpec::default(),
            fonts: FontSpec::default(),
            sections: Vec::new(),
        }
    }
}

impl SceneSpec {
    /// Parse a scene from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn length_context(&self) -> LengthContext {
        LengthContext::default()
            .font_size(self.fonts.font_size)
            .root_font_size(self.fonts.root_font_size)
            .percent_basis(self.viewport.width)
    }
}

fn parse_length(section: &str, field: &'static str, value: &str) -> Result<Length> {
    value.parse().map_err(|source| SceneError::InvalidLength {
        section: section.to_string(),
        field,
        source,
    })
}

/// A built section with its element handles and layout
pub struct SceneSection {
    pub name: String,
    /// Content offset of the section start
    pub top: f32,
    pub height: f32,
    pub top_marker: ElementId,
    pub bottom_marker: ElementId,
    pub target: ElementId,
    boundary: BoundarySection,
}

impl SceneSection {
    pub fn boundary(&self) -> &BoundarySection {
        &self.boundary
    }
}

/// A transition together with where it happened
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEvent {
    /// Scroll offset of the frame that produced it
    pub scroll_y: f32,
    /// Index into [`Scene::sections`]
    pub section: usize,
    pub transition: Transition,
}

/// Computed marker geometry of one section
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryReport {
    pub name: String,
    pub geometry: Option<SentinelGeometry>,
    pub top_offset_px: Option<f32>,
    pub bottom_height_px: Option<f32>,
}

type TransitionLog = Arc<Mutex<Vec<(usize, Transition)>>>;

/// A headless document populated with boundary sections
pub struct Scene {
    host: HeadlessHost,
    ctx: ViewportContext,
    sections: Vec<SceneSection>,
    length_cx: LengthContext,
    log: TransitionLog,
    history: Vec<SceneEvent>,
}

impl Scene {
    /// Build the document, mount every section and run the first frame
    pub fn build(spec: &SceneSpec) -> Result<Self> {
        let viewport = spec.viewport;
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Err(SceneError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let length_cx = spec.length_context();
        let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, viewport.width, viewport.height));
        let ctx = ViewportContext::new();
        let log: TransitionLog = Arc::new(Mutex::new(Vec::new()));

        let mut y = parse_length("scene", "leading_space", &spec.leading_space)?.to_px(&length_cx);
        let mut sections = Vec::with_capacity(spec.sections.len());

        for (index, section_spec) in spec.sections.iter().enumerate() {
            let name = section_spec
                .name
                .clone()
                .unwrap_or_else(|| format!("section-{}", index + 1));
            let metrics = section_spec.target.metrics(&name)?;

            let margin_px = metrics.margin_top.to_px(&length_cx);
            let extent_px = SentinelGeometry::from_metrics(&metrics)
                .bottom_height
                .resolve(&length_cx);
            let height = parse_length(&name, "height", &section_spec.height)?
                .to_px(&length_cx)
                .max(extent_px);

            // Document order: top marker, target, bottom marker
            let top_marker = host.insert(Rect::new(0.0, y, viewport.width, 0.0));
            let target = host.insert_styled(
                Rect::new(0.0, y + margin_px, viewport.width, extent_px - margin_px),
                metrics,
            );
            let bottom_marker = host.insert(Rect::new(0.0, y + height, viewport.width, 0.0));

            let section_log = log.clone();
            let handlers = StickyHandlers::new().on_change(move |t| {
                section_log
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((index, *t));
            });

            let mut boundary = BoundarySection::new(&ctx, handlers);
            boundary.register_sticky_ref(top_marker, bottom_marker, target);

            tracing::debug!(section = %name, top = y, height, "section mounted");
            sections.push(SceneSection {
                name,
                top: y,
                height,
                top_marker,
                bottom_marker,
                target,
                boundary,
            });
            y += height;
        }

        ctx.set_viewport_root(host.root());

        let mut scene = Self {
            host,
            ctx,
            sections,
            length_cx,
            log,
            history: Vec::new(),
        };
        scene.sync()?;
        Ok(scene)
    }

    /// Build from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Self::build(&SceneSpec::from_toml(content)?)
    }

    /// Let every section measure and observe, lay markers out, run a frame
    pub fn sync(&mut self) -> Result<Vec<SceneEvent>> {
        for section in &mut self.sections {
            section.boundary.sync(&mut self.host);
        }
        self.layout_markers()?;
        Ok(self.frame())
    }

    fn layout_markers(&mut self) -> Result<()> {
        let width = self.host.viewport().width;
        for section in &self.sections {
            let attachment = section.boundary.attach_sentinels();
            let offset = attachment
                .top_offset
                .map_or(0.0, |len| len.resolve(&self.length_cx));
            let bottom_height = attachment
                .bottom_height
                .map_or(0.0, |len| len.resolve(&self.length_cx));

            self.host.set_rect(
                section.top_marker,
                Rect::new(0.0, section.top + offset, width, 0.0),
            )?;
            self.host.set_rect(
                section.bottom_marker,
                Rect::new(
                    0.0,
                    section.top + section.height - bottom_height,
                    width,
                    bottom_height,
                ),
            )?;
        }
        Ok(())
    }

    fn frame(&mut self) -> Vec<SceneEvent> {
        self.host.run_frame();

        let scroll_y = self.host.scroll_y();
        let recorded = std::mem::take(&mut *self.log.lock().unwrap_or_else(PoisonError::into_inner));
        let events: Vec<SceneEvent> = recorded
            .into_iter()
            .map(|(section, transition)| SceneEvent {
                scroll_y,
                section,
                transition,
            })
            .collect();
        self.history.extend_from_slice(&events);
        events
    }

    /// Scroll to `y`, run one frame and return the transitions it produced
    pub fn scroll_to(&mut self, y: f32) -> Vec<SceneEvent> {
        self.host.scroll_to(y);
        self.frame()
    }

    /// Scroll through each offset in turn, one frame per offset
    pub fn replay(&mut self, script: &[f32]) -> Vec<SceneEvent> {
        script.iter().flat_map(|&y| self.scroll_to(y)).collect()
    }

    /// Unmount one section's observers
    pub fn unmount(&mut self, index: usize) {
        if let Some(section) = self.sections.get_mut(index) {
            section.boundary.unmount(&mut self.host);
        }
    }

    /// Unmount every section
    pub fn unmount_all(&mut self) {
        for section in &mut self.sections {
            section.boundary.unmount(&mut self.host);
        }
    }

    /// Computed geometry of every section
    pub fn geometry(&self) -> Vec<GeometryReport> {
        self.sections
            .iter()
            .map(|section| {
                let geometry = section.boundary.geometry();
                GeometryReport {
                    name: section.name.clone(),
                    geometry,
                    top_offset_px: geometry.map(|g| g.top_offset.resolve(&self.length_cx)),
                    bottom_height_px: geometry.map(|g| g.bottom_height.resolve(&self.length_cx)),
                }
            })
            .collect()
    }

    pub fn sections(&self) -> &[SceneSection] {
        &self.sections
    }

    pub fn section_name(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|s| s.name.as_str())
    }

    /// Every event since the scene was built
    pub fn history(&self) -> &[SceneEvent] {
        &self.history
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn context(&self) -> &ViewportContext {
        &self.ctx
    }

    pub fn length_context(&self) -> &LengthContext {
        &self.length_cx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tack_core::TransitionKind;
    use tack_platform::StyleReader;

    const SINGLE: &str = r#"
        leading_space = "670px"

        [[section]]
        name = "header"
        height = "1000px"
        target = { margin_top = "20px", height = "100px" }
    "#;

    fn kinds(events: &[SceneEvent]) -> Vec<TransitionKind> {
        events.iter().map(|e| e.transition.kind).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let spec = SceneSpec::from_toml(SINGLE).unwrap();
        assert_eq!(spec.viewport.width, 400.0);
        assert_eq!(spec.viewport.height, 600.0);
        assert_eq!(spec.fonts.font_size, 16.0);
        assert_eq!(spec.sections.len(), 1);
        assert_eq!(spec.sections[0].target.padding_top, "0px");
        assert!(spec.scroll.is_empty());
    }

    #[test]
    fn test_parse_integer_scroll_script() {
        let spec = SceneSpec::from_toml("scroll = [0, 150, 42.5]").unwrap();
        assert_eq!(spec.scroll, vec![0.0, 150.0, 42.5]);
    }

    #[test]
    fn test_invalid_length_names_section_and_field() {
        let err = Scene::from_toml(
            r#"
            [[section]]
            name = "broken"
            height = "100px"
            target = { height = "tall" }
            "#,
        )
        .err()
        .unwrap();

        match err {
            SceneError::InvalidLength { section, field, .. } => {
                assert_eq!(section, "broken");
                assert_eq!(field, "height");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_viewport() {
        let err = Scene::from_toml("viewport = { width = 0, height = 600 }").err().unwrap();
        assert!(matches!(err, SceneError::InvalidViewport { .. }));
    }

    #[test]
    fn test_geometry_and_marker_layout() {
        let scene = Scene::from_toml(SINGLE).unwrap();
        let report = &scene.geometry()[0];

        assert_eq!(report.top_offset_px, Some(-20.0));
        assert_eq!(report.bottom_height_px, Some(120.0));

        let section = &scene.sections()[0];
        let host = scene.host();
        assert_eq!(host.layout_rect(section.top_marker).unwrap().top(), 650.0);

        let bottom = host.layout_rect(section.bottom_marker).unwrap();
        assert_eq!(bottom.height, 120.0);
        assert_eq!(bottom.bottom(), 670.0 + 1000.0);
        assert_eq!(host.box_metrics(section.target).unwrap().height, Length::Px(100.0));
    }

    #[test]
    fn test_top_marker_sticks_exactly_once() {
        let mut scene = Scene::from_toml(SINGLE).unwrap();
        assert!(scene.history().is_empty());

        // Top marker bottom edge goes from 650 down to -10 on screen
        let events = scene.replay(&[100.0, 300.0, 600.0, 649.0, 650.0, 660.0]);
        assert_eq!(kinds(&events), vec![TransitionKind::Stuck]);
        assert_eq!(events[0].scroll_y, 660.0);
        assert_eq!(events[0].transition.target, scene.sections()[0].target);

        // Further down inside the section: nothing new
        assert!(scene.replay(&[700.0, 800.0]).is_empty());
    }

    #[test]
    fn test_scrolling_back_unsticks() {
        let mut scene = Scene::from_toml(SINGLE).unwrap();
        scene.scroll_to(660.0);

        let events = scene.scroll_to(640.0);
        assert_eq!(kinds(&events), vec![TransitionKind::Unstuck]);
    }

    #[test]
    fn test_section_end_unsticks_through_bottom_marker() {
        let mut scene = Scene::from_toml(SINGLE).unwrap();

        // Bottom marker spans 1550..1670 in content
        scene.scroll_to(660.0); // top: stuck
        let entering = scene.scroll_to(1100.0); // bottom marker fully visible
        assert_eq!(kinds(&entering), vec![TransitionKind::Stuck]);

        let leaving = scene.scroll_to(1600.0); // bottom marker crossing the top edge
        assert_eq!(kinds(&leaving), vec![TransitionKind::Unstuck]);
    }

    #[test]
    fn test_fractional_bottom_marker_sticks_when_fully_visible() {
        let mut scene = Scene::from_toml(
            r#"
            leading_space = "827.3px"

            [[section]]
            height = "300px"
            target = { margin_top = "0.7px", height = "100.3px" }
            "#,
        )
        .unwrap();
        assert!(scene.history().is_empty());

        let events = scene.scroll_to(600.45);
        let bottom = scene
            .host()
            .bounding_rect(scene.sections()[0].bottom_marker)
            .unwrap();
        assert!(bottom.is_within(&scene.host().viewport()));
        assert_eq!(kinds(&events), vec![TransitionKind::Stuck]);
    }

    #[test]
    fn test_initial_frame_reports_pre_scrolled_state() {
        let mut spec = SceneSpec::from_toml(SINGLE).unwrap();
        spec.leading_space = "0px".to_string();

        // Top marker starts at -20: already above the root
        let scene = Scene::build(&spec).unwrap();
        assert_eq!(kinds(scene.history()), vec![TransitionKind::Stuck]);
        assert_eq!(scene.history()[0].scroll_y, 0.0);
    }

    #[test]
    fn test_multiple_sections_are_independent() {
        let mut scene = Scene::from_toml(
            r#"
            leading_space = "100px"

            [[section]]
            name = "first"
            height = "800px"
            target = { height = "50px" }

            [[section]]
            name = "second"
            height = "800px"
            target = { margin_top = "1em", height = "50px" }
            "#,
        )
        .unwrap();

        let events = scene.replay(&[150.0, 400.0, 890.0, 950.0]);
        let summary: Vec<(usize, TransitionKind)> =
            events.iter().map(|e| (e.section, e.transition.kind)).collect();

        assert_eq!(
            summary,
            vec![
                (0, TransitionKind::Stuck),
                (0, TransitionKind::Stuck),
                (0, TransitionKind::Unstuck),
                (1, TransitionKind::Stuck),
            ]
        );
        assert_eq!(scene.section_name(1), Some("second"));
        assert_eq!(scene.context().registered_markers(), 4);
    }

    #[test]
    fn test_unmount_silences_section() {
        let mut scene = Scene::from_toml(SINGLE).unwrap();
        scene.unmount(0);
        scene.unmount(0);

        assert!(scene.replay(&[660.0, 1100.0, 1600.0, 0.0]).is_empty());
        assert_eq!(scene.host().observer_count(), 0);
    }

    #[test]
    fn test_history_accumulates_across_calls() {
        let mut spec = SceneSpec::from_toml(SINGLE).unwrap();
        spec.leading_space = "0px".to_string();
        let mut scene = Scene::build(&spec).unwrap();

        let mut expected = scene.history().to_vec();
        expected.extend(scene.replay(&[500.0, 1000.0, 0.0]));

        assert_eq!(scene.history(), expected.as_slice());
        assert!(scene.history().len() > 1);
    }
}
