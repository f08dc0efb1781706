// Scroll-coupled motion. Unlike entrances these are continuous functions of
// the scroll position: recomputed on every scroll signal inside the active
// range, pinned to the range edges outside it.

use std::collections::HashMap;

use crate::motion::Pose;
use crate::types::{ElementId, PageRect, ParallaxSettings, Timestamp};

/// Fraction of its own height a layer drifts across the full range at speed 1.
const DRIFT_SPAN: f32 = 0.30;

#[derive(Debug)]
struct Layer {
    bounds: PageRect,
    speed: f32,
}

/// Scroll-driven layers: parallax backdrops and the hero content scrub.
#[derive(Debug)]
pub struct ParallaxField {
    settings: ParallaxSettings,
    layers: HashMap<ElementId, Layer>,
    scrubs: HashMap<ElementId, PageRect>,
    scroll: f32,
    viewport_h: f32,
}

impl ParallaxField {
    pub fn new(settings: ParallaxSettings) -> Self {
        ParallaxField {
            settings,
            layers: HashMap::new(),
            scrubs: HashMap::new(),
            scroll: 0.0,
            viewport_h: 0.0,
        }
    }

    /// Register a backdrop layer. `speed` overrides the configured factor.
    pub fn mount_layer(&mut self, element: ElementId, bounds: PageRect, speed: Option<f32>) {
        self.layers.insert(
            element,
            Layer {
                bounds,
                speed: speed.unwrap_or(self.settings.speed),
            },
        );
    }

    /// Register the hero content block for the fade/shift scrub.
    pub fn mount_scrub(&mut self, element: ElementId, bounds: PageRect) {
        self.scrubs.insert(element, bounds);
    }

    /// Update bounds after relayout. Unknown ids no-op.
    pub fn relayout(&mut self, element: ElementId, bounds: PageRect) {
        if let Some(layer) = self.layers.get_mut(&element) {
            layer.bounds = bounds;
        }
        if let Some(rect) = self.scrubs.get_mut(&element) {
            *rect = bounds;
        }
    }

    /// Unknown ids no-op.
    pub fn unmount(&mut self, element: ElementId) {
        self.layers.remove(&element);
        self.scrubs.remove(&element);
    }

    pub fn on_scroll(&mut self, scroll: f32, viewport_h: f32) {
        self.scroll = scroll;
        self.viewport_h = viewport_h;
    }

    /// Traversal progress of a section through the viewport: 0 while its top
    /// is still below the fold, 1 once its bottom has left the top edge.
    fn traversal(&self, bounds: &PageRect) -> f32 {
        let span = self.viewport_h + bounds.height;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.scroll + self.viewport_h - bounds.y) / span).clamp(0.0, 1.0)
    }

    /// Progress of the hero scrub: 0 at the hero top, 1 at its midpoint.
    fn scrub_progress(&self, bounds: &PageRect) -> f32 {
        let span = bounds.height / 2.0;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.scroll - bounds.y) / span).clamp(0.0, 1.0)
    }

    fn layer_pose(&self, layer: &Layer) -> Pose {
        let drift = DRIFT_SPAN * layer.speed * layer.bounds.height;
        Pose {
            y: -drift * self.traversal(&layer.bounds),
            ..Pose::REST
        }
    }

    fn scrub_pose(&self, bounds: &PageRect) -> Pose {
        let p = self.scrub_progress(bounds);
        Pose {
            opacity: 1.0 - (1.0 - self.settings.scrub_floor) * p,
            y: -self.settings.scrub_shift * p,
            ..Pose::REST
        }
    }

    /// Sample every layer. Scroll-coupled poses are pure functions of the
    /// last scroll observation, so the timestamp is unused but kept for
    /// signature symmetry with the other drivers.
    pub fn sample(&self, _now: Timestamp) -> impl Iterator<Item = (ElementId, Pose)> + '_ {
        let layers = self
            .layers
            .iter()
            .map(move |(id, layer)| (*id, self.layer_pose(layer)));
        let scrubs = self
            .scrubs
            .iter()
            .map(move |(id, bounds)| (*id, self.scrub_pose(bounds)));
        layers.chain(scrubs)
    }

    pub fn sample_one(&self, element: ElementId, _now: Timestamp) -> Option<Pose> {
        if let Some(layer) = self.layers.get(&element) {
            return Some(self.layer_pose(layer));
        }
        self.scrubs
            .get(&element)
            .map(|bounds| self.scrub_pose(bounds))
    }
}
