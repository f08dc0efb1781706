// cineverse_engine: CineVerse Rust/WASM Engine
// Catalog state, incremental search, and kinetic polish live here; JS is plumbing.

mod catalog;
mod error;
mod motion;
mod parallax;
mod pointer;
mod reveal;
mod search;
mod session;
mod tilt;
mod types;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub use catalog::{
    Catalog, CategoryRule, CategorySpec, CategoryVariant, CategoryView, Movie, CATEGORY_TABLE,
};
pub use error::EngineError;
pub use motion::{Animator, Easing, OverlayFx, Pose};
pub use parallax::ParallaxField;
pub use pointer::{TrailDriver, TrailToken};
pub use reveal::{Entrance, RevealTracker};
pub use search::search;
pub use session::{ScrollLock, UiSession, UiStateView};
pub use tilt::TiltField;
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Immutable catalog snapshot handed to the render surface once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogSnapshot {
    featured: Option<Movie>,
    categories: Vec<CategoryView>,
    records: Vec<Movie>,
}

/// Main engine interface exposed to JavaScript.
/// Batch interface to minimize JS↔WASM crossings: input signals arrive as a
/// JSON batch, per-frame output is sampled with one call.
#[wasm_bindgen]
pub struct Engine {
    catalog: Catalog,
    session: UiSession,
    reveals: RevealTracker,
    parallax: ParallaxField,
    tilt: TiltField,
    trail: TrailDriver,
    overlay_fx: Vec<OverlayFx>,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Engine, JsValue> {
        let config: EngineConfig = serde_json::from_str(config_json)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        tracing::debug!("initializing cineverse engine");

        Ok(Engine {
            catalog: Catalog::seeded(),
            session: UiSession::new(config.header_threshold),
            reveals: RevealTracker::new(config.motion.clone()),
            parallax: ParallaxField::new(config.parallax),
            tilt: TiltField::new(config.motion),
            trail: TrailDriver::new(config.trail),
            overlay_fx: Vec::new(),
        })
    }

    /// The record store and its derived views, as JSON. Computed once; the
    /// catalog never changes after startup.
    pub fn catalog_snapshot(&self) -> Result<String, JsValue> {
        let snapshot = CatalogSnapshot {
            featured: self.catalog.featured().cloned(),
            categories: self.catalog.categories().to_vec(),
            records: self.catalog.records().to_vec(),
        };
        to_json(&snapshot)
    }

    /// Process a batch of input signals (pointer, scroll, element lifecycle)
    /// and return the resulting UI state snapshot.
    pub fn process_signals(&mut self, signals_json: &str) -> Result<String, JsValue> {
        let signals: SignalBatch = serde_json::from_str(signals_json)
            .map_err(|e| EngineError::SignalProcessing(e.to_string()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        for event in &signals.events {
            self.apply_event(event);
        }

        to_json(&self.session.view())
    }

    /// Open the search overlay.
    pub fn open_search(&mut self, now_us: u64) -> Result<String, JsValue> {
        if self.session.open_search() {
            self.sync_overlay_fx(Timestamp::from_micros(now_us));
        }
        to_json(&self.session.view())
    }

    /// Close the search overlay, resetting the query.
    pub fn close_search(&mut self, now_us: u64) -> Result<String, JsValue> {
        if self.session.close_search() {
            self.sync_overlay_fx(Timestamp::from_micros(now_us));
        }
        to_json(&self.session.view())
    }

    /// Select a record and open the detail overlay. Returns the updated state;
    /// unknown ids leave the state untouched.
    pub fn select_movie(&mut self, id: u32, now_us: u64) -> Result<String, JsValue> {
        if self.session.select_record(&self.catalog, MovieId::new(id)) {
            self.sync_overlay_fx(Timestamp::from_micros(now_us));
        }
        to_json(&self.session.view())
    }

    /// Close the detail overlay and clear the selection.
    pub fn close_detail(&mut self, now_us: u64) -> Result<String, JsValue> {
        if self.session.close_detail() {
            self.sync_overlay_fx(Timestamp::from_micros(now_us));
        }
        to_json(&self.session.view())
    }

    /// Abrupt close of whichever overlay is open (backdrop click, escape).
    pub fn close_overlay(&mut self, now_us: u64) -> Result<String, JsValue> {
        if self.session.close_overlay() {
            self.sync_overlay_fx(Timestamp::from_micros(now_us));
        }
        to_json(&self.session.view())
    }

    /// Update the search query; results are recomputed synchronously.
    pub fn set_query(&mut self, text: &str) -> Result<String, JsValue> {
        self.session.set_query(&self.catalog, text);
        to_json(&self.session.view())
    }

    /// Toggle the mobile navigation menu.
    pub fn toggle_menu(&mut self) -> Result<String, JsValue> {
        self.session.toggle_menu();
        to_json(&self.session.view())
    }

    /// Current UI state snapshot without mutating anything.
    pub fn ui_state(&self) -> Result<String, JsValue> {
        to_json(&self.session.view())
    }

    /// Start the pointer-trail frame task. Returns its cancellation token;
    /// idempotent while the task is live.
    pub fn mount_trail(&mut self) -> u32 {
        self.trail.spawn().as_u32()
    }

    /// Tear down the pointer-trail task. Stale tokens no-op.
    pub fn unmount_trail(&mut self, token: u32) {
        self.trail.cancel(TrailToken::from_u32(token));
    }

    /// Advance per-frame work and sample every active effect at `now_us`.
    /// Returns a `FrameUpdate` as JSON for the render surface to apply.
    pub fn sample_frame(&mut self, now_us: u64) -> Result<String, JsValue> {
        let now = Timestamp::from_micros(now_us);

        self.trail.tick();
        self.overlay_fx.retain(|fx| !fx.is_finished(now));

        let mut poses: HashMap<ElementId, Pose> = HashMap::new();
        for (id, pose) in self.reveals.sample(now) {
            merge_pose(&mut poses, id, pose);
        }
        for (id, pose) in self.parallax.sample(now) {
            merge_pose(&mut poses, id, pose);
        }
        for (id, pose) in self.tilt.sample(now) {
            merge_pose(&mut poses, id, pose);
        }

        let mut elements: Vec<ElementFrame> = poses
            .into_iter()
            .map(|(element, pose)| ElementFrame {
                element,
                opacity: pose.opacity,
                translate_x: pose.x,
                translate_y: pose.y,
                scale: pose.scale,
                rotate_x: pose.rotate_x,
                rotate_y: pose.rotate_y,
            })
            .collect();
        elements.sort_by_key(|frame| frame.element);

        let update = FrameUpdate {
            elements,
            overlays: self.overlay_fx.iter().map(|fx| fx.sample(now)).collect(),
            trail: self.trail.position(),
            scroll_locked: self.session.is_scroll_locked(),
        };
        to_json(&update)
    }
}

impl Engine {
    fn apply_event(&mut self, event: &InputEvent) {
        let now = event.timestamp;
        match &event.event_type {
            EventType::PointerMove { position } => {
                self.trail.set_target(*position);
                self.tilt.pointer_move(*position, now);
            }
            EventType::PointerEnter { element } => self.tilt.pointer_enter(*element, now),
            EventType::PointerLeave { element } => self.tilt.pointer_leave(*element, now),
            EventType::Scroll {
                offset,
                viewport_height,
            } => {
                self.session.on_scroll(*offset);
                self.reveals.on_scroll(*offset, *viewport_height, now);
                self.parallax.on_scroll(*offset, *viewport_height);
            }
            EventType::ElementMounted {
                element,
                role,
                bounds,
            } => self.mount_element(*element, *role, *bounds, now),
            EventType::ElementMoved { element, bounds } => {
                self.reveals.relayout(*element, *bounds);
                self.parallax.relayout(*element, *bounds);
                self.tilt.relayout(*element, *bounds);
            }
            EventType::ElementUnmounted { element } => {
                self.reveals.unmount(*element);
                self.parallax.unmount(*element);
                self.tilt.unmount(*element);
            }
        }
    }

    fn mount_element(
        &mut self,
        element: ElementId,
        role: ElementRole,
        bounds: PageRect,
        now: Timestamp,
    ) {
        match role {
            ElementRole::Card { index } => {
                self.reveals
                    .mount(element, Entrance::Rise { index }, bounds, now);
                self.tilt.mount(element, bounds);
            }
            ElementRole::SectionTitle => {
                self.reveals.mount(element, Entrance::Slide, bounds, now);
            }
            ElementRole::HeroLayer { speed } => {
                self.parallax.mount_layer(element, bounds, speed);
            }
            ElementRole::HeroContent => {
                self.parallax.mount_scrub(element, bounds);
            }
            ElementRole::HeroSlot { slot } => {
                self.reveals.mount_hero_slot(element, slot, now);
            }
            ElementRole::PageRoot => {
                self.reveals.mount_page_root(element, now);
            }
        }
    }

    /// Reconcile the overlay choreography with the controller's overlay
    /// state: close whatever is animating open, then open the fx for the
    /// overlay that should be up.
    fn sync_overlay_fx(&mut self, now: Timestamp) {
        let want = self.session.overlay();
        let current = self
            .overlay_fx
            .iter()
            .find(|fx| !fx.is_closing())
            .map(|fx| fx.overlay());

        if current == Some(want) {
            return;
        }
        for fx in &mut self.overlay_fx {
            if !fx.is_closing() {
                fx.close(now);
            }
        }
        if want != Overlay::None {
            self.overlay_fx.push(OverlayFx::open(want, now));
        }
    }
}

/// Compose the poses different drivers computed for the same element
/// (entrance × parallax × hover/tilt).
fn merge_pose(poses: &mut HashMap<ElementId, Pose>, id: ElementId, pose: Pose) {
    poses
        .entry(id)
        .and_modify(|existing| *existing = existing.combine(&pose))
        .or_insert(pose);
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(EngineError::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
