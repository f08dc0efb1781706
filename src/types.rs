// Strong typing over strings. Newtypes for timestamps, record ids, and page geometry.

use serde::{Deserialize, Serialize};

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn as_secs(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Saturating offset, used when scheduling staggered starts.
    pub fn offset(&self, delta_us: u64) -> Self {
        Timestamp(self.0.saturating_add(delta_us))
    }
}

/// Catalog record key. Newtype for type safety.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct MovieId(u32);

impl MovieId {
    pub fn new(id: u32) -> Self {
        MovieId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Render-surface element key. Assigned by the surface at mount time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ElementId(u32);

impl ElementId {
    pub fn new(id: u32) -> Self {
        ElementId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Point in page coordinates (CSS pixels, document space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PagePoint {
    pub x: f32,
    pub y: f32,
}

impl PagePoint {
    pub fn new(x: f32, y: f32) -> Self {
        PagePoint { x, y }
    }
}

/// Rectangle in page coordinates (CSS pixels, document space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        PageRect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> PagePoint {
        PagePoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Engine configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub motion: MotionSettings,
    #[serde(default)]
    pub trail: TrailSettings,
    #[serde(default)]
    pub parallax: ParallaxSettings,
    /// Page scroll offset past which the header renders condensed.
    #[serde(default = "default_header_threshold")]
    pub header_threshold: f32,
}

/// Entrance, hover, and tilt timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionSettings {
    /// Card entrance duration (microseconds).
    #[serde(default = "default_reveal_duration")]
    pub reveal_duration_us: u64,
    /// Per-index stagger between card entrances (microseconds).
    #[serde(default = "default_reveal_stagger")]
    pub reveal_stagger_us: u64,
    /// Fraction of viewport height an element top must clear to count as visible.
    #[serde(default = "default_reveal_threshold")]
    pub reveal_threshold: f32,
    /// Hover lift target scale.
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f32,
    /// Hover/tilt response duration (microseconds).
    #[serde(default = "default_hover_duration")]
    pub hover_duration_us: u64,
    /// Maximum tilt rotation in degrees.
    #[serde(default = "default_tilt_max")]
    pub tilt_max_deg: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        MotionSettings {
            reveal_duration_us: default_reveal_duration(),
            reveal_stagger_us: default_reveal_stagger(),
            reveal_threshold: default_reveal_threshold(),
            hover_scale: default_hover_scale(),
            hover_duration_us: default_hover_duration(),
            tilt_max_deg: default_tilt_max(),
        }
    }
}

fn default_reveal_duration() -> u64 {
    500_000 // 500ms
}

fn default_reveal_stagger() -> u64 {
    50_000 // 50ms per index
}

fn default_reveal_threshold() -> f32 {
    0.85
}

fn default_hover_scale() -> f32 {
    1.03
}

fn default_hover_duration() -> u64 {
    200_000 // 200ms
}

fn default_tilt_max() -> f32 {
    5.0
}

/// Pointer-trail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailSettings {
    /// Exponential smoothing factor per frame (0..1].
    #[serde(default = "default_trail_smoothing")]
    pub smoothing: f32,
    /// Half the dot size; the dot is centered on the pointer.
    #[serde(default = "default_trail_offset")]
    pub dot_offset: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        TrailSettings {
            smoothing: default_trail_smoothing(),
            dot_offset: default_trail_offset(),
        }
    }
}

fn default_trail_smoothing() -> f32 {
    0.1
}

fn default_trail_offset() -> f32 {
    6.0
}

/// Scroll-coupled motion settings (backdrop parallax, hero scrub).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxSettings {
    /// Fraction of the scroll delta applied to backdrop layers.
    #[serde(default = "default_parallax_speed")]
    pub speed: f32,
    /// Hero content opacity at the end of the scrub range.
    #[serde(default = "default_scrub_floor")]
    pub scrub_floor: f32,
    /// Hero content upward shift (pixels) at the end of the scrub range.
    #[serde(default = "default_scrub_shift")]
    pub scrub_shift: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        ParallaxSettings {
            speed: default_parallax_speed(),
            scrub_floor: default_scrub_floor(),
            scrub_shift: default_scrub_shift(),
        }
    }
}

fn default_parallax_speed() -> f32 {
    0.3
}

fn default_scrub_floor() -> f32 {
    0.3
}

fn default_scrub_shift() -> f32 {
    30.0
}

fn default_header_threshold() -> f32 {
    50.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            motion: MotionSettings::default(),
            trail: TrailSettings::default(),
            parallax: ParallaxSettings::default(),
            header_threshold: default_header_threshold(),
        }
    }
}

/// Batch of input signals from JS (minimizes JS↔WASM crossings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalBatch {
    pub events: Vec<InputEvent>,
}

/// Single input event from the render surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    pub timestamp: Timestamp,
    pub event_type: EventType,
}

/// Type of input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventType {
    /// Pointer moved (page coordinates).
    PointerMove { position: PagePoint },
    /// Pointer entered a mounted element.
    PointerEnter { element: ElementId },
    /// Pointer left a mounted element.
    PointerLeave { element: ElementId },
    /// Page scrolled. Offset is the document scroll position.
    Scroll { offset: f32, viewport_height: f32 },
    /// An element appeared on the render surface.
    ElementMounted {
        element: ElementId,
        role: ElementRole,
        bounds: PageRect,
    },
    /// A mounted element was relaid out.
    ElementMoved { element: ElementId, bounds: PageRect },
    /// An element left the render surface. Tears down every effect it owns.
    ElementUnmounted { element: ElementId },
}

/// What an element is, and therefore which effects attach to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum ElementRole {
    /// Poster card: scroll-triggered rise entrance, hover lift, 3D tilt.
    Card { index: u32 },
    /// Section heading: scroll-triggered slide-in entrance.
    SectionTitle,
    /// Hero backdrop layer: scroll-coupled parallax. `speed` overrides config.
    HeroLayer { speed: Option<f32> },
    /// Hero foreground block: scrubbed fade/shift over the hero's first half.
    HeroContent,
    /// One member of the hero entrance sequence.
    HeroSlot { slot: HeroSlot },
    /// Whole-page root: fades in once at mount.
    PageRoot,
}

/// Members of the hero entrance sequence, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroSlot {
    Title,
    Meta,
    Description,
    Buttons,
}

/// Computed transform for one element at a sampled instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementFrame {
    pub element: ElementId,
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    /// Degrees, applied with a perspective transform.
    pub rotate_x: f32,
    pub rotate_y: f32,
}

/// Overlay surfaces the controller arbitrates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Overlay {
    #[default]
    None,
    Search,
    Detail,
}

/// Backdrop/panel poses for the currently animating overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub overlay: Overlay,
    /// False once the close animation has finished; the surface may unmount.
    pub display: bool,
    pub backdrop_opacity: f32,
    pub panel_opacity: f32,
    pub panel_scale: f32,
    pub panel_translate_y: f32,
}

/// Complete per-frame output returned to the render surface. A closing
/// overlay can coexist with an opening one for a few frames, so overlay
/// frames are a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub elements: Vec<ElementFrame>,
    pub overlays: Vec<OverlayFrame>,
    pub trail: Option<PagePoint>,
    pub scroll_locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_conversions() {
        let ts = Timestamp::from_micros(1_500_000);
        assert_eq!(ts.as_micros(), 1_500_000);
        assert!((ts.as_secs() - 1.5).abs() < 0.0001);
    }

    #[test]
    fn timestamp_offset_saturates() {
        let ts = Timestamp::from_micros(u64::MAX);
        assert_eq!(ts.offset(10).as_micros(), u64::MAX);
    }

    #[test]
    fn rect_center() {
        let rect = PageRect::new(100.0, 200.0, 40.0, 60.0);
        let center = rect.center();
        assert!((center.x - 120.0).abs() < f32::EPSILON);
        assert!((center.y - 230.0).abs() < f32::EPSILON);
    }

    #[test]
    fn config_defaults_from_empty_json() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.motion.reveal_duration_us, 500_000);
        assert!((config.trail.smoothing - 0.1).abs() < f32::EPSILON);
        assert!((config.parallax.speed - 0.3).abs() < f32::EPSILON);
        assert!((config.header_threshold - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn event_tag_roundtrip() {
        let json = r#"{"timestamp":1000,"event_type":{"type":"Scroll","offset":120.0,"viewport_height":900.0}}"#;
        let event: InputEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event.event_type, EventType::Scroll { .. }));
    }
}
