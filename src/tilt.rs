// Pointer-relative 3D tilt and hover lift for poster cards. Rotation follows
// the pointer only while hovering; exit eases everything back to rest so no
// residual transform survives the hover.

use std::collections::HashMap;

use crate::motion::{Animator, Easing, Pose};
use crate::types::{ElementId, MotionSettings, PagePoint, PageRect, Timestamp};

#[derive(Debug)]
struct Card {
    bounds: PageRect,
    hovering: bool,
    animator: Animator,
}

/// Tracks every card that reacts to the pointer.
#[derive(Debug)]
pub struct TiltField {
    settings: MotionSettings,
    cards: HashMap<ElementId, Card>,
}

impl TiltField {
    pub fn new(settings: MotionSettings) -> Self {
        TiltField {
            settings,
            cards: HashMap::new(),
        }
    }

    pub fn mount(&mut self, element: ElementId, bounds: PageRect) {
        self.cards.insert(
            element,
            Card {
                bounds,
                hovering: false,
                animator: Animator::default(),
            },
        );
    }

    /// Unknown ids no-op.
    pub fn relayout(&mut self, element: ElementId, bounds: PageRect) {
        if let Some(card) = self.cards.get_mut(&element) {
            card.bounds = bounds;
        }
    }

    /// Unknown ids no-op.
    pub fn unmount(&mut self, element: ElementId) {
        self.cards.remove(&element);
    }

    /// Pointer entered a card: lift it. Unknown ids no-op.
    pub fn pointer_enter(&mut self, element: ElementId, now: Timestamp) {
        let lift = self.lift_pose(0.0, 0.0);
        let duration = self.settings.hover_duration_us;
        if let Some(card) = self.cards.get_mut(&element) {
            card.hovering = true;
            card.animator.retarget(now, lift, duration, Easing::EaseOut);
        }
    }

    /// Pointer left a card: ease back to rest. Unknown ids no-op.
    pub fn pointer_leave(&mut self, element: ElementId, now: Timestamp) {
        let duration = self.settings.hover_duration_us;
        if let Some(card) = self.cards.get_mut(&element) {
            card.hovering = false;
            card.animator
                .retarget(now, Pose::REST, duration, Easing::EaseOut);
        }
    }

    /// Live pointer position. Retargets the rotation of every hovered card;
    /// cards not hovered ignore the pointer entirely.
    pub fn pointer_move(&mut self, pointer: PagePoint, now: Timestamp) {
        let max_deg = self.settings.tilt_max_deg;
        let scale = self.settings.hover_scale;
        let duration = self.settings.hover_duration_us;

        for card in self.cards.values_mut() {
            if !card.hovering {
                continue;
            }
            let (rx, ry) = tilt_angles(&card.bounds, pointer, max_deg);
            let target = Pose {
                scale,
                rotate_x: rx,
                rotate_y: ry,
                ..Pose::REST
            };
            card.animator.retarget(now, target, duration, Easing::EaseOut);
        }
    }

    fn lift_pose(&self, rx: f32, ry: f32) -> Pose {
        Pose {
            scale: self.settings.hover_scale,
            rotate_x: rx,
            rotate_y: ry,
            ..Pose::REST
        }
    }

    pub fn sample(&self, now: Timestamp) -> impl Iterator<Item = (ElementId, Pose)> + '_ {
        self.cards
            .iter()
            .map(move |(id, card)| (*id, card.animator.sample(now)))
    }

    pub fn sample_one(&self, element: ElementId, now: Timestamp) -> Option<Pose> {
        self.cards
            .get(&element)
            .map(|card| card.animator.sample(now))
    }
}

/// Rotation angles from the pointer's offset off the card center, normalized
/// by the half extents and clamped to the configured maximum.
fn tilt_angles(bounds: &PageRect, pointer: PagePoint, max_deg: f32) -> (f32, f32) {
    let half_w = bounds.width / 2.0;
    let half_h = bounds.height / 2.0;
    if half_w <= 0.0 || half_h <= 0.0 {
        return (0.0, 0.0);
    }
    let center = bounds.center();
    let dx = ((pointer.x - center.x) / half_w).clamp(-1.0, 1.0);
    let dy = ((pointer.y - center.y) / half_h).clamp(-1.0, 1.0);
    // Pointer below center tips the card away (negative X rotation); pointer
    // right of center turns it toward the viewer (positive Y rotation).
    (dy * -max_deg, dx * max_deg)
}
