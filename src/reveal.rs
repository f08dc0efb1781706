// Entrance reveals. Scroll-triggered items play when their top clears the
// visibility threshold and reverse when scrolled back above it; mount-triggered
// items (hero sequence, page fade) play once at registration.

use std::collections::HashMap;

use crate::motion::{Animator, Easing, Pose};
use crate::types::{ElementId, HeroSlot, MotionSettings, PageRect, Timestamp};

/// Entrance style for a scroll-triggered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrance {
    /// Cards rise from below while scaling up. Staggered by list index.
    Rise { index: u32 },
    /// Section titles slide in from the left.
    Slide,
}

impl Entrance {
    fn hidden_pose(&self) -> Pose {
        match self {
            Entrance::Rise { .. } => Pose::hidden(0.0, 50.0, 0.9),
            Entrance::Slide => Pose::hidden(-30.0, 0.0, 1.0),
        }
    }

    fn stagger_index(&self) -> u32 {
        match self {
            Entrance::Rise { index } => *index,
            Entrance::Slide => 0,
        }
    }
}

#[derive(Debug)]
struct ScrollReveal {
    entrance: Entrance,
    bounds: PageRect,
    visible: bool,
    animator: Animator,
}

/// Per-slot timing of the hero entrance sequence. Later members begin before
/// earlier ones finish, matching the overlapping timeline of the landing page.
fn hero_timing(slot: HeroSlot) -> (u64, u64, f32) {
    // (delay_us, duration_us, rise_px)
    match slot {
        HeroSlot::Title => (0, 800_000, 50.0),
        HeroSlot::Meta => (400_000, 600_000, 30.0),
        HeroSlot::Description => (700_000, 600_000, 20.0),
        HeroSlot::Buttons => (1_000_000, 600_000, 20.0),
    }
}

const PAGE_FADE_US: u64 = 300_000;

/// Tracks every element with an entrance effect and the scroll state that
/// drives the scroll-triggered ones.
#[derive(Debug)]
pub struct RevealTracker {
    settings: MotionSettings,
    scroll_items: HashMap<ElementId, ScrollReveal>,
    mount_items: HashMap<ElementId, Animator>,
    /// Last observed (scroll offset, viewport height). None until the render
    /// surface reports its first scroll signal.
    viewport: Option<(f32, f32)>,
}

impl RevealTracker {
    pub fn new(settings: MotionSettings) -> Self {
        RevealTracker {
            settings,
            scroll_items: HashMap::new(),
            mount_items: HashMap::new(),
            viewport: None,
        }
    }

    /// Register a scroll-triggered element. If the viewport is already known
    /// and the element is in view, its entrance plays immediately.
    pub fn mount(&mut self, element: ElementId, entrance: Entrance, bounds: PageRect, now: Timestamp) {
        let mut item = ScrollReveal {
            entrance,
            bounds,
            visible: false,
            animator: Animator::at(entrance.hidden_pose()),
        };
        if let Some((scroll, viewport_h)) = self.viewport {
            if self.in_view(&item.bounds, scroll, viewport_h) {
                item.visible = true;
                self.play(&mut item, now);
            }
        }
        self.scroll_items.insert(element, item);
    }

    /// Register a hero-sequence member. Plays once, immediately.
    pub fn mount_hero_slot(&mut self, element: ElementId, slot: HeroSlot, now: Timestamp) {
        let (delay_us, duration_us, rise) = hero_timing(slot);
        let mut animator = Animator::at(Pose::hidden(0.0, rise, 1.0));
        animator.retarget_after(now, delay_us, Pose::REST, duration_us, Easing::EaseOut);
        self.mount_items.insert(element, animator);
    }

    /// Register the page root. Fades the whole page in once.
    pub fn mount_page_root(&mut self, element: ElementId, now: Timestamp) {
        let mut animator = Animator::at(Pose::hidden(0.0, 0.0, 1.0));
        animator.retarget(now, Pose::REST, PAGE_FADE_US, Easing::Linear);
        self.mount_items.insert(element, animator);
    }

    /// Update a mounted element's bounds after relayout. Unknown ids no-op.
    pub fn relayout(&mut self, element: ElementId, bounds: PageRect) {
        if let Some(item) = self.scroll_items.get_mut(&element) {
            item.bounds = bounds;
        }
    }

    /// Drop every entrance owned by the element. Unknown ids no-op.
    pub fn unmount(&mut self, element: ElementId) {
        self.scroll_items.remove(&element);
        self.mount_items.remove(&element);
    }

    /// Feed a scroll observation. Each visibility transition triggers at most
    /// one play (enter) or reverse (exit).
    pub fn on_scroll(&mut self, scroll: f32, viewport_h: f32, now: Timestamp) {
        self.viewport = Some((scroll, viewport_h));
        let threshold = self.settings.reveal_threshold;
        let duration = self.settings.reveal_duration_us;
        let stagger = self.settings.reveal_stagger_us;

        for item in self.scroll_items.values_mut() {
            let visible = item.bounds.y < scroll + threshold * viewport_h;
            if visible == item.visible {
                continue;
            }
            item.visible = visible;
            if visible {
                let delay = u64::from(item.entrance.stagger_index()) * stagger;
                item.animator
                    .retarget_after(now, delay, Pose::REST, duration, Easing::EaseOut);
            } else {
                item.animator
                    .retarget(now, item.entrance.hidden_pose(), duration, Easing::EaseOut);
            }
        }
    }

    fn in_view(&self, bounds: &PageRect, scroll: f32, viewport_h: f32) -> bool {
        bounds.y < scroll + self.settings.reveal_threshold * viewport_h
    }

    fn play(&self, item: &mut ScrollReveal, now: Timestamp) {
        let delay = u64::from(item.entrance.stagger_index()) * self.settings.reveal_stagger_us;
        item.animator.retarget_after(
            now,
            delay,
            Pose::REST,
            self.settings.reveal_duration_us,
            Easing::EaseOut,
        );
    }

    /// Sample every tracked entrance at the given instant.
    pub fn sample(&self, now: Timestamp) -> impl Iterator<Item = (ElementId, Pose)> + '_ {
        let scroll = self
            .scroll_items
            .iter()
            .map(move |(id, item)| (*id, item.animator.sample(now)));
        let mounted = self
            .mount_items
            .iter()
            .map(move |(id, animator)| (*id, animator.sample(now)));
        scroll.chain(mounted)
    }

    /// Sample a single element, if tracked here.
    pub fn sample_one(&self, element: ElementId, now: Timestamp) -> Option<Pose> {
        if let Some(item) = self.scroll_items.get(&element) {
            return Some(item.animator.sample(now));
        }
        self.mount_items
            .get(&element)
            .map(|animator| animator.sample(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(us: u64) -> Timestamp {
        Timestamp::from_micros(us)
    }

    fn tracker() -> RevealTracker {
        RevealTracker::new(MotionSettings::default())
    }

    fn below_fold() -> PageRect {
        PageRect::new(0.0, 2000.0, 300.0, 450.0)
    }

    #[test]
    fn starts_hidden_below_fold() {
        let mut tracker = tracker();
        tracker.on_scroll(0.0, 900.0, ts(0));
        let card = ElementId::new(1);
        tracker.mount(card, Entrance::Rise { index: 0 }, below_fold(), ts(0));

        let pose = tracker.sample_one(card, ts(1_000_000)).unwrap();
        assert!((pose.opacity - 0.0).abs() < f32::EPSILON);
        assert!((pose.y - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn plays_when_scrolled_into_view() {
        let mut tracker = tracker();
        tracker.on_scroll(0.0, 900.0, ts(0));
        let card = ElementId::new(1);
        tracker.mount(card, Entrance::Rise { index: 0 }, below_fold(), ts(0));

        // 2000 < 1400 + 0.85 * 900 → visible.
        tracker.on_scroll(1400.0, 900.0, ts(100_000));
        let pose = tracker.sample_one(card, ts(1_000_000)).unwrap();
        assert_eq!(pose, Pose::REST);
    }

    #[test]
    fn in_view_at_mount_plays_immediately() {
        let mut tracker = tracker();
        tracker.on_scroll(0.0, 900.0, ts(0));
        let card = ElementId::new(1);
        tracker.mount(
            card,
            Entrance::Rise { index: 0 },
            PageRect::new(0.0, 300.0, 300.0, 450.0),
            ts(0),
        );
        let pose = tracker.sample_one(card, ts(1_000_000)).unwrap();
        assert_eq!(pose, Pose::REST);
    }

    #[test]
    fn reverses_on_exit_and_replays_on_reentry() {
        let mut tracker = tracker();
        tracker.on_scroll(1400.0, 900.0, ts(0));
        let card = ElementId::new(1);
        tracker.mount(card, Entrance::Rise { index: 0 }, below_fold(), ts(0));
        assert_eq!(tracker.sample_one(card, ts(1_000_000)).unwrap(), Pose::REST);

        // Scroll back above the threshold: the entrance reverses.
        tracker.on_scroll(0.0, 900.0, ts(1_000_000));
        let pose = tracker.sample_one(card, ts(2_000_000)).unwrap();
        assert!((pose.opacity - 0.0).abs() < f32::EPSILON);

        // Re-entering replays it.
        tracker.on_scroll(1400.0, 900.0, ts(2_000_000));
        assert_eq!(tracker.sample_one(card, ts(3_000_000)).unwrap(), Pose::REST);
    }

    #[test]
    fn repeated_scrolls_do_not_restart_the_entrance() {
        let mut tracker = tracker();
        tracker.on_scroll(1400.0, 900.0, ts(0));
        let card = ElementId::new(1);
        tracker.mount(card, Entrance::Rise { index: 0 }, below_fold(), ts(0));

        // Still visible on a deeper scroll mid-flight; must not retrigger.
        tracker.on_scroll(1500.0, 900.0, ts(250_000));
        assert_eq!(tracker.sample_one(card, ts(500_000)).unwrap(), Pose::REST);
    }

    #[test]
    fn stagger_delays_later_indices() {
        let mut tracker = tracker();
        tracker.on_scroll(0.0, 900.0, ts(0));
        let first = ElementId::new(1);
        let sixth = ElementId::new(6);
        tracker.mount(first, Entrance::Rise { index: 0 }, below_fold(), ts(0));
        tracker.mount(sixth, Entrance::Rise { index: 5 }, below_fold(), ts(0));

        tracker.on_scroll(1400.0, 900.0, ts(0));

        // At two stagger steps in, index 0 is moving but index 5 has not started.
        let probe = ts(2 * MotionSettings::default().reveal_stagger_us);
        let early = tracker.sample_one(first, probe).unwrap();
        let late = tracker.sample_one(sixth, probe).unwrap();
        assert!(early.opacity > 0.0);
        assert!((late.opacity - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn hero_sequence_overlaps_in_order() {
        let mut tracker = tracker();
        let title = ElementId::new(10);
        let buttons = ElementId::new(13);
        tracker.mount_hero_slot(title, HeroSlot::Title, ts(0));
        tracker.mount_hero_slot(buttons, HeroSlot::Buttons, ts(0));

        // Midway through the title entrance the buttons have not begun.
        let probe = ts(400_000);
        assert!(tracker.sample_one(title, probe).unwrap().opacity > 0.0);
        assert!((tracker.sample_one(buttons, probe).unwrap().opacity - 0.0).abs() < f32::EPSILON);

        // Everything settles by the end of the sequence.
        let done = ts(2_000_000);
        assert_eq!(tracker.sample_one(title, done).unwrap(), Pose::REST);
        assert_eq!(tracker.sample_one(buttons, done).unwrap(), Pose::REST);
    }

    #[test]
    fn page_root_fades_in() {
        let mut tracker = tracker();
        let root = ElementId::new(0);
        tracker.mount_page_root(root, ts(0));
        let mid = tracker.sample_one(root, ts(150_000)).unwrap();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!((tracker.sample_one(root, ts(400_000)).unwrap().opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_element_ops_are_noops() {
        let mut tracker = tracker();
        let ghost = ElementId::new(99);
        tracker.relayout(ghost, below_fold());
        tracker.unmount(ghost);
        assert!(tracker.sample_one(ghost, ts(0)).is_none());
    }

    #[test]
    fn unmount_drops_tracking() {
        let mut tracker = tracker();
        tracker.on_scroll(0.0, 900.0, ts(0));
        let card = ElementId::new(1);
        tracker.mount(card, Entrance::Rise { index: 0 }, below_fold(), ts(0));
        tracker.unmount(card);
        assert!(tracker.sample_one(card, ts(0)).is_none());
    }
}
