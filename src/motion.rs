// Tween core: fixed-duration eased interpolation between element poses.
// Starting a new tween on a busy channel retargets from the current sampled
// pose instead of queuing, so rapid hover enter/leave cannot build a backlog.

use serde::{Deserialize, Serialize};

use crate::types::{Overlay, OverlayFrame, Timestamp};

/// Easing function for pose transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring,
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Spring => {
                // Simple spring approximation.
                let c4 = (2.0 * std::f32::consts::PI) / 3.0;
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
        }
    }
}

/// Visual pose of an element: the channels the render surface can apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotate_x: f32,
    pub rotate_y: f32,
}

impl Pose {
    /// The resting pose: fully visible, untransformed.
    pub const REST: Pose = Pose {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    pub fn hidden(x: f32, y: f32, scale: f32) -> Pose {
        Pose {
            opacity: 0.0,
            x,
            y,
            scale,
            rotate_x: 0.0,
            rotate_y: 0.0,
        }
    }

    pub fn lerp(a: &Pose, b: &Pose, t: f32) -> Pose {
        Pose {
            opacity: lerp(a.opacity, b.opacity, t),
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            scale: lerp(a.scale, b.scale, t),
            rotate_x: lerp(a.rotate_x, b.rotate_x, t),
            rotate_y: lerp(a.rotate_y, b.rotate_y, t),
        }
    }

    /// Compose two poses affecting the same element (entrance × hover/tilt):
    /// opacities and scales multiply, offsets and rotations add.
    pub fn combine(&self, other: &Pose) -> Pose {
        Pose {
            opacity: self.opacity * other.opacity,
            x: self.x + other.x,
            y: self.y + other.y,
            scale: self.scale * other.scale,
            rotate_x: self.rotate_x + other.rotate_x,
            rotate_y: self.rotate_y + other.rotate_y,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::REST
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One in-flight pose transition.
#[derive(Debug, Clone, Copy)]
struct Tween {
    from: Pose,
    to: Pose,
    start: Timestamp,
    duration_us: u64,
    easing: Easing,
}

impl Tween {
    fn sample(&self, now: Timestamp) -> Pose {
        if now <= self.start {
            return self.from;
        }
        if self.duration_us == 0 {
            return self.to;
        }
        let elapsed = now.as_micros() - self.start.as_micros();
        if elapsed >= self.duration_us {
            return self.to;
        }
        let t = elapsed as f32 / self.duration_us as f32;
        Pose::lerp(&self.from, &self.to, self.easing.apply(t))
    }

    fn is_settled(&self, now: Timestamp) -> bool {
        now.as_micros() >= self.start.as_micros().saturating_add(self.duration_us)
    }
}

/// A single animated pose channel. Holds at most one tween; retargeting
/// replaces the tween and continues from whatever pose is current, which is
/// what makes animations supersedable rather than queued.
#[derive(Debug, Clone)]
pub struct Animator {
    resting: Pose,
    tween: Option<Tween>,
}

impl Animator {
    /// An animator sitting at the given pose with nothing in flight.
    pub fn at(pose: Pose) -> Self {
        Animator {
            resting: pose,
            tween: None,
        }
    }

    pub fn sample(&self, now: Timestamp) -> Pose {
        match &self.tween {
            Some(tween) => tween.sample(now),
            None => self.resting,
        }
    }

    pub fn is_settled(&self, now: Timestamp) -> bool {
        self.tween.as_ref().map_or(true, |t| t.is_settled(now))
    }

    /// Start a transition toward `to`, superseding any in-flight tween.
    pub fn retarget(&mut self, now: Timestamp, to: Pose, duration_us: u64, easing: Easing) {
        self.retarget_after(now, 0, to, duration_us, easing);
    }

    /// As `retarget`, with a start delay (used for staggered entrances).
    pub fn retarget_after(
        &mut self,
        now: Timestamp,
        delay_us: u64,
        to: Pose,
        duration_us: u64,
        easing: Easing,
    ) {
        let from = self.sample(now);
        self.resting = to;
        self.tween = Some(Tween {
            from,
            to,
            start: now.offset(delay_us),
            duration_us,
            easing,
        });
    }

}

impl Default for Animator {
    fn default() -> Self {
        Animator::at(Pose::REST)
    }
}

/// Backdrop fade and panel rise parameters for one overlay surface.
struct Choreography {
    hidden_panel: Pose,
    open_backdrop_us: u64,
    open_panel_us: u64,
    close_backdrop_us: u64,
    close_panel_us: u64,
}

fn choreography(overlay: Overlay) -> Choreography {
    match overlay {
        Overlay::Search => Choreography {
            hidden_panel: Pose::hidden(0.0, 30.0, 0.95),
            open_backdrop_us: 200_000,
            open_panel_us: 300_000,
            close_backdrop_us: 200_000,
            close_panel_us: 200_000,
        },
        // Detail opens a little heavier than search.
        Overlay::Detail => Choreography {
            hidden_panel: Pose::hidden(0.0, 50.0, 0.9),
            open_backdrop_us: 300_000,
            open_panel_us: 400_000,
            close_backdrop_us: 200_000,
            close_panel_us: 300_000,
        },
        Overlay::None => Choreography {
            hidden_panel: Pose::hidden(0.0, 0.0, 1.0),
            open_backdrop_us: 0,
            open_panel_us: 0,
            close_backdrop_us: 0,
            close_panel_us: 0,
        },
    }
}

/// Open/close choreography for the overlay currently on screen. Created when
/// an overlay opens, dropped once its close animation has settled.
#[derive(Debug, Clone)]
pub struct OverlayFx {
    overlay: Overlay,
    backdrop: Animator,
    panel: Animator,
    closing: bool,
}

impl OverlayFx {
    pub fn open(overlay: Overlay, now: Timestamp) -> Self {
        let spec = choreography(overlay);
        let mut backdrop = Animator::at(Pose::hidden(0.0, 0.0, 1.0));
        let mut panel = Animator::at(spec.hidden_panel);
        backdrop.retarget(now, Pose::REST, spec.open_backdrop_us, Easing::Linear);
        panel.retarget(now, Pose::REST, spec.open_panel_us, Easing::EaseOut);
        OverlayFx {
            overlay,
            backdrop,
            panel,
            closing: false,
        }
    }

    /// Begin the close animation. Supersedes the open animation if it is
    /// still in flight.
    pub fn close(&mut self, now: Timestamp) {
        let spec = choreography(self.overlay);
        self.backdrop.retarget(
            now,
            Pose::hidden(0.0, 0.0, 1.0),
            spec.close_backdrop_us,
            Easing::Linear,
        );
        self.panel
            .retarget(now, spec.hidden_panel, spec.close_panel_us, Easing::EaseIn);
        self.closing = true;
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// True once a close animation has fully settled; the fx can be dropped.
    pub fn is_finished(&self, now: Timestamp) -> bool {
        self.closing && self.backdrop.is_settled(now) && self.panel.is_settled(now)
    }

    pub fn sample(&self, now: Timestamp) -> OverlayFrame {
        let backdrop = self.backdrop.sample(now);
        let panel = self.panel.sample(now);
        OverlayFrame {
            overlay: self.overlay,
            display: !self.is_finished(now),
            backdrop_opacity: backdrop.opacity,
            panel_opacity: panel.opacity,
            panel_scale: panel.scale,
            panel_translate_y: panel.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(us: u64) -> Timestamp {
        Timestamp::from_micros(us)
    }

    #[test]
    fn easing_bounds() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::Spring,
        ] {
            let start = easing.apply(0.0);
            let end = easing.apply(1.0);
            assert!((-0.1..=0.1).contains(&start), "Easing start should be ~0");
            assert!((0.9..=1.1).contains(&end), "Easing end should be ~1");
        }
    }

    #[test]
    fn tween_holds_from_pose_before_start() {
        let mut animator = Animator::at(Pose::hidden(0.0, 50.0, 0.9));
        animator.retarget_after(ts(1000), 5_000, Pose::REST, 500_000, Easing::EaseOut);
        let pose = animator.sample(ts(2000));
        assert!((pose.opacity - 0.0).abs() < f32::EPSILON);
        assert!((pose.y - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn tween_settles_at_target() {
        let mut animator = Animator::at(Pose::hidden(0.0, 50.0, 0.9));
        animator.retarget(ts(0), Pose::REST, 500_000, Easing::EaseOut);
        let pose = animator.sample(ts(2_000_000));
        assert_eq!(pose, Pose::REST);
        assert!(animator.is_settled(ts(2_000_000)));
    }

    #[test]
    fn retarget_continues_from_current_pose() {
        let mut animator = Animator::at(Pose::hidden(0.0, 50.0, 0.9));
        animator.retarget(ts(0), Pose::REST, 400_000, Easing::Linear);

        // Halfway up, send it back down. The reverse must start mid-flight,
        // not from the rest pose.
        let midway = animator.sample(ts(200_000));
        assert!(midway.y > 0.0 && midway.y < 50.0);

        animator.retarget(ts(200_000), Pose::hidden(0.0, 50.0, 0.9), 400_000, Easing::Linear);
        let just_after = animator.sample(ts(200_001));
        assert!((just_after.y - midway.y).abs() < 0.1);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut animator = Animator::default();
        animator.retarget(ts(10), Pose::hidden(0.0, 20.0, 1.0), 0, Easing::Linear);
        assert!((animator.sample(ts(11)).y - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn combine_is_identity_at_rest() {
        let pose = Pose {
            opacity: 0.5,
            x: 3.0,
            y: -4.0,
            scale: 1.2,
            rotate_x: 2.0,
            rotate_y: -2.0,
        };
        assert_eq!(pose.combine(&Pose::REST), pose);
    }

    #[test]
    fn overlay_fx_open_then_close_finishes() {
        let mut fx = OverlayFx::open(Overlay::Search, ts(0));
        let frame = fx.sample(ts(0));
        assert!(frame.display);
        assert!(frame.backdrop_opacity < 0.01);

        let frame = fx.sample(ts(1_000_000));
        assert!((frame.backdrop_opacity - 1.0).abs() < f32::EPSILON);
        assert!((frame.panel_scale - 1.0).abs() < f32::EPSILON);
        assert!(!fx.is_finished(ts(1_000_000)));

        fx.close(ts(1_000_000));
        assert!(!fx.is_finished(ts(1_100_000)));
        assert!(fx.is_finished(ts(1_300_000)));
        assert!(!fx.sample(ts(1_300_000)).display);
    }

    #[test]
    fn overlay_close_supersedes_open() {
        let mut fx = OverlayFx::open(Overlay::Detail, ts(0));
        // Close while the open animation is still mid-flight.
        fx.close(ts(100_000));
        let frame = fx.sample(ts(100_001));
        // Panel never reached full opacity; the close starts from wherever the
        // open left it.
        assert!(frame.panel_opacity < 1.0);
        assert!(fx.is_finished(ts(500_000)));
    }

    proptest! {
        /// Eased progress stays within the unit interval for the non-spring
        /// easings (spring overshoots on purpose).
        #[test]
        fn monotone_easings_stay_in_unit_range(t in 0.0f32..=1.0f32) {
            for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
                let v = easing.apply(t);
                prop_assert!((-0.001..=1.001).contains(&v));
            }
        }

        /// Sampling never panics and always lands between the endpoint poses
        /// for linear easing.
        #[test]
        fn linear_tween_is_bounded(sample_at in 0u64..2_000_000u64) {
            let mut animator = Animator::at(Pose::hidden(0.0, 50.0, 0.9));
            animator.retarget(ts(0), Pose::REST, 500_000, Easing::Linear);
            let pose = animator.sample(ts(sample_at));
            prop_assert!((0.0..=1.0).contains(&pose.opacity));
            prop_assert!((0.0..=50.0).contains(&pose.y));
        }
    }
}
