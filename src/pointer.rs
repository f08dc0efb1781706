// Pointer-follow trail. A single lagging dot eased toward the live pointer by
// exponential smoothing, advanced once per animation frame. The recurring
// frame task carries a token captured at spawn; teardown invalidates the token
// and stops the task for good.

use crate::types::{PagePoint, TrailSettings};

/// Token identifying one spawned trail task. Cancelling an already-replaced
/// token does nothing, so a stale teardown cannot kill a newer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailToken(u32);

impl TrailToken {
    /// Raw value for the WASM boundary.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn from_u32(raw: u32) -> Self {
        TrailToken(raw)
    }
}

#[derive(Debug)]
struct TrailTask {
    token: TrailToken,
    position: PagePoint,
    target: PagePoint,
}

/// Owns the process-wide trail indicator. At most one task is live at a time;
/// spawning while live returns the existing token (create-once, reuse).
#[derive(Debug)]
pub struct TrailDriver {
    settings: TrailSettings,
    next_token: u32,
    task: Option<TrailTask>,
}

impl TrailDriver {
    pub fn new(settings: TrailSettings) -> Self {
        TrailDriver {
            settings,
            next_token: 0,
            task: None,
        }
    }

    /// Start the frame task and return its cancellation token. Idempotent
    /// while a task is live.
    pub fn spawn(&mut self) -> TrailToken {
        if let Some(task) = &self.task {
            return task.token;
        }
        let token = TrailToken(self.next_token);
        self.next_token += 1;
        self.task = Some(TrailTask {
            token,
            position: PagePoint::default(),
            target: PagePoint::default(),
        });
        tracing::debug!(token = token.0, "pointer trail spawned");
        token
    }

    /// Tear down the task the token belongs to. Stale or unknown tokens no-op.
    pub fn cancel(&mut self, token: TrailToken) {
        if self.task.as_ref().is_some_and(|task| task.token == token) {
            self.task = None;
            tracing::debug!(token = token.0, "pointer trail torn down");
        }
    }

    pub fn is_live(&self) -> bool {
        self.task.is_some()
    }

    /// Feed the live pointer position. The dot is centered on the pointer.
    pub fn set_target(&mut self, pointer: PagePoint) {
        if let Some(task) = &mut self.task {
            task.target = PagePoint::new(
                pointer.x - self.settings.dot_offset,
                pointer.y - self.settings.dot_offset,
            );
        }
    }

    /// Advance one frame: close a fixed fraction of the gap to the target.
    pub fn tick(&mut self) {
        let smoothing = self.settings.smoothing;
        if let Some(task) = &mut self.task {
            task.position.x += (task.target.x - task.position.x) * smoothing;
            task.position.y += (task.target.y - task.position.y) * smoothing;
        }
    }

    /// Current dot position, if a task is live.
    pub fn position(&self) -> Option<PagePoint> {
        self.task.as_ref().map(|task| task.position)
    }
}
