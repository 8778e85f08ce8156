//! Coalescing frame scheduler.
//!
//! Every state change asks for a frame. While one is already pending the
//! pending request is cancelled and replaced, so a burst of changes inside a
//! single refresh interval produces one pipeline run.

/// Handle for a requested refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Host hook for refresh-aligned callbacks. The host later calls
/// `CanvasEngine::on_frame` with the token it handed out.
pub trait RefreshSource {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Refresh source for headless hosts: tokens queue up until `tick` drains them.
#[derive(Debug, Default)]
pub struct ManualRefresh {
    next: u64,
    pending: Vec<FrameToken>,
    requested: usize,
    cancelled: usize,
}

impl ManualRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live tokens, oldest first. Cancelled tokens are not returned.
    pub fn tick(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[FrameToken] {
        &self.pending
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl RefreshSource for ManualRefresh {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        self.requested += 1;
        let token = FrameToken(self.next);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let before = self.pending.len();
        self.pending.retain(|t| *t != token);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled(FrameToken),
}

#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, SchedulerState::Scheduled(_))
    }

    /// Request a frame, replacing any pending request.
    pub fn schedule<R: RefreshSource + ?Sized>(&mut self, source: &mut R) -> FrameToken {
        if let SchedulerState::Scheduled(pending) = self.state {
            tracing::debug!(token = pending.0, "coalescing pending frame");
            source.cancel_frame(pending);
        }
        let token = source.request_frame();
        self.state = SchedulerState::Scheduled(token);
        token
    }

    /// Accept a fired callback. Returns `true` only for the current token,
    /// after which the scheduler is idle again.
    pub fn fire(&mut self, token: FrameToken) -> bool {
        match self.state {
            SchedulerState::Scheduled(current) if current == token => {
                self.state = SchedulerState::Idle;
                true
            }
            _ => {
                tracing::debug!(token = token.0, "ignoring stale frame callback");
                false
            }
        }
    }

    pub fn cancel<R: RefreshSource + ?Sized>(&mut self, source: &mut R) {
        if let SchedulerState::Scheduled(pending) = self.state {
            source.cancel_frame(pending);
        }
        self.state = SchedulerState::Idle;
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_requests_leaves_one_live_token() {
        let mut refresh = ManualRefresh::new();
        let mut scheduler = FrameScheduler::new();
        let mut last = FrameToken(0);
        for _ in 0..5 {
            last = scheduler.schedule(&mut refresh);
        }
        assert_eq!(refresh.requested(), 5);
        assert_eq!(refresh.cancelled(), 4);
        assert_eq!(refresh.tick(), vec![last]);
        assert!(scheduler.fire(last));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut refresh = ManualRefresh::new();
        let mut scheduler = FrameScheduler::new();
        let first = scheduler.schedule(&mut refresh);
        let second = scheduler.schedule(&mut refresh);
        assert!(!scheduler.fire(first));
        assert_eq!(scheduler.state(), SchedulerState::Scheduled(second));
        assert!(scheduler.fire(second));
        assert!(!scheduler.fire(second));
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut refresh = ManualRefresh::new();
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule(&mut refresh);
        scheduler.cancel(&mut refresh);
        assert!(!scheduler.is_scheduled());
        assert!(refresh.tick().is_empty());
    }
}
