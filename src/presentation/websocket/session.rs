//! WebSocket Session Management

use std::time::{Duration, Instant};

/// Per-connection bookkeeping owned by the connection task
#[derive(Debug)]
pub struct SessionState {
    pub frames_received: u64,
    pub last_activity: Instant,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            frames_received: 0,
            last_activity: Instant::now(),
        }
    }

    /// Record an inbound frame
    pub fn touch(&mut self) {
        self.frames_received += 1;
        self.last_activity = Instant::now();
    }

    pub fn is_idle(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() >= timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_counts_frames() {
        let mut session = SessionState::new();
        session.touch();
        session.touch();
        assert_eq!(session.frames_received, 2);
        assert!(!session.is_idle(Duration::from_secs(60)));
        assert!(session.is_idle(Duration::ZERO));
    }
}
