use std::time::{Duration, Instant};

/// Minimum spacing between two outbound changes from one client
pub const DEFAULT_CHANGE_INTERVAL: Duration = Duration::from_millis(100);

/// Limits outbound changes to one per `interval`.
///
/// Content offered while the interval is running replaces any earlier
/// pending content, so only the latest text is sent when the window opens.
#[derive(Debug, Clone)]
pub struct ChangeThrottle {
    interval: Duration,
    last_sent: Option<Instant>,
    pending: Option<String>,
}

impl ChangeThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
            pending: None,
        }
    }

    /// Offer new content. Returns it back if it may be sent right now.
    pub fn offer(&mut self, content: impl Into<String>, now: Instant) -> Option<String> {
        let content = content.into();
        if self.is_open(now) {
            self.last_sent = Some(now);
            self.pending = None;
            Some(content)
        } else {
            self.pending = Some(content);
            None
        }
    }

    /// Take the pending content once the interval has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.pending.is_some() && self.is_open(now) {
            self.last_sent = Some(now);
            return self.pending.take();
        }
        None
    }

    /// When the pending content becomes sendable, if there is any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        Some(self.last_sent.map_or_else(Instant::now, |sent| sent + self.interval))
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop pending content without sending it
    pub fn discard(&mut self) -> Option<String> {
        self.pending.take()
    }

    fn is_open(&self, now: Instant) -> bool {
        self.last_sent.map_or(true, |sent| now.duration_since(sent) >= self.interval)
    }
}
