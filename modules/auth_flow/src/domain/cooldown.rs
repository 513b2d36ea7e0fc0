use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

#[derive(Debug, Default)]
struct Inner {
    seconds: AtomicU32,
    generation: AtomicU64,
}

/// Resend cooldown: a once-per-second countdown from the configured
/// duration to zero. The resend action is disabled while the counter is
/// positive and re-enables exactly at zero; the counter never goes negative.
///
/// Re-arming bumps a generation counter so the previous ticker stops
/// without touching the new countdown.
#[derive(Debug, Clone, Default)]
pub struct ResendCooldown {
    inner: Arc<Inner>,
}

impl ResendCooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown at `seconds`.
    pub fn arm(&self, seconds: u32) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.seconds.store(seconds, Ordering::SeqCst);
        if seconds == 0 {
            return;
        }

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tick.tick().await; // first tick completes immediately
            loop {
                tick.tick().await;
                if inner.generation.load(Ordering::SeqCst) != generation {
                    return; // superseded by a re-arm
                }
                let prev = inner.seconds.load(Ordering::SeqCst);
                if prev == 0 {
                    return;
                }
                inner.seconds.store(prev - 1, Ordering::SeqCst);
                if prev == 1 {
                    return;
                }
            }
        });
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.inner.seconds.load(Ordering::SeqCst)
    }

    /// True while the resend action must be ignored.
    pub fn disabled(&self) -> bool {
        self.seconds_remaining() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    /// Let the ticker task run up to its next pending tick.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    /// Advance paused time by whole seconds, one tick at a time.
    async fn tick_seconds(n: u32) {
        for _ in 0..n {
            advance(Duration::from_secs(1)).await;
            settle().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_one_per_second_and_reenables_at_zero() {
        let cooldown = ResendCooldown::new();
        cooldown.arm(3);
        settle().await;
        assert!(cooldown.disabled());
        assert_eq!(cooldown.seconds_remaining(), 3);

        tick_seconds(1).await;
        assert_eq!(cooldown.seconds_remaining(), 2);

        tick_seconds(1).await;
        assert_eq!(cooldown.seconds_remaining(), 1);

        tick_seconds(1).await;
        assert_eq!(cooldown.seconds_remaining(), 0);
        assert!(!cooldown.disabled());

        // Never goes negative, even long after expiry
        tick_seconds(30).await;
        assert_eq!(cooldown.seconds_remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_replaces_the_previous_countdown() {
        let cooldown = ResendCooldown::new();
        cooldown.arm(60);
        settle().await;
        tick_seconds(2).await;
        assert_eq!(cooldown.seconds_remaining(), 58);

        cooldown.arm(60);
        settle().await;
        assert_eq!(cooldown.seconds_remaining(), 60);

        tick_seconds(1).await;
        assert_eq!(cooldown.seconds_remaining(), 59);
    }

    #[tokio::test(start_paused = true)]
    async fn arming_zero_is_immediately_enabled() {
        let cooldown = ResendCooldown::new();
        cooldown.arm(0);
        assert!(!cooldown.disabled());
    }
}
