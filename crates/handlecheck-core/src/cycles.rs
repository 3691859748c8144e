// Timed text cycles: the loading status messages and the input placeholder.

use std::time::Duration;

use tokio::time::Instant;

pub const LOADING_MESSAGES: [&str; 6] = [
    "Analyzing username availability...",
    "Checking Telegram database...",
    "Scanning Fragment marketplace...",
    "Calculating market value...",
    "Determining rarity score...",
    "Finalizing analysis...",
];

pub const PLACEHOLDERS: [&str; 5] = [
    "Enter username",
    "e.g. minted",
    "e.g. crypto",
    "e.g. bitcoin",
    "e.g. your_name",
];

/// Loading status text. Advances one message per step and holds on the last.
#[derive(Debug, Clone, Copy)]
pub struct LoadingCycle {
    started_at: Instant,
    step: Duration,
}

impl LoadingCycle {
    pub fn start(now: Instant, step: Duration) -> Self {
        LoadingCycle {
            started_at: now,
            step,
        }
    }

    pub fn index_at(&self, now: Instant) -> usize {
        if self.step.is_zero() {
            return LOADING_MESSAGES.len() - 1;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let steps = (elapsed.as_millis() / self.step.as_millis().max(1)) as usize;
        steps.min(LOADING_MESSAGES.len() - 1)
    }

    pub fn message_at(&self, now: Instant) -> &'static str {
        LOADING_MESSAGES[self.index_at(now)]
    }
}

/// Placeholder rotation. Ticks on a fixed interval; a tick only advances the
/// text while the input is unfocused and empty.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderRotation {
    index: usize,
    next_tick: Instant,
    interval: Duration,
}

impl PlaceholderRotation {
    pub fn new(now: Instant, interval: Duration) -> Self {
        PlaceholderRotation {
            index: 0,
            next_tick: now + interval,
            interval,
        }
    }

    pub fn current(&self) -> &'static str {
        PLACEHOLDERS[self.index]
    }

    /// Run every tick that fell due by `now`. Returns the new placeholder if
    /// it changed.
    pub fn tick(&mut self, now: Instant, focused: bool, empty: bool) -> Option<&'static str> {
        let mut changed = false;
        while now >= self.next_tick {
            self.next_tick += self.interval;
            if !focused && empty {
                self.index = (self.index + 1) % PLACEHOLDERS.len();
                changed = true;
            }
        }
        changed.then(|| self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn loading_advances_per_step_and_holds() {
        let now = Instant::now();
        let cycle = LoadingCycle::start(now, ms(600));
        assert_eq!(cycle.message_at(now), "Analyzing username availability...");
        assert_eq!(cycle.index_at(now + ms(599)), 0);
        assert_eq!(cycle.index_at(now + ms(600)), 1);
        assert_eq!(cycle.index_at(now + ms(1800)), 3);
        assert_eq!(cycle.message_at(now + ms(3000)), "Finalizing analysis...");
        // Never wraps.
        assert_eq!(cycle.index_at(now + ms(60_000)), 5);
    }

    #[test]
    fn placeholder_rotates_only_when_idle() {
        let now = Instant::now();
        let mut rotation = PlaceholderRotation::new(now, ms(3000));
        assert_eq!(rotation.tick(now + ms(2999), false, true), None);
        assert_eq!(rotation.tick(now + ms(3000), false, true), Some("e.g. minted"));

        // Focused: the tick passes without advancing.
        assert_eq!(rotation.tick(now + ms(6000), true, true), None);
        // Non-empty input: same.
        assert_eq!(rotation.tick(now + ms(9000), false, false), None);
        assert_eq!(rotation.current(), "e.g. minted");

        assert_eq!(rotation.tick(now + ms(12_000), false, true), Some("e.g. crypto"));
    }

    #[test]
    fn placeholder_wraps_around() {
        let now = Instant::now();
        let mut rotation = PlaceholderRotation::new(now, ms(10));
        rotation.tick(now + ms(50), false, true);
        assert_eq!(rotation.current(), "Enter username");
    }
}
