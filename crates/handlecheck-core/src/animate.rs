// Animated numeric presenter.
//
// Count-ups are pure functions of elapsed time; the `Animator` samples them
// once per frame and writes the result into the surface. Animations cannot be
// cancelled. Two animations on the same slot both write every frame and the
// one started later wins, since it is written last.

use std::time::Duration;

use tokio::time::Instant;

use crate::page::{SlotContent, SlotId, Surface};

pub const CURRENCY_UNIT: &str = "TON";

/// How a sampled value is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    /// One decimal place plus the currency unit, highlighted.
    Currency,
    /// Rounded integer, nothing appended.
    None,
    /// Rounded integer immediately followed by the given text.
    Literal(String),
}

/// `1 - (1 - t)^4`.
pub fn ease_out_quart(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(4)
}

/// Elapsed fraction of `duration`, clamped to `[0, 1]`.
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Eased value at fraction `t`.
pub fn sample(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * ease_out_quart(t.clamp(0.0, 1.0))
}

/// Round half up, so `2.5 -> 3` and `-2.5 -> -2`.
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

pub fn format_value(value: f64, suffix: &Suffix) -> SlotContent {
    match suffix {
        Suffix::Currency => SlotContent::Highlight(format!("{value:.1} {CURRENCY_UNIT}")),
        Suffix::None => SlotContent::Text(round_half_up(value).to_string()),
        Suffix::Literal(s) => SlotContent::Text(format!("{}{s}", round_half_up(value))),
    }
}

/// A count-up the renderer wants started.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    pub slot: SlotId,
    pub end: f64,
    pub suffix: Suffix,
}

impl AnimationRequest {
    pub fn new(slot: SlotId, end: f64, suffix: Suffix) -> Self {
        AnimationRequest { slot, end, suffix }
    }
}

#[derive(Debug, Clone)]
pub struct Animation {
    pub slot: SlotId,
    pub start: f64,
    pub end: f64,
    pub suffix: Suffix,
    pub started_at: Instant,
    pub duration: Duration,
}

impl Animation {
    pub fn progress_at(&self, now: Instant) -> f64 {
        progress(now.saturating_duration_since(self.started_at), self.duration)
    }

    /// Rendered content at `now`.
    pub fn frame(&self, now: Instant) -> SlotContent {
        let t = self.progress_at(now);
        format_value(sample(self.start, self.end, t), &self.suffix)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Animator {
    running: Vec<Animation>,
}

impl Animator {
    /// Start a count-up from 0. Never touches existing animations.
    pub fn start(&mut self, request: AnimationRequest, now: Instant, duration: Duration) {
        self.running.push(Animation {
            slot: request.slot,
            start: 0.0,
            end: request.end,
            suffix: request.suffix,
            started_at: now,
            duration,
        });
    }

    /// Write one frame of every running animation, then retire the ones that
    /// just wrote their final frame. Returns whether anything was written.
    pub fn tick(&mut self, now: Instant, surface: &mut Surface) -> bool {
        if self.running.is_empty() {
            return false;
        }
        for animation in &self.running {
            surface.set(animation.slot, animation.frame(now));
        }
        self.running.retain(|a| !a.is_finished(now));
        true
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }
}
