// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Transition: declarative timing for coach-mark motion.
//!
//! A [`TransitionDescriptor`] declares how one show, hide, or idle step of a
//! coach mark should move: duration, delay, curve, simple vs keyframe kind,
//! plus optional custom animation, initial-state, and completion hooks. It
//! is stateless and disposable — constructed fresh per call, consumed by
//! [`TransitionDescriptor::arm`], which binds it to a start instant and
//! yields a running [`Transition`].
//!
//! The crate never reads a clock and schedules nothing. Hosts poll: each
//! frame they pass `now` (seconds) to [`Transition::drive`], apply the
//! resulting [`TransitionContext`] to their bubble, and check
//! [`Transition::is_settled`]. Settlement — not cancellation — is the only
//! continuation point: cancelling flips a flag that is observed at the next
//! poll, so an in-flight transition always reaches its completion hook and
//! never strands the bubble without a scheduled step.
//!
//! ## Minimal example
//!
//! ```rust
//! use waymark_transition::{TransitionContext, TransitionDescriptor};
//!
//! // A plain fade-in, armed at t = 0.
//! let mut fade = TransitionDescriptor::fade_in().arm(0.0);
//! let mut ctx = TransitionContext::default();
//!
//! fade.drive(0.15, &mut ctx);
//! assert!(ctx.alpha > 0.0 && ctx.alpha < 1.0);
//! assert!(!fade.is_settled(0.15));
//!
//! fade.drive(0.3, &mut ctx);
//! assert_eq!(ctx.alpha, 1.0);
//! assert!(fade.is_settled(0.3));
//! fade.finish(true);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use core::fmt;

use kurbo::Vec2;

/// Default duration, in seconds, for overlay and bubble fades.
pub const DEFAULT_FADE_DURATION: f64 = 0.3;

/// Easing curve applied to a transition's raw progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Curve {
    /// Constant velocity.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow finish.
    EaseOut,
    /// Slow start and finish.
    #[default]
    EaseInOut,
}

impl Curve {
    /// Maps raw progress `t` in `[0, 1]` through the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// Whether a transition eases its progress or hands raw progress to a
/// keyframing animation block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransitionKind {
    /// Progress is eased through the declared [`Curve`].
    #[default]
    Simple,
    /// Progress stays linear; the custom animation block performs its own
    /// keyframing.
    Keyframe,
}

/// Timing parameters shared by show, hide, and idle transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionParams {
    /// Length of the transition in seconds.
    pub duration: f64,
    /// Seconds to wait after arming before progress starts.
    pub delay: f64,
    /// Easing curve, consulted for [`TransitionKind::Simple`].
    pub curve: Curve,
    /// Simple vs keyframe progress delivery.
    pub kind: TransitionKind,
    /// Loop indefinitely; the transition settles only when cancelled.
    /// Used by idle animations.
    pub repeats: bool,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            duration: DEFAULT_FADE_DURATION,
            delay: 0.0,
            curve: Curve::default(),
            kind: TransitionKind::default(),
            repeats: false,
        }
    }
}

/// The mutable visual state a transition writes each poll.
///
/// The flow applies the context to the bubble handle after driving; custom
/// animation blocks are free to write any field.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TransitionContext {
    /// Progress delivered to this poll: eased for simple transitions, raw
    /// linear for keyframe ones.
    pub progress: f64,
    /// Bubble opacity in `[0, 1]`.
    pub alpha: f64,
    /// Decorative offset from the laid-out frame, for idle motion.
    pub offset: Vec2,
}

/// Custom per-poll animation hook.
pub type AnimationFn = Box<dyn FnMut(&mut TransitionContext)>;
/// One-shot hook establishing the starting visual state.
pub type InitialStateFn = Box<dyn FnOnce(&mut TransitionContext)>;
/// One-shot completion hook; receives `false` when the transition was
/// cancelled before running to its full length.
pub type CompletionFn = Box<dyn FnOnce(bool)>;

/// A declarative, single-use description of one transition.
#[derive(Default)]
pub struct TransitionDescriptor {
    /// Timing and kind.
    pub params: TransitionParams,
    /// Custom animation block; when absent the caller applies its default
    /// motion (a plain fade for show/hide).
    pub animation: Option<AnimationFn>,
    /// Runs once, immediately before the first animation poll.
    pub initial_state: Option<InitialStateFn>,
    /// Runs exactly once, when the armed transition is finished.
    pub completion: Option<CompletionFn>,
}

impl TransitionDescriptor {
    /// A descriptor with the given timing and no hooks.
    #[must_use]
    pub fn new(params: TransitionParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// A plain fade toward opaque over the default duration.
    ///
    /// Written as an envelope (`max` with the context's current alpha) so a
    /// partially visible target never flashes back to transparent.
    #[must_use]
    pub fn fade_in() -> Self {
        Self {
            animation: Some(Box::new(|ctx| ctx.alpha = ctx.alpha.max(ctx.progress))),
            ..Self::default()
        }
    }

    /// A plain fade toward transparent over the default duration.
    ///
    /// Written as an envelope (`min` with the context's current alpha) so a
    /// hide that interrupts a half-finished show descends from wherever the
    /// show left off instead of snapping opaque first.
    #[must_use]
    pub fn fade_out() -> Self {
        Self {
            animation: Some(Box::new(|ctx| ctx.alpha = ctx.alpha.min(1.0 - ctx.progress))),
            ..Self::default()
        }
    }

    /// Binds the descriptor to a start instant, consuming it.
    #[must_use]
    pub fn arm(self, now: f64) -> Transition {
        Transition {
            params: self.params,
            animation: self.animation,
            initial_state: self.initial_state,
            completion: self.completion,
            start: now,
            cancelled: false,
        }
    }
}

impl fmt::Debug for TransitionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionDescriptor")
            .field("params", &self.params)
            .field("animation", &self.animation.is_some())
            .field("initial_state", &self.initial_state.is_some())
            .field("completion", &self.completion.is_some())
            .finish()
    }
}

/// Where an armed transition stands at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionPhase {
    /// The delay has not elapsed yet.
    Pending,
    /// In flight, with raw (uncurved) progress in `[0, 1)`.
    Running(f64),
    /// Ran to the end of its declared duration, or was cancelled.
    Settled,
}

/// An armed, running transition.
///
/// Drive it once per frame with the host's timestamp; when
/// [`Transition::is_settled`] reports true, consume it with
/// [`Transition::finish`] to fire the completion hook.
pub struct Transition {
    params: TransitionParams,
    animation: Option<AnimationFn>,
    initial_state: Option<InitialStateFn>,
    completion: Option<CompletionFn>,
    start: f64,
    cancelled: bool,
}

impl Transition {
    /// The timing this transition was armed with.
    #[must_use]
    pub fn params(&self) -> TransitionParams {
        self.params
    }

    /// Whether a custom animation block was supplied.
    #[must_use]
    pub fn has_animation(&self) -> bool {
        self.animation.is_some()
    }

    /// Restarts the transition from `now`, keeping its hooks.
    ///
    /// Used to re-arm a non-repeating idle animation after each pass; the
    /// initial-state hook does not fire again.
    pub fn rearm(&mut self, now: f64) {
        self.start = now;
    }

    /// Requests cancellation. Observed at the next poll: the transition
    /// reports settled and its completion hook receives `false`. Never
    /// rewinds or aborts work already applied.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The phase at `now`.
    #[must_use]
    pub fn phase(&self, now: f64) -> TransitionPhase {
        if self.cancelled {
            return TransitionPhase::Settled;
        }
        let elapsed = now - self.start - self.params.delay;
        if elapsed < 0.0 {
            return TransitionPhase::Pending;
        }
        if self.params.duration <= 0.0 {
            return TransitionPhase::Settled;
        }
        let raw = elapsed / self.params.duration;
        if self.params.repeats {
            TransitionPhase::Running(raw % 1.0)
        } else if raw >= 1.0 {
            TransitionPhase::Settled
        } else {
            TransitionPhase::Running(raw)
        }
    }

    /// Whether the transition has settled at `now`. Repeating transitions
    /// settle only through cancellation.
    #[must_use]
    pub fn is_settled(&self, now: f64) -> bool {
        self.phase(now) == TransitionPhase::Settled
    }

    /// Progress to deliver at `now`: eased for [`TransitionKind::Simple`],
    /// raw for [`TransitionKind::Keyframe`]. Cancelled transitions report
    /// wherever they were, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: f64) -> f64 {
        let elapsed = now - self.start - self.params.delay;
        let raw = if self.params.duration <= 0.0 {
            if elapsed < 0.0 { 0.0 } else { 1.0 }
        } else if self.params.repeats && elapsed >= 0.0 && !self.cancelled {
            (elapsed / self.params.duration) % 1.0
        } else {
            (elapsed / self.params.duration).clamp(0.0, 1.0)
        };
        match self.params.kind {
            TransitionKind::Simple => self.params.curve.apply(raw),
            TransitionKind::Keyframe => raw,
        }
    }

    /// Advances the transition: fires the initial-state hook on the first
    /// poll, writes the current progress into `ctx`, and runs the custom
    /// animation block when one was supplied.
    pub fn drive(&mut self, now: f64, ctx: &mut TransitionContext) {
        if let Some(setup) = self.initial_state.take() {
            setup(ctx);
        }
        ctx.progress = self.progress(now);
        if let Some(animation) = &mut self.animation {
            animation(ctx);
        }
    }

    /// Consumes the transition and fires its completion hook. `finished` is
    /// `false` when the transition was cut short by cancellation.
    pub fn finish(mut self, finished: bool) {
        if let Some(completion) = self.completion.take() {
            completion(finished);
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("params", &self.params)
            .field("start", &self.start)
            .field("cancelled", &self.cancelled)
            .field("animation", &self.animation.is_some())
            .field("initial_state", &self.initial_state.is_some())
            .field("completion", &self.completion.is_some())
            .finish()
    }
}
