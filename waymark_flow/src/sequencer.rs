// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flow sequencer: walks a provider's marks one at a time over a shared
//! overlay, fading the overlay in once at the start and out once at the end.

use core::fmt;

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use tracing::{debug, warn};
use waymark_layout::resolve_alignment;
use waymark_overlay::{Overlay, TapOutcome};
use waymark_transition::{Transition, TransitionContext, TransitionDescriptor};

use crate::provider::{Bubble, Container, MarkProvider};
use crate::session::{Presenter, PresenterEvent, PresenterState, ShowRequest};

/// What the sequencer resolved during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    /// A mark finished its show transition and is now fully shown.
    MarkShown,
    /// A mark finished its hide transition and was released.
    MarkHidden,
    /// The flow ended: the last mark is gone and the overlay fade-out
    /// settled. The sequencer is inactive again.
    Finished,
}

/// Event buffer returned by [`FlowSequencer::tick`].
pub type FlowEvents = SmallVec<[FlowEvent; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeDirection {
    In,
    Out,
}

/// Runs a sequence of coach marks from a [`MarkProvider`].
///
/// One sequencer owns one [`Overlay`] and one [`Presenter`]; starting a flow
/// while one is active is a no-op, so at most one mark is ever live. The
/// owner forwards taps through [`FlowSequencer::handle_tap`] and polls
/// [`FlowSequencer::tick`] once per frame with the current time in seconds.
pub struct FlowSequencer<P: MarkProvider> {
    provider: P,
    presenter: Presenter<P::Bubble>,
    overlay: Overlay,
    container: Container,
    active: bool,
    /// Teardown requested; no further marks are fetched.
    stopping: bool,
    /// The overlay fade-out has settled during teardown.
    fade_out_done: bool,
    overlay_fade: Option<(Transition, FadeDirection)>,
    overlay_ctx: TransitionContext,
}

impl<P: MarkProvider> FlowSequencer<P> {
    /// A sequencer over `provider`, presenting inside `container`.
    #[must_use]
    pub fn new(provider: P, container: Container) -> Self {
        Self {
            provider,
            presenter: Presenter::new(),
            overlay: Overlay::new(container.bounds),
            container,
            active: false,
            stopping: false,
            fade_out_done: false,
            overlay_fade: None,
            overlay_ctx: TransitionContext::default(),
        }
    }

    /// Whether a flow is running (including its teardown fade).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The overlay, for rendering.
    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The presenter's observable state.
    #[must_use]
    pub fn presenter_state(&self) -> PresenterState {
        self.presenter.state()
    }

    /// The provider, for host bookkeeping.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Starts the flow: fades the overlay in, then shows the first mark.
    /// A no-op when a flow is already active; a degenerate container aborts
    /// before anything becomes visible.
    pub fn start(&mut self, now: f64) {
        if self.active {
            warn!("start ignored: a flow is already active");
            return;
        }
        if self.container.is_degenerate() {
            warn!("start aborted: container bounds are degenerate");
            return;
        }
        self.active = true;
        self.stopping = false;
        self.fade_out_done = false;
        self.overlay_ctx = TransitionContext::default();
        self.overlay.set_bounds(self.container.bounds);
        self.overlay.set_alpha(0.0);
        self.overlay.set_interaction_enabled(false);
        self.arm_overlay_fade(FadeDirection::In, now);
    }

    /// Requests the flow be torn down: the current mark (if any) hides and
    /// the overlay fades out concurrently. Idempotent; a no-op when no flow
    /// is active.
    pub fn stop(&mut self, now: f64) {
        if !self.active || self.stopping {
            return;
        }
        self.stopping = true;
        self.overlay.set_interaction_enabled(false);
        match self.presenter.state() {
            PresenterState::Showing | PresenterState::Shown => {
                if let Some(mark) = self.presenter.current_mark().copied() {
                    let hide = self.provider.hide_transition(&mark);
                    self.presenter.request_hide(hide, &mut self.overlay, now);
                }
            }
            // An in-flight hide settles on its own; Idle has nothing to hide.
            PresenterState::Hiding | PresenterState::Idle => {}
        }
        self.arm_overlay_fade(FadeDirection::Out, now);
    }

    /// Routes a tap. A tap resolved as [`TapOutcome::Advance`] while a mark
    /// is fully shown moves the flow forward; anything else is reported back
    /// unchanged for the host to act on (or ignore).
    pub fn handle_tap(&mut self, point: Point, now: f64) -> Option<TapOutcome> {
        if !self.active || self.stopping {
            return None;
        }
        let outcome = self.overlay.tap(point)?;
        if outcome == TapOutcome::Advance && self.presenter.state() == PresenterState::Shown {
            if let Some(mark) = self.presenter.current_mark().copied() {
                let hide = self.provider.hide_transition(&mark);
                self.presenter.request_hide(hide, &mut self.overlay, now);
            }
        }
        Some(outcome)
    }

    /// Updates the container bounds, resizing the overlay and re-placing
    /// the current mark against the new geometry.
    pub fn set_container_bounds(&mut self, bounds: Rect) {
        self.container.bounds = bounds;
        self.overlay.set_bounds(bounds);
        self.presenter.relayout(&self.container, &mut self.overlay);
    }

    /// Advances transitions and performs the sequencing steps at their
    /// settlement points.
    pub fn tick(&mut self, now: f64) -> FlowEvents {
        let mut events = FlowEvents::new();
        if !self.active {
            return events;
        }

        for event in self.presenter.tick(&mut self.overlay, now) {
            match event {
                PresenterEvent::ShowResolved => {
                    if self.presenter.state() == PresenterState::Shown {
                        events.push(FlowEvent::MarkShown);
                    }
                }
                PresenterEvent::HideResolved => {
                    events.push(FlowEvent::MarkHidden);
                    if self.stopping {
                        self.maybe_finish(&mut events);
                    } else {
                        self.advance_to_next_mark(now);
                    }
                }
            }
        }

        self.drive_overlay_fade(now, &mut events);
        events
    }

    fn arm_overlay_fade(&mut self, direction: FadeDirection, now: f64) {
        // Replace any in-flight fade; the envelope keeps the handoff smooth.
        if let Some((mut fade, _)) = self.overlay_fade.take() {
            fade.cancel();
            fade.finish(false);
        }
        let descriptor = match direction {
            FadeDirection::In => TransitionDescriptor::fade_in(),
            FadeDirection::Out => TransitionDescriptor::fade_out(),
        };
        self.overlay_fade = Some((descriptor.arm(now), direction));
    }

    fn drive_overlay_fade(&mut self, now: f64, events: &mut FlowEvents) {
        let Some((fade, direction)) = &mut self.overlay_fade else {
            return;
        };
        let direction = *direction;
        fade.drive(now, &mut self.overlay_ctx);
        self.overlay.set_alpha(self.overlay_ctx.alpha);
        if !fade.is_settled(now) {
            return;
        }
        if let Some((fade, _)) = self.overlay_fade.take() {
            let finished = !fade.is_cancelled();
            fade.finish(finished);
        }
        match direction {
            FadeDirection::In => {
                self.overlay_ctx.alpha = 1.0;
                self.overlay.set_alpha(1.0);
                self.overlay.set_interaction_enabled(true);
                self.advance_to_next_mark(now);
            }
            FadeDirection::Out => {
                self.overlay_ctx.alpha = 0.0;
                self.overlay.set_alpha(0.0);
                self.fade_out_done = true;
                self.maybe_finish(events);
            }
        }
    }

    /// Fetches the next mark and begins showing it; an exhausted provider
    /// (or a mark that cannot be placed) tears the flow down instead.
    fn advance_to_next_mark(&mut self, now: f64) {
        if self.stopping {
            return;
        }
        let Some(mark) = self.provider.next_mark() else {
            self.begin_teardown(now);
            return;
        };
        let resolved = resolve_alignment(
            self.provider.alignment_policy(),
            mark.point_of_interest,
            self.container.bounds,
            self.container.direction,
        );
        if resolved.defaulted {
            debug!("mark carries no point of interest; centering the bubble");
        }
        let mut bubble = self.provider.make_bubble(&mark);
        bubble.set_style(self.provider.bubble_style(&mark));
        let request = ShowRequest {
            alignment: resolved.alignment,
            show: self.provider.show_transition(&mark),
            idle: self.provider.idle_transition(&mark),
            mark,
        };
        if let Err(err) =
            self.presenter
                .begin_show(request, bubble, &mut self.overlay, &self.container, now)
        {
            warn!(%err, "mark cannot be placed; tearing the flow down");
            self.begin_teardown(now);
        }
    }

    /// Arms the ending fade-out. The flow stays active until both the
    /// presenter is idle and the fade has settled.
    fn begin_teardown(&mut self, now: f64) {
        self.stopping = true;
        self.overlay.set_interaction_enabled(false);
        self.overlay.clear_hole();
        self.arm_overlay_fade(FadeDirection::Out, now);
    }

    fn maybe_finish(&mut self, events: &mut FlowEvents) {
        if self.fade_out_done && self.presenter.is_idle() {
            self.active = false;
            self.stopping = false;
            events.push(FlowEvent::Finished);
        }
    }
}

impl<P: MarkProvider + fmt::Debug> fmt::Debug for FlowSequencer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowSequencer")
            .field("provider", &self.provider)
            .field("active", &self.active)
            .field("stopping", &self.stopping)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}
