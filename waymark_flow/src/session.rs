// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The presentation state machine: `Idle → Showing → Shown → Hiding → Idle`
//! for a single coach mark, with at most one live session at any time.

use core::fmt;

use kurbo::{Rect, Size, Vec2};
use smallvec::SmallVec;
use tracing::warn;
use waymark_layout::{compute_placement, CoachMark, HorizontalAlignment, LayoutError, LayoutResult};
use waymark_overlay::Overlay;
use waymark_transition::{Transition, TransitionContext, TransitionDescriptor};

use crate::provider::{Bubble, Container};

/// Lifecycle stage of a live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionStage {
    Showing,
    Shown,
    Hiding,
}

/// Observable state of the presenter, including the between-marks `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PresenterState {
    /// No session exists; both the initial and the terminal state.
    #[default]
    Idle,
    /// A show transition is in flight.
    Showing,
    /// Fully shown, idling until an advance or hide request.
    Shown,
    /// A hide transition is in flight.
    Hiding,
}

/// What the presenter resolved during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenterEvent {
    /// The show transition settled; the mark is now fully shown (or was
    /// short-circuited into a queued hide).
    ShowResolved,
    /// The hide transition settled; the bubble was released and the cutout
    /// cleared. The presenter is `Idle` again.
    HideResolved,
}

/// Event buffer returned by [`Presenter::tick`].
pub type PresenterEvents = SmallVec<[PresenterEvent; 2]>;

/// Everything one presentation needs from the provider, gathered up front.
#[derive(Debug)]
pub struct ShowRequest {
    /// The mark to present.
    pub mark: CoachMark,
    /// Resolved horizontal alignment for its bubble.
    pub alignment: HorizontalAlignment,
    /// The armed-on-demand show transition.
    pub show: TransitionDescriptor,
    /// Optional idle loop, armed once the show settles.
    pub idle: Option<TransitionDescriptor>,
}

/// The live, at-most-one record binding a coach mark, its bubble instance,
/// and the transition currently driving it.
struct PresentationSession<B> {
    mark: CoachMark,
    alignment: HorizontalAlignment,
    /// Resolved frame; `None` when placement was skipped over a hierarchy
    /// mismatch and the bubble keeps its own frame.
    frame: Option<Rect>,
    bubble: B,
    stage: SessionStage,
    /// The show or hide transition in flight; `None` while `Shown`.
    transition: Option<Transition>,
    /// Armed idle loop while `Shown`.
    idle: Option<Transition>,
    /// Idle descriptor waiting for the show transition to settle.
    idle_descriptor: Option<TransitionDescriptor>,
    /// Hide requested while the show was still in flight.
    pending_hide: Option<TransitionDescriptor>,
    /// Persistent visual state carried across polls.
    ctx: TransitionContext,
}

impl<B: Bubble> PresentationSession<B> {
    /// The frame to pin the bubble at. A mark flagged to display over its
    /// cutout recenters vertically on the cutout instead of standing clear.
    fn resolved_frame(&self, layout: &LayoutResult, size: Size) -> Rect {
        let frame = layout.frame(size);
        match self.mark.cutout {
            Some(cutout) if self.mark.display_over_cutout => {
                let y0 = cutout.rect.center().y - 0.5 * frame.height();
                Rect::new(frame.min_x(), y0, frame.max_x(), y0 + frame.height())
            }
            _ => frame,
        }
    }

    /// Applies the transition context to the bubble handle.
    fn apply_context(&mut self) {
        self.bubble.set_alpha(self.ctx.alpha);
        if let Some(frame) = self.frame {
            self.bubble.set_frame(frame + self.ctx.offset);
        }
    }

    /// Cancels the idle loop, disables interaction, and arms the hide.
    fn start_hide(&mut self, descriptor: TransitionDescriptor, overlay: &mut Overlay, now: f64) {
        if let Some(mut idle) = self.idle.take() {
            idle.cancel();
            idle.finish(false);
        }
        // Drop any decorative displacement so the bubble hides in place.
        self.ctx.offset = Vec2::ZERO;
        overlay.set_interaction_enabled(false);
        self.bubble.set_interaction_enabled(false);
        self.transition = Some(descriptor.arm(now));
        self.stage = SessionStage::Hiding;
    }
}

impl<B> fmt::Debug for PresentationSession<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationSession")
            .field("mark", &self.mark)
            .field("alignment", &self.alignment)
            .field("frame", &self.frame)
            .field("stage", &self.stage)
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

/// Drives the show → idle → hide lifecycle of one coach mark at a time.
///
/// All operations are cooperative and clock-free: the owner passes `now`
/// (seconds) and calls [`Presenter::tick`] once per frame. Transitions are
/// never aborted mid-flight; cancellation is observed at settlement, which
/// is the only point where state advances.
#[derive(Debug, Default)]
pub struct Presenter<B> {
    session: Option<PresentationSession<B>>,
}

impl<B: Bubble> Presenter<B> {
    /// A presenter with no live session.
    #[must_use]
    pub fn new() -> Self {
        Self { session: None }
    }

    /// The observable state.
    #[must_use]
    pub fn state(&self) -> PresenterState {
        match &self.session {
            None => PresenterState::Idle,
            Some(session) => match session.stage {
                SessionStage::Showing => PresenterState::Showing,
                SessionStage::Shown => PresenterState::Shown,
                SessionStage::Hiding => PresenterState::Hiding,
            },
        }
    }

    /// Whether no session exists.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// The mark currently presented, if any.
    #[must_use]
    pub fn current_mark(&self) -> Option<&CoachMark> {
        self.session.as_ref().map(|s| &s.mark)
    }

    /// Starts showing a mark. Valid only from `Idle`; calling it with a
    /// live session is a programming error (debug assertion, defensive
    /// no-op in release builds).
    ///
    /// On success the session is `Showing`: interaction is disabled, the
    /// cutout written, the bubble placed at alpha zero, and the show
    /// transition armed. On a layout failure the presenter stays `Idle` and
    /// the error is returned for the caller to surface.
    pub fn begin_show(
        &mut self,
        request: ShowRequest,
        bubble: B,
        overlay: &mut Overlay,
        container: &Container,
        now: f64,
    ) -> Result<(), LayoutError> {
        if self.session.is_some() {
            debug_assert!(false, "begin_show while a session is live");
            warn!("begin_show ignored: a presentation session is already live");
            return Ok(());
        }

        let ShowRequest {
            mark,
            alignment,
            show,
            idle,
        } = request;
        let layout = compute_placement(&mark, container.bounds, container.direction, alignment)?;

        let mut session = PresentationSession {
            mark,
            alignment,
            frame: None,
            bubble,
            stage: SessionStage::Showing,
            transition: None,
            idle: None,
            idle_descriptor: idle,
            pending_hide: None,
            ctx: TransitionContext::default(),
        };

        overlay.set_interaction_enabled(false);
        session.bubble.set_interaction_enabled(false);
        overlay.set_interaction_enabled_inside_hole(session.mark.interaction_inside_cutout);
        overlay.set_hole(session.mark.cutout);

        if session.bubble.is_attached_under(container.bounds) {
            let size = session.bubble.preferred_size(layout.max_width());
            let frame = session.resolved_frame(&layout, size);
            session.bubble.set_frame(frame);
            session
                .bubble
                .set_peak(
                    layout.peak_side(),
                    layout.peak_offset(frame, session.mark.point_of_interest),
                );
            session.frame = Some(frame);
        } else {
            // No-op placement: the bubble keeps its own frame.
            warn!(err = %LayoutError::InvalidHierarchy, "skipping placement");
        }

        session.ctx.alpha = 0.0;
        session.bubble.set_alpha(0.0);
        session.transition = Some(show.arm(now));
        self.session = Some(session);
        Ok(())
    }

    /// Requests the current mark be hidden. Valid from `Showing` (the show
    /// is short-circuited and the hide queued behind its settlement) and
    /// `Shown`; anything else is a defensive no-op.
    pub fn request_hide(&mut self, descriptor: TransitionDescriptor, overlay: &mut Overlay, now: f64) {
        let Some(session) = &mut self.session else {
            debug_assert!(false, "request_hide without a session");
            warn!("request_hide ignored: no presentation session is live");
            return;
        };
        match session.stage {
            SessionStage::Showing => {
                // Let the in-flight show settle (its completion must fire),
                // but cut it short and queue the hide behind it.
                if let Some(show) = &mut session.transition {
                    show.cancel();
                }
                session.pending_hide = Some(descriptor);
            }
            SessionStage::Shown => session.start_hide(descriptor, overlay, now),
            SessionStage::Hiding => {
                debug_assert!(false, "request_hide while already hiding");
            }
        }
    }

    /// Recomputes placement for the live session after a container bounds
    /// change. Never creates a session; a degenerate container leaves the
    /// last placement in effect.
    pub fn relayout(&mut self, container: &Container, overlay: &mut Overlay) {
        let Some(session) = &mut self.session else {
            return;
        };
        overlay.set_hole(session.mark.cutout);
        match compute_placement(
            &session.mark,
            container.bounds,
            container.direction,
            session.alignment,
        ) {
            Ok(layout) => {
                if !session.bubble.is_attached_under(container.bounds) {
                    warn!(err = %LayoutError::InvalidHierarchy, "skipping relayout");
                    return;
                }
                let size = session.bubble.preferred_size(layout.max_width());
                let frame = session.resolved_frame(&layout, size);
                session.frame = Some(frame);
                session.bubble.set_frame(frame + session.ctx.offset);
                session.bubble.set_peak(
                    layout.peak_side(),
                    layout.peak_offset(frame, session.mark.point_of_interest),
                );
            }
            Err(err) => warn!(%err, "keeping the previous placement"),
        }
    }

    /// Advances whatever transition is in flight and performs the state
    /// steps at settlement.
    pub fn tick(&mut self, overlay: &mut Overlay, now: f64) -> PresenterEvents {
        let mut events = PresenterEvents::new();
        let Some(session) = &mut self.session else {
            return events;
        };

        match session.stage {
            SessionStage::Showing => {
                let Some(show) = &mut session.transition else {
                    debug_assert!(false, "showing session without a transition");
                    return events;
                };
                show.drive(now, &mut session.ctx);
                let settled = show.is_settled(now);
                session.apply_context();
                if !settled {
                    return events;
                }

                let mut finished = true;
                if let Some(show) = session.transition.take() {
                    finished = !show.is_cancelled();
                    show.finish(finished);
                }
                if finished {
                    session.ctx.alpha = 1.0;
                    session.bubble.set_alpha(1.0);
                }
                events.push(PresenterEvent::ShowResolved);

                if let Some(hide) = session.pending_hide.take() {
                    // Straight into the hide; idle arming is suppressed.
                    session.idle_descriptor = None;
                    session.start_hide(hide, overlay, now);
                } else {
                    session.stage = SessionStage::Shown;
                    session.idle = session.idle_descriptor.take().map(|d| d.arm(now));
                    overlay.set_interaction_enabled(true);
                    session.bubble.set_interaction_enabled(true);
                }
            }
            SessionStage::Shown => {
                if let Some(idle) = &mut session.idle {
                    idle.drive(now, &mut session.ctx);
                    // Decorative only: the idle loop never touches the
                    // cutout or the laid-out frame, just alpha and offset.
                    if idle.is_settled(now) && !idle.is_cancelled() {
                        idle.rearm(now);
                    }
                    session.apply_context();
                }
            }
            SessionStage::Hiding => {
                let Some(hide) = &mut session.transition else {
                    debug_assert!(false, "hiding session without a transition");
                    return events;
                };
                hide.drive(now, &mut session.ctx);
                let settled = hide.is_settled(now);
                session.apply_context();
                if !settled {
                    return events;
                }

                session.bubble.set_alpha(0.0);
                if let Some(hide) = session.transition.take() {
                    let finished = !hide.is_cancelled();
                    hide.finish(finished);
                }
                // Release the bubble instance and clear the cutout; the
                // session must never be referenced again.
                self.session = None;
                overlay.clear_hole();
                overlay.set_interaction_enabled_inside_hole(false);
                events.push(PresenterEvent::HideResolved);
            }
        }
        events
    }
}
