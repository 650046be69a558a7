// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `waymark_flow` crate.
//!
//! These run whole flows through `FlowSequencer` with a recording bubble,
//! with a focus on the show/hide lifecycle, tap routing, and teardown.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use waymark_flow::{
    Bubble, BubbleStyle, Container, FlowEvent, FlowSequencer, MarkProvider, PresenterState,
};
use waymark_layout::{CoachMark, PeakSide, Region};
use waymark_overlay::TapOutcome;
use waymark_transition::{TransitionDescriptor, TransitionParams};

/// Everything the bubbles of one flow were told, in order.
#[derive(Clone, Default)]
struct BubbleLog {
    inner: Rc<RefCell<LogInner>>,
}

#[derive(Default)]
struct LogInner {
    frames: Vec<Rect>,
    alphas: Vec<f64>,
    peaks: Vec<(PeakSide, f64)>,
    styles: Vec<BubbleStyle>,
    interaction: Vec<bool>,
    dropped: usize,
}

struct TestBubble {
    log: BubbleLog,
    size: Size,
    attached: bool,
}

impl Bubble for TestBubble {
    fn preferred_size(&self, max_width: f64) -> Size {
        Size::new(self.size.width.min(max_width), self.size.height)
    }

    fn set_frame(&mut self, frame: Rect) {
        self.log.inner.borrow_mut().frames.push(frame);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.log.inner.borrow_mut().alphas.push(alpha);
    }

    fn set_peak(&mut self, side: PeakSide, offset: f64) {
        self.log.inner.borrow_mut().peaks.push((side, offset));
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        self.log.inner.borrow_mut().interaction.push(enabled);
    }

    fn set_style(&mut self, style: BubbleStyle) {
        self.log.inner.borrow_mut().styles.push(style);
    }

    fn is_attached_under(&self, _container: Rect) -> bool {
        self.attached
    }
}

impl Drop for TestBubble {
    fn drop(&mut self) {
        self.log.inner.borrow_mut().dropped += 1;
    }
}

struct TestProvider {
    marks: Vec<CoachMark>,
    log: BubbleLog,
    bubbles_made: usize,
    with_idle: bool,
    detached: bool,
}

impl TestProvider {
    fn new(marks: Vec<CoachMark>) -> Self {
        Self {
            marks,
            log: BubbleLog::default(),
            bubbles_made: 0,
            with_idle: false,
            detached: false,
        }
    }
}

impl MarkProvider for TestProvider {
    type Bubble = TestBubble;

    fn next_mark(&mut self) -> Option<CoachMark> {
        if self.marks.is_empty() {
            None
        } else {
            Some(self.marks.remove(0))
        }
    }

    fn make_bubble(&mut self, _mark: &CoachMark) -> TestBubble {
        self.bubbles_made += 1;
        TestBubble {
            log: self.log.clone(),
            size: Size::new(240.0, 60.0),
            attached: !self.detached,
        }
    }

    fn idle_transition(&mut self, _mark: &CoachMark) -> Option<TransitionDescriptor> {
        if !self.with_idle {
            return None;
        }
        let mut descriptor = TransitionDescriptor::new(TransitionParams {
            duration: 0.2,
            ..TransitionParams::default()
        });
        descriptor.animation = Some(Box::new(|ctx| {
            ctx.offset = Vec2::new(0.0, -4.0 * ctx.progress);
        }));
        Some(descriptor)
    }
}

fn mark_at(x: f64, y: f64) -> CoachMark {
    CoachMark::for_cutout(Region::around(Rect::new(x, y, x + 80.0, y + 30.0)))
}

fn container() -> Container {
    Container::new(Rect::new(0.0, 0.0, 390.0, 844.0))
}

/// Runs all ticks of one shown mark: the show settling, a tap on the dimmed
/// backdrop, and the hide settling. Returns the time after the hide.
fn show_then_tap_through(flow: &mut FlowSequencer<TestProvider>, start: f64) -> f64 {
    let events = flow.tick(start + 0.4);
    assert!(events.contains(&FlowEvent::MarkShown), "at t={}", start + 0.4);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);
    assert!(!flow.overlay().is_hole_empty());

    let outcome = flow.handle_tap(Point::new(350.0, 800.0), start + 0.5);
    assert_eq!(outcome, Some(TapOutcome::Advance));
    assert_eq!(flow.presenter_state(), PresenterState::Hiding);

    let events = flow.tick(start + 0.9);
    assert!(events.contains(&FlowEvent::MarkHidden), "at t={}", start + 0.9);
    // The overlay stays up between marks; it fades only at the flow's ends.
    assert_eq!(flow.overlay().alpha(), 1.0);
    start + 0.9
}

#[test]
fn three_mark_flow_runs_each_mark_through_the_full_cycle() {
    let provider = TestProvider::new(vec![
        mark_at(40.0, 100.0),
        mark_at(150.0, 400.0),
        mark_at(250.0, 700.0),
    ]);
    let log = provider.log.clone();
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    assert!(flow.is_active());
    assert_eq!(flow.presenter_state(), PresenterState::Idle);

    // The overlay fade-in settles, then each mark hides before the next
    // shows; the hide settlement itself starts the next show.
    flow.tick(0.4);
    assert_eq!(flow.overlay().alpha(), 1.0);
    assert_eq!(flow.presenter_state(), PresenterState::Showing);

    let t = show_then_tap_through(&mut flow, 0.4);
    let t = show_then_tap_through(&mut flow, t);
    let t = show_then_tap_through(&mut flow, t);

    // Provider exhausted: the overlay fades out once and the flow ends.
    assert!(flow.is_active());
    let events = flow.tick(t + 0.4);
    assert!(events.contains(&FlowEvent::Finished));
    assert!(!flow.is_active());
    assert_eq!(flow.overlay().alpha(), 0.0);
    assert!(flow.overlay().is_hole_empty());

    assert_eq!(flow.provider().bubbles_made, 3);
    let log = log.inner.borrow();
    assert_eq!(log.dropped, 3, "each bubble is released at hide");
    assert_eq!(log.peaks.len(), 3, "each bubble is pointed once at placement");
    assert!(
        log.peaks.iter().all(|(side, _)| *side == PeakSide::Top),
        "default marks peak from the top"
    );
    assert_eq!(log.alphas.last(), Some(&0.0), "bubbles leave transparent");
    assert_eq!(
        log.styles,
        vec![BubbleStyle::default(); 3],
        "each bubble is styled once before placement"
    );
}

#[test]
fn interaction_is_disabled_through_transitions_and_enabled_while_shown() {
    let provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    let log = provider.log.clone();
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    // During the show transition taps go nowhere.
    assert_eq!(flow.handle_tap(Point::new(200.0, 700.0), 0.5), None);

    flow.tick(0.8);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);

    // Disabled at begin-show, enabled at shown; disabled again at the tap.
    flow.handle_tap(Point::new(200.0, 700.0), 0.9);
    assert_eq!(log.inner.borrow().interaction, vec![false, true, false]);
}

#[test]
fn start_with_degenerate_container_is_inert() {
    let provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    let mut flow = FlowSequencer::new(provider, Container::new(Rect::ZERO));

    flow.start(0.0);
    assert!(!flow.is_active());
    assert!(flow.tick(1.0).is_empty());
    assert_eq!(flow.provider().bubbles_made, 0);
}

#[test]
fn start_while_active_is_a_no_op() {
    let provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);

    flow.start(1.0);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);
    assert!(flow.is_active());
}

#[test]
fn stop_while_shown_hides_the_mark_and_fades_the_overlay_out() {
    let provider = TestProvider::new(vec![mark_at(40.0, 100.0), mark_at(150.0, 400.0)]);
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);

    flow.stop(1.0);
    assert!(flow.is_active(), "teardown is still in flight");
    assert_eq!(flow.presenter_state(), PresenterState::Hiding);

    let events = flow.tick(1.4);
    assert!(events.contains(&FlowEvent::MarkHidden));
    assert!(events.contains(&FlowEvent::Finished));
    assert!(!flow.is_active());
    assert_eq!(flow.overlay().alpha(), 0.0);
    assert!(flow.overlay().is_hole_empty());

    // The second mark was never fetched.
    assert_eq!(flow.provider().marks.len(), 1);
    assert_eq!(flow.provider().bubbles_made, 1);
}

#[test]
fn stop_while_showing_short_circuits_the_show_into_the_hide() {
    let provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    assert_eq!(flow.presenter_state(), PresenterState::Showing);

    flow.stop(0.5);
    // The interrupted show settles early and the queued hide starts.
    let events = flow.tick(0.6);
    assert!(events.is_empty(), "a cut-short show never reports MarkShown");
    assert_eq!(flow.presenter_state(), PresenterState::Hiding);

    let events = flow.tick(1.0);
    assert!(events.contains(&FlowEvent::MarkHidden));
    assert!(events.contains(&FlowEvent::Finished));
    assert!(!flow.is_active());
}

#[test]
fn stop_is_idempotent() {
    let provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    let mut flow = FlowSequencer::new(provider, container());

    flow.stop(0.0);
    assert!(!flow.is_active());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    flow.stop(1.0);
    flow.stop(1.1);
    let events = flow.tick(1.4);
    assert_eq!(
        events.iter().filter(|e| **e == FlowEvent::Finished).count(),
        1
    );
}

#[test]
fn tap_inside_an_interactive_cutout_is_forwarded_not_advanced() {
    let mut mark = mark_at(40.0, 100.0);
    mark.interaction_inside_cutout = true;
    let provider = TestProvider::new(vec![mark]);
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);

    // Inside the cutout: forwarded to the highlighted element.
    let outcome = flow.handle_tap(Point::new(80.0, 115.0), 0.9);
    assert_eq!(outcome, Some(TapOutcome::Forwarded));
    assert_eq!(flow.presenter_state(), PresenterState::Shown);

    // Outside the container entirely: nothing.
    assert_eq!(flow.handle_tap(Point::new(-10.0, -10.0), 0.9), None);

    // On the dimmed backdrop: advances.
    let outcome = flow.handle_tap(Point::new(350.0, 800.0), 1.0);
    assert_eq!(outcome, Some(TapOutcome::Advance));
}

#[test]
fn mark_without_cutout_leaves_the_overlay_unbroken() {
    let provider = TestProvider::new(vec![CoachMark::new()]);
    let log = provider.log.clone();
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);
    assert!(flow.overlay().is_hole_empty());

    // The bubble is centered vertically in the container.
    let frame = *log.inner.borrow().frames.first().expect("bubble was placed");
    assert!((frame.center().y - 422.0).abs() < 1e-9);
}

#[test]
fn unplaceable_mark_tears_the_flow_down() {
    // A horizontal margin wider than the container leaves no room at all.
    let mut bad = mark_at(40.0, 100.0);
    bad.horizontal_margin = 400.0;
    let provider = TestProvider::new(vec![bad, mark_at(150.0, 400.0)]);
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    let events = flow.tick(0.4);
    assert!(events.is_empty());
    assert_eq!(flow.presenter_state(), PresenterState::Idle);

    let events = flow.tick(0.8);
    assert!(events.contains(&FlowEvent::Finished));
    assert!(!flow.is_active());
    assert_eq!(flow.provider().marks.len(), 1, "the flow never reached the second mark");
}

#[test]
fn container_bounds_change_replaces_the_live_mark() {
    let provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    let log = provider.log.clone();
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    let placed = *log.inner.borrow().frames.last().expect("bubble was placed");

    flow.set_container_bounds(Rect::new(0.0, 0.0, 844.0, 390.0));
    let replaced = *log.inner.borrow().frames.last().expect("bubble was re-placed");
    assert_ne!(placed, replaced);
}

#[test]
fn detached_bubble_skips_placement_but_the_presentation_continues() {
    let mut provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    provider.detached = true;
    let log = provider.log.clone();
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    let events = flow.tick(0.8);
    assert!(events.contains(&FlowEvent::MarkShown));
    assert!(log.inner.borrow().frames.is_empty(), "no frame is imposed");
    assert!(!flow.overlay().is_hole_empty(), "the cutout still opens");
}

#[test]
fn hide_restores_the_frame_the_idle_loop_displaced() {
    let mut provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    provider.with_idle = true;
    let log = provider.log.clone();
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    let placed = *log.inner.borrow().frames.first().expect("bubble was placed");

    // The idle loop pushes the bubble off its laid-out frame.
    flow.tick(0.9);
    let displaced = *log.inner.borrow().frames.last().expect("idle moved the bubble");
    assert_ne!(placed.origin().y, displaced.origin().y);

    // Hiding drops the decorative offset: the bubble fades out in place.
    flow.handle_tap(Point::new(350.0, 800.0), 0.95);
    assert_eq!(flow.presenter_state(), PresenterState::Hiding);
    flow.tick(1.0);
    let hiding = *log.inner.borrow().frames.last().expect("hide re-applied the frame");
    assert_eq!(hiding, placed);
}

#[test]
fn idle_animation_loops_while_shown() {
    let mut provider = TestProvider::new(vec![mark_at(40.0, 100.0)]);
    provider.with_idle = true;
    let log = provider.log.clone();
    let mut flow = FlowSequencer::new(provider, container());

    flow.start(0.0);
    flow.tick(0.4);
    flow.tick(0.8);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);

    let before = log.inner.borrow().frames.len();
    flow.tick(0.9);
    flow.tick(1.15); // past one pass; the idle re-arms and keeps going
    flow.tick(1.25);
    let frames = log.inner.borrow().frames.clone();
    assert!(frames.len() >= before + 3, "the idle loop keeps moving the bubble");
    let last = frames[frames.len() - 1];
    let prev = frames[frames.len() - 2];
    assert_ne!(last.origin().y, prev.origin().y);
    assert_eq!(flow.presenter_state(), PresenterState::Shown);
}
