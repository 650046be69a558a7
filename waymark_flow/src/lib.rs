// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Flow: the coach mark sequencer and its presentation state machine.
//!
//! This crate ties the geometry and timing crates of Waymark together into a
//! runnable flow: a [`FlowSequencer`] walks the marks a [`MarkProvider`]
//! hands out one at a time, presenting each over a shared
//! [`waymark_overlay::Overlay`] through a [`Presenter`] that owns the
//! `Idle → Showing → Shown → Hiding` lifecycle.
//!
//! ## Design Philosophy
//!
//! Everything here is headless and poll-driven:
//!
//! - **No clock**: the host passes `now` (seconds, any monotonic origin) to
//!   every time-sensitive call and ticks once per frame
//! - **No rendering**: bubbles are opaque handles behind the [`Bubble`]
//!   trait; the sequencer tells them where to sit and how visible to be,
//!   and the host draws them however it likes
//! - **No threads**: all sequencing happens inside [`FlowSequencer::tick`],
//!   at the settlement points of the transitions in flight
//!
//! The provider is pulled lazily, one mark per advance, so providers can
//! compute marks against the live UI at the moment they are needed.
//!
//! ## Running a Flow
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use waymark_flow::{Bubble, Container, FlowEvent, FlowSequencer, MarkProvider};
//! use waymark_layout::{CoachMark, PeakSide, Region};
//!
//! struct Label;
//!
//! impl Bubble for Label {
//!     fn preferred_size(&self, max_width: f64) -> Size {
//!         Size::new(max_width.min(200.0), 44.0)
//!     }
//!     fn set_frame(&mut self, _frame: Rect) {}
//!     fn set_alpha(&mut self, _alpha: f64) {}
//!     fn set_peak(&mut self, _side: PeakSide, _offset: f64) {}
//!     fn set_interaction_enabled(&mut self, _enabled: bool) {}
//! }
//!
//! struct Tour(Vec<CoachMark>);
//!
//! impl MarkProvider for Tour {
//!     type Bubble = Label;
//!     fn next_mark(&mut self) -> Option<CoachMark> {
//!         if self.0.is_empty() { None } else { Some(self.0.remove(0)) }
//!     }
//!     fn make_bubble(&mut self, _mark: &CoachMark) -> Label {
//!         Label
//!     }
//! }
//!
//! let target = Region::around(Rect::new(40.0, 100.0, 120.0, 132.0));
//! let tour = Tour(vec![CoachMark::for_cutout(target)]);
//! let container = Container::new(Rect::new(0.0, 0.0, 390.0, 844.0));
//! let mut flow = FlowSequencer::new(tour, container);
//!
//! flow.start(0.0);
//! flow.tick(0.4); // overlay fade-in settles; the mark starts showing
//! let events = flow.tick(0.8); // show transition settles
//! assert!(events.contains(&FlowEvent::MarkShown));
//!
//! // A tap on the dimmed overlay advances the flow.
//! flow.handle_tap(Point::new(200.0, 700.0), 0.9);
//! flow.tick(1.3); // hide settles; the provider is exhausted, teardown begins
//! let events = flow.tick(1.7); // overlay fade-out settles
//! assert!(events.contains(&FlowEvent::Finished));
//! assert!(!flow.is_active());
//! ```
//!
//! ## Integration with Waymark
//!
//! - `waymark_layout` computes where each bubble sits and which way its
//!   peak points
//! - `waymark_overlay` models the dimmed backdrop, the cutout hole, and
//!   tap routing
//! - `waymark_transition` supplies the armed, poll-driven show, hide, and
//!   idle animations
//!
//! This crate requires `std`; the geometry and timing crates underneath it
//! are `no_std` compatible.

mod provider;
mod sequencer;
mod session;

pub use provider::{Bubble, BubbleStyle, Container, MarkProvider};
pub use sequencer::{FlowEvent, FlowEvents, FlowSequencer};
pub use session::{Presenter, PresenterEvent, PresenterEvents, PresenterState, ShowRequest};
