// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Layout: headless coach-mark placement.
//!
//! A coach mark highlights a region of the screen (the *cutout*) and pairs it
//! with an explanatory bubble. This crate owns the geometry half of that
//! problem: given a [`CoachMark`] descriptor, the container bounds, and a
//! horizontal alignment, it decides where the bubble sits — above or below
//! the cutout, pinned leading/trailing or centered over the point of
//! interest, clamped to the container's safe margins.
//!
//! It does **not** draw anything and does not own the overlay or the flow;
//! those live in `waymark_overlay` and `waymark_flow`. Callers are expected
//! to:
//! - Build a [`CoachMark`] per highlight step (usually via [`Region::around`]
//!   for the cutout).
//! - Resolve the horizontal alignment with [`resolve_alignment`], or pick one
//!   explicitly.
//! - Call [`compute_placement`] and resolve a concrete bubble frame with
//!   [`LayoutResult::frame`] once the bubble's preferred size is known.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use waymark_layout::{
//!     compute_placement, CoachMark, HorizontalAlignment, LayoutDirection, Region,
//! };
//!
//! let container = Rect::new(0.0, 0.0, 320.0, 568.0);
//! let mut mark = CoachMark::for_cutout(Region::around(Rect::new(10.0, 10.0, 60.0, 60.0)));
//! mark.point_of_interest = Some(Point::new(35.0, 35.0));
//!
//! let layout = compute_placement(
//!     &mark,
//!     container,
//!     LayoutDirection::LeftToRight,
//!     HorizontalAlignment::Centered,
//! )
//! .unwrap();
//!
//! // The bubble sits below the cutout, separated by the configured gap.
//! let frame = layout.frame(Size::new(200.0, 80.0));
//! assert!(frame.min_y() >= mark.cutout.unwrap().rect.max_y());
//! ```
//!
//! ## Design notes
//!
//! - Placement is a pure function of its inputs; [`LayoutResult`] is
//!   ephemeral and is recomputed whenever the container bounds change.
//! - Only two vertical slots exist — above or below the cutout. The
//!   [`PeakSide`] communicates the bubble's visual peak direction;
//!   `PeakSide::Bottom` is the single side that places the bubble above.
//! - Right-to-left layouts mirror leading/trailing placement exactly.
//!
//! This crate is `no_std`.

#![no_std]

mod align;
mod engine;
mod mark;

pub use align::{resolve_alignment, AlignmentPolicy, HorizontalAlignment, LayoutDirection, ResolvedAlignment};
pub use engine::{
    compute_placement, HorizontalAnchor, LayoutError, LayoutResult, VerticalAnchor,
};
pub use mark::{CoachMark, PeakSide, Region};
