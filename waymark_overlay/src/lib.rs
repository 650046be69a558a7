// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Overlay: the dimming surface with a hole in it.
//!
//! An [`Overlay`] models a layer that is opaque everywhere within its bounds
//! *except* a single cutout hole — conceptually `bounds \ hole`, not a clip
//! of the hole itself. The crate is headless: it answers geometric and
//! routing questions and leaves pixels to the host.
//!
//! Responsibilities:
//! - Track the current hole ([`Overlay::set_hole`] / [`Overlay::clear_hole`])
//!   and expose the inverse region as dimmed strips for rendering
//!   ([`Overlay::dimmed_frames`]).
//! - Classify pointer events: taps inside an interaction-enabled hole are
//!   forwarded to whatever sits beneath; everything else on the overlay is
//!   captured and reported as an advance request ([`Overlay::tap`]).
//! - Carry the overlay's presented alpha, written by the flow sequencer's
//!   fade transitions.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use waymark_layout::Region;
//! use waymark_overlay::{Overlay, TapOutcome};
//!
//! let mut overlay = Overlay::new(Rect::new(0.0, 0.0, 320.0, 568.0));
//! overlay.set_hole(Some(Region::around(Rect::new(10.0, 10.0, 60.0, 60.0))));
//! overlay.set_interaction_enabled(true);
//!
//! // A tap on the dimmed area advances the flow.
//! assert_eq!(overlay.tap(Point::new(200.0, 400.0)), Some(TapOutcome::Advance));
//! // A tap inside the hole is captured too, until forwarding is enabled.
//! assert_eq!(overlay.tap(Point::new(35.0, 35.0)), Some(TapOutcome::Advance));
//! overlay.set_interaction_enabled_inside_hole(true);
//! assert_eq!(overlay.tap(Point::new(35.0, 35.0)), Some(TapOutcome::Forwarded));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use waymark_layout::Region;

/// What a point on the overlay maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// Outside the overlay bounds entirely.
    Outside,
    /// On the dimmed surface.
    Overlay,
    /// Inside the cutout hole.
    Hole,
}

/// How a single tap on the overlay was routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// Captured by the overlay; the flow should advance.
    Advance,
    /// Landed inside an interaction-enabled hole and was forwarded to
    /// whatever sits beneath the overlay.
    Forwarded,
}

/// The dimming overlay: opaque everywhere in its bounds except the hole.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    bounds: Rect,
    hole: Option<Region>,
    interaction_enabled: bool,
    interaction_enabled_inside_hole: bool,
    alpha: f64,
}

impl Overlay {
    /// Creates a fully transparent overlay covering `bounds`, with no hole
    /// and interaction disabled.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            hole: None,
            interaction_enabled: false,
            interaction_enabled_inside_hole: false,
            alpha: 0.0,
        }
    }

    /// The overlay's bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Records new bounds. The hole is left as-is; relaying out the current
    /// coach mark is the flow's job.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// The current hole, if any.
    #[must_use]
    pub fn hole(&self) -> Option<Region> {
        self.hole
    }

    /// Replaces the hole. `None` makes the overlay fully opaque.
    pub fn set_hole(&mut self, hole: Option<Region>) {
        self.hole = hole;
    }

    /// Removes the hole.
    pub fn clear_hole(&mut self) {
        self.hole = None;
    }

    /// Whether the overlay currently has no usable hole (none set, zero
    /// area, or entirely outside the bounds).
    #[must_use]
    pub fn is_hole_empty(&self) -> bool {
        match self.hole {
            None => true,
            Some(hole) => {
                if hole.is_empty() {
                    return true;
                }
                let visible = hole.rect.intersect(self.bounds);
                visible.width() <= 0.0 || visible.height() <= 0.0
            }
        }
    }

    /// Whether taps on the dimmed surface are currently consumed.
    #[must_use]
    pub fn is_interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// Enables or disables tap handling on the dimmed surface.
    pub fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    /// Whether events inside the hole are forwarded beneath the overlay.
    #[must_use]
    pub fn is_interaction_enabled_inside_hole(&self) -> bool {
        self.interaction_enabled_inside_hole
    }

    /// Enables or disables touch forwarding inside the hole. Toggled per
    /// session from the active coach mark's flag.
    pub fn set_interaction_enabled_inside_hole(&mut self, enabled: bool) {
        self.interaction_enabled_inside_hole = enabled;
    }

    /// The overlay's presented alpha, in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Writes the presented alpha, clamped to `[0, 1]`. Driven by the flow
    /// sequencer's show/hide fades.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// The inverse region `bounds \ hole`, as up to four dimmed strips:
    /// above, below, leading of, and trailing of the hole's bounding rect.
    ///
    /// With no usable hole the single strip is the full bounds. Rounded hole
    /// corners are a rendering detail; the strips use the hole's bounding
    /// rect and renderers draw the corner fills themselves.
    #[must_use]
    pub fn dimmed_frames(&self) -> SmallVec<[Rect; 4]> {
        let mut frames = SmallVec::new();
        let hole = match self.hole {
            Some(hole) if !self.is_hole_empty() => hole.rect.intersect(self.bounds),
            _ => {
                if self.bounds.width() > 0.0 && self.bounds.height() > 0.0 {
                    frames.push(self.bounds);
                }
                return frames;
            }
        };

        let b = self.bounds;
        let top = Rect::new(b.min_x(), b.min_y(), b.max_x(), hole.min_y());
        let bottom = Rect::new(b.min_x(), hole.max_y(), b.max_x(), b.max_y());
        let left = Rect::new(b.min_x(), hole.min_y(), hole.min_x(), hole.max_y());
        let right = Rect::new(hole.max_x(), hole.min_y(), b.max_x(), hole.max_y());
        for strip in [top, bottom, left, right] {
            if strip.width() > 0.0 && strip.height() > 0.0 {
                frames.push(strip);
            }
        }
        frames
    }

    /// Maps a point to the surface it lands on, honoring the hole's rounded
    /// corners.
    #[must_use]
    pub fn hit(&self, point: Point) -> HitTarget {
        if !self.bounds.contains(point) {
            return HitTarget::Outside;
        }
        match self.hole {
            Some(hole) if hole.contains(point) => HitTarget::Hole,
            _ => HitTarget::Overlay,
        }
    }

    /// Classifies a single tap.
    ///
    /// Returns `None` while interaction is disabled or when the tap misses
    /// the overlay. A tap inside the hole is forwarded beneath only while
    /// [`Overlay::set_interaction_enabled_inside_hole`] allows it; every
    /// other tap on the overlay is captured as an advance request.
    #[must_use]
    pub fn tap(&self, point: Point) -> Option<TapOutcome> {
        if !self.interaction_enabled {
            return None;
        }
        match self.hit(point) {
            HitTarget::Outside => None,
            HitTarget::Hole if self.interaction_enabled_inside_hole => {
                Some(TapOutcome::Forwarded)
            }
            HitTarget::Hole | HitTarget::Overlay => Some(TapOutcome::Advance),
        }
    }
}
