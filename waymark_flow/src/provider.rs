// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator seams: the mark provider, the bubble handle, and the
//! container attachment.

use kurbo::{Rect, Size};
use waymark_layout::{AlignmentPolicy, CoachMark, LayoutDirection, PeakSide};
use waymark_transition::TransitionDescriptor;

/// The surface the flow is attached to: its bounds and reading direction.
///
/// Hosts report bounds changes through
/// [`FlowSequencer::set_container_bounds`](crate::FlowSequencer::set_container_bounds),
/// which relays out the currently shown mark without starting a new session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Container {
    /// Bounds of the attachment surface.
    pub bounds: Rect,
    /// Reading direction; mirrors leading/trailing placement.
    pub direction: LayoutDirection,
}

impl Container {
    /// A left-to-right container over the given bounds.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            direction: LayoutDirection::LeftToRight,
        }
    }

    /// Whether the container cannot host a presentation at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0
    }
}

/// The stock purple of the bubble chrome, as linear RGBA in `[0, 1]`.
const ACCENT: [f64; 4] = [88.0 / 255.0, 64.0 / 255.0, 187.0 / 255.0, 1.0];

/// Visual parameters for drawing a bubble.
///
/// The flow never draws. These are plain data handed to the bubble handle
/// before placement so hosts can render the chrome per mark instead of
/// hard-coding it. Colors are linear RGBA components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleStyle {
    /// Width of the border stroke.
    pub line_width: f64,
    /// Radius of the bubble's rounded corners.
    pub corner_radius: f64,
    /// Border color.
    pub stroke_color: [f64; 4],
    /// Interior color.
    pub fill_color: [f64; 4],
    /// Width of the peak at its base.
    pub peak_width: f64,
    /// How far the peak protrudes from the bubble's edge.
    pub peak_height: f64,
}

impl Default for BubbleStyle {
    fn default() -> Self {
        Self {
            line_width: 4.0,
            corner_radius: 8.0,
            stroke_color: ACCENT,
            fill_color: ACCENT,
            peak_width: 10.0,
            peak_height: 10.0,
        }
    }
}

/// Opaque handle to one rendered bubble instance.
///
/// The flow writes the decided geometry and visual state through this trait
/// and never looks inside; drawing the bubble shape, text, and close button
/// is the host's business. A handle is created per presentation and dropped
/// when its hide transition resolves.
pub trait Bubble {
    /// The size the bubble wants at the given width limit. Consulted once
    /// per placement.
    fn preferred_size(&self, max_width: f64) -> Size;

    /// Positions the bubble.
    fn set_frame(&mut self, frame: Rect);

    /// Sets the bubble's opacity in `[0, 1]`.
    fn set_alpha(&mut self, alpha: f64);

    /// Points the bubble's peak: which edge it protrudes from and its
    /// signed offset from the bubble's center along that edge.
    fn set_peak(&mut self, side: PeakSide, offset: f64);

    /// Enables or disables user interaction on the bubble itself.
    fn set_interaction_enabled(&mut self, enabled: bool);

    /// Hands the handle its visual parameters, once, before placement.
    /// Handles that draw a fixed chrome may ignore this.
    fn set_style(&mut self, style: BubbleStyle) {
        let _ = style;
    }

    /// Whether the bubble is actually attached under the given container.
    ///
    /// Returning `false` makes the flow skip placement for this session
    /// (the bubble keeps its default frame) and log a warning; the
    /// presentation itself continues.
    fn is_attached_under(&self, container: Rect) -> bool {
        let _ = container;
        true
    }
}

/// Supplies the flow with coach marks and their presentation parameters.
///
/// `next_mark` returning `None` is not an error: it ends the flow normally.
pub trait MarkProvider {
    /// The bubble handle type this provider creates.
    type Bubble: Bubble;

    /// The next coach mark, or `None` when the sequence is exhausted.
    fn next_mark(&mut self) -> Option<CoachMark>;

    /// Creates the bubble instance for a mark.
    fn make_bubble(&mut self, mark: &CoachMark) -> Self::Bubble;

    /// The visual parameters for a mark's bubble. Defaults to the stock
    /// chrome for every mark.
    fn bubble_style(&mut self, mark: &CoachMark) -> BubbleStyle {
        let _ = mark;
        BubbleStyle::default()
    }

    /// How horizontal alignment should be chosen.
    fn alignment_policy(&self) -> AlignmentPolicy {
        AlignmentPolicy::DirectionAware
    }

    /// The show transition for a mark. Defaults to a plain fade-in.
    fn show_transition(&mut self, mark: &CoachMark) -> TransitionDescriptor {
        let _ = mark;
        TransitionDescriptor::fade_in()
    }

    /// The hide transition for a mark. Defaults to a plain fade-out.
    fn hide_transition(&mut self, mark: &CoachMark) -> TransitionDescriptor {
        let _ = mark;
        TransitionDescriptor::fade_out()
    }

    /// The decorative idle animation looped while a mark sits fully shown.
    /// Defaults to none.
    fn idle_transition(&mut self, mark: &CoachMark) -> Option<TransitionDescriptor> {
        let _ = mark;
        None
    }
}
