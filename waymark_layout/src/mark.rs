// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

/// Default inflation applied around a highlighted frame by [`Region::around`].
const DEFAULT_CUTOUT_INSET: f64 = 4.0;

/// Default corner radius for cutouts produced by [`Region::around`].
const DEFAULT_CUTOUT_RADIUS: f64 = 4.0;

/// A rounded-rectangular region cut out of the dimming overlay.
///
/// The rectangle is the logical hole; the corner radius is a rendering
/// detail that also participates in hit testing (a tap in a clipped corner
/// lands on the overlay, not the hole).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    /// Bounding rectangle of the hole.
    pub rect: Rect,
    /// Corner radius, clamped to half the smaller rect dimension when used.
    pub corner_radius: f64,
}

impl Region {
    /// Creates a region from a rectangle and a corner radius.
    #[must_use]
    pub const fn new(rect: Rect, corner_radius: f64) -> Self {
        Self {
            rect,
            corner_radius,
        }
    }

    /// Creates the conventional cutout around a highlighted frame: slightly
    /// larger than the frame, with rounded corners.
    #[must_use]
    pub fn around(frame: Rect) -> Self {
        Self::new(
            frame.inflate(DEFAULT_CUTOUT_INSET, DEFAULT_CUTOUT_INSET),
            DEFAULT_CUTOUT_RADIUS,
        )
    }

    /// Returns the corner radius actually used, never exceeding half the
    /// smaller rect dimension.
    #[must_use]
    pub fn effective_radius(&self) -> f64 {
        let half_min = 0.5 * self.rect.width().min(self.rect.height());
        self.corner_radius.clamp(0.0, half_min.max(0.0))
    }

    /// Whether the region has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rect.width() <= 0.0 || self.rect.height() <= 0.0
    }

    /// Rounded-rectangle containment test.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if !self.rect.contains(point) {
            return false;
        }
        let r = self.effective_radius();
        if r <= 0.0 {
            return true;
        }
        // Inside the rect; only the four corner squares can reject the point.
        let cx = point
            .x
            .clamp(self.rect.min_x() + r, self.rect.max_x() - r);
        let cy = point
            .y
            .clamp(self.rect.min_y() + r, self.rect.max_y() - r);
        let dx = point.x - cx;
        let dy = point.y - cy;
        dx * dx + dy * dy <= r * r
    }
}

/// The edge of the bubble from which its peak (pointer) protrudes.
///
/// The peak side doubles as the vertical placement choice: only
/// [`PeakSide::Bottom`] places the bubble *above* the cutout (the peak points
/// down at it); every other side places the bubble below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PeakSide {
    /// Peak on the bubble's top edge; bubble sits below the cutout.
    #[default]
    Top,
    /// Peak on the bubble's left edge; bubble sits below the cutout.
    Left,
    /// Peak on the bubble's right edge; bubble sits below the cutout.
    Right,
    /// Peak on the bubble's bottom edge; bubble sits above the cutout.
    Bottom,
}

/// Parametrization of a single coach mark.
///
/// This describes *where* a highlight lives and how its bubble should be
/// constrained; it carries no clue about how either will look. Immutable
/// once handed to the engine for a given presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoachMark {
    /// The region to keep unobstructed; `None` means no hole (an
    /// informational bubble only).
    pub cutout: Option<Region>,
    /// The anchor toward which the bubble's peak points. Used to bias
    /// horizontal centering; `None` falls back to plain centering.
    pub point_of_interest: Option<Point>,
    /// Which side of the bubble carries the peak.
    pub peak_side: PeakSide,
    /// Space between the bubble and the cutout edge. Non-negative.
    pub gap: f64,
    /// Maximum bubble width. Positive; clamped at use-time to the container
    /// width minus twice the horizontal margin.
    pub max_width: f64,
    /// Leading and trailing safe margin. Non-negative.
    pub horizontal_margin: f64,
    /// Forward pointer events landing inside the cutout to whatever sits
    /// beneath the overlay. Consumed by the overlay, not by layout.
    pub interaction_inside_cutout: bool,
    /// Center the bubble over the cutout instead of standing clear of it.
    /// Consumed by the flow, not by layout.
    pub display_over_cutout: bool,
}

impl Default for CoachMark {
    fn default() -> Self {
        Self {
            cutout: None,
            point_of_interest: None,
            peak_side: PeakSide::default(),
            gap: 6.0,
            max_width: 350.0,
            horizontal_margin: 2.0,
            interaction_inside_cutout: false,
            display_over_cutout: false,
        }
    }
}

impl CoachMark {
    /// A coach mark with default constraints and no cutout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A coach mark highlighting the given region, with default constraints.
    #[must_use]
    pub fn for_cutout(region: Region) -> Self {
        Self {
            cutout: Some(region),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::{CoachMark, PeakSide, Region};

    #[test]
    fn around_inflates_and_rounds() {
        let region = Region::around(Rect::new(10.0, 10.0, 50.0, 50.0));
        assert_eq!(region.rect, Rect::new(6.0, 6.0, 54.0, 54.0));
        assert_eq!(region.corner_radius, 4.0);
    }

    #[test]
    fn rounded_containment_rejects_clipped_corners() {
        let region = Region::new(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0);
        // Center and edge midpoints are inside.
        assert!(region.contains(Point::new(50.0, 50.0)));
        assert!(region.contains(Point::new(0.5, 50.0)));
        // The very corner is clipped away by the radius.
        assert!(!region.contains(Point::new(0.5, 0.5)));
        // Just inside the corner arc.
        assert!(region.contains(Point::new(10.0, 10.0)));
    }

    #[test]
    fn oversized_radius_is_clamped() {
        let region = Region::new(Rect::new(0.0, 0.0, 10.0, 10.0), 100.0);
        assert_eq!(region.effective_radius(), 5.0);
        // Behaves like a circle inscribed in the rect.
        assert!(region.contains(Point::new(5.0, 5.0)));
        assert!(!region.contains(Point::new(0.1, 0.1)));
    }

    #[test]
    fn mark_defaults_match_conventions() {
        let mark = CoachMark::new();
        assert_eq!(mark.gap, 6.0);
        assert_eq!(mark.max_width, 350.0);
        assert_eq!(mark.horizontal_margin, 2.0);
        assert_eq!(mark.peak_side, PeakSide::Top);
        assert!(mark.cutout.is_none());
        assert!(!mark.interaction_inside_cutout);
    }
}
