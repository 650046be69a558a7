// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement engine: a pure function from descriptor + container to
//! resolved bubble anchors.

use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::align::{HorizontalAlignment, LayoutDirection};
use crate::mark::{CoachMark, PeakSide};

/// Why a placement could not be computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The container has zero area, or its width cannot accommodate twice
    /// the horizontal margin.
    DegenerateContainer,
    /// The bubble is not actually attached under the stated container.
    /// Callers treat this as a no-op placement, not a hard failure.
    InvalidHierarchy,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateContainer => {
                write!(f, "container has zero area or cannot fit the horizontal margins")
            }
            Self::InvalidHierarchy => {
                write!(f, "bubble is not a child of the stated container")
            }
        }
    }
}

impl core::error::Error for LayoutError {}

/// Resolved vertical anchor of the bubble.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalAnchor {
    /// Top edge offset from the container's top edge. The bubble sits below
    /// the cutout.
    FromTop(f64),
    /// Bottom edge offset from the container's bottom edge (negative values
    /// move up). The bubble sits above the cutout.
    FromBottom(f64),
    /// Vertically centered in the container; used when the mark has no
    /// cutout to stand clear of.
    Centered,
}

/// Resolved horizontal anchor of the bubble.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HorizontalAnchor {
    /// Leading edge pinned at the horizontal margin.
    Leading,
    /// Bubble center offset from the container center. Already mirrored for
    /// right-to-left layouts.
    Centered {
        /// Signed shift of the bubble center relative to the container
        /// center.
        offset: f64,
    },
    /// Trailing edge pinned at the horizontal margin.
    Trailing,
}

/// The resolved placement of one bubble for one presentation.
///
/// Ephemeral: produced fresh by [`compute_placement`], never mutated, and
/// recomputed whenever the container bounds change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutResult {
    container: Rect,
    direction: LayoutDirection,
    alignment: HorizontalAlignment,
    peak_side: PeakSide,
    vertical: VerticalAnchor,
    horizontal: HorizontalAnchor,
    max_width: f64,
    horizontal_margin: f64,
}

impl LayoutResult {
    /// The alignment mode this placement was computed with.
    #[must_use]
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// The resolved vertical anchor.
    #[must_use]
    pub fn vertical_anchor(&self) -> VerticalAnchor {
        self.vertical
    }

    /// The resolved horizontal anchor.
    #[must_use]
    pub fn horizontal_anchor(&self) -> HorizontalAnchor {
        self.horizontal
    }

    /// The bubble's peak side.
    #[must_use]
    pub fn peak_side(&self) -> PeakSide {
        self.peak_side
    }

    /// The width limit after clamping against the container:
    /// `min(mark.max_width, container_width - 2 * horizontal_margin)`.
    #[must_use]
    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Resolves a concrete bubble frame for a bubble of the given preferred
    /// size.
    ///
    /// The width is limited by [`LayoutResult::max_width`]. Centered bubbles
    /// are additionally clamped so they never cross the horizontal safe
    /// margins, whatever the point of interest was.
    #[must_use]
    pub fn frame(&self, bubble_size: Size) -> Rect {
        let width = bubble_size.width.min(self.max_width).max(0.0);
        let height = bubble_size.height.max(0.0);
        let margin = self.horizontal_margin;

        let y0 = match self.vertical {
            VerticalAnchor::FromTop(top) => self.container.min_y() + top,
            VerticalAnchor::FromBottom(bottom) => self.container.max_y() + bottom - height,
            VerticalAnchor::Centered => {
                self.container.min_y() + 0.5 * (self.container.height() - height)
            }
        };

        let pin_left = self.container.min_x() + margin;
        let pin_right = self.container.max_x() - margin - width;
        let x0 = match (self.horizontal, self.direction.is_rtl()) {
            (HorizontalAnchor::Leading, false) | (HorizontalAnchor::Trailing, true) => pin_left,
            (HorizontalAnchor::Leading, true) | (HorizontalAnchor::Trailing, false) => pin_right,
            (HorizontalAnchor::Centered { offset }, _) => {
                let half = 0.5 * width;
                let center = self.container.center().x + offset;
                let min_center = pin_left + half;
                let max_center = pin_right + half;
                let center = if min_center <= max_center {
                    center.clamp(min_center, max_center)
                } else {
                    // Margins leave no slack; fall back to the container center.
                    self.container.center().x
                };
                center - half
            }
        };

        Rect::new(x0, y0, x0 + width, y0 + height)
    }

    /// Signed peak offset from the bubble's center toward the point of
    /// interest, clamped inside the bubble.
    ///
    /// For top/bottom peaks the offset is horizontal; for left/right peaks
    /// it is vertical. Without a point of interest the peak stays centered.
    #[must_use]
    pub fn peak_offset(&self, frame: Rect, point_of_interest: Option<Point>) -> f64 {
        let Some(poi) = point_of_interest else {
            return 0.0;
        };
        match self.peak_side {
            PeakSide::Top | PeakSide::Bottom => {
                let half = 0.5 * frame.width();
                (poi.x - frame.center().x).clamp(-half, half)
            }
            PeakSide::Left | PeakSide::Right => {
                let half = 0.5 * frame.height();
                (poi.y - frame.center().y).clamp(-half, half)
            }
        }
    }
}

/// Computes the bubble placement for a coach mark within a container.
///
/// Pure and deterministic. The vertical slot is binary: a
/// [`PeakSide::Bottom`] mark stands above its cutout, anchored by a bottom
/// offset of `-(container_height - cutout_min_y + gap)`; any other side
/// stands below, anchored by a top offset of `cutout_max_y + gap`. A mark
/// without a cutout is vertically centered.
///
/// Fails with [`LayoutError::DegenerateContainer`] when the container has
/// zero area or its width cannot fit the margins.
pub fn compute_placement(
    mark: &CoachMark,
    container: Rect,
    direction: LayoutDirection,
    alignment: HorizontalAlignment,
) -> Result<LayoutResult, LayoutError> {
    debug_assert!(mark.gap >= 0.0, "coach mark gap must be non-negative");
    debug_assert!(mark.max_width > 0.0, "coach mark max width must be positive");
    debug_assert!(
        mark.horizontal_margin >= 0.0,
        "coach mark horizontal margin must be non-negative"
    );

    if container.width() <= 0.0 || container.height() <= 0.0 {
        return Err(LayoutError::DegenerateContainer);
    }
    let max_width = mark
        .max_width
        .min(container.width() - 2.0 * mark.horizontal_margin);
    if max_width < 0.0 {
        return Err(LayoutError::DegenerateContainer);
    }

    let vertical = match mark.cutout {
        Some(cutout) => match mark.peak_side {
            PeakSide::Bottom => {
                let above = container.height() - (cutout.rect.min_y() - container.min_y());
                VerticalAnchor::FromBottom(-(above + mark.gap))
            }
            PeakSide::Top | PeakSide::Left | PeakSide::Right => {
                VerticalAnchor::FromTop(cutout.rect.max_y() - container.min_y() + mark.gap)
            }
        },
        None => VerticalAnchor::Centered,
    };

    let horizontal = match alignment {
        HorizontalAlignment::Leading => HorizontalAnchor::Leading,
        HorizontalAlignment::Trailing => HorizontalAnchor::Trailing,
        HorizontalAlignment::Centered => {
            let offset = match mark.point_of_interest {
                Some(poi) => {
                    // The distance from the container center to the point of
                    // interest, mirrored under RTL; the bubble center shifts
                    // by its negation, landing on the point of interest.
                    let from_center = container.center().x - poi.x;
                    let from_center = if direction.is_rtl() {
                        -from_center
                    } else {
                        from_center
                    };
                    -from_center
                }
                None => 0.0,
            };
            HorizontalAnchor::Centered { offset }
        }
    };

    Ok(LayoutResult {
        container,
        direction,
        alignment,
        peak_side: mark.peak_side,
        vertical,
        horizontal,
        max_width,
        horizontal_margin: mark.horizontal_margin,
    })
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::{compute_placement, HorizontalAnchor, LayoutError, VerticalAnchor};
    use crate::align::{HorizontalAlignment, LayoutDirection};
    use crate::mark::{CoachMark, PeakSide, Region};

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 320.0, 568.0);

    fn mark_with_cutout() -> CoachMark {
        let mut mark = CoachMark::for_cutout(Region::new(Rect::new(10.0, 10.0, 60.0, 60.0), 4.0));
        mark.point_of_interest = Some(Point::new(35.0, 35.0));
        mark
    }

    fn place(
        mark: &CoachMark,
        direction: LayoutDirection,
        alignment: HorizontalAlignment,
    ) -> super::LayoutResult {
        compute_placement(mark, CONTAINER, direction, alignment).unwrap()
    }

    #[test]
    fn bottom_peak_anchors_above_the_cutout() {
        let mut mark = mark_with_cutout();
        mark.peak_side = PeakSide::Bottom;
        let layout = place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
        // -(568 - 10 + 6) = -564.
        assert_eq!(layout.vertical_anchor(), VerticalAnchor::FromBottom(-564.0));

        let frame = layout.frame(Size::new(200.0, 80.0));
        // Bubble bottom clears the cutout top by the gap.
        assert_eq!(frame.max_y(), 10.0 - 6.0);
        assert!(frame.max_y() <= mark.cutout.unwrap().rect.min_y());
    }

    #[test]
    fn other_peaks_anchor_below_the_cutout() {
        for side in [PeakSide::Top, PeakSide::Left, PeakSide::Right] {
            let mut mark = mark_with_cutout();
            mark.peak_side = side;
            let layout =
                place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
            assert_eq!(layout.vertical_anchor(), VerticalAnchor::FromTop(66.0));

            let frame = layout.frame(Size::new(200.0, 80.0));
            assert_eq!(frame.min_y(), 66.0);
            assert!(frame.min_y() >= mark.cutout.unwrap().rect.max_y());
        }
    }

    #[test]
    fn width_clamps_to_the_margined_container() {
        let mut mark = mark_with_cutout();
        mark.max_width = 350.0;
        mark.horizontal_margin = 20.0;
        let layout = place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
        // min(350, 320 - 2*20) = 280.
        assert_eq!(layout.max_width(), 280.0);
        assert_eq!(layout.frame(Size::new(1000.0, 50.0)).width(), 280.0);
    }

    #[test]
    fn centered_frames_respect_safe_margins_for_any_point_of_interest() {
        for poi_x in [-500.0, 0.0, 35.0, 160.0, 319.0, 900.0] {
            let mut mark = mark_with_cutout();
            mark.point_of_interest = Some(Point::new(poi_x, 35.0));
            mark.horizontal_margin = 12.0;
            let layout =
                place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
            let frame = layout.frame(Size::new(200.0, 80.0));
            assert!(frame.min_x() >= 12.0, "poi {poi_x}: frame crossed the leading margin");
            assert!(frame.max_x() <= 320.0 - 12.0, "poi {poi_x}: frame crossed the trailing margin");
        }
    }

    #[test]
    fn centered_bubble_lands_on_the_point_of_interest() {
        let mark = mark_with_cutout();
        let layout = place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
        let HorizontalAnchor::Centered { offset } = layout.horizontal_anchor() else {
            panic!("expected a centered anchor");
        };
        // Container center 160, poi 35.
        assert_eq!(offset, -125.0);

        // A narrow bubble can center exactly over the point of interest.
        let frame = layout.frame(Size::new(40.0, 30.0));
        assert_eq!(frame.center().x, 35.0);
    }

    #[test]
    fn rtl_mirrors_pinned_placement_exactly() {
        let mark = mark_with_cutout();
        let size = Size::new(200.0, 80.0);
        let ltr = place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Leading)
            .frame(size);
        let rtl = place(&mark, LayoutDirection::RightToLeft, HorizontalAlignment::Leading)
            .frame(size);
        // Reflect x across the container: x' = min + max - x.
        assert_eq!(rtl.min_x(), CONTAINER.min_x() + CONTAINER.max_x() - ltr.max_x());
        assert_eq!(rtl.max_x(), CONTAINER.min_x() + CONTAINER.max_x() - ltr.min_x());
        assert_eq!(rtl.min_y(), ltr.min_y());
    }

    #[test]
    fn rtl_mirrors_centered_bias() {
        let mark = mark_with_cutout();
        let size = Size::new(40.0, 30.0);
        let ltr = place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered)
            .frame(size);
        let rtl = place(&mark, LayoutDirection::RightToLeft, HorizontalAlignment::Centered)
            .frame(size);
        assert_eq!(
            rtl.center().x,
            CONTAINER.min_x() + CONTAINER.max_x() - ltr.center().x
        );
    }

    #[test]
    fn markless_cutout_centers_vertically() {
        let mark = CoachMark::new();
        let layout = place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
        assert_eq!(layout.vertical_anchor(), VerticalAnchor::Centered);
        let frame = layout.frame(Size::new(100.0, 100.0));
        assert_eq!(frame.center().y, CONTAINER.center().y);
    }

    #[test]
    fn degenerate_containers_are_rejected() {
        let mark = mark_with_cutout();
        for container in [
            Rect::new(0.0, 0.0, 0.0, 0.0),
            Rect::new(0.0, 0.0, 320.0, 0.0),
            Rect::new(0.0, 0.0, 0.0, 568.0),
        ] {
            assert_eq!(
                compute_placement(
                    &mark,
                    container,
                    LayoutDirection::LeftToRight,
                    HorizontalAlignment::Centered,
                ),
                Err(LayoutError::DegenerateContainer)
            );
        }

        // Margins wider than the container are degenerate too.
        let mut cramped = mark_with_cutout();
        cramped.horizontal_margin = 200.0;
        assert_eq!(
            compute_placement(
                &cramped,
                CONTAINER,
                LayoutDirection::LeftToRight,
                HorizontalAlignment::Centered,
            ),
            Err(LayoutError::DegenerateContainer)
        );
    }

    #[test]
    fn frames_never_overlap_the_cutout() {
        for side in [PeakSide::Top, PeakSide::Bottom] {
            for cutout_rect in [
                Rect::new(0.0, 0.0, 40.0, 40.0),
                Rect::new(100.0, 250.0, 220.0, 300.0),
                Rect::new(280.0, 520.0, 320.0, 568.0),
            ] {
                let mut mark = CoachMark::for_cutout(Region::new(cutout_rect, 4.0));
                mark.peak_side = side;
                let layout =
                    place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
                let frame = layout.frame(Size::new(250.0, 60.0));
                let overlap = frame.intersect(cutout_rect);
                assert!(
                    overlap.width() <= 0.0 || overlap.height() <= 0.0,
                    "{side:?} bubble {frame:?} overlaps cutout {cutout_rect:?}"
                );
            }
        }
    }

    #[test]
    fn peak_offset_tracks_and_clamps() {
        let mark = mark_with_cutout();
        let layout = place(&mark, LayoutDirection::LeftToRight, HorizontalAlignment::Centered);
        let frame = Rect::new(100.0, 66.0, 300.0, 146.0);

        assert_eq!(layout.peak_offset(frame, None), 0.0);
        assert_eq!(layout.peak_offset(frame, Some(Point::new(250.0, 0.0))), 50.0);
        // Far-away points clamp to half the bubble width.
        assert_eq!(layout.peak_offset(frame, Some(Point::new(900.0, 0.0))), 100.0);
        assert_eq!(layout.peak_offset(frame, Some(Point::new(-900.0, 0.0))), -100.0);
    }
}
