// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

/// Reading direction of the container's layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    /// Leading is the left edge.
    #[default]
    LeftToRight,
    /// Leading is the right edge; leading/trailing placement mirrors.
    RightToLeft,
}

impl LayoutDirection {
    /// Whether this is a right-to-left layout.
    #[must_use]
    pub fn is_rtl(self) -> bool {
        self == Self::RightToLeft
    }
}

/// Resolved horizontal alignment of a bubble within its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Leading edge pinned at the horizontal margin.
    Leading,
    /// Centered, biased toward the point of interest when one exists.
    #[default]
    Centered,
    /// Trailing edge pinned at the horizontal margin.
    Trailing,
}

/// How a host wants horizontal alignment chosen, per mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    /// Always pin leading.
    Leading,
    /// Always center. Compatibility mode; direction-aware placement is the
    /// primary behavior.
    Centered,
    /// Always pin trailing.
    Trailing,
    /// Choose from the half of the container the point of interest falls in.
    #[default]
    DirectionAware,
}

/// Outcome of [`resolve_alignment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAlignment {
    /// The alignment to lay out with.
    pub alignment: HorizontalAlignment,
    /// True when a direction-aware policy had no point of interest to work
    /// from and fell back to centering. Non-fatal; callers may log it.
    pub defaulted: bool,
}

/// Resolves an [`AlignmentPolicy`] into a concrete [`HorizontalAlignment`].
///
/// The direction-aware policy splits the container into two equal horizontal
/// segments. Under left-to-right layout a point of interest in the first
/// (left) segment aligns leading and one in the second aligns trailing;
/// right-to-left layout mirrors the mapping. Without a point of interest the
/// policy falls back to `Centered` and reports `defaulted`.
#[must_use]
pub fn resolve_alignment(
    policy: AlignmentPolicy,
    point_of_interest: Option<Point>,
    container: Rect,
    direction: LayoutDirection,
) -> ResolvedAlignment {
    let alignment = match policy {
        AlignmentPolicy::Leading => HorizontalAlignment::Leading,
        AlignmentPolicy::Centered => HorizontalAlignment::Centered,
        AlignmentPolicy::Trailing => HorizontalAlignment::Trailing,
        AlignmentPolicy::DirectionAware => {
            let Some(poi) = point_of_interest else {
                return ResolvedAlignment {
                    alignment: HorizontalAlignment::Centered,
                    defaulted: true,
                };
            };
            let first_segment = poi.x < container.center().x;
            match (first_segment, direction.is_rtl()) {
                (true, false) | (false, true) => HorizontalAlignment::Leading,
                (false, false) | (true, true) => HorizontalAlignment::Trailing,
            }
        }
    };
    ResolvedAlignment {
        alignment,
        defaulted: false,
    }
}
