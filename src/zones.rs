//! Snap-zone geometry
//!
//! A zone is a named canonical region of the work area (left half, top-right
//! quarter, ...). Snapping a window to a zone computes the zone's rectangle
//! against the configured work area and applies it as a normal geometry
//! update. Zone edges are inset by the configured gap, except `fullscreen`
//! which covers the whole work area.

use crate::config::WorkArea;
use crate::registry::{Position, Size};

/// Named canonical screen regions for one-step window placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    LeftHalf,
    RightHalf,
    TopHalf,
    BottomHalf,
    TopLeftQuarter,
    TopRightQuarter,
    BottomLeftQuarter,
    BottomRightQuarter,
    Center,
    Fullscreen,
}

impl Zone {
    pub const ALL: [Zone; 10] = [
        Zone::LeftHalf,
        Zone::RightHalf,
        Zone::TopHalf,
        Zone::BottomHalf,
        Zone::TopLeftQuarter,
        Zone::TopRightQuarter,
        Zone::BottomLeftQuarter,
        Zone::BottomRightQuarter,
        Zone::Center,
        Zone::Fullscreen,
    ];

    /// Parse a kebab-case zone name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Zone> {
        match name {
            "left-half" => Some(Zone::LeftHalf),
            "right-half" => Some(Zone::RightHalf),
            "top-half" => Some(Zone::TopHalf),
            "bottom-half" => Some(Zone::BottomHalf),
            "top-left-quarter" => Some(Zone::TopLeftQuarter),
            "top-right-quarter" => Some(Zone::TopRightQuarter),
            "bottom-left-quarter" => Some(Zone::BottomLeftQuarter),
            "bottom-right-quarter" => Some(Zone::BottomRightQuarter),
            "center" => Some(Zone::Center),
            "fullscreen" => Some(Zone::Fullscreen),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Zone::LeftHalf => "left-half",
            Zone::RightHalf => "right-half",
            Zone::TopHalf => "top-half",
            Zone::BottomHalf => "bottom-half",
            Zone::TopLeftQuarter => "top-left-quarter",
            Zone::TopRightQuarter => "top-right-quarter",
            Zone::BottomLeftQuarter => "bottom-left-quarter",
            Zone::BottomRightQuarter => "bottom-right-quarter",
            Zone::Center => "center",
            Zone::Fullscreen => "fullscreen",
        }
    }

    /// Compute the canonical rectangle for this zone against a work area.
    ///
    /// Halves and quarters split the gapped interior; the two halves along
    /// an axis always tile it exactly even when the interior is odd-sized.
    pub fn rect(&self, area: &WorkArea, gap: u32) -> (Position, Size) {
        let g = gap as i32;
        let w = area.width as i32;
        let h = area.height as i32;

        // Column split: [gap][left][gap][right][gap]
        let left_w = (w - 3 * g) / 2;
        let right_w = w - 3 * g - left_w;
        let right_x = area.x + g + left_w + g;

        // Row split: [gap][top][gap][bottom][gap]
        let top_h = (h - 3 * g) / 2;
        let bottom_h = h - 3 * g - top_h;
        let bottom_y = area.y + g + top_h + g;

        let full_w = w - 2 * g;
        let full_h = h - 2 * g;

        let (x, y, width, height) = match self {
            Zone::LeftHalf => (area.x + g, area.y + g, left_w, full_h),
            Zone::RightHalf => (right_x, area.y + g, right_w, full_h),
            Zone::TopHalf => (area.x + g, area.y + g, full_w, top_h),
            Zone::BottomHalf => (area.x + g, bottom_y, full_w, bottom_h),
            Zone::TopLeftQuarter => (area.x + g, area.y + g, left_w, top_h),
            Zone::TopRightQuarter => (right_x, area.y + g, right_w, top_h),
            Zone::BottomLeftQuarter => (area.x + g, bottom_y, left_w, bottom_h),
            Zone::BottomRightQuarter => (right_x, bottom_y, right_w, bottom_h),
            Zone::Center => {
                let cw = (w / 2).max(1);
                let ch = (h / 2).max(1);
                (area.x + (w - cw) / 2, area.y + (h - ch) / 2, cw, ch)
            }
            Zone::Fullscreen => (area.x, area.y, w, h),
        };

        (
            Position { x, y },
            Size {
                width: width.max(1) as u32,
                height: height.max(1) as u32,
            },
        )
    }
}
