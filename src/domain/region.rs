//! Page-space rectangles and the expansion policies applied to them.

use serde::{Deserialize, Serialize};

/// Height, in page units, of the band cleared from the top of every page
/// when header removal is enabled.
pub const HEADER_BAND_HEIGHT: f32 = 100.0;

/// An axis-aligned rectangle in page coordinates.
///
/// Coordinates follow the MuPDF convention: the origin is the top-left
/// corner of the page and `y` grows downward, so `y0 <= y1` for a
/// well-formed region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Region {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Returns true if the region covers no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Returns true if the two regions share any area.
    pub fn intersects(&self, other: &Region) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Returns true if `other` lies entirely inside this region.
    pub fn contains(&self, other: &Region) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && self.x1 >= other.x1 && self.y1 >= other.y1
    }

    /// Smallest region covering both.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Grows the region by the given policy.
    pub fn expand(&self, policy: Expansion) -> Region {
        Region {
            x0: self.x0 - policy.left,
            y0: self.y0 - policy.vertical,
            x1: self.x1 + policy.right,
            y1: self.y1 + policy.vertical,
        }
    }

    /// The full-width band of [`HEADER_BAND_HEIGHT`] at the top of `page`.
    pub fn header_band(page: &Region) -> Region {
        Region {
            x0: page.x0,
            y0: page.y0,
            x1: page.x1,
            y1: page.y0 + HEADER_BAND_HEIGHT,
        }
    }
}

/// Fixed margins added around a located match before it is redacted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Expansion {
    pub left: f32,
    pub right: f32,
    pub vertical: f32,
}

impl Expansion {
    /// Redact exactly the located box.
    pub const NONE: Expansion = Expansion {
        left: 0.0,
        right: 0.0,
        vertical: 0.0,
    };

    /// Covers a price keyword and the rest of its line or table cell.
    pub const PRICE: Expansion = Expansion {
        left: 5.0,
        right: 200.0,
        vertical: 2.0,
    };

    /// Covers a reference marker and the value that follows it.
    pub const REFERENCE: Expansion = Expansion {
        left: 2.0,
        right: 80.0,
        vertical: 1.0,
    };
}

/// Removes exact duplicates while keeping first-seen order.
pub fn dedup_regions(regions: Vec<Region>) -> Vec<Region> {
    let mut unique: Vec<Region> = Vec::with_capacity(regions.len());
    for region in regions {
        if !unique.contains(&region) {
            unique.push(region);
        }
    }
    unique
}
