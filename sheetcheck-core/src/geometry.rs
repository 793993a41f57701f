//! Affine georeferencing and sheet geometry
//!
//! Maps pixel coordinates to planar meters and relates them to the fixed
//! 2000 m x 1000 m sheet grid.

use crate::format::constants::{SHEET_GRID_M, SHEET_HEIGHT_M, SHEET_WIDTH_M};
use crate::{ImageDimensions, SheetNumber};
use core::fmt;

/// Six-coefficient pixel-to-map transform
///
/// `x = a*px + b*py + c`, `y = d*px + e*py + f`. Fields follow world file
/// line order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineTransform {
    pub a: f64,
    pub d: f64,
    pub b: f64,
    pub e: f64,
    pub c: f64,
    pub f: f64,
}

impl AffineTransform {
    pub const fn new(a: f64, d: f64, b: f64, e: f64, c: f64, f: f64) -> Self {
        Self { a, d, b, e, c, f }
    }

    /// Map a pixel position to planar coordinates
    pub fn apply(&self, px: f64, py: f64) -> (f64, f64) {
        (
            self.a * px + self.b * py + self.c,
            self.d * px + self.e * py + self.f,
        )
    }

    /// True when both translation terms lie strictly inside `(-guard, guard)`
    pub fn is_near_origin(&self, guard: f64) -> bool {
        -guard < self.c && self.c < guard && -guard < self.f && self.f < guard
    }
}

/// Axis-aligned box in planar coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl GeoBounds {
    /// Smallest box holding all `points`
    pub fn enclosing(points: &[(f64, f64)]) -> Self {
        let mut bounds = Self {
            left: f64::INFINITY,
            right: f64::NEG_INFINITY,
            top: f64::NEG_INFINITY,
            bottom: f64::INFINITY,
        };
        for &(x, y) in points {
            bounds.left = bounds.left.min(x);
            bounds.right = bounds.right.max(x);
            bounds.top = bounds.top.max(y);
            bounds.bottom = bounds.bottom.min(y);
        }
        bounds
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Move every edge `margin` meters towards the center
    pub fn shrink(self, margin: f64) -> Self {
        Self {
            left: self.left + margin,
            right: self.right - margin,
            top: self.top - margin,
            bottom: self.bottom + margin,
        }
    }

    /// True when `inner` lies entirely within `self`, edges included
    pub fn contains(&self, inner: &GeoBounds) -> bool {
        self.left <= inner.left
            && self.right >= inner.right
            && self.bottom <= inner.bottom
            && self.top >= inner.top
    }
}

impl GeoBounds {
    /// Display with whole-meter edges printed without a fractional part
    pub fn whole_meters(&self) -> WholeMeters<'_> {
        WholeMeters(self)
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'left': {:?}, 'right': {:?}, 'top': {:?}, 'bottom': {:?}}}",
            self.left, self.right, self.top, self.bottom
        )
    }
}

/// [`GeoBounds`] rendering for sheet extents, which are integral unless the
/// shrink margin is fractional
#[derive(Debug, Clone, Copy)]
pub struct WholeMeters<'a>(&'a GeoBounds);

struct Meters(f64);

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

impl fmt::Display for WholeMeters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{{'left': {}, 'right': {}, 'top': {}, 'bottom': {}}}",
            Meters(b.left),
            Meters(b.right),
            Meters(b.top),
            Meters(b.bottom)
        )
    }
}

/// Footprint of a raster: the four transformed pixel corners
pub fn image_bounds(dims: ImageDimensions, transform: &AffineTransform) -> GeoBounds {
    let (w, h) = (f64::from(dims.width), f64::from(dims.height));
    GeoBounds::enclosing(&[
        transform.apply(0.0, 0.0),
        transform.apply(w, 0.0),
        transform.apply(w, h),
        transform.apply(0.0, h),
    ])
}

/// Round up to the sheet grid; exact multiples stay put
fn ceil_to_grid(value: f64) -> i64 {
    ((value / SHEET_GRID_M).ceil() as i64).saturating_mul(SHEET_GRID_M as i64)
}

/// `s[start..end]` clamped to the string length
fn clamped(s: &str, start: usize, end: usize) -> &str {
    let len = s.len();
    &s[start.min(len)..end.min(len)]
}

/// Sheet number of the sheet whose grid corner the image's bottom-left pixel snaps to
///
/// Both coordinates are rounded up to the next 1000 m. The number is then
/// interleaved as x[0], y[0], x[1..3], y[1..3]. Coordinates too short to supply
/// all digits yield a shorter string, which never equals a parsed sheet number.
pub fn sheet_number_from_coords(dims: ImageDimensions, transform: &AffineTransform) -> String {
    let (x, y) = transform.apply(0.0, f64::from(dims.height));
    let x = ceil_to_grid(x).to_string();
    let y = ceil_to_grid(y).to_string();

    let mut sheet = String::with_capacity(crate::format::constants::SHEET_NUMBER_LEN);
    sheet.push_str(clamped(&x, 0, 1));
    sheet.push_str(clamped(&y, 0, 1));
    sheet.push_str(clamped(&x, 1, 3));
    sheet.push_str(clamped(&y, 1, 3));
    sheet
}

/// Nominal extent of a sheet, shrunk inward by `shrink_m` on every side
///
/// Digits 0, 2, 3 give the left edge and digits 1, 4, 5 the bottom edge, both
/// in kilometers.
pub fn sheet_bounds(sheet: &SheetNumber, shrink_m: f64) -> GeoBounds {
    let d = sheet.digits();
    let km = |hundreds: u8, tens: u8, units: u8| {
        f64::from(u32::from(hundreds) * 100 + u32::from(tens) * 10 + u32::from(units))
            * SHEET_GRID_M
    };
    let left = km(d[0], d[2], d[3]);
    let bottom = km(d[1], d[4], d[5]);

    GeoBounds {
        left,
        right: left + SHEET_WIDTH_M,
        top: bottom + SHEET_HEIGHT_M,
        bottom,
    }
    .shrink(shrink_m)
}
