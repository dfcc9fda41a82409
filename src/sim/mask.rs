//! Pixel-accurate collision masks
//!
//! A mask is one bit per sprite pixel. A pixel is solid when its alpha is
//! strictly above [`ALPHA_THRESHOLD`], so anti-aliased edges at half
//! transparency or less never register a hit.
//!
//! Two masks overlap when any solid bit coincides once the second mask is
//! placed at an integer offset from the first (top-left to top-left).

use glam::{IVec2, Vec2};

use super::entity::{ShieldKind, SizeClass};
use crate::consts::*;
use crate::error::MaskError;

/// Alpha values above this are solid
pub const ALPHA_THRESHOLD: u8 = 127;

/// A packed bit mask, row-major, one `u64` word per 64 pixels of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl CollisionMask {
    fn blank(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Build a mask from an 8-bit alpha channel (row-major, `width * height` bytes)
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Result<Self, MaskError> {
        if width == 0 || height == 0 {
            return Err(MaskError::Empty(width, height));
        }
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(MaskError::SizeMismatch {
                width,
                height,
                expected,
                actual: alpha.len(),
            });
        }

        let mut mask = Self::blank(width, height);
        for (i, &a) in alpha.iter().enumerate() {
            if a > ALPHA_THRESHOLD {
                let x = (i % width as usize) as u32;
                let y = (i / width as usize) as u32;
                mask.set(x, y);
            }
        }
        Ok(mask)
    }

    /// Fully solid rectangle (zero dimensions are bumped to 1)
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::blank(width, height);
        for y in 0..mask.height {
            for x in 0..mask.width {
                mask.set(x, y);
            }
        }
        mask
    }

    /// Solid ellipse inscribed in the sprite box (zero dimensions are bumped to 1)
    pub fn ellipse(width: u32, height: u32) -> Self {
        let mut mask = Self::blank(width, height);
        let rx = mask.width as f32 / 2.0;
        let ry = mask.height as f32 / 2.0;
        for y in 0..mask.height {
            for x in 0..mask.width {
                let nx = (x as f32 + 0.5 - rx) / rx;
                let ny = (y as f32 + 0.5 - ry) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in pixels as a vector
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Top-left pixel of this mask when its box is centered on `center`
    #[inline]
    pub fn top_left(&self, center: Vec2) -> IVec2 {
        (center - self.size() / 2.0).round().as_ivec2()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> (usize, u64) {
        let word = y as usize * self.words_per_row + (x as usize / 64);
        (word, 1u64 << (x % 64))
    }

    /// Whether the pixel at (x, y) is solid; out of bounds is empty
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (word, bit) = self.index(x, y);
        self.bits[word] & bit != 0
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            let (word, bit) = self.index(x, y);
            self.bits[word] |= bit;
        }
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Test overlap with `other` whose top-left sits at `offset` relative to ours
    pub fn overlaps(&self, other: &CollisionMask, offset: IVec2) -> bool {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32)
                    && other.get((x - offset.x) as u32, (y - offset.y) as u32)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Rotate counter-clockwise (as seen on a y-down screen) by `degrees`.
    ///
    /// The result's box grows to fit the rotated sprite and keeps the same
    /// center, so callers re-derive the top-left from the entity center.
    pub fn rotated(&self, degrees: f32) -> CollisionMask {
        let degrees = crate::wrap_degrees(degrees);
        if degrees.abs() < 1e-3 || (360.0 - degrees).abs() < 1e-3 {
            return self.clone();
        }

        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = self.width as f32;
        let h = self.height as f32;
        let new_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0) as u32;
        let new_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0) as u32;

        let mut out = Self::blank(new_w, new_h);
        let src_center = Vec2::new(w / 2.0, h / 2.0);
        let dst_center = Vec2::new(new_w as f32 / 2.0, new_h as f32 / 2.0);

        for y in 0..new_h {
            for x in 0..new_w {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
                // Inverse rotation back into source space
                let s = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + src_center;
                if s.x < 0.0 || s.y < 0.0 {
                    continue;
                }
                if self.get(s.x as u32, s.y as u32) {
                    out.set(x, y);
                }
            }
        }
        out
    }
}

/// Collision masks for every sprite the simulation tests against
#[derive(Debug, Clone)]
pub struct SpriteMasks {
    pub ship: CollisionMask,
    pub asteroid_large: CollisionMask,
    pub asteroid_medium: CollisionMask,
    pub asteroid_small: CollisionMask,
    pub shield_temporary: CollisionMask,
    pub shield_permanent: CollisionMask,
}

impl Default for SpriteMasks {
    fn default() -> Self {
        Self::default_shapes()
    }
}

impl SpriteMasks {
    /// Elliptical stand-ins at the default sprite sizes, used until the
    /// presentation layer supplies masks built from real sprite alpha
    pub fn default_shapes() -> Self {
        Self {
            ship: CollisionMask::ellipse(SHIP_SIZE.0, SHIP_SIZE.1),
            asteroid_large: CollisionMask::ellipse(ASTEROID_LARGE_SIZE, ASTEROID_LARGE_SIZE),
            asteroid_medium: CollisionMask::ellipse(ASTEROID_MEDIUM_SIZE, ASTEROID_MEDIUM_SIZE),
            asteroid_small: CollisionMask::ellipse(ASTEROID_SMALL_SIZE, ASTEROID_SMALL_SIZE),
            shield_temporary: CollisionMask::ellipse(SHIELD_SIZE, SHIELD_SIZE),
            shield_permanent: CollisionMask::ellipse(SHIELD_SIZE, SHIELD_SIZE),
        }
    }

    pub fn asteroid(&self, size: SizeClass) -> &CollisionMask {
        match size {
            SizeClass::Large => &self.asteroid_large,
            SizeClass::Medium => &self.asteroid_medium,
            SizeClass::Small => &self.asteroid_small,
        }
    }

    pub fn shield(&self, kind: ShieldKind) -> &CollisionMask {
        match kind {
            ShieldKind::Temporary => &self.shield_temporary,
            ShieldKind::Permanent => &self.shield_permanent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_alpha_threshold() {
        // 127 is transparent, 128 is solid
        let alpha = [0, 127, 128, 255];
        let mask = CollisionMask::from_alpha(2, 2, &alpha).unwrap();
        assert!(!mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 1));
        assert!(mask.get(1, 1));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_from_alpha_rejects_bad_sizes() {
        assert_eq!(
            CollisionMask::from_alpha(2, 2, &[255; 3]),
            Err(MaskError::SizeMismatch {
                width: 2,
                height: 2,
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(CollisionMask::from_alpha(0, 4, &[]), Err(MaskError::Empty(0, 4)));
    }

    #[test]
    fn test_wide_rows_span_words() {
        let mask = CollisionMask::filled(130, 2);
        assert_eq!(mask.count(), 260);
        assert!(mask.get(129, 1));
        assert!(!mask.get(130, 1));
    }

    #[test]
    fn test_overlap_touching_and_apart() {
        let a = CollisionMask::filled(10, 10);
        let b = CollisionMask::filled(10, 10);
        assert!(a.overlaps(&b, IVec2::new(9, 9)));
        assert!(!a.overlaps(&b, IVec2::new(10, 0)));
        assert!(a.overlaps(&b, IVec2::new(-9, 0)));
        assert!(!a.overlaps(&b, IVec2::new(0, -10)));
    }

    #[test]
    fn test_ellipse_corners_do_not_collide() {
        // Boxes overlap at the corners but the round shapes do not
        let a = CollisionMask::ellipse(40, 40);
        let b = CollisionMask::ellipse(40, 40);
        assert!(!a.overlaps(&b, IVec2::new(34, 34)));
        assert!(a.overlaps(&b, IVec2::new(20, 20)));
    }

    #[test]
    fn test_rotation_quarter_turn_swaps_dimensions() {
        let bar = CollisionMask::filled(20, 4);
        let turned = bar.rotated(90.0);
        assert_eq!((turned.width(), turned.height()), (4, 20));
        assert_eq!(turned.count(), bar.count());
    }

    #[test]
    fn test_rotation_grows_box_and_keeps_area_roughly() {
        let square = CollisionMask::filled(40, 40);
        let turned = square.rotated(45.0);
        assert!(turned.width() > 40 && turned.width() <= 57);
        let ratio = turned.count() as f32 / square.count() as f32;
        assert!((0.9..1.1).contains(&ratio), "area ratio {ratio}");
    }

    #[test]
    fn test_rotation_zero_and_full_turn_are_identity() {
        let mask = CollisionMask::ellipse(30, 18);
        assert_eq!(mask.rotated(0.0), mask);
        assert_eq!(mask.rotated(360.0), mask);
    }

    #[test]
    fn test_top_left_from_center() {
        let mask = CollisionMask::filled(10, 6);
        assert_eq!(mask.top_left(Vec2::new(50.0, 50.0)), IVec2::new(45, 47));
    }
}
