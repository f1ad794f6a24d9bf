//! CIE L*a*b* perceptual color space
//!
//! Lab is used exclusively for palette matching: Euclidean distance in
//! (L, a, b) approximates human-perceived color difference. Conversion
//! follows the standard sRGB -> XYZ -> Lab pipeline with the D65 white
//! point and IEC 61966-2-1 gamma companding.

use super::rgb::Rgb;

// D65 reference white (2 degree observer).
const XN: f32 = 0.950_47;
const YN: f32 = 1.0;
const ZN: f32 = 1.088_83;

// CIE constants: epsilon = (6/29)^3, kappa = (29/3)^3.
const EPSILON: f32 = 0.008_856_452;
const KAPPA: f32 = 903.296_3;

/// A color in CIE L*a*b* space.
///
/// # Components
///
/// - `l`: Lightness (0.0 = black, 100.0 = white)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
///
/// Values are not clamped; all in-gamut sRGB colors produce `l` in
/// `0.0..=100.0` and `a`/`b` roughly in `-128.0..=128.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness: 0.0 (black) to 100.0 (white)
    pub l: f32,
    /// Green-red axis
    pub a: f32,
    /// Blue-yellow axis
    pub b: f32,
}

impl Lab {
    /// Create a new Lab color.
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance in Lab space (perceptual distance metric).
    ///
    /// Squared distance preserves ordering, so nearest-entry search never
    /// needs the square root.
    ///
    /// # Example
    ///
    /// ```
    /// use palette_map::Lab;
    ///
    /// let white = Lab::new(100.0, 0.0, 0.0);
    /// let black = Lab::new(0.0, 0.0, 0.0);
    /// let gray = Lab::new(50.0, 0.0, 0.0);
    ///
    /// let d_black = gray.distance_squared(black);
    /// let d_white = gray.distance_squared(white);
    /// assert!((d_black - d_white).abs() < 1e-3);
    /// ```
    #[inline]
    pub fn distance_squared(self, other: Lab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

/// sRGB gamma decode (IEC 61966-2-1 piecewise companding).
///
/// Input is a gamma-encoded channel in `0.0..=1.0`, output is linear light.
#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// CIE Lab forward companding function f(t).
#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

impl From<Rgb> for Lab {
    /// Convert an 8-bit sRGB color to CIE Lab.
    ///
    /// Pipeline: normalize to `0.0..=1.0` per channel, gamma decode to
    /// linear RGB, linear RGB -> XYZ (sRGB D65 matrix), XYZ -> Lab.
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r as f32 / 255.0);
        let g = srgb_to_linear(rgb.g as f32 / 255.0);
        let b = srgb_to_linear(rgb.b as f32 / 255.0);

        // Linear sRGB to XYZ, D65 white point.
        let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
        let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
        let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

        let fx = lab_f(x / XN);
        let fy = lab_f(y / YN);
        let fz = lab_f(z / ZN);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tolerance against the palette crate (f32 matrix transforms).
    const CRATE_TOLERANCE: f32 = 0.05;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_lab_matches_palette_crate() {
        use palette::color_difference::EuclideanDistance;
        use palette::{IntoColor, Lab as PaletteLab, Srgb};

        let test_colors = [
            (255u8, 0u8, 0u8),
            (0, 255, 0),
            (0, 0, 255),
            (128, 128, 128),
            (255, 255, 255),
            (0, 0, 0),
            (255, 128, 64),
            (12, 200, 150),
        ];

        for (r, g, b) in test_colors {
            let ours = Lab::from(Rgb::new(r, g, b));

            let srgb: Srgb<f32> = Srgb::new(
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
            );
            let reference: PaletteLab<palette::white_point::D65, f32> =
                srgb.into_linear().into_color();

            assert!(
                approx_eq(ours.l, reference.l, CRATE_TOLERANCE),
                "L mismatch for ({r}, {g}, {b}): ours={}, palette={}",
                ours.l,
                reference.l
            );
            assert!(
                approx_eq(ours.a, reference.a, CRATE_TOLERANCE),
                "a mismatch for ({r}, {g}, {b}): ours={}, palette={}",
                ours.a,
                reference.a
            );
            assert!(
                approx_eq(ours.b, reference.b, CRATE_TOLERANCE),
                "b mismatch for ({r}, {g}, {b}): ours={}, palette={}",
                ours.b,
                reference.b
            );

            // Self-distance through the reference crate is zero too
            let self_dist = reference.distance_squared(reference);
            assert!(self_dist.abs() < 1e-9);
        }
    }

    #[test]
    fn test_lab_known_values() {
        // White: L = 100, a = b = 0
        let white = Lab::from(Rgb::new(255, 255, 255));
        assert!(approx_eq(white.l, 100.0, 0.01), "white L = {}", white.l);
        assert!(approx_eq(white.a, 0.0, 0.01), "white a = {}", white.a);
        assert!(approx_eq(white.b, 0.0, 0.01), "white b = {}", white.b);

        // Black: everything 0
        let black = Lab::from(Rgb::new(0, 0, 0));
        assert!(approx_eq(black.l, 0.0, 0.01), "black L = {}", black.l);
        assert!(approx_eq(black.a, 0.0, 0.01), "black a = {}", black.a);
        assert!(approx_eq(black.b, 0.0, 0.01), "black b = {}", black.b);

        // Greys are achromatic
        for v in [32u8, 64, 128, 192, 224] {
            let grey = Lab::from(Rgb::new(v, v, v));
            assert!(approx_eq(grey.a, 0.0, 0.01), "grey {v} a = {}", grey.a);
            assert!(approx_eq(grey.b, 0.0, 0.01), "grey {v} b = {}", grey.b);
        }

        // sRGB red: L ~ 53.24, a ~ 80.09, b ~ 67.20 (standard reference values)
        let red = Lab::from(Rgb::new(255, 0, 0));
        assert!(approx_eq(red.l, 53.24, 0.05), "red L = {}", red.l);
        assert!(approx_eq(red.a, 80.09, 0.1), "red a = {}", red.a);
        assert!(approx_eq(red.b, 67.20, 0.1), "red b = {}", red.b);
    }

    #[test]
    fn test_lightness_is_monotonic_in_grey() {
        let mut prev = -1.0f32;
        for v in (0..=255u8).step_by(5) {
            let l = Lab::from(Rgb::new(v, v, v)).l;
            assert!(l > prev, "L not monotonic at grey {v}: {l} <= {prev}");
            prev = l;
        }
    }

    #[test]
    fn test_distance_properties() {
        let red = Lab::from(Rgb::new(255, 0, 0));
        let blue = Lab::from(Rgb::new(0, 0, 255));
        let dark_red = Lab::from(Rgb::new(200, 0, 0));

        // Identity
        assert!(red.distance_squared(red) < 1e-9);
        // Symmetry
        assert!((red.distance_squared(blue) - blue.distance_squared(red)).abs() < 1e-6);
        // A dark red is closer to red than blue is
        assert!(red.distance_squared(dark_red) < red.distance_squared(blue));
    }
}
