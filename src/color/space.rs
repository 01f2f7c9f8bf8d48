//! sRGB and OkLCh color types.
//!
//! All perceptual decisions in the classifier are made in OkLCh, the
//! polar form of Oklab. Equal numerical differences in Oklab correspond
//! to roughly equal perceived differences, which keeps the lightness and
//! chroma thresholds meaningful across the whole hue circle.
//!
//! # References
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An 8-bit sRGB color as stored in images and hex swatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Error parsing a hex color string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex color: {0:?}")]
pub struct ParseColorError(pub String);

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as a lowercase `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a 6-digit hex color, with or without a leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A color in OkLCh: lightness, chroma, hue angle in degrees.
///
/// Hue is normalized to `0.0..360.0`. For achromatic colors (chroma near
/// zero) the hue is numerically 0 and carries no meaning; the classifier
/// never reads it in that case because the gray threshold fires first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    /// Lightness: 0.0 (black) to 1.0 (white) for in-gamut colors.
    pub l: f32,
    /// Chroma: distance from the neutral axis (0.0 = gray).
    pub c: f32,
    /// Hue angle in degrees, `0.0..360.0`.
    pub h: f32,
}

/// Intermediate Oklab coordinates (Cartesian form of OkLCh).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

fn srgb_to_linear(u: f32) -> f32 {
    if u <= 0.04045 {
        u / 12.92
    } else {
        ((u + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(u: f32) -> f32 {
    if u <= 0.0031308 {
        u * 12.92
    } else {
        1.055 * u.powf(1.0 / 2.4) - 0.055
    }
}

impl From<Rgb> for Oklab {
    /// Convert sRGB bytes to Oklab (2021-01-25 matrices).
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r as f32 / 255.0);
        let g = srgb_to_linear(rgb.g as f32 / 255.0);
        let b = srgb_to_linear(rgb.b as f32 / 255.0);

        let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
        let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
        let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}

impl From<Oklab> for Rgb {
    /// Convert Oklab back to sRGB bytes, clamping out-of-gamut values.
    fn from(lab: Oklab) -> Self {
        let l_ = lab.l + 0.3963377774 * lab.a + 0.2158037573 * lab.b;
        let m_ = lab.l - 0.1055613458 * lab.a - 0.0638541728 * lab.b;
        let s_ = lab.l - 0.0894841775 * lab.a - 1.2914855480 * lab.b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
        let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
        let b = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

        let to_byte = |u: f32| (linear_to_srgb(u.clamp(0.0, 1.0)) * 255.0).round() as u8;
        Rgb {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
        }
    }
}

impl From<Oklab> for Oklch {
    fn from(lab: Oklab) -> Self {
        let c = (lab.a * lab.a + lab.b * lab.b).sqrt();
        // atan2(0, 0) is 0 in Rust, harmless since chroma is zero there
        let h = lab.b.atan2(lab.a).to_degrees().rem_euclid(360.0);
        Self { l: lab.l, c, h }
    }
}

impl From<Oklch> for Oklab {
    fn from(lch: Oklch) -> Self {
        let rad = lch.h.to_radians();
        Self {
            l: lch.l,
            a: lch.c * rad.cos(),
            b: lch.c * rad.sin(),
        }
    }
}

impl From<Rgb> for Oklch {
    fn from(rgb: Rgb) -> Self {
        Oklab::from(rgb).into()
    }
}

impl From<Oklch> for Rgb {
    fn from(lch: Oklch) -> Self {
        Oklab::from(lch).into()
    }
}

/// HSL hue angle in degrees, `0.0..360.0`.
///
/// Hue-sector binning deliberately uses the familiar HSL hue wheel
/// (red at 0°) rather than the OkLCh hue angle, so that bin names line
/// up with what users mean when they pick "red" or "yellow". OkLCh is
/// still used for the lightness/chroma thresholds. Returns 0.0 for
/// achromatic input.
pub fn hsl_hue(rgb: Rgb) -> f32 {
    let r = rgb.r as f32 / 255.0;
    let g = rgb.g as f32 / 255.0;
    let b = rgb.b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= f32::EPSILON {
        return 0.0;
    }
    let hue = if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    hue.rem_euclid(360.0)
}

/// Convert HSL (hue degrees, saturation 0..1, lightness 0..1) to sRGB.
///
/// Used to synthesize a representative swatch at a hue-sector center.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |u: f32| ((u + m).clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb {
        r: to_byte(r1),
        g: to_byte(g1),
        b: to_byte(b1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_hex_round_trip() {
        let cases = ["#ff0000", "#00ff00", "#0000ff", "#8b5a2b", "#f2f2f2"];
        for hex in cases {
            let rgb: Rgb = hex.parse().unwrap();
            assert_eq!(rgb.to_hex(), hex, "hex round-trip failed for {hex}");
        }
    }

    #[test]
    fn test_hex_without_hash() {
        let rgb: Rgb = "FF8000".parse().unwrap();
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_hex_rejects_malformed() {
        assert!("#fff".parse::<Rgb>().is_err(), "3-digit hex must fail");
        assert!("#gg0000".parse::<Rgb>().is_err(), "non-hex digits must fail");
        assert!("".parse::<Rgb>().is_err(), "empty string must fail");
        assert!("#ff00001".parse::<Rgb>().is_err(), "7 digits must fail");
    }

    #[test]
    fn test_white_and_black_extremes() {
        let white = Oklch::from(Rgb::new(255, 255, 255));
        assert!(
            approx_eq(white.l, 1.0, 1e-3),
            "white L should be 1.0, got {}",
            white.l
        );
        assert!(white.c < 1e-3, "white chroma should be 0, got {}", white.c);

        let black = Oklch::from(Rgb::new(0, 0, 0));
        assert!(
            approx_eq(black.l, 0.0, 1e-3),
            "black L should be 0.0, got {}",
            black.l
        );
        assert!(black.c < 1e-3, "black chroma should be 0, got {}", black.c);
    }

    #[test]
    fn test_gray_is_achromatic() {
        let gray = Oklch::from(Rgb::new(128, 128, 128));
        assert!(
            gray.c < 1e-3,
            "mid gray chroma should be near 0, got {}",
            gray.c
        );
        assert!(!gray.h.is_nan(), "hue must not be NaN for achromatic input");
    }

    #[test]
    fn test_pure_red_hue() {
        // OkLCh hue of sRGB red is ~29 degrees
        let red = Oklch::from(Rgb::new(255, 0, 0));
        assert!(
            red.h > 20.0 && red.h < 40.0,
            "red hue should be ~29 degrees, got {}",
            red.h
        );
        assert!(red.c > 0.2, "red should be strongly chromatic, got {}", red.c);
    }

    #[test]
    fn test_hue_is_normalized() {
        // Blue sits in the negative-b half plane, atan2 would give a
        // negative angle without normalization
        let blue = Oklch::from(Rgb::new(0, 0, 255));
        assert!(
            (0.0..360.0).contains(&blue.h),
            "hue must be normalized to 0..360, got {}",
            blue.h
        );
    }

    #[test]
    fn test_hsl_hue_primaries() {
        assert!(hsl_hue(Rgb::new(255, 0, 0)).abs() < 1e-4, "red hue is 0");
        assert!(
            (hsl_hue(Rgb::new(0, 255, 0)) - 120.0).abs() < 1e-4,
            "green hue is 120"
        );
        assert!(
            (hsl_hue(Rgb::new(0, 0, 255)) - 240.0).abs() < 1e-4,
            "blue hue is 240"
        );
        assert_eq!(hsl_hue(Rgb::new(90, 90, 90)), 0.0, "achromatic hue is 0");
    }

    #[test]
    fn test_hsl_to_rgb_round_trips_hue() {
        for sector in 0..18 {
            let center = sector as f32 * 20.0;
            let rgb = hsl_to_rgb(center, 0.75, 0.5);
            let hue = hsl_hue(rgb);
            let diff = (hue - center).abs().min(360.0 - (hue - center).abs());
            assert!(
                diff < 1.5,
                "hue drifted after byte quantization: sector center {center}, got {hue}"
            );
        }
    }

    #[test]
    fn test_rgb_oklch_round_trip() {
        let cases = [
            Rgb::new(200, 40, 30),
            Rgb::new(20, 150, 60),
            Rgb::new(60, 70, 220),
            Rgb::new(128, 128, 128),
            Rgb::new(139, 90, 43),
        ];
        for original in cases {
            let back = Rgb::from(Oklch::from(original));
            let dr = (original.r as i32 - back.r as i32).abs();
            let dg = (original.g as i32 - back.g as i32).abs();
            let db = (original.b as i32 - back.b as i32).abs();
            assert!(
                dr <= 1 && dg <= 1 && db <= 1,
                "round trip drifted more than 1 LSB: {original:?} -> {back:?}"
            );
        }
    }
}
