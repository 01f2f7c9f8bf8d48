//! The fixed color-bin taxonomy.
//!
//! Every stored histogram and every query-time target vector is indexed
//! by this one ordered list of bins: 18 equal-width hue sectors, the
//! achromatic categories Black/Gray/White, and a Brown carve-out for the
//! low-chroma orange/yellow range. Changing the bin count or meaning is
//! a taxonomy version bump and requires re-deriving every stored vector;
//! catalogs never mix taxonomies.

use crate::color::space::{hsl_to_rgb, Rgb};

/// Taxonomy version. Bump on any change to [`BIN_COUNT`] or bin meaning.
pub const TAXONOMY_VERSION: u32 = 3;

/// Number of hue sectors on the chromatic wheel.
pub const HUE_BIN_COUNT: usize = 18;

/// Width of one hue sector in degrees.
pub const HUE_SECTOR_WIDTH: f32 = 360.0 / HUE_BIN_COUNT as f32;

/// Total number of bins in a histogram vector.
pub const BIN_COUNT: usize = HUE_BIN_COUNT + 4;

/// One named category in the fixed taxonomy.
///
/// The discriminant is the bin's index in every histogram vector. The
/// 18 hue bins come first in hue order, achromatics last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Bin {
    Red = 0,
    Vermilion,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Mint,
    Teal,
    Cyan,
    SkyBlue,
    Blue,
    Indigo,
    Violet,
    Purple,
    Magenta,
    Fuchsia,
    Rose,
    Brown,
    Black,
    Gray,
    White,
}

impl Bin {
    /// All bins in histogram order.
    pub const ALL: [Bin; BIN_COUNT] = [
        Bin::Red,
        Bin::Vermilion,
        Bin::Orange,
        Bin::Amber,
        Bin::Yellow,
        Bin::Lime,
        Bin::Green,
        Bin::Mint,
        Bin::Teal,
        Bin::Cyan,
        Bin::SkyBlue,
        Bin::Blue,
        Bin::Indigo,
        Bin::Violet,
        Bin::Purple,
        Bin::Magenta,
        Bin::Fuchsia,
        Bin::Rose,
        Bin::Brown,
        Bin::Black,
        Bin::Gray,
        Bin::White,
    ];

    /// Index of this bin in a histogram vector.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The hue bin whose sector contains the given index, wrapping.
    #[inline]
    pub fn hue_bin(sector: usize) -> Bin {
        Bin::ALL[sector % HUE_BIN_COUNT]
    }

    pub fn name(self) -> &'static str {
        match self {
            Bin::Red => "Red",
            Bin::Vermilion => "Vermilion",
            Bin::Orange => "Orange",
            Bin::Amber => "Amber",
            Bin::Yellow => "Yellow",
            Bin::Lime => "Lime",
            Bin::Green => "Green",
            Bin::Mint => "Mint",
            Bin::Teal => "Teal",
            Bin::Cyan => "Cyan",
            Bin::SkyBlue => "SkyBlue",
            Bin::Blue => "Blue",
            Bin::Indigo => "Indigo",
            Bin::Violet => "Violet",
            Bin::Purple => "Purple",
            Bin::Magenta => "Magenta",
            Bin::Fuchsia => "Fuchsia",
            Bin::Rose => "Rose",
            Bin::Brown => "Brown",
            Bin::Black => "Black",
            Bin::Gray => "Gray",
            Bin::White => "White",
        }
    }

    /// True for the 18 chromatic hue sectors.
    #[inline]
    pub fn is_hue(self) -> bool {
        (self as usize) < HUE_BIN_COUNT
    }

    /// Center of this bin's hue sector in degrees. Hue bins only.
    #[inline]
    pub fn hue_center(self) -> Option<f32> {
        self.is_hue().then(|| self as usize as f32 * HUE_SECTOR_WIDTH)
    }

    /// A representative display color for this bin.
    ///
    /// Used when a catalog item's secondary histogram bins are turned
    /// back into seed colors for loadout composition. Hue bins map to a
    /// saturated mid-lightness color at the sector center; the special
    /// bins use fixed swatches.
    pub fn representative_color(self) -> Rgb {
        match self {
            Bin::Brown => Rgb::new(0x8b, 0x5a, 0x2b),
            Bin::Black => Rgb::new(0x08, 0x08, 0x08),
            Bin::Gray => Rgb::new(0x80, 0x80, 0x80),
            Bin::White => Rgb::new(0xf5, 0xf5, 0xf5),
            // hue bins always have a center
            hue => hsl_to_rgb(hue.hue_center().unwrap_or(0.0), 0.75, 0.5),
        }
    }
}
