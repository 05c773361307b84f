//! Color types and categorical palettes.
//!
//! Provides an RGBA color with CSS formatting, plus the
//! ColorBrewer `Pastel1` scheme used to tell continents apart.
//!
//! # References
//!
//! - Harrower, M., & Brewer, C. A. (2003). "ColorBrewer.org: An Online Tool for
//!   Selecting Colour Schemes for Maps." *The Cartographic Journal*, 40(1), 27-37.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Format as a CSS color (`rgb(...)` when opaque, `rgba(...)` otherwise).
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, f32::from(self.a) / 255.0)
        }
    }
}

/// ColorBrewer `Pastel1`, nine categorical colors (d3 `schemePastel1`).
pub const PASTEL1: [Rgba; 9] = [
    Rgba::rgb(0xfb, 0xb4, 0xae),
    Rgba::rgb(0xb3, 0xcd, 0xe3),
    Rgba::rgb(0xcc, 0xeb, 0xc5),
    Rgba::rgb(0xde, 0xcb, 0xe4),
    Rgba::rgb(0xfe, 0xd9, 0xa6),
    Rgba::rgb(0xff, 0xff, 0xcc),
    Rgba::rgb(0xe5, 0xd8, 0xbd),
    Rgba::rgb(0xfd, 0xda, 0xec),
    Rgba::rgb(0xf2, 0xf2, 0xf2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn test_to_css_opaque() {
        assert_eq!(Rgba::rgb(255, 0, 0).to_css(), "rgb(255,0,0)");
    }

    #[test]
    fn test_to_css_alpha() {
        let css = Rgba::new(255, 0, 0, 128).to_css();
        assert!(css.starts_with("rgba("));
        assert!(css.contains("0.502"));
    }

    #[test]
    fn test_pastel1_distinct() {
        for (i, a) in PASTEL1.iter().enumerate() {
            for b in &PASTEL1[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
