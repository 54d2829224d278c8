//! Stroke colors.
//!
//! Plotter output only needs flat sRGB strokes, written as `#rrggbb`.

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
    pub const BLUE: Srgb = Srgb::new(0.0, 0.0, 1.0);
    pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    ///
    /// Components are clamped to [0, 1] and quantized to 8 bits.
    pub fn to_hex(self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_have_expected_hex() {
        assert_eq!(Srgb::BLACK.to_hex(), "#000000");
        assert_eq!(Srgb::BLUE.to_hex(), "#0000ff");
        assert_eq!(Srgb::RED.to_hex(), "#ff0000");
    }

    #[test]
    fn to_hex_clamps_and_rounds_components() {
        assert_eq!(Srgb::new(-0.5, 2.0, 0.5).to_hex(), "#00ff80");
    }
}
