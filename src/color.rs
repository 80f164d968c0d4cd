/// A 24-bit RGB color, the pixel format of the native driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);

    /// Create a new color from the given red, green, and blue components
    ///
    /// ```
    /// # use rgbmatrix::Color;
    /// let orange = Color::new(255, 165, 0);
    /// assert_eq!(orange.g, 165);
    /// ```
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a fully saturated color from a hue, starting at 0.0 (red) and ending at 1.0 (red).
    /// You can pass in any number though, because the cycle repeats (think the `x` in `sin(x)`)
    ///
    /// ```
    /// # use rgbmatrix::Color;
    /// assert_eq!(Color::from_hue(0.0), Color::RED);
    /// assert_eq!(Color::from_hue(1.0 / 3.0), Color::GREEN);
    /// assert_eq!(Color::from_hue(-1.0 / 3.0), Color::BLUE);
    /// ```
    pub fn from_hue(hue: f32) -> Self {
        let hue = hue.fract();
        let hue = if hue < 0.0 { 1.0 + hue } else { hue };

        let (r, g, b) = match hue * 6.0 {
            h if h < 1.0 => (1.0, h, 0.0),       // red -> yellow
            h if h < 2.0 => (2.0 - h, 1.0, 0.0), // yellow -> green
            h if h < 3.0 => (0.0, 1.0, h - 2.0), // green -> cyan
            h if h < 4.0 => (0.0, 4.0 - h, 1.0), // cyan -> blue
            h if h < 5.0 => (h - 4.0, 0.0, 1.0), // blue -> magenta
            h => (1.0, 0.0, 6.0 - h),            // magenta -> red
        };

        Self::new(to_channel(r), to_channel(g), to_channel(b))
    }

    /// Mix two colors together. The proportion of the second color is specified by
    /// `proportion_of_other` and clamped to 0..=1.
    ///
    /// ```
    /// # use rgbmatrix::Color;
    /// assert_eq!(Color::RED.mix(Color::BLUE, 0.0), Color::RED);
    /// assert_eq!(Color::BLACK.mix(Color::WHITE, 0.5), Color::new(128, 128, 128));
    /// ```
    pub fn mix(self, other: Color, proportion_of_other: f32) -> Color {
        let t = proportion_of_other.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| to_channel((a as f32 * (1.0 - t) + b as f32 * t) / 255.0);
        Self::new(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
        )
    }

    /// Scale every component by `factor`, saturating at 255
    pub fn scale(self, factor: f32) -> Color {
        let scale = |c: u8| to_channel(c as f32 * factor.max(0.0) / 255.0);
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Formats the color as `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl std::str::FromStr for Color {
    type Err = crate::MatrixError;

    /// Parses `#rrggbb` or `rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::MatrixError::InvalidOptions(format!("invalid color {:?}", s));

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl std::ops::Mul<f32> for Color {
    type Output = Self;

    fn mul(self, multiplier: f32) -> Self::Output {
        self.scale(multiplier)
    }
}

impl std::ops::Add for Color {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
        }
    }
}

impl std::ops::Sub for Color {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            r: self.r.saturating_sub(other.r),
            g: self.g.saturating_sub(other.g),
            b: self.b.saturating_sub(other.b),
        }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for (u8, u8, u8) {
    fn from(color: Color) -> Self {
        (color.r, color.g, color.b)
    }
}

#[cfg(feature = "embedded-graphics")]
impl From<Color> for embedded_graphics::pixelcolor::Rgb888 {
    fn from(color: Color) -> Self {
        Self::new(color.r, color.g, color.b)
    }
}

#[cfg(feature = "embedded-graphics")]
impl From<embedded_graphics::pixelcolor::Rgb888> for Color {
    fn from(color: embedded_graphics::pixelcolor::Rgb888) -> Self {
        use embedded_graphics::pixelcolor::RgbColor;

        Color::new(color.r(), color.g(), color.b())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_wraps_around() {
        assert_eq!(Color::from_hue(2.5), Color::from_hue(0.5));
        assert_eq!(Color::from_hue(0.5), Color::CYAN);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::new(255, 128, 0));
        assert_eq!("0000FF".parse::<Color>().unwrap(), Color::BLUE);
        assert!("#ff80".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert_eq!(Color::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(Color::new(200, 10, 0) + Color::new(100, 10, 0), Color::new(255, 20, 0));
        assert_eq!(Color::new(5, 5, 5) - Color::WHITE, Color::BLACK);
        assert_eq!(Color::new(200, 100, 0) * 2.0, Color::new(255, 200, 0));
        assert_eq!(Color::WHITE * 0.0, Color::BLACK);
    }
}
