//! Named kinemage colors.

use std::fmt;

/// A color in kinemage HSV space (hue 0-360, saturation and value 0-100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvColor {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation percentage.
    pub s: f64,
    /// Value percentage.
    pub v: f64,
}

impl HsvColor {
    /// Create a color from HSV components.
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Linear interpolation between two colors, `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            h: (other.h - self.h).mul_add(t, self.h),
            s: (other.s - self.s).mul_add(t, self.s),
            v: (other.v - self.v).mul_add(t, self.v),
        }
    }

    /// Convert to 8-bit RGB.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::many_single_char_names
    )]
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let v = (self.v / 100.0).clamp(0.0, 1.0);
        let h = self.h.rem_euclid(360.0) / 60.0;

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u8 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_byte = |f: f64| ((f + m) * 255.0).round() as u8;
        (to_byte(r), to_byte(g), to_byte(b))
    }
}

/// A named color as written into a kinemage.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    /// Name referenced by `color=` attributes.
    pub name: String,
    /// Color value.
    pub hsv: HsvColor,
}

impl NamedColor {
    /// Create a named color.
    pub fn new(name: impl Into<String>, hsv: HsvColor) -> Self {
        Self {
            name: name.into(),
            hsv,
        }
    }
}

impl fmt::Display for NamedColor {
    /// Kinemage `@hsvcolor` declaration.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@hsvcolor {{{}}} {} {} {}",
            self.name, self.hsv.h, self.hsv.s, self.hsv.v
        )
    }
}

/// Palette in assignment order.
pub const DATA_COLORS: &[(&str, HsvColor)] = &[
    ("red1", HsvColor::new(0.0, 100.0, 100.0)),
    ("blue1", HsvColor::new(240.0, 100.0, 100.0)),
    ("orange1", HsvColor::new(28.0, 98.0, 95.0)),
    ("green1", HsvColor::new(120.0, 100.0, 100.0)),
    ("purple1", HsvColor::new(302.0, 73.0, 57.0)),
    ("yellow1", HsvColor::new(60.0, 100.0, 100.0)),
    ("cyan1", HsvColor::new(180.0, 100.0, 100.0)),
    ("pink1", HsvColor::new(333.0, 37.0, 96.0)),
    ("teal1", HsvColor::new(178.0, 42.0, 63.0)),
    ("brown1", HsvColor::new(36.0, 89.0, 42.0)),
    ("gray1", HsvColor::new(0.0, 0.0, 50.0)),
    ("lime", HsvColor::new(83.0, 100.0, 100.0)),
    ("red2", HsvColor::new(14.0, 100.0, 90.0)),
    ("blue2", HsvColor::new(211.0, 42.0, 85.0)),
    ("orange2", HsvColor::new(32.0, 100.0, 100.0)),
    ("green2", HsvColor::new(142.0, 36.0, 79.0)),
    ("purple2", HsvColor::new(269.0, 29.0, 75.0)),
    ("yellow2", HsvColor::new(60.0, 61.0, 100.0)),
    ("cyan2", HsvColor::new(187.0, 60.0, 100.0)),
    ("pink2", HsvColor::new(300.0, 22.0, 100.0)),
    ("teal2", HsvColor::new(157.0, 100.0, 57.0)),
    ("brown2", HsvColor::new(33.0, 45.0, 77.0)),
    ("gray2", HsvColor::new(0.0, 0.0, 79.0)),
    ("red3", HsvColor::new(5.0, 80.0, 60.0)),
    ("blue3", HsvColor::new(230.0, 70.0, 55.0)),
    ("orange3", HsvColor::new(20.0, 90.0, 80.0)),
    ("green3", HsvColor::new(100.0, 80.0, 40.0)),
    ("purple3", HsvColor::new(280.0, 70.0, 45.0)),
    ("yellow3", HsvColor::new(50.0, 100.0, 75.0)),
    ("cyan3", HsvColor::new(190.0, 80.0, 65.0)),
    ("pink3", HsvColor::new(320.0, 60.0, 85.0)),
    ("teal3", HsvColor::new(165.0, 80.0, 40.0)),
    ("brown3", HsvColor::new(25.0, 70.0, 30.0)),
    ("gray3", HsvColor::new(0.0, 0.0, 30.0)),
];

/// Colors that may be referenced by name but are never auto-assigned.
const EXTRA_COLORS: &[(&str, HsvColor)] = &[
    ("white", HsvColor::new(180.0, 0.0, 100.0)),
    ("black", HsvColor::new(0.0, 0.0, 0.0)),
];

/// Look up a named color.
pub fn lookup(name: &str) -> Option<NamedColor> {
    DATA_COLORS
        .iter()
        .chain(EXTRA_COLORS)
        .find(|(n, _)| *n == name)
        .map(|(n, hsv)| NamedColor::new(*n, *hsv))
}
