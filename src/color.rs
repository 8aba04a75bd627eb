use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

/// Fill used by every ranked bar chart.
pub const BAR_COLOR: Color32 = Color32::from_rgb(0x72, 0xBC, 0xD4);

/// Colour for points without a review score.
pub const MISSING_COLOR: Color32 = Color32::GRAY;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential scale: review score → Color32
// ---------------------------------------------------------------------------

/// Anchor colours of the viridis map, dark purple to yellow.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

fn anchor((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Sample the viridis map at `t` in `[0, 1]`, interpolating in linear RGB.
pub fn viridis(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let mixed = anchor(VIRIDIS[i]).mix(anchor(VIRIDIS[i + 1]), scaled - i as f32);
    let rgb: Srgb<u8> = Srgb::from_linear(mixed);
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Maps review scores onto the viridis scale between the lowest and highest
/// score present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewColorScale {
    min: f64,
    max: f64,
}

impl ReviewColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn color_for(&self, score: Option<f64>) -> Color32 {
        let Some(score) = score else {
            return MISSING_COLOR;
        };
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return viridis(1.0);
        }
        viridis(((score - self.min) / range) as f32)
    }
}
