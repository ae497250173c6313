use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Series colours: arrival year → Color32
// ---------------------------------------------------------------------------

/// One distinct colour per arrival year for the trend lines.
#[derive(Debug, Clone)]
pub struct YearColors {
    mapping: BTreeMap<i64, Color32>,
    default_color: Color32,
}

impl YearColors {
    pub fn new(years: &[i64]) -> Self {
        let mapping = years
            .iter()
            .copied()
            .zip(generate_palette(years.len()))
            .collect();

        YearColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, year: i64) -> Color32 {
        self.mapping
            .get(&year)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// Piecewise-linear gradient in linear RGB.
#[derive(Debug, Clone)]
pub struct Gradient {
    stops: Vec<LinSrgb>,
}

impl Gradient {
    fn from_hex(stops: &[u32]) -> Self {
        let stops = stops
            .iter()
            .map(|&hex| {
                let [_, r, g, b] = hex.to_be_bytes();
                Srgb::new(r, g, b).into_format::<f32>().into_linear()
            })
            .collect();
        Gradient { stops }
    }

    /// Sequential dark-blue → purple → orange → yellow scale.
    pub fn plasma() -> Self {
        Self::from_hex(&[0x0d0887, 0x7e03a8, 0xcc4778, 0xf89540, 0xf0f921])
    }

    /// Diverging blue → light grey → red scale for values in [-1, 1].
    pub fn coolwarm() -> Self {
        Self::from_hex(&[0x3b4cc0, 0xdddddd, 0xb40426])
    }

    /// Colour at position `t` in [0, 1]; out-of-range values are clamped
    /// and NaN maps to the first stop.
    pub fn sample(&self, t: f64) -> Color32 {
        let t = (if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }) as f32;
        let segments = (self.stops.len() - 1) as f32;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        let mixed = self.stops[i].mix(self.stops[i + 1], pos - i as f32);
        to_color32(Srgb::from_linear(mixed))
    }

    /// Colour for `value` rescaled from `[min, max]`.
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Color32 {
        let span = max - min;
        if span.abs() < f64::EPSILON {
            return self.sample(0.5);
        }
        self.sample((value - min) / span)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 150.0 { Color32::BLACK } else { Color32::WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_year_colors_fall_back_to_gray() {
        let colors = YearColors::new(&[2015, 2016]);
        assert_ne!(colors.color_for(2015), colors.color_for(2016));
        assert_eq!(colors.color_for(1999), Color32::GRAY);
    }

    fn close(a: Color32, b: Color32) -> bool {
        a.to_array()
            .iter()
            .zip(b.to_array())
            .all(|(x, y)| x.abs_diff(y) <= 1)
    }

    #[test]
    fn test_gradient_endpoints() {
        let cw = Gradient::coolwarm();
        assert!(close(cw.sample(0.0), Color32::from_rgb(0x3b, 0x4c, 0xc0)));
        assert!(close(cw.sample(1.0), Color32::from_rgb(0xb4, 0x04, 0x26)));
        assert_eq!(cw.sample(7.0), cw.sample(1.0));
        assert_eq!(cw.sample_range(5.0, 5.0, 5.0), cw.sample(0.5));
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(contrasting_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrasting_text(Color32::from_rgb(0x0d, 0x08, 0x87)), Color32::WHITE);
    }
}
