use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lab, Srgb};

use crate::report::view::{ChartSeries, OutcomeStyle};

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
            // Start at blue so the first hues stay clear of green/red/yellow.
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.45, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Parse `#rrggbb`.
fn from_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Fill colour for each series: the reserved colour for recognised outcomes,
/// a generated one for any other label.
pub fn series_colors(series: &[ChartSeries]) -> Vec<Color32> {
    let unstyled = series
        .iter()
        .filter(|s| s.style == OutcomeStyle::Unstyled)
        .count();
    let mut fallback = generate_palette(unstyled).into_iter();
    series
        .iter()
        .map(|s| {
            s.style
                .hex()
                .and_then(from_hex)
                .or_else(|| fallback.next())
                .unwrap_or(Color32::GRAY)
        })
        .collect()
}

/// Black or white, whichever reads better on `fill`.
pub fn label_color(fill: Color32) -> Color32 {
    let rgb = Srgb::new(
        fill.r() as f32 / 255.0,
        fill.g() as f32 / 255.0,
        fill.b() as f32 / 255.0,
    );
    let lab: Lab = rgb.into_color();
    if lab.l > 60.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Outcome;

    fn series(outcome: Outcome) -> ChartSeries {
        ChartSeries {
            style: OutcomeStyle::of(&outcome),
            outcome,
            segments: Vec::new(),
        }
    }

    #[test]
    fn reserved_colours_are_used() {
        let colors = series_colors(&[
            series(Outcome::Resistant),
            series(Outcome::Other("SDD".into())),
            series(Outcome::Susceptible),
        ]);
        assert_eq!(colors[0], Color32::from_rgb(0xe7, 0x4c, 0x3c));
        assert_eq!(colors[2], Color32::from_rgb(0x2e, 0xcc, 0x71));
        assert_eq!(colors[1], generate_palette(1)[0]);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(from_hex("#f1c40f"), Some(Color32::from_rgb(0xf1, 0xc4, 0x0f)));
        assert_eq!(from_hex("f1c40f"), None);
        assert_eq!(from_hex("#zzzzzz"), None);
    }

    #[test]
    fn label_contrast() {
        assert_eq!(label_color(Color32::from_rgb(0xf1, 0xc4, 0x0f)), Color32::BLACK);
        assert_eq!(label_color(Color32::from_rgb(0x20, 0x20, 0x60)), Color32::WHITE);
    }
}
