use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

pub const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);
pub const LIGHT_GREEN: Color32 = Color32::from_rgb(144, 238, 144);
/// Cells whose value is undefined.
pub const MISSING: Color32 = Color32::from_rgb(120, 120, 120);

const COOLWARM: [(u8, u8, u8); 3] = [(59, 76, 192), (221, 221, 221), (180, 4, 38)];

const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

// ---------------------------------------------------------------------------
// Colour scales
// ---------------------------------------------------------------------------

fn to_linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0).into_linear()
}

fn to_color32(lin: LinSrgb) -> Color32 {
    let rgb: Srgb = Srgb::from_linear(lin);
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Piecewise-linear interpolation over evenly spaced anchors, `t` in `[0, 1]`.
fn sample(anchors: &[(u8, u8, u8)], t: f32) -> Color32 {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let segments = (anchors.len() - 1) as f32;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(anchors.len() - 2);
    let local = pos - idx as f32;
    to_color32(to_linear(anchors[idx]).mix(to_linear(anchors[idx + 1]), local))
}

/// Diverging blue-white-red scale centred at zero; `limit` is the value
/// mapped to either end (the largest absolute coefficient).
pub fn coolwarm(value: f64, limit: f64) -> Color32 {
    if limit <= 0.0 {
        return sample(&COOLWARM, 0.5);
    }
    let t = 0.5 + 0.5 * (value / limit);
    sample(&COOLWARM, t as f32)
}

/// `n` colours sampled from the inner part of the viridis map, one per bar.
pub fn viridis_palette(n: usize) -> Vec<Color32> {
    (1..=n)
        .map(|i| sample(&VIRIDIS, i as f32 / (n + 1) as f32))
        .collect()
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolwarm_ends_and_centre() {
        assert_eq!(coolwarm(-1.0, 1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(coolwarm(1.0, 1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(coolwarm(0.0, 1.0), Color32::from_rgb(221, 221, 221));
        assert_eq!(coolwarm(0.3, 0.0), Color32::from_rgb(221, 221, 221));
    }

    #[test]
    fn viridis_runs_dark_to_light() {
        let colors = viridis_palette(5);
        assert_eq!(colors.len(), 5);
        let first = colors[0];
        let last = colors[4];
        assert!(first.g() < last.g());
        assert!(viridis_palette(0).is_empty());
    }

    #[test]
    fn text_contrasts_with_cell() {
        assert_eq!(contrast_text(Color32::from_rgb(59, 76, 192)), Color32::WHITE);
        assert_eq!(contrast_text(Color32::from_rgb(221, 221, 221)), Color32::BLACK);
    }
}
