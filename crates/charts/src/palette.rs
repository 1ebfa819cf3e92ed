use plotters::style::RGBColor;

/// Bar fill shared by the bar charts.
pub const BAR: RGBColor = RGBColor(76, 114, 176);
/// Density overlay.
pub const CURVE: RGBColor = RGBColor(196, 78, 82);
/// Heatmap cells that have no correlation value.
pub const MISSING: RGBColor = RGBColor(204, 204, 204);

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Diverging blue-grey-red colour for a correlation in `[-1, 1]`.
pub fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return MISSING;
    }
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COOL, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, WARM, v)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}
