use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use crate::data::aggregate::SegmentSplit;

const DIAMETER: f32 = 260.0;
const START_ANGLE_DEG: f32 = 140.0;
const SLICE_COLORS: [Color32; 2] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
];

/// Point on the circle at `angle` radians, counter-clockwise from +x.
fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::new(angle.cos(), -angle.sin()) * radius
}

/// Fractions of the whole for each count; all zero when the total is zero.
fn fractions(counts: &[usize]) -> Vec<f32> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f32 / total as f32).collect()
}

/// Two-slice pie of the market segment split with percentage labels.
pub fn segment_pie(ui: &mut Ui, split: &SegmentSplit) {
    if split.total() == 0 {
        ui.label("No bookings for this period.");
        return;
    }

    let slices = split.chart_slices();
    let shares = fractions(&slices.map(|(_, n)| n));

    let size = Vec2::new(DIAMETER * 1.8, DIAMETER + 20.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let center = response.rect.center();
    let radius = DIAMETER / 2.0;

    let mut angle = START_ANGLE_DEG.to_radians();
    for (((label, count), share), color) in slices.iter().zip(&shares).zip(SLICE_COLORS) {
        if *share <= 0.0 {
            continue;
        }
        let sweep = share * TAU;

        // Sub-sectors of at most 30° keep every polygon convex.
        let steps = ((sweep / 30f32.to_radians()).ceil() as usize).max(1);
        let arc_points = 8;
        for s in 0..steps {
            let a0 = angle + sweep * s as f32 / steps as f32;
            let a1 = angle + sweep * (s + 1) as f32 / steps as f32;
            let mut points = vec![center];
            points.extend((0..=arc_points).map(|k| {
                on_circle(center, radius, a0 + (a1 - a0) * k as f32 / arc_points as f32)
            }));
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }

        let mid = angle + sweep / 2.0;
        painter.text(
            on_circle(center, radius * 0.6, mid),
            Align2::CENTER_CENTER,
            format!("{:.1}%", share * 100.0),
            FontId::proportional(14.0),
            Color32::WHITE,
        );
        let outside = on_circle(center, radius * 1.12, mid);
        let anchor = if outside.x < center.x {
            Align2::RIGHT_CENTER
        } else {
            Align2::LEFT_CENTER
        };
        painter.text(
            outside,
            anchor,
            format!("{label} ({count})"),
            FontId::proportional(14.0),
            ui.visuals().text_color(),
        );

        angle += sweep;
    }

    response.on_hover_text(format!(
        "Online TA bookings: {}\nOther segments: {}",
        split.online_ta, split.other
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractions() {
        assert_eq!(fractions(&[1, 3]), vec![0.25, 0.75]);
        assert_eq!(fractions(&[0, 0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_on_circle_is_counter_clockwise_on_screen() {
        let c = Pos2::new(10.0, 10.0);
        let top = on_circle(c, 5.0, TAU / 4.0);
        assert!((top.x - 10.0).abs() < 1e-4);
        assert!((top.y - 5.0).abs() < 1e-4);
    }
}
