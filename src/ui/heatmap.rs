use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};

use crate::color::{Gradient, contrasting_text};
use crate::data::correlation::CorrelationMatrix;

const MAX_CELL: f32 = 64.0;
const MIN_CELL: f32 = 28.0;
const LABEL_WIDTH: f32 = 170.0;
const LABEL_CHARS: usize = 22;

fn short_label(name: &str) -> String {
    if name.chars().count() <= LABEL_CHARS {
        name.to_string()
    } else {
        let head: String = name.chars().take(LABEL_CHARS - 1).collect();
        format!("{head}…")
    }
}

/// Annotation for one cell; undefined correlations are left blank.
fn cell_text(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:.2}")
    }
}

/// Grid cell under an offset inside the grid. Float rounding at the far
/// edges can land on `n`, so both indices are clamped.
fn hovered_cell(rel: Vec2, cell: f32, n: usize) -> (usize, usize) {
    let last = n.saturating_sub(1);
    (((rel.y / cell) as usize).min(last), ((rel.x / cell) as usize).min(last))
}

/// Annotated correlation grid on a diverging scale from -1 to 1.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.size();
    let cell = ((ui.available_width() - LABEL_WIDTH) / n as f32).clamp(MIN_CELL, MAX_CELL);
    let grid = cell * n as f32;
    let size = Vec2::new(LABEL_WIDTH + grid, grid + LABEL_WIDTH * 0.6);

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + Vec2::new(LABEL_WIDTH, 0.0);
    let scale = Gradient::coolwarm();
    let font = FontId::proportional((cell * 0.28).clamp(9.0, 13.0));
    let text_color = ui.visuals().text_color();

    for row in 0..n {
        for col in 0..n {
            let value = matrix.get(row, col);
            let rect = Rect::from_min_size(
                origin + Vec2::new(col as f32 * cell, row as f32 * cell),
                Vec2::splat(cell),
            );
            let fill = if value.is_nan() {
                Color32::from_gray(90)
            } else {
                scale.sample((value + 1.0) / 2.0)
            };
            painter.rect(
                rect,
                0.0,
                fill,
                Stroke::new(1.0, Color32::from_gray(40)),
                StrokeKind::Inside,
            );
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                cell_text(value),
                font.clone(),
                contrasting_text(fill),
            );
        }

        // Row label, right-aligned against the grid.
        painter.text(
            Pos2::new(origin.x - 6.0, origin.y + (row as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            short_label(&matrix.columns[row]),
            font.clone(),
            text_color,
        );
    }

    // Column labels below the grid, staggered so neighbours don't collide.
    for (col, name) in matrix.columns.iter().enumerate() {
        let offset = if col % 2 == 0 { 10.0 } else { 26.0 };
        painter.text(
            Pos2::new(origin.x + (col as f32 + 0.5) * cell, origin.y + grid + offset),
            Align2::CENTER_CENTER,
            short_label(name),
            font.clone(),
            text_color,
        );
    }

    if let Some(pos) = response.hover_pos() {
        let rel = pos - origin;
        if rel.x >= 0.0 && rel.y >= 0.0 && rel.x < grid && rel.y < grid {
            let (row, col) = hovered_cell(rel, cell, n);
            let value = matrix.get(row, col);
            let shown = if value.is_nan() {
                "undefined".to_string()
            } else {
                format!("{value:.4}")
            };
            response.on_hover_text(format!(
                "{} × {}: {shown}",
                matrix.columns[row], matrix.columns[col]
            ));
        }
    }
}
