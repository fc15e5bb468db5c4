use camino::Utf8Path;
use svg::node::element::{Circle, Line, Polyline, Rectangle, Text};
use svg::Document;

use crate::domain::SequenceRecord;
use crate::error::HarvestError;

const SVG_WIDTH: f32 = 1000.0;
const SVG_HEIGHT: f32 = 600.0;
const PLOT_LEFT: f32 = 90.0;
const PLOT_RIGHT: f32 = SVG_WIDTH - 50.0;
const PLOT_TOP: f32 = 70.0;
const PLOT_BOTTOM: f32 = SVG_HEIGHT - 160.0;
const MAX_X_LABELS: usize = 40;
const SERIES_COLOR: &str = "#1d4ed8";

pub fn sorted_by_length_desc(records: &[SequenceRecord]) -> Vec<SequenceRecord> {
    let mut sorted = records.to_vec();
    // Stable sort: equal lengths keep their fetch order.
    sorted.sort_by(|a, b| b.length.cmp(&a.length));
    sorted
}

/// Builds the length chart as an SVG document: accessions on x (descending
/// length order), residue counts on y, one marker per record.
pub fn length_chart_svg(records: &[SequenceRecord]) -> String {
    let sorted = sorted_by_length_desc(records);
    let max_length = sorted.iter().map(|r| r.length).max().unwrap_or(0).max(1);
    let n = sorted.len().max(1);

    let x_for = |idx: usize| {
        PLOT_LEFT + (PLOT_RIGHT - PLOT_LEFT) * (idx as f32 + 0.5) / n as f32
    };
    let y_for = |length: u64| {
        PLOT_BOTTOM - (PLOT_BOTTOM - PLOT_TOP) * (length as f32 / max_length as f32)
    };

    let mut doc = Document::new()
        .set("viewBox", format!("0 0 {SVG_WIDTH} {SVG_HEIGHT}"))
        .set("width", SVG_WIDTH)
        .set("height", SVG_HEIGHT)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", SVG_WIDTH)
                .set("height", SVG_HEIGHT)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new("GenBank Records Sorted by Sequence Length")
                .set("x", SVG_WIDTH / 2.0)
                .set("y", 40.0)
                .set("text-anchor", "middle")
                .set("font-family", "monospace")
                .set("font-size", 18)
                .set("fill", "#0f172a"),
        )
        .add(
            Line::new()
                .set("x1", PLOT_LEFT)
                .set("y1", PLOT_BOTTOM)
                .set("x2", PLOT_RIGHT)
                .set("y2", PLOT_BOTTOM)
                .set("stroke", "#374151")
                .set("stroke-width", 1),
        )
        .add(
            Line::new()
                .set("x1", PLOT_LEFT)
                .set("y1", PLOT_TOP)
                .set("x2", PLOT_LEFT)
                .set("y2", PLOT_BOTTOM)
                .set("stroke", "#374151")
                .set("stroke-width", 1),
        )
        .add(
            Text::new("Accession Number")
                .set("x", (PLOT_LEFT + PLOT_RIGHT) / 2.0)
                .set("y", SVG_HEIGHT - 14.0)
                .set("text-anchor", "middle")
                .set("font-family", "monospace")
                .set("font-size", 13)
                .set("fill", "#374151"),
        )
        .add(
            Text::new("Sequence Length")
                .set("x", 24.0)
                .set("y", (PLOT_TOP + PLOT_BOTTOM) / 2.0)
                .set(
                    "transform",
                    format!(
                        "rotate(-90 24 {})",
                        (PLOT_TOP + PLOT_BOTTOM) / 2.0
                    ),
                )
                .set("text-anchor", "middle")
                .set("font-family", "monospace")
                .set("font-size", 13)
                .set("fill", "#374151"),
        );

    let step = nice_step(max_length);
    let mut tick = 0u64;
    while tick <= max_length {
        let y = y_for(tick);
        doc = doc
            .add(
                Line::new()
                    .set("x1", PLOT_LEFT - 4.0)
                    .set("y1", y)
                    .set("x2", PLOT_RIGHT)
                    .set("y2", y)
                    .set("stroke", "#e5e7eb")
                    .set("stroke-width", 1),
            )
            .add(
                Text::new(tick.to_string())
                    .set("x", PLOT_LEFT - 8.0)
                    .set("y", y + 4.0)
                    .set("text-anchor", "end")
                    .set("font-family", "monospace")
                    .set("font-size", 11)
                    .set("fill", "#374151"),
            );
        tick += step;
    }

    let label_step = sorted.len().div_ceil(MAX_X_LABELS).max(1);
    for (idx, record) in sorted.iter().enumerate() {
        if idx % label_step != 0 {
            continue;
        }
        let x = x_for(idx);
        let y = PLOT_BOTTOM + 10.0;
        doc = doc.add(
            Text::new(record.accession.clone())
                .set("x", x)
                .set("y", y)
                .set("transform", format!("rotate(90 {x} {y})"))
                .set("font-family", "monospace")
                .set("font-size", 10)
                .set("fill", "#374151"),
        );
    }

    let points = sorted
        .iter()
        .enumerate()
        .map(|(idx, record)| format!("{},{}", x_for(idx), y_for(record.length)))
        .collect::<Vec<_>>()
        .join(" ");
    doc = doc.add(
        Polyline::new()
            .set("points", points)
            .set("fill", "none")
            .set("stroke", SERIES_COLOR)
            .set("stroke-width", 1.5),
    );
    for (idx, record) in sorted.iter().enumerate() {
        doc = doc.add(
            Circle::new()
                .set("cx", x_for(idx))
                .set("cy", y_for(record.length))
                .set("r", 3.0)
                .set("fill", SERIES_COLOR),
        );
    }

    doc = doc
        .add(
            Line::new()
                .set("x1", PLOT_RIGHT - 160.0)
                .set("y1", PLOT_TOP - 10.0)
                .set("x2", PLOT_RIGHT - 130.0)
                .set("y2", PLOT_TOP - 10.0)
                .set("stroke", SERIES_COLOR)
                .set("stroke-width", 1.5),
        )
        .add(
            Text::new("Sequence Length")
                .set("x", PLOT_RIGHT - 124.0)
                .set("y", PLOT_TOP - 6.0)
                .set("font-family", "monospace")
                .set("font-size", 12)
                .set("fill", "#0f172a"),
        );

    doc.to_string()
}

pub fn render_length_chart(
    records: &[SequenceRecord],
    path: &Utf8Path,
) -> Result<(), HarvestError> {
    let svg_text = length_chart_svg(records);
    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = resvg::usvg::Tree::from_str(&svg_text, &options)
        .map_err(|err| HarvestError::Chart(err.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| HarvestError::Chart("zero-sized chart surface".to_string()))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );
    pixmap
        .save_png(path.as_std_path())
        .map_err(|err| HarvestError::Chart(err.to_string()))?;
    Ok(())
}

fn nice_step(max: u64) -> u64 {
    let target = (max / 5).max(1);
    let mut base = 1u64;
    loop {
        for mult in [1u64, 2, 5] {
            let candidate = base.saturating_mul(mult);
            if candidate >= target {
                return candidate;
            }
        }
        base = base.saturating_mul(10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(accession: &str, length: u64) -> SequenceRecord {
        SequenceRecord {
            accession: accession.to_string(),
            length,
            description: String::new(),
        }
    }

    #[test]
    fn sorts_descending_and_keeps_ties_stable() {
        let records = vec![
            record("A1", 100),
            record("B2", 300),
            record("C3", 100),
            record("D4", 200),
        ];
        let sorted = sorted_by_length_desc(&records);
        let order: Vec<&str> = sorted.iter().map(|r| r.accession.as_str()).collect();
        assert_eq!(order, vec!["B2", "D4", "A1", "C3"]);
    }

    #[test]
    fn svg_labels_follow_descending_length_order() {
        let records = vec![record("SHORT.1", 10), record("LONG.1", 500)];
        let chart = length_chart_svg(&records);
        let long_at = chart.find("LONG.1").unwrap();
        let short_at = chart.find("SHORT.1").unwrap();
        assert!(long_at < short_at);
        assert!(chart.contains("GenBank Records Sorted by Sequence Length"));
    }

    #[test]
    fn nice_step_rounds_to_1_2_5() {
        assert_eq!(nice_step(5), 1);
        assert_eq!(nice_step(10), 2);
        assert_eq!(nice_step(100), 20);
        assert_eq!(nice_step(2400), 500);
        assert_eq!(nice_step(1), 1);
    }
}
