use crate::error::{drawing, ChartError};
use crate::palette::{coolwarm, BAR, CURVE};
use analytics::{CorrelationMatrix, DatasetSummary, Histogram};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub const AMOUNT_DISTRIBUTION: &str = "amount_distribution.png";
pub const TOP_COUNTRIES: &str = "top_countries.png";
pub const FRAUD_BY_VENDOR: &str = "fraud_by_vendor.png";
pub const TRANSACTIONS_BY_HOUR: &str = "transactions_by_hour.png";
pub const CORRELATION_HEATMAP: &str = "correlation_heatmap.png";

/// Every file `render_all` writes, in rendering order.
pub const CHART_FILES: [&str; 5] = [
    AMOUNT_DISTRIBUTION,
    TOP_COUNTRIES,
    FRAUD_BY_VENDOR,
    TRANSACTIONS_BY_HOUR,
    CORRELATION_HEATMAP,
];

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 22;
const COLORBAR_WIDTH: u32 = 110;

/// Pixel dimensions of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Draws the analysis charts into one output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    size: ChartSize,
    heatmap_size: ChartSize,
    top_countries: usize,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, size: ChartSize, heatmap_size: ChartSize) -> Self {
        Self {
            output_dir: output_dir.into(),
            size,
            heatmap_size,
            top_countries: 10,
        }
    }

    /// Sets the N shown in the country ranking's title.
    pub fn with_top_countries(mut self, n: usize) -> Self {
        self.top_countries = n;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders all five charts, overwriting files of the same name.
    pub fn render_all(&self, summary: &DatasetSummary) -> Result<(), ChartError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ChartError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        self.amount_distribution(&summary.amount_histogram)?;

        let (labels, counts): (Vec<String>, Vec<f64>) = summary
            .top_countries
            .iter()
            .map(|c| (c.label.clone(), c.count as f64))
            .unzip();
        let title = format!("Топ-{} стран по количеству транзакций", self.top_countries);
        self.horizontal_bars(
            TOP_COUNTRIES,
            &title,
            "Количество",
            "Страна",
            &labels,
            &counts,
        )?;

        let (labels, shares): (Vec<String>, Vec<f64>) = summary
            .fraud_by_category
            .iter()
            .map(|c| (c.category.clone(), c.rate * 100.0))
            .unzip();
        self.horizontal_bars(
            FRAUD_BY_VENDOR,
            "Доля мошенничества по категориям вендоров (%)",
            "Доля мошеннических операций (%)",
            "Категория",
            &labels,
            &shares,
        )?;

        self.hourly_counts(summary)?;
        self.correlation_heatmap(&summary.correlation)?;

        tracing::debug!(dir = %self.output_dir.display(), "Charts rendered.");
        Ok(())
    }

    fn path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    fn amount_distribution(&self, histogram: &Histogram) -> Result<(), ChartError> {
        let path = self.path(AMOUNT_DISTRIBUTION);
        let root = blank(&path, self.size)?;

        let (x_lo, x_hi) = match (histogram.edges.first(), histogram.edges.last()) {
            (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
            _ => (0.0, 1.0),
        };
        let tallest = histogram
            .counts
            .iter()
            .map(|&c| c as f64)
            .chain(histogram.density.iter().map(|&(_, y)| y))
            .fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption("Распределение сумм транзакций (USD)", (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, 0.0..axis_max(tallest))
            .map_err(drawing)?;
        chart
            .configure_mesh()
            .x_desc("Сумма в USD")
            .y_desc("Количество транзакций")
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(histogram.counts.iter().enumerate().map(|(i, &count)| {
                Rectangle::new(
                    [(histogram.edges[i], 0.0), (histogram.edges[i + 1], count as f64)],
                    BAR.mix(0.75).filled(),
                )
            }))
            .map_err(drawing)?;
        chart
            .draw_series(LineSeries::new(
                histogram.density.iter().copied(),
                CURVE.stroke_width(2),
            ))
            .map_err(drawing)?;

        finish(&root, &path)
    }

    /// Ranked horizontal bars; the first label is drawn at the top.
    fn horizontal_bars(
        &self,
        file: &str,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        labels: &[String],
        values: &[f64],
    ) -> Result<(), ChartError> {
        let path = self.path(file);
        let root = blank(&path, self.size)?;
        let rows = labels.len() as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(label_area(labels))
            .build_cartesian_2d(
                0.0..axis_max(values.iter().copied().fold(0.0, f64::max)),
                (0..rows.max(1)).into_segmented(),
            )
            .map_err(drawing)?;

        let formatter = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(row) => label_at_row(labels, *row).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(labels.len().max(1))
            .y_label_formatter(&formatter)
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &value)| {
                let row = top_down_row(i, labels.len());
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(row)), (value, SegmentValue::Exact(row + 1))],
                    BAR.filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            }))
            .map_err(drawing)?;

        finish(&root, &path)
    }

    fn hourly_counts(&self, summary: &DatasetSummary) -> Result<(), ChartError> {
        let path = self.path(TRANSACTIONS_BY_HOUR);
        let root = blank(&path, self.size)?;
        let hours = &summary.transactions_by_hour;
        let tallest = hours.iter().map(|h| h.count as f64).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption("Распределение транзакций по часам суток", (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(
                (0..(hours.len() as i32).max(1)).into_segmented(),
                0.0..axis_max(tallest),
            )
            .map_err(drawing)?;

        let formatter = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) => hours
                .get(*i as usize)
                .map(|h| h.hour.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(hours.len().max(1))
            .x_label_formatter(&formatter)
            .x_desc("Час")
            .y_desc("Количество транзакций")
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(hours.iter().enumerate().map(|(i, h)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), h.count as f64)],
                    BAR.filled(),
                );
                bar.set_margin(0, 0, 2, 2);
                bar
            }))
            .map_err(drawing)?;

        finish(&root, &path)
    }

    fn correlation_heatmap(&self, matrix: &CorrelationMatrix) -> Result<(), ChartError> {
        let path = self.path(CORRELATION_HEATMAP);
        let root = blank(&path, self.heatmap_size)?;
        let split = self.heatmap_size.width.saturating_sub(COLORBAR_WIDTH);
        let (cells_area, bar_area) = root.split_horizontally(split);

        let k = matrix.len() as i32;

        let mut chart = ChartBuilder::on(&cells_area)
            .caption("Корреляция числовых признаков", (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(label_area(&matrix.names))
            .y_label_area_size(label_area(&matrix.names))
            .build_cartesian_2d((0..k.max(1)).into_segmented(), (0..k.max(1)).into_segmented())
            .map_err(drawing)?;

        let x_formatter = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(j) => matrix.names.get(*j as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        let y_formatter = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(row) => {
                label_at_row(&matrix.names, *row).cloned().unwrap_or_default()
            }
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(matrix.len().max(1))
            .y_labels(matrix.len().max(1))
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(matrix.values.iter().enumerate().flat_map(|(i, row)| {
                let y = top_down_row(i, matrix.len());
                row.iter().enumerate().map(move |(j, &value)| {
                    let x = j as i32;
                    Rectangle::new(
                        [(SegmentValue::Exact(x), SegmentValue::Exact(y)),
                         (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1))],
                        coolwarm(value).filled(),
                    )
                })
            }))
            .map_err(drawing)?;

        colorbar(&bar_area)?;
        finish(&root, &path)
    }
}

fn blank<'a>(path: &'a Path, size: ChartSize) -> Result<Area<'a>, ChartError> {
    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;
    Ok(root)
}

fn finish(root: &Area<'_>, path: &Path) -> Result<(), ChartError> {
    root.present().map_err(drawing)?;
    tracing::debug!(path = %path.display(), "Chart written.");
    Ok(())
}

/// Vertical colour scale for the heatmap, from -1 at the bottom to 1 at the top.
fn colorbar(area: &Area<'_>) -> Result<(), ChartError> {
    const STEPS: usize = 100;

    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(60)
        .margin_right(15)
        .y_label_area_size(45)
        .build_cartesian_2d(0.0..1.0, -1.0..1.0)
        .map_err(drawing)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .draw()
        .map_err(drawing)?;

    let step = 2.0 / STEPS as f64;
    chart
        .draw_series((0..STEPS).map(|i| {
            let lo = -1.0 + step * i as f64;
            Rectangle::new([(0.0, lo), (1.0, lo + step)], coolwarm(lo + step / 2.0).filled())
        }))
        .map_err(drawing)?;
    Ok(())
}

/// Plot row of the `index`-th of `rows` items; plotters counts rows from the
/// bottom, so the first item lands on the top row.
pub(crate) fn top_down_row(index: usize, rows: usize) -> i32 {
    rows as i32 - 1 - index as i32
}

/// Inverse of [`top_down_row`]: the label drawn on plot row `row`.
pub(crate) fn label_at_row(labels: &[String], row: i32) -> Option<&String> {
    let index = labels.len() as i32 - 1 - row;
    usize::try_from(index).ok().and_then(|i| labels.get(i))
}

/// Upper bound of a value axis with some headroom; never empty.
pub(crate) fn axis_max(tallest: f64) -> f64 {
    if tallest > 0.0 && tallest.is_finite() {
        tallest * 1.1
    } else {
        1.0
    }
}

/// Width of a label area wide enough for the longest label.
pub(crate) fn label_area(labels: &[String]) -> u32 {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    (longest * 8 + 20).clamp(60, 260)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{CategoryFraudRate, HourCount, RankedCount};
    use tempfile::tempdir;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn renderer(dir: &Path) -> ChartRenderer {
        ChartRenderer::new(
            dir,
            ChartSize { width: 400, height: 300 },
            ChartSize { width: 500, height: 400 },
        )
        .with_top_countries(3)
    }

    fn sample_summary() -> DatasetSummary {
        let ranked = |label: &str, count| RankedCount { label: label.to_string(), count };
        DatasetSummary {
            total_transactions: 6,
            fraud_count: 2,
            fraud_pct: 100.0 / 3.0,
            unique_customers: 4,
            unique_vendors: 3,
            dropped_rows: 1,
            amount_histogram: Histogram::compute(&[10.0, 12.5, 40.0, 41.0, 90.0, 250.0], 5, 50),
            top_countries: vec![ranked("Russia", 3), ranked("Mexico", 2), ranked("Brazil", 1)],
            fraud_by_category: vec![
                CategoryFraudRate { category: "Travel".to_string(), rate: 0.5 },
                CategoryFraudRate { category: "Retail".to_string(), rate: 0.25 },
            ],
            transactions_by_hour: vec![
                HourCount { hour: 0, count: 1 },
                HourCount { hour: 13, count: 4 },
                HourCount { hour: 23, count: 1 },
            ],
            correlation: CorrelationMatrix::compute(&[
                ("amount_usd".to_string(), vec![Some(1.0), Some(2.0), Some(3.0)]),
                ("is_fraud".to_string(), vec![Some(0.0), Some(1.0), Some(1.0)]),
            ]),
        }
    }

    fn assert_all_charts_written(dir: &Path) {
        for file in CHART_FILES {
            let bytes = std::fs::read(dir.join(file)).unwrap();
            assert!(bytes.starts_with(PNG_SIGNATURE), "{file} is not a PNG");
        }
    }

    #[test]
    fn render_all_writes_every_chart_and_overwrites_on_rerun() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("nested").join("plots");
        let renderer = renderer(&dir);

        renderer.render_all(&sample_summary()).unwrap();
        assert_all_charts_written(&dir);

        renderer.render_all(&sample_summary()).unwrap();
        assert_all_charts_written(&dir);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), CHART_FILES.len());
    }

    #[test]
    fn empty_summary_still_produces_every_chart() {
        let tmp = tempdir().unwrap();
        renderer(tmp.path()).render_all(&DatasetSummary::default()).unwrap();
        assert_all_charts_written(tmp.path());
    }

    #[test]
    fn output_dir_that_is_a_file_is_an_io_error() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("plots");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let result = renderer(&blocker).render_all(&sample_summary());
        assert!(matches!(result, Err(ChartError::Io { path, .. }) if path == blocker));
    }

    #[test]
    fn first_label_is_drawn_on_the_top_row() {
        let labels: Vec<String> = ["Russia", "Mexico", "Brazil"].map(String::from).to_vec();
        assert_eq!(top_down_row(0, labels.len()), 2);
        assert_eq!(top_down_row(2, labels.len()), 0);
        assert_eq!(label_at_row(&labels, 2).map(String::as_str), Some("Russia"));
        assert_eq!(label_at_row(&labels, 0).map(String::as_str), Some("Brazil"));
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(label_at_row(&labels, top_down_row(i, labels.len())), Some(label));
        }
        assert_eq!(label_at_row(&labels, 3), None);
        assert_eq!(label_at_row(&labels, -1), None);
        assert_eq!(label_at_row(&[], 0), None);
    }

    #[test]
    fn axis_always_has_room() {
        assert_eq!(axis_max(0.0), 1.0);
        assert_eq!(axis_max(f64::NAN), 1.0);
        assert!((axis_max(10.0) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn label_area_grows_with_label_length_within_bounds() {
        assert_eq!(label_area(&[]), 60);
        assert_eq!(label_area(&["Travel".to_string(), "Entertainment".to_string()]), 124);
        assert_eq!(label_area(&["x".repeat(100)]), 260);
    }

    #[test]
    fn file_names_are_fixed() {
        let renderer = ChartRenderer::new(
            "plots",
            ChartSize { width: 800, height: 500 },
            ChartSize { width: 1000, height: 800 },
        );
        let paths: Vec<PathBuf> = CHART_FILES.iter().map(|f| renderer.path(f)).collect();
        assert_eq!(paths[0], Path::new("plots/amount_distribution.png"));
        assert_eq!(paths[4], Path::new("plots/correlation_heatmap.png"));
        assert_eq!(renderer.output_dir(), Path::new("plots"));
    }
}
