// ============================================================
// Layer 6 — Plots
// ============================================================
// Renders the run's figures as PNG files with plotters:
//
//   wordcloud_positive.png  — most frequent words in positive reviews
//   wordcloud_negative.png  — most frequent words in negative reviews
//   review_lengths.png      — histogram of cleaned review lengths
//   training_curves.png     — loss and accuracy per epoch
//
// Word clouds are laid out on an Archimedean spiral from the centre
// outward: each word is tried at successive spiral points until its
// (estimated) bounding box overlaps nothing already placed. Words
// that fit nowhere are shrunk, and skipped once below MIN_FONT.
//
// Reference: plotters documentation (BitMapBackend, ChartBuilder)

use anyhow::{anyhow, ensure, Result};
use plotters::prelude::*;
use std::{
    error::Error,
    path::{Path, PathBuf},
};

use crate::data::stats::LengthStats;
use crate::infra::metrics::TrainingHistory;

pub const CLOUD_SIZE: (u32, u32) = (1600, 800);
pub const CLOUD_WORDS: usize = 200;

const MIN_FONT: f64 = 10.0;
const SPIRAL_STEPS: usize = 6000;
const HISTOGRAM_BINS: usize = 40;

/// Rough average glyph width relative to the font size
const GLYPH_ASPECT: f64 = 0.6;

const PALETTE: [RGBColor; 6] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
    RGBColor(190, 190, 255),
];

type PlotResult = std::result::Result<(), Box<dyn Error>>;

/// A word positioned on the cloud canvas (top-left anchored).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word:   String,
    pub size:   f64,
    pub x:      i32,
    pub y:      i32,
    pub width:  i32,
    pub height: i32,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        const PAD: i32 = 2;
        self.x < other.x + other.width + PAD
            && other.x < self.x + self.width + PAD
            && self.y < other.y + other.height + PAD
            && other.y < self.y + self.height + PAD
    }
}

/// Place words (most frequent first) without overlap inside a canvas.
pub fn layout_cloud(words: &[(String, usize)], width: u32, height: u32) -> Vec<PlacedWord> {
    let Some(max_freq) = words.iter().map(|(_, f)| *f).max().filter(|&f| f > 0) else {
        return Vec::new();
    };
    let (w, h)   = (width as i32, height as i32);
    let max_font = height as f64 / 4.0;
    let aspect   = width as f64 / height.max(1) as f64;

    let mut placed: Vec<PlacedWord> = Vec::new();

    for (word, freq) in words {
        let mut size = (max_font * (*freq as f64 / max_freq as f64).sqrt()).max(MIN_FONT);

        while size >= MIN_FONT {
            let bw = (GLYPH_ASPECT * size * word.chars().count() as f64).ceil() as i32;
            let bh = size.ceil() as i32;

            let spot = (0..SPIRAL_STEPS).find_map(|step| {
                let angle  = step as f64 * 0.15;
                let radius = 2.0 * angle;
                let cx = w as f64 / 2.0 + radius * angle.cos() * aspect;
                let cy = h as f64 / 2.0 + radius * angle.sin();
                let candidate = PlacedWord {
                    word:   word.clone(),
                    size,
                    x:      (cx - bw as f64 / 2.0) as i32,
                    y:      (cy - bh as f64 / 2.0) as i32,
                    width:  bw,
                    height: bh,
                };
                let inside = candidate.x >= 0
                    && candidate.y >= 0
                    && candidate.x + bw <= w
                    && candidate.y + bh <= h;
                (inside && !placed.iter().any(|p| p.overlaps(&candidate))).then_some(candidate)
            });

            if let Some(p) = spot {
                placed.push(p);
                break;
            }
            size *= 0.8;
        }
    }

    placed
}

/// Writes PNG figures into one output directory.
pub struct Plotter {
    dir: PathBuf,
}

impl Plotter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn word_cloud(&self, file: &str, title: &str, words: &[(String, usize)]) -> Result<PathBuf> {
        let path = self.dir.join(file);
        draw_word_cloud(&path, title, words).map_err(|e| render_error(&path, e))?;
        tracing::info!("Word cloud written to '{}'", path.display());
        Ok(path)
    }

    pub fn length_histogram(&self, counts: &[usize], stats: &LengthStats) -> Result<PathBuf> {
        let path = self.dir.join("review_lengths.png");
        draw_length_histogram(&path, counts, stats).map_err(|e| render_error(&path, e))?;
        tracing::info!("Length histogram written to '{}'", path.display());
        Ok(path)
    }

    pub fn training_curves(&self, history: &TrainingHistory) -> Result<PathBuf> {
        ensure!(!history.is_empty(), "No epochs to plot");
        let path = self.dir.join("training_curves.png");
        draw_training_curves(&path, history).map_err(|e| render_error(&path, e))?;
        tracing::info!("Training curves written to '{}'", path.display());
        Ok(path)
    }
}

fn render_error(path: &Path, e: Box<dyn Error>) -> anyhow::Error {
    anyhow!("Cannot render '{}': {}", path.display(), e)
}

fn draw_word_cloud(path: &Path, title: &str, words: &[(String, usize)]) -> PlotResult {
    let root = BitMapBackend::new(path, CLOUD_SIZE).into_drawing_area();
    root.fill(&BLACK)?;
    let canvas = root.titled(title, ("sans-serif", 40).into_font().color(&WHITE))?;
    let (w, h) = canvas.dim_in_pixel();

    for (i, p) in layout_cloud(words, w, h).iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        canvas.draw(&Text::new(
            p.word.clone(),
            (p.x, p.y),
            ("sans-serif", p.size).into_font().color(&color),
        ))?;
    }

    root.present()?;
    Ok(())
}

fn draw_length_histogram(path: &Path, counts: &[usize], stats: &LengthStats) -> PlotResult {
    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_len   = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let bin_width = max_len / HISTOGRAM_BINS as f64;
    let mut bins  = vec![0usize; HISTOGRAM_BINS];
    for &c in counts {
        let idx = ((c as f64 / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        bins[idx] += 1;
    }
    let y_max = bins.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Review length (tokens after cleaning)", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_len, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Tokens")
        .y_desc("Reviews")
        .draw()?;

    chart.draw_series(bins.iter().enumerate().map(|(i, &n)| {
        let x0 = i as f64 * bin_width;
        Rectangle::new([(x0, 0.0), (x0 + bin_width, n as f64)], BLUE.mix(0.6).filled())
    }))?;

    let cut = stats.sequence_length as f64;
    chart
        .draw_series(LineSeries::new(vec![(cut, 0.0), (cut, y_max)], &RED))?
        .label(format!("sequence length = {}", stats.sequence_length))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_training_curves(path: &Path, history: &TrainingHistory) -> PlotResult {
    let root = BitMapBackend::new(path, (1200, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    let x_max    = history.len().max(1) as f64 + 0.5;
    let loss_max = history
        .epochs
        .iter()
        .flat_map(|m| [m.train_loss, m.val_loss])
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max)
        .max(1e-3)
        * 1.2;

    let panels_data = [
        (
            "Loss function evolution",
            "Loss",
            loss_max,
            ("loss", history.series(|m| m.train_loss)),
            ("val_loss", history.series(|m| m.val_loss)),
        ),
        (
            "Accuracy evolution",
            "Accuracy",
            1.0,
            ("accuracy", history.series(|m| m.train_accuracy)),
            ("val_accuracy", history.series(|m| m.val_accuracy)),
        ),
    ];

    for (panel, (caption, y_desc, y_max, train, val)) in panels.iter().zip(panels_data) {
        let mut chart = ChartBuilder::on(panel)
            .caption(caption, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.5..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Epoch")
            .y_desc(y_desc)
            .draw()?;

        for ((label, points), color) in [(train, BLUE), (val, RED)] {
            chart
                .draw_series(LineSeries::new(points.clone(), &color))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 4, color.filled())))?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::LowerRight)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<(String, usize)> {
        (0..n).map(|i| (format!("word{i}"), 1000 / (i + 1))).collect()
    }

    #[test]
    fn test_empty_history_is_not_plotted() {
        let dir = std::env::temp_dir().join(format!("imdb-curves-{}", std::process::id()));
        let plotter = Plotter::new(&dir);
        assert!(plotter.training_curves(&TrainingHistory::default()).is_err());
        assert!(!dir.join("training_curves.png").exists());
    }

    #[test]
    fn test_cloud_words_stay_inside_canvas() {
        let (w, h) = (800, 400);
        for p in layout_cloud(&words(60), w, h) {
            assert!(p.x >= 0 && p.y >= 0);
            assert!(p.x + p.width <= w as i32);
            assert!(p.y + p.height <= h as i32);
        }
    }

    #[test]
    fn test_cloud_words_never_overlap() {
        let placed = layout_cloud(&words(60), 800, 400);
        assert!(!placed.is_empty());
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.word, b.word);
            }
        }
    }

    #[test]
    fn test_most_frequent_word_is_largest() {
        let placed = layout_cloud(&words(10), 800, 400);
        assert_eq!(placed[0].word, "word0");
        assert!(placed.iter().all(|p| p.size <= placed[0].size));
    }

    #[test]
    fn test_empty_cloud() {
        assert!(layout_cloud(&[], 800, 400).is_empty());
        assert!(layout_cloud(&[("zero".to_string(), 0)], 800, 400).is_empty());
    }
}
