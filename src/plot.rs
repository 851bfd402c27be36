//! Persistence diagram and barcode figure.
//!
//! Layout: the persistence diagram of every dimension on the left, the
//! barcode of the first dimension top right and the remaining dimensions
//! stacked bottom right.
//!
//! Text is rendered with an embedded DejaVu Sans, registered with plotters
//! as `sans-serif` on first use, so no system fonts are needed.

use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Result, TdaError};
use crate::topology::{Barcode, Dimension};

const FIGURE_SIZE: (u32, u32) = (2000, 800);
const DIAGRAM_WIDTH: i32 = 520;

/// Figure labels and axis limits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub title: String,
    /// Shared axis range of the diagram and the barcodes; defaults to
    /// [0, last grid value]
    pub zoom_range: Option<(f64, f64)>,
    /// x-axis label of the lower barcode panel
    pub rho_label: Option<String>,
}

impl PlotOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

fn plot_err<E: Display>(e: E) -> TdaError {
    TdaError::Plot(e.to_string())
}

const FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Register the embedded font once per process
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font("sans-serif", FontStyle::Normal, FONT_BYTES).is_ok());
    if ok {
        Ok(())
    } else {
        Err(TdaError::Plot("embedded font could not be parsed".to_string()))
    }
}

/// Draw the barcodes of one trial and save `{prefix}-persistent-diagram.png`
///
/// Births and deaths are clipped to [0, `vec_rhos[last]`], so essential bars
/// end at the right edge. Returns the path of the written image.
pub fn plot_persistent_diagrams(
    barcodes: &BTreeMap<Dimension, Barcode>,
    vec_rhos: &[f64],
    options: &PlotOptions,
    prefix: impl AsRef<Path>,
) -> Result<PathBuf> {
    let rho_max = *vec_rhos
        .last()
        .ok_or_else(|| TdaError::InvalidArgument("filtration grid is empty".to_string()))?;

    let clipped: Vec<(Dimension, Barcode)> = barcodes
        .iter()
        .map(|(&dim, barcode)| (dim, barcode.clipped(0.0, rho_max)))
        .collect();

    let mut name = prefix.as_ref().as_os_str().to_owned();
    name.push("-persistent-diagram.png");
    let path = PathBuf::from(name);

    draw_figure(&path, &clipped, rho_max, options)?;
    tracing::debug!(path = %path.display(), dimensions = clipped.len(), "saved persistence figure");
    Ok(path)
}

fn draw_figure(
    path: &Path,
    barcodes: &[(Dimension, Barcode)],
    rho_max: f64,
    options: &PlotOptions,
) -> Result<()> {
    ensure_font()?;

    let (lo, hi) = options.zoom_range.unwrap_or((0.0, rho_max));
    // Degenerate ranges (all-zero grid) still need a drawable axis
    let hi = if hi > lo { hi } else { lo + 1.0 };

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let root = root
        .titled(&options.title, ("sans-serif", 24))
        .map_err(plot_err)?;

    let (left, right) = root.split_horizontally(DIAGRAM_WIDTH);
    let top_height = (right.dim_in_pixel().1 / 3) as i32;
    let (top, bottom) = right.split_vertically(top_height);

    let mut diagram = ChartBuilder::on(&left)
        .caption("persistence diagram", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, lo..hi)
        .map_err(plot_err)?;

    diagram
        .configure_mesh()
        .x_desc("births")
        .y_desc("deaths")
        .draw()
        .map_err(plot_err)?;

    diagram
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), (rho_max, rho_max)],
            &BLACK,
        )))
        .map_err(plot_err)?;

    for (i, (dim, barcode)) in barcodes.iter().enumerate() {
        if barcode.is_empty() {
            continue;
        }
        let color = Palette99::pick(i);
        diagram
            .draw_series(
                barcode
                    .iter()
                    .map(|bar| Circle::new((bar.birth, bar.death), 4, color.mix(0.5).filled())),
            )
            .map_err(plot_err)?
            .label(dim.to_string())
            .legend(move |(x, y)| Circle::new((x, y), 4, Palette99::pick(i).filled()));
    }

    diagram
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    let (first, rest) = match barcodes.split_first() {
        Some((first, rest)) => (Some(first), rest),
        None => (None, &[][..]),
    };

    let first_rows = first.map_or(0, |(_, b)| b.len());
    let mut top_chart = ChartBuilder::on(&top)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0.0..(first_rows.max(1) as f64))
        .map_err(plot_err)?;
    top_chart
        .configure_mesh()
        .y_desc(first.map_or(String::new(), |(dim, _)| dim.to_string()))
        .draw()
        .map_err(plot_err)?;
    if let Some((_, barcode)) = first {
        top_chart
            .draw_series(bar_segments(barcode, 0.0, Palette99::pick(0).stroke_width(1)))
            .map_err(plot_err)?;
    }

    let rest_rows: usize = rest.iter().map(|(_, b)| b.len()).sum();
    let mut bottom_chart = ChartBuilder::on(&bottom)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0.0..(rest_rows.max(1) as f64))
        .map_err(plot_err)?;
    bottom_chart
        .configure_mesh()
        .x_desc(options.rho_label.clone().unwrap_or_default())
        .draw()
        .map_err(plot_err)?;

    let mut offset = 0.0;
    for (i, (_, barcode)) in rest.iter().enumerate() {
        let style = Palette99::pick(i + 1).stroke_width(2);
        bottom_chart
            .draw_series(bar_segments(barcode, offset, style))
            .map_err(plot_err)?;
        offset += barcode.len() as f64;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// One horizontal segment per bar, stacked upward from `offset`
fn bar_segments(
    barcode: &Barcode,
    offset: f64,
    style: ShapeStyle,
) -> impl Iterator<Item = PathElement<(f64, f64)>> + '_ {
    barcode.iter().enumerate().map(move |(j, bar)| {
        let y = offset + j as f64;
        PathElement::new(vec![(bar.birth, y), (bar.death, y)], style)
    })
}
