use crate::model::params::ModelParams;
use crate::plot::figure::{
    histogram, padded_range, ExperimentFigure, LossCurve, ModelPlot, PairPlot, PAIRPLOT_BINS,
};
use crate::plot::{PlotError, PlotResult, Plotter};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PLOT_HEIGHT: u32 = 500;
pub const PLOT_WIDTH: u32 = PLOT_HEIGHT * 2;
pub const PAIRPLOT_SIZE: u32 = 900;

pub const EXPERIMENT_FILE: &str = "experiment.svg";
pub const PAIRPLOT_FILE: &str = "pairplot.svg";

const PLANE_COLOR: RGBColor = RGBColor(0xFF, 0xDB, 0x58);
const POINT_COLOR: RGBColor = RGBColor(0x1F, 0x77, 0xB4);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Writes each figure as an svg file under `output_dir`.
pub struct SvgPlotter {
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
}

impl SvgPlotter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self { output_dir: output_dir.into(), written: Vec::new() }
    }

    fn target(&self, name: &str) -> PlotResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(name))
    }

    fn finish(&mut self, path: PathBuf, res: Result<(), Box<dyn Error>>) -> PlotResult<()> {
        res.map_err(|e| PlotError::Backend(e.to_string()))?;
        info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl Plotter for SvgPlotter {
    fn render_pairplot(&mut self, pairplot: &PairPlot) -> PlotResult<()> {
        let path = self.target(PAIRPLOT_FILE)?;
        let res = draw_pairplot(&path, pairplot);
        self.finish(path, res)
    }

    fn render_experiment(&mut self, figure: &ExperimentFigure) -> PlotResult<()> {
        let path = self.target(EXPERIMENT_FILE)?;
        let res = draw_experiment(&path, figure);
        self.finish(path, res)
    }
}

fn finite2(p: &(f64, f64)) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

pub fn draw_experiment(path: &Path, figure: &ExperimentFigure) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(PLOT_WIDTH / 2);

    draw_loss_curve(&left, &figure.loss)?;
    match &figure.model {
        ModelPlot::Line { feature, label, points, fitted } => {
            draw_line_fit(&right, feature, label, points, fitted)?
        },
        ModelPlot::Plane { features, label, points, corners } => {
            draw_plane_fit(&right, features, label, points, corners, &figure.params)?
        },
    }
    root.present()?;
    Ok(())
}

fn draw_loss_curve(area: &Area, loss: &LossCurve) -> Result<(), Box<dyn Error>> {
    let xmax = loss.epochs.len().max(2) as f64 - 1.;
    let mut ctx = ChartBuilder::on(area)
        .caption("Loss Curve", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..xmax, loss.y_range())?;

    ctx.configure_mesh().x_desc("Epoch").y_desc("Root Mean Squared Error").draw()?;
    ctx.draw_series(LineSeries::new(loss.points(), RED.stroke_width(3)))?;
    Ok(())
}

fn draw_line_fit(
    area: &Area,
    feature: &str,
    label: &str,
    points: &[(f64, f64)],
    fitted: &[(f64, f64)],
) -> Result<(), Box<dyn Error>> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().chain(fitted).map(|p| p.1).collect();
    let mut ctx = ChartBuilder::on(area)
        .caption("Model Plot", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(padded_range(&xs), padded_range(&ys))?;

    ctx.configure_mesh().x_desc(feature).y_desc(label).draw()?;
    ctx.draw_series(
        points
            .iter()
            .filter(|p| finite2(p))
            .map(|&p| Circle::new(p, 3, POINT_COLOR.mix(0.6).filled())),
    )?;
    ctx.draw_series(LineSeries::new(
        fitted.iter().copied().filter(finite2),
        RED.stroke_width(3),
    ))?;
    Ok(())
}

fn draw_plane_fit(
    area: &Area,
    features: &[String; 2],
    label: &str,
    points: &[(f64, f64, f64)],
    corners: &[(f64, f64, f64); 3],
    params: &ModelParams,
) -> Result<(), Box<dyn Error>> {
    let all = points.iter().chain(corners.iter());
    let xs: Vec<f64> = all.clone().map(|p| p.0).collect();
    let ys: Vec<f64> = all.clone().map(|p| p.1).collect();
    let zs: Vec<f64> = all.map(|p| p.2).collect();

    let (x_range, y_range, z_range) = (padded_range(&xs), padded_range(&zs), padded_range(&ys));
    // plotters draws y upwards, so the label goes on the vertical axis
    let mut ctx = ChartBuilder::on(area)
        .caption("Model Plot", ("sans-serif", 20))
        .margin(10)
        .build_cartesian_3d(x_range.clone(), y_range.clone(), z_range.clone())?;
    ctx.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.3;
        pb.scale = 0.8;
        pb.into_matrix()
    });
    ctx.configure_axes().draw()?;

    // 3d axes have no descriptions, titles sit at the far end of each axis
    let titles = [
        (features[0].as_str(), (x_range.end, y_range.start, z_range.start)),
        (label, (x_range.start, y_range.end, z_range.start)),
        (features[1].as_str(), (x_range.start, y_range.start, z_range.end)),
    ];
    ctx.draw_series(
        titles
            .iter()
            .map(|&(name, at)| Text::new(name.to_owned(), at, ("sans-serif", 14).into_font())),
    )?;

    ctx.draw_series(
        points
            .iter()
            .filter(|(x, y, z)| x.is_finite() && y.is_finite() && z.is_finite())
            .map(|&(x, y, z)| Circle::new((x, z, y), 2, POINT_COLOR.mix(0.6).filled())),
    )?;

    let mut plane_x: Vec<f64> = corners.iter().map(|c| c.0).collect();
    plane_x.sort_by(|a, b| a.total_cmp(b));
    let plane_y: Vec<f64> = corners.iter().map(|c| c.1).collect();
    ctx.draw_series(
        SurfaceSeries::xoz(plane_x.into_iter(), plane_y.into_iter(), |x, y| {
            params.predict(&[x, y])
        })
        .style(PLANE_COLOR.mix(0.5).filled()),
    )?;
    Ok(())
}

pub fn draw_pairplot(path: &Path, pairplot: &PairPlot) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, (PAIRPLOT_SIZE, PAIRPLOT_SIZE)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = pairplot.columns.len();
    for (idx, cell) in root.split_evenly((n, n)).iter().enumerate() {
        let (y_name, y) = &pairplot.columns[idx / n];
        let (x_name, x) = &pairplot.columns[idx % n];
        if idx / n == idx % n {
            draw_histogram(cell, x_name, x)?;
        } else {
            draw_scatter(cell, x_name, x, y_name, y)?;
        }
    }
    root.present()?;
    Ok(())
}

fn draw_histogram(area: &Area, name: &str, values: &[f64]) -> Result<(), Box<dyn Error>> {
    let bins = histogram(values, PAIRPLOT_BINS);
    let ymax = bins.iter().map(|b| b.2).max().unwrap_or(1).max(1) as f64;
    let mut ctx = ChartBuilder::on(area)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(padded_range(values), 0f64..ymax * 1.05)?;

    ctx.configure_mesh().disable_mesh().x_desc(name).draw()?;
    ctx.draw_series(bins.iter().map(|&(lo, hi, count)| {
        Rectangle::new([(lo, 0.), (hi, count as f64)], POINT_COLOR.mix(0.5).filled())
    }))?;
    Ok(())
}

fn draw_scatter(
    area: &Area,
    x_name: &str,
    x: &[f64],
    y_name: &str,
    y: &[f64],
) -> Result<(), Box<dyn Error>> {
    let mut ctx = ChartBuilder::on(area)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(padded_range(x), padded_range(y))?;

    ctx.configure_mesh().disable_mesh().x_desc(x_name).y_desc(y_name).draw()?;
    ctx.draw_series(
        x.iter()
            .zip(y)
            .map(|(&a, &b)| (a, b))
            .filter(finite2)
            .map(|p| Circle::new(p, 1, POINT_COLOR.mix(0.4).filled())),
    )?;
    Ok(())
}
