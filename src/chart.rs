//! Forecast charts
//!
//! Renders a [`Forecast`] as a dual-axis chart (temperature bars, rain line)
//! and returns it base64-encoded so presentation can inline it. Every layout
//! parameter is fixed here, so identical forecasts give identical bytes.

use crate::models::Forecast;
use crate::{Result, WeatherBoardError};
use base64::{Engine as _, engine::general_purpose};
use plotters::prelude::*;
use plotters::style::FontTransform;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Key of the daily temperature/rain chart
pub const DAILY_FORECAST: &str = "daily_forecast";

const SVG_MIME: &str = "image/svg+xml";

const WIDTH: u32 = 800;
const HEIGHT: u32 = 480;
const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 100;
const Y_LABEL_AREA: u32 = 60;
const LABEL_FONT: f64 = 12.0;
const LEGEND_FONT: f64 = 13.0;
const LEGEND_INSET: i32 = 10;
const RAIN_LEGEND_WIDTH: i32 = 60;
const BAR_HALF_WIDTH: f64 = 0.35;

const TEMPERATURE_COLOR: RGBColor = RED;
const RAIN_COLOR: RGBColor = BLUE;

/// An encoded image ready for inline embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartArtifact {
    pub mime_type: &'static str,
    /// Base64 (standard alphabet) of the image bytes
    pub data: String,
}

impl ChartArtifact {
    fn svg(bytes: &[u8]) -> Self {
        Self {
            mime_type: SVG_MIME,
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// `data:` URI for an `<img src>`
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| WeatherBoardError::render(format!("invalid chart encoding: {e}")))
    }
}

/// Chart name to artifact
pub type ChartSet = BTreeMap<String, ChartArtifact>;

fn render_error<E: std::fmt::Display>(e: E) -> WeatherBoardError {
    WeatherBoardError::render(e.to_string())
}

/// Temperature axis bounds: always spans 0, padded to whole degrees, with
/// headroom above the bars for the legends.
fn temperature_axis(forecast: &Forecast) -> (f64, f64) {
    let (min, max) = forecast.temperature_bounds();
    let low = if min < 0.0 { (min - 1.0).floor() } else { 0.0 };
    let high = (max.max(0.0) + 1.0).ceil();
    let headroom = ((high - low) * 0.25).ceil();
    (low, high + headroom)
}

/// Builds every chart for a forecast
#[derive(Debug, Clone, Copy)]
pub struct ForecastChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ForecastChartRenderer {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
        }
    }
}

impl ForecastChartRenderer {
    /// Render all charts for `forecast`, keyed by chart name
    pub fn summarize(&self, forecast: &Forecast) -> Result<ChartSet> {
        let svg = self.render_daily(forecast)?;
        debug!("Rendered {} chart ({} bytes)", DAILY_FORECAST, svg.len());

        let mut charts = ChartSet::new();
        charts.insert(DAILY_FORECAST.to_string(), ChartArtifact::svg(svg.as_bytes()));
        Ok(charts)
    }

    fn render_daily(&self, forecast: &Forecast) -> Result<String> {
        let days = forecast.days();
        let labels: Vec<String> = days
            .iter()
            .map(|day| day.date.format("%Y-%m-%d").to_string())
            .collect();
        let rain: Vec<(f64, f64)> = days
            .iter()
            .enumerate()
            .map(|(i, day)| (i as f64, f64::from(day.chance_of_rain_pct)))
            .collect();

        let (temp_low, temp_high) = temperature_axis(forecast);
        let x_range = -0.5..(days.len() as f64 - 0.5);

        let date_label = |x: &f64| -> String {
            let rounded = x.round();
            if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        };
        let whole_number = |v: &f64| format!("{v:.0}");

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA)
                .right_y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d(x_range.clone(), temp_low..temp_high)
                .map_err(render_error)?
                .set_secondary_coord(x_range, 0.0..100.0);

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(days.len())
                .x_label_formatter(&date_label)
                .x_label_style(
                    ("sans-serif", LABEL_FONT)
                        .into_font()
                        .transform(FontTransform::Rotate90),
                )
                .x_desc("Date")
                .y_labels(10)
                .y_label_formatter(&whole_number)
                .y_desc("Temperature (°C)")
                // label_style would also reset the rotated x label style
                .y_label_style(("sans-serif", LABEL_FONT))
                .draw()
                .map_err(render_error)?;

            chart
                .configure_secondary_axes()
                .y_labels(11)
                .y_label_formatter(&whole_number)
                .y_desc("Chance of rain (%)")
                .label_style(("sans-serif", LABEL_FONT))
                .draw()
                .map_err(render_error)?;

            chart
                .draw_series(days.iter().enumerate().map(|(i, day)| {
                    let x = i as f64;
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, day.avg_temp_c)],
                        TEMPERATURE_COLOR.filled(),
                    )
                }))
                .map_err(render_error)?;

            chart
                .draw_secondary_series(LineSeries::new(
                    rain.iter().copied(),
                    RAIN_COLOR.stroke_width(2),
                ))
                .map_err(render_error)?;
            chart
                .draw_secondary_series(
                    rain.iter()
                        .map(|&point| Circle::new(point, 4, RAIN_COLOR.filled())),
                )
                .map_err(render_error)?;

            // one legend per axis, pinned to opposite top corners
            let (x_px, y_px) = chart.plotting_area().get_pixel_range();
            let top = y_px.start + LEGEND_INSET;
            let legend_style = ("sans-serif", LEGEND_FONT).into_font().color(&BLACK);

            let left = x_px.start + LEGEND_INSET;
            root.draw(&Rectangle::new(
                [(left, top), (left + 16, top + 10)],
                TEMPERATURE_COLOR.filled(),
            ))
            .map_err(render_error)?;
            root.draw(&Text::new("Avg Temp", (left + 22, top), legend_style.clone()))
                .map_err(render_error)?;

            let right = x_px.end - LEGEND_INSET - RAIN_LEGEND_WIDTH;
            root.draw(&PathElement::new(
                vec![(right, top + 5), (right + 16, top + 5)],
                RAIN_COLOR.stroke_width(2),
            ))
            .map_err(render_error)?;
            root.draw(&Circle::new((right + 8, top + 5), 3, RAIN_COLOR.filled()))
                .map_err(render_error)?;
            root.draw(&Text::new("Rain", (right + 22, top), legend_style))
                .map_err(render_error)?;

            root.present().map_err(render_error)?;
        }

        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::sample_days;
    use crate::models::{Forecast, ForecastDay};
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn forecast(days: Vec<ForecastDay>) -> Forecast {
        Forecast::new(days).unwrap()
    }

    fn decoded_svg(charts: &ChartSet) -> String {
        let bytes = charts[DAILY_FORECAST].decode().unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_summarize_produces_daily_chart() {
        let charts = ForecastChartRenderer::default()
            .summarize(&forecast(sample_days(start())))
            .unwrap();

        assert_eq!(charts.len(), 1);
        let artifact = &charts[DAILY_FORECAST];
        assert_eq!(artifact.mime_type, "image/svg+xml");
        assert!(artifact.data_uri().starts_with("data:image/svg+xml;base64,"));

        let svg = decoded_svg(&charts);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("2026-10-18"));
        assert!(svg.contains("2026-10-24"));
        assert!(svg.contains("Temperature (°C)"));
        assert!(svg.contains("Chance of rain (%)"));
        assert!(svg.contains("Avg Temp"));
        assert!(svg.contains("Rain"));
    }

    #[test]
    fn test_date_labels_are_rotated() {
        let charts = ForecastChartRenderer::default()
            .summarize(&forecast(sample_days(start())))
            .unwrap();
        let svg = decoded_svg(&charts);

        for date in ["2026-10-18", "2026-10-21", "2026-10-24"] {
            let end = svg.find(&format!(">{date}</text>")).unwrap();
            let start = svg[..end].rfind("<text").unwrap();
            let element = &svg[start..end];
            assert!(element.contains("rotate("), "{date} label not rotated: {element}");
        }
    }

    #[test]
    fn test_same_forecast_renders_identically() {
        let renderer = ForecastChartRenderer::default();
        let first = renderer.summarize(&forecast(sample_days(start()))).unwrap();
        let second = renderer.summarize(&forecast(sample_days(start()))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_forecasts_render_differently() {
        let renderer = ForecastChartRenderer::default();
        let mut warmer = sample_days(start());
        for day in &mut warmer {
            day.avg_temp_c += 6.0;
            day.chance_of_rain_pct = 95;
        }

        let first = renderer.summarize(&forecast(sample_days(start()))).unwrap();
        let second = renderer.summarize(&forecast(warmer)).unwrap();
        assert_ne!(first[DAILY_FORECAST], second[DAILY_FORECAST]);
    }

    #[test]
    fn test_freezing_week_renders() {
        let mut days = sample_days(start());
        for day in &mut days {
            day.avg_temp_c -= 25.0;
        }
        let forecast = forecast(days);
        let (low, high) = temperature_axis(&forecast);
        assert!(low <= -15.0);
        assert!(high >= 1.0);
        assert!(ForecastChartRenderer::default().summarize(&forecast).is_ok());
    }

    #[test]
    fn test_temperature_axis_is_fixed_by_data() {
        let forecast = forecast(sample_days(start()));
        // temperatures 10.0..=19.0: axis 0..20 plus 5 degrees of headroom
        assert_eq!(temperature_axis(&forecast), (0.0, 25.0));
    }
}
