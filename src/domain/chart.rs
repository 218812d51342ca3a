// Bar chart model - series, chart options, legend and plot state
use super::tile::WidgetType;
use serde::Serialize;

pub const CHART_HEIGHT: u32 = 230;
pub const CHART_CLASS: &str = "col-sm-10";
pub const LEGEND_CONTAINER: &str = ".legend";
pub const LEGEND_CLASS: &str = "full-widget-legend";
pub const HOVER_COLOR: &str = "black";
const FALLBACK_COLOR: &str = "#4472C4";
const Y_TICK_COUNT: usize = 5;

/// Sequential palette, evenly spaced hues sized to the category count
#[derive(Debug, Clone)]
pub struct Colors {
    colors: Vec<String>,
    next: usize,
}

impl Colors {
    pub fn new(count: usize) -> Self {
        let colors = (0..count)
            .map(|i| {
                let hue = (210.0 + 360.0 * i as f64 / count as f64) % 360.0;
                hsl_to_hex(hue, 0.65, 0.5)
            })
            .collect();
        Self { colors, next: 0 }
    }

    pub fn next_color(&mut self) -> String {
        if self.colors.is_empty() {
            return FALLBACK_COLOR.to_string();
        }
        let color = self.colors[self.next % self.colors.len()].clone();
        self.next += 1;
        color
    }
}

fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02X}{:02X}{:02X}", channel(r), channel(g), channel(b))
}

/// Short magnitude label for axis values (crore, lakh, thousand)
pub fn num_differentiation(value: f64) -> String {
    let abs = value.abs();
    if abs >= 10_000_000.0 {
        format!("{:.2} Cr", value / 10_000_000.0)
    } else if abs >= 100_000.0 {
        format!("{:.2} L", value / 100_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.2} K", value / 1_000.0)
    } else {
        format!("{}", value)
    }
}

pub fn legend_columns(widget_type: WidgetType) -> u32 {
    match widget_type {
        WidgetType::Full => 9,
        WidgetType::Medium => 6,
        WidgetType::Small => 2,
    }
}

pub fn tooltip_content(label: &str, y: f64) -> String {
    format!("{}: {}", label, y)
}

/// One bar; `data` holds a single `[index, scaled value]` point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub label: String,
    pub data: Vec<(usize, f64)>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_color: Option<String>,
    pub tooltip: String,
}

impl BarSeries {
    pub fn new(label: String, index: usize, value: f64, color: String) -> Self {
        let tooltip = tooltip_content(&label, value);
        Self {
            label,
            data: vec![(index, value)],
            color,
            old_color: None,
            tooltip,
        }
    }

    pub fn value(&self) -> f64 {
        self.data.first().map(|(_, v)| *v).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarOptions {
    pub show: bool,
    pub label: Toggle,
    pub bar_width: f64,
    pub align: &'static str,
    pub fill: bool,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptions {
    pub bars: BarOptions,
    pub value_labels: Toggle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOptions {
    pub show: bool,
    pub no_columns: u32,
    pub container: &'static str,
    pub class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxisOptions {
    pub tick_length: u32,
    pub ticks: Vec<AxisTick>,
}

/// X axis with tick labels suppressed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxisOptions {
    pub tick_length: u32,
    pub label_width: u32,
    pub ticks: Option<Vec<AxisTick>>,
    pub blank_tick_labels: bool,
}

impl XAxisOptions {
    pub fn suppressed() -> Self {
        Self {
            tick_length: 0,
            label_width: 0,
            ticks: None,
            blank_tick_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderWidth {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub hoverable: bool,
    pub color: &'static str,
    pub show: bool,
    pub border_width: BorderWidth,
    pub border_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub series: SeriesOptions,
    pub legend: LegendOptions,
    pub yaxis: YAxisOptions,
    pub xaxis: XAxisOptions,
    pub grid: GridOptions,
    pub highlight_color: &'static str,
    pub tooltip: bool,
    pub height: u32,
    pub class: &'static str,
}

impl ChartOptions {
    pub fn bar(widget_type: WidgetType, xaxis: XAxisOptions, columns: &[BarSeries]) -> Self {
        let values: Vec<f64> = columns.iter().map(BarSeries::value).collect();

        Self {
            series: SeriesOptions {
                bars: BarOptions {
                    show: true,
                    label: Toggle { show: true },
                    bar_width: 0.5,
                    align: "center",
                    fill: true,
                    fill_opacity: 1.0,
                },
                value_labels: Toggle { show: true },
            },
            legend: LegendOptions {
                show: false,
                no_columns: legend_columns(widget_type),
                container: LEGEND_CONTAINER,
                class: LEGEND_CLASS,
            },
            yaxis: YAxisOptions {
                tick_length: 0,
                ticks: y_axis_ticks(&values, Y_TICK_COUNT),
            },
            xaxis,
            grid: GridOptions {
                hoverable: true,
                color: "#B2B2B2",
                show: true,
                border_width: BorderWidth {
                    top: 0,
                    right: 0,
                    bottom: 1,
                    left: 1,
                },
                border_color: "#EEEEEE",
            },
            highlight_color: "#FF00FF",
            tooltip: true,
            height: CHART_HEIGHT,
            class: CHART_CLASS,
        }
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Round-numbered ticks spanning zero and every value, labelled by magnitude
pub fn y_axis_ticks(values: &[f64], count: usize) -> Vec<AxisTick> {
    let lo = values.iter().copied().fold(0.0_f64, f64::min);
    let hi = values.iter().copied().fold(0.0_f64, f64::max);

    let tick = |value: f64| AxisTick {
        value,
        label: num_differentiation(value),
    };

    if hi - lo <= f64::EPSILON || count < 2 {
        return vec![tick(lo)];
    }

    let step = nice_step((hi - lo) / (count - 1) as f64);
    let start = (lo / step).floor() * step;
    let end = (hi / step).ceil() * step;
    let steps = ((end - start) / step).round() as usize;

    (0..=steps).map(|i| tick(start + step * i as f64)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

/// Drawn chart with its live series colors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plot {
    pub options: ChartOptions,
    pub series: Vec<BarSeries>,
    pub legend: Vec<LegendItem>,
    pub draws: u64,
}

impl Plot {
    pub fn draw(options: ChartOptions, series: Vec<BarSeries>) -> Self {
        let legend = draw_legend(&series);
        Self {
            options,
            series,
            legend,
            draws: 1,
        }
    }

    /// Mouse entered a legend item: paint its series black until it leaves
    pub fn highlight(&mut self, legend_text: &str) {
        let label = legend_text.trim();
        if let Some(series) = self.series.iter_mut().find(|s| s.label == label) {
            let original = std::mem::replace(&mut series.color, HOVER_COLOR.to_string());
            series.old_color = Some(original);
        }
        self.redraw();
    }

    /// Mouse left a legend item: restore the color it had before the hover
    pub fn restore(&mut self, legend_text: &str) {
        let label = legend_text.trim();
        if let Some(series) = self.series.iter_mut().find(|s| s.label == label) {
            if let Some(original) = series.old_color.take() {
                series.color = original;
            }
        }
        self.redraw();
    }

    fn redraw(&mut self) {
        self.draws += 1;
    }
}

pub fn draw_legend(series: &[BarSeries]) -> Vec<LegendItem> {
    series
        .iter()
        .map(|s| LegendItem {
            label: s.label.clone(),
            color: s.color.clone(),
        })
        .collect()
}
