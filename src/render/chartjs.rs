//! Chart.js adapter.
//!
//! Rendering produces the configuration object passed to `new Chart(ctx, …)`.
//! The live handles are then written into one standalone HTML page with a
//! `<canvas>` per surface.

use std::fs;
use std::path::Path;

use serde_json::{Value, json};

use crate::domain::{ChartData, ChartKind, ChartOptions, ChartSpec, CombinedChartData, PieData};
use crate::error::AppError;
use crate::render::{ChartRenderer, RenderHandle};

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// A built Chart.js configuration bound to a canvas id.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartJsChart {
    pub surface: String,
    pub title: String,
    pub config: Value,
}

impl RenderHandle for ChartJsChart {
    fn dispose(self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChartJsRenderer;

impl ChartRenderer for ChartJsRenderer {
    type Handle = ChartJsChart;

    fn render(&self, chart: &ChartSpec) -> Result<ChartJsChart, AppError> {
        Ok(ChartJsChart {
            surface: chart.surface.clone(),
            title: chart.options.title.clone(),
            config: chart_config(chart),
        })
    }
}

/// The full `{ type, data, options }` object for one chart.
pub fn chart_config(chart: &ChartSpec) -> Value {
    let chart_type = match chart.kind {
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
        // Area is a filled line chart.
        ChartKind::Line | ChartKind::Area => "line",
    };

    let data = match &chart.data {
        ChartData::Series(combined) => series_data(chart.kind, combined, &chart.options),
        ChartData::Pie(pie) => pie_data(pie),
    };

    json!({
        "type": chart_type,
        "data": data,
        "options": options(chart.kind, &chart.options),
    })
}

fn series_data(kind: ChartKind, combined: &CombinedChartData, options: &ChartOptions) -> Value {
    let datasets: Vec<Value> = combined
        .datasets
        .iter()
        .map(|ds| {
            let mut value = json!({
                "label": ds.label,
                "data": ds.data,
                "backgroundColor": ds.background_color,
                "borderColor": ds.border_color,
            });
            match kind {
                ChartKind::Bar | ChartKind::Pie => {
                    value["borderWidth"] = json!(1);
                }
                ChartKind::Line | ChartKind::Area => {
                    value["fill"] = json!(kind == ChartKind::Area);
                    if let Some(tension) = options.tension {
                        value["tension"] = json!(tension);
                    }
                }
            }
            value
        })
        .collect();

    json!({ "labels": combined.labels, "datasets": datasets })
}

fn pie_data(pie: &PieData) -> Value {
    json!({
        "labels": pie.labels,
        "datasets": [{
            "data": pie.values,
            "backgroundColor": pie.colors,
            "borderColor": pie.colors,
            "borderWidth": 1,
        }],
    })
}

fn options(kind: ChartKind, options: &ChartOptions) -> Value {
    let mut value = json!({
        "responsive": true,
        "plugins": {
            "legend": { "position": options.legend.as_str() },
            "title": { "display": true, "text": options.title },
        },
    });

    if kind != ChartKind::Pie {
        value["scales"] = json!({
            "x": axis(options.x_title.as_deref(), kind == ChartKind::Bar && options.begin_at_zero),
            "y": axis(options.y_title.as_deref(), options.begin_at_zero),
        });
    }

    value
}

fn axis(title: Option<&str>, begin_at_zero: bool) -> Value {
    let mut value = json!({});
    if begin_at_zero {
        value["beginAtZero"] = json!(true);
    }
    if let Some(text) = title {
        value["title"] = json!({ "display": true, "text": text });
    }
    value
}

/// Write a standalone page drawing every chart, in the given order.
pub fn write_dashboard_html(path: &Path, title: &str, charts: &[ChartJsChart]) -> Result<(), AppError> {
    let html = dashboard_html(title, charts)?;
    fs::write(path, html)
        .map_err(|e| AppError::new(4, format!("Failed to write dashboard '{}': {e}", path.display())))
}

pub fn dashboard_html(title: &str, charts: &[ChartJsChart]) -> Result<String, AppError> {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M");

    let mut sections = String::new();
    let mut scripts = String::new();
    for chart in charts {
        let config = serde_json::to_string(&chart.config)
            .map_err(|e| AppError::new(4, format!("Failed to encode chart '{}': {e}", chart.surface)))?;
        let id = html_escape(&chart.surface);
        let id_literal = serde_json::to_string(&chart.surface)
            .map_err(|e| AppError::new(4, format!("Failed to encode surface '{}': {e}", chart.surface)))?;
        sections.push_str(&format!(
            "<section><h3>{}</h3><canvas id=\"{id}\"></canvas></section>\n",
            html_escape(&chart.title)
        ));
        scripts.push_str(&format!(
            "new Chart(document.getElementById({}).getContext('2d'), {});\n",
            escape_json_for_script(&id_literal),
            escape_json_for_script(&config)
        ));
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<script src="{CHART_JS_CDN}"></script>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#f5f5f5;color:#333;margin:0}}
header{{background:#1a1a2e;color:#fff;padding:20px 32px}}
main{{max-width:1200px;margin:0 auto;padding:24px}}
section{{background:#fff;border-radius:8px;box-shadow:0 1px 3px rgba(0,0,0,0.1);padding:24px;margin-bottom:20px}}
section h3{{margin-top:0}}
footer{{text-align:center;color:#888;font-size:0.8em;padding:16px}}
</style>
</head>
<body>
<header><h1>{title}</h1></header>
<main>
{sections}</main>
<footer>Generated {generated}</footer>
<script>
{scripts}</script>
</body>
</html>
"#,
        title = html_escape(title),
    ))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_json_for_script(s: &str) -> String {
    s.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;

    fn combined() -> CombinedChartData {
        CombinedChartData {
            labels: vec!["2000".to_string(), "2001".to_string()],
            datasets: vec![Dataset {
                label: "Generación Eólica".to_string(),
                background_color: "rgba(75, 192, 192, 0.5)".to_string(),
                border_color: "rgba(75, 192, 192, 0.5)".to_string(),
                data: vec![1.0, 2.0],
            }],
        }
    }

    fn spec(kind: ChartKind, data: ChartData) -> ChartSpec {
        let mut options = ChartOptions::titled("Tendencia de Energías en China");
        options.x_title = Some("Años".to_string());
        options.tension = Some(0.4);
        ChartSpec {
            surface: "graficoLineas".to_string(),
            kind,
            data,
            options,
        }
    }

    #[test]
    fn bar_config_matches_chart_js_shape() {
        let config = chart_config(&spec(ChartKind::Bar, ChartData::Series(combined())));
        assert_eq!(config["type"], "bar");
        assert_eq!(config["data"]["labels"], json!(["2000", "2001"]));
        assert_eq!(config["data"]["datasets"][0]["borderWidth"], 1);
        assert_eq!(config["options"]["plugins"]["legend"]["position"], "top");
        assert_eq!(config["options"]["scales"]["x"]["beginAtZero"], true);
        assert_eq!(config["options"]["scales"]["y"]["beginAtZero"], true);
    }

    #[test]
    fn area_is_a_filled_line() {
        let config = chart_config(&spec(ChartKind::Area, ChartData::Series(combined())));
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["datasets"][0]["fill"], true);
        assert_eq!(config["data"]["datasets"][0]["tension"], 0.4);
        assert_eq!(config["options"]["scales"]["x"]["title"]["text"], "Años");

        let line = chart_config(&spec(ChartKind::Line, ChartData::Series(combined())));
        assert_eq!(line["data"]["datasets"][0]["fill"], false);
        assert!(line["options"]["scales"]["x"].get("beginAtZero").is_none());
    }

    #[test]
    fn pie_uses_flat_triple_and_no_scales() {
        let pie = PieData {
            labels: vec!["Eólica".to_string(), "Solar".to_string()],
            values: vec![3.0, 4.0],
            colors: vec!["a".to_string(), "b".to_string()],
        };
        let config = chart_config(&spec(ChartKind::Pie, ChartData::Pie(pie)));
        assert_eq!(config["type"], "pie");
        assert_eq!(config["data"]["datasets"][0]["data"], json!([3.0, 4.0]));
        assert_eq!(config["data"]["datasets"][0]["borderColor"], json!(["a", "b"]));
        assert!(config["options"].get("scales").is_none());
    }

    #[test]
    fn page_has_one_canvas_per_chart() {
        let chart = ChartJsRenderer
            .render(&spec(ChartKind::Line, ChartData::Series(combined())))
            .unwrap();
        let html = dashboard_html("Energías <limpias>", &[chart]).unwrap();

        assert!(html.contains("<canvas id=\"graficoLineas\"></canvas>"));
        assert!(html.contains("getElementById(\"graficoLineas\")"));
        assert!(html.contains("Energías &lt;limpias&gt;"));
        assert!(html.contains(CHART_JS_CDN));
    }

    #[test]
    fn hostile_surface_ids_stay_inside_the_script() {
        let mut chart = ChartJsRenderer
            .render(&spec(ChartKind::Bar, ChartData::Series(combined())))
            .unwrap();
        chart.surface = "a'b\n</script><script>x".to_string();
        let html = dashboard_html("t", &[chart]).unwrap();

        let script = &html[html.find("<script>\n").unwrap()..];
        assert!(script.contains(r#"getElementById("a'b\n<\/script><script>x")"#));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
