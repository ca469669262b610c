//! Tabbed dashboard layout and its HTML rendering.
//!
//! RULE: The dashboard is assembled once from an immutable dataset and
//! its aggregates. Rendering never touches the RNG or the table again.

use crate::{
    aggregate::Aggregates,
    dataset::Dataset,
    error::{DashError, DashResult},
    figures,
};
use maud::{html, PreEscaped, DOCTYPE};
use plotly::Plot;
use serde_json::{json, Value};
use std::collections::HashSet;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Clone)]
pub struct Graph {
    pub id: String,
    pub figure: Plot,
}

impl Graph {
    pub fn new(id: impl Into<String>, figure: Plot) -> Self {
        Self { id: id.into(), figure }
    }
}

#[derive(Clone)]
pub struct Tab {
    pub label: String,
    pub graphs: Vec<Graph>,
}

impl Tab {
    pub fn new(label: impl Into<String>, graphs: Vec<Graph>) -> Self {
        Self { label: label.into(), graphs }
    }
}

#[derive(Clone)]
pub struct Dashboard {
    pub title: String,
    pub tabs: Vec<Tab>,
}

impl Dashboard {
    /// Assemble tabs from explicit parts. Graph ids must be unique
    /// across the whole page.
    pub fn new(title: impl Into<String>, tabs: Vec<Tab>) -> DashResult<Self> {
        let mut seen = HashSet::new();
        for graph in tabs.iter().flat_map(|t| &t.graphs) {
            if !seen.insert(graph.id.as_str()) {
                return Err(DashError::invalid(
                    "graph.id",
                    format!("duplicate graph id '{}'", graph.id),
                ));
            }
        }
        Ok(Self { title: title.into(), tabs })
    }

    /// The churn analysis dashboard: every chart over `dataset`, grouped
    /// into the standard seven tabs.
    pub fn build(title: &str, dataset: &Dataset, aggregates: &Aggregates) -> DashResult<Self> {
        let customers = dataset.customers();
        let tabs = vec![
            Tab::new(
                "Churn Rate by Contract Type",
                vec![Graph::new(
                    "churn-contract-graph",
                    figures::churn_by_contract_pie(&aggregates.churn_by_contract),
                )],
            ),
            Tab::new(
                "Avg Monthly Charges by Internet Service Type",
                vec![Graph::new(
                    "avg-charges-internet-graph",
                    figures::avg_charges_by_internet_line(&aggregates.avg_charges_by_internet),
                )],
            ),
            Tab::new(
                "Distribution of Tenure vs Monthly Charges",
                vec![
                    Graph::new(
                        "tenure-distribution-graph",
                        figures::tenure_vs_monthly_box(customers),
                    ),
                    Graph::new(
                        "tenure-count-graph",
                        figures::tenure_count_bar(&aggregates.tenure_distribution),
                    ),
                ],
            ),
            Tab::new(
                "Churn vs Monthly Charges",
                vec![Graph::new(
                    "churn-monthly-graph",
                    figures::churn_vs_monthly_scatter(customers),
                )],
            ),
            Tab::new(
                "Customer Demographics",
                vec![
                    Graph::new(
                        "gender-distribution-graph",
                        figures::gender_distribution(customers),
                    ),
                    Graph::new(
                        "senior-citizen-distribution-graph",
                        figures::senior_citizen_distribution(customers),
                    ),
                ],
            ),
            Tab::new(
                "Service Usage Patterns",
                vec![
                    Graph::new(
                        "multiple-lines-usage-graph",
                        figures::multiple_lines_usage(customers),
                    ),
                    Graph::new(
                        "internet-service-types-graph",
                        figures::internet_service_types(customers),
                    ),
                ],
            ),
            Tab::new(
                "Payment Method Preferences",
                vec![Graph::new(
                    "payment-methods-graph",
                    figures::payment_methods(customers),
                )],
            ),
        ];
        let dashboard = Self::new(title, tabs)?;
        log::info!(
            "dashboard: {} tabs, {} graphs over {} customers",
            dashboard.tabs.len(),
            dashboard.graphs().count(),
            dataset.len()
        );
        Ok(dashboard)
    }

    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.tabs.iter().flat_map(|t| t.graphs.iter())
    }

    pub fn graph(&self, id: &str) -> Option<&Graph> {
        self.graphs().find(|g| g.id == id)
    }

    /// Render a self-contained HTML page. The first tab starts selected.
    pub fn render_html(&self) -> DashResult<String> {
        let payload = self
            .graphs()
            .map(|g| -> DashResult<Value> {
                Ok(json!({ "id": g.id, "figure": figures::figure_json(&g.figure)? }))
            })
            .collect::<DashResult<Vec<_>>>()?;
        let payload = script_safe_json(&serde_json::to_string(&payload)?);

        let page = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    h1 { (self.title) }
                    div class="tabs" role="tablist" {
                        @for (i, tab) in self.tabs.iter().enumerate() {
                            button.tab.selected[i == 0] role="tab" data-tab={ "tab-" (i) } {
                                (tab.label)
                            }
                        }
                    }
                    @for (i, tab) in self.tabs.iter().enumerate() {
                        section class="panel" id={ "tab-" (i) } role="tabpanel" hidden[i != 0] {
                            @for graph in &tab.graphs {
                                div class="graph" id=(graph.id) {}
                            }
                        }
                    }
                    script { (PreEscaped(format!("const GRAPHS = {payload};\n{SCRIPT}"))) }
                }
            }
        };
        Ok(page.into_string())
    }
}

const STYLE: &str = r#"
body { font-family: system-ui, -apple-system, sans-serif; margin: 24px; color: #1f2933; }
.tabs { display: flex; flex-wrap: wrap; border-bottom: 1px solid #d3d9e0; }
.tab { border: 1px solid transparent; background: none; padding: 10px 16px; cursor: pointer; }
.tab.selected { border-color: #d3d9e0; border-bottom-color: #fff; background: #fff; margin-bottom: -1px; }
.panel { padding-top: 16px; }
.graph { min-height: 450px; }
"#;

// Plots are drawn lazily the first time their tab is shown, since Plotly
// cannot size a chart inside a hidden element.
const SCRIPT: &str = r#"const drawn = new Set();
function draw(panel) {
  for (const g of GRAPHS) {
    const el = document.getElementById(g.id);
    if (el && panel.contains(el) && !drawn.has(g.id)) {
      Plotly.newPlot(el, g.figure.data, g.figure.layout, { ...g.figure.config, responsive: true });
      drawn.add(g.id);
    }
  }
}
for (const button of document.querySelectorAll(".tab")) {
  button.addEventListener("click", () => {
    for (const b of document.querySelectorAll(".tab")) b.classList.remove("selected");
    for (const p of document.querySelectorAll(".panel")) p.hidden = true;
    button.classList.add("selected");
    const panel = document.getElementById(button.dataset.tab);
    panel.hidden = false;
    draw(panel);
  });
}
const first = document.querySelector(".panel");
if (first) draw(first);
"#;

/// JSON embedded in a <script> element must not contain "</" or it can
/// terminate the element early.
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotly::{common::Title, Layout};

    fn titled_plot(title: &str) -> Plot {
        let mut plot = Plot::new();
        plot.set_layout(Layout::new().title(Title::with_text(title)));
        plot
    }

    #[test]
    fn duplicate_graph_ids_are_rejected() {
        let tabs = vec![
            Tab::new("A", vec![Graph::new("g", titled_plot("one"))]),
            Tab::new("B", vec![Graph::new("g", titled_plot("two"))]),
        ];
        let err = Dashboard::new("t", tabs).err().unwrap();
        assert!(matches!(err, DashError::InvalidArgument { name: "graph.id", .. }));
    }

    #[test]
    fn markup_in_labels_is_escaped() {
        let dash = Dashboard::new(
            "t",
            vec![Tab::new("<a href=\"x\">&</a>", vec![Graph::new("g", Plot::new())])],
        )
        .unwrap();
        let html = dash.render_html().unwrap();
        assert!(html.contains("&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"));
        assert!(!html.contains("<a href"));
    }

    #[test]
    fn script_payload_cannot_close_its_element() {
        let dash = Dashboard::new(
            "t",
            vec![Tab::new("A", vec![Graph::new("g", titled_plot("</script><b>"))])],
        )
        .unwrap();
        let html = dash.render_html().unwrap();
        assert_eq!(html.matches("</script>").count(), 2, "only the CDN tag and the inline script close");
        assert!(html.contains("<\\/script><b>"));
    }

    #[test]
    fn first_tab_starts_selected() {
        let dash = Dashboard::new(
            "t",
            vec![
                Tab::new("A", vec![Graph::new("a", Plot::new())]),
                Tab::new("B", vec![Graph::new("b", Plot::new())]),
            ],
        )
        .unwrap();
        let html = dash.render_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("class=\"tab selected\"").count(), 1);
        assert_eq!(html.matches(" hidden>").count(), 1);
    }
}
