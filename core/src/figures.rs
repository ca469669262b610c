//! Dashboard chart builders.
//!
//! Each function turns the customer table or one aggregate table into a
//! single `plotly::Plot`. Builders are pure; the same input gives the same
//! figure.

use crate::{
    aggregate::{
        category_counts, flag_counts, AvgChargesByInternet, CategoryCount, ChurnByContract,
        TenureCount,
    },
    customer::{Category, CustomerRecord, YesNo},
    error::DashResult,
};
use plotly::{
    box_plot::{BoxPlot, BoxPoints},
    common::{Line, LineShape, Marker, Mode, SizeMode, Title},
    layout::{Axis, BoxMode, Layout, Legend},
    Bar, Pie, Plot, Scatter,
};

/// Largest marker diameter on the churn scatter, in pixels.
pub const SCATTER_SIZE_MAX: f64 = 15.0;

const SCATTER_HOVER: &str =
    "Monthly Charges=%{x}<br>Total Charges=%{y}<br>%{text}<extra></extra>";

/// The figure as Plotly JSON (`data`, `layout`, `config`).
pub fn figure_json(plot: &Plot) -> DashResult<serde_json::Value> {
    Ok(serde_json::from_str(&plot.to_json())?)
}

fn titled(title: &str) -> Layout {
    Layout::new().title(Title::with_text(title))
}

fn with_axes(layout: Layout, x: &str, y: &str) -> Layout {
    layout
        .x_axis(Axis::new().title(Title::with_text(x)))
        .y_axis(Axis::new().title(Title::with_text(y)))
}

fn with_legend(layout: Layout, title: &str) -> Layout {
    layout.legend(Legend::new().title(Title::with_text(title)))
}

fn pie_from_counts(layout: Layout, counts: Vec<CategoryCount>) -> Plot {
    let (labels, values): (Vec<String>, Vec<usize>) =
        counts.into_iter().map(|c| (c.label, c.count)).unzip();
    let mut plot = Plot::new();
    plot.add_trace(Pie::new(values).labels(labels));
    plot.set_layout(layout);
    plot
}

pub fn gender_distribution(customers: &[CustomerRecord]) -> Plot {
    pie_from_counts(
        titled("Gender Distribution"),
        category_counts(customers, |c| c.gender),
    )
}

pub fn senior_citizen_distribution(customers: &[CustomerRecord]) -> Plot {
    pie_from_counts(
        with_legend(titled("Senior Citizen Distribution"), "Senior Citizen"),
        flag_counts(customers, |c| c.senior_citizen),
    )
}

pub fn internet_service_types(customers: &[CustomerRecord]) -> Plot {
    pie_from_counts(
        titled("Internet Service Types"),
        category_counts(customers, |c| c.internet_service),
    )
}

pub fn payment_methods(customers: &[CustomerRecord]) -> Plot {
    pie_from_counts(
        titled("Payment Method Preferences"),
        category_counts(customers, |c| c.payment_method),
    )
}

/// One bar trace per multiple-lines value so each gets its own colour.
pub fn multiple_lines_usage(customers: &[CustomerRecord]) -> Plot {
    let mut plot = Plot::new();
    for count in category_counts(customers, |c| c.multiple_lines) {
        plot.add_trace(Bar::new(vec![count.label.clone()], vec![count.count]).name(&count.label));
    }
    plot.set_layout(with_legend(
        with_axes(titled("Multiple Lines Usage"), "Multiple Lines Usage", "count"),
        "Multiple Lines Usage",
    ));
    plot
}

/// Pie of churned customers per contract type.
pub fn churn_by_contract_pie(rows: &[ChurnByContract]) -> Plot {
    let counts = rows
        .iter()
        .map(|r| CategoryCount {
            label: r.contract.label().to_string(),
            count: r.churned_customers,
        })
        .collect();
    pie_from_counts(titled("Churn Rate by Contract Type"), counts)
}

pub fn avg_charges_by_internet_line(rows: &[AvgChargesByInternet]) -> Plot {
    let x: Vec<&str> = rows.iter().map(|r| r.internet_service.label()).collect();
    let y: Vec<f64> = rows.iter().map(|r| r.avg_monthly_charges).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(x, y)
            .mode(Mode::LinesMarkers)
            .line(Line::new().shape(LineShape::Spline)),
    );
    plot.set_layout(with_axes(
        titled("Average Monthly Charges by Internet Service Type"),
        "internet_service",
        "avg_monthly_charges",
    ));
    plot
}

pub fn tenure_count_bar(rows: &[TenureCount]) -> Plot {
    let x: Vec<u32> = rows.iter().map(|r| r.tenure).collect();
    let y: Vec<usize> = rows.iter().map(|r| r.customer_count).collect();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(x, y));
    plot.set_layout(with_axes(
        titled("Customer Count by Tenure"),
        "tenure",
        "customer_count",
    ));
    plot
}

/// Customers split by churn flag, in `YesNo` declaration order, skipping
/// empty groups.
fn churn_groups(customers: &[CustomerRecord]) -> Vec<(YesNo, Vec<&CustomerRecord>)> {
    YesNo::ALL
        .iter()
        .map(|flag| {
            let rows: Vec<&CustomerRecord> =
                customers.iter().filter(|c| c.churn == *flag).collect();
            (*flag, rows)
        })
        .filter(|(_, rows)| !rows.is_empty())
        .collect()
}

/// Monthly charges by tenure, one box per churn group, every point drawn.
pub fn tenure_vs_monthly_box(customers: &[CustomerRecord]) -> Plot {
    let mut plot = Plot::new();
    for (flag, rows) in churn_groups(customers) {
        let x: Vec<u32> = rows.iter().map(|c| c.tenure).collect();
        let y: Vec<f64> = rows.iter().map(|c| c.monthly_charges).collect();
        plot.add_trace(
            BoxPlot::new_xy(x, y)
                .name(flag.label())
                .box_points(BoxPoints::All),
        );
    }
    plot.set_layout(
        with_legend(
            with_axes(
                titled("Distribution of Tenure vs Monthly Charges"),
                "tenure",
                "monthly_charges",
            ),
            "churn",
        )
        .box_mode(BoxMode::Group),
    );
    plot
}

/// Marker sizes for `SizeMode::Area` with a reference of 1: the largest
/// tenure in the table maps to a `SCATTER_SIZE_MAX` pixel marker.
fn area_sizes(tenures: &[u32], largest_tenure: u32) -> Vec<usize> {
    let scale = SCATTER_SIZE_MAX * SCATTER_SIZE_MAX / (2.0 * f64::from(largest_tenure.max(1)));
    tenures
        .iter()
        .map(|t| ((f64::from(*t) * scale).round() as usize).max(1))
        .collect()
}

/// Total against monthly charges, one trace per churn group. Marker area
/// follows tenure on a scale shared by both groups; hover shows tenure,
/// contract and payment method.
pub fn churn_vs_monthly_scatter(customers: &[CustomerRecord]) -> Plot {
    let largest_tenure = customers.iter().map(|c| c.tenure).max().unwrap_or(1);

    let mut plot = Plot::new();
    for (flag, rows) in churn_groups(customers) {
        let x: Vec<f64> = rows.iter().map(|c| c.monthly_charges).collect();
        let y: Vec<f64> = rows.iter().map(|c| c.total_charges).collect();
        let tenures: Vec<u32> = rows.iter().map(|c| c.tenure).collect();
        let hover: Vec<String> = rows
            .iter()
            .map(|c| {
                format!(
                    "tenure={}<br>contract={}<br>payment_method={}",
                    c.tenure, c.contract, c.payment_method
                )
            })
            .collect();

        plot.add_trace(
            Scatter::new(x, y)
                .name(flag.label())
                .mode(Mode::Markers)
                .marker(
                    Marker::new()
                        .size_array(area_sizes(&tenures, largest_tenure))
                        .size_mode(SizeMode::Area)
                        .size_ref(1),
                )
                .text_array(hover)
                .hover_template(SCATTER_HOVER),
        );
    }
    plot.set_layout(with_legend(
        with_axes(
            titled("Churn vs Monthly Charges"),
            "Monthly Charges",
            "Total Charges",
        ),
        "churn",
    ));
    plot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate::Aggregates, dataset::fabricate};
    use serde_json::Value;

    fn json(plot: &Plot) -> Value {
        figure_json(plot).unwrap()
    }

    fn pie_total(fig: &Value) -> u64 {
        assert_eq!(fig["data"][0]["type"], "pie");
        fig["data"][0]["values"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .sum()
    }

    #[test]
    fn category_pies_cover_every_customer() {
        let customers = fabricate(11, 300).unwrap();
        for fig in [
            gender_distribution(&customers),
            senior_citizen_distribution(&customers),
            internet_service_types(&customers),
            payment_methods(&customers),
        ] {
            let fig = json(&fig);
            assert_eq!(pie_total(&fig), 300, "{}", fig["layout"]["title"]);
        }
    }

    #[test]
    fn churn_pie_sums_churned_customers() {
        let customers = fabricate(11, 300).unwrap();
        let churned = customers.iter().filter(|c| c.churned()).count() as u64;
        let agg = Aggregates::compute(&customers);
        let fig = json(&churn_by_contract_pie(&agg.churn_by_contract));
        assert_eq!(pie_total(&fig), churned);
        assert_eq!(fig["layout"]["title"]["text"], "Churn Rate by Contract Type");
    }

    #[test]
    fn churn_split_traces_partition_the_table() {
        let customers = fabricate(5, 120).unwrap();
        let fig = json(&churn_vs_monthly_scatter(&customers));
        let traces = fig["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["name"], "No");
        assert_eq!(traces[1]["name"], "Yes");
        let points: usize = traces
            .iter()
            .map(|t| {
                assert_eq!(t["type"], "scatter");
                assert_eq!(t["mode"], "markers");
                assert_eq!(t["marker"]["sizemode"], "area");
                t["x"].as_array().unwrap().len()
            })
            .sum();
        assert_eq!(points, 120);

        let boxes = json(&tenure_vs_monthly_box(&customers));
        let traces = boxes["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        for t in traces {
            assert_eq!(t["type"], "box");
            assert_eq!(t["boxpoints"], "all");
        }
        assert_eq!(boxes["layout"]["boxmode"], "group");
    }

    #[test]
    fn area_sizes_share_one_scale() {
        let sizes = area_sizes(&[72, 36, 1], 72);
        assert_eq!(sizes, vec![113, 56, 2]);
        assert_eq!(area_sizes(&[10], 0), vec![1125]);
    }

    #[test]
    fn average_line_is_a_spline_with_markers() {
        let customers = fabricate(5, 200).unwrap();
        let agg = Aggregates::compute(&customers);
        let fig = json(&avg_charges_by_internet_line(&agg.avg_charges_by_internet));
        assert_eq!(fig["data"][0]["line"]["shape"], "spline");
        assert_eq!(fig["data"][0]["mode"], "lines+markers");
    }

    #[test]
    fn multiple_lines_has_one_trace_per_value() {
        let customers = fabricate(5, 200).unwrap();
        let fig = json(&multiple_lines_usage(&customers));
        let names: Vec<&str> = fig["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["No", "No phone service", "Yes"]);
    }

    #[test]
    fn empty_aggregates_give_empty_traces() {
        let fig = json(&tenure_count_bar(&[]));
        assert_eq!(fig["data"][0]["type"], "bar");
        assert!(fig["data"][0]["x"].as_array().unwrap().is_empty());
    }
}
