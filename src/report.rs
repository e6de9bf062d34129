//! Plain-text rendering of an [`AnalyticsSummary`] for the admin CLI

use std::fmt::Write;

use crate::analytics::{AnalyticsSummary, Insights, NewVsReturning};

/// Render the summary as the dashboard would show it
pub fn render(summary: &AnalyticsSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Visitor Analytics ({} to {}, last {} days)",
        summary.window_start, summary.window_end, summary.window_size_days
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<18} {:>10}", "Total Visitors", thousands(summary.total_visitors));
    let _ = writeln!(out, "{:<18} {:>10}", "Today's Visitors", thousands(summary.today_visitors));
    let _ = writeln!(out, "{:<18} {:>10}", "Return Visitors", thousands(summary.return_visitors));
    let _ = writeln!(out, "{:<18} {:>10}", "New Visitors", thousands(summary.new_visitors));

    let _ = writeln!(out);
    let _ = writeln!(out, "Page-specific Visitors");
    if summary.page_visitors.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (page_type, count) in &summary.page_visitors {
        let _ = writeln!(out, "  {:<24} {:>10}", page_title(page_type), thousands(*count));
    }

    let _ = writeln!(out);
    let metrics = match &summary.insights {
        Insights::NoData => {
            let _ = writeln!(out, "No visitor data available yet.");
            let _ = writeln!(
                out,
                "Visitor tracking will start showing data once users visit your website."
            );
            return out;
        }
        Insights::Available(metrics) => metrics,
    };

    let _ = writeln!(out, "Cumulative Visitor Trends");
    let _ = writeln!(out, "  {:<8} {:>10} {:>10} {:>10}", "Day", "Total", "New", "Return");
    for stat in &summary.daily_stats {
        let _ = writeln!(
            out,
            "  {:<8} {:>10} {:>10} {:>10}",
            stat.date.format("%b %-d").to_string(),
            stat.cumulative_total_visitors,
            stat.cumulative_new_visitors,
            stat.cumulative_return_visitors
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Visitor Insights");
    let _ = writeln!(
        out,
        "  Average Daily Visitors: {}",
        thousands(metrics.average_daily_visitors)
    );
    let _ = writeln!(
        out,
        "  Return Visitor Rate: {}%",
        metrics.return_visitor_rate_percent
    );
    let _ = writeln!(out, "  Peak Day: {}", metrics.peak_day.format("%a, %b %-d"));

    let _ = writeln!(out);
    let _ = writeln!(out, "Growth Metrics");
    let _ = writeln!(out, "  Total Page Views: {}", thousands(metrics.total_page_views));
    let split = match metrics.new_vs_returning {
        NewVsReturning::Split {
            new_percent,
            return_percent,
        } => format!("{new_percent}% / {return_percent}%"),
        NewVsReturning::NotApplicable => "N/A".to_string(),
    };
    let _ = writeln!(out, "  New vs Returning: {split}");
    let _ = writeln!(out, "  Tracking Period: {} Days", metrics.tracking_period_days);

    out
}

/// "product" -> "Product Page"
fn page_title(page_type: &str) -> String {
    let mut chars = page_type.chars();
    match chars.next() {
        Some(first) => format!("{}{} Page", first.to_uppercase(), chars.as_str()),
        None => "Page".to_string(),
    }
}

/// 1234567 -> "1,234,567"
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
