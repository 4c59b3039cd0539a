use crate::controller::StatsSnapshot;
use crate::layout::{Layout, SectionId};
use crate::model::{interval_deltas, Snapshot};
use super::shared::{bar, format_bytes, format_number, sparkline, truncate_str};

/// A rendered dashboard row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Header(String),
    Text(String),
}

const SERIES_PREFIX: usize = 42;
const NAME_WIDTH: usize = 20;
const BAR_WIDTH: usize = 30;

/// Build the dashboard rows for a terminal `width` columns wide.
pub fn dashboard_lines(
    snapshot: Option<&Snapshot>,
    stats: &StatsSnapshot,
    layout: &Layout,
    width: usize,
) -> Vec<Line> {
    let mut lines = Vec::new();

    match snapshot {
        Some(s) => lines.push(Line::Text(format!(
            "  {}  |  tick {}  |  {} points",
            s.time,
            s.tick,
            s.series.len()
        ))),
        None => lines.push(Line::Text("  waiting for first sample...".to_string())),
    }
    lines.push(Line::Text(String::new()));

    for (i, section) in layout.sections.iter().enumerate() {
        let indicator = if section.collapsed { "▶" } else { "▼" };
        lines.push(Line::Header(format!(
            "{} [{}] --- {} ---",
            indicator,
            i + 1,
            section.title
        )));
        if section.collapsed {
            continue;
        }

        match (section.id, snapshot) {
            (SectionId::Collector, _) => collector_lines(&mut lines, stats),
            (_, None) => lines.push(Line::Text("  no data yet".to_string())),
            (SectionId::Bandwidth, Some(s)) => {
                let spark = spark_width(width);
                lines.push(series_line("Sent", &s.series.bytes_sent, format_bytes, spark));
                lines.push(series_line("Received", &s.series.bytes_recv, format_bytes, spark));
            }
            (SectionId::Packets, Some(s)) => {
                let spark = spark_width(width);
                lines.push(series_line("Sent", &s.series.packets_sent, format_number, spark));
                lines.push(series_line("Received", &s.series.packets_recv, format_number, spark));
            }
            (SectionId::TopApplications, Some(s)) => {
                if s.top_talkers.is_empty() {
                    lines.push(Line::Text("  (no established connections)".to_string()));
                }
                let max = s.top_talkers.first().map(|t| t.connections as u64).unwrap_or(0);
                for t in &s.top_talkers {
                    lines.push(Line::Text(format!(
                        "  {:<w$} {} {}",
                        truncate_str(&t.name, NAME_WIDTH),
                        bar(t.connections as u64, max, BAR_WIDTH),
                        t.connections,
                        w = NAME_WIDTH
                    )));
                }
            }
        }
        lines.push(Line::Text(String::new()));
    }

    lines
}

fn spark_width(width: usize) -> usize {
    width.saturating_sub(SERIES_PREFIX).max(8)
}

/// "label  total  last-interval  sparkline"
fn series_line(label: &str, values: &[u64], fmt: fn(u64) -> String, spark: usize) -> Line {
    let total = values.last().map(|v| fmt(*v)).unwrap_or_else(|| "-".to_string());
    let deltas = interval_deltas(values);
    let last = match deltas.last() {
        None => "-".to_string(),
        Some(None) => "reset".to_string(),
        Some(Some(d)) => format!("+{}", fmt(*d)),
    };
    Line::Text(format!(
        "  {:<9} {:>12}  {:>12}  {}",
        label,
        total,
        last,
        sparkline(&deltas, spark)
    ))
}

fn collector_lines(lines: &mut Vec<Line>, stats: &StatsSnapshot) {
    lines.push(Line::Text(format!(
        "  ticks ok: {}  failed: {}  skipped connections: {}",
        stats.ticks_ok, stats.ticks_failed, stats.connections_skipped
    )));
    if let Some(err) = &stats.last_error {
        lines.push(Line::Text(format!("  last error: {}", err)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SeriesSnapshot, TopTalker};

    fn snapshot() -> Snapshot {
        Snapshot {
            tick: 3,
            time: "12:00:03".into(),
            series: SeriesSnapshot {
                bytes_sent: vec![1000, 3048, 100],
                bytes_recv: vec![0, 1024, 2048],
                packets_sent: vec![1, 2, 3],
                packets_recv: vec![10, 20, 30],
            },
            top_talkers: vec![
                TopTalker { name: "firefox".into(), connections: 4 },
                TopTalker { name: "ssh".into(), connections: 2 },
            ],
        }
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines
            .iter()
            .map(|l| match l {
                Line::Header(s) | Line::Text(s) => s.as_str(),
            })
            .collect()
    }

    #[test]
    fn waiting_before_first_snapshot() {
        let lines = dashboard_lines(None, &StatsSnapshot::default(), &Layout::default_layout(), 100);
        let t = texts(&lines);
        assert_eq!(t[0], "  waiting for first sample...");
        assert!(t.contains(&"  no data yet"));
    }

    #[test]
    fn renders_series_and_ranking() {
        let snap = snapshot();
        let lines = dashboard_lines(Some(&snap), &StatsSnapshot::default(), &Layout::default_layout(), 100);
        let t = texts(&lines);
        assert_eq!(t[0], "  12:00:03  |  tick 3  |  3 points");
        assert!(t.iter().any(|l| l.starts_with("  Sent") && l.contains("reset")));
        assert!(t.iter().any(|l| l.starts_with("  Received") && l.contains("+1.00 KB")));
        let firefox = t.iter().find(|l| l.contains("firefox")).unwrap();
        assert!(firefox.ends_with(" 4"));
        assert!(firefox.contains(&"█".repeat(BAR_WIDTH)));
        let ssh = t.iter().find(|l| l.contains("ssh")).unwrap();
        assert!(ssh.contains(&format!("{}{}", "█".repeat(15), "░".repeat(15))));
    }

    #[test]
    fn collapsed_sections_show_header_only() {
        let snap = snapshot();
        let mut layout = Layout::default_layout();
        layout.toggle_section(SectionId::TopApplications);
        let lines = dashboard_lines(Some(&snap), &StatsSnapshot::default(), &layout, 100);
        assert!(lines.contains(&Line::Header(
            "▶ [3] --- Top Applications (Active Connections) ---".into()
        )));
        assert!(!texts(&lines).iter().any(|l| l.contains("firefox")));
    }

    #[test]
    fn collector_section_shows_last_error() {
        let mut layout = Layout::default_layout();
        layout.toggle_section(SectionId::Collector);
        let stats = StatsSnapshot {
            ticks_ok: 5,
            ticks_failed: 1,
            connections_skipped: 2,
            last_error: Some("transient read error: x".into()),
        };
        let lines = dashboard_lines(None, &stats, &layout, 80);
        let t = texts(&lines);
        assert!(t.contains(&"  ticks ok: 5  failed: 1  skipped connections: 2"));
        assert!(t.contains(&"  last error: transient read error: x"));
    }
}
