use std::io::{self, Write};
use crossterm::{queue, style::{Attribute, SetAttribute}};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Truncate a string to at most `max_len` characters (not bytes), appending "..."
/// if truncated. Safe for multi-byte UTF-8.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(keep).collect();
        format!("{}...", truncated)
    }
}

pub fn writeln(out: &mut impl Write, text: &str) -> io::Result<()> {
    write!(out, "{}\r\n", text)
}

pub fn write_section_header(out: &mut impl Write, text: &str) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Bold))?;
    write!(out, "{}\r\n", text)?;
    queue!(out, SetAttribute(Attribute::Reset))?;
    Ok(())
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();
    let mut result = String::new();
    for (i, &b) in bytes.iter().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(b as char);
    }
    result.chars().rev().collect()
}

/// Horizontal bar of `width` cells filled in proportion to `value / max`.
pub fn bar(value: u64, max: u64, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * width as f64).round() as usize
    }
    .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// One glyph per value, scaled to the largest in the window. `None` (a counter
/// reset) is drawn as a gap. Only the last `width` values are shown.
pub fn sparkline(values: &[Option<u64>], width: usize) -> String {
    let start = values.len().saturating_sub(width);
    let window = &values[start..];
    let max = window.iter().flatten().copied().max().unwrap_or(0);
    window
        .iter()
        .map(|v| match v {
            None => ' ',
            Some(_) if max == 0 => SPARK_LEVELS[0],
            Some(v) => {
                let level = (*v as f64 / max as f64 * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[level as usize]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_long_string() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_str_utf8() {
        assert_eq!(truncate_str("café", 4), "café");
        assert_eq!(truncate_str("hello世界", 6), "hel..."); // 7 chars, keep=3
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(2_097_152), "2.00 MB");
        assert_eq!(format_bytes(3 * 1_073_741_824), "3.00 GB");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(12), "12");
    }

    #[test]
    fn bar_scales_to_max() {
        assert_eq!(bar(0, 10, 4), "░░░░");
        assert_eq!(bar(5, 10, 4), "██░░");
        assert_eq!(bar(10, 10, 4), "████");
        assert_eq!(bar(3, 0, 2), "░░");
    }

    #[test]
    fn sparkline_marks_resets_and_keeps_tail() {
        assert_eq!(sparkline(&[Some(0), Some(7), None, Some(14)], 10), "▁▅ █");
        assert_eq!(sparkline(&[Some(1), Some(1), Some(1)], 2).chars().count(), 2);
        assert_eq!(sparkline(&[Some(0), Some(0)], 5), "▁▁");
        assert_eq!(sparkline(&[], 5), "");
    }
}
