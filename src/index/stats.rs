use crate::index::build::BuildReport;
use crate::index::types::IndexStats;
use std::io::{self, Write};

/// Display index statistics
pub fn print_stats(stats: &IndexStats, report: Option<&BuildReport>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_stats(&mut out, stats, report)
}

/// Render index statistics as a human-readable report
pub fn write_stats<W: Write>(
    out: &mut W,
    stats: &IndexStats,
    report: Option<&BuildReport>,
) -> io::Result<()> {
    writeln!(out, "Index Statistics")?;
    writeln!(out, "================")?;
    writeln!(out)?;
    writeln!(out, "Max anchor length: {}", stats.max_anchor_len)?;
    writeln!(out, "Removal support:   {}", if stats.support_remove { "yes" } else { "no" })?;
    writeln!(out, "Names:             {}", stats.names)?;
    writeln!(out, "Name data:         {}", format_size(stats.name_bytes as u64))?;
    writeln!(out, "Anchors:           {}", stats.anchors)?;
    writeln!(out, "Postings:          {}", stats.postings)?;
    writeln!(out, "Mean list length:  {:.2}", stats.mean_list_len())?;

    if let Some((anchor, len)) = &stats.largest_list {
        writeln!(out, "Largest list:      {:?} ({} names)", anchor, len)?;
    }

    writeln!(out)?;
    writeln!(out, "Anchors by length:")?;
    for (i, count) in stats.anchors_by_len.iter().enumerate() {
        writeln!(out, "  {:2} chars        {}", i + 1, count)?;
    }

    if let Some(report) = report {
        writeln!(out)?;
        writeln!(out, "Loaded:            {} names", report.added)?;
        if report.duplicates > 0 {
            writeln!(out, "Duplicates:        {}", report.duplicates)?;
        }
        if report.skipped > 0 {
            writeln!(out, "Skipped:           {}", report.skipped)?;
        }
        writeln!(out, "Load time:         {:.1}ms", report.elapsed.as_secs_f64() * 1000.0)?;
    }

    Ok(())
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
