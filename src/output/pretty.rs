use colored::Colorize;

use crate::detect::AssetStatus;
use crate::features::focus::{format_time, render_progress_bar, FocusState};
use crate::features::replay::ReplayReport;
use crate::output::AngleReading;

fn state_label(state: FocusState) -> String {
    match state {
        FocusState::Focused => state.label().green().bold().to_string(),
        FocusState::Distracted => state.label().red().bold().to_string(),
    }
}

/// Format a replay report as a pretty summary
pub fn format_report_pretty(report: &ReplayReport) -> String {
    let summary = &report.summary;

    let mut output = format!(
        "Session replay ({} classifier)\n",
        report.classifier
    );
    output.push_str(&"─".repeat(40));
    output.push('\n');

    output.push_str(&format!("  {}:    {}\n", "Elapsed".dimmed(), summary.elapsed()));
    output.push_str(&format!(
        "  {}:    {}\n",
        "Focused".dimmed(),
        summary.focused().green()
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Distracted".dimmed(),
        summary.distracted().red()
    ));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = (summary.focus_ratio() * 100.0).round() as u8;
    output.push_str(&format!(
        "  {}:      {} {percent}%\n",
        "Focus".dimmed(),
        render_progress_bar(summary.focus_ratio(), 20)
    ));
    output.push_str(&format!("  {}:      {}\n", "Final".dimmed(), state_label(summary.state)));
    output.push_str(&format!(
        "  {}:  {} frames, {} faces, {} failed, {} unknown angle\n",
        "Detection".dimmed(),
        summary.stats.frames,
        summary.stats.faces,
        summary.stats.failures,
        summary.stats.unknown_angles
    ));

    if !report.timeline.is_empty() {
        output.push('\n');
        output.push_str(&format!("{}\n", "Transitions".bold()));
        for entry in &report.timeline {
            output.push_str(&format!(
                "  {}  {} -> {}\n",
                format_time(entry.at_ms).dimmed(),
                entry.from,
                state_label(entry.to)
            ));
        }
    }

    if !report.failures.is_empty() {
        output.push('\n');
        output.push_str(&format!("{}\n", "Failed detections".bold()));
        for failure in &report.failures {
            output.push_str(&format!(
                "  {}  {}\n",
                format_time(failure.at_ms).dimmed(),
                failure.message.yellow()
            ));
        }
    }

    output.trim_end().to_string()
}

/// Format an angle reading as pretty output
pub fn format_angle_pretty(reading: &AngleReading) -> String {
    let angle = reading.angle_degrees.map_or_else(
        || {
            format!(
                "unknown ({})",
                reading.reason.as_deref().unwrap_or("no reason given")
            )
            .yellow()
            .to_string()
        },
        |a| format!("{a:.1}°"),
    );

    format!(
        "{}: {}\n{}: {}°\n{}: {}",
        "Angle".dimmed(),
        angle,
        "Threshold".dimmed(),
        reading.threshold_degrees,
        "State".dimmed(),
        state_label(reading.state)
    )
}

/// Format model asset checks as pretty output
pub fn format_assets_pretty(assets: &[AssetStatus]) -> String {
    let mut output = String::new();

    for asset in assets {
        let icon = if asset.present {
            "✓".green()
        } else {
            "✗".red()
        };
        output.push_str(&format!(
            "{} {}  {}\n",
            icon,
            asset.model.bold(),
            asset.path.display().to_string().dimmed()
        ));
    }

    if assets.iter().all(|a| a.present) {
        output.push_str(&"All models present".green().to_string());
    } else {
        output.push_str(&"Some models are missing".red().to_string());
    }

    output
}
