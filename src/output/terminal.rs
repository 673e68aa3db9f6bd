// Colored terminal output for the overview list and channel detail view.
//
// This module handles all terminal-specific formatting: colors, tables,
// badges. It consumes pre-computed series and scalars from the query
// facade and produces no data back into the engine. Every function
// renders something sensible for the all-zero/empty case.

use colored::Colorize;

use crate::analytics::query::{ChannelDetail, ChannelOverview, VideoRow};
use crate::analytics::trajectory::Trajectory;
use crate::data::models::ChannelMeta;
use crate::output::{format_korean_count, group_thousands, truncate_chars};

/// Display the ranked channel overview list.
pub fn display_overview(rows: &[ChannelOverview]) {
    if rows.is_empty() {
        println!("No channels in the dataset.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Channel Overview ({} channels) ===", rows.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<24} {:<12} {:>12}  {:>10}  {:>12}  {:>7}",
        "Rank".dimmed(),
        "Channel".dimmed(),
        "Category".dimmed(),
        "Subscribers".dimmed(),
        "Subs +/-".dimmed(),
        "Avg Views".dimmed(),
        "Shorts".dimmed(),
    );
    println!("  {}", "-".repeat(92).dimmed());

    for (i, row) in rows.iter().enumerate() {
        let diff = if row.subs_diff >= 0 {
            format!("+{}", group_thousands(row.subs_diff as u64)).green()
        } else {
            format!("-{}", group_thousands(row.subs_diff.unsigned_abs())).red()
        };

        println!(
            "  {:>4}. {:<24} {:<12} {:>12}  {:>10}  {:>12}  {:>6.0}%",
            i + 1,
            truncate_chars(&row.channel_title, 20),
            truncate_chars(&row.category, 10),
            format_korean_count(row.latest_subscribers),
            diff,
            format_korean_count(row.avg_views.round().max(0.0) as u64),
            row.short_ratio * 100.0,
        );
    }
    println!();
}

/// Display the full channel detail view.
pub fn display_channel_detail(detail: &ChannelDetail, meta: Option<&ChannelMeta>) {
    let title = meta
        .map(|m| m.channel_title.as_str())
        .unwrap_or(detail.channel_id.as_str());

    println!("\n{}", format!("=== {title} ===").bold());
    if let Some(meta) = meta {
        if !meta.handle.is_empty() {
            println!("  {}", meta.handle.dimmed());
        }
        if !meta.category.is_empty() {
            println!("  #{}", meta.category);
        }
    }
    println!();

    if detail.subscriber.degenerate {
        println!(
            "  {}",
            "Not enough snapshots in the window — metrics are zero-filled.".yellow()
        );
    }

    println!(
        "  Subscribers: {}   Growth since collection start: {}   Daily avg: {:.1}",
        format_korean_count(detail.subscriber.end).bold(),
        format_signed(detail.subscriber.growth),
        detail.subscriber.daily_avg,
    );
    if let Some(meta) = meta {
        println!(
            "  Total views: {}   Videos: {}",
            format_korean_count(meta.total_view_count),
            group_thousands(meta.video_count),
        );
    }
    println!("  Channel GainIndex: {:.4}", detail.gain_index);
    println!();

    println!(
        "{} (recent avg {})",
        "Long-form expected views by day".green().bold(),
        group_thousands(detail.long_recent_avg_views.round().max(0.0) as u64)
    );
    display_trajectory(&detail.long_trajectory);

    println!(
        "{} (recent avg {})",
        "Shorts expected views by day".blue().bold(),
        group_thousands(detail.short_recent_avg_views.round().max(0.0) as u64)
    );
    display_trajectory(&detail.short_trajectory);

    display_video_list(&detail.videos);
}

/// Render one trajectory as a compact two-row pivot table.
pub fn display_trajectory(trajectory: &Trajectory) {
    let pivot = trajectory.pivot();
    if pivot.is_empty() {
        println!("  (no days computed)\n");
        return;
    }

    // 10 columns per row keeps a 30-day table readable.
    for chunk in pivot.chunks(10) {
        let labels: Vec<String> = chunk.iter().map(|(d, _)| format!("{d:>9}")).collect();
        let values: Vec<String> = chunk
            .iter()
            .map(|(_, v)| format!("{:>9}", group_thousands(*v)))
            .collect();
        println!("  {}", labels.join(" ").dimmed());
        println!("  {}", values.join(" "));
    }
    println!();
}

/// Display the ranked video list with gain scores and expected views.
pub fn display_video_list(videos: &[VideoRow]) {
    if videos.is_empty() {
        println!("No videos for this channel.");
        return;
    }

    println!("{}", format!("Videos ({})", videos.len()).bold());
    println!(
        "  {:>4}  {:<40} {:<6} {:>10}  {:>10}  {:>6}  {:>9}",
        "Rank".dimmed(),
        "Title".dimmed(),
        "Type".dimmed(),
        "Views".dimmed(),
        "Expected".dimmed(),
        "Age".dimmed(),
        "GainScore".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for (i, video) in videos.iter().enumerate() {
        let badge = if video.is_short {
            "Short".blue()
        } else {
            "Long".green()
        };
        let gain = match video.gain_score {
            Some(score) => format!("{score:>9.4}"),
            // Excluded from attribution (shorts / not computed).
            None => format!("{:>9}", "-"),
        };

        println!(
            "  {:>4}. {:<40} {:<6} {:>10} {:>10}  D+{:<4}  {}",
            i + 1,
            truncate_chars(&video.video_title, 36),
            badge,
            group_thousands(video.view_count),
            group_thousands(video.expected_views),
            video.day_since_pub,
            gain,
        );
    }
    println!();
}

fn format_signed(n: i64) -> String {
    if n >= 0 {
        format!("+{}", group_thousands(n as u64))
    } else {
        format!("-{}", group_thousands(n.unsigned_abs()))
    }
}
