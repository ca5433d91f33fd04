use colored::Colorize;

use scoreboard_ledger::{RankedEntry, RankedView};
use scoreboard_types::Unit;

/// Width of the progress bar in cells.
pub const BAR_WIDTH: usize = 20;

pub fn medal(rank: usize) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "🏆",
    }
}

/// A bar of `width` cells, filled in proportion to `progress`.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// One uncoloured board line.
pub fn board_line(entry: &RankedEntry, unit: Unit, name_width: usize) -> String {
    format!(
        "{} {:>2}. {:<name_width$}  {:>14}  {}",
        medal(entry.rank),
        entry.rank,
        entry.name.as_str(),
        unit.format_total(entry.total),
        progress_bar(entry.progress, BAR_WIDTH),
    )
}

/// Print the ranking, highlighting the leader when someone has scored.
pub fn print_board(view: &RankedView, unit: Unit) {
    if view.is_empty() {
        println!("No members on the board.");
        return;
    }
    let name_width = view
        .iter()
        .map(|entry| entry.name.as_str().chars().count())
        .max()
        .unwrap_or(0);
    let leader = view.leader().map(|entry| entry.rank);

    for entry in view {
        let line = board_line(entry, unit, name_width);
        if leader == Some(entry.rank) {
            println!("{}", line.yellow().bold());
        } else {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreboard_types::MemberName;

    fn entry(rank: usize, name: &str, total: f64, progress: f64) -> RankedEntry {
        RankedEntry {
            rank,
            name: MemberName::new(name).unwrap(),
            total,
            progress,
        }
    }

    #[test]
    fn medals_for_podium() {
        assert_eq!(medal(1), "🥇");
        assert_eq!(medal(3), "🥉");
        assert_eq!(medal(8), "🏆");
    }

    #[test]
    fn bar_is_proportional() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(1.0, 4), "████");
        assert_eq!(progress_bar(7.0, 4), "████");
    }

    #[test]
    fn line_shows_rank_name_total_and_bar() {
        let line = board_line(&entry(2, "Bob", 125.0, 0.5), Unit::Minutes, 5);
        assert!(line.starts_with("🥈  2. Bob  "));
        assert!(line.contains("2h 5m"));
        assert!(line.ends_with(&progress_bar(0.5, BAR_WIDTH)));
    }

    #[test]
    fn points_line() {
        let line = board_line(&entry(1, "Alice", 10.0, 1.0), Unit::Points, 5);
        assert!(line.contains("10 Points"));
    }
}
