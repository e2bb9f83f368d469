/// Output formatting: terminal table and JSON, plus the notice line.
use serde::Serialize;
use taskrank_core::{Item, NoticeChannel, RankingSink};

use crate::bail;

#[derive(Serialize)]
struct JsonRankedTask<'a> {
    rank: usize,
    task: &'a str,
    rating: i64,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    items: Vec<JsonRankedTask<'a>>,
    comparisons: usize,
}

/// Render the ranking as a table. Ratings are rounded for display.
pub fn render_table(ranking: &[Item]) -> String {
    let name_width = ranking
        .iter()
        .map(|item| item.label().chars().count())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Task"

    let mut out = format!(" # | {:<name_width$} | Rating\n", "Task");
    out.push_str(&format!("---|-{}-|-------\n", "-".repeat(name_width)));
    for (i, item) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "{:>2} | {:<name_width$} | {:>6}\n",
            i + 1,
            item.label(),
            item.display_rating(),
        ));
    }
    out
}

pub fn render_json(ranking: &[Item], comparisons: usize) -> String {
    let output = JsonOutput {
        items: ranking
            .iter()
            .enumerate()
            .map(|(i, item)| JsonRankedTask {
                rank: i + 1,
                task: item.label(),
                rating: item.display_rating(),
            })
            .collect(),
        comparisons,
    };

    serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| bail(format!("Failed to serialize ranking: {e}")))
}

/// Sink that prints the final ranking to stdout.
pub struct TerminalSink {
    pub json: bool,
    pub comparisons: usize,
}

impl RankingSink for TerminalSink {
    fn publish(&mut self, ranking: &[Item]) {
        if self.json {
            println!("{}", render_json(ranking, self.comparisons));
        } else {
            print!("{}", render_table(ranking));
            println!("\n{} tasks ranked ({} comparisons)", ranking.len(), self.comparisons);
        }
    }
}

/// Notices go to stderr so stdout only ever carries the ranking.
pub struct StderrNotice;

impl NoticeChannel for StderrNotice {
    fn notify(&mut self, message: &str) {
        eprintln!("Notice: {message}");
    }
}
