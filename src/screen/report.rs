// Terminal rendering of the screening report.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

use score_table::{
    Flag, Histogram, Record, ScoreSummary, ScoreTable, FLAGGED_COLUMN, ID_COLUMN, SCORE_COLUMN,
};

use crate::screen::ScreenOutcome;

const BAR_WIDTH: usize = 40;

/// Prints the whole screening report to the standard output.
pub fn print_report(title: &str, id_needle: &str, outcome: &ScreenOutcome) {
    println!("{}", title);
    println!(
        "{} records kept, {} rows dropped (non-numeric score), {} flagged",
        outcome.table.len(),
        outcome.table.dropped_rows(),
        outcome.table.flagged_count()
    );

    println!();
    println!("== All candidates ==");
    println!("{}", render_grid(&outcome.table));

    if let (Some(summary), Some(histogram)) = (&outcome.summary, &outcome.histogram) {
        println!();
        println!("== Score distribution ==");
        print_distribution(summary, histogram, &outcome.table.scores());
    }

    println!();
    println!(
        "== Filtered view: score in [{}, {}], id contains {:?} ==",
        outcome.bounds.0, outcome.bounds.1, id_needle
    );
    println!("Showing {} records", outcome.filtered.len());
    println!("{}", render_grid(&outcome.filtered));

    println!();
    println!("== Top {} performers ==", outcome.top.len());
    println!("{}", render_grid(&outcome.top));

    if let Some((first, second)) = &outcome.comparison {
        println!();
        println!("== Comparison: {} vs {} ==", first.id, second.id);
        println!(
            "{}",
            render_comparison(&outcome.table, first, second)
        );
    }
}

/// Renders a table as a terminal grid. The best score is shown in green
/// and the flag of the flagged candidates in yellow.
fn render_grid(view: &ScoreTable) -> Table {
    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(view.columns().iter().map(Cell::new).collect::<Vec<_>>());
    let best_score = view
        .records()
        .iter()
        .map(|r| r.score)
        .fold(f64::NEG_INFINITY, f64::max);
    for record in view.records() {
        let mut cells: Vec<Cell> = Vec::with_capacity(view.columns().len());
        for (idx, name) in view.columns().iter().enumerate() {
            let mut cell = Cell::new(view.cell_text(record, idx));
            if name == SCORE_COLUMN {
                cell = cell.set_alignment(CellAlignment::Right);
                if record.score == best_score {
                    cell = cell.fg(Color::Green);
                }
            }
            if name == FLAGGED_COLUMN && record.flagged == Flag::Yes {
                cell = cell.fg(Color::Yellow);
            }
            cells.push(cell);
        }
        grid.add_row(cells);
    }
    grid
}

fn print_distribution(summary: &ScoreSummary, histogram: &Histogram, scores: &[f64]) {
    println!(
        "count {}  mean {:.2}  min {:.2}  q1 {:.2}  median {:.2}  q3 {:.2}  max {:.2}",
        summary.count, summary.mean, summary.min, summary.q1, summary.median, summary.q3, summary.max
    );
    let (low, high) = summary.fences();
    println!(
        "whiskers [{:.2}, {:.2}], {} candidate(s) outside",
        low,
        high,
        summary.outside_fences(scores)
    );
    let max_count = histogram.max_count().max(1);
    for bin in histogram.bins() {
        let bar = "#".repeat(bin.count * BAR_WIDTH / max_count);
        println!(
            "[{:>8.2}, {:>8.2}] {:<width$} {}",
            bin.left,
            bin.right,
            bar,
            bin.count,
            width = BAR_WIDTH
        );
    }
}

/// Side by side attribute table for two candidates.
fn render_comparison(table: &ScoreTable, first: &Record, second: &Record) -> Table {
    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("attribute"),
            Cell::new(first.id.as_str()),
            Cell::new(second.id.as_str()),
        ]);
    for (idx, name) in table.columns().iter().enumerate() {
        if name == ID_COLUMN {
            continue;
        }
        grid.add_row(vec![
            Cell::new(name),
            Cell::new(table.cell_text(first, idx)),
            Cell::new(table.cell_text(second, idx)),
        ]);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_table::CellValue;

    fn sample() -> ScoreTable {
        ScoreTable::from_rows(
            vec![
                "id".to_string(),
                "score".to_string(),
                "outliers".to_string(),
            ],
            vec![
                vec![
                    CellValue::String("A1".to_string()),
                    CellValue::Int(10),
                    CellValue::Int(0),
                ],
                vec![
                    CellValue::String("A2".to_string()),
                    CellValue::Int(20),
                    CellValue::Int(1),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn the_grid_shows_every_candidate() {
        let rendered = render_grid(&sample()).to_string();
        assert!(rendered.contains("A1"), "{}", rendered);
        assert!(rendered.contains("A2"), "{}", rendered);
        assert!(rendered.contains("Flagged"), "{}", rendered);
    }

    #[test]
    fn the_comparison_leaves_out_the_id_attribute() {
        let table = sample();
        let (first, second) = table.compare("A1", "A2").unwrap();
        let rendered = render_comparison(&table, first, second).to_string();
        assert!(rendered.contains("score"), "{}", rendered);
        assert!(!rendered.contains("\u{2502} id"), "{}", rendered);
    }
}
