use crate::{report::DeliveryError, scan::ScanResult};
use prettytable::{Cell, Row, Table};

pub const COLUMNS: [&str; 6] = [
    "Symbol",
    "Interval",
    "Price",
    "MovingAverage",
    "DeltaPercent",
    "Slope",
];

pub const NO_CANDIDATES_NOTICE: &str = "No candidates found with current threshold/settings.";

/// Build the candidate [`Table`], one row per candidate in [`ScanResult`] order.
///
/// Price, moving average & delta percent are rounded to two decimals, slope to six. Undefined
/// values render as `N/A`.
pub fn candidate_table(result: &ScanResult) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(COLUMNS.iter().map(|title| Cell::new(title)).collect()));

    for signal in result.iter() {
        table.add_row(Row::new(vec![
            Cell::new(signal.symbol.as_str()),
            Cell::new(&signal.interval.to_string()),
            Cell::new(&format!("{:.2}", signal.last_close)),
            Cell::new(&format!("{:.2}", signal.last_ma)),
            Cell::new(&optional(signal.diff_pct, 2)),
            Cell::new(&optional(signal.slope, 6)),
        ]));
    }

    table
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| format!("{value:.decimals$}"))
}

/// Serialise the [`Table`] (titles included) as CSV.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, DeliveryError> {
    table
        .to_csv(Vec::new())
        .map_err(|error| DeliveryError::Encode(error.to_string()))?
        .into_inner()
        .map_err(|error| DeliveryError::Encode(error.error().to_string()))
}

/// Print the candidate table to stdout, or an explicit notice if there are no candidates.
pub fn print_summary(result: &ScanResult) {
    println!();
    if result.is_empty() {
        println!("{NO_CANDIDATES_NOTICE}");
    } else {
        println!("Candidates ({})", result.len());
        candidate_table(result).printstd();
    }
}
