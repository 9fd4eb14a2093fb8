use std::io::{self, Write};

use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement,
    Table,
};
use nmeastat_core::{formatting::format_duration, model::TrackStatistics};

const NO_PACE: &str = "--:--.-";

/// Writes the split table followed by the speed summary to 'w', which can
/// be stdout or a file writer.
#[rustfmt::skip]
pub fn write_split_report<W: Write>(w: &mut W, stats: &TrackStatistics) -> io::Result<()> {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            "Split",
            "Record",
            "Cum. Distance\n(miles)",
            "Distance\n(miles)",
            "Elapsed",
            "Pace\n(min/mile)",
        ])
        .set_content_arrangement(ContentArrangement::Dynamic);

    let num_splits = stats.splits.len();
    for (idx, split) in stats.splits.iter().enumerate() {
        // The last row is whatever was left after the final full split.
        let label = if idx + 1 == num_splits { "Rest".to_string() } else { (idx + 1).to_string() };

        table.add_row(vec![
            Cell::new(label).set_alignment(CellAlignment::Right),
            Cell::new(split.record_index).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", split.cum_distance_miles)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", split.segment_distance_miles)).set_alignment(CellAlignment::Right),
            Cell::new(format_duration(split.elapsed)).set_alignment(CellAlignment::Right),
            Cell::new(split.pace.as_deref().unwrap_or(NO_PACE)).set_alignment(CellAlignment::Right),
        ]);
    }

    writeln!(w, "Splits every {:.3} metres", stats.split_distance_metres)?;
    writeln!(w, "{}", table)?;

    let m = &stats.speed_metrics;
    writeln!(w, "Total distance: {:.3} km ({:.3} miles)", m.total_distance_km, m.total_distance_miles)?;
    writeln!(w, "Average pace:   {}", m.average_pace.as_deref().unwrap_or(NO_PACE))?;
    writeln!(w, "Mean speed:     {:.2} mph ({:.2} m/s computed)", m.mean_mph, m.mean_mps_computed)?;
    writeln!(w, "Max speed:      {:.2} mph ({:.2} m/s computed)", m.max_mph, m.max_mps_computed)?;

    if stats.skipped_records > 0 {
        writeln!(w, "{} records could not be used and were skipped", stats.skipped_records)?;
    }

    Ok(())
}
