use pdfpeak::pipeline::{Integrated, Prepared, Tracked};

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    console::style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}

#[cfg(feature = "colorized_output")]
fn value(v: impl std::fmt::Display) -> String {
    console::style(v).green().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn value(v: impl std::fmt::Display) -> String {
    v.to_string()
}

pub fn print_prepared(prepared: &Prepared) {
    println!("{}", heading("Prepare"));
    println!("  Measurements:  {}", value(prepared.log.len()));
    println!("  Analytes:      {}", value(prepared.analytes.analyte_count()));
    println!("  Dwell groups:  {}", value(prepared.analytes.groups.len()));
    println!("  Ramp curves:   {}", value(prepared.ramp_peaks.len()));
    println!("  Dwell curves:  {}", value(prepared.dwell_peaks.len()));
    let labelled: usize = prepared.bond_labels.iter().map(|(_, labels)| labels.len()).sum();
    println!("  Bond labels:   {}", value(labelled));
}

pub fn print_tracked(tracked: &Tracked) {
    println!("{}", heading("Track"));
    println!("  Curves:        {}", value(tracked.matrix.row_count()));
    println!("  Peak columns:  {}", value(tracked.matrix.column_count()));
    println!("  Tracked cells: {}", value(tracked.matrix.present().count()));
}

pub fn print_integrated(integrated: &Integrated) {
    let differences = &integrated.differences;
    println!("{}", heading("Integrate"));
    println!("  Reference:     {}", value(differences.reference_key));
    println!("  Short-range:   {}", value(differences.reference_peaks.len()));
    for (key, matches) in &differences.curves {
        println!("  {:<14} {} matched", format!("{key}:"), value(matches.len()));
    }
}
