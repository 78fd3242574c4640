//! Render a pivot result as CSV: `quarter` column plus one column per town
//! in legend order, empty cells for missing values. Used by the
//! `/api/trends.csv` endpoint and `merlion pivot --csv`.

use std::io::Write;

use crate::chart::PivotResult;

/// Write `result` as CSV to `writer`. Row count equals the axis length.
pub fn write_pivot_csv<W: Write>(result: &PivotResult, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(result.series.len() + 1);
    header.push("quarter");
    for name in &result.legend {
        header.push(name.as_str());
    }
    out.write_record(&header)?;

    for (row, quarter) in result.quarters.iter().enumerate() {
        let mut cells = Vec::with_capacity(header.len());
        cells.push(quarter.clone());
        for series in &result.series {
            let cell = series
                .values
                .get(row)
                .copied()
                .flatten()
                .map(|price| price.to_string())
                .unwrap_or_default();
            cells.push(cell);
        }
        out.write_record(&cells)?;
    }

    out.flush()?;
    Ok(())
}

/// Convenience wrapper producing a CSV string.
pub fn pivot_to_csv_string(result: &PivotResult) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_pivot_csv(result, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
