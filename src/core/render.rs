use crate::domain::model::{Column, SeatStatus};
use crate::utils::error::{BookingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the full-chart view may show booking references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionPolicy {
    #[default]
    Redact,
    Reveal,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub policy: RedactionPolicy,
    /// Shown for booked seats under `RedactionPolicy::Redact`.
    pub booked_marker: char,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            policy: RedactionPolicy::Redact,
            booked_marker: 'R',
        }
    }
}

impl RenderOptions {
    pub fn marker(&self, status: &SeatStatus) -> String {
        match status {
            SeatStatus::Free => "F".to_string(),
            SeatStatus::Aisle => "X".to_string(),
            SeatStatus::Storage => "S".to_string(),
            SeatStatus::Booked(reference) => match self.policy {
                RedactionPolicy::Redact => self.booked_marker.to_string(),
                RedactionPolicy::Reveal => reference.to_string(),
            },
        }
    }

    /// Key for the markers [`marker`](Self::marker) prints.
    pub fn legend(&self) -> String {
        match self.policy {
            RedactionPolicy::Redact => {
                format!("F = Free, {} = Reserved, S = Storage", self.booked_marker)
            }
            RedactionPolicy::Reveal => {
                "F = Free, S = Storage, booked seats show their reference".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub row: u8,
    /// One marker per slot: A, B, C, aisle, D, E, F.
    pub cells: Vec<String>,
}

/// Rendered seating chart, rows ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub rows: Vec<RowView>,
}

impl ChartView {
    pub fn row(&self, row: u8) -> Option<&RowView> {
        self.rows.iter().find(|r| r.row == row)
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header = vec!["row".to_string()];
        header.extend(Column::ALL.iter().map(|column| match column.letter() {
            Some(letter) => letter.to_string(),
            None => "aisle".to_string(),
        }));
        writer.write_record(&header)?;
        for row in &self.rows {
            let mut record = vec![row.row.to_string()];
            record.extend(row.cells.iter().cloned());
            writer.write_record(&record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| BookingError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| BookingError::ValidationError {
            message: format!("CSV output is not UTF-8: {}", e),
        })
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(1);

        let header: Vec<String> = Column::ALL
            .iter()
            .map(|column| {
                let label = column.letter().map(String::from).unwrap_or_default();
                format!("{:<width$}", label, width = width)
            })
            .collect();
        writeln!(f, "    {}", header.join("   ").trim_end())?;

        for row in &self.rows {
            let cells: Vec<String> = Column::ALL
                .iter()
                .zip(&row.cells)
                .map(|(column, cell)| {
                    // The aisle is a blank gap in the printed chart.
                    let cell = if *column == Column::Aisle { " " } else { cell.as_str() };
                    format!("{:<width$}", cell, width = width)
                })
                .collect();
            writeln!(f, "{:>3} {}", row.row, cells.join("   ").trim_end())?;
        }
        Ok(())
    }
}
