//! Diagnostic side file.
//!
//! One header row `name,artist,distance,id` followed by one row per ranked track.
//! Rows come out as computed (input order) unless [`ExportOrder::ByDistance`] is
//! requested. The file is for inspection only and is not read back.

use std::path::PathBuf;

use csv::WriterBuilder;
use serde::Serialize;

use crate::{
    Res,
    orderer::{RankedResult, RankedTrack},
};

pub const DEFAULT_EXPORT_FILE: &str = "sfilt.csv";

/// Column names of the side file.
pub const CSV_HEADER: [&str; 4] = ["name", "artist", "distance", "id"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportOrder {
    /// Input order, the way distances were computed.
    #[default]
    AsComputed,
    /// Ascending distance, input order breaking ties.
    ByDistance,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub path: PathBuf,
    pub order: ExportOrder,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EXPORT_FILE),
            order: ExportOrder::AsComputed,
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    artist: &'a str,
    distance: f64,
    id: &'a str,
}

impl<'a> From<&'a RankedTrack> for CsvRow<'a> {
    fn from(track: &'a RankedTrack) -> Self {
        Self {
            name: &track.name,
            artist: &track.artist,
            distance: track.distance,
            id: &track.id,
        }
    }
}

/// Renders the side file into memory.
pub fn render_csv(ranked: &RankedResult, order: ExportOrder) -> Res<Vec<u8>> {
    let rows: Vec<&RankedTrack> = match order {
        ExportOrder::AsComputed => ranked.rows().iter().collect(),
        ExportOrder::ByDistance => ranked.sorted_rows(),
    };

    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buffer);
        writer.write_record(CSV_HEADER)?;
        for row in rows {
            writer.serialize(CsvRow::from(row))?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// Writes the side file in a single call, creating parent directories as needed.
pub async fn write_side_file(ranked: &RankedResult, options: &ExportOptions) -> Res<()> {
    if let Some(parent) = options.path.parent() {
        if !parent.as_os_str().is_empty() {
            async_fs::create_dir_all(parent).await?;
        }
    }

    let content = render_csv(ranked, options.order)?;
    async_fs::write(&options.path, content).await?;
    Ok(())
}
