//! Decoding and summarising encoded sections.

use std::path::Path;

use strata_section::{BlockSection, BlockStateId, SectionError};
use tracing::{info, warn};

use crate::error::ToolError;

/// Summary of one decoded section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    /// Bits per packed entry.
    pub bits: u8,
    /// Packed word count.
    pub word_count: usize,
    /// Encoded size in bytes.
    pub encoded_len: usize,
    /// Palette entries in registration order with the number of cells
    /// referencing each.
    pub histogram: Vec<(BlockStateId, usize)>,
    /// Cells whose packed index points past the palette.
    pub corrupt_cells: usize,
}

impl SectionReport {
    /// Builds a report for `section`.
    pub fn for_section(section: &BlockSection) -> Self {
        let palette = section.palette();
        let mut counts = vec![0usize; palette.len()];
        let mut corrupt_cells = 0;
        for palette_index in section.storage().iter() {
            match counts.get_mut(usize::from(palette_index)) {
                Some(count) => *count += 1,
                None => corrupt_cells += 1,
            }
        }

        Self {
            bits: section.bits_per_entry(),
            word_count: section.words().len(),
            encoded_len: section.encoded_len(),
            histogram: palette.iter().copied().zip(counts).collect(),
            corrupt_cells,
        }
    }

    /// Palette entries no cell references.
    pub fn unused_entries(&self) -> usize {
        self.histogram.iter().filter(|(_, count)| *count == 0).count()
    }

    /// Logs the report at info level.
    pub fn log(&self) {
        info!(
            "{}-bit section: {} words, {} palette entries ({} unused), {} bytes encoded",
            self.bits,
            self.word_count,
            self.histogram.len(),
            self.unused_entries(),
            self.encoded_len
        );
        for (value, count) in &self.histogram {
            info!("  {value}: {count} cells");
        }
        if self.corrupt_cells > 0 {
            warn!("{} cells hold out-of-range palette indices", self.corrupt_cells);
        }
    }
}

/// Decodes a standalone section payload.
pub fn inspect_bytes(bytes: &[u8]) -> Result<SectionReport, SectionError> {
    let section = BlockSection::from_bytes(bytes)?;
    Ok(SectionReport::for_section(&section))
}

/// Reads, decodes and reports the section stored at `path`.
pub fn inspect_file(path: &Path) -> Result<SectionReport, ToolError> {
    let bytes = std::fs::read(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    inspect_bytes(&bytes).map_err(|source| ToolError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
