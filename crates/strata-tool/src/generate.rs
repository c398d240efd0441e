//! Seeded generation of test sections.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use strata_section::{BlockSection, BlockStateId, SECTION_VOLUME};
use tracing::{debug, info};

use crate::error::ToolError;

/// Parameters for [`generate_section`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Number of distinct block states to scatter.
    pub distinct: u32,
    /// RNG seed.
    pub seed: u64,
    /// Palette capacity reserved up front.
    pub palette_size_hint: usize,
    /// Compact the palette after filling.
    pub compact: bool,
}

/// Builds a section whose cells hold block states drawn uniformly from
/// `0..distinct`.
///
/// The same options always produce the same section.
pub fn generate_section(options: &GenerateOptions) -> BlockSection {
    let distinct = options.distinct.clamp(1, SECTION_VOLUME as u32) as i32;
    let mut rng = Xoshiro256StarStar::seed_from_u64(options.seed);
    let mut section = BlockSection::empty(options.palette_size_hint);

    for index in 0..SECTION_VOLUME {
        section.set(index, BlockStateId(rng.gen_range(0..distinct)));
    }
    debug!(
        "Filled section: {} palette entries at {} bits",
        section.palette_len(),
        section.bits_per_entry()
    );

    if options.compact {
        section.compact();
    }
    section
}

/// Generates a section and writes its encoding to `output`.
pub fn generate_to_file(options: &GenerateOptions, output: &Path) -> Result<BlockSection, ToolError> {
    let section = generate_section(options);

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ToolError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let io_error = |source| ToolError::Io {
        path: output.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(output).map_err(io_error)?);
    section.write_to(&mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    info!(
        "Wrote {}-bit section ({} palette entries, {} bytes) to {}",
        section.bits_per_entry(),
        section.palette_len(),
        section.encoded_len(),
        output.display()
    );
    Ok(section)
}
