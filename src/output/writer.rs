use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::output::manifest::SelectionManifest;
use crate::types::{CorpusFingerprint, SelectionResult, SelectionSet};

pub const INDICES_FILE: &str = "indices.txt";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Line {line}: expected a sentence index, found {content:?}")]
    InvalidIndex { line: usize, content: String },
}

/// Write one index per line.
pub fn write_indices<W: Write>(writer: W, indices: &[usize]) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for index in indices {
        writeln!(writer, "{index}")?;
    }
    writer.flush()
}

/// Read a one-index-per-line list, such as an exclusion list or a previous
/// selection. Blank lines are skipped.
pub fn read_index_list<R: BufRead>(reader: R) -> Result<SelectionSet, OutputError> {
    let mut indices = SelectionSet::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let index = trimmed.parse::<usize>().map_err(|_| OutputError::InvalidIndex {
            line: number + 1,
            content: trimmed.to_string(),
        })?;
        indices.insert(index);
    }
    Ok(indices)
}

/// Persists a selection as `indices.txt` plus `manifest.json`.
///
/// Both files are written into a temporary sibling directory which is then
/// renamed into place, so a crashed run never leaves a half-written output.
#[derive(Debug, Default)]
pub struct SelectionWriter;

impl SelectionWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(
        &self,
        result: &SelectionResult,
        fingerprint: CorpusFingerprint,
        output_dir: &Path,
    ) -> Result<SelectionManifest, OutputError> {
        if output_dir.exists() {
            return Err(OutputError::OutputExists(output_dir.to_path_buf()));
        }

        let manifest = SelectionManifest::new(result, fingerprint);

        // Named after the corpus hash so runs over different corpora
        // targeting the same parent never share a temp dir
        let hash = manifest
            .corpus_fingerprint
            .as_str()
            .strip_prefix("sha256:")
            .unwrap_or(manifest.corpus_fingerprint.as_str());
        let temp_suffix = format!("tmp.{}", &hash[..hash.len().min(12)]);
        let temp_dir = output_dir.with_extension(temp_suffix);

        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir)?;
        }
        fs::create_dir_all(&temp_dir)?;

        let f_idx = fs::File::create(temp_dir.join(INDICES_FILE))?;
        write_indices(&f_idx, &result.indices)?;
        f_idx.sync_all()?;

        let f_man = fs::File::create(temp_dir.join(MANIFEST_FILE))?;
        serde_json::to_writer_pretty(&f_man, &manifest)?;
        f_man.sync_all()?;

        fs::rename(&temp_dir, output_dir)?;

        tracing::debug!(
            path = %output_dir.display(),
            selected = result.indices.len(),
            "wrote selection"
        );
        Ok(manifest)
    }
}
