//! Persisted index layout.
//!
//! An index directory holds three files that are only valid together:
//!
//! - `vectors.bin`: 20-byte header (`PLVX`, format version u32, dimension
//!   u32, entry count u64, all little-endian) followed by `count * dimension`
//!   little-endian f32 values, row-major.
//! - `chunks.dat`: zstd stream of length-prefixed (u32 LE) MessagePack chunks.
//! - `meta.json`: [`IndexManifest`].
//!
//! Writes go to a sibling temp directory that is renamed into place once
//! every file is synced, so a reader never sees a half-written index.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pitlane_core::Chunk;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::IndexError;
use crate::flat::VectorIndex;
use crate::manifest::{IndexManifest, FORMAT_VERSION};

pub const VECTORS_FILE: &str = "vectors.bin";
pub const CHUNKS_FILE: &str = "chunks.dat";
pub const META_FILE: &str = "meta.json";

const MAGIC: &[u8; 4] = b"PLVX";
const HEADER_LEN: usize = 20;

/// True when any index artifact is present in `dir`.
///
/// A partial set still counts, so that [`load`] reports it as corrupt
/// instead of a fresh build silently replacing it.
pub fn exists(dir: &Path) -> bool {
    [VECTORS_FILE, CHUNKS_FILE, META_FILE]
        .iter()
        .any(|name| dir.join(name).exists())
}

/// Write `index` and `manifest` to `dir`, replacing any previous index.
pub fn persist(index: &VectorIndex, manifest: &IndexManifest, dir: &Path) -> Result<(), IndexError> {
    let staging = sibling(dir, "tmp")?;
    fs::create_dir_all(&staging)?;

    let written = write_vectors(&staging.join(VECTORS_FILE), index)
        .and_then(|_| write_chunks(&staging.join(CHUNKS_FILE), index.chunks()))
        .and_then(|raw| {
            debug!(raw_bytes = raw, "chunk store written");
            write_manifest(&staging.join(META_FILE), manifest)
        });
    if let Err(e) = written {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }

    publish(&staging, dir)?;
    info!(
        dir = %dir.display(),
        entries = index.len(),
        dimensions = index.dimensions(),
        "index persisted"
    );
    Ok(())
}

/// Restore an index from `dir`, checking that all three artifacts agree.
pub fn load(dir: &Path) -> Result<(VectorIndex, IndexManifest), IndexError> {
    for name in [VECTORS_FILE, CHUNKS_FILE, META_FILE] {
        if !dir.join(name).is_file() {
            return Err(IndexError::Corrupt(format!(
                "missing {} in {}",
                name,
                dir.display()
            )));
        }
    }

    let manifest = read_manifest(&dir.join(META_FILE))?;
    if manifest.format_version != FORMAT_VERSION {
        return Err(IndexError::Corrupt(format!(
            "unsupported format version {}",
            manifest.format_version
        )));
    }

    let (dimensions, vectors) = read_vectors(&dir.join(VECTORS_FILE))?;
    let chunks = read_chunks(&dir.join(CHUNKS_FILE))?;

    let vector_count = if dimensions == 0 { 0 } else { vectors.len() / dimensions };
    if vector_count != chunks.len() {
        return Err(IndexError::Corrupt(format!(
            "{} vectors but {} chunks",
            vector_count,
            chunks.len()
        )));
    }
    if manifest.count != chunks.len() || manifest.dimensions != dimensions {
        return Err(IndexError::Corrupt(format!(
            "manifest describes {} x {}, artifacts hold {} x {}",
            manifest.count,
            manifest.dimensions,
            chunks.len(),
            dimensions
        )));
    }

    let index = VectorIndex::from_parts(dimensions, vectors, chunks)?;
    info!(dir = %dir.display(), entries = index.len(), "index loaded");
    Ok((index, manifest))
}

// ── Writing ────────────────────────────────────────────────────────

fn write_vectors(path: &Path, index: &VectorIndex) -> Result<(), IndexError> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(MAGIC)?;
    out.write_all(&FORMAT_VERSION.to_le_bytes())?;
    out.write_all(&(index.dimensions() as u32).to_le_bytes())?;
    out.write_all(&(index.len() as u64).to_le_bytes())?;
    for value in index.raw_vectors() {
        out.write_all(&value.to_le_bytes())?;
    }
    let file = out.into_inner().map_err(|e| IndexError::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(())
}

/// Returns the uncompressed size of the record stream.
fn write_chunks(path: &Path, chunks: &[Chunk]) -> Result<u64, IndexError> {
    let file = File::create(path)?;
    let mut encoder = zstd::Encoder::new(BufWriter::new(file), 3)?;
    let mut raw_bytes = 0u64;
    for chunk in chunks {
        let encoded = rmp_serde::to_vec(chunk).map_err(|e| IndexError::Serialize(e.to_string()))?;
        encoder.write_all(&(encoded.len() as u32).to_le_bytes())?;
        encoder.write_all(&encoded)?;
        raw_bytes += 4 + encoded.len() as u64;
    }
    let buf = encoder.finish()?;
    let file = buf.into_inner().map_err(|e| IndexError::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(raw_bytes)
}

fn write_manifest(path: &Path, manifest: &IndexManifest) -> Result<(), IndexError> {
    let json =
        serde_json::to_string_pretty(manifest).map_err(|e| IndexError::Serialize(e.to_string()))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Swap `staging` into `dir`. An existing index is moved aside first and
/// removed only after the new one is in place.
fn publish(staging: &Path, dir: &Path) -> Result<(), IndexError> {
    let previous = if dir.exists() {
        let aside = sibling(dir, "old")?;
        fs::rename(dir, &aside)?;
        Some(aside)
    } else {
        None
    };

    if let Err(e) = fs::rename(staging, dir) {
        if let Some(aside) = &previous {
            let _ = fs::rename(aside, dir);
        }
        let _ = fs::remove_dir_all(staging);
        return Err(e.into());
    }

    if let Some(aside) = previous {
        fs::remove_dir_all(aside)?;
    }
    Ok(())
}

fn sibling(dir: &Path, tag: &str) -> Result<PathBuf, IndexError> {
    let name = dir
        .file_name()
        .ok_or_else(|| IndexError::Corrupt(format!("invalid index path {}", dir.display())))?;
    let parent = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;
    Ok(parent.join(format!(
        ".{}.{}-{}",
        name.to_string_lossy(),
        tag,
        Uuid::new_v4().simple()
    )))
}

// ── Reading ────────────────────────────────────────────────────────

fn read_vectors(path: &Path) -> Result<(usize, Vec<f32>), IndexError> {
    let file = File::open(path)?;
    if (file.metadata()?.len() as usize) < HEADER_LEN {
        return Err(IndexError::Corrupt(format!("{VECTORS_FILE} is truncated")));
    }
    let mmap = unsafe { Mmap::map(&file)? };

    if &mmap[0..4] != MAGIC {
        return Err(IndexError::Corrupt(format!("{VECTORS_FILE} has a bad magic number")));
    }
    let version = u32::from_le_bytes([mmap[4], mmap[5], mmap[6], mmap[7]]);
    if version != FORMAT_VERSION {
        return Err(IndexError::Corrupt(format!("{VECTORS_FILE} has version {version}")));
    }
    let dimensions = u32::from_le_bytes([mmap[8], mmap[9], mmap[10], mmap[11]]) as usize;
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&mmap[12..HEADER_LEN]);
    let count = u64::from_le_bytes(count_bytes) as usize;

    let body = &mmap[HEADER_LEN..];
    let expected = count
        .checked_mul(dimensions)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| IndexError::Corrupt(format!("{VECTORS_FILE} header overflows")))?;
    if body.len() != expected {
        return Err(IndexError::Corrupt(format!(
            "{VECTORS_FILE} declares {count} x {dimensions} but holds {} bytes",
            body.len()
        )));
    }

    let vectors = body
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok((dimensions, vectors))
}

fn read_chunks(path: &Path) -> Result<Vec<Chunk>, IndexError> {
    let compressed = fs::read(path)?;
    let data = zstd::decode_all(compressed.as_slice())
        .map_err(|e| IndexError::Corrupt(format!("{CHUNKS_FILE}: {e}")))?;

    let mut chunks = Vec::new();
    let mut pos = 0usize;
    while pos < data.len() {
        if pos + 4 > data.len() {
            return Err(IndexError::Corrupt(format!("{CHUNKS_FILE} ends mid-record")));
        }
        let len = u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let start = pos + 4;
        let end = start + len;
        if end > data.len() {
            return Err(IndexError::Corrupt(format!("{CHUNKS_FILE} ends mid-record")));
        }
        let chunk = rmp_serde::from_slice(&data[start..end])
            .map_err(|e| IndexError::Corrupt(format!("{CHUNKS_FILE}: {e}")))?;
        chunks.push(chunk);
        pos = end;
    }
    Ok(chunks)
}

fn read_manifest(path: &Path) -> Result<IndexManifest, IndexError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| IndexError::Corrupt(format!("{META_FILE}: {e}")))
}
