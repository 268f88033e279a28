// ============================================================
// Layer 6 - NPZ Archive Writer
// ============================================================
// Writes `captions_data.npz` in the format numpy's
// `np.savez_compressed` produces, so `np.load()` opens it:
//
//   captions_data.npz            (ZIP, deflate)
//     ├── padded.npy             int32, shape (rows, max_len)
//     └── img_fnames.npy         unicode <U{n}, shape (rows,)
//
// Numeric members go through ndarray-npy. It has no unicode
// dtype, so string members are encoded here as NPY v1.0:
//
//   \x93NUMPY  0x01 0x00  <u16 LE header len>  <header dict>  <raw data>
//
// The header is a Python dict literal padded with spaces and
// ending in '\n' so the data starts on a 64-byte boundary.
// Strings are fixed-width UTF-32LE, zero padded to the longest
// element, which is how numpy stores `<U` arrays.

use anyhow::{Context, Result};
use ndarray::Array2;
use ndarray_npy::WriteNpyExt;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

/// Default output file name
pub const CAPTION_DATA_FILE: &str = "captions_data.npz";

const NPY_MAGIC: &[u8] = b"\x93NUMPY";
const NPY_VERSION: [u8; 2] = [1, 0];
/// magic (6) + version (2) + header length (2)
const NPY_PREAMBLE_LEN: usize = 10;
const NPY_ALIGN: usize = 64;

pub struct NpzWriter {
    zip:     ZipWriter<BufWriter<File>>,
    options: SimpleFileOptions,
}

impl NpzWriter {
    /// Create (or truncate) the archive at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Cannot create archive '{}'", path.display()))?;

        Ok(Self {
            zip:     ZipWriter::new(BufWriter::new(file)),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        })
    }

    /// Add a 2D int32 array as `<name>.npy`.
    pub fn add_i32_matrix(&mut self, name: &str, array: &Array2<i32>) -> Result<()> {
        let payload = array.len() * std::mem::size_of::<i32>();
        self.start_member(name, payload)?;
        array
            .write_npy(&mut self.zip)
            .with_context(|| format!("Cannot write '{name}.npy'"))?;

        tracing::debug!("Wrote {}.npy: dtype <i4, shape {:?}", name, array.shape());
        Ok(())
    }

    /// Add a 1D unicode string array as `<name>.npy`.
    pub fn add_str_vector(&mut self, name: &str, values: &[String]) -> Result<()> {
        // numpy never uses a zero-width unicode dtype
        let width = values.iter().map(|s| s.chars().count()).max().unwrap_or(0).max(1);

        let mut data = Vec::with_capacity(values.len() * width * 4);
        for s in values {
            let mut used = 0;
            for c in s.chars() {
                data.extend_from_slice(&u32::from(c).to_le_bytes());
                used += 1;
            }
            data.resize(data.len() + (width - used) * 4, 0);
        }

        self.add_member(name, &format!("<U{width}"), &[values.len()], &data)
    }

    /// Write the ZIP central directory and flush to disk.
    pub fn finish(self) -> Result<()> {
        let mut out = self.zip.finish().context("Cannot finish npz archive")?;
        out.flush().context("Cannot flush npz archive")?;
        Ok(())
    }

    /// Open a new `<name>.npy` entry sized for roughly `payload` bytes.
    fn start_member(&mut self, name: &str, payload: usize) -> Result<()> {
        let mut options = self.options;
        // headroom for the npy header written ahead of the payload
        if payload.saturating_add(NPY_ALIGN * 16) >= u32::MAX as usize {
            options = options.large_file(true);
        }

        self.zip
            .start_file(format!("{name}.npy"), options)
            .with_context(|| format!("Cannot add '{name}.npy' to npz archive"))
    }

    fn add_member(&mut self, name: &str, descr: &str, shape: &[usize], data: &[u8]) -> Result<()> {
        let header = npy_header(descr, shape);

        self.start_member(name, header.len() + data.len())?;
        self.zip.write_all(&header)?;
        self.zip.write_all(data)?;

        tracing::debug!("Wrote {}.npy: dtype {}, shape {:?}", name, descr, shape);
        Ok(())
    }
}

/// Full NPY preamble + header for a C-ordered array.
fn npy_header(descr: &str, shape: &[usize]) -> Vec<u8> {
    let shape = match shape {
        [n] => format!("({n},)"),
        dims => format!(
            "({})",
            dims.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
        ),
    };
    let mut dict = format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {shape}, }}");

    // Pad with spaces so preamble + dict + '\n' is 64-byte aligned
    let unpadded = NPY_PREAMBLE_LEN + dict.len() + 1;
    let padding  = (NPY_ALIGN - unpadded % NPY_ALIGN) % NPY_ALIGN;
    dict.push_str(&" ".repeat(padding));
    dict.push('\n');

    let mut out = Vec::with_capacity(NPY_PREAMBLE_LEN + dict.len());
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&NPY_VERSION);
    out.extend_from_slice(&(dict.len() as u16).to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out
}
