//! Slot store: registry-like persistence for serialized grid data.
//!
//! The consuming renderer reads its flag grid from a per-user key-value
//! store laid out as `<root>/<company>/<product>/<slot>`, with each slot
//! value encoded as a 4-byte little-endian UTF-8 byte length followed by
//! the UTF-8 payload. The store root defaults to the renderer's per-user
//! preferences directory and can be overridden with `FLAGPIX_STORE_DIR`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PersistError;

/// Environment variable overriding the store root directory.
pub const STORE_DIR_ENV: &str = "FLAGPIX_STORE_DIR";

/// Default company segment under the store root.
pub const DEFAULT_COMPANY: &str = "DefaultCompany";
/// Default product segment under the store root.
pub const DEFAULT_PRODUCT: &str = "DrawPixels";
/// Slot name the renderer reads the flag grid from.
pub const FLAG_GRID_SLOT: &str = "flagGrid_h2263043443";

/// Encode a slot value: 4-byte little-endian UTF-8 byte length prefix
/// followed by the UTF-8 bytes.
pub fn encode_slot_value(data: &str) -> Vec<u8> {
    let bytes = data.as_bytes();
    let mut out = Vec::with_capacity(4 + bytes.len());
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
    out
}

/// Decode a slot value encoded by [`encode_slot_value`].
///
/// Returns `None` if the buffer is truncated or the payload is not UTF-8.
pub fn decode_slot_value(raw: &[u8]) -> Option<String> {
    if raw.len() < 4 {
        return None;
    }
    let len = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
    if raw.len() < 4 + len {
        return None;
    }
    String::from_utf8(raw[4..4 + len].to_vec()).ok()
}

/// A named slot location in the per-user key-value store.
#[derive(Debug, Clone)]
pub struct SlotStore {
    root: PathBuf,
    company: String,
    product: String,
}

impl SlotStore {
    /// Create a store rooted at `root` for the given company/product pair.
    pub fn new(root: PathBuf, company: &str, product: &str) -> Self {
        Self {
            root,
            company: company.to_string(),
            product: product.to_string(),
        }
    }

    /// Create a store from the environment: `FLAGPIX_STORE_DIR` if set,
    /// otherwise the renderer's per-user preferences directory
    /// (`~/.config/unity3d`).
    pub fn from_env(company: &str, product: &str) -> Self {
        let root = std::env::var_os(STORE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_store_root);
        Self::new(root, company, product)
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a named slot.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(&self.company).join(&self.product).join(slot)
    }

    /// Write `data` to the named slot, creating parent directories.
    ///
    /// Returns the written path.
    ///
    /// # Errors
    ///
    /// [`PersistError::Write`] on any filesystem failure; recoverable.
    pub fn save_slot(&self, slot: &str, data: &str) -> Result<PathBuf, PersistError> {
        let path = self.slot_path(slot);
        let write = |path: &Path| -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, encode_slot_value(data))
        };
        write(&path).map_err(|source| PersistError::Write {
            artifact: format!("slot store ({})", path.display()),
            source,
        })?;
        Ok(path)
    }

    /// List candidate `<company>/<product>` locations under the store root.
    ///
    /// Discovery mode for finding where the renderer actually keeps its
    /// preferences when the defaults do not match.
    pub fn discover(&self) -> io::Result<Vec<(String, String)>> {
        let mut found = Vec::new();
        for company_entry in fs::read_dir(&self.root)? {
            let company_entry = company_entry?;
            if !company_entry.file_type()?.is_dir() {
                continue;
            }
            let company = company_entry.file_name().to_string_lossy().into_owned();
            for product_entry in fs::read_dir(company_entry.path())? {
                let product_entry = product_entry?;
                if product_entry.file_type()?.is_dir() {
                    let product = product_entry.file_name().to_string_lossy().into_owned();
                    found.push((company.clone(), product));
                }
            }
        }
        found.sort();
        Ok(found)
    }
}

fn default_store_root() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("unity3d")
}
