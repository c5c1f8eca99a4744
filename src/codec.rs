//! Canonical JSON codec (`spec.md` S:4.9) for every on-disk object type.
//!
//! Group elements already serialize as base64 strings via the `Serialize`/
//! `Deserialize` impls in [`crate::pairing`]; this module only adds the
//! file-path plumbing and the ciphertext shape check that a bare
//! `serde_json` round trip can't express.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::schemes::bsw::Ciphertext;

/// Writes `value` to `path` as indented JSON.
pub fn export<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads and decodes a `T` from `path`.
pub fn import<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

/// Imports a ciphertext and checks that its tree shape is internally
/// consistent (every leaf carries `leaf_cy`) before handing it back.
pub fn import_ciphertext(path: &Path) -> Result<Ciphertext> {
    let ct: Ciphertext = import(path)?;
    ct.tree.validate_ciphertext_shape()?;
    Ok(ct)
}
