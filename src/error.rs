//! The stable error taxonomy for the whole crate.
//!
//! Every public algorithm returns `Result<_, CpAbeError>`. Kinds are
//! intentionally coarse (they name a *situation*, not an implementation
//! detail) so that callers — including the CLI — can match on them without
//! depending on internal structure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CpAbeError {
    /// Structural violation of a user-supplied policy tree: a leaf with
    /// children, an internal node with none, or an empty attribute name.
    #[error("malformed policy: {0}")]
    MalformedPolicy(String),

    /// Bytes did not decode to a valid element of the declared group.
    #[error("malformed group element in field `{field}`")]
    MalformedElement { field: &'static str },

    /// A decoded ciphertext's tree shape is inconsistent (e.g. a leaf
    /// missing its `LeafCy` decoration).
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// KeyGen was asked to bind the same attribute twice.
    #[error("duplicate attribute: {0}")]
    DuplicateAttribute(String),

    /// Decrypt could not reconstruct a value at the root: the key's
    /// attributes do not satisfy the ciphertext's policy.
    #[error("attributes do not satisfy the ciphertext's access policy")]
    UnsatisfiedPolicy,

    /// The AEAD layer rejected the ciphertext (wrong key or tampering).
    #[error("AEAD authentication failed")]
    AeadAuthFailed,

    /// A file path operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A codec object failed to parse as JSON.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CpAbeError>;
