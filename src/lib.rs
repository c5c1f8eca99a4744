//! Ciphertext-Policy Attribute-Based Encryption (CP-ABE) in the style of
//! Bethencourt, Sahai and Waters (2007), over a bilinear pairing.
//!
//! A central authority runs [`schemes::bsw::setup`] once to produce a
//! public key and a master secret key. It issues per-user keys bound to
//! attribute sets with [`schemes::bsw::keygen`]. Anyone holding the public
//! key can [`schemes::bsw::encrypt`] a message under a boolean
//! [`policy::Policy`] over attributes; a user can
//! [`schemes::bsw::decrypt`] it if and only if their attributes satisfy
//! that policy. [`envelope`] wraps the algebraic core in a hybrid
//! encryption scheme for encrypting files, and [`codec`] serializes every
//! object to and from JSON.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod pairing;
pub mod policy;
pub mod polynomial;
pub mod schemes;
pub mod tree;

pub use error::{CpAbeError, Result};
