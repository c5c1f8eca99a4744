//! Concrete ABE schemes built on the pairing facade, the access-tree model
//! and the polynomial engine. This crate implements a single scheme.

pub mod bsw;
