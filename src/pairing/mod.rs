//! Uniform facade over the pairing library.
//!
//! Every other module talks to `Zr`, `G1`, `G2` and `Gt` through this module
//! only — `rabe_bn` is never named outside of it. That keeps a future
//! pairing-library swap (e.g. to `bls12_381`) a one-file change, which is
//! the whole point of isolating it here.
//!
//! `spec.md` models a symmetric pairing `e: G1 x G1 -> GT`. `rabe_bn`, like
//! every pairing crate actually published for Rust, is asymmetric:
//! `e: G1 x G2 -> GT`. BSW is realized here the same way the teacher
//! realizes it — a generator is kept in both G1 and G2, and every
//! spec-level "pair two G1 elements" becomes "pair a G1 element against its
//! G2 counterpart". See `DESIGN.md` for the write-up of this mapping.

use rand::RngCore;
use rand::rngs::OsRng;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CpAbeError, Result};

pub use rabe_bn::Group;

/// A scalar in Zr.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Zr(pub rabe_bn::Fr);

/// An element of the first source group.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct G1(pub rabe_bn::G1);

/// An element of the second source group.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct G2(pub rabe_bn::G2);

/// An element of the target group.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Gt(pub rabe_bn::Gt);

impl Zr {
    pub fn random() -> Self {
        Zr(rabe_bn::Fr::random(&mut OsRng))
    }

    pub fn one() -> Self {
        Zr(rabe_bn::Fr::one())
    }

    pub fn zero() -> Self {
        Zr(rabe_bn::Fr::zero())
    }

    pub fn from_u64(v: u64) -> Self {
        let mut acc = rabe_bn::Fr::zero();
        let base = rabe_bn::Fr::one();
        let mut doubling = base;
        let mut n = v;
        while n > 0 {
            if n & 1 == 1 {
                acc = acc + doubling;
            }
            doubling = doubling + doubling;
            n >>= 1;
        }
        Zr(acc)
    }

    pub fn inverse(&self) -> Option<Zr> {
        self.0.inverse().map(Zr)
    }

    pub fn neg(&self) -> Zr {
        Zr(-self.0)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(&self.0).expect("Fr serialization is infallible")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map(Zr)
            .map_err(|_| CpAbeError::MalformedElement { field: "Zr" })
    }
}

impl std::ops::Add for Zr {
    type Output = Zr;
    fn add(self, rhs: Zr) -> Zr {
        Zr(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Zr {
    type Output = Zr;
    fn sub(self, rhs: Zr) -> Zr {
        Zr(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Zr {
    type Output = Zr;
    fn mul(self, rhs: Zr) -> Zr {
        Zr(self.0 * rhs.0)
    }
}

impl std::ops::Div for Zr {
    type Output = Zr;
    fn div(self, rhs: Zr) -> Zr {
        self * rhs.inverse().expect("division by zero in Zr")
    }
}

impl G1 {
    pub fn random() -> Self {
        G1(rabe_bn::G1::random(&mut OsRng))
    }

    pub fn zero() -> Self {
        G1(rabe_bn::G1::zero())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(&self.0).expect("G1 serialization is infallible")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map(G1)
            .map_err(|_| CpAbeError::MalformedElement { field: "G1" })
    }
}

impl std::ops::Add for G1 {
    type Output = G1;
    fn add(self, rhs: G1) -> G1 {
        G1(self.0 + rhs.0)
    }
}

impl std::ops::Mul<Zr> for G1 {
    type Output = G1;
    fn mul(self, rhs: Zr) -> G1 {
        G1(self.0 * rhs.0)
    }
}

impl std::ops::Div<Zr> for G1 {
    type Output = G1;
    fn div(self, rhs: Zr) -> G1 {
        self * rhs.inverse().expect("division by zero scalar in G1")
    }
}

impl G2 {
    pub fn random() -> Self {
        G2(rabe_bn::G2::random(&mut OsRng))
    }

    pub fn zero() -> Self {
        G2(rabe_bn::G2::zero())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(&self.0).expect("G2 serialization is infallible")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map(G2)
            .map_err(|_| CpAbeError::MalformedElement { field: "G2" })
    }
}

impl std::ops::Add for G2 {
    type Output = G2;
    fn add(self, rhs: G2) -> G2 {
        G2(self.0 + rhs.0)
    }
}

impl std::ops::Mul<Zr> for G2 {
    type Output = G2;
    fn mul(self, rhs: Zr) -> G2 {
        G2(self.0 * rhs.0)
    }
}

impl std::ops::Div<Zr> for G2 {
    type Output = G2;
    fn div(self, rhs: Zr) -> G2 {
        self * rhs.inverse().expect("division by zero scalar in G2")
    }
}

impl Gt {
    pub fn one() -> Self {
        Gt(rabe_bn::Gt::one())
    }

    /// A uniformly random element of GT, used as the random `M` that
    /// `spec.md` S:4.8/S:9 prefer over hashing the plaintext into GT.
    pub fn random() -> Self {
        Gt(rabe_bn::Gt::random(&mut OsRng))
    }

    pub fn pow(&self, exp: Zr) -> Gt {
        Gt(self.0.pow(exp.0))
    }

    pub fn inverse(&self) -> Gt {
        Gt(self.0.inverse())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(&self.0).expect("Gt serialization is infallible")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map(Gt)
            .map_err(|_| CpAbeError::MalformedElement { field: "Gt" })
    }
}

impl std::ops::Mul for Gt {
    type Output = Gt;
    fn mul(self, rhs: Gt) -> Gt {
        Gt(self.0 * rhs.0)
    }
}

impl std::ops::Div for Gt {
    type Output = Gt;
    fn div(self, rhs: Gt) -> Gt {
        self * rhs.inverse()
    }
}

/// The bilinear map `e: G1 x G2 -> GT`.
pub fn pair(a: G1, b: G2) -> Gt {
    Gt(rabe_bn::pairing(a.0, b.0))
}

/// Hashes arbitrary bytes to a scalar in Zr via Blake2b-512, folding the
/// 64-byte digest into the field the same way `Fr::interpret` does for a
/// wide hash output.
pub fn hash_to_zr(bytes: &[u8]) -> Zr {
    use blake2::Blake2b512;
    use blake2::Digest;
    let mut hasher = Blake2b512::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut buf = [0u8; 64];
    buf.copy_from_slice(&digest);
    Zr(rabe_bn::Fr::interpret(&buf))
}

/// `H(bytes) = generator^{hash_to_zr(bytes)}`, the facade's `hashToG1`,
/// realized relative to a public generator (the public key's own `g`)
/// since these curves carry no universal fixed base point.
pub fn hash_to_g1(generator: G1, bytes: &[u8]) -> G1 {
    generator * hash_to_zr(bytes)
}

/// `H(bytes) = generator^{hash_to_zr(bytes)}` in G2, used for the
/// attribute-hash half of every `(D_j, D_j')` / `(C_y, C_y')` pair.
pub fn hash_to_g2(generator: G2, bytes: &[u8]) -> G2 {
    generator * hash_to_zr(bytes)
}

/// `hashToGT`: pairs a G1 hash of `bytes` against a fixed G2 generator.
/// Used only by the envelope's documented (non-default) hash-plaintext
/// path described in `spec.md` S:4.8/S:9.
pub fn hash_to_gt(g1_generator: G1, g2_generator: G2, bytes: &[u8]) -> Gt {
    pair(hash_to_g1(g1_generator, bytes), g2_generator)
}

/// Fills `out` with cryptographically secure random bytes — the facade's
/// one entry point onto the OS RNG, so nonce generation and the
/// element-sampling above share a single source of randomness (S:5).
pub fn fill_random(out: &mut [u8]) {
    OsRng.fill_bytes(out);
}

macro_rules! impl_base64_serde {
    ($ty:ident, $field:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD.encode(self.to_bytes());
                serializer.serialize_str(&encoded)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                use base64::Engine;
                let s = String::deserialize(deserializer)?;
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(s.as_bytes())
                    .map_err(|e| D::Error::custom(format!("invalid base64 for {}: {}", $field, e)))?;
                $ty::from_bytes(&bytes).map_err(|e| D::Error::custom(e.to_string()))
            }
        }
    };
}

impl_base64_serde!(Zr, "Zr");
impl_base64_serde!(G1, "G1");
impl_base64_serde!(G2, "G2");
impl_base64_serde!(Gt, "Gt");
