//! This is the documentation for the `BSW` scheme:
//!
//! * Developed by John Bethencourt, Amit Sahai, Brent Waters,
//!   "Ciphertext-Policy Attribute-Based Encryption"
//! * Published in Security and Privacy, 2007. SP'07. IEEE Symposium on. IEEE
//! * Available from https://doi.org/10.1109/SP.2007.11
//! * Type: encryption (attribute-based)
//! * Setting: bilinear groups (asymmetric realization of a symmetric scheme,
//!   see `pairing` module docs)
//!
//! # Examples
//!
//! ```
//! use cpabe::pairing::Gt;
//! use cpabe::policy::Policy;
//! use cpabe::schemes::bsw::{setup, keygen, encrypt, decrypt};
//!
//! let (pk, msk) = setup();
//! let policy = Policy::and(vec![Policy::leaf("A"), Policy::leaf("B")]);
//! let m = Gt::one();
//! let ct = encrypt(&pk, m, &policy).unwrap();
//! let uk = keygen(&pk, &msk, &["A".to_string(), "B".to_string()]).unwrap();
//! assert_eq!(decrypt(&pk, &uk, &ct).unwrap(), m);
//! ```

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CpAbeError, Result};
use crate::pairing::{hash_to_g2, pair, G1, G2, Gt, Zr};
use crate::policy::Policy;
use crate::polynomial::{eval, lagrange_coefficient, random_polynomial};
use crate::tree::{build_access_tree, Node};

/// Descriptor embedded in the public key so decoders reconstruct the same
/// pairing context (`spec.md` S:4.9). `rabe_bn` fixes its curve at compile
/// time, so this is a constant rather than a runtime parameter choice.
const PAIRING_PARAMS: &str = "rabe-bn/bn254-type-a-asymmetric-v1";

/// The BSW public key (PK).
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct PublicKey {
    pub params: String,
    pub g1: G1,
    pub g2: G2,
    pub h: G1,
    pub f: G2,
    pub egg_alpha: Gt,
}

/// The BSW master secret key (MSK). Held only by the authority.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct MasterKey {
    pub beta: Zr,
    pub g2_alpha: G2,
}

/// The per-attribute half of a user key: `(D_j, D_j')` from `spec.md` S:3.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct AttributeComponent {
    pub d_j: G2,
    pub d_j_prime: G1,
}

/// A user private key (UK), bound to an attribute set.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct UserKey {
    pub d: G2,
    pub attributes: HashMap<String, AttributeComponent>,
}

/// A BSW ciphertext: the decorated access tree plus the two envelope
/// elements `C~` and `C`.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Ciphertext {
    pub tree: Node,
    pub c_tilde: Gt,
    pub c: G1,
}

/// The setup algorithm. Draws `alpha, beta` uniformly and returns a fresh
/// `(PublicKey, MasterKey)` pair.
pub fn setup() -> (PublicKey, MasterKey) {
    let g1 = G1::random();
    let g2 = G2::random();
    let alpha = Zr::random();
    let beta = Zr::random();

    let h = g1 * beta;
    let f = g2 * beta.inverse().expect("beta is nonzero with overwhelming probability");
    let egg_alpha = pair(g1, g2).pow(alpha);
    let g2_alpha = g2 * alpha;

    debug!("setup: generated fresh public key and master secret key");
    (
        PublicKey {
            params: PAIRING_PARAMS.to_string(),
            g1,
            g2,
            h,
            f,
            egg_alpha,
        },
        MasterKey { beta, g2_alpha },
    )
}

/// Generates a user key bound to `attributes`. Fails with
/// `DuplicateAttribute` if the same attribute name appears twice.
pub fn keygen(pk: &PublicKey, msk: &MasterKey, attributes: &[String]) -> Result<UserKey> {
    let mut seen = HashSet::with_capacity(attributes.len());
    for attr in attributes {
        if !seen.insert(attr.as_str()) {
            return Err(CpAbeError::DuplicateAttribute(attr.clone()));
        }
    }

    let r = Zr::random();
    let g2_r = pk.g2 * r;
    let beta_inv = msk
        .beta
        .inverse()
        .expect("beta is nonzero with overwhelming probability");
    let d = (msk.g2_alpha + g2_r) * beta_inv;

    let mut components = HashMap::with_capacity(attributes.len());
    for attr in attributes {
        let r_j = Zr::random();
        let attr_hash = hash_to_g2(pk.g2, attr.as_bytes());
        let d_j = g2_r + attr_hash * r_j;
        let d_j_prime = pk.g1 * r_j;
        components.insert(attr.clone(), AttributeComponent { d_j, d_j_prime });
    }

    trace!("keygen: bound {} attributes to fresh user key", attributes.len());
    Ok(UserKey {
        d,
        attributes: components,
    })
}

/// Encrypts a GT element `m` (the key material to encapsulate) under
/// `policy`. This is the algebraic core; [`crate::envelope`] wraps it to
/// encrypt bulk bytes.
pub fn encrypt(pk: &PublicKey, m: Gt, policy: &Policy) -> Result<Ciphertext> {
    let mut tree = build_access_tree(policy)?;
    let s = Zr::random();
    decorate(pk, &mut tree, s);

    let c_tilde = m * pk.egg_alpha.pow(s);
    let c = pk.h * s;

    trace!("encrypt: decorated access tree under a fresh root secret");
    Ok(Ciphertext { tree, c_tilde, c })
}

/// Recursively assigns each node's polynomial (`spec.md` S:4.6): the node's
/// own polynomial has `constant_term` as `q(0)`; each child's constant term
/// is this node's polynomial evaluated at the child's sibling index.
fn decorate(pk: &PublicKey, node: &mut Node, constant_term: Zr) {
    let degree = node.degree();
    let poly = random_polynomial(degree, constant_term);

    match node {
        Node::Leaf {
            attribute,
            leaf_cy,
            ..
        } => {
            let c_y = pk.g1 * constant_term;
            let c_y_prime = hash_to_g2(pk.g2, attribute.as_bytes()) * constant_term;
            *leaf_cy = Some((c_y, c_y_prime));
        }
        Node::And { children, .. } | Node::Or { children, .. } => {
            for child in children.iter_mut() {
                let child_index = Zr::from_u64(child.index() as u64);
                let child_constant = eval(&poly, child_index);
                decorate(pk, child, child_constant);
            }
        }
    }

    node.set_polynomial(poly);
}

/// The explicit unsatisfied-attribute-set sentinel. `spec.md` S:4.7/S:9
/// forbid modeling this as a magic GT value (the known bug in the source
/// this scheme is based on): a missing attribute must propagate as a true
/// "no value" through AND/OR reconstruction, not as GT's identity element.
type NodeShare = Option<Gt>;

fn eval_node(node: &Node, uk: &UserKey) -> NodeShare {
    match node {
        Node::Leaf {
            attribute,
            leaf_cy,
            ..
        } => {
            let (c_y, c_y_prime) = leaf_cy.as_ref()?;
            match uk.attributes.get(attribute) {
                Some(comp) => Some(pair(*c_y, comp.d_j) / pair(comp.d_j_prime, *c_y_prime)),
                None => None,
            }
        }
        Node::Or { children, .. } => {
            for child in children {
                if let Some(value) = eval_node(child, uk) {
                    return Some(value);
                }
            }
            warn!("decrypt: OR node had no satisfied child");
            None
        }
        Node::And { children, .. } => {
            let mut shares = Vec::with_capacity(children.len());
            for child in children {
                match eval_node(child, uk) {
                    Some(value) => shares.push((child.index(), value)),
                    None => return None,
                }
            }
            let index_set: Vec<Zr> = shares
                .iter()
                .map(|(idx, _)| Zr::from_u64(*idx as u64))
                .collect();
            let mut acc = Gt::one();
            for (idx, value) in &shares {
                let i = Zr::from_u64(*idx as u64);
                let coeff = lagrange_coefficient(i, &index_set);
                acc = acc * value.pow(coeff);
            }
            Some(acc)
        }
    }
}

/// Decrypts `ct` with `uk`. Returns `UnsatisfiedPolicy` when the key's
/// attributes do not satisfy the ciphertext's access tree; otherwise
/// recovers the exact GT element passed to [`encrypt`].
pub fn decrypt(_pk: &PublicKey, uk: &UserKey, ct: &Ciphertext) -> Result<Gt> {
    ct.tree.validate_ciphertext_shape()?;
    match eval_node(&ct.tree, uk) {
        None => Err(CpAbeError::UnsatisfiedPolicy),
        Some(f_root) => {
            let denominator = pair(ct.c, uk.d) / f_root;
            Ok(ct.c_tilde / denominator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pk_msk_consistency() {
        let (pk, msk) = setup();
        // h == g1^beta
        assert_eq!(pk.h, pk.g1 * msk.beta);
        // f^beta == g2 (f = g2^(1/beta))
        assert_eq!(pk.f * msk.beta, pk.g2);
        // e(g1, g2^alpha) == eggAlpha, i.e. e(g,g)^alpha without ever
        // materializing alpha itself.
        assert_eq!(pair(pk.g1, msk.g2_alpha), pk.egg_alpha);
    }

    #[test]
    fn scenario_and_with_or_branch_succeeds() {
        let (pk, msk) = setup();
        let policy = Policy::and(vec![
            Policy::leaf("attr1"),
            Policy::leaf("attr2"),
            Policy::or(vec![Policy::leaf("attr3"), Policy::leaf("attr5")]),
        ]);
        let m = Gt::random();
        let ct = encrypt(&pk, m, &policy).unwrap();
        let uk = keygen(&pk, &msk, &attrs(&["attr1", "attr2", "attr3", "attr4"])).unwrap();
        assert_eq!(decrypt(&pk, &uk, &ct).unwrap(), m);
    }

    #[test]
    fn scenario_plain_and_succeeds() {
        let (pk, msk) = setup();
        let policy = Policy::and(vec![
            Policy::leaf("attr1"),
            Policy::leaf("attr2"),
            Policy::leaf("attr3"),
        ]);
        let m = Gt::random();
        let ct = encrypt(&pk, m, &policy).unwrap();
        let uk = keygen(&pk, &msk, &attrs(&["attr1", "attr2", "attr3", "attr4"])).unwrap();
        assert_eq!(decrypt(&pk, &uk, &ct).unwrap(), m);
    }

    #[test]
    fn scenario_and_fails_with_partial_attributes() {
        let (pk, msk) = setup();
        let policy = Policy::and(vec![
            Policy::leaf("attr1"),
            Policy::leaf("attr2"),
            Policy::leaf("attr3"),
        ]);
        let m = Gt::random();
        let ct = encrypt(&pk, m, &policy).unwrap();
        let uk = keygen(&pk, &msk, &attrs(&["attr1"])).unwrap();
        assert!(matches!(
            decrypt(&pk, &uk, &ct),
            Err(CpAbeError::UnsatisfiedPolicy)
        ));
    }

    #[test]
    fn scenario_or_fails_with_unrelated_attribute() {
        let (pk, msk) = setup();
        let policy = Policy::or(vec![
            Policy::leaf("attr1"),
            Policy::leaf("attr2"),
            Policy::leaf("attr3"),
        ]);
        let m = Gt::random();
        let ct = encrypt(&pk, m, &policy).unwrap();
        let uk = keygen(&pk, &msk, &attrs(&["attr5"])).unwrap();
        assert!(matches!(
            decrypt(&pk, &uk, &ct),
            Err(CpAbeError::UnsatisfiedPolicy)
        ));
    }

    #[test]
    fn scenario_balanced_binary_tree_family() {
        for depth in 1u32..=6 {
            let (pk, msk) = setup();
            let leaf_count = 2u32.pow(depth);
            let start = leaf_count;
            let names: Vec<String> = (start..start + leaf_count)
                .map(|i| format!("attr_{}", i))
                .collect();
            let policy = balanced_and_tree(&names);
            let m = Gt::random();
            let ct = encrypt(&pk, m, &policy).unwrap();
            let uk = keygen(&pk, &msk, &names).unwrap();
            assert_eq!(decrypt(&pk, &uk, &ct).unwrap(), m, "depth {depth} failed");
        }
    }

    fn balanced_and_tree(leaves: &[String]) -> Policy {
        if leaves.len() == 1 {
            return Policy::leaf(leaves[0].clone());
        }
        let mid = leaves.len() / 2;
        Policy::and(vec![
            balanced_and_tree(&leaves[..mid]),
            balanced_and_tree(&leaves[mid..]),
        ])
    }

    #[test]
    fn duplicate_attribute_is_rejected() {
        let (pk, msk) = setup();
        let result = keygen(&pk, &msk, &attrs(&["attr1", "attr1"]));
        assert!(matches!(result, Err(CpAbeError::DuplicateAttribute(_))));
    }

    #[test]
    fn missing_attribute_does_not_corrupt_and_reconstruction() {
        // A key with none of the required attributes must fail outright,
        // not silently contribute an identity share to the AND product.
        let (pk, msk) = setup();
        let policy = Policy::and(vec![Policy::leaf("attr1"), Policy::leaf("attr2")]);
        let m = Gt::random();
        let ct = encrypt(&pk, m, &policy).unwrap();
        let uk = keygen(&pk, &msk, &attrs(&["unrelated"])).unwrap();
        let result = decrypt(&pk, &uk, &ct);
        assert!(matches!(result, Err(CpAbeError::UnsatisfiedPolicy)));
    }
}
