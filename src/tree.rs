//! The ciphertext-side access tree: `spec.md` S:3 "Access tree (ciphertext)"
//! and S:4.2. Built once per Encrypt call from a caller's [`Policy`], then
//! decorated in place with per-node polynomials and leaf shares.

use serde::{Deserialize, Serialize};

use crate::error::{CpAbeError, Result};
use crate::pairing::{G1, G2, Zr};
use crate::policy::Policy;

/// A node of the decorated access tree carried inside a [`crate::schemes::bsw::Ciphertext`].
///
/// `polynomial` and `leaf_cy` are `None` right after [`build_access_tree`]
/// and are filled in by the scheme's Encrypt step. The codec preserves
/// `polynomial` when present but Decrypt never reads it back — only
/// `leaf_cy` and the tree shape matter for reconstruction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    And {
        index: u32,
        polynomial: Option<Vec<Zr>>,
        children: Vec<Node>,
    },
    Or {
        index: u32,
        polynomial: Option<Vec<Zr>>,
        children: Vec<Node>,
    },
    Leaf {
        index: u32,
        attribute: String,
        polynomial: Option<Vec<Zr>>,
        leaf_cy: Option<(G1, G2)>,
    },
}

impl Node {
    pub fn index(&self) -> u32 {
        match self {
            Node::And { index, .. } | Node::Or { index, .. } | Node::Leaf { index, .. } => *index,
        }
    }

    pub fn polynomial(&self) -> Option<&[Zr]> {
        match self {
            Node::And { polynomial, .. }
            | Node::Or { polynomial, .. }
            | Node::Leaf { polynomial, .. } => polynomial.as_deref(),
        }
    }

    pub fn set_polynomial(&mut self, poly: Vec<Zr>) {
        match self {
            Node::And { polynomial, .. }
            | Node::Or { polynomial, .. }
            | Node::Leaf { polynomial, .. } => *polynomial = Some(poly),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::And { children, .. } | Node::Or { children, .. } => children,
            Node::Leaf { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Node::And { children, .. } | Node::Or { children, .. } => children,
            Node::Leaf { .. } => &mut [],
        }
    }

    /// Degree of this node's decoration polynomial per `spec.md` S:3/S:4.6:
    /// `children - 1` for AND (n-of-n), `0` for OR (1-of-n), `0` for a leaf
    /// (a constant).
    pub fn degree(&self) -> usize {
        match self {
            Node::And { children, .. } => children.len().saturating_sub(1),
            Node::Or { .. } | Node::Leaf { .. } => 0,
        }
    }

    /// Consistency check used at decode time: every leaf must carry its
    /// `leaf_cy` decoration, and the shape (And/Or have children, Leaf does
    /// not) must be well-formed.
    pub fn validate_ciphertext_shape(&self) -> Result<()> {
        match self {
            Node::Leaf { leaf_cy, .. } => {
                if leaf_cy.is_none() {
                    return Err(CpAbeError::MalformedCiphertext(
                        "leaf node missing LeafCy decoration".into(),
                    ));
                }
                Ok(())
            }
            Node::And { children, .. } | Node::Or { children, .. } => {
                if children.is_empty() {
                    return Err(CpAbeError::MalformedCiphertext(
                        "internal node has no children".into(),
                    ));
                }
                for child in children {
                    child.validate_ciphertext_shape()?;
                }
                Ok(())
            }
        }
    }
}

/// Walks a caller-supplied [`Policy`], copying tags and attributes and
/// assigning each node a 1-based sibling index (the root's index is 1).
/// Fails with `MalformedPolicy` under the same conditions as
/// [`Policy::validate`].
pub fn build_access_tree(policy: &Policy) -> Result<Node> {
    policy.validate()?;
    Ok(build(policy, 1))
}

fn build(policy: &Policy, index: u32) -> Node {
    match policy {
        Policy::Leaf { attribute } => Node::Leaf {
            index,
            attribute: attribute.clone(),
            polynomial: None,
            leaf_cy: None,
        },
        Policy::And { children } => Node::And {
            index,
            polynomial: None,
            children: children
                .iter()
                .enumerate()
                .map(|(i, c)| build(c, (i + 1) as u32))
                .collect(),
        },
        Policy::Or { children } => Node::Or {
            index,
            polynomial: None,
            children: children
                .iter()
                .enumerate()
                .map(|(i, c)| build(c, (i + 1) as u32))
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_sibling_indices_preorder() {
        let policy = Policy::and(vec![
            Policy::leaf("a"),
            Policy::or(vec![Policy::leaf("b"), Policy::leaf("c")]),
        ]);
        let tree = build_access_tree(&policy).unwrap();
        assert_eq!(tree.index(), 1);
        let children = tree.children();
        assert_eq!(children[0].index(), 1);
        assert_eq!(children[1].index(), 2);
        let grandchildren = children[1].children();
        assert_eq!(grandchildren[0].index(), 1);
        assert_eq!(grandchildren[1].index(), 2);
    }

    #[test]
    fn degrees_match_threshold_semantics() {
        let policy = Policy::and(vec![Policy::leaf("a"), Policy::leaf("b"), Policy::leaf("c")]);
        let tree = build_access_tree(&policy).unwrap();
        assert_eq!(tree.degree(), 2);

        let policy = Policy::or(vec![Policy::leaf("a"), Policy::leaf("b"), Policy::leaf("c")]);
        let tree = build_access_tree(&policy).unwrap();
        assert_eq!(tree.degree(), 0);
    }

    #[test]
    fn rejects_malformed_policy() {
        assert!(build_access_tree(&Policy::leaf("")).is_err());
    }
}
