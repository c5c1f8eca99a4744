//! The user-supplied access policy: a boolean tree of AND/OR/LEAF nodes.
//!
//! This is the *input* representation (`spec.md` S:3 "Access policy
//! (input)"). It carries no cryptographic material and is the shape callers
//! construct by hand or decode from `in/utils/access_policy` JSON.

use serde::{Deserialize, Serialize};

use crate::error::{CpAbeError, Result};

/// One node of a caller-supplied access policy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Policy {
    And { children: Vec<Policy> },
    Or { children: Vec<Policy> },
    Leaf { attribute: String },
}

impl Policy {
    pub fn leaf(attribute: impl Into<String>) -> Policy {
        Policy::Leaf {
            attribute: attribute.into(),
        }
    }

    pub fn and(children: Vec<Policy>) -> Policy {
        Policy::And { children }
    }

    pub fn or(children: Vec<Policy>) -> Policy {
        Policy::Or { children }
    }

    /// Structural validation shared by `buildAccessTree` and the codec:
    /// leaves carry no children, internal nodes carry at least one child,
    /// attribute names are non-empty.
    pub fn validate(&self) -> Result<()> {
        match self {
            Policy::Leaf { attribute } => {
                if attribute.is_empty() {
                    return Err(CpAbeError::MalformedPolicy(
                        "leaf attribute must not be empty".into(),
                    ));
                }
                Ok(())
            }
            Policy::And { children } | Policy::Or { children } => {
                if children.is_empty() {
                    return Err(CpAbeError::MalformedPolicy(
                        "internal node must have at least one child".into(),
                    ));
                }
                for child in children {
                    child.validate()?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_attribute() {
        let p = Policy::leaf("");
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_childless_internal_node() {
        let p = Policy::And { children: vec![] };
        assert!(p.validate().is_err());
    }

    #[test]
    fn accepts_nested_policy() {
        let p = Policy::and(vec![
            Policy::leaf("attr1"),
            Policy::or(vec![Policy::leaf("attr2"), Policy::leaf("attr3")]),
        ]);
        assert!(p.validate().is_ok());
    }
}
