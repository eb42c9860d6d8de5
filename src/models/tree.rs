//! Serialized decision trees shared by the tree-ensemble families.

use serde::{Deserialize, Serialize};

/// One node in a flattened tree. Children are indices into the node
/// arena, so a tree serializes as a plain vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "node")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Leaf payload: a class distribution for classification trees, a
    /// single raw score for regression (boosting) trees.
    Leaf { value: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node arena; index 0 is the root.
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Walk the tree for one sample and return the leaf payload.
    ///
    /// Samples with a feature value equal to the threshold go left,
    /// matching the `<=` convention the trees were fitted with.
    pub fn evaluate(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }

    /// Feature indices of every split, in arena order.
    pub fn split_features(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter_map(|n| match n {
            Node::Split { feature, .. } => Some(*feature),
            Node::Leaf { .. } => None,
        })
    }

    /// Largest feature index referenced by any split, or `None` for a
    /// single-leaf tree.
    pub fn max_feature(&self) -> Option<usize> {
        self.split_features().max()
    }

    /// Structural check of the node arena. Walks are only safe when the
    /// arena is non-empty and every split's children stay in bounds and
    /// point strictly forward, which also rules out cycles.
    pub fn arena_problem(&self) -> Option<String> {
        if self.nodes.is_empty() {
            return Some("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = node {
                for child in [*left, *right] {
                    if child >= self.nodes.len() {
                        return Some(format!(
                            "node {} points at child {} of {}",
                            i,
                            child,
                            self.nodes.len()
                        ));
                    }
                    if child <= i {
                        return Some(format!("node {} points backward at {}", i, child));
                    }
                }
            }
        }
        None
    }

    /// Leaf payloads in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = &[f64]> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Leaf { value } => Some(value.as_slice()),
            Node::Split { .. } => None,
        })
    }

    /// Convenience constructor for a depth-1 tree (a stump).
    pub fn stump(feature: usize, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> Self {
        DecisionTree {
            nodes: vec![
                Node::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                Node::Leaf { value: left },
                Node::Leaf { value: right },
            ],
        }
    }
}
