// core/hierarchy.rs
//
// Parent/child relationships between bodies, resolved once from parent names.
// Absolute positions are a second pass over already-computed relative positions,
// so a child may appear before its parent in the body list.
//
// Usage:
//   let hierarchy = BodyHierarchy::new(&bodies)?;
//   let absolute = hierarchy.absolute_positions(&relative);

use std::collections::HashSet;

use glam::DVec3;

use super::body::BodyParameters;
use crate::error::{ConfigError, ConfigResult};

/// Map each body to the index of its parent.
///
/// First name match wins, a body never matches itself, and an empty or
/// unknown parent name makes the body a root (`None`).
pub fn resolve_parents(bodies: &[BodyParameters]) -> Vec<Option<usize>> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            if !body.has_parent() {
                return None;
            }
            bodies
                .iter()
                .enumerate()
                .find(|&(j, other)| j != i && other.name == body.parent)
                .map(|(j, _)| j)
        })
        .collect()
}

/// Sum each body's relative position with those of all its ancestors.
///
/// The walk stops after `parents.len()` hops, so a malformed table can never
/// loop forever.
pub fn compute_absolute_positions(relative: &[DVec3], parents: &[Option<usize>]) -> Vec<DVec3> {
    debug_assert_eq!(relative.len(), parents.len());
    let max_hops = parents.len();
    (0..relative.len())
        .map(|i| {
            let mut pos = relative[i];
            let mut parent = parents[i];
            let mut hops = 0;
            while let Some(p) = parent {
                if hops == max_hops {
                    debug_assert!(false, "parent chain of body {i} does not terminate");
                    break;
                }
                pos += relative[p];
                parent = parents[p];
                hops += 1;
            }
            pos
        })
        .collect()
}

/// Validated, immutable body forest.
#[derive(Debug, Clone)]
pub struct BodyHierarchy {
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    depths: Vec<usize>,
}

impl BodyHierarchy {
    /// Build the hierarchy, rejecting empty systems, duplicate names,
    /// dangling parent names and cycles.
    pub fn new(bodies: &[BodyParameters]) -> ConfigResult<Self> {
        if bodies.is_empty() {
            return Err(ConfigError::NoBodies);
        }

        let mut seen = HashSet::with_capacity(bodies.len());
        for body in bodies {
            if !seen.insert(body.name.as_str()) {
                return Err(ConfigError::DuplicateName(body.name.clone()));
            }
        }

        let parents = resolve_parents(bodies);
        for (body, parent) in bodies.iter().zip(&parents) {
            if body.has_parent() && parent.is_none() {
                return Err(ConfigError::UnresolvedParent {
                    body: body.name.clone(),
                    parent: body.parent.clone(),
                });
            }
        }

        let mut depths = Vec::with_capacity(bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            let mut depth = 0;
            let mut parent = parents[i];
            while let Some(p) = parent {
                depth += 1;
                if depth > bodies.len() {
                    return Err(ConfigError::ParentCycle(body.name.clone()));
                }
                parent = parents[p];
            }
            depths.push(depth);
        }

        let mut children = vec![Vec::new(); bodies.len()];
        let mut roots = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) => children[*p].push(i),
                None => roots.push(i),
            }
        }

        Ok(Self { parents, children, roots, depths })
    }

    /// Parent index of a body.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents[index]
    }

    /// Parent table, one entry per body.
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Direct children of a body.
    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// Bodies without a parent.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Number of ancestors (0 for roots).
    pub fn depth(&self, index: usize) -> usize {
        self.depths[index]
    }

    /// Absolute positions from per-body relative positions.
    pub fn absolute_positions(&self, relative: &[DVec3]) -> Vec<DVec3> {
        compute_absolute_positions(relative, &self.parents)
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether the hierarchy is empty (never true once built).
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
