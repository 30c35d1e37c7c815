//! Generation Partitioner - group inputs into generation units and order
//! the types of each unit.
//!
//! ## Grouping
//!
//! - [`UnitGrouping::PerFile`]: one unit per input, written next to the
//!   input's relative path (`com/foo/A.java` -> `com/foo/A`).
//! - [`UnitGrouping::PerDirectory`]: one unit per source directory, named
//!   after the camel-cased directory (`com/foo` -> `com/foo/ComFoo`).
//!
//! ## Ordering
//!
//! Within a unit, a locally declared supertype is emitted before its
//! subtypes. Unrelated types keep declaration order.

use objlower_core::{GenerationError, Span, TypeBinding, UnitGrouping, camel_case_package};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use rustc_hash::FxHashMap;

/// Inputs that are translated together into one pair of output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPlan {
    /// Name reported for the unit: the input path, or the source directory
    /// for grouped units.
    pub source_name: String,
    /// Output path without extension.
    pub output_path: String,
    /// Indices of the member inputs, in input order.
    pub members: Vec<usize>,
}

/// Group inputs, identified by their relative source paths.
pub fn plan_units<S: AsRef<str>>(source_names: &[S], grouping: UnitGrouping) -> Vec<UnitPlan> {
    match grouping {
        UnitGrouping::PerFile => source_names
            .iter()
            .enumerate()
            .map(|(index, name)| UnitPlan {
                source_name: name.as_ref().to_string(),
                output_path: strip_extension(name.as_ref()).to_string(),
                members: vec![index],
            })
            .collect(),
        UnitGrouping::PerDirectory => {
            let mut plans: Vec<UnitPlan> = Vec::new();
            let mut by_dir: FxHashMap<&str, usize> = FxHashMap::default();
            for (index, name) in source_names.iter().enumerate() {
                let dir = parent_dir(name.as_ref());
                match by_dir.get(dir) {
                    Some(&plan) => plans[plan].members.push(index),
                    None => {
                        by_dir.insert(dir, plans.len());
                        plans.push(UnitPlan {
                            source_name: if dir.is_empty() { ".".into() } else { dir.into() },
                            output_path: directory_output_path(dir),
                            members: vec![index],
                        });
                    }
                }
            }
            plans
        }
    }
}

/// `com/foo/A.java` -> `com/foo/A`
pub fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => &path[..dot],
        _ => path,
    }
}

/// `com/foo/A.java` -> `A`
pub fn file_stem(path: &str) -> &str {
    let stripped = strip_extension(path);
    stripped.rsplit('/').next().unwrap_or(stripped)
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map(|slash| &path[..slash]).unwrap_or("")
}

fn directory_output_path(dir: &str) -> String {
    let segments: Vec<String> = dir
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        return "DefaultPackage".to_string();
    }
    format!("{dir}/{}", camel_case_package(&segments))
}

/// Order types so that locally declared supertypes come first.
///
/// Returns indices into `types`. A cycle among local supertypes is an
/// error.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn order_types(types: &[(&TypeBinding, Span)]) -> Result<Vec<usize>, GenerationError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(types.len(), types.len());
    let mut nodes: FxHashMap<_, NodeIndex> = FxHashMap::default();
    for (index, (binding, _)) in types.iter().enumerate() {
        nodes.insert(binding.hash, graph.add_node(index));
    }

    // Edges run from subtype to supertype.
    for (index, (binding, _)) in types.iter().enumerate() {
        let sub = NodeIndex::new(index);
        for supertype in binding.supertypes() {
            if let Some(&sup) = nodes.get(&supertype) {
                graph.add_edge(sub, sup, ());
            }
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        let (binding, span) = types[graph[cycle.node_id()]];
        return Err(GenerationError::CyclicSupertypes {
            name: binding.name.to_string(),
            span,
        });
    }

    let mut order = Vec::with_capacity(types.len());
    let mut dfs = DfsPostOrder::empty(&graph);
    for index in 0..types.len() {
        dfs.move_to(NodeIndex::new(index));
        while let Some(node) = dfs.next(&graph) {
            order.push(graph[node]);
        }
    }
    Ok(order)
}
