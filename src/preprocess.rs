//! Input preprocessing.
//!
//! With [`HeaderMapping::SourceDirectories`], the main type of every input
//! is mapped to the header of the unit the input is generated into, so
//! other units include it by its source location instead of its package.

use objlower_ast::NodeKind;
use objlower_core::{HeaderMapping, Options, SymbolEnvironment, TypeBinding};
use objlower_gen::{HeaderMap, UnitPlan, file_stem};

use crate::SourceInput;

/// Header map for the given inputs and their unit plans.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn header_map(
    inputs: &[SourceInput],
    plans: &[UnitPlan],
    env: &SymbolEnvironment,
    options: &Options,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if options.header_mapping != HeaderMapping::SourceDirectories {
        return headers;
    }

    for plan in plans {
        for &member in &plan.members {
            let Some(input) = inputs.get(member) else {
                continue;
            };
            if !is_regular_source(&input.source_name, options) {
                continue;
            }
            if let Some(main) = main_type(input, env) {
                headers.put(main.name.to_string(), format!("{}.h", plan.output_path));
            }
        }
    }
    headers
}

/// Inputs with the configured extension, other than package descriptors.
fn is_regular_source(source_name: &str, options: &Options) -> bool {
    let suffix = format!(".{}", options.source_extension);
    source_name.ends_with(&suffix) && file_stem(source_name) != "package-info"
}

/// The top-level type named after the input file, else the first top-level
/// type.
pub fn main_type<'env>(input: &SourceInput, env: &'env SymbolEnvironment) -> Option<&'env TypeBinding> {
    let stem = file_stem(&input.source_name);
    let top_level: Vec<&TypeBinding> = input
        .tree
        .type_decls()
        .into_iter()
        .filter_map(|decl| match input.tree.kind(decl) {
            Some(NodeKind::TypeDecl { binding, .. }) => *binding,
            _ => None,
        })
        .filter_map(|hash| env.get_type(hash))
        .filter(|binding| !binding.name.is_nested())
        .collect();
    top_level
        .iter()
        .find(|binding| binding.name.simple_name() == stem)
        .or_else(|| top_level.first())
        .copied()
}
