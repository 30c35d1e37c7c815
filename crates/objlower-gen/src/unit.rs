//! Generation units: the types emitted together into one pair of output
//! files.

use objlower_ast::{NodeId, NodeKind, Tree};
use objlower_core::{AstError, GenerationError, Options, Span, SymbolEnvironment, TypeBinding};
use rustc_hash::FxHashSet;

use crate::partition::{UnitPlan, order_types};
use crate::{GeneratedType, HeaderMap, StringPool, TypeContext};

/// The types of one output pair, in emission order.
#[derive(Debug, Clone)]
pub struct GenerationUnit {
    pub source_name: String,
    /// Output path without extension.
    pub output_path: String,
    /// Locally declared supertypes come before their subtypes.
    pub types: Vec<GeneratedType>,
    /// Native code spliced verbatim into the implementation file.
    pub native_blocks: Vec<String>,
    pub has_incomplete_protocol: bool,
    pub has_incomplete_implementation: bool,
    pub strings: StringPool,
}

impl GenerationUnit {
    /// Build the unit planned by `plan` from its member trees, which must
    /// already be rewritten.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(
        plan: &UnitPlan,
        trees: &[&Tree],
        env: &SymbolEnvironment,
        options: &Options,
        headers: &HeaderMap,
    ) -> Result<Self, GenerationError> {
        let strings = StringPool::collect(trees.iter().copied());

        let mut decls = Vec::new();
        for (index, tree) in trees.iter().enumerate() {
            for decl in tree.type_decls() {
                let node = tree.node(decl)?;
                let binding = match &node.kind {
                    NodeKind::TypeDecl {
                        binding: Some(hash),
                        ..
                    } => env.get_type(*hash).ok_or(GenerationError::UnknownType {
                        hash: *hash,
                        span: node.span,
                    })?,
                    NodeKind::TypeDecl { binding: None, .. } => {
                        return Err(GenerationError::MissingTypeBinding { span: node.span });
                    }
                    other => {
                        return Err(AstError::UnexpectedNode {
                            expected: "TypeDecl",
                            found: other.name(),
                            span: node.span,
                        }
                        .into());
                    }
                };
                decls.push(LocalDecl {
                    tree: index,
                    decl,
                    binding,
                    span: node.span,
                });
            }
        }

        let locals: FxHashSet<_> = decls.iter().map(|d| d.binding.hash).collect();
        let ordering: Vec<_> = decls.iter().map(|d| (d.binding, d.span)).collect();
        let order = order_types(&ordering)?;

        let ctx = TypeContext {
            env,
            options,
            headers,
            locals: &locals,
            strings: &strings,
        };
        let types = order
            .into_iter()
            .map(|i| GeneratedType::generate(trees[decls[i].tree], decls[i].decl, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let incomplete: Vec<_> = types
            .iter()
            .filter(|ty| ty.is_abstract && !ty.is_interface)
            .collect();
        let has_incomplete_implementation = !incomplete.is_empty();
        let has_incomplete_protocol = incomplete.iter().any(|ty| ty.has_protocols);

        let native_blocks = trees
            .iter()
            .flat_map(|tree| tree.native_blocks().iter().cloned())
            .collect();

        Ok(Self {
            source_name: plan.source_name.clone(),
            output_path: plan.output_path.clone(),
            types,
            native_blocks,
            has_incomplete_protocol,
            has_incomplete_implementation,
            strings,
        })
    }

    pub fn header_path(&self) -> String {
        format!("{}.h", self.output_path)
    }

    pub fn implementation_path(&self) -> String {
        format!("{}.m", self.output_path)
    }

    pub fn local_type(&self, name: &str) -> Option<&GeneratedType> {
        self.types.iter().find(|ty| ty.type_name == name)
    }
}

struct LocalDecl<'a> {
    tree: usize,
    decl: NodeId,
    binding: &'a TypeBinding,
    span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use objlower_core::{Modifiers, QualifiedName, TypeHash, Visibility};

    fn plan() -> UnitPlan {
        UnitPlan {
            source_name: "com/foo/A.java".to_string(),
            output_path: "com/foo/A".to_string(),
            members: vec![0],
        }
    }

    #[test]
    fn types_follow_supertype_order() {
        let mut env = SymbolEnvironment::new();
        let base = env
            .register_type(TypeBinding::class(QualifiedName::from_dotted("com.foo.Base")))
            .unwrap();
        let a = env
            .register_type(
                TypeBinding::class(QualifiedName::from_dotted("com.foo.A")).with_superclass(base),
            )
            .unwrap();

        let mut tree = Tree::new();
        let a_decl = tree.type_decl(a, Vec::new(), Span::default());
        let base_decl = tree.type_decl(base, Vec::new(), Span::default());
        tree.compilation_unit("com/foo/A.java", vec![a_decl, base_decl], vec!["#include <x.h>\n".into()]);

        let unit = GenerationUnit::build(&plan(), &[&tree], &env, &Options::default(), &HeaderMap::new())
            .unwrap();
        let names: Vec<_> = unit.types.iter().map(|ty| ty.type_name.as_str()).collect();
        assert_eq!(names, vec!["ComFooBase", "ComFooA"]);
        assert_eq!(unit.native_blocks, vec!["#include <x.h>\n".to_string()]);
        assert_eq!(unit.header_path(), "com/foo/A.h");
        assert!(unit.local_type("ComFooA").is_some());
        assert!(!unit.has_incomplete_implementation);
    }

    #[test]
    fn abstract_classes_set_incomplete_flags() {
        let mut env = SymbolEnvironment::new();
        let proto = env
            .register_type(TypeBinding::interface(QualifiedName::from_dotted("com.foo.P")))
            .unwrap();
        let a = env
            .register_type(
                TypeBinding::class(QualifiedName::from_dotted("com.foo.A"))
                    .with_modifiers(Modifiers::ABSTRACT)
                    .with_interface(proto)
                    .with_visibility(Visibility::Package),
            )
            .unwrap();

        let mut tree = Tree::new();
        let decl = tree.type_decl(a, Vec::new(), Span::default());
        tree.compilation_unit("com/foo/A.java", vec![decl], Vec::new());

        let unit = GenerationUnit::build(&plan(), &[&tree], &env, &Options::default(), &HeaderMap::new())
            .unwrap();
        assert!(unit.has_incomplete_implementation);
        assert!(unit.has_incomplete_protocol);
    }

    #[test]
    fn unknown_type_fails_the_unit() {
        let env = SymbolEnvironment::new();
        let mut tree = Tree::new();
        let decl = tree.type_decl(TypeHash::from_name("Ghost"), Vec::new(), Span::point(2, 1));
        tree.compilation_unit("Ghost.java", vec![decl], Vec::new());

        let err = GenerationUnit::build(&plan(), &[&tree], &env, &Options::default(), &HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownType { .. }));
        assert_eq!(err.span(), Span::point(2, 1));
    }
}
