//! Per-type generation.
//!
//! Each type declaration becomes a [`GeneratedType`]: the text of its
//! public declaration (declaration file), its private declaration and its
//! implementation (implementation file), plus the types each of those
//! segments depends on.
//!
//! Static fields that are not primitive constants get unit-scope storage,
//! a `<Type>_clinit()` holding their initializers, a once-only
//! `<Type>_initialize()` and the `get`/`getRef`/`set` accessors the
//! static-access pass rewrites cross-type references to.

use std::collections::BTreeSet;

use objlower_ast::{NodeId, NodeKind, Renderer, Tree, declaration, type_name};
use objlower_core::{
    AstError, Binding, GenerationError, MethodRef, Options, SymbolEnvironment, TypeBinding,
    TypeHash, TypeRef, VariableBinding, Visibility, mangle,
};
use rustc_hash::FxHashSet;

use crate::{HeaderMap, Import, StringPool};

/// Inputs shared by every type of one unit.
#[derive(Clone, Copy)]
pub struct TypeContext<'a> {
    pub env: &'a SymbolEnvironment,
    pub options: &'a Options,
    pub headers: &'a HeaderMap,
    /// Types declared in the unit being generated.
    pub locals: &'a FxHashSet<TypeHash>,
    pub strings: &'a StringPool,
}

/// Generated text and dependencies of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    pub hash: TypeHash,
    /// Target-language name.
    pub type_name: String,
    pub is_private: bool,
    pub is_interface: bool,
    pub is_abstract: bool,
    /// The type adopts at least one protocol.
    pub has_protocols: bool,
    pub supertypes: Vec<TypeHash>,

    /// Declaration-file segment. Empty for private types.
    pub public_declaration: String,
    /// Implementation-file segment emitted before every implementation.
    pub private_declaration: String,
    pub implementation: String,

    /// Types fully used by the implementation.
    pub implementation_includes: BTreeSet<Import>,
    /// Types the implementation only refers to by pointer.
    pub implementation_forward_declarations: BTreeSet<Import>,
    /// Supertypes of a public type.
    pub header_includes: BTreeSet<Import>,
    /// Types named by the public declaration.
    pub header_forward_declarations: BTreeSet<Import>,
}

impl GeneratedType {
    /// Generate the type declared by `decl`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(
        tree: &Tree,
        decl: NodeId,
        ctx: TypeContext<'_>,
    ) -> Result<Self, GenerationError> {
        let node = tree.node(decl)?;
        let NodeKind::TypeDecl { binding, members } = &node.kind else {
            return Err(AstError::UnexpectedNode {
                expected: "TypeDecl",
                found: node.kind.name(),
                span: node.span,
            }
            .into());
        };
        let hash = binding.ok_or(GenerationError::MissingTypeBinding { span: node.span })?;
        let binding = ctx
            .env
            .get_type(hash)
            .ok_or(GenerationError::UnknownType {
                hash,
                span: node.span,
            })?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        for &member in members {
            let member_node = tree.node(member)?;
            let unbound = || AstError::UnexpectedNode {
                expected: "bound variable",
                found: member_node.kind.name(),
                span: member_node.span,
            };
            match &member_node.kind {
                NodeKind::FieldDecl { var, initializer } => fields.push(Field {
                    var: ctx.env.variable(*var).ok_or_else(unbound)?,
                    initializer: *initializer,
                }),
                NodeKind::MethodDecl {
                    method,
                    params,
                    body,
                } => methods.push(Method {
                    method,
                    params: params
                        .iter()
                        .map(|param| ctx.env.variable(*param).ok_or_else(unbound))
                        .collect::<Result<_, _>>()?,
                    body: *body,
                }),
                other => {
                    return Err(AstError::UnexpectedNode {
                        expected: "FieldDecl or MethodDecl",
                        found: other.name(),
                        span: member_node.span,
                    }
                    .into());
                }
            }
        }

        let writer = TypeWriter {
            ctx,
            binding,
            name: binding.full_name(),
            fields,
            methods,
            renderer: Renderer::new(tree, ctx.env).with_strings(ctx.strings),
        };

        let mut generated = GeneratedType {
            hash,
            type_name: writer.name.clone(),
            is_private: binding.is_private(),
            is_interface: binding.is_interface(),
            is_abstract: binding.is_abstract(),
            has_protocols: !binding.interfaces.is_empty(),
            supertypes: binding.supertypes().collect(),
            public_declaration: String::new(),
            private_declaration: String::new(),
            implementation: writer.implementation()?,
            implementation_includes: BTreeSet::new(),
            implementation_forward_declarations: BTreeSet::new(),
            header_includes: BTreeSet::new(),
            header_forward_declarations: BTreeSet::new(),
        };

        if binding.is_private() {
            let mut text = writer.interface()?;
            text.push_str(&writer.static_declarations(|_| true, false));
            generated.private_declaration = text;
        } else {
            let mut text = writer.interface()?;
            text.push_str(&writer.static_declarations(|var| writer.is_exported(var), true));
            generated.public_declaration = text;
            generated.private_declaration =
                writer.static_declarations(|var| !writer.is_exported(var), false);
        }

        writer.collect_imports(tree, decl, &mut generated);
        Ok(generated)
    }

    /// The type contributes to the declaration file.
    pub fn has_public_surface(&self) -> bool {
        !self.public_declaration.is_empty()
    }
}

struct Field<'a> {
    var: &'a VariableBinding,
    initializer: Option<NodeId>,
}

struct Method<'a> {
    method: &'a MethodRef,
    params: Vec<&'a VariableBinding>,
    body: Option<NodeId>,
}

struct TypeWriter<'a> {
    ctx: TypeContext<'a>,
    binding: &'a TypeBinding,
    name: String,
    fields: Vec<Field<'a>>,
    methods: Vec<Method<'a>>,
    renderer: Renderer<'a>,
}

impl<'a> TypeWriter<'a> {
    fn env(&self) -> &SymbolEnvironment {
        self.ctx.env
    }

    fn statics(&self) -> impl Iterator<Item = &Field<'a>> + '_ {
        self.fields.iter().filter(|field| field.var.is_static())
    }

    /// Static fields backed by storage and accessors.
    fn static_storage(&self) -> impl Iterator<Item = &Field<'a>> + '_ {
        self.statics()
            .filter(|field| !field.var.is_primitive_constant())
    }

    fn instance_fields(&self) -> impl Iterator<Item = &Field<'a>> + '_ {
        self.fields.iter().filter(|field| !field.var.is_static())
    }

    fn has_static_state(&self) -> bool {
        self.static_storage().next().is_some()
    }

    /// Static members of public types are visible to other units unless
    /// they are private.
    fn is_exported(&self, var: &VariableBinding) -> bool {
        !self.binding.is_private() && var.visibility != Visibility::Private
    }

    fn initialized_flag(&self) -> String {
        format!("{}__initialized", self.name)
    }

    fn initializing_flag(&self) -> String {
        format!("{}__initializing", self.name)
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    fn interface(&self) -> Result<String, AstError> {
        let protocols: Vec<String> = self
            .binding
            .interfaces
            .iter()
            .filter_map(|hash| self.env().full_name(*hash))
            .collect();

        let mut out = String::new();
        if self.binding.is_interface() {
            let mut adopted = protocols;
            adopted.push("NSObject".to_string());
            out.push_str(&format!("\n@protocol {} <{}>\n", self.name, adopted.join(", ")));
        } else {
            let superclass = self
                .binding
                .superclass
                .and_then(|hash| self.env().full_name(hash))
                .unwrap_or_else(|| "NSObject".to_string());
            out.push_str(&format!("\n@interface {} : {superclass}", self.name));
            if !protocols.is_empty() {
                out.push_str(&format!(" <{}>", protocols.join(", ")));
            }

            let ivars: Vec<String> = self
                .instance_fields()
                .map(|field| {
                    format!(
                        "  {};\n",
                        declaration(&field.var.ty, &mangle::ivar_name(&field.var.name), self.env())
                    )
                })
                .collect();
            if ivars.is_empty() {
                out.push('\n');
            } else {
                out.push_str(" {\n @public\n");
                out.extend(ivars);
                out.push_str("}\n");
            }
        }

        for method in &self.methods {
            out.push_str(&format!("\n{};\n", self.method_signature(method)));
        }
        out.push_str("\n@end\n");
        Ok(out)
    }

    /// `- (jint)addWithInt:(jint)a with:(jint)b`
    fn method_signature(&self, method: &Method<'_>) -> String {
        let kind = if method.method.is_static { '+' } else { '-' };
        let ret = type_name(&method.method.return_type, self.env());
        if method.params.is_empty() {
            return format!("{kind} ({ret}){}", method.method.name.trim_end_matches(':'));
        }
        let parts: Vec<&str> = method
            .method
            .name
            .split(':')
            .filter(|part| !part.is_empty())
            .collect();
        let params: Vec<String> = method
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                format!(
                    "{}:({}){}",
                    parts.get(i).copied().unwrap_or(""),
                    type_name(&param.ty, self.env()),
                    mangle::identifier(&param.name)
                )
            })
            .collect();
        format!("{kind} ({ret}){}", params.join(" "))
    }

    fn getter_prototype(&self, var: &VariableBinding) -> String {
        let name = mangle::getter_name(&self.name, &var.name);
        declaration(&var.ty, &format!("{name}(void)"), self.env())
    }

    fn ref_getter_prototype(&self, var: &VariableBinding) -> String {
        let name = mangle::ref_getter_name(&self.name, &var.name);
        declaration(&var.ty.clone().pointer_to(), &format!("{name}(void)"), self.env())
    }

    fn setter_prototype(&self, var: &VariableBinding) -> String {
        let name = mangle::setter_name(&self.name, &var.name);
        let param = declaration(&var.ty, "value", self.env());
        declaration(&var.ty, &format!("{name}({param})"), self.env())
    }

    /// Constant defines, storage and accessor prototypes of the static
    /// fields selected by `include`.
    fn static_declarations(&self, include: impl Fn(&VariableBinding) -> bool, exported: bool) -> String {
        let prefix = if exported { "FOUNDATION_EXPORT " } else { "" };
        let mut lines = Vec::new();
        for field in self.statics().filter(|field| include(field.var)) {
            let var = field.var;
            if var.is_primitive_constant() {
                if let Some(value) = &var.constant {
                    lines.push(format!(
                        "#define {} {value}",
                        mangle::static_storage_name(&self.name, &var.name)
                    ));
                }
                continue;
            }
            if exported {
                let storage = mangle::static_storage_name(&self.name, &var.name);
                lines.push(format!("{prefix}{};", declaration(&var.ty, &storage, self.env())));
            }
            lines.push(format!("{prefix}{};", self.getter_prototype(var)));
            lines.push(format!("{prefix}{};", self.ref_getter_prototype(var)));
            if var.ty.is_object() {
                lines.push(format!("{prefix}{};", self.setter_prototype(var)));
            }
        }

        let has_storage = self.static_storage().any(|field| include(field.var));
        let owns_initializer = exported || !self.has_exported_storage();
        if has_storage && owns_initializer {
            lines.push(format!(
                "{prefix}void {}(void);",
                mangle::initialize_name(&self.name)
            ));
        }

        if lines.is_empty() {
            return String::new();
        }
        format!("\n{}\n", lines.join("\n"))
    }

    fn has_exported_storage(&self) -> bool {
        self.static_storage().any(|field| self.is_exported(field.var))
    }

    // ------------------------------------------------------------------------
    // Implementation
    // ------------------------------------------------------------------------

    fn implementation(&self) -> Result<String, AstError> {
        let mut out = String::new();

        if self.has_static_state() {
            out.push('\n');
            for field in self.static_storage() {
                let storage = mangle::static_storage_name(&self.name, &field.var.name);
                let linkage = if self.is_exported(field.var) { "" } else { "static " };
                out.push_str(&format!(
                    "{linkage}{};\n",
                    declaration(&field.var.ty, &storage, self.env())
                ));
            }
            out.push_str(&format!(
                "static _Atomic(jboolean) {};\n",
                self.initialized_flag()
            ));
            out.push_str(&format!(
                "static _Thread_local jboolean {};\n",
                self.initializing_flag()
            ));
        }

        if !self.binding.is_interface() {
            out.push_str(&format!("\n@implementation {}\n", self.name));
            out.push_str(&self.instance_initializer()?);
            for method in &self.methods {
                if let Some(body) = method.body {
                    out.push_str(&format!(
                        "\n{} {}",
                        self.method_signature(method),
                        self.renderer.statement(body, 0)?
                    ));
                }
            }
            out.push_str("\n@end\n");
        }

        if self.has_static_state() {
            out.push_str(&self.class_initializer()?);
            out.push_str(&self.initialize());
            for field in self.static_storage() {
                out.push_str(&self.accessors(field.var));
            }
        }
        Ok(out)
    }

    /// Store `value` into `target`, retaining objects under manual
    /// reference counting.
    fn store(&self, ty: &TypeRef, target: &str, value: &str) -> String {
        if ty.is_object() && self.ctx.options.use_reference_counting() {
            format!("JreStrongAssign(&{target}, {value})")
        } else {
            format!("{target} = {value}")
        }
    }

    fn instance_initializer(&self) -> Result<String, AstError> {
        let mut stores = Vec::new();
        for field in self.instance_fields() {
            if let Some(init) = field.initializer {
                let value = self.renderer.expression(init)?;
                let ivar = mangle::ivar_name(&field.var.name);
                stores.push(format!("    {};\n", self.store(&field.var.ty, &ivar, &value)));
            }
        }
        if stores.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(
            "\n- (instancetype)init {{\n  if (self = [super init]) {{\n{}  }}\n  return self;\n}}\n",
            stores.concat()
        ))
    }

    fn class_initializer(&self) -> Result<String, AstError> {
        let mut out = format!("\nstatic void {}(void) {{\n", mangle::clinit_name(&self.name));
        for field in self.static_storage() {
            if let Some(init) = field.initializer {
                let value = self.renderer.expression(init)?;
                let storage = mangle::static_storage_name(&self.name, &field.var.name);
                out.push_str(&format!("  {};\n", self.store(&field.var.ty, &storage, &value)));
            }
        }
        out.push_str("}\n");
        Ok(out)
    }

    /// Runs the class initializer exactly once. Concurrent first callers
    /// block on the once-token; a call made while the initializer runs on
    /// the same thread returns immediately.
    fn initialize(&self) -> String {
        let initialized = self.initialized_flag();
        let initializing = self.initializing_flag();
        format!(
            "\nvoid {initialize}(void) {{\n\
             \x20 if ({initializing} || atomic_load_explicit(&{initialized}, memory_order_acquire)) {{\n\
             \x20   return;\n\
             \x20 }}\n\
             \x20 static dispatch_once_t once;\n\
             \x20 dispatch_once(&once, ^{{\n\
             \x20   {initializing} = true;\n\
             \x20   {clinit}();\n\
             \x20   {initializing} = false;\n\
             \x20   atomic_store_explicit(&{initialized}, true, memory_order_release);\n\
             \x20 }});\n\
             }}\n",
            initialize = mangle::initialize_name(&self.name),
            clinit = mangle::clinit_name(&self.name),
        )
    }

    fn accessors(&self, var: &VariableBinding) -> String {
        let storage = mangle::static_storage_name(&self.name, &var.name);
        let initialize = mangle::initialize_name(&self.name);
        let mut out = format!(
            "\n{} {{\n  {initialize}();\n  return {storage};\n}}\n",
            self.getter_prototype(var)
        );
        out.push_str(&format!(
            "\n{} {{\n  {initialize}();\n  return &{storage};\n}}\n",
            self.ref_getter_prototype(var)
        ));
        if var.ty.is_object() {
            out.push_str(&format!(
                "\n{} {{\n  {initialize}();\n  return {};\n}}\n",
                self.setter_prototype(var),
                self.store(&var.ty, &storage, "value")
            ));
        }
        out
    }

    // ------------------------------------------------------------------------
    // Dependencies
    // ------------------------------------------------------------------------

    fn import(&self, hash: TypeHash) -> Option<Import> {
        if hash == self.binding.hash {
            return None;
        }
        let target = self.env().get_type(hash)?;
        if target.native_name.is_some() {
            return None;
        }
        Some(Import::new(target, self.ctx.headers, self.ctx.locals.contains(&hash)))
    }

    fn type_import(&self, ty: &TypeRef) -> Option<Import> {
        ty.declared().and_then(|hash| self.import(hash))
    }

    fn collect_imports(&self, tree: &Tree, decl: NodeId, out: &mut GeneratedType) {
        let public = !self.binding.is_private();

        // Declared surface: the header of a public type, the implementation
        // file otherwise.
        let (includes, forwards) = if public {
            (&mut out.header_includes, &mut out.header_forward_declarations)
        } else {
            (&mut out.implementation_includes, &mut out.implementation_forward_declarations)
        };
        includes.extend(self.binding.supertypes().filter_map(|hash| self.import(hash)));
        for field in &self.fields {
            if !field.var.is_static() || self.is_exported(field.var) || !public {
                forwards.extend(self.type_import(&field.var.ty));
            }
        }
        for method in &self.methods {
            forwards.extend(self.type_import(&method.method.return_type));
            for param in &method.params {
                forwards.extend(self.type_import(&param.ty));
            }
        }
        for field in self.statics().filter(|field| public && !self.is_exported(field.var)) {
            out.implementation_forward_declarations
                .extend(self.type_import(&field.var.ty));
        }

        for node in tree.descendants(decl) {
            let Some(kind) = tree.kind(node) else {
                continue;
            };
            match kind {
                NodeKind::LocalVariable { var, .. } => {
                    if let Some(var) = self.env().variable(*var) {
                        out.implementation_forward_declarations
                            .extend(self.type_import(&var.ty));
                    }
                }
                NodeKind::FunctionInvocation { function, .. } => {
                    out.implementation_includes
                        .extend(self.import(function.declaring_type));
                    out.implementation_forward_declarations
                        .extend(self.type_import(&function.return_type));
                    for param in &function.params {
                        out.implementation_forward_declarations
                            .extend(self.type_import(param));
                    }
                }
                NodeKind::MethodInvocation { method, .. } => {
                    out.implementation_includes
                        .extend(self.import(method.declaring_type));
                    out.implementation_forward_declarations
                        .extend(self.type_import(&method.return_type));
                }
                NodeKind::SimpleName {
                    binding: Some(Binding::Type(hash)),
                    ..
                } => {
                    out.implementation_includes.extend(self.import(*hash));
                }
                NodeKind::SimpleName {
                    binding: Some(Binding::Variable(var)),
                    ..
                } => {
                    let Some(var) = self.env().variable(*var) else {
                        continue;
                    };
                    if var.is_field() && var.is_static() {
                        if let Some(owner) = var.declaring_type {
                            out.implementation_includes.extend(self.import(owner));
                        }
                    }
                }
                _ => {}
            }
        }
    }
}
