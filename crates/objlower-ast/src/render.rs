//! Target-language text for expressions, statements and types.
//!
//! The renderer only produces content; layout is limited to two-space
//! indentation of nested statements.

use objlower_core::{
    AstError, Binding, SymbolEnvironment, TypeRef, VariableBinding, VariableKind, double_literal,
    int_literal, mangle,
};

use crate::node::{Literal, NodeId, NodeKind};
use crate::tree::Tree;

/// Lookup of pooled string constants.
pub trait StringConstants {
    /// Name of the unit-scope slot holding `literal`, if it is pooled.
    fn constant_name(&self, literal: &str) -> Option<String>;
}

/// Escape a string for use inside a target-language string literal.
///
/// Non-ASCII characters are written as universal character names, `\uXXXX`
/// inside the BMP and `\UXXXXXXXX` above it. C1 controls may not be named
/// that way and are written as octal escapes of their UTF-8 bytes.
///
/// # Examples
///
/// ```
/// use objlower_ast::escape_string;
///
/// assert_eq!(escape_string("a\"b\n"), "a\\\"b\\n");
/// assert_eq!(escape_string("caf\u{e9}"), "caf\\u00e9");
/// assert_eq!(escape_string("\u{1F600}"), "\\U0001f600");
/// assert_eq!(escape_string("\u{85}"), "\\302\\205");
/// ```
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if c.is_ascii() => out.push_str(&format!("\\{:03o}", c as u32)),
            c if (c as u32) < 0xa0 => {
                let mut bytes = [0u8; 4];
                for byte in c.encode_utf8(&mut bytes).bytes() {
                    out.push_str(&format!("\\{byte:03o}"));
                }
            }
            c if (c as u32) <= 0xffff => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out
}

/// `@"..."` literal for `value`.
pub fn string_literal(value: &str) -> String {
    format!("@\"{}\"", escape_string(value))
}

/// Target-language spelling of a type.
pub fn type_name(ty: &TypeRef, env: &SymbolEnvironment) -> String {
    match ty {
        TypeRef::Primitive(kind) => kind.target_name().to_string(),
        TypeRef::Declared(hash) => match env.get_type(*hash) {
            Some(binding) if binding.is_interface() => format!("id<{}>", binding.full_name()),
            Some(binding) => format!("{} *", binding.full_name()),
            None => "id".to_string(),
        },
        TypeRef::Id => "id".to_string(),
        TypeRef::Pointer(inner) => {
            let inner = type_name(inner, env);
            if inner.ends_with('*') {
                format!("{inner}*")
            } else {
                format!("{inner} *")
            }
        }
    }
}

/// Declaration of `name` with type `ty` (e.g., `jint count`, `NSString *name`).
pub fn declaration(ty: &TypeRef, name: &str, env: &SymbolEnvironment) -> String {
    let ty = type_name(ty, env);
    if ty.ends_with('*') {
        format!("{ty}{name}")
    } else {
        format!("{ty} {name}")
    }
}

/// Name under which a variable is referenced in generated code.
pub fn variable_name(var: &VariableBinding, env: &SymbolEnvironment) -> String {
    match (var.kind, var.declaring_type) {
        (VariableKind::Field, Some(owner)) if var.is_static() => {
            let owner = env.full_name(owner).unwrap_or_default();
            mangle::static_storage_name(&owner, &var.name)
        }
        (VariableKind::Field, _) => mangle::ivar_name(&var.name),
        _ => mangle::identifier(&var.name),
    }
}

/// Renders tree nodes as target-language text.
pub struct Renderer<'a> {
    tree: &'a Tree,
    env: &'a SymbolEnvironment,
    strings: Option<&'a dyn StringConstants>,
}

impl<'a> Renderer<'a> {
    pub fn new(tree: &'a Tree, env: &'a SymbolEnvironment) -> Self {
        Self {
            tree,
            env,
            strings: None,
        }
    }

    /// Render string literals through the given pool.
    pub fn with_strings(mut self, strings: &'a dyn StringConstants) -> Self {
        self.strings = Some(strings);
        self
    }

    fn kind(&self, id: NodeId) -> Result<&'a NodeKind, AstError> {
        let tree: &'a Tree = self.tree;
        tree.node(id).map(|node| &node.kind)
    }

    fn unexpected(&self, id: NodeId, expected: &'static str) -> AstError {
        AstError::UnexpectedNode {
            expected,
            found: self.tree.kind(id).map(NodeKind::name).unwrap_or("nothing"),
            span: self.tree.span(id),
        }
    }

    /// Render an expression.
    pub fn expression(&self, id: NodeId) -> Result<String, AstError> {
        let text = self.expression_inner(id)?;
        if self.tree.has_nil_check(id) {
            Ok(format!("nil_chk({text})"))
        } else {
            Ok(text)
        }
    }

    fn expression_inner(&self, id: NodeId) -> Result<String, AstError> {
        match self.kind(id)? {
            NodeKind::Assignment { op, lhs, rhs } => Ok(format!(
                "{} {} {}",
                self.expression(*lhs)?,
                op,
                self.expression(*rhs)?
            )),
            NodeKind::SimpleName { name, binding } => Ok(self.simple_name(name, binding.as_ref())),
            NodeKind::QualifiedName { qualifier, name } => self.member(*qualifier, *name, "."),
            NodeKind::FieldAccess { expr, name } => self.member(*expr, *name, "->"),
            NodeKind::MethodInvocation {
                method,
                receiver,
                args,
            } => {
                let receiver = match receiver {
                    Some(receiver) => self.expression(*receiver)?,
                    None if method.is_static => self
                        .env
                        .full_name(method.declaring_type)
                        .unwrap_or_else(|| "nil".to_string()),
                    None => "self".to_string(),
                };
                let args = args
                    .iter()
                    .map(|arg| self.expression(*arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("[{receiver} {}]", selector(&method.name, &args)))
            }
            NodeKind::FunctionInvocation { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.expression(*arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}({})", function.name, args.join(", ")))
            }
            NodeKind::Prefix { op, operand } => {
                let inner = self.operand(*operand)?;
                Ok(format!("{op}{inner}"))
            }
            NodeKind::Postfix { op, operand } => {
                let inner = self.operand(*operand)?;
                Ok(format!("{inner}{op}"))
            }
            NodeKind::Infix { op, lhs, rhs } => {
                let mut left = self.expression(*lhs)?;
                if let NodeKind::Infix { op: inner, .. } = self.kind(*lhs)? {
                    if inner.precedence() < op.precedence() {
                        left = format!("({left})");
                    }
                } else if matches!(self.kind(*lhs)?, NodeKind::Assignment { .. }) {
                    left = format!("({left})");
                }
                let mut right = self.expression(*rhs)?;
                if let NodeKind::Infix { op: inner, .. } = self.kind(*rhs)? {
                    if inner.precedence() <= op.precedence() {
                        right = format!("({right})");
                    }
                } else if matches!(self.kind(*rhs)?, NodeKind::Assignment { .. }) {
                    right = format!("({right})");
                }
                Ok(format!("{left} {op} {right}"))
            }
            NodeKind::Literal(literal) => Ok(self.literal(literal)),
            NodeKind::Parenthesized { expr } => Ok(format!("({})", self.expression(*expr)?)),
            NodeKind::This => Ok("self".to_string()),
            _ => Err(self.unexpected(id, "expression")),
        }
    }

    /// Operand of a unary operator; compound operands are parenthesized.
    fn operand(&self, id: NodeId) -> Result<String, AstError> {
        let text = self.expression(id)?;
        match self.kind(id)? {
            NodeKind::Infix { .. }
            | NodeKind::Assignment { .. }
            | NodeKind::Prefix { .. }
            | NodeKind::Postfix { .. } => Ok(format!("({text})")),
            _ => Ok(text),
        }
    }

    fn simple_name(&self, name: &str, binding: Option<&Binding>) -> String {
        match binding {
            Some(Binding::Variable(var)) => match self.env.variable(*var) {
                Some(var) => variable_name(var, self.env),
                None => name.to_string(),
            },
            Some(Binding::Type(hash)) => self
                .env
                .full_name(*hash)
                .unwrap_or_else(|| name.to_string()),
            None => name.to_string(),
        }
    }

    /// `qualifier.name` or `expr->name`. Static fields and types render by
    /// their global name alone.
    fn member(&self, base: NodeId, name: NodeId, separator: &str) -> Result<String, AstError> {
        let NodeKind::SimpleName {
            name: text,
            binding,
        } = self.kind(name)?
        else {
            return Err(self.unexpected(name, "SimpleName"));
        };

        match binding {
            Some(Binding::Variable(var)) => match self.env.variable(*var) {
                Some(var) if var.is_static() => Ok(variable_name(var, self.env)),
                Some(var) => Ok(format!(
                    "{}->{}",
                    self.expression(base)?,
                    variable_name(var, self.env)
                )),
                None => Ok(format!("{}{separator}{text}", self.expression(base)?)),
            },
            Some(binding @ Binding::Type(_)) => Ok(self.simple_name(text, Some(binding))),
            None => Ok(format!("{}{separator}{text}", self.expression(base)?)),
        }
    }

    fn literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Int(value) => int_literal(*value),
            Literal::Double(value) => double_literal(value.into_inner()),
            Literal::Bool(value) => value.to_string(),
            Literal::Char(value) => match char::from_u32(u32::from(*value)) {
                Some('\'') => "'\\''".to_string(),
                Some('\\') => "'\\\\'".to_string(),
                Some(c) if c.is_ascii_graphic() || c == ' ' => format!("'{c}'"),
                _ => format!("0x{value:04x}"),
            },
            Literal::String(value) => self
                .strings
                .and_then(|pool| pool.constant_name(value))
                .unwrap_or_else(|| string_literal(value)),
            Literal::Null => "nil".to_string(),
        }
    }

    /// Render a statement as indented lines.
    pub fn statement(&self, id: NodeId, indent: usize) -> Result<String, AstError> {
        let pad = "  ".repeat(indent);
        match self.kind(id)? {
            NodeKind::Block { statements } => {
                let mut out = format!("{pad}{{\n");
                for statement in statements {
                    out.push_str(&self.statement(*statement, indent + 1)?);
                }
                out.push_str(&format!("{pad}}}\n"));
                Ok(out)
            }
            NodeKind::ExpressionStatement { expr } => {
                Ok(format!("{pad}{};\n", self.expression(*expr)?))
            }
            NodeKind::LocalVariable { var, initializer } => {
                let binding = self
                    .env
                    .variable(*var)
                    .ok_or_else(|| self.unexpected(id, "bound local variable"))?;
                let decl = declaration(&binding.ty, &mangle::identifier(&binding.name), self.env);
                match initializer {
                    Some(init) => Ok(format!("{pad}{decl} = {};\n", self.expression(*init)?)),
                    None => Ok(format!("{pad}{decl};\n")),
                }
            }
            NodeKind::Return { expr: Some(expr) } => {
                Ok(format!("{pad}return {};\n", self.expression(*expr)?))
            }
            NodeKind::Return { expr: None } => Ok(format!("{pad}return;\n")),
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut out = format!("{pad}if ({}) {{\n", self.expression(*condition)?);
                out.push_str(&self.branch(*then_branch, indent + 1)?);
                if let Some(else_branch) = else_branch {
                    out.push_str(&format!("{pad}}}\n{pad}else {{\n"));
                    out.push_str(&self.branch(*else_branch, indent + 1)?);
                }
                out.push_str(&format!("{pad}}}\n"));
                Ok(out)
            }
            NodeKind::Switch { expr, statements } => {
                let mut out = format!("{pad}switch ({}) {{\n", self.expression(*expr)?);
                for statement in statements {
                    let depth = if matches!(self.kind(*statement)?, NodeKind::SwitchCase { .. }) {
                        indent + 1
                    } else {
                        indent + 2
                    };
                    out.push_str(&self.statement(*statement, depth)?);
                }
                out.push_str(&format!("{pad}}}\n"));
                Ok(out)
            }
            NodeKind::SwitchCase { expr: Some(expr) } => {
                Ok(format!("{pad}case {}:\n", self.expression(*expr)?))
            }
            NodeKind::SwitchCase { expr: None } => Ok(format!("{pad}default:\n")),
            NodeKind::Break => Ok(format!("{pad}break;\n")),
            _ => Err(self.unexpected(id, "statement")),
        }
    }

    /// Statements of a branch, without the surrounding braces.
    fn branch(&self, id: NodeId, indent: usize) -> Result<String, AstError> {
        match self.kind(id)? {
            NodeKind::Block { statements } => {
                let mut out = String::new();
                for statement in statements {
                    out.push_str(&self.statement(*statement, indent)?);
                }
                Ok(out)
            }
            _ => self.statement(id, indent),
        }
    }
}

/// Interleave selector parts with arguments: `add:with:` and `[a, b]`
/// give `add:a with:b`.
fn selector(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        return name.trim_end_matches(':').to_string();
    }
    let parts: Vec<&str> = name.split(':').filter(|p| !p.is_empty()).collect();
    let mut out = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        let part = parts.get(i).copied().unwrap_or("");
        out.push(format!("{part}:{arg}"));
    }
    out.join(" ")
}
