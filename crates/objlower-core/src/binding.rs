//! Resolved semantic facts about symbols.
//!
//! Bindings are produced by the front end and are immutable for the whole
//! translation. AST nodes refer to them by [`VarId`] or [`TypeHash`]; the
//! owning storage is the [`SymbolEnvironment`](crate::SymbolEnvironment).

use std::fmt;

use bitflags::bitflags;

use crate::{QualifiedName, TypeHash};

bitflags! {
    /// Declaration modifiers relevant to lowering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const STATIC = 1 << 0;
        const FINAL = 1 << 1;
        const ABSTRACT = 1 << 2;
    }
}

/// Access level of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Package => write!(f, "package"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// Primitive type kinds of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Name of the corresponding runtime typedef.
    pub const fn target_name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "jboolean",
            PrimitiveKind::Byte => "jbyte",
            PrimitiveKind::Char => "jchar",
            PrimitiveKind::Short => "jshort",
            PrimitiveKind::Int => "jint",
            PrimitiveKind::Long => "jlong",
            PrimitiveKind::Float => "jfloat",
            PrimitiveKind::Double => "jdouble",
        }
    }
}

/// A declared type as seen by expressions and declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive value type.
    Primitive(PrimitiveKind),
    /// A class, interface or enum known to the environment.
    Declared(TypeHash),
    /// An untyped object reference.
    Id,
    /// A writable reference to storage of the inner type.
    Pointer(Box<TypeRef>),
}

impl TypeRef {
    /// Whether values of this type are primitives.
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Whether values of this type are object references.
    pub fn is_object(&self) -> bool {
        matches!(self, TypeRef::Declared(_) | TypeRef::Id)
    }

    /// Pointer to storage of this type.
    pub fn pointer_to(self) -> TypeRef {
        TypeRef::Pointer(Box::new(self))
    }

    /// The declared type this refers to, looking through pointers.
    pub fn declared(&self) -> Option<TypeHash> {
        match self {
            TypeRef::Declared(hash) => Some(*hash),
            TypeRef::Pointer(inner) => inner.declared(),
            _ => None,
        }
    }
}

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

/// Resolved facts about a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    pub hash: TypeHash,
    pub name: QualifiedName,
    pub kind: TypeKind,
    pub visibility: Visibility,
    pub modifiers: Modifiers,
    pub superclass: Option<TypeHash>,
    pub interfaces: Vec<TypeHash>,
    /// Runtime-provided type this maps onto (e.g., `NSString`), if any.
    pub native_name: Option<String>,
}

impl TypeBinding {
    /// Create a public class binding with no supertypes.
    pub fn class(name: QualifiedName) -> Self {
        Self {
            hash: TypeHash::from_name(&name.to_string()),
            name,
            kind: TypeKind::Class,
            visibility: Visibility::Public,
            modifiers: Modifiers::empty(),
            superclass: None,
            interfaces: Vec::new(),
            native_name: None,
        }
    }

    /// Create a public interface binding.
    pub fn interface(name: QualifiedName) -> Self {
        Self {
            kind: TypeKind::Interface,
            ..Self::class(name)
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_superclass(mut self, superclass: TypeHash) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_native_name(mut self, native: impl Into<String>) -> Self {
        self.native_name = Some(native.into());
        self
    }

    /// Name used for this type in generated code.
    pub fn full_name(&self) -> String {
        match &self.native_name {
            Some(native) => native.clone(),
            None => self.name.full_name(),
        }
    }

    /// Types that are not public are kept out of the declaration file.
    pub fn is_private(&self) -> bool {
        self.visibility != Visibility::Public
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    /// Supertypes in declaration order (superclass first).
    pub fn supertypes(&self) -> impl Iterator<Item = TypeHash> + '_ {
        self.superclass.iter().copied().chain(self.interfaces.iter().copied())
    }
}

/// Index of a variable binding in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Compile-time constant value of a primitive constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Bool(bool),
    Int(i64),
    Char(u16),
    Double(f64),
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Bool(true) => write!(f, "true"),
            ConstantValue::Bool(false) => write!(f, "false"),
            ConstantValue::Int(v) => f.write_str(&int_literal(*v)),
            ConstantValue::Char(c) => write!(f, "0x{c:04x}"),
            ConstantValue::Double(v) => f.write_str(&double_literal(*v)),
        }
    }
}

/// C text for an integer value. Values outside the `jint` range get `LL`.
///
/// ```
/// use objlower_core::int_literal;
///
/// assert_eq!(int_literal(7), "7");
/// assert_eq!(int_literal(10_000_000_000), "10000000000LL");
/// assert_eq!(int_literal(i64::MIN), "(-0x7fffffffffffffffLL - 1)");
/// ```
pub fn int_literal(value: i64) -> String {
    if value == i64::MIN {
        // The positive half of the literal would not fit in a long long.
        "(-0x7fffffffffffffffLL - 1)".to_string()
    } else if i32::try_from(value).is_ok() {
        value.to_string()
    } else {
        format!("{value}LL")
    }
}

/// C text for a double value; non-finite values use the `math.h` macros.
pub fn double_literal(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value == f64::INFINITY {
        "INFINITY".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INFINITY".to_string()
    } else {
        format!("{value:?}")
    }
}

/// What kind of storage a variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Field,
    Local,
    Parameter,
}

/// Resolved facts about a field, local or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    pub name: String,
    pub kind: VariableKind,
    /// Type declaring this field. `None` for locals and parameters.
    pub declaring_type: Option<TypeHash>,
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    pub visibility: Visibility,
    /// Folded value for compile-time constants.
    pub constant: Option<ConstantValue>,
}

impl VariableBinding {
    /// Create a field binding.
    pub fn field(owner: TypeHash, name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Field,
            declaring_type: Some(owner),
            ty,
            modifiers: Modifiers::empty(),
            visibility: Visibility::Public,
            constant: None,
        }
    }

    /// Create a local variable binding.
    pub fn local(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Local,
            declaring_type: None,
            ty,
            modifiers: Modifiers::empty(),
            visibility: Visibility::Private,
            constant: None,
        }
    }

    pub fn with_static(mut self) -> Self {
        self.modifiers |= Modifiers::STATIC;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as a `static final` constant with a folded value.
    pub fn with_constant(mut self, value: ConstantValue) -> Self {
        self.modifiers |= Modifiers::STATIC | Modifiers::FINAL;
        self.constant = Some(value);
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_field(&self) -> bool {
        self.kind == VariableKind::Field
    }

    /// Static final primitive with a folded value; emitted as a define.
    pub fn is_primitive_constant(&self) -> bool {
        self.is_static()
            && self.modifiers.contains(Modifiers::FINAL)
            && self.ty.is_primitive()
            && self.constant.is_some()
    }
}

/// A synthesized free function, such as a static-field accessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionRef {
    pub name: String,
    /// Type whose declaration file declares this function.
    pub declaring_type: TypeHash,
    pub return_type: TypeRef,
    pub params: Vec<TypeRef>,
}

/// A resolved method of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: String,
    pub declaring_type: TypeHash,
    pub return_type: TypeRef,
    pub is_static: bool,
}

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Variable(VarId),
    Type(TypeHash),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> TypeHash {
        TypeHash::from_name("com.example.Owner")
    }

    #[test]
    fn primitive_constant_requires_value() {
        let plain = VariableBinding::field(owner(), "count", TypeRef::Primitive(PrimitiveKind::Int))
            .with_static();
        assert!(plain.is_static());
        assert!(!plain.is_primitive_constant());

        let constant =
            VariableBinding::field(owner(), "MAX", TypeRef::Primitive(PrimitiveKind::Int))
                .with_constant(ConstantValue::Int(5));
        assert!(constant.is_primitive_constant());
    }

    #[test]
    fn object_constant_is_not_primitive_constant() {
        let string = TypeRef::Declared(TypeHash::from_name("java.lang.String"));
        let var = VariableBinding::field(owner(), "NAME", string).with_constant(ConstantValue::Int(0));
        assert!(!var.is_primitive_constant());
    }

    #[test]
    fn type_binding_names() {
        let binding = TypeBinding::class(QualifiedName::from_dotted("com.example.Owner"));
        assert_eq!(binding.hash, owner());
        assert_eq!(binding.full_name(), "ComExampleOwner");
        assert!(!binding.is_private());

        let native = TypeBinding::class(QualifiedName::from_dotted("java.lang.String"))
            .with_native_name("NSString");
        assert_eq!(native.full_name(), "NSString");
    }

    #[test]
    fn pointer_type_keeps_declared() {
        let hash = owner();
        let ptr = TypeRef::Declared(hash).pointer_to();
        assert_eq!(ptr.declared(), Some(hash));
        assert!(!ptr.is_primitive());
        assert!(!ptr.is_object());
    }

    #[test]
    fn constant_display() {
        assert_eq!(ConstantValue::Int(-3).to_string(), "-3");
        assert_eq!(ConstantValue::Bool(true).to_string(), "true");
        assert_eq!(ConstantValue::Char(65).to_string(), "0x0041");
        assert_eq!(ConstantValue::Double(1.5).to_string(), "1.5");
    }

    #[test]
    fn non_finite_doubles_use_math_macros() {
        assert_eq!(ConstantValue::Double(f64::INFINITY).to_string(), "INFINITY");
        assert_eq!(ConstantValue::Double(f64::NEG_INFINITY).to_string(), "-INFINITY");
        assert_eq!(ConstantValue::Double(f64::NAN).to_string(), "NAN");
    }

    #[test]
    fn long_constants() {
        assert_eq!(ConstantValue::Int(10_000_000_000).to_string(), "10000000000LL");
        assert_eq!(ConstantValue::Int(i64::from(i32::MIN)).to_string(), "-2147483648");
        assert_eq!(ConstantValue::Int(i64::MAX).to_string(), "9223372036854775807LL");
        assert_eq!(
            ConstantValue::Int(i64::MIN).to_string(),
            "(-0x7fffffffffffffffLL - 1)"
        );
    }
}
