//! Target-language names for synthesized symbols.
//!
//! Static fields are stored in unit-scope variables named
//! `<Type>_<field>` and accessed through free functions named
//! `<Type>_get_<field>`, `<Type>_getRef_<field>` and `<Type>_set_<field>`.

/// Identifiers that cannot be used verbatim in generated code.
const RESERVED_WORDS: &[&str] = &[
    // C
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
    // Objective-C
    "id", "self", "super", "nil", "Nil", "YES", "NO", "SEL", "BOOL", "Class", "IMP", "in",
    "out", "inout", "bycopy", "byref", "oneway", "atomic", "nonatomic", "retain", "strong",
    "weak", "readonly", "readwrite",
    // Common macros and runtime names
    "NULL", "TRUE", "FALSE", "EOF", "errno", "assert", "signal", "sleep", "stdin", "stdout",
    "stderr", "printf",
];

/// Whether `name` collides with a reserved word of the target language.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// A source identifier, with a trailing `_` when it collides with a
/// reserved word.
pub fn identifier(name: &str) -> String {
    if is_reserved(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Mangled name of a static variable.
pub fn static_var_name(name: &str) -> String {
    identifier(name)
}

/// Instance variable backing a field.
pub fn ivar_name(name: &str) -> String {
    format!("{name}_")
}

/// Name of the storage slot of a static field.
pub fn static_storage_name(type_name: &str, var: &str) -> String {
    format!("{type_name}_{}", static_var_name(var))
}

/// By-value getter of a static field.
pub fn getter_name(type_name: &str, var: &str) -> String {
    format!("{type_name}_get_{}", static_var_name(var))
}

/// Getter returning a writable reference to the static storage.
pub fn ref_getter_name(type_name: &str, var: &str) -> String {
    format!("{type_name}_getRef_{}", static_var_name(var))
}

pub fn setter_name(type_name: &str, var: &str) -> String {
    format!("{type_name}_set_{}", static_var_name(var))
}

/// One-time initializer of a type's static state.
pub fn initialize_name(type_name: &str) -> String {
    format!("{type_name}_initialize")
}

pub fn clinit_name(type_name: &str) -> String {
    format!("{type_name}_clinit")
}
