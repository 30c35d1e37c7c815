use std::fmt;

/// Qualified name of a declared type: its package plus the chain of
/// enclosing type names ending in the type's own simple name.
///
/// # Examples
///
/// ```
/// use objlower_core::QualifiedName;
///
/// let bar = QualifiedName::new(vec!["com".into(), "foo".into()], "Bar");
/// assert_eq!(bar.to_string(), "com.foo.Bar");
/// assert_eq!(bar.full_name(), "ComFooBar");
///
/// let inner = bar.nested("Inner");
/// assert_eq!(inner.full_name(), "ComFooBar_Inner");
/// assert_eq!(inner.default_header(), "com/foo/Bar.h");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Package segments (e.g., ["com", "foo"]). Empty for the default package.
    pub package: Vec<String>,
    /// Enclosing type names followed by the simple name. Never empty.
    pub path: Vec<String>,
}

impl QualifiedName {
    /// Create a top-level type name.
    pub fn new(package: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            package,
            path: vec![name.into()],
        }
    }

    /// Create a top-level type in the default package.
    pub fn global(name: impl Into<String>) -> Self {
        Self::new(Vec::new(), name)
    }

    /// Create from a dotted string (e.g., "com.foo.Bar").
    ///
    /// The last segment is the type name, the rest is the package. Nested
    /// types cannot be expressed this way; use [`QualifiedName::nested`].
    pub fn from_dotted(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split('.')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let name = parts.pop().unwrap_or_default();
        Self::new(parts, name)
    }

    /// Name of a type nested directly inside this one.
    pub fn nested(&self, name: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(name.into());
        Self {
            package: self.package.clone(),
            path,
        }
    }

    /// The simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    /// Whether this type is nested inside another type.
    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    /// The outermost enclosing type (or `self` for a top-level type).
    pub fn outermost(&self) -> Self {
        Self {
            package: self.package.clone(),
            path: self.path.iter().take(1).cloned().collect(),
        }
    }

    /// Dotted package name.
    pub fn package_name(&self) -> String {
        self.package.join(".")
    }

    /// Package as a relative directory (e.g., "com/foo").
    pub fn package_dir(&self) -> String {
        self.package.join("/")
    }

    /// Target-language name: camel-cased package segments followed by the
    /// type path joined with `_`.
    pub fn full_name(&self) -> String {
        let mut out = camel_case_package(&self.package);
        out.push_str(&self.path.join("_"));
        out
    }

    /// Header that declares this type when no header mapping applies.
    pub fn default_header(&self) -> String {
        let outer = self.path.first().map(String::as_str).unwrap_or("");
        if self.package.is_empty() {
            format!("{outer}.h")
        } else {
            format!("{}/{outer}.h", self.package_dir())
        }
    }
}

/// Camel-case package segments: `["com", "foo"]` -> `"ComFoo"`.
pub fn camel_case_package(package: &[String]) -> String {
    let mut out = String::new();
    for segment in package {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.package {
            write!(f, "{segment}.")?;
        }
        write!(f, "{}", self.path.join("."))
    }
}
