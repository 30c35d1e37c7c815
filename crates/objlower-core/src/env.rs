//! SymbolEnvironment - resolved bindings handed over by the front end.
//!
//! # Thread Safety
//!
//! The environment is populated single-threaded while bindings are resolved.
//! After that it is only ever read, and the translator shares it by `&`
//! reference across the worker threads that process generation units.

use rustc_hash::FxHashMap;

use crate::{QualifiedName, RegistrationError, TypeBinding, TypeHash, VarId, VariableBinding};

/// Storage for all type and variable bindings of a program.
#[derive(Debug, Default)]
pub struct SymbolEnvironment {
    types: FxHashMap<TypeHash, TypeBinding>,
    variables: Vec<VariableBinding>,
}

impl SymbolEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type binding.
    pub fn register_type(&mut self, binding: TypeBinding) -> Result<TypeHash, RegistrationError> {
        let hash = binding.hash;
        if self.types.contains_key(&hash) {
            return Err(RegistrationError::DuplicateType(binding.name.to_string()));
        }
        self.types.insert(hash, binding);
        Ok(hash)
    }

    /// Register a variable binding, returning its id.
    ///
    /// Fields must name a registered declaring type.
    pub fn add_variable(&mut self, binding: VariableBinding) -> Result<VarId, RegistrationError> {
        if let Some(owner) = binding.declaring_type {
            if !self.types.contains_key(&owner) {
                return Err(RegistrationError::UnknownDeclaringType {
                    variable: binding.name,
                    owner,
                });
            }
        }
        let id = VarId(self.variables.len() as u32);
        self.variables.push(binding);
        Ok(id)
    }

    pub fn get_type(&self, hash: TypeHash) -> Option<&TypeBinding> {
        self.types.get(&hash)
    }

    pub fn type_by_name(&self, name: &QualifiedName) -> Option<&TypeBinding> {
        self.types.get(&TypeHash::from_name(&name.to_string()))
    }

    pub fn variable(&self, id: VarId) -> Option<&VariableBinding> {
        self.variables.get(id.index())
    }

    /// Target-language name of a type, if it is known.
    pub fn full_name(&self, hash: TypeHash) -> Option<String> {
        self.get_type(hash).map(TypeBinding::full_name)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrimitiveKind, TypeRef};

    #[test]
    fn register_and_lookup() {
        let mut env = SymbolEnvironment::new();
        let name = QualifiedName::from_dotted("com.example.A");
        let hash = env.register_type(TypeBinding::class(name.clone())).unwrap();

        assert_eq!(env.type_by_name(&name).map(|t| t.hash), Some(hash));
        assert_eq!(env.full_name(hash).as_deref(), Some("ComExampleA"));

        let var = env
            .add_variable(VariableBinding::field(hash, "count", TypeRef::Primitive(PrimitiveKind::Int)))
            .unwrap();
        assert_eq!(env.variable(var).map(|v| v.name.as_str()), Some("count"));
        assert_eq!(env.variable_count(), 1);
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut env = SymbolEnvironment::new();
        let name = QualifiedName::from_dotted("com.example.A");
        env.register_type(TypeBinding::class(name.clone())).unwrap();
        let err = env.register_type(TypeBinding::class(name)).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateType("com.example.A".into()));
    }

    #[test]
    fn field_requires_known_owner() {
        let mut env = SymbolEnvironment::new();
        let ghost = TypeHash::from_name("Ghost");
        let result = env.add_variable(VariableBinding::field(
            ghost,
            "x",
            TypeRef::Primitive(PrimitiveKind::Int),
        ));
        assert!(matches!(result, Err(RegistrationError::UnknownDeclaringType { .. })));
    }

    #[test]
    fn locals_need_no_owner() {
        let mut env = SymbolEnvironment::new();
        let id = env
            .add_variable(VariableBinding::local("i", TypeRef::Primitive(PrimitiveKind::Int)))
            .unwrap();
        assert_eq!(id, VarId(0));
    }
}
