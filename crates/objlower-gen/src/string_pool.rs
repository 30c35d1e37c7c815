//! Per-unit pool of string literals.
//!
//! Every distinct literal in a unit gets one slot, named `_string_<id>`.
//! Ids follow the order of first appearance in a pre-order walk of the
//! unit's trees, so the pool is identical across runs.

use objlower_ast::{Literal, NodeKind, StringConstants, Tree, string_literal};
use rustc_hash::FxHashMap;

/// Unit-scope string constants with deduplication.
#[derive(Debug, Clone, Default)]
pub struct StringPool {
    /// Literals by id.
    strings: Vec<String>,
    /// Deduplication index: maps literal to its id.
    index: FxHashMap<String, u32>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool every string literal reachable from the roots of `trees`.
    pub fn collect<'t>(trees: impl IntoIterator<Item = &'t Tree>) -> Self {
        let mut pool = Self::new();
        for tree in trees {
            let Some(root) = tree.root() else {
                continue;
            };
            for node in tree.descendants(root) {
                if let Some(NodeKind::Literal(Literal::String(value))) = tree.kind(node) {
                    pool.add(value);
                }
            }
        }
        pool
    }

    /// Add or get an existing literal, returning its id.
    pub fn add(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.index.get(value) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(value.to_string());
        self.index.insert(value.to_string(), id);
        id
    }

    pub fn id(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.strings.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Literals in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(id, value)| (id as u32, value.as_str()))
    }

    /// Name of the slot for `id`.
    pub fn slot_name(id: u32) -> String {
        format!("_string_{id}")
    }

    /// Slot declarations and the run-once initializer. Empty for an empty
    /// pool.
    pub fn declarations(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n");
        for (id, _) in self.iter() {
            out.push_str(&format!("static NSString *{};\n", Self::slot_name(id)));
        }
        out.push_str("\n__attribute__((constructor)) static void initialize_string_constants() {\n");
        for (id, value) in self.iter() {
            out.push_str(&format!(
                "  {} = JreStringConstant({});\n",
                Self::slot_name(id),
                string_literal(value)
            ));
        }
        out.push_str("}\n");
        out
    }
}

impl StringConstants for StringPool {
    fn constant_name(&self, literal: &str) -> Option<String> {
        self.id(literal).map(Self::slot_name)
    }
}
