//! Rewrite passes and the ordered pipeline that runs them.
//!
//! Passes are stateless between runs: everything a pass learns about one
//! tree lives in the visitor it creates for that run. This lets one
//! [`PassPipeline`] be shared by every worker translating units in
//! parallel.

use objlower_ast::Tree;
use objlower_core::{PassError, SymbolEnvironment};

use crate::static_access::StaticAccessPass;

/// A whole-tree rewrite.
pub trait Pass: Send + Sync {
    /// Stable name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Rewrite `tree` in place, returning the number of rewrites made.
    fn run(&self, tree: &mut Tree, env: &SymbolEnvironment) -> Result<usize, PassError>;
}

/// Result of one pass over one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassRun {
    pub pass: &'static str,
    pub rewrites: usize,
}

/// Passes in the order they run.
#[derive(Default)]
pub struct PassPipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl PassPipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default pass sequence.
    pub fn standard() -> Self {
        Self::new().with_pass(StaticAccessPass)
    }

    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.push(pass);
        self
    }

    pub fn push(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass over `tree`, strictly in order. The first failure
    /// stops the pipeline.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(&self, tree: &mut Tree, env: &SymbolEnvironment) -> Result<Vec<PassRun>, PassError> {
        let mut runs = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let rewrites = pass.run(tree, env)?;
            runs.push(PassRun {
                pass: pass.name(),
                rewrites,
            });
        }
        Ok(runs)
    }
}

impl std::fmt::Debug for PassPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objlower_core::Span;
    use std::sync::Mutex;

    struct Named {
        name: &'static str,
        log: &'static Mutex<Vec<&'static str>>,
    }

    impl Pass for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn run(&self, _tree: &mut Tree, _env: &SymbolEnvironment) -> Result<usize, PassError> {
            self.log.lock().unwrap().push(self.name);
            Ok(1)
        }
    }

    struct Failing;

    impl Pass for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run(&self, _tree: &mut Tree, _env: &SymbolEnvironment) -> Result<usize, PassError> {
            Err(PassError::Failed {
                pass: "failing",
                message: "boom".into(),
                span: Span::point(1, 1),
            })
        }
    }

    #[test]
    fn standard_pipeline_contains_static_access() {
        assert_eq!(PassPipeline::standard().names(), vec!["static-access"]);
    }

    #[test]
    fn passes_run_in_order() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
        let pipeline = PassPipeline::new()
            .with_pass(Named {
                name: "first",
                log: &LOG,
            })
            .with_pass(Named {
                name: "second",
                log: &LOG,
            });

        let runs = pipeline
            .run(&mut Tree::new(), &SymbolEnvironment::new())
            .unwrap();
        assert_eq!(*LOG.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].pass, "second");
    }

    #[test]
    fn failure_stops_pipeline() {
        static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
        let pipeline = PassPipeline::new().with_pass(Failing).with_pass(Named {
            name: "after",
            log: &LOG,
        });
        let err = pipeline
            .run(&mut Tree::new(), &SymbolEnvironment::new())
            .unwrap_err();
        assert_eq!(err.span(), Span::point(1, 1));
        assert!(LOG.lock().unwrap().is_empty());
    }
}
