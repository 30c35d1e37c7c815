//! The translation pipeline driver.
//!
//! Inputs are grouped into generation units. Every unit then runs on its
//! own: the rewrite passes over its trees, generation, dependency
//! resolution and emission. Units share nothing mutable, so they are
//! processed in parallel; results are reported in unit order.

use objlower_ast::Tree;
use objlower_core::{
    Diagnostic, Diagnostics, Options, SymbolEnvironment, TranslateError, UnitFailure,
};
use objlower_gen::{
    GenerationUnit, HeaderMap, ImportPolicy, StandardImportPolicy, UnitEmitter, UnitPlan,
    plan_units,
};
use objlower_passes::PassPipeline;
use rayon::prelude::*;

use crate::preprocess;

/// One resolved input file.
#[derive(Debug, Clone)]
pub struct SourceInput {
    /// Path relative to the source root, such as `com/foo/A.java`.
    pub source_name: String,
    pub tree: Tree,
}

impl SourceInput {
    pub fn new(source_name: impl Into<String>, tree: Tree) -> Self {
        Self {
            source_name: source_name.into(),
            tree,
        }
    }
}

/// Text of one generated unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub source_name: String,
    /// Output path without extension.
    pub output_path: String,
    pub header: String,
    pub implementation: String,
}

impl GeneratedOutput {
    pub fn header_path(&self) -> String {
        format!("{}.h", self.output_path)
    }

    pub fn implementation_path(&self) -> String {
        format!("{}.m", self.output_path)
    }
}

/// Result of translating a batch of inputs.
#[derive(Debug, Default)]
pub struct TranslationOutput {
    /// Successfully generated units, in unit order.
    pub outputs: Vec<GeneratedOutput>,
    /// Abandoned units, in unit order.
    pub failures: Vec<UnitFailure>,
    /// Diagnostics of every unit, in unit order.
    pub diagnostics: Diagnostics,
}

impl TranslationOutput {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Output generated into `output_path`.
    pub fn output(&self, output_path: &str) -> Option<&GeneratedOutput> {
        self.outputs
            .iter()
            .find(|output| output.output_path == output_path)
    }
}

/// Result of one unit before merging.
struct UnitResult {
    output: Result<GeneratedOutput, UnitFailure>,
    diagnostics: Diagnostics,
}

/// Drives rewrite passes, generation and emission over a batch of inputs.
///
/// # Examples
///
/// ```
/// use objlower::{Options, SymbolEnvironment, Translator};
///
/// let env = SymbolEnvironment::new();
/// let translator = Translator::new(Options::default(), &env);
/// let output = translator.translate(Vec::new());
/// assert!(output.outputs.is_empty());
/// assert!(output.is_success());
/// ```
pub struct Translator<'env> {
    options: Options,
    env: &'env SymbolEnvironment,
    pipeline: PassPipeline,
    policy: Box<dyn ImportPolicy>,
}

impl<'env> Translator<'env> {
    /// Translator running the standard passes.
    pub fn new(options: Options, env: &'env SymbolEnvironment) -> Self {
        Self {
            options,
            env,
            pipeline: PassPipeline::standard(),
            policy: Box::new(StandardImportPolicy::new()),
        }
    }

    /// Replace the rewrite passes.
    pub fn with_pipeline(mut self, pipeline: PassPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_import_policy(mut self, policy: impl ImportPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn pipeline(&self) -> &PassPipeline {
        &self.pipeline
    }

    /// Translate every input. A failing unit is reported in
    /// [`TranslationOutput::failures`] and never stops the others.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn translate(&self, inputs: Vec<SourceInput>) -> TranslationOutput {
        let names: Vec<&str> = inputs.iter().map(|input| input.source_name.as_str()).collect();
        let plans = plan_units(&names, self.options.unit_grouping);
        let headers = preprocess::header_map(&inputs, &plans, self.env, &self.options);

        let mut slots: Vec<Option<SourceInput>> = inputs.into_iter().map(Some).collect();
        let units: Vec<(UnitPlan, Vec<SourceInput>)> = plans
            .into_iter()
            .map(|plan| {
                let members = plan
                    .members
                    .iter()
                    .filter_map(|&index| slots.get_mut(index).and_then(Option::take))
                    .collect();
                (plan, members)
            })
            .collect();

        let results: Vec<UnitResult> = units
            .into_par_iter()
            .map(|(plan, members)| self.translate_unit(&plan, members, &headers))
            .collect();

        let mut output = TranslationOutput::default();
        for result in results {
            output.diagnostics.extend(result.diagnostics);
            match result.output {
                Ok(generated) => output.outputs.push(generated),
                Err(failure) => output.failures.push(failure),
            }
        }
        output
    }

    fn translate_unit(
        &self,
        plan: &UnitPlan,
        mut members: Vec<SourceInput>,
        headers: &HeaderMap,
    ) -> UnitResult {
        #[cfg(feature = "profiling")]
        profiling::scope!("translate_unit", plan.source_name.as_str());

        let mut diagnostics = Diagnostics::new();
        let mut errors: Vec<TranslateError> = Vec::new();
        let mut rewrites = 0;

        for input in &mut members {
            match self.pipeline.run(&mut input.tree, self.env) {
                Ok(runs) => rewrites += runs.iter().map(|run| run.rewrites).sum::<usize>(),
                Err(err) => {
                    diagnostics.add_diagnostic(
                        Diagnostic::error(err.to_string())
                            .with_source(input.source_name.as_str())
                            .with_span(err.span()),
                    );
                    errors.push(err.into());
                }
            }
        }
        if !errors.is_empty() {
            return self.abandon(plan, errors, diagnostics);
        }
        diagnostics.add_diagnostic(
            Diagnostic::info(format!(
                "ran passes [{}]: {rewrites} rewrite(s)",
                self.pipeline.names().join(", ")
            ))
            .with_source(plan.source_name.as_str()),
        );

        let trees: Vec<&Tree> = members.iter().map(|input| &input.tree).collect();
        let unit = match GenerationUnit::build(plan, &trees, self.env, &self.options, headers) {
            Ok(unit) => unit,
            Err(err) => {
                diagnostics.add_diagnostic(
                    Diagnostic::error(err.to_string())
                        .with_source(plan.source_name.as_str())
                        .with_span(err.span()),
                );
                return self.abandon(plan, vec![err.into()], diagnostics);
            }
        };
        if !unit.strings.is_empty() {
            diagnostics.add_diagnostic(
                Diagnostic::info(format!("pooled {} string constant(s)", unit.strings.len()))
                    .with_source(plan.source_name.as_str()),
            );
        }

        let emitted = UnitEmitter::new(&unit, &self.options, self.policy.as_ref()).emit();
        for header in &emitted.unimportable {
            diagnostics.add_diagnostic(
                Diagnostic::warning(format!("cannot import \"{header}\"; include omitted"))
                    .with_source(plan.source_name.as_str()),
            );
        }

        UnitResult {
            output: Ok(GeneratedOutput {
                source_name: unit.source_name,
                output_path: unit.output_path,
                header: emitted.header,
                implementation: emitted.implementation,
            }),
            diagnostics,
        }
    }

    fn abandon(
        &self,
        plan: &UnitPlan,
        errors: Vec<TranslateError>,
        diagnostics: Diagnostics,
    ) -> UnitResult {
        UnitResult {
            output: Err(UnitFailure {
                unit: plan.source_name.clone(),
                errors,
            }),
            diagnostics,
        }
    }
}
