//! Performance benchmarks for the translation pipeline.
//!
//! Workloads are synthetic programs: every type has a few static fields,
//! reads a static of the previous type in its initializer and uses string
//! literals in a method body, so every stage has work to do.
//!
//! - Scaling: number of inputs translated in one batch
//! - Grouping: per-file against per-directory units
//! - Passes: the static-access rewrite alone on one large tree
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

#![allow(clippy::collapsible_if)]

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use objlower::{
    Options, PassPipeline, PrimitiveKind, QualifiedName, SourceInput, Span, SymbolEnvironment,
    Translator, Tree, TypeBinding, TypeHash, TypeRef, UnitGrouping, VarId, VariableBinding,
};
use objlower_ast::{AssignOp, Literal};
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

/// Initialize puffin profiler.
#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Recursively collect all scopes (including nested ones)
#[cfg(feature = "profile-with-puffin")]
fn collect_scopes_recursive(
    stream: &puffin::Stream,
    scope: &puffin::Scope,
    scope_collection: &puffin::ScopeCollection,
    scope_timings: &mut HashMap<String, i64>,
) {
    use puffin::Reader;

    if let Some(details) = scope_collection.fetch_by_id(&scope.id) {
        let name = details.name().to_string();
        *scope_timings.entry(name).or_insert(0) += scope.record.duration_ns;
    }

    if scope.child_begin_position < scope.child_end_position {
        if let Ok(reader) = Reader::with_offset(stream, scope.child_begin_position) {
            if let Ok(children) = reader.read_top_scopes() {
                for child in children {
                    collect_scopes_recursive(stream, &child, scope_collection, scope_timings);
                }
            }
        }
    }
}

/// Print accumulated profiling statistics for all scopes.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };

    let view = frame_view.lock();
    let scope_collection = view.scope_collection();

    let mut scope_timings: HashMap<String, i64> = HashMap::new();
    let mut frame_count = 0i64;

    for frame in view.recent_frames() {
        frame_count += 1;
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_thread_info, stream_info) in unpacked.thread_streams.iter() {
            let reader = Reader::from_start(&stream_info.stream);
            if let Ok(scopes) = reader.read_top_scopes() {
                for scope in scopes {
                    collect_scopes_recursive(
                        &stream_info.stream,
                        &scope,
                        scope_collection,
                        &mut scope_timings,
                    );
                }
            }
        }
    }

    println!("\n=== Profiling Summary ({} frames) ===", frame_count);
    if scope_timings.is_empty() {
        println!("  No scopes recorded.");
    } else {
        let mut entries: Vec<_> = scope_timings.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        let total_ns: i64 = entries.iter().map(|(_, ns)| **ns).sum();

        for (name, ns) in &entries {
            let ns = **ns;
            let avg_ns = if frame_count > 0 { ns / frame_count } else { ns };
            let pct = if total_ns > 0 {
                ns as f64 / total_ns as f64 * 100.0
            } else {
                0.0
            };
            println!(
                "  {:30} {:>10.2?} avg ({:>5.1}%)",
                name,
                std::time::Duration::from_nanos(avg_ns as u64),
                pct
            );
        }
    }
    println!("=====================================\n");
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

// =============================================================================
// Workloads
// =============================================================================

const FIELDS_PER_TYPE: usize = 4;

/// A synthetic program of `types` classes spread over `packages` packages.
struct Program {
    env: SymbolEnvironment,
    types: Vec<(String, TypeHash, Vec<VarId>)>,
    text: VarId,
}

impl Program {
    fn new(packages: usize, types: usize) -> Self {
        let mut env = SymbolEnvironment::new();
        let text = env
            .add_variable(VariableBinding::local("text", TypeRef::Id))
            .unwrap();
        let mut declared = Vec::with_capacity(types);
        for i in 0..types {
            let package = format!("bench.p{}", i % packages.max(1));
            let name = QualifiedName::from_dotted(&format!("{package}.T{i}"));
            let hash = env.register_type(TypeBinding::class(name)).unwrap();
            let fields = (0..FIELDS_PER_TYPE)
                .map(|f| {
                    let ty = if f % 2 == 0 {
                        TypeRef::Primitive(PrimitiveKind::Int)
                    } else {
                        TypeRef::Id
                    };
                    env.add_variable(VariableBinding::field(hash, format!("f{f}"), ty).with_static())
                        .unwrap()
                })
                .collect();
            let source = format!("{}/T{i}.java", package.replace('.', "/"));
            declared.push((source, hash, fields));
        }
        Self {
            env,
            types: declared,
            text,
        }
    }

    /// Declaration of type `index`, reading a static of the previous type.
    fn type_decl(&self, tree: &mut Tree, index: usize) -> objlower::NodeId {
        let (_, hash, fields) = &self.types[index];
        let previous = &self.types[index.saturating_sub(1)];

        let mut members = Vec::new();
        for (f, &var) in fields.iter().enumerate() {
            let init = if f == 0 {
                let qualifier = tree.type_name("Prev", previous.1, Span::default());
                let name = tree.variable_name("f0", previous.2[0], Span::default());
                Some(tree.qualified_name(qualifier, name))
            } else {
                None
            };
            members.push(tree.field_decl(var, init, Span::default()));
        }

        let statements = (0..8)
            .map(|s| {
                let target = tree.variable_name("text", self.text, Span::default());
                let value = tree.literal(Literal::String(format!("s{}", s % 3)), Span::default());
                let assign = tree.assignment(AssignOp::Assign, target, value);
                tree.expression_statement(assign)
            })
            .collect();
        let body = tree.block(statements);
        let method = tree.method_decl(
            objlower::MethodRef {
                name: "run".to_string(),
                declaring_type: *hash,
                return_type: TypeRef::Primitive(PrimitiveKind::Void),
                is_static: false,
            },
            Vec::new(),
            Some(body),
            Span::default(),
        );
        members.push(method);
        tree.type_decl(*hash, members, Span::default())
    }

    /// One input per type.
    fn inputs(&self) -> Vec<SourceInput> {
        (0..self.types.len())
            .map(|i| {
                let mut tree = Tree::new();
                let decl = self.type_decl(&mut tree, i);
                let source = self.types[i].0.clone();
                tree.compilation_unit(source.as_str(), vec![decl], Vec::new());
                SourceInput::new(source, tree)
            })
            .collect()
    }

    /// Every type in one tree.
    fn single_tree(&self) -> Tree {
        let mut tree = Tree::new();
        let decls = (0..self.types.len())
            .map(|i| self.type_decl(&mut tree, i))
            .collect();
        tree.compilation_unit("bench/All.java", decls, Vec::new());
        tree
    }
}

// =============================================================================
// Benchmarks
// =============================================================================

/// Translate batches of increasing size.
fn scaling_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("translate/inputs");
    for count in [1usize, 16, 128] {
        let program = Program::new(4, count);
        let inputs = program.inputs();
        let translator = Translator::new(Options::default(), &program.env);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("inputs_{count}"), |b| {
            b.iter_batched(
                || inputs.clone(),
                |inputs| {
                    let output = translator.translate(black_box(inputs));
                    end_profiling_frame();
                    black_box(output.outputs.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();

    print_profiling_stats();
}

/// The same program generated per file and per directory.
fn grouping_benchmarks(c: &mut Criterion) {
    let program = Program::new(8, 64);
    let inputs = program.inputs();

    let mut group = c.benchmark_group("translate/grouping");
    for (label, grouping) in [
        ("per_file", UnitGrouping::PerFile),
        ("per_directory", UnitGrouping::PerDirectory),
    ] {
        let options = Options::default().with_unit_grouping(grouping);
        let translator = Translator::new(options, &program.env);
        group.bench_function(label, |b| {
            b.iter_batched(
                || inputs.clone(),
                |inputs| black_box(translator.translate(inputs).outputs.len()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// The rewrite passes on one large tree.
fn pass_benchmarks(c: &mut Criterion) {
    let program = Program::new(1, 256);
    let tree = program.single_tree();
    let pipeline = PassPipeline::standard();

    let mut group = c.benchmark_group("passes");
    group.throughput(Throughput::Elements(tree.len() as u64));
    group.bench_function("static_access_256_types", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                let runs = pipeline.run(&mut tree, &program.env).unwrap();
                black_box(runs[0].rewrites)
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, scaling_benchmarks, grouping_benchmarks, pass_benchmarks);

criterion_main!(benches);
