//! Translation options.
//!
//! Loading options from files or command lines is left to the embedding
//! tool; this module only defines the values the pipeline consumes.

/// Memory-management model of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryManagement {
    /// Garbage collected; no build-time assertion is emitted.
    Gc,
    /// Automatic reference counting; implementation files assert ARC is on.
    Arc,
    /// Manual reference counting; implementation files assert ARC is off.
    #[default]
    Manual,
}

/// How declaration headers of translated types are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderMapping {
    /// Headers follow the package directory of the outermost type.
    #[default]
    Off,
    /// Headers follow the input file's location.
    SourceDirectories,
}

/// How inputs are grouped into generation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitGrouping {
    /// One unit per input file.
    #[default]
    PerFile,
    /// All inputs of one source directory form a single unit.
    PerDirectory,
}

/// Options consumed by the translation pipeline.
///
/// # Examples
///
/// ```
/// use objlower_core::{MemoryManagement, Options, UnitGrouping};
///
/// let options = Options::default()
///     .with_memory_management(MemoryManagement::Arc)
///     .with_unit_grouping(UnitGrouping::PerDirectory);
///
/// assert_eq!(options.memory_management, MemoryManagement::Arc);
/// assert!(!options.legacy_gc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub memory_management: MemoryManagement,
    /// Suppresses the manual-mode ARC assertion.
    pub legacy_gc: bool,
    pub header_mapping: HeaderMapping,
    pub unit_grouping: UnitGrouping,
    /// Replaces the generated banner comment when set.
    pub file_header: Option<String>,
    /// Umbrella header included by declaration files.
    pub runtime_header: String,
    /// Umbrella header included first by implementation files.
    pub runtime_source_header: String,
    /// Extension (without dot) of translatable inputs.
    pub source_extension: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            memory_management: MemoryManagement::default(),
            legacy_gc: false,
            header_mapping: HeaderMapping::default(),
            unit_grouping: UnitGrouping::default(),
            file_header: None,
            runtime_header: "J2ObjC_header.h".to_string(),
            runtime_source_header: "J2ObjC_source.h".to_string(),
            source_extension: "java".to_string(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory_management(mut self, mode: MemoryManagement) -> Self {
        self.memory_management = mode;
        self
    }

    pub fn with_legacy_gc(mut self, legacy_gc: bool) -> Self {
        self.legacy_gc = legacy_gc;
        self
    }

    pub fn with_header_mapping(mut self, mapping: HeaderMapping) -> Self {
        self.header_mapping = mapping;
        self
    }

    pub fn with_unit_grouping(mut self, grouping: UnitGrouping) -> Self {
        self.unit_grouping = grouping;
        self
    }

    pub fn with_file_header(mut self, header: impl Into<String>) -> Self {
        self.file_header = Some(header.into());
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    pub fn use_arc(&self) -> bool {
        self.memory_management == MemoryManagement::Arc
    }

    pub fn use_gc(&self) -> bool {
        self.memory_management == MemoryManagement::Gc
    }

    pub fn use_reference_counting(&self) -> bool {
        self.memory_management == MemoryManagement::Manual
    }
}
