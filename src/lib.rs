//! Mist Stylesheet Compiler
//!
//! Turns `*.mist.css` stylesheets into typed React components. A stylesheet
//! declares components with `@scope` blocks and describes their props with
//! data attribute selectors:
//!
//! ```css
//! @scope (.card) {
//!   button:scope { padding: 1rem; }
//!   &[data-size='sm'] { padding: 0.5rem; }
//!   &[data-size='lg'] { padding: 2rem; }
//!   &[data-disabled] { opacity: 0.5; }
//! }
//! ```
//!
//! compiles to a `Card` component rendering a `<button>` with
//! `size?: 'sm' | 'lg'` and `disabled?: boolean` props.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use mistc::{compile_file, Result};
//!
//! fn main() -> Result<()> {
//!     // Writes card.mist.tsx next to the input
//!     compile_file("card.mist.css")?;
//!     Ok(())
//! }
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Phase 1**: Lexer & Parser - Build the stylesheet tree
//! 2. **Phase 2**: Reducer - Flatten to `@scope` and rule declarations
//! 3. **Phase 3**: Builder - Build the component model
//! 4. **Phase 4**: Code Generator - Render TSX

pub mod types;
pub mod error;
pub mod lexer;
pub mod utils;

pub mod ast;
pub mod parser;
pub mod reducer;
pub mod extractor;
pub mod builder;
pub mod codegen;
pub mod cli;

use serde::Serialize;
use std::path::{Path, PathBuf};

// Re-export commonly used types and functions
pub use error::{CompilerError, Result};
pub use types::*;
pub use lexer::{Lexer, Token, TokenType};
pub use utils::{camel_case, module_name_from_path, output_path_for, pascal_case};

pub use ast::{Declaration, DeclarationKind, NodeKind, StyleNode, StylesheetParser};
pub use parser::{CssParser, Parser};
pub use reducer::reduce;
pub use extractor::{AttributeExtractor, AttributeMatch};
pub use builder::{ComponentModelBuilder, Cursor};
pub use codegen::CodeGenerator;
pub use cli::EnhancedCli;

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Compilation options and settings
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Enable debug mode with per-phase logging
    pub debug_mode: bool,

    /// Whether a stylesheet may declare one component or many
    pub mode: ComponentMode,
}

/// Compilation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompilationStats {
    /// Original source size in bytes
    pub source_size: u64,

    /// Generated TSX size in bytes
    pub output_size: u64,

    /// Number of nodes in the stylesheet tree
    pub node_count: usize,

    /// Number of `@scope` and rule declarations kept by the reducer
    pub declaration_count: usize,

    /// Number of components generated
    pub component_count: usize,

    /// Number of data attributes across all components
    pub attribute_count: usize,

    /// Compilation time in milliseconds
    pub compile_time_ms: u64,
}

/// Result of compiling one stylesheet in memory
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub module_name: String,
    pub components: Components,
    pub code: String,
    pub stats: CompilationStats,
}

/// Compile `input_path` and write the generated TSX next to it.
pub fn compile_file(input_path: impl AsRef<Path>) -> Result<CompilationStats> {
    compile_file_with_options(input_path, CompilerOptions::default())
}

/// Compile with custom options
pub fn compile_file_with_options(
    input_path: impl AsRef<Path>,
    options: CompilerOptions,
) -> Result<CompilationStats> {
    let input_path = input_path.as_ref();
    let output_path = output_path_for(input_path);
    let module = compile_path(input_path, &options)?;

    std::fs::write(&output_path, &module.code)?;

    if options.debug_mode {
        log::info!("Compiled '{}' to '{}'", input_path.display(), output_path.display());
        log::info!("Components: {}", module.stats.component_count);
        log::info!("Output size: {} bytes", module.stats.output_size);
        log::info!("Compile time: {}ms", module.stats.compile_time_ms);
        log::debug!("Full stats: {:?}", module.stats);
    }

    Ok(module.stats)
}

/// Read and compile `input_path` without writing anything.
pub fn compile_path(input_path: &Path, options: &CompilerOptions) -> Result<CompiledModule> {
    use std::time::Instant;

    let start_time = Instant::now();

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Compiling '{}'...", input_path.display());
        log::debug!("Compiler options: {:?}", options);
    }

    let module_name = module_name_from_path(input_path)?;
    let source = std::fs::read_to_string(input_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CompilerError::FileNotFound {
            path: input_path.display().to_string(),
        },
        _ => CompilerError::Io(e),
    })?;

    let filename = input_path.to_string_lossy();
    let mut module = compile_module(&CssParser, &source, &filename, &module_name, options)?;
    module.stats.compile_time_ms = start_time.elapsed().as_millis() as u64;

    Ok(module)
}

/// Compile stylesheet source to TSX with default options. The module name
/// is derived from `filename`.
pub fn compile_source(source: &str, filename: &str) -> Result<String> {
    let (code, _stats) = compile_source_with_options(source, filename, CompilerOptions::default())?;
    Ok(code)
}

/// Compile stylesheet source to TSX with custom options
pub fn compile_source_with_options(
    source: &str,
    filename: &str,
    options: CompilerOptions,
) -> Result<(String, CompilationStats)> {
    compile_source_with_parser(&CssParser, source, filename, options)
}

/// Compile with a custom stylesheet front end
pub fn compile_source_with_parser<P: StylesheetParser + ?Sized>(
    parser: &P,
    source: &str,
    filename: &str,
    options: CompilerOptions,
) -> Result<(String, CompilationStats)> {
    let module_name = module_name_from_path(Path::new(filename))?;
    let module = compile_module(parser, source, filename, &module_name, &options)?;
    Ok((module.code, module.stats))
}

/// Build the component model of stylesheet source without generating code.
pub fn analyze_source(source: &str, filename: &str, options: &CompilerOptions) -> Result<Components> {
    build_model(&CssParser, source, filename, options, &mut CompilationStats::default())
}

fn build_model<P: StylesheetParser + ?Sized>(
    parser: &P,
    source: &str,
    filename: &str,
    options: &CompilerOptions,
    stats: &mut CompilationStats,
) -> Result<Components> {
    // Phase 1: Lexical analysis and parsing
    if options.debug_mode {
        log::debug!("Phase 1: Parsing stylesheet ({} characters)...", source.len());
    }

    let tree = parser.parse_stylesheet(source, filename)?;
    stats.node_count = tree.iter().map(StyleNode::subtree_len).sum();

    if options.debug_mode {
        log::debug!("Phase 1 complete. Nodes: {}", stats.node_count);
    }

    // Phase 2: Reduce the tree to scope and rule declarations
    let declarations = reduce(&tree);
    stats.declaration_count = declarations.len();

    if options.debug_mode {
        log::debug!("Phase 2 complete. Declarations: {}", stats.declaration_count);
    }

    // Phase 3: Build the component model
    let components = ComponentModelBuilder::new(filename, options.mode).build(&declarations)?;
    stats.component_count = components.len();
    stats.attribute_count = components.values().map(|c| c.data.len()).sum();

    if options.debug_mode {
        log::debug!(
            "Phase 3 complete. Components: {}, attributes: {}",
            stats.component_count,
            stats.attribute_count
        );
    }

    Ok(components)
}

fn compile_module<P: StylesheetParser + ?Sized>(
    parser: &P,
    source: &str,
    filename: &str,
    module_name: &str,
    options: &CompilerOptions,
) -> Result<CompiledModule> {
    let mut stats = CompilationStats {
        source_size: source.len() as u64,
        ..Default::default()
    };

    let components = build_model(parser, source, filename, options, &mut stats)?;

    // Phase 4: Generate TSX
    let mut code_generator = CodeGenerator::new();
    let code = code_generator.generate(&components, module_name)?;
    stats.output_size = code.len() as u64;

    if options.debug_mode {
        log::debug!("Phase 4 complete. TSX size: {} bytes", stats.output_size);
    }

    Ok(CompiledModule {
        module_name: module_name.to_string(),
        components,
        code,
        stats,
    })
}

/// Collect `*.mist.css` files: files are taken as given, directories are walked.
pub fn collect_inputs<I, S>(inputs: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            files.push(input.to_path_buf());
            continue;
        }

        for entry in walkdir::WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                CompilerError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Directory traversal error: {}", e),
                ))
            })?;
            if entry.file_type().is_file() && utils::is_mist_stylesheet(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}
