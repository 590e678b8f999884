// FILE: src/cli/handlers.rs
use crate::{
    cli::OutputFormat,
    collect_inputs, compile_file_with_options, compile_path, utils::is_mist_stylesheet,
    CompilationStats, CompilerError, CompilerOptions, Components, Result,
};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;

// --- COMPILE ---
pub fn handle_compile_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let inputs: Vec<&String> = matches
        .get_many::<String>("input")
        .map(|values| values.collect())
        .unwrap_or_default();
    let options = cli.build_compiler_options(matches)?;

    let files = collect_inputs(&inputs)?;
    if files.is_empty() {
        return Err(CompilerError::InvalidFormat {
            message: "No .mist.css files found".to_string(),
        });
    }

    if matches.get_flag("watch") {
        watch_and_compile(&inputs, &files, options)
    } else {
        compile_all(&files, &options, matches.get_flag("stats"))
    }
}

fn compile_all(files: &[PathBuf], options: &CompilerOptions, show_stats: bool) -> Result<()> {
    let mut failed = 0;
    let mut last_error = None;

    for input_path in files {
        let output_path = crate::output_path_for(input_path);
        println!("🔨 Compiling {} -> {}", input_path.display(), output_path.display());

        match compile_file_with_options(input_path, options.clone()) {
            Ok(stats) => {
                println!("✅ Compilation successful!");
                println!("   Components: {}", stats.component_count);
                println!("   Output: {} bytes", stats.output_size);
                println!("   Time: {}ms", stats.compile_time_ms);
                if show_stats {
                    print_detailed_stats(&stats);
                }
            }
            Err(e) => {
                eprintln!("❌ {} - {}", input_path.display(), e);
                failed += 1;
                last_error = Some(e);
            }
        }
    }

    if files.len() == 1 {
        if let Some(e) = last_error {
            return Err(e);
        }
    }
    if failed > 0 {
        return Err(CompilerError::InvalidFormat {
            message: format!("{} of {} files failed to compile", failed, files.len()),
        });
    }
    Ok(())
}

fn watch_and_compile(inputs: &[&String], files: &[PathBuf], options: CompilerOptions) -> Result<()> {
    println!("👀 Watching {} file(s) for changes...", files.len());

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        CompilerError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    for input in inputs {
        let path = Path::new(input.as_str());
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(path, mode).map_err(|e| {
            CompilerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to watch {}: {}", path.display(), e),
            ))
        })?;
    }

    for input_path in files {
        match compile_file_with_options(input_path, options.clone()) {
            Ok(_) => println!("✅ Initial compilation of {} successful", input_path.display()),
            Err(e) => eprintln!("❌ Initial compilation of {} failed: {}", input_path.display(), e),
        }
    }

    loop {
        match rx.recv() {
            Ok(event) => {
                for changed in event.paths.iter().filter(|p| is_mist_stylesheet(p) && p.is_file()) {
                    println!("🔄 {} changed, recompiling...", changed.display());
                    match compile_file_with_options(changed, options.clone()) {
                        Ok(stats) => println!(
                            "✅ Recompiled successfully ({} components, {}ms)",
                            stats.component_count, stats.compile_time_ms
                        ),
                        Err(e) => eprintln!("❌ Compilation failed: {}", e),
                    }
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

// --- CHECK ---
pub fn handle_check_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required_input(matches)?;
    let recursive = matches.get_flag("recursive");
    let options = cli.build_compiler_options(matches)?;

    if recursive && Path::new(input_path).is_dir() {
        check_directory_recursive(input_path, &options)
    } else {
        check_single_file(Path::new(input_path), &options)
    }
}

fn check_single_file(input_path: &Path, options: &CompilerOptions) -> Result<()> {
    println!("🔍 Checking {}", input_path.display());
    match compile_path(input_path, options) {
        Ok(module) => {
            println!(
                "✅ {} - No issues found ({} components)",
                input_path.display(),
                module.stats.component_count
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ {} - {}", input_path.display(), e);
            Err(e)
        }
    }
}

fn check_directory_recursive(dir_path: &str, options: &CompilerOptions) -> Result<()> {
    let files = collect_inputs([dir_path])?;
    let total_files = files.len();
    let error_files = files
        .iter()
        .filter(|file| check_single_file(file, options).is_err())
        .count();

    println!("\n📊 Check Summary:");
    println!("   Total files: {}", total_files);
    println!("   Files with errors: {}", error_files);
    if total_files > 0 {
        println!(
            "   Success rate: {:.1}%",
            (total_files - error_files) as f64 / total_files as f64 * 100.0
        );
    }

    if error_files > 0 {
        Err(CompilerError::InvalidFormat {
            message: format!("{} files have errors", error_files),
        })
    } else {
        Ok(())
    }
}

// --- ANALYZE ---
#[derive(Debug, Serialize)]
struct Analysis<'a> {
    input: &'a str,
    module_name: &'a str,
    components: &'a Components,
    stats: &'a CompilationStats,
}

pub fn handle_analyze_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required_input(matches)?;
    let output_path = matches.get_one::<String>("output");
    let format = matches
        .get_one::<OutputFormat>("format")
        .cloned()
        .unwrap_or(OutputFormat::Debug);
    let options = cli.build_compiler_options(matches)?;

    println!("🔬 Analyzing {}", input_path);

    let module = compile_path(Path::new(input_path), &options)?;
    let analysis = Analysis {
        input: input_path,
        module_name: &module.module_name,
        components: &module.components,
        stats: &module.stats,
    };

    let report = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&analysis).map_err(|e| CompilerError::CodeGen {
            message: format!("JSON serialization error: {}", e),
        })?,
        OutputFormat::Debug => format!("Mist File Analysis: {}\n\n{:#?}", input_path, analysis),
    };

    if let Some(output_file) = output_path {
        std::fs::write(output_file, report)?;
        println!("✅ Analysis saved to {}", output_file);
    } else {
        println!("{}", report);
    }
    Ok(())
}

fn required_input(matches: &clap::ArgMatches) -> Result<&String> {
    matches.get_one::<String>("input").ok_or_else(|| CompilerError::InvalidFormat {
        message: "Missing input path".to_string(),
    })
}

fn print_detailed_stats(stats: &CompilationStats) {
    println!("\n📊 Detailed Compilation Statistics:");
    println!("   Source size: {} bytes", stats.source_size);
    println!("   Output size: {} bytes", stats.output_size);
    println!("   Compile time: {}ms", stats.compile_time_ms);
    println!("\n   Model breakdown:");
    println!("     Tree nodes: {}", stats.node_count);
    println!("     Declarations: {}", stats.declaration_count);
    println!("     Components: {}", stats.component_count);
    println!("     Data attributes: {}", stats.attribute_count);
}
