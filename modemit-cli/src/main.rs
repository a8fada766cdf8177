use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use modemit_codegen::{
    emit_jar_index, parse_module_info, write_atomic, CodeGenerator, ModuleDescriptor,
    ModuleInfoEmitter,
};
use modemit_config::types::common::{ModulePackagesPolicy, Severity};
use modemit_config::ValidationReport;
use modemit_rewrite::{ClassTransform, ShadowRename};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `MODEMIT_LOG=debug`.
const LOG_ENV: &str = "MODEMIT_LOG";

#[derive(Parser)]
#[command(name = "modemit", about = "modemit – module descriptor and jar index emitter")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Emit a module-info.class from command-line arguments
    ModuleInfo {
        /// Module name (e.g. org.example.core)
        #[arg(long)]
        name: String,
        /// Module version string
        #[arg(long)]
        version: String,
        /// Required module, repeatable (java.base is always added)
        #[arg(long = "requires", value_name = "MODULE")]
        requires: Vec<String>,
        /// Package path with '/' separators, repeatable
        #[arg(long = "package", value_name = "PACKAGE")]
        packages: Vec<String>,
        /// Write ModulePackages even when every package is exported
        #[arg(long)]
        always_module_packages: bool,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Emit a legacy jar INDEX.LIST
    JarIndex {
        /// File name of the indexed jar
        #[arg(long)]
        jar: String,
        /// Package path with '/' separators, repeatable
        #[arg(long = "package", value_name = "PACKAGE")]
        packages: Vec<String>,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate a build unit and emit all of its artifacts
    Build {
        /// Build-unit directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Output directory (defaults to the unit's configured output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a build unit
    Validate {
        /// Build-unit directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the contents of a module-info.class
    Inspect {
        /// Path to module-info.class
        file: PathBuf,
    },
    /// Rename shadow classes ("Name$$$$suffix") in a class directory
    Rename {
        /// Directory of compiled classes
        input: PathBuf,
        /// Directory to write the renamed classes to
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::ModuleInfo {
            name,
            version,
            requires,
            packages,
            always_module_packages,
            output,
        } => {
            let descriptor = ModuleDescriptor::new(name, version)
                .with_requires(requires)
                .with_packages(packages);
            let policy = if always_module_packages {
                ModulePackagesPolicy::Always
            } else {
                ModulePackagesPolicy::WhenHidden
            };
            cmd_module_info(&descriptor, policy, &output)
        }
        Command::JarIndex {
            jar,
            packages,
            output,
        } => cmd_jar_index(&jar, &packages, &output),
        Command::Build { path, output } => cmd_build(&path, output.as_deref()),
        Command::Validate { path, json } => cmd_validate(&path, json),
        Command::Inspect { file } => cmd_inspect(&file),
        Command::Rename { input, output } => cmd_rename(&input, &output),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Ignore the error when a subscriber is already installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_module_info(
    descriptor: &ModuleDescriptor,
    policy: ModulePackagesPolicy,
    output: &Path,
) -> Result<bool> {
    let bytes = ModuleInfoEmitter::new(policy)
        .emit(descriptor)
        .with_context(|| format!("Failed to emit module '{}'", descriptor.name))?;
    write_atomic(output, &bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    println!(
        "{} Wrote module '{}' ({} bytes) → {}",
        "✓".green().bold(),
        descriptor.name.bold(),
        bytes.len(),
        output.display()
    );
    Ok(true)
}

fn cmd_jar_index(jar: &str, packages: &[String], output: &Path) -> Result<bool> {
    let bytes = emit_jar_index(jar, packages);
    write_atomic(output, &bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    println!(
        "{} Wrote jar index for {} ({} package(s)) → {}",
        "✓".green().bold(),
        jar.bold(),
        packages.len(),
        output.display()
    );
    Ok(true)
}

fn cmd_build(path: &Path, output: Option<&Path>) -> Result<bool> {
    println!(
        "{} {}",
        "Building".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    // 1. Load & validate
    let unit = modemit_config::load_unit(path)
        .with_context(|| format!("Failed to load build unit at '{}'", path.display()))?;
    let report = modemit_config::validate(&unit);

    print_entries(&report);
    let error_count = report.count(Severity::Error);
    if error_count > 0 {
        eprintln!(
            "{} {} validation error(s), fix them before building",
            "✗".red().bold(),
            error_count
        );
        return Ok(false);
    }

    // 2. Generate
    let generated = CodeGenerator::for_unit(&unit.config)
        .generate(&unit.config)
        .context("Generation failed")?;

    // 3. Write output
    let output_dir = match output {
        Some(d) => d.to_path_buf(),
        None => unit.output_dir(),
    };
    generated
        .write_to_disk(&output_dir)
        .with_context(|| format!("Failed to write to '{}'", output_dir.display()))?;

    println!(
        "{} Generated {} file(s) → {}",
        "✓".green().bold(),
        generated.file_count(),
        output_dir.display()
    );
    for file_path in generated.files().keys() {
        println!("  {} {}", "→".dimmed(), file_path);
    }

    Ok(true)
}

fn cmd_validate(path: &Path, json: bool) -> Result<bool> {
    let unit = modemit_config::load_unit(path)
        .with_context(|| format!("Failed to load build unit at '{}'", path.display()))?;
    let report = modemit_config::validate(&unit);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.ok);
    }

    println!(
        "{} {}",
        "Validating".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );
    print_entries(&report);

    let error_count = report.count(Severity::Error);
    let warning_count = report.count(Severity::Warning);
    let module = &unit.config.module;

    println!();
    if error_count == 0 && warning_count == 0 {
        println!(
            "{} Module '{}' is valid ({} requires, {} packages)",
            "✓".green().bold(),
            module.name,
            module.requires.len(),
            module.packages.len(),
        );
        Ok(true)
    } else if error_count == 0 {
        println!(
            "{} Valid with {} warning(s)",
            "⚠".yellow().bold(),
            warning_count,
        );
        Ok(true)
    } else {
        println!(
            "{} {} error(s), {} warning(s)",
            "✗".red().bold(),
            error_count,
            warning_count,
        );
        Ok(false)
    }
}

fn print_entries(report: &ValidationReport) {
    for entry in &report.errors {
        let severity_str = match entry.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };

        println!(
            "  {} [{}] {} ({}:{})",
            severity_str,
            entry.code.dimmed(),
            entry.message,
            entry.file.dimmed(),
            entry.path.dimmed(),
        );

        if let Some(suggestion) = &entry.suggestion {
            println!("    {} {}", "hint:".cyan(), suggestion);
        }
    }
}

fn cmd_inspect(file: &Path) -> Result<bool> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read '{}'", file.display()))?;
    let info = parse_module_info(&bytes)
        .with_context(|| format!("Failed to parse '{}'", file.display()))?;

    println!("{}", "Module Info".bold().underline());
    println!("  Name:       {}", info.name);
    println!("  Version:    {}", info.version.as_deref().unwrap_or("-"));
    println!("  Classfile:  {}", info.major_version);
    println!("  Attributes: {}", info.attribute_count);

    println!();
    println!("{}", "Requires".bold().underline());
    for req in &info.requires {
        if req.flags != 0 {
            println!("  {} {}", req.name, format!("(flags 0x{:04x})", req.flags).dimmed());
        } else {
            println!("  {}", req.name);
        }
    }

    println!();
    println!("{}", "Exports".bold().underline());
    for export in &info.exports {
        println!("  {export}");
    }

    println!();
    println!("{}", "Packages".bold().underline());
    match &info.packages {
        Some(packages) => {
            for package in packages {
                if info.exports.contains(package) {
                    println!("  {package}");
                } else {
                    println!("  {} {}", package, "(hidden)".dimmed());
                }
            }
        }
        None => println!("  {}", "no ModulePackages attribute".dimmed()),
    }

    Ok(true)
}

fn cmd_rename(input: &Path, output: &Path) -> Result<bool> {
    let transform = ShadowRename;
    let report = transform
        .transform(input, output)
        .with_context(|| format!("{} failed on '{}'", transform.name(), input.display()))?;

    println!(
        "{} Renamed {} class(es), copied {} → {}",
        "✓".green().bold(),
        report.renamed.len(),
        report.copied.len(),
        output.display()
    );
    for renamed in &report.renamed {
        println!("  {} {} {} {}", "→".dimmed(), renamed.from, "⇒".dimmed(), renamed.to);
    }

    Ok(true)
}
