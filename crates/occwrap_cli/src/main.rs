use anyhow::{anyhow, Context, Result};
use occwrap::config::RunConfig;
use occwrap::diagnostics::{DiagnosticsCollector, WrapError, WrapResult};
use occwrap::export::{check_coverage, export_structure, structure_json};
use occwrap::generator::{generate_all, generate_modules, generate_toolkits};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_CONFIG: &str = "occwrap.toml";

fn usage() {
    eprintln!("occwrap <generate|toolkit|module|export-structure|check-coverage> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate [--config <file>] [--parallel]     Generate every toolkit");
    eprintln!("  toolkit [--config <file>] <toolkit>...      Generate selected toolkits");
    eprintln!("  module [--config <file>] <module>...        Generate selected modules");
    eprintln!("  export-structure [--config <file>] [--output <file>] [<module>...]");
    eprintln!("                                              Export the class hierarchy as JSON");
    eprintln!("  check-coverage [--config <file>]            Compare module tables against headers");
    eprintln!();
    eprintln!("The configuration file defaults to {}.", DEFAULT_CONFIG);
}

fn load_config(path: &Path) -> Result<RunConfig> {
    RunConfig::load(path)
        .with_context(|| format!("cannot load configuration {}", path.display()))
}

/// Open the collector with its run-log sink next to the interface files
fn open_collector(config: &RunConfig) -> Result<DiagnosticsCollector> {
    fs::create_dir_all(&config.interface_output_dir)?;
    Ok(DiagnosticsCollector::with_log_file(&config.log_path())?)
}

/// Surface a run result, spelling out fatal parse failures
///
/// A header the parser cannot digest is the one error a user can do
/// nothing about without seeing the adapted text, so it is printed whole.
fn report<T>(result: WrapResult<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(WrapError::FatalParse { file, content }) => {
            eprintln!("fatal parse failure in {}", file.display());
            eprintln!("adapted header content follows:");
            eprintln!("{}", content);
            Err(anyhow!("fatal parse failure in {}", file.display()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Split off a --config flag; everything else stays in place
fn split_config_flag(args: &mut Vec<String>) -> Result<PathBuf> {
    let mut path = PathBuf::from(DEFAULT_CONFIG);
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--config" || args[i] == "-c" {
            if i + 1 < args.len() {
                path = PathBuf::from(args.remove(i + 1));
                args.remove(i);
            } else {
                return Err(anyhow!("--config requires a value"));
            }
        } else {
            i += 1;
        }
    }
    Ok(path)
}

fn cmd_generate(mut args: Vec<String>) -> Result<()> {
    let config_path = split_config_flag(&mut args)?;
    let mut parallel = false;
    args.retain(|arg| {
        if arg == "--parallel" {
            parallel = true;
            false
        } else {
            true
        }
    });
    if let Some(stray) = args.first() {
        return Err(anyhow!("unexpected argument: {}", stray));
    }

    let mut config = load_config(&config_path)?;
    if parallel {
        config.parallel = true;
    }
    let mut collector = open_collector(&config)?;
    report(generate_all(&config, &mut collector))?;
    Ok(())
}

fn cmd_toolkits(mut args: Vec<String>) -> Result<()> {
    let config_path = split_config_flag(&mut args)?;
    if args.is_empty() {
        return Err(anyhow!("usage: occwrap toolkit [--config <file>] <toolkit>..."));
    }
    let config = load_config(&config_path)?;
    let mut collector = open_collector(&config)?;
    report(generate_toolkits(&args, &config, &mut collector))?;
    Ok(())
}

fn cmd_modules(mut args: Vec<String>) -> Result<()> {
    let config_path = split_config_flag(&mut args)?;
    if args.is_empty() {
        return Err(anyhow!("usage: occwrap module [--config <file>] <module>..."));
    }
    let config = load_config(&config_path)?;
    let mut collector = open_collector(&config)?;
    report(generate_modules(&args, &config, &mut collector))?;
    Ok(())
}

fn cmd_export(mut args: Vec<String>) -> Result<()> {
    let config_path = split_config_flag(&mut args)?;
    let mut output = PathBuf::from("structure.json");
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--output" || args[i] == "-o" {
            if i + 1 < args.len() {
                output = PathBuf::from(args.remove(i + 1));
                args.remove(i);
            } else {
                return Err(anyhow!("--output requires a value"));
            }
        } else {
            i += 1;
        }
    }

    let config = load_config(&config_path)?;
    if !config.include_dir.is_dir() {
        return Err(anyhow!(
            "include dir {} not found",
            config.include_dir.display()
        ));
    }
    let mut collector = DiagnosticsCollector::new();
    let export = report(export_structure(&args, &config, &mut collector))?;
    let json = structure_json(&export)?;
    fs::write(&output, json)?;
    println!(
        "exported {} classes to {}",
        export.classes.len(),
        output.display()
    );
    Ok(())
}

fn cmd_coverage(mut args: Vec<String>) -> Result<()> {
    let config_path = split_config_flag(&mut args)?;
    if let Some(stray) = args.first() {
        return Err(anyhow!("unexpected argument: {}", stray));
    }

    let config = load_config(&config_path)?;
    if !config.include_dir.is_dir() {
        return Err(anyhow!(
            "include dir {} not found",
            config.include_dir.display()
        ));
    }
    let coverage = check_coverage(&config);
    for name in &coverage.unwrapped {
        println!("{} module not wrapped", name);
    }
    for name in &coverage.missing_headers {
        println!("{} module has no headers under the include roots", name);
    }
    if coverage.is_clean() {
        println!("module tables and include roots agree");
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        usage();
        return Ok(());
    }

    let cmd = args.remove(0);

    match cmd.as_str() {
        "generate" => cmd_generate(args)?,
        "toolkit" => cmd_toolkits(args)?,
        "module" => cmd_modules(args)?,
        "export-structure" => cmd_export(args)?,
        "check-coverage" => cmd_coverage(args)?,
        "help" | "--help" | "-h" => usage(),
        _ => {
            usage();
            return Err(anyhow!("unknown command: {}", cmd));
        }
    }

    Ok(())
}
