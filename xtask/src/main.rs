use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for input-shim")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        #[arg(long)]
        ignored: bool,
        /// Run only I2C client tests
        #[arg(long)]
        i2c: bool,
        /// Run only ClearPad transport tests
        #[arg(long)]
        clearpad: bool,
        /// Run only register window tests
        #[arg(long)]
        mmio: bool,
        /// Run only fingerprint detection tests
        #[arg(long)]
        fpdetect: bool,
        /// Run only driver-core tests
        #[arg(long)]
        platform: bool,
    },
    /// Run benchmarks
    Bench,
    /// Run fingerprint detection against the simulated TLMM block
    FpDetect {
        /// Strap level of the simulated pin
        #[arg(default_value = "high")]
        level: String,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Probe the ClearPad driver against a board file
    Probe {
        /// Path to the board file
        config: String,
        /// Register asynchronously
        #[arg(long = "async")]
        asynchronous: bool,
    },
}

/// Library modules with their own test suites
const MODULES: [(&str, &str); MODULE_COUNT] = [
    ("core::i2c", "I2C"),
    ("core::clearpad", "ClearPad"),
    ("core::mmio", "MMIO"),
    ("core::fpdetect", "FP detect"),
    ("core::platform", "Platform"),
];

const MODULE_COUNT: usize = 5;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test {
            doc,
            ignored,
            i2c,
            clearpad,
            mmio,
            fpdetect,
            platform,
        } => run_test(doc, ignored, [i2c, clearpad, mmio, fpdetect, platform]),
        Commands::Bench => run_bench(),
        Commands::FpDetect { level, release } => run_fp_detect(&level, release),
        Commands::Probe {
            config,
            asynchronous,
        } => run_probe(&config, asynchronous),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task(
        "Test",
        || run_test(false, false, [false; MODULE_COUNT]),
        verbose,
    )?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy").arg("--all-targets").arg("--all-features");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(doc: bool, ignored: bool, module_flags: [bool; MODULE_COUNT]) -> Result<()> {
    if doc {
        // Run doc tests
        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--all-features").arg("--doc");

        if ignored {
            cmd.arg("--").arg("--ignored");
        }

        return execute_command(&mut cmd);
    }

    // Determine which module tests to run
    let module_count = module_flags.iter().filter(|&&f| f).count();

    if module_count == 0 {
        // Run all tests
        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--all-features");

        if ignored {
            cmd.arg("--").arg("--ignored");
        }

        return execute_command(&mut cmd);
    }

    // Run each module's tests sequentially
    let modules = module_flags.into_iter().zip(MODULES);

    let mut all_success = true;

    for (enabled, (module_path, module_name)) in modules {
        if !enabled {
            continue;
        }

        println!("{} Running {} tests...", "→".blue(), module_name.bold());

        let mut cmd = Command::new("cargo");
        cmd.arg("test")
            .arg("--all-features")
            .arg("--lib")
            .arg(module_path);

        if ignored {
            cmd.arg("--").arg("--ignored");
        }

        match execute_command(&mut cmd) {
            Ok(_) => {
                println!("{} {} tests passed\n", "✓".green(), module_name);
            }
            Err(e) => {
                println!("{} {} tests failed\n", "✗".red(), module_name);
                all_success = false;
                if module_count == 1 {
                    // If only one module was requested, return the error immediately
                    return Err(e);
                }
            }
        }
    }

    if all_success {
        Ok(())
    } else {
        anyhow::bail!("Some module tests failed")
    }
}

fn run_bench() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");

    execute_command(&mut cmd)
}

fn run_fp_detect(level: &str, release: bool) -> Result<()> {
    println!("{}", "=== Fingerprint Detection ===".bold().blue());

    if level != "high" && level != "low" {
        println!(
            "{} Invalid strap level: {} (expected high or low)",
            "✗".red().bold(),
            level.yellow()
        );
        anyhow::bail!("Invalid strap level");
    }

    println!("{} Strap level: {}", "→".blue(), level.cyan());
    println!(
        "{} Build mode: {}",
        "→".blue(),
        if release {
            "release".green().bold()
        } else {
            "debug".yellow().bold()
        }
    );
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.arg("run");

    if release {
        cmd.arg("--release");
    }

    cmd.arg("--bin")
        .arg("input-shim")
        .arg("--")
        .arg("fp-detect")
        .arg("--simulate")
        .arg(level)
        .arg("--settle-ms")
        .arg("0");

    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        println!("\n{} Fingerprint detection failed", "✗".red().bold());
        anyhow::bail!("Fingerprint detection failed with exit code: {}", status);
    }

    let elapsed = start.elapsed();
    println!(
        "\n{} Detection completed in {}",
        "✓".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_probe(config: &str, asynchronous: bool) -> Result<()> {
    use std::path::Path;

    println!("{}", "=== ClearPad Probe ===".bold().blue());

    if !Path::new(config).exists() {
        println!(
            "{} Board file not found: {}",
            "✗".red().bold(),
            config.yellow()
        );
        anyhow::bail!("Board file not found");
    }

    println!("{} Board file: {}", "✓".green(), config.cyan());

    let mut cmd = Command::new("cargo");
    cmd.arg("run")
        .arg("--bin")
        .arg("input-shim")
        .arg("--")
        .arg("probe")
        .arg("--config")
        .arg(config);

    if asynchronous {
        cmd.arg("--async");
    }

    execute_command(&mut cmd)
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let elapsed = start.elapsed();
            println!(
                "{} {}",
                "✓".green().bold(),
                if verbose {
                    format!("({:.2}s)", elapsed.as_secs_f64())
                } else {
                    String::new()
                }
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
