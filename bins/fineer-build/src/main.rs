//! fineer-build CLI
//!
//! Resolves the Android build configuration of a Flutter app and hands it to
//! the Gradle wrapper.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fineer_android::gradle::{self, Artifact, GradleInvocation, Variant};
use fineer_android::{layout, AmbientValues, BuildConfigurationLoader, BuildPlan};
use fineer_cli::output::{format_count, format_duration, Status};
use fineer_core::config::Config;
use fineer_core::error::{exit_codes, Error};
use fineer_telemetry::{LogFormat, TelemetryConfig, Timer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fineer-build")]
#[command(about = "Resolve and apply the Android build configuration of a Flutter app")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Machine-readable output (and JSON log lines)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Values the Flutter tool passes to the build
#[derive(Args, Debug, Default)]
struct AmbientArgs {
    /// Version code of the app
    #[arg(long, env = "FLUTTER_VERSION_CODE")]
    version_code: Option<String>,

    /// Version name of the app
    #[arg(long, env = "FLUTTER_VERSION_NAME")]
    version_name: Option<String>,
}

impl From<AmbientArgs> for AmbientValues {
    fn from(args: AmbientArgs) -> Self {
        AmbientValues::new(args.version_code, args.version_name)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the build configuration
    Check,

    /// Print the resolved build plan
    Plan {
        #[command(flatten)]
        ambient: AmbientArgs,
    },

    /// Print the build output layout
    Layout {
        /// Root output directory (defaults to the configured one)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Subproject names (default to the configured ones)
        names: Vec<String>,
    },

    /// Delete the root output directory
    Clean,

    /// Build with the Gradle wrapper
    Build {
        /// Build the release variant
        #[arg(long)]
        release: bool,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Print the Gradle command instead of running it
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        ambient: AmbientArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    fineer_telemetry::init_with_config(
        TelemetryConfig::from_verbosity(cli.verbose, cli.quiet).with_format(format),
    )?;

    let output = Output {
        json: cli.json,
        quiet: cli.quiet,
    };
    let config_path = cli.config.clone();

    let result = match cli.command {
        Commands::Check => run_check(config_path.as_deref(), output),
        Commands::Plan { ambient } => run_plan(config_path.as_deref(), ambient.into(), output),
        Commands::Layout { root, names } => {
            run_layout(config_path.as_deref(), root, names, output)
        }
        Commands::Clean => run_clean(config_path.as_deref(), output),
        Commands::Build {
            release,
            bundle,
            dry_run,
            ambient,
        } => run_build(
            config_path.as_deref(),
            ambient.into(),
            release,
            bundle,
            dry_run,
            output,
        ),
    };

    let exit_code = match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report_error(&e, output),
    };

    std::process::exit(exit_code);
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
    quiet: bool,
}

fn report_error(err: &Error, output: Output) -> i32 {
    if output.json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(json) => println!("{}", json),
            Err(_) => Status::error(&err.to_string()),
        }
    } else {
        Status::error(&err.to_string());
    }
    err.code.exit_code()
}

fn loader(config_path: Option<&Path>, ambient: AmbientValues) -> fineer_core::Result<BuildConfigurationLoader> {
    let config = Config::load(config_path, Path::new("."))?;
    let base_dir = config.base_dir();
    Ok(BuildConfigurationLoader::new(config.schema, ambient).with_base_dir(base_dir))
}

fn run_check(config_path: Option<&Path>, output: Output) -> fineer_core::Result<()> {
    let timer = Timer::start("check");
    let plan = loader(config_path, AmbientValues::default())?.resolve()?;
    let elapsed = timer.stop();

    if output.json {
        println!("{}", serde_json::json!({ "valid": true }));
    } else if !output.quiet {
        Status::success(&format!(
            "Build configuration is valid ({}, {})",
            format_count(plan.subprojects.len(), "subproject", "subprojects"),
            format_duration(elapsed)
        ));
    }
    Ok(())
}

fn run_plan(config_path: Option<&Path>, ambient: AmbientValues, output: Output) -> fineer_core::Result<()> {
    let plan = loader(config_path, ambient)?.resolve()?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn print_plan(plan: &BuildPlan) {
    Status::header(&format!("Build plan: {}", plan.project_name));
    Status::field("namespace", plan.identity.namespace());
    Status::field("application_id", plan.identity.application_id());
    Status::field(
        "sdk",
        &format!(
            "min {} / target {} / compile {}",
            plan.sdk.min_sdk(),
            plan.sdk.target_sdk(),
            plan.sdk.compile_sdk()
        ),
    );
    Status::field(
        "java",
        &format!(
            "source {} / target {} / kotlin jvm {}",
            plan.language.source_level, plan.language.target_level, plan.language.jvm_target
        ),
    );
    Status::field(
        "version_code",
        plan.ambient.version_code.as_deref().unwrap_or("(from framework)"),
    );
    Status::field(
        "version_name",
        plan.ambient.version_name.as_deref().unwrap_or("(from framework)"),
    );
    Status::field("flutter_source", &plan.flutter_source.display().to_string());
    Status::field("repositories", &plan.repositories.join(", "));

    Status::header("Build types");
    for build_type in &plan.build_types {
        let signing = build_type
            .signing
            .as_ref()
            .map(|s| format!("signed with {}", s.name))
            .unwrap_or_else(|| "unsigned".to_string());
        Status::field(&build_type.name, &signing);
    }

    Status::header("Output layout");
    Status::field("root", &plan.output_layout.root().display().to_string());
    for subproject in &plan.subprojects {
        let jvm = subproject
            .jvm_target
            .map(|v| format!(" (kotlin jvm {})", v))
            .unwrap_or_default();
        Status::field(
            &subproject.name,
            &format!("{}{}", subproject.output_dir.display(), jvm),
        );
    }
}

fn run_layout(
    config_path: Option<&Path>,
    root: Option<PathBuf>,
    names: Vec<String>,
    output: Output,
) -> fineer_core::Result<()> {
    let (root, names) = match (root, names.is_empty()) {
        (Some(root), false) => (root, names),
        (root, _) => {
            let loader = loader(config_path, AmbientValues::default())?;
            let root = root.unwrap_or_else(|| loader.output_root());
            let names = if names.is_empty() {
                loader.schema().project.subprojects.clone()
            } else {
                names
            };
            (root, names)
        }
    };

    let resolved = layout::resolve_output_layout(&root, &names)?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        for (name, dir) in resolved.iter() {
            println!("{}\t{}", name, dir.display());
        }
    }
    Ok(())
}

fn run_clean(config_path: Option<&Path>, output: Output) -> fineer_core::Result<()> {
    let root = loader(config_path, AmbientValues::default())?.output_root();
    let removed = layout::clean(&root)?;

    if !output.quiet && !output.json {
        if removed {
            Status::success(&format!("Removed {}", root.display()));
        } else {
            Status::info(&format!("Nothing to clean at {}", root.display()));
        }
    }
    Ok(())
}

fn run_build(
    config_path: Option<&Path>,
    ambient: AmbientValues,
    release: bool,
    bundle: bool,
    dry_run: bool,
    output: Output,
) -> fineer_core::Result<()> {
    let config = Config::load(config_path, Path::new("."))?;
    let project_dir = config.base_dir();
    let loader = BuildConfigurationLoader::new(config.schema, ambient).with_base_dir(&project_dir);
    let plan = loader.resolve()?;

    let variant = Variant::new(
        if release { "release" } else { "debug" },
        if bundle { Artifact::Bundle } else { Artifact::Apk },
    );
    let invocation = GradleInvocation::from_plan(&plan, &variant, &project_dir)?;

    if dry_run {
        println!("{}", invocation);
        return Ok(());
    }

    layout::prepare_output_root(plan.output_layout.root())?;

    if !output.quiet {
        Status::info(&format!("Running {}", variant.task()));
    }
    let dir = if project_dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        project_dir
    };
    let timer = Timer::start("gradle");
    gradle::run(&dir, &invocation)?;
    let elapsed = timer.stop();

    if !output.quiet {
        Status::success(&format!("Build succeeded in {}", format_duration(elapsed)));
    }
    Ok(())
}
