// External Modules
extern crate exitcode;

use std::fs;
use std::path::PathBuf;

use peephole_pattern_compiler::{
    discover_sources,
    CompileError,
    GeneratorConfig,
    OutputTarget,
    PatternCompiler
};

// Standard Imports
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;


/// Command Line interface struct
/// Describes possible arguments using the clap library
#[derive(Parser)]
#[clap(about = "Generates C peephole optimizer matchers from pattern files")]
struct PatternCLIOptions {
    /// Pattern files or directories of pattern files to translate
    #[clap(parse(from_os_str), required = true)]
    paths: Vec<PathBuf>,

    /// Directory receiving <stem>.c files, default is next to each source
    #[clap(short, long, parse(from_os_str))]
    output_dir: Option<PathBuf>,

    // Configuration

    /// File replacing the built in helper preamble
    #[clap(long, parse(from_os_str))]
    preamble: Option<PathBuf>,

    /// Macro or function each generated matcher is registered with
    #[clap(long, default_value = "ADD_PATTERN")]
    registration_macro: String,

    /// Extension of pattern files searched for in directories
    #[clap(long, default_value = "pat")]
    extension: String,

    // Flags

    /// Write generated code to stdout instead of files
    #[clap(long, action)]
    stdout: bool
}

impl PatternCLIOptions {
    /// Builds the generator configuration from the CLI arguments.
    /// @return: GeneratorConfig, or the I/O error of an unreadable preamble file
    fn generator_config(&self) -> Result<GeneratorConfig, CompileError> {
        let mut config = GeneratorConfig::default()
            .with_registration_macro(&self.registration_macro);

        if let Some(preamble_path) = &self.preamble {
            let preamble = fs::read_to_string(preamble_path)
                .map_err(|source| CompileError::Io { path: preamble_path.clone(), source })?;
            config = config.with_preamble(&preamble);
        }

        return Ok(config);
    }

    fn output_target(&self) -> OutputTarget {
        if self.stdout {
            return OutputTarget::Stdout;
        }

        match &self.output_dir {
            Some(directory) => OutputTarget::Directory(directory.clone()),
            None => OutputTarget::NextToSource
        }
    }
}

fn main() {
    // Logs go to stderr so that --stdout output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse Command line arguments
    let cli_args = PatternCLIOptions::parse();

    let config = match cli_args.generator_config() {
        Ok(config) => config,
        Err(why) => {
            error!("{}", why);
            std::process::exit(exitcode::IOERR);
        }
    };
    let compiler = PatternCompiler::default().set_config(config);

    let sources = match discover_sources(&cli_args.paths, &cli_args.extension) {
        Ok(sources) => sources,
        Err((path, why)) => {
            error!("{}: {}", path.display(), why);
            std::process::exit(exitcode::NOINPUT);
        }
    };
    if sources.is_empty() {
        error!("No pattern files found");
        std::process::exit(exitcode::NOINPUT);
    }

    if let Some(directory) = &cli_args.output_dir {
        if let Err(why) = fs::create_dir_all(directory) {
            error!("{}: {}", directory.display(), why);
            std::process::exit(exitcode::CANTCREAT);
        }
    }

    let summary = compiler.compile_batch(&sources, &cli_args.output_target());
    std::process::exit(summary.exit_code());
}
