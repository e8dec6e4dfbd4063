mod ast;
pub mod backend;
pub mod parser;
pub mod source_discovery;
#[cfg(test)]
mod test;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

// Interface Definitions
use self::ast::AbstractSyntaxTree;
use self::parser::{AstParser, ParseError};
use self::backend::{BackEndGenerator, GeneratedFile, GeneratorConfig, GeneratorError};

// Concrete Definitions Re-Export
pub use self::backend::PatternCGenerator;
pub use self::parser::PestPatternParser;


/// Failure to translate one pattern file. Other files of a batch are unaffected.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("{file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: ParseError
    },

    #[error("{file}: {source}")]
    Generate {
        file: String,
        #[source]
        source: GeneratorError
    }
}

impl CompileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        CompileError::Io {
            path: path.to_path_buf(),
            source
        }
    }

    /// True for failures caused by the pattern source rather than the file system.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, CompileError::Io { .. })
    }
}

/// Where the code generated for each file of a batch goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Printed to stdout, nothing is written
    Stdout,
    /// `<stem>.c` next to each source
    NextToSource,
    /// `<stem>.c` inside a directory
    Directory(PathBuf)
}

impl OutputTarget {
    /// Destination file of a source, None when printing to stdout.
    pub fn destination(&self, source_path: &Path) -> Option<PathBuf> {
        let generated = source_path.with_extension("c");
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::NextToSource => Some(generated),
            OutputTarget::Directory(directory) => match generated.file_name() {
                Some(file_name) => Some(directory.join(file_name)),
                None => Some(generated)
            }
        }
    }
}

/// Outcome of translating a batch of pattern files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub translated: usize,
    pub data_errors: usize,
    pub io_errors: usize
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.translated + self.data_errors + self.io_errors
    }

    /// Process exit code of the batch. Source errors take precedence over I/O errors.
    pub fn exit_code(&self) -> exitcode::ExitCode {
        if self.total() == 0 {
            exitcode::NOINPUT
        } else if self.data_errors > 0 {
            exitcode::DATAERR
        } else if self.io_errors > 0 {
            exitcode::IOERR
        } else {
            exitcode::OK
        }
    }
}

/// Stem used for the registration function of a pattern file.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}


pub struct Compiler<P: AstParser, G: BackEndGenerator> {
    parser: P,
    generator: G
}

impl<P: AstParser, G: BackEndGenerator> Compiler<P, G> {
    pub fn default() -> Self {
        Compiler {
            parser: P::default(),
            generator: G::default()
        }
    }

    pub fn new(parser: P, generator: G) -> Self {
        Compiler {
            parser,
            generator
        }
    }

    pub fn set_config(self, config: GeneratorConfig) -> Self {
        Compiler {
            parser: self.parser,
            generator: self.generator.configure(config)
        }
    }

    /// Translates pattern source text.
    /// @source: Pattern file contents
    /// @stem: File stem naming the registration function
    /// @return: Generated code and function names
    pub fn compile_str(&self, source: &str, stem: &str) -> Result<GeneratedFile, CompileError> {
        let ast: AbstractSyntaxTree = self.parser.parse(source)
            .map_err(|source| CompileError::Parse { file: String::from(stem), source })?;

        self.generator.generate(&ast, stem)
            .map_err(|source| CompileError::Generate { file: String::from(stem), source })
    }

    pub fn compile(&self, source_filename: &Path) -> Result<GeneratedFile, CompileError> {
        let source_str = fs::read_to_string(source_filename)
            .map_err(|error| CompileError::io(source_filename, error))?;
        let stem = file_stem(source_filename);

        self.compile_str(source_str.as_str(), &stem)
            .map_err(|error| match error {
                CompileError::Parse { source, .. } =>
                    CompileError::Parse { file: source_filename.display().to_string(), source },
                CompileError::Generate { source, .. } =>
                    CompileError::Generate { file: source_filename.display().to_string(), source },
                io => io
            })
    }

    /// Translates a file and writes the result next to a temporary sibling that is
    /// renamed into place, so a failure leaves no partial output.
    pub fn compile_and_save(&self, source_filename: &Path, dest_filename: &Path) -> Result<GeneratedFile, CompileError> {
        let generated = self.compile(source_filename)?;

        let mut temporary_name = dest_filename.as_os_str().to_os_string();
        temporary_name.push(".tmp");
        let temporary = PathBuf::from(temporary_name);

        let written = fs::File::create(&temporary)
            .and_then(|mut file| {
                file.write_all(generated.code.as_bytes())?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&temporary, dest_filename));

        if let Err(error) = written {
            if temporary.exists() {
                if let Err(cleanup) = fs::remove_file(&temporary) {
                    warn!("Couldn't remove {}: {}", temporary.display(), cleanup);
                }
            }
            return Err(CompileError::io(dest_filename, error));
        }

        info!("Successfully wrote to {}", dest_filename.display());
        Ok(generated)
    }

    /// Translates every source, reporting failures and continuing with the next file.
    /// @sources: Pattern files in processing order
    /// @target: Where generated code goes
    /// @return: Counts of translated and failed files
    pub fn compile_batch(&self, sources: &[PathBuf], target: &OutputTarget) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for source_path in sources {
            let result = match target.destination(source_path) {
                Some(destination) => self.compile_and_save(source_path, &destination).map(|_| ()),
                None => self.compile(source_path).map(|generated| print!("{}", generated))
            };

            match result {
                Ok(()) => summary.translated += 1,
                Err(why) => {
                    error!("{}", why);
                    if why.is_data_error() {
                        summary.data_errors += 1;
                    } else {
                        summary.io_errors += 1;
                    }
                }
            }
        }

        info!("Translated {} of {} pattern files", summary.translated, summary.total());
        summary
    }
}
