// External Modules
extern crate pest;
#[macro_use]
extern crate pest_derive;
extern crate safer_ffi;

use safer_ffi::prelude::*;
use tracing::error;

// Internal Modules
mod compiler;

pub use compiler::{BatchSummary, CompileError, Compiler, OutputTarget, PatternCGenerator, PestPatternParser};
pub use compiler::backend::{BackEndGenerator, GeneratedFile, GeneratorConfig, GeneratorError};
pub use compiler::parser::{AstParser, ParseError};
pub use compiler::source_discovery::discover_sources;

type PARSER = compiler::PestPatternParser;
type GENERATOR = compiler::PatternCGenerator;

/// Compiler with the pest parser and the C peephole back end.
pub type PatternCompiler = Compiler<PARSER, GENERATOR>;


#[derive_ReprC]
#[repr(C)]
pub struct PatternRequest {
    code_text: char_p::Box,      // C repr: char *
    file_stem: char_p::Box       // C repr: char *
}

#[derive_ReprC]
#[repr(C)]
pub struct PatternResponse {
    code_text: Option<char_p::Box>,         // NULL on failure
    function_names: repr_c::Vec<char_p::Box>,
    error_text: Option<char_p::Box>         // NULL on success
}

/// Public Definitions
#[ffi_export]
pub fn generate_patterns(request: &PatternRequest) -> PatternResponse {
    let compiler = PatternCompiler::default();
    let stem = request.file_stem.to_str();

    match compiler.compile_str(request.code_text.to_str(), stem) {
        Ok(generated) => {
            let function_names: Vec<char_p::Box> = generated.function_names.into_iter()
                .filter_map(|name| name.try_into().ok())
                .collect();

            PatternResponse {
                code_text: generated.code.try_into().ok(),
                function_names: function_names.into(),
                error_text: None
            }
        },
        Err(compile_error) => {
            error!("{}", compile_error);
            PatternResponse {
                code_text: None,
                function_names: Vec::new().into(),
                error_text: compile_error.to_string().replace('\0', "").try_into().ok()
            }
        }
    }
}

#[ffi_export]
pub fn free_pattern_response(response: PatternResponse) {
    drop(response.code_text);
    drop(response.function_names);
    drop(response.error_text);
}


// Header generator
// To generate call:
// $ cargo test --features c-headers -- generate_headers
#[::safer_ffi::cfg_headers]
#[test]
fn generate_headers() -> ::std::io::Result<()> {
    ::safer_ffi::headers::builder()
        .to_file("include/peephole_pattern_compiler.h")?
        .generate()
}
