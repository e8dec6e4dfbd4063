mod code_template;
mod declaration_emitter;
mod declaration_map;
mod error;
mod expression;
mod function_registry;
mod pattern_c_generator;
mod rule_expander;
mod statement_emitter;
mod variable_resolver;

use std::fmt;

use super::ast::AbstractSyntaxTree;

/// Helper functions copied ahead of the generated matchers of every file.
const DEFAULT_PREAMBLE: &str = include_str!("preamble/peephole_helpers.h");
const DEFAULT_REGISTRATION_MACRO: &str = "ADD_PATTERN";
const DEFAULT_INIT_PREFIX: &str = "init_patterns_";

/// Settings of a generator that do not come from the pattern file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    preamble: String,
    registration_macro: String,
    init_prefix: String
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            preamble: String::from(DEFAULT_PREAMBLE),
            registration_macro: String::from(DEFAULT_REGISTRATION_MACRO),
            init_prefix: String::from(DEFAULT_INIT_PREFIX)
        }
    }
}

impl GeneratorConfig {
    pub fn with_preamble(mut self, preamble: &str) -> Self {
        self.preamble = String::from(preamble);
        self
    }

    pub fn with_registration_macro(mut self, registration_macro: &str) -> Self {
        self.registration_macro = String::from(registration_macro);
        self
    }

    pub fn with_init_prefix(mut self, init_prefix: &str) -> Self {
        self.init_prefix = String::from(init_prefix);
        self
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn registration_macro(&self) -> &str {
        &self.registration_macro
    }

    pub fn init_prefix(&self) -> &str {
        &self.init_prefix
    }
}

/// Code generated for one pattern file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Preamble, matcher functions and registration function
    pub code: String,
    /// Name of the registration function
    pub init_function: String,
    /// Matcher names in registration order
    pub function_names: Vec<String>
}

impl fmt::Display for GeneratedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

// Abstract Definitions
pub trait BackEndGenerator {
    fn default() -> Self;
    fn configure(self, config: GeneratorConfig) -> Self;
    fn generate(&self, tree: &AbstractSyntaxTree, stem: &str) -> Result<GeneratedFile, GeneratorError>;
}

// Concrete Definition Export
pub use self::error::GeneratorError;
pub use self::pattern_c_generator::PatternCGenerator;
