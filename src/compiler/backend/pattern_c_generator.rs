use tracing::info;

use super::declaration_map::DeclarationMap;
use super::error::GeneratorError;
use super::function_registry::FunctionRegistry;
use super::rule_expander::expand_rule;
use super::{BackEndGenerator, GeneratedFile, GeneratorConfig};
use super::super::ast::AbstractSyntaxTree;

/// Generates C peephole matchers from a pattern file.
pub struct PatternCGenerator {
    config: GeneratorConfig
}

impl PatternCGenerator {
    /// Name of the registration function of a file: the init prefix followed by the
    /// file stem with every character not allowed in a C identifier replaced by `_`.
    fn init_function_name(&self, stem: &str) -> String {
        let mut sanitized: String = stem.chars()
            .map(|character| if character.is_ascii_alphanumeric() || character == '_' { character } else { '_' })
            .collect();
        if sanitized.is_empty() {
            sanitized.push('_');
        }
        format!("{}{}", self.config.init_prefix(), sanitized)
    }
}

impl BackEndGenerator for PatternCGenerator {
    fn default() -> Self {
        PatternCGenerator {
            config: GeneratorConfig::default()
        }
    }

    fn configure(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    fn generate(&self, tree: &AbstractSyntaxTree, stem: &str) -> Result<GeneratedFile, GeneratorError> {
        let mut registry = FunctionRegistry::new();
        let declarations = DeclarationMap::build(tree.root())?;

        let mut functions = String::new();
        for rule in tree.rules() {
            let mut rule_declarations = declarations.clone();
            expand_rule(rule, &mut rule_declarations, &mut registry, &mut functions)?;
        }

        let init_function = self.init_function_name(stem);
        let mut code = String::with_capacity(self.config.preamble().len() + functions.len());
        code.push_str(self.config.preamble());
        if !code.is_empty() && !code.ends_with('\n') {
            code.push('\n');
        }
        code.push_str(&functions);
        code.push_str(&registry.emit_init_function(&init_function, self.config.registration_macro()));

        info!("Generated {} pattern functions from {} aliases for '{}'", registry.len(), declarations.len(), stem);

        Ok(GeneratedFile {
            code,
            init_function,
            function_names: registry.into_names()
        })
    }
}
