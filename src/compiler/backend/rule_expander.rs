use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::code_template::CodeTemplate;
use super::declaration_emitter::{emit_declarations, DeclarationTemplate};
use super::declaration_map::DeclarationMap;
use super::error::GeneratorError;
use super::function_registry::FunctionRegistry;
use super::statement_emitter::StatementEmitter;
use super::variable_resolver::{resolve_bindings, VariableBindings};
use super::super::ast::{ASTNode, NodeKind};

/// Frozen choice of one concrete instruction per binding of a rule.
/// Each generated function gets its own copy, nothing downstream sees the vector the
/// expansion keeps mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBindingVector {
    entries: Vec<(String, String)>
}

impl FixedBindingVector {
    /// Copies the current instructions alongside their binding display names.
    pub fn freeze<S: AsRef<str>>(bindings: &VariableBindings, instructions: &[S]) -> Self {
        FixedBindingVector {
            entries: bindings.iter()
                .zip(instructions.iter())
                .map(|(binding, instruction)| (binding.display_name.clone(), String::from(instruction.as_ref())))
                .collect()
        }
    }

    pub fn instruction(&self, slot: usize) -> Option<&str> {
        self.entries.get(slot).map(|(_, instruction)| instruction.as_str())
    }

    pub fn instructions(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, instruction)| instruction.as_str()).collect()
    }
}

/// Formats as `x=iadd, unnamed=iload` for error context.
impl fmt::Display for FixedBindingVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.entries.iter()
            .map(|(name, instruction)| format!("{}={}", name, instruction))
            .collect();
        write!(f, "{}", entries.join(", "))
    }
}

fn c_identifier() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"))
}

/// Expands one rule into a specialised matcher function per combination of the
/// instructions its aliases range over.
struct RuleExpander<'a> {
    rule: &'a ASTNode,
    bindings: VariableBindings,
    candidates: Vec<Vec<String>>,
    declarations: DeclarationTemplate,
    name_template: CodeTemplate
}

impl<'a> RuleExpander<'a> {
    fn new(rule: &'a ASTNode, declarations: &mut DeclarationMap) -> Result<Self, GeneratorError> {
        let bindings = resolve_bindings(rule, declarations)?;

        let mut candidates = Vec::with_capacity(bindings.len());
        let mut name_template = CodeTemplate::new();
        name_template.push_text(rule.text());
        for (slot, binding) in bindings.iter().enumerate() {
            let instructions = declarations.get(&binding.alias)
                .ok_or_else(|| GeneratorError::undefined(&binding.alias))?;
            candidates.push(instructions.to_vec());

            name_template.push_text("_");
            name_template.push_slot(slot);
        }

        let declaration_template = emit_declarations(rule, &bindings)?;
        debug_assert_eq!(bindings.len(), name_template.slot_count());
        debug_assert!(declaration_template.body.slot_count() <= bindings.len());

        Ok(RuleExpander {
            rule,
            bindings,
            candidates,
            declarations: declaration_template,
            name_template
        })
    }

    /// Number of functions the expansion produces.
    fn combination_count(&self) -> usize {
        self.candidates.iter().map(|instructions| instructions.len()).product()
    }

    /// Walks the cartesian product of candidates. The vector is assigned in place and
    /// restored on the way out, leaves work on a frozen copy.
    fn enumerate(&self, index: usize, fixed: &mut [String], registry: &mut FunctionRegistry, output: &mut String) -> Result<usize, GeneratorError> {
        if index == self.candidates.len() {
            let snapshot = FixedBindingVector::freeze(&self.bindings, &fixed[..]);
            self.emit_function(&snapshot, registry, output)
                .map_err(|error| GeneratorError::InRule {
                    rule: String::from(self.rule.text()),
                    bindings: snapshot.to_string(),
                    source: Box::new(error)
                })?;
            return Ok(1);
        }

        let mut count = 0;
        for candidate in &self.candidates[index] {
            fixed[index] = candidate.clone();
            count += self.enumerate(index + 1, fixed, registry, output)?;
        }
        fixed[index].clear();

        Ok(count)
    }

    fn emit_function(&self, fixed: &FixedBindingVector, registry: &mut FunctionRegistry, output: &mut String) -> Result<(), GeneratorError> {
        let instructions = fixed.instructions();
        let name = self.name_template.instantiate(&instructions);
        if !c_identifier().is_match(&name) {
            return Err(GeneratorError::malformed(NodeKind::RULE, &format!("'{}' is not a valid function name", name)));
        }

        let replacement = self.rule.child(1)
            .ok_or_else(|| GeneratorError::malformed(NodeKind::RULE, "missing replacement"))?;
        let declarations = self.declarations.body.instantiate(&instructions);
        let statements = StatementEmitter::new(&self.declarations.layout, &self.bindings, fixed).emit(replacement)?;

        output.push_str(&format!("int {}(CODE **c)\n{{\n{}{}}}\n\n", name, declarations, statements));
        debug!("Generated {}", name);
        registry.register(name);

        Ok(())
    }
}

/// Expands a rule into one matcher function per binding combination, appending the
/// functions to the output and their names to the registry.
/// @rule: RULE node
/// @declarations: This rule's own copy of the file's declaration map
/// @registry: Registry of the file being generated
/// @output: Buffer receiving the function text
/// @return: Number of functions generated
pub fn expand_rule(rule: &ASTNode, declarations: &mut DeclarationMap, registry: &mut FunctionRegistry, output: &mut String) -> Result<usize, GeneratorError> {
    let expander = RuleExpander::new(rule, declarations)
        .map_err(|error| GeneratorError::InRule {
            rule: String::from(rule.text()),
            bindings: String::new(),
            source: Box::new(error)
        })?;

    if expander.combination_count() == 0 {
        warn!("Rule '{}' ranges over an empty instruction set and generates nothing", rule.text());
        return Ok(0);
    }

    let mut fixed = vec![String::new(); expander.candidates.len()];
    expander.enumerate(0, &mut fixed, registry, output)
}

#[cfg(test)]
mod tests {
    use super::{expand_rule, FixedBindingVector};
    use crate::compiler::ast::AbstractSyntaxTree;
    use crate::compiler::backend::declaration_map::DeclarationMap;
    use crate::compiler::backend::error::GeneratorError;
    use crate::compiler::backend::function_registry::FunctionRegistry;
    use crate::compiler::backend::variable_resolver::resolve_bindings;
    use crate::compiler::parser::{AstParser, PestPatternParser};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> AbstractSyntaxTree {
        PestPatternParser::default().parse(source).unwrap()
    }

    fn expand(tree: &AbstractSyntaxTree) -> (Result<usize, GeneratorError>, FunctionRegistry, String) {
        let mut declarations = DeclarationMap::build(tree.root()).unwrap();
        let mut registry = FunctionRegistry::new();
        let mut output = String::new();
        let result = expand_rule(tree.rules().next().unwrap(), &mut declarations, &mut registry, &mut output);
        (result, registry, output)
    }

    #[test]
    fn test_single_alias_expands_per_instruction() {
        let tree = parse("set int_oper = { iadd, isub }; pattern R: x: int_oper --> { x; }");
        let (result, registry, output) = expand(&tree);

        assert_eq!(Ok(2), result);
        assert_eq!(&["R_iadd".to_string(), "R_isub".to_string()][..], registry.names());

        let expected = "int R_iadd(CODE **c)
{
    CODE *instr_x = *c;
    if (!is_iadd(instr_x)) return 0;
    CODE *statement_1 = copyCODE(instr_x);
    statement_1->next = next(instr_x);
    return replace(c, 1, statement_1);
}

int R_isub(CODE **c)
{
    CODE *instr_x = *c;
    if (!is_isub(instr_x)) return 0;
    CODE *statement_1 = copyCODE(instr_x);
    statement_1->next = next(instr_x);
    return replace(c, 1, statement_1);
}

";
        assert_eq!(expected, output);
        assert!(!output.contains("switch"));
    }

    #[test]
    fn test_product_of_set_sizes_with_distinct_names() {
        let tree = parse(
            "set a = { i1, i2, i3 }; set b = { j1, j2 };
             pattern p: a b { k1, k2 } --> { }"
        );
        let (result, registry, _) = expand(&tree);

        assert_eq!(Ok(12), result);
        assert_eq!(12, registry.len());
        let mut names = registry.names().to_vec();
        names.sort();
        names.dedup();
        assert_eq!(12, names.len());
        assert_eq!("p_i1_j1_k1", registry.names()[0]);
        assert_eq!("p_i1_j1_k2", registry.names()[1]);
        assert_eq!("p_i3_j2_k2", registry.names()[11]);
    }

    #[test]
    fn test_rule_without_aliases_generates_one_function() {
        let tree = parse("pattern drop_dup_pop: dup pop --> { }");
        let (result, registry, output) = expand(&tree);

        assert_eq!(Ok(1), result);
        assert_eq!(&["drop_dup_pop".to_string()][..], registry.names());
        assert!(output.contains("return replace(c, 2, NULL);"));
    }

    #[test]
    fn test_leaf_error_carries_rule_and_bindings() {
        let tree = parse(
            "set int_oper = { iadd, isub };
             pattern fold: x: int_oper --> { switch (x) { case iadd: { } } }"
        );
        let (result, registry, _) = expand(&tree);

        let error = result.unwrap_err();
        assert_eq!(GeneratorError::InRule {
            rule: String::from("fold"),
            bindings: String::from("x=isub"),
            source: Box::new(GeneratorError::UnresolvedCase {
                discriminant: String::from("x"),
                instruction: String::from("isub")
            })
        }, error);
        // The iadd expansion precedes the failing one
        assert_eq!(&["fold_iadd".to_string()][..], registry.names());
    }

    #[test]
    fn test_frozen_vector_display() {
        let tree = parse("set a = { iadd }; pattern p: x: a a --> { }");
        let mut declarations = DeclarationMap::build(tree.root()).unwrap();
        let bindings = resolve_bindings(tree.rules().next().unwrap(), &mut declarations).unwrap();

        let fixed = FixedBindingVector::freeze(&bindings, &["iadd", "isub"]);
        assert_eq!("x=iadd, unnamed=isub", fixed.to_string());
        assert_eq!(Some("isub"), fixed.instruction(1));
        assert_eq!(None, fixed.instruction(2));
    }

    #[test]
    fn test_empty_alias_generates_nothing() {
        let tree = parse("pattern p: x: iadd --> { }");
        let mut declarations = DeclarationMap::build(tree.root()).unwrap();
        declarations.insert("iadd", &[]);

        let mut registry = FunctionRegistry::new();
        let mut output = String::new();
        let count = expand_rule(tree.rules().next().unwrap(), &mut declarations, &mut registry, &mut output);

        assert_eq!(Ok(0), count);
        assert!(registry.is_empty());
        assert!(output.is_empty());
    }
}
