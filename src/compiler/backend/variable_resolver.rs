use super::declaration_map::DeclarationMap;
use super::error::GeneratorError;
use super::super::ast::{ASTNode, NodeKind};

/// Display name of match elements written without a name.
pub(crate) const UNNAMED: &str = "unnamed";

const INLINED_PREFIX: &str = "inlined_";

/// Association between a match element and the instruction set alias it ranges over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Element name, or `unnamed`
    pub display_name: String,
    /// Declared alias or a synthesised `inlined_<k>` alias
    pub alias: String,
    /// Index of the element in the match side
    pub position: usize
}

/// Bindings of one rule in order of appearance on the match side. This order fixes the
/// function name suffix order and the order of the fixed binding vector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableBindings {
    bindings: Vec<Binding>
}

impl VariableBindings {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Slot in the fixed binding vector of the element at a match position.
    pub fn slot_for_position(&self, position: usize) -> Option<usize> {
        self.bindings.iter().position(|binding| binding.position == position)
    }

    /// Slot in the fixed binding vector of the first binding with a display name.
    pub fn slot_for_name(&self, display_name: &str) -> Option<usize> {
        self.bindings.iter().position(|binding| binding.display_name == display_name)
    }
}

/// Returns the PATTERN node of a rule.
pub(crate) fn pattern_of(rule: &ASTNode) -> Result<&ASTNode, GeneratorError> {
    match rule.child(0) {
        Some(pattern) if pattern.kind() == NodeKind::PATTERN => Ok(pattern),
        _ => Err(GeneratorError::malformed(NodeKind::RULE, "first child must be the match pattern"))
    }
}

/// Display name of a NAMED_INSTR or UNNAMED_INSTR element.
pub(crate) fn display_name(element: &ASTNode) -> Result<&str, GeneratorError> {
    match element.kind() {
        NodeKind::NAMED_INSTR => Ok(element.text()),
        NodeKind::UNNAMED_INSTR => Ok(UNNAMED),
        kind => Err(GeneratorError::malformed(kind, "expected a named or unnamed instruction in match pattern"))
    }
}

/// Discovers which instruction set aliases a rule's match side ranges over.
/// Inline instruction sets are given a fresh `inlined_<k>` alias inserted into the rule's
/// own copy of the declaration map.
/// @rule: RULE node
/// @declarations: Declaration map of this rule, extended in place with inline sets
/// @return: Bindings in order of appearance
pub fn resolve_bindings(rule: &ASTNode, declarations: &mut DeclarationMap) -> Result<VariableBindings, GeneratorError> {
    let pattern = pattern_of(rule)?;
    let mut bindings = VariableBindings::default();
    let mut inlined_count = 0;

    for (position, element) in pattern.children().iter().enumerate() {
        let display = display_name(element)?;
        let body = element.child(0)
            .ok_or_else(|| GeneratorError::malformed(element.kind(), "missing instruction"))?;

        let alias = match body.kind() {
            NodeKind::INSTRUCTION if declarations.contains(body.text()) => String::from(body.text()),
            NodeKind::INSTRUCTION | NodeKind::INSTRUCTION_COUNT => continue,
            NodeKind::INSTRUCTION_SET => {
                let alias = loop {
                    inlined_count += 1;
                    let candidate = format!("{}{}", INLINED_PREFIX, inlined_count);
                    if !declarations.contains(&candidate) {
                        break candidate;
                    }
                };
                let instructions = body.children().iter().map(|node| node.text()).collect::<Vec<_>>();
                declarations.insert(&alias, &instructions);
                alias
            },
            kind => return Err(GeneratorError::malformed(kind, "unexpected node as instruction of a match element"))
        };

        bindings.bindings.push(Binding {
            display_name: String::from(display),
            alias,
            position
        });
    }

    Ok(bindings)
}
