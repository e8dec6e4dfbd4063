use super::code_template::CodeTemplate;
use super::error::GeneratorError;
use super::expression::ARGUMENT_PREFIX;
use super::variable_resolver::{display_name, pattern_of, VariableBindings};
use super::super::ast::{ASTNode, NodeKind};

/// Position in the instruction stream the generated function is called with.
pub(crate) const MATCH_ORIGIN: &str = "*c";

const INDENT: &str = "    ";

/// What a match element checks the instruction at its cursor against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MatchedInstruction {
    /// A concrete opcode written in the rule
    Literal(String),
    /// An alias or inline set, concrete per expansion through this fixed binding slot
    Slot(usize),
    /// `_`, any instruction
    Wildcard
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatchedElement {
    pub(crate) display_name: String,
    pub(crate) named: bool,
    pub(crate) cursor: String,
    pub(crate) instruction: MatchedInstruction
}

/// Facts about the match side the statement emitter needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct MatchLayout {
    elements: Vec<MatchedElement>,
    captures: Vec<String>
}

impl MatchLayout {
    /// Number of instructions the match side spans, i.e. the replace count.
    pub(crate) fn consumed(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn last_cursor(&self) -> Option<&str> {
        self.elements.last().map(|element| element.cursor.as_str())
    }

    /// Named element with a display name.
    pub(crate) fn named_element(&self, display_name: &str) -> Option<&MatchedElement> {
        self.elements.iter().find(|element| element.named && element.display_name == display_name)
    }

    pub(crate) fn is_captured(&self, name: &str) -> bool {
        self.captures.iter().any(|capture| capture == name)
    }
}

/// Match side of a rule lowered to cursor declarations and guard checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeclarationTemplate {
    pub(crate) body: CodeTemplate,
    pub(crate) layout: MatchLayout
}

/// Emits the cursor declarations and guard checks for a rule's match side.
/// Guards of alias bound elements use a template slot so that the template can be
/// instantiated once per expansion.
/// @rule: RULE node
/// @bindings: Bindings found by the variable resolver for this rule
/// @return: Declaration template and match layout
pub(crate) fn emit_declarations(rule: &ASTNode, bindings: &VariableBindings) -> Result<DeclarationTemplate, GeneratorError> {
    let pattern = pattern_of(rule)?;
    if pattern.children().is_empty() {
        return Err(GeneratorError::malformed(NodeKind::PATTERN, "match pattern is empty"));
    }

    let mut body = CodeTemplate::new();
    let mut layout = MatchLayout::default();
    let mut cursor: Option<String> = None;
    let mut capture_uses: Vec<(String, usize)> = vec![];

    // Locals of repeated captures must not shadow another capture, e.g. `a` reused
    // next to a capture literally named `a_2`
    let capture_names: Vec<&str> = pattern.children().iter()
        .flat_map(|element| element.children().iter().skip(1))
        .map(|capture| capture.text())
        .collect();

    for (position, element) in pattern.children().iter().enumerate() {
        let display = display_name(element)?;
        let named = element.kind() == NodeKind::NAMED_INSTR;

        let element_cursor = if named {
            if layout.named_element(display).is_some() {
                return Err(GeneratorError::malformed(element.kind(), &format!("name '{}' is used twice", display)));
            }
            format!("instr_{}", display)
        } else {
            format!("instr_{}", position + 1)
        };

        let source = match &cursor {
            Some(previous) => format!("next({})", previous),
            None => String::from(MATCH_ORIGIN)
        };
        body.push_text(&format!("{}CODE *{} = {};\n", INDENT, element_cursor, source));

        // Captured arguments, a capture name seen before is matched for equality
        let mut arguments = String::new();
        let mut equalities = vec![];
        for capture in element.children().iter().skip(1) {
            if capture.kind() != NodeKind::VARIABLE_REFERENCE {
                return Err(GeneratorError::malformed(element.kind(), "instruction arguments must be capture names"));
            }

            let name = capture.text();
            let local = match capture_uses.iter_mut().find(|(used, _)| used == name) {
                Some((_, uses)) => {
                    *uses += 1;
                    while capture_names.contains(&format!("{}_{}", name, uses).as_str()) {
                        *uses += 1;
                    }
                    let local = format!("{}{}_{}", ARGUMENT_PREFIX, name, uses);
                    equalities.push(format!("{}if ({} != {}{}) return 0;\n", INDENT, local, ARGUMENT_PREFIX, name));
                    local
                },
                None => {
                    capture_uses.push((String::from(name), 1));
                    layout.captures.push(String::from(name));
                    format!("{}{}", ARGUMENT_PREFIX, name)
                }
            };

            body.push_text(&format!("{}int {};\n", INDENT, local));
            arguments.push_str(&format!(", &{}", local));
        }

        let instruction_node = element.child(0)
            .ok_or_else(|| GeneratorError::malformed(element.kind(), "missing instruction"))?;

        let instruction = match instruction_node.kind() {
            NodeKind::INSTRUCTION_COUNT => {
                if !arguments.is_empty() {
                    return Err(GeneratorError::malformed(element.kind(), "wildcard cannot capture arguments"));
                }
                body.push_text(&format!("{}if ({} == NULL) return 0;\n", INDENT, element_cursor));
                MatchedInstruction::Wildcard
            },
            NodeKind::INSTRUCTION | NodeKind::INSTRUCTION_SET => {
                let instruction = match bindings.slot_for_position(position) {
                    Some(slot) => MatchedInstruction::Slot(slot),
                    None if instruction_node.kind() == NodeKind::INSTRUCTION =>
                        MatchedInstruction::Literal(String::from(instruction_node.text())),
                    None => return Err(GeneratorError::malformed(NodeKind::INSTRUCTION_SET, "inline instruction set has no binding"))
                };

                body.push_text(&format!("{}if (!is_", INDENT));
                match &instruction {
                    MatchedInstruction::Slot(slot) => body.push_slot(*slot),
                    MatchedInstruction::Literal(opcode) => body.push_text(opcode),
                    MatchedInstruction::Wildcard => {}
                }
                body.push_text(&format!("({}{})) return 0;\n", element_cursor, arguments));
                instruction
            },
            kind => return Err(GeneratorError::malformed(kind, "unexpected node as instruction of a match element"))
        };

        for equality in equalities {
            body.push_text(&equality);
        }

        layout.elements.push(MatchedElement {
            display_name: String::from(display),
            named,
            cursor: element_cursor.clone(),
            instruction
        });
        cursor = Some(element_cursor);
    }

    Ok(DeclarationTemplate {
        body,
        layout
    })
}
