use super::declaration_emitter::{MatchLayout, MatchedInstruction};
use super::error::GeneratorError;
use super::expression::render_expression;
use super::rule_expander::FixedBindingVector;
use super::variable_resolver::VariableBindings;
use super::super::ast::{ASTNode, NodeKind};

/// Label of the case taken when no other case matches the bound instruction.
pub(crate) const DEFAULT_CASE: &str = "default";

/// Emits the replacement side of a rule for one expansion.
/// Every construct or reuse statement becomes one `statement_<k>` node linked to the
/// previous one; switches are resolved here against the fixed bindings, so the emitted
/// code never switches at runtime.
pub(crate) struct StatementEmitter<'a> {
    layout: &'a MatchLayout,
    bindings: &'a VariableBindings,
    fixed: &'a FixedBindingVector,
    statement_count: usize
}

impl<'a> StatementEmitter<'a> {
    pub(crate) fn new(layout: &'a MatchLayout, bindings: &'a VariableBindings, fixed: &'a FixedBindingVector) -> Self {
        StatementEmitter {
            layout,
            bindings,
            fixed,
            statement_count: 0
        }
    }

    /// Emits the body statements of a generated function.
    /// @replacement: REPLACEMENT node of the rule
    /// @return: Statement text ending in a splice or a failed match return on every path
    pub(crate) fn emit(mut self, replacement: &ASTNode) -> Result<String, GeneratorError> {
        if replacement.kind() != NodeKind::REPLACEMENT {
            return Err(GeneratorError::malformed(replacement.kind(), "expected the replacement side of a rule"));
        }

        let mut output = String::new();
        self.emit_block(replacement.children().iter().collect(), None, None, 1, &mut output)?;
        Ok(output)
    }

    fn emit_block(&mut self, statements: Vec<&ASTNode>, previous: Option<String>, head: Option<String>,
                  depth: usize, output: &mut String) -> Result<(), GeneratorError> {
        let indent = "    ".repeat(depth);
        let mut previous = previous;
        let mut head = head;

        for (index, &statement) in statements.iter().enumerate() {
            let rest = &statements[index + 1..];

            let constructor = match statement.kind() {
                NodeKind::STATEMENT_INSTRUCTION => {
                    let mut arguments = vec![];
                    for argument in statement.children() {
                        self.check_captured(argument)?;
                        arguments.push(render_expression(argument)?);
                    }
                    arguments.push(String::from("NULL"));
                    format!("makeCODE{}({})", statement.text(), arguments.join(", "))
                },
                NodeKind::STATEMENT_VARIABLE => {
                    let element = self.layout.named_element(statement.text())
                        .ok_or_else(|| GeneratorError::undefined(statement.text()))?;
                    format!("copyCODE({})", element.cursor)
                },
                NodeKind::STATEMENT_SWITCH => {
                    let case = self.resolve_case(statement)?;
                    let continuation = case.children().iter().chain(rest.iter().copied()).collect();
                    return self.emit_block(continuation, previous, head, depth, output);
                },
                NodeKind::STATEMENT_COMPOUND => {
                    return self.emit_compound(statement, rest, previous, head, depth, output);
                },
                kind => return Err(GeneratorError::malformed(kind, "not a replacement statement"))
            };

            self.statement_count += 1;
            let name = format!("statement_{}", self.statement_count);
            output.push_str(&format!("{}CODE *{} = {};\n", indent, name, constructor));
            if let Some(previous) = &previous {
                output.push_str(&format!("{}{}->next = {};\n", indent, previous, name));
            }
            if head.is_none() {
                head = Some(name.clone());
            }
            previous = Some(name);
        }

        self.emit_splice(previous, head, &indent, output)
    }

    /// Emits an if / else if / else chain. Each branch carries the statements following
    /// the compound and ends on its own, a missing else fails the match.
    fn emit_compound(&mut self, compound: &ASTNode, rest: &[&ASTNode], previous: Option<String>, head: Option<String>,
                     depth: usize, output: &mut String) -> Result<(), GeneratorError> {
        let indent = "    ".repeat(depth);
        let clauses = compound.children();
        if clauses.first().map(|clause| clause.kind()) != Some(NodeKind::STATEMENT_IF) {
            return Err(GeneratorError::malformed(NodeKind::STATEMENT_COMPOUND, "must start with an if clause"));
        }

        let mut has_else = false;
        for (index, clause) in clauses.iter().enumerate() {
            let body = match clause.kind() {
                NodeKind::STATEMENT_IF if !has_else => {
                    let condition = clause.child(0)
                        .filter(|condition| condition.is_expression())
                        .ok_or_else(|| GeneratorError::malformed(NodeKind::STATEMENT_IF, "missing condition"))?;
                    self.check_captured(condition)?;

                    let keyword = if index == 0 { format!("{}if", indent) } else { format!("{}}} else if", indent) };
                    output.push_str(&format!("{} ({}) {{\n", keyword, render_expression(condition)?));
                    &clause.children()[1..]
                },
                NodeKind::STATEMENT_ELSE if !has_else => {
                    has_else = true;
                    output.push_str(&format!("{}}} else {{\n", indent));
                    clause.children()
                },
                kind => return Err(GeneratorError::malformed(kind, "unexpected clause in if statement"))
            };

            let continuation = body.iter().chain(rest.iter().copied()).collect();
            self.emit_block(continuation, previous.clone(), head.clone(), depth + 1, output)?;
        }

        if !has_else {
            output.push_str(&format!("{}}} else {{\n", indent));
            output.push_str(&format!("{}    return 0;\n", indent));
        }
        output.push_str(&format!("{}}}\n", indent));

        Ok(())
    }

    /// Links the last built statement to the stream after the match and replaces the
    /// matched span. Without statements the span is deleted.
    fn emit_splice(&self, previous: Option<String>, head: Option<String>, indent: &str, output: &mut String) -> Result<(), GeneratorError> {
        let consumed = self.layout.consumed();

        match (previous, head) {
            (Some(previous), Some(head)) => {
                let last_cursor = self.layout.last_cursor()
                    .ok_or_else(|| GeneratorError::malformed(NodeKind::PATTERN, "match pattern is empty"))?;
                output.push_str(&format!("{}{}->next = next({});\n", indent, previous, last_cursor));
                output.push_str(&format!("{}return replace(c, {}, {});\n", indent, consumed, head));
            },
            _ => {
                output.push_str(&format!("{}return replace(c, {}, NULL);\n", indent, consumed));
            }
        }

        Ok(())
    }

    /// Picks the case of a switch matching the instruction bound to its discriminant in
    /// this expansion, falling back to a `default` case.
    fn resolve_case<'n>(&self, switch: &'n ASTNode) -> Result<&'n ASTNode, GeneratorError> {
        let discriminant = switch.child(0)
            .filter(|node| node.kind() == NodeKind::VARIABLE_REFERENCE)
            .ok_or_else(|| GeneratorError::malformed(NodeKind::STATEMENT_SWITCH, "missing discriminant"))?;
        let cases = &switch.children()[1..];
        if cases.is_empty() {
            return Err(GeneratorError::malformed(NodeKind::STATEMENT_SWITCH, "switch has no case clauses"));
        }
        if let Some(case) = cases.iter().find(|case| case.kind() != NodeKind::STATEMENT_CASE) {
            return Err(GeneratorError::malformed(case.kind(), "expected a case clause in switch"));
        }

        let name = discriminant.text();
        let instruction = self.bound_instruction(name)?;

        cases.iter().find(|case| case.text() == instruction)
            .or_else(|| cases.iter().find(|case| case.text() == DEFAULT_CASE))
            .ok_or_else(|| GeneratorError::UnresolvedCase {
                discriminant: String::from(name),
                instruction: String::from(instruction)
            })
    }

    /// Concrete instruction a display name stands for in this expansion.
    fn bound_instruction(&self, name: &str) -> Result<&'a str, GeneratorError> {
        if let Some(slot) = self.bindings.slot_for_name(name) {
            return self.fixed.instruction(slot)
                .ok_or_else(|| GeneratorError::undefined(name));
        }

        match self.layout.named_element(name).map(|element| &element.instruction) {
            Some(MatchedInstruction::Literal(opcode)) => Ok(opcode.as_str()),
            Some(MatchedInstruction::Slot(slot)) => self.fixed.instruction(*slot)
                .ok_or_else(|| GeneratorError::undefined(name)),
            Some(MatchedInstruction::Wildcard) =>
                Err(GeneratorError::malformed(NodeKind::STATEMENT_SWITCH, &format!("'{}' matches any instruction", name))),
            None => Err(GeneratorError::undefined(name))
        }
    }

    fn check_captured(&self, expression: &ASTNode) -> Result<(), GeneratorError> {
        match expression.variable_references().into_iter().find(|name| !self.layout.is_captured(name)) {
            Some(name) => Err(GeneratorError::undefined(name)),
            None => Ok(())
        }
    }
}
