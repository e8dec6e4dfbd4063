use super::operators::{ArithmeticOperation, ConditionOperation};
use strum_macros::Display;


/// Kind of an ASTNode. The meaning of a node's children is fixed by its kind,
/// see the documentation on each variant for the positional layout.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Display)]
#[allow(non_camel_case_types)]
pub enum NodeKind {
    /// Root of a pattern file.
    /// Children: DECLARATION*, RULE*
    PROGRAM,

    /// Instruction set alias declaration.
    ///
    /// # Syntax:
    ///     set <identifier> = { <instruction>, ... };
    ///
    /// # Example:
    ///     set int_oper = { iadd, isub };
    ///     ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ -> Declaration
    ///
    /// Children: IDENTIFIER, INSTRUCTION_SET
    DECLARATION,

    /// Plain name. Text holds the name.
    IDENTIFIER,

    /// Set of interchangeable instructions. Either the body of a declaration or an
    /// anonymous alternative written directly in a match pattern.
    ///
    /// # Example:
    ///     x: { iload, aload }(a)
    ///        ^^^^^^^^^^^^^^^^ -> Instruction Set
    ///
    /// Children: INSTRUCTION+
    INSTRUCTION_SET,

    /// Optimization rule. Text holds the rule name.
    ///
    /// # Syntax:
    ///     pattern <identifier>: <match elements> --> { <statements> }
    ///
    /// Children: PATTERN, REPLACEMENT
    RULE,

    /// Match side of a rule.
    /// Children: (NAMED_INSTR | UNNAMED_INSTR)+
    PATTERN,

    /// Replacement side of a rule.
    /// Children: statements
    REPLACEMENT,

    /// Match element bound to a display name usable on the replacement side.
    ///
    /// # Example:
    ///     x: iload(a)
    ///     ^^^^^^^^^^^ -> Named Instruction
    ///
    /// Children: INSTRUCTION | INSTRUCTION_SET | INSTRUCTION_COUNT, VARIABLE_REFERENCE*
    NAMED_INSTR,

    /// Match element without a display name. Same children as NAMED_INSTR.
    UNNAMED_INSTR,

    /// Reference to an instruction opcode or to a declared alias. Text holds the name.
    INSTRUCTION,

    /// Wildcard `_` matching any single instruction present in the stream.
    INSTRUCTION_COUNT,

    /// Construct a new instruction. Text holds the opcode.
    /// Children: argument expressions
    STATEMENT_INSTRUCTION,

    /// Reuse (copy) of a matched instruction. Text holds the display name.
    STATEMENT_VARIABLE,

    /// Switch resolved at generation time on the instruction bound to a match element.
    /// Children: VARIABLE_REFERENCE (discriminant), STATEMENT_CASE+
    STATEMENT_SWITCH,

    /// Case clause of a switch. Text holds the instruction label or `default`.
    /// Children: statements
    STATEMENT_CASE,

    /// If / else if / else chain.
    /// Children: STATEMENT_IF+, STATEMENT_ELSE?
    STATEMENT_COMPOUND,

    /// Conditional branch of a compound statement.
    /// Children: condition, statements
    STATEMENT_IF,

    /// Final unconditional branch of a compound statement.
    /// Children: statements
    STATEMENT_ELSE,

    /// Arithmetic over two or more operands.
    ARITHMETIC(ArithmeticOperation),

    /// Comparison or logical operation over two or more operands.
    CONDITION(ConditionOperation),

    /// Integer literal. Text holds the literal.
    INT_LITERAL,

    /// Reference to a captured instruction argument. Text holds the capture name.
    VARIABLE_REFERENCE
}

/// Tagged tree node of a parsed pattern file.
/// Nodes own their children; there are no back references, walks that need the
/// enclosing element pass it down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASTNode {
    kind: NodeKind,
    text: String,
    children: Vec<ASTNode>
}

impl ASTNode {
    /// Creates a node without children.
    pub fn new(kind: NodeKind, text: &str) -> Self {
        ASTNode {
            kind,
            text: String::from(text),
            children: vec![]
        }
    }

    pub fn with_children(kind: NodeKind, text: &str, children: Vec<ASTNode>) -> Self {
        ASTNode {
            kind,
            text: String::from(text),
            children
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn children(&self) -> &[ASTNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&ASTNode> {
        self.children.get(index)
    }

    pub fn push_child(&mut self, child: ASTNode) {
        self.children.push(child);
    }

    /// True for nodes that can appear as an expression or condition operand.
    pub fn is_expression(&self) -> bool {
        match self.kind {
            NodeKind::ARITHMETIC(_) | NodeKind::CONDITION(_) |
            NodeKind::INT_LITERAL | NodeKind::VARIABLE_REFERENCE => true,
            _ => false
        }
    }

    /// Collects the names of every VARIABLE_REFERENCE in this subtree, in order of appearance.
    pub fn variable_references(&self) -> Vec<&str> {
        let mut output = vec![];
        self.collect_variable_references(&mut output);
        output
    }

    fn collect_variable_references<'a>(&'a self, output: &mut Vec<&'a str>) {
        if self.kind == NodeKind::VARIABLE_REFERENCE {
            output.push(self.text());
        }
        for child in &self.children {
            child.collect_variable_references(output);
        }
    }
}
