use super::error::GeneratorError;
use super::super::ast::{ASTNode, NodeKind};

/// Prefix of the C locals holding captured instruction arguments.
pub(crate) const ARGUMENT_PREFIX: &str = "arg_";

/// Renders an arithmetic or condition subtree as a C expression.
/// Literals render as written, references as the captured argument local, and every
/// operator node as its fully parenthesised operand chain `(a OP b OP c)`.
/// @node: Expression subtree
/// @return: C expression text, MalformedNode if a non expression node is reached
pub(crate) fn render_expression(node: &ASTNode) -> Result<String, GeneratorError> {
    let token = match node.kind() {
        NodeKind::INT_LITERAL => return Ok(String::from(node.text())),
        NodeKind::VARIABLE_REFERENCE => return Ok(format!("{}{}", ARGUMENT_PREFIX, node.text())),
        NodeKind::ARITHMETIC(op) => op.token(),
        NodeKind::CONDITION(op) => op.token(),
        kind => return Err(GeneratorError::malformed(kind, "not an expression"))
    };

    if node.children().len() < 2 {
        return Err(GeneratorError::malformed(node.kind(), "operator needs at least two operands"));
    }

    let operands = node.children().iter()
        .map(render_expression)
        .collect::<Result<Vec<String>, GeneratorError>>()?;

    Ok(format!("({})", operands.join(&format!(" {} ", token))))
}

#[cfg(test)]
mod tests {
    use super::render_expression;
    use crate::compiler::ast::{ASTNode, NodeKind, ArithmeticOperation, ConditionOperation};
    use crate::compiler::backend::error::GeneratorError;

    fn literal(value: &str) -> ASTNode {
        ASTNode::new(NodeKind::INT_LITERAL, value)
    }

    fn variable(name: &str) -> ASTNode {
        ASTNode::new(NodeKind::VARIABLE_REFERENCE, name)
    }

    fn arithmetic(op: ArithmeticOperation, operands: Vec<ASTNode>) -> ASTNode {
        ASTNode::with_children(NodeKind::ARITHMETIC(op), "", operands)
    }

    fn condition(op: ConditionOperation, operands: Vec<ASTNode>) -> ASTNode {
        ASTNode::with_children(NodeKind::CONDITION(op), "", operands)
    }

    #[test]
    fn test_terminals() {
        assert_eq!("42", render_expression(&literal("42")).unwrap());
        assert_eq!("-1", render_expression(&literal("-1")).unwrap());
        assert_eq!("arg_k", render_expression(&variable("k")).unwrap());
    }

    #[test]
    fn test_arithmetic_operators() {
        let operators = vec![
            (ArithmeticOperation::ADD, "+"),
            (ArithmeticOperation::SUB, "-"),
            (ArithmeticOperation::MUL, "*"),
            (ArithmeticOperation::DIV, "/"),
            (ArithmeticOperation::REM, "%"),
        ];
        for (op, token) in operators {
            let node = arithmetic(op, vec![variable("a"), literal("2")]);
            assert_eq!(format!("(arg_a {} 2)", token), render_expression(&node).unwrap());
        }
    }

    #[test]
    fn test_condition_operators() {
        let operators = vec![
            (ConditionOperation::EQ, "=="),
            (ConditionOperation::NEQ, "!="),
            (ConditionOperation::AND, "&&"),
            (ConditionOperation::OR, "||"),
            (ConditionOperation::LT, "<"),
            (ConditionOperation::GT, ">"),
            (ConditionOperation::LE, "<="),
            (ConditionOperation::GE, ">="),
        ];
        for (op, token) in operators {
            let node = condition(op, vec![variable("a"), variable("b")]);
            assert_eq!(format!("(arg_a {} arg_b)", token), render_expression(&node).unwrap());
        }
    }

    #[test]
    fn test_n_ary_chain_and_nesting() {
        let node = condition(ConditionOperation::OR, vec![
            condition(ConditionOperation::EQ, vec![variable("k"), literal("0")]),
            condition(ConditionOperation::EQ, vec![
                arithmetic(ArithmeticOperation::ADD, vec![variable("a"), variable("b"), literal("1")]),
                literal("3"),
            ]),
            variable("c"),
        ]);

        assert_eq!("((arg_k == 0) || ((arg_a + arg_b + 1) == 3) || arg_c)", render_expression(&node).unwrap());
    }

    #[test]
    fn test_non_expression_is_malformed() {
        let node = ASTNode::new(NodeKind::STATEMENT_VARIABLE, "x");
        assert!(matches!(render_expression(&node), Err(GeneratorError::MalformedNode { .. })));

        let single = arithmetic(ArithmeticOperation::ADD, vec![literal("1")]);
        assert!(matches!(render_expression(&single), Err(GeneratorError::MalformedNode { .. })));
    }
}
