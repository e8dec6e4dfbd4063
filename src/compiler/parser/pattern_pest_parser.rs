use crate::pest::Parser;
use pest::iterators::{Pair, Pairs};
use std::str::FromStr;

use super::{AstParser, ParseError};
use super::super::ast::{
    AbstractSyntaxTree,
    ASTNode,
    NodeKind,
    ArithmeticOperation,
    ConditionOperation
};

#[derive(Parser)]
#[grammar = "patterns.pest"]
struct PatternParser;


/// Pest backed parser for the peephole pattern language.
pub struct PestPatternParser;

impl PestPatternParser {
    fn parse_into_node_tree(source: &str) -> Result<ASTNode, ParseError> {
        let mut pairs = PatternParser::parse(Rule::program, source)
            .map_err(|error| ParseError::Syntax(error.to_string()))?;
        let program = Self::expect_pair(&mut pairs, "program")?;

        let mut root = ASTNode::new(NodeKind::PROGRAM, "");
        for pair in program.into_inner() {
            match pair.as_rule() {
                Rule::declaration => root.push_child(Self::parse_declaration(pair)?),
                Rule::rule => root.push_child(Self::parse_rule(pair)?),
                Rule::EOI => {}
                _ => return Err(Self::unexpected(&pair))
            }
        }

        Ok(root)
    }

    fn parse_declaration(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let identifier = Self::expect_pair(&mut pairs, "declaration name")?;
        let instruction_set = Self::expect_pair(&mut pairs, "declaration instruction set")?;

        Ok(ASTNode::with_children(NodeKind::DECLARATION, "", vec![
            ASTNode::new(NodeKind::IDENTIFIER, identifier.as_str()),
            Self::parse_instruction_set(instruction_set)
        ]))
    }

    fn parse_instruction_set(pair: Pair<Rule>) -> ASTNode {
        ASTNode::with_children(NodeKind::INSTRUCTION_SET, "",
            pair.into_inner()
                .map(|instruction| ASTNode::new(NodeKind::INSTRUCTION, instruction.as_str().trim()))
                .collect())
    }

    fn parse_rule(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let name = Self::expect_pair(&mut pairs, "rule name")?;
        let match_side = Self::parse_match_side(Self::expect_pair(&mut pairs, "match side")?)?;

        // Bare identifiers on the replacement side naming a match element are reuse statements
        let named: Vec<String> = match_side.children().iter()
            .filter(|element| element.kind() == NodeKind::NAMED_INSTR)
            .map(|element| String::from(element.text()))
            .collect();

        let replacement = Self::expect_pair(&mut pairs, "replacement")?;
        let statements = Self::parse_statements(replacement.into_inner(), &named)?;

        Ok(ASTNode::with_children(NodeKind::RULE, name.as_str(), vec![
            match_side,
            ASTNode::with_children(NodeKind::REPLACEMENT, "", statements)
        ]))
    }

    fn parse_match_side(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pattern = ASTNode::new(NodeKind::PATTERN, "");

        for element in pair.into_inner() {
            let (kind, name, mut pairs) = match element.as_rule() {
                Rule::named_instruction => {
                    let mut pairs = element.into_inner();
                    let name = Self::expect_pair(&mut pairs, "instruction name")?;
                    (NodeKind::NAMED_INSTR, String::from(name.as_str()), pairs)
                },
                Rule::unnamed_instruction => (NodeKind::UNNAMED_INSTR, String::new(), element.into_inner()),
                _ => return Err(Self::unexpected(&element))
            };

            let body = Self::expect_pair(&mut pairs, "instruction body")?;
            let mut children = vec![match body.as_rule() {
                Rule::wildcard => ASTNode::new(NodeKind::INSTRUCTION_COUNT, ""),
                Rule::instruction_set => Self::parse_instruction_set(body),
                Rule::instruction => ASTNode::new(NodeKind::INSTRUCTION, body.as_str().trim()),
                _ => return Err(Self::unexpected(&body))
            }];
            children.extend(pairs.map(|capture| ASTNode::new(NodeKind::VARIABLE_REFERENCE, capture.as_str())));

            pattern.push_child(ASTNode::with_children(kind, name.as_str(), children));
        }

        Ok(pattern)
    }

    fn parse_statements(pairs: Pairs<Rule>, named: &[String]) -> Result<Vec<ASTNode>, ParseError> {
        pairs.map(|pair| Self::parse_statement(pair, named)).collect()
    }

    fn parse_statement(pair: Pair<Rule>, named: &[String]) -> Result<ASTNode, ParseError> {
        match pair.as_rule() {
            Rule::instruction_statement => {
                let mut pairs = pair.into_inner();
                let identifier = Self::expect_pair(&mut pairs, "statement instruction")?;
                let arguments: Vec<ASTNode> = pairs.map(Self::parse_expression).collect::<Result<_, _>>()?;
                let name = identifier.as_str();

                if arguments.is_empty() && named.iter().any(|named| named == name) {
                    Ok(ASTNode::new(NodeKind::STATEMENT_VARIABLE, name))
                } else {
                    Ok(ASTNode::with_children(NodeKind::STATEMENT_INSTRUCTION, name, arguments))
                }
            },
            Rule::switch_statement => {
                let mut pairs = pair.into_inner();
                let discriminant = Self::expect_pair(&mut pairs, "switch discriminant")?;

                let mut children = vec![ASTNode::new(NodeKind::VARIABLE_REFERENCE, discriminant.as_str())];
                for case in pairs {
                    let mut case_pairs = case.into_inner();
                    let label = Self::expect_pair(&mut case_pairs, "case label")?;
                    let label = match label.as_rule() {
                        Rule::default_label => "default",
                        _ => label.as_str()
                    };
                    let block = Self::expect_pair(&mut case_pairs, "case block")?;
                    children.push(ASTNode::with_children(NodeKind::STATEMENT_CASE, label,
                        Self::parse_statements(block.into_inner(), named)?));
                }

                Ok(ASTNode::with_children(NodeKind::STATEMENT_SWITCH, "", children))
            },
            Rule::if_statement => {
                let mut compound = ASTNode::new(NodeKind::STATEMENT_COMPOUND, "");
                for clause in pair.into_inner() {
                    match clause.as_rule() {
                        Rule::if_clause => {
                            let mut pairs = clause.into_inner();
                            let condition = Self::parse_expression(Self::expect_pair(&mut pairs, "if condition")?)?;
                            let block = Self::expect_pair(&mut pairs, "if block")?;

                            let mut children = vec![condition];
                            children.extend(Self::parse_statements(block.into_inner(), named)?);
                            compound.push_child(ASTNode::with_children(NodeKind::STATEMENT_IF, "", children));
                        },
                        Rule::else_clause => {
                            let mut pairs = clause.into_inner();
                            let block = Self::expect_pair(&mut pairs, "else block")?;
                            compound.push_child(ASTNode::with_children(NodeKind::STATEMENT_ELSE, "",
                                Self::parse_statements(block.into_inner(), named)?));
                        },
                        _ => return Err(Self::unexpected(&clause))
                    }
                }

                Ok(compound)
            },
            _ => Err(Self::unexpected(&pair))
        }
    }

    fn parse_expression(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        match pair.as_rule() {
            Rule::integer => Ok(ASTNode::new(NodeKind::INT_LITERAL, pair.as_str())),
            Rule::variable => Ok(ASTNode::new(NodeKind::VARIABLE_REFERENCE, pair.as_str().trim())),
            Rule::disjunction | Rule::conjunction | Rule::comparison |
            Rule::sum | Rule::product => {
                let mut pairs = pair.into_inner();

                // Convert linear list of operations of equal precedence into a tree.
                // Runs of the same operator stay a single n-ary node.
                let mut lhs = Self::parse_expression(Self::expect_pair(&mut pairs, "operand")?)?;
                while let Some(op) = pairs.next() {
                    let kind = Self::parse_operator(&op)?;
                    let rhs = Self::parse_expression(Self::expect_pair(&mut pairs, "operand")?)?;

                    if lhs.kind() == kind && lhs.children().len() >= 2 {
                        lhs.push_child(rhs);
                    } else {
                        lhs = ASTNode::with_children(kind, "", vec![lhs, rhs]);
                    }
                }

                Ok(lhs)
            },
            _ => Err(Self::unexpected(&pair))
        }
    }

    fn parse_operator(pair: &Pair<Rule>) -> Result<NodeKind, ParseError> {
        let token = pair.as_str().trim();
        match pair.as_rule() {
            Rule::sum_op | Rule::product_op => ArithmeticOperation::from_str(token)
                .map(NodeKind::ARITHMETIC)
                .map_err(|_| Self::unexpected(pair)),
            Rule::comparison_op | Rule::and_op | Rule::or_op => ConditionOperation::from_str(token)
                .map(NodeKind::CONDITION)
                .map_err(|_| Self::unexpected(pair)),
            _ => Err(Self::unexpected(pair))
        }
    }

    fn expect_pair<'i>(pairs: &mut Pairs<'i, Rule>, expected: &str) -> Result<Pair<'i, Rule>, ParseError> {
        pairs.next().ok_or_else(|| ParseError::UnexpectedShape(format!("missing {}", expected)))
    }

    fn unexpected(pair: &Pair<Rule>) -> ParseError {
        let (line, column) = pair.as_span().start_pos().line_col();
        ParseError::UnexpectedShape(format!("unexpected {:?} '{}' at {}:{}", pair.as_rule(), pair.as_str(), line, column))
    }
}

impl AstParser for PestPatternParser {
    fn default() -> Self {
        Self {}
    }

    fn parse(&self, source: &str) -> Result<AbstractSyntaxTree, ParseError> {
        Ok(AbstractSyntaxTree::new(Self::parse_into_node_tree(source)?))
    }
}
