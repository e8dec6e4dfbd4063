use std::collections::HashMap;
use tracing::warn;

use super::error::GeneratorError;
use super::super::ast::{ASTNode, NodeKind};

/// Mapping from an instruction set alias to its instructions.
/// Instructions keep their declaration order so that expansion, and therefore the
/// generated function names and registration order, is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationMap {
    aliases: HashMap<String, Vec<String>>
}

impl DeclarationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from the leading DECLARATION nodes of a PROGRAM node.
    /// Scanning stops at the first node that is not a declaration.
    /// @program: Root node of a pattern file
    /// @return: The declaration map, or DuplicateDeclaration if an alias is declared twice
    pub fn build(program: &ASTNode) -> Result<Self, GeneratorError> {
        let mut map = Self::new();

        for declaration in program.children().iter()
            .take_while(|node| node.kind() == NodeKind::DECLARATION) {

            let name = declaration.child(0)
                .ok_or_else(|| GeneratorError::malformed(NodeKind::DECLARATION, "missing declared name"))?;
            let set = declaration.child(1)
                .ok_or_else(|| GeneratorError::malformed(NodeKind::DECLARATION, "missing instruction set"))?;

            if map.contains(name.text()) {
                return Err(GeneratorError::DuplicateDeclaration {
                    name: String::from(name.text())
                });
            }

            let instructions = set.children().iter().map(|node| node.text()).collect::<Vec<_>>();
            map.insert(name.text(), &instructions);
        }

        Ok(map)
    }

    /// Inserts or replaces an alias. Repeated instruction names are dropped keeping the
    /// first occurrence.
    pub fn insert(&mut self, name: &str, instructions: &[&str]) {
        let mut unique: Vec<String> = Vec::with_capacity(instructions.len());
        for instruction in instructions {
            if unique.iter().any(|existing| existing == instruction) {
                warn!("Instruction '{}' listed more than once in set '{}'", instruction, name);
                continue;
            }
            unique.push(String::from(*instruction));
        }

        self.aliases.insert(String::from(name), unique);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Instructions of an alias in declaration order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.aliases.get(name).map(|instructions| instructions.as_slice())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
