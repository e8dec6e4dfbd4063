pub(super) mod operators;
pub(super) mod ast_node;

pub use self::{
    ast_node::{ASTNode, NodeKind},
    operators::{
        ArithmeticOperation,
        ConditionOperation
    }
};

/// Intermediate Representation of the pattern compiler.
/// The tree is rooted at a PROGRAM node whose children are the declarations
/// followed by the rules of one pattern file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractSyntaxTree {
    root: ASTNode
}

impl AbstractSyntaxTree {
    pub fn new(root: ASTNode) -> Self {
        Self {
            root
        }
    }

    pub fn root(&self) -> &ASTNode {
        &self.root
    }

    pub fn into_root(self) -> ASTNode {
        self.root
    }

    /// Rule nodes of the file in source order.
    pub fn rules(&self) -> impl Iterator<Item = &ASTNode> {
        self.root.children().iter()
            .filter(|node| node.kind() == NodeKind::RULE)
    }
}
