use thiserror::Error;

use super::super::ast::NodeKind;

/// Errors raised while translating a pattern file. All of them are fatal to the
/// file being translated, none of them are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The same instruction set alias was declared twice in one file.
    #[error("Instruction set '{name}' is declared more than once")]
    DuplicateDeclaration {
        name: String
    },

    /// The replacement side references a name the match side never bound.
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        name: String
    },

    /// A static switch has no case for the instruction bound in this expansion.
    #[error("Switch on '{discriminant}' has no case for bound instruction '{instruction}'")]
    UnresolvedCase {
        discriminant: String,
        instruction: String
    },

    /// A node reached an emitter with a shape its kind does not allow.
    #[error("Malformed {kind} node: {reason}")]
    MalformedNode {
        kind: NodeKind,
        reason: String
    },

    /// Context added by the rule expander: which rule and which bindings failed.
    #[error("In rule '{rule}' [{bindings}]: {source}")]
    InRule {
        rule: String,
        bindings: String,
        #[source]
        source: Box<GeneratorError>
    }
}

impl GeneratorError {
    pub(crate) fn malformed(kind: NodeKind, reason: &str) -> Self {
        GeneratorError::MalformedNode {
            kind,
            reason: String::from(reason)
        }
    }

    pub(crate) fn undefined(name: &str) -> Self {
        GeneratorError::UndefinedVariable {
            name: String::from(name)
        }
    }

    /// Strips rule context and returns the error that caused the failure.
    pub fn root_cause(&self) -> &GeneratorError {
        match self {
            GeneratorError::InRule { source, .. } => source.root_cause(),
            _ => self
        }
    }
}
