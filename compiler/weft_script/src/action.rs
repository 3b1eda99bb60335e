//! Runtime interactions performed against an instantiated module.

use weft_ir::{Const, Span, Spanned, Var};

/// What an action does once its target is resolved.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ActionKind {
    /// Call an exported function with argument values.
    Invoke(Vec<Const>),
    /// Read an exported global.
    Get,
}

/// One runtime interaction: which module, which export, and what to do.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Action {
    pub span: Span,
    /// Which module instance to act on. An index-form reference counts
    /// module commands; an empty-name reference means the most recent one.
    pub module_var: Var,
    /// Export name to invoke or read.
    pub name: String,
    pub kind: ActionKind,
}

impl Action {
    /// Create an invocation with no arguments.
    pub fn invoke(module_var: Var, name: impl Into<String>, span: Span) -> Self {
        Action {
            span,
            module_var,
            name: name.into(),
            kind: ActionKind::Invoke(Vec::new()),
        }
    }

    /// Create a global read.
    pub fn get(module_var: Var, name: impl Into<String>, span: Span) -> Self {
        Action {
            span,
            module_var,
            name: name.into(),
            kind: ActionKind::Get,
        }
    }
}

impl Spanned for Action {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invoke_starts_with_no_args() {
        let action = Action::invoke(Var::name("$m", Span::DUMMY), "run", Span::DUMMY);
        let ActionKind::Invoke(args) = &action.kind else {
            panic!("expected an invocation");
        };
        assert!(args.is_empty());
        assert_eq!(action.name, "run");
    }

    #[test]
    fn invoke_carries_arguments() {
        let mut action = Action::invoke(Var::index(0, Span::DUMMY), "add", Span::DUMMY);
        action.kind = ActionKind::Invoke(vec![
            Const::i32(1, Span::DUMMY),
            Const::i32(2, Span::DUMMY),
        ]);
        let ActionKind::Invoke(args) = &action.kind else {
            panic!("expected an invocation");
        };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn get_reads_a_global() {
        let action = Action::get(Var::index(0, Span::DUMMY), "counter", Span::DUMMY);
        assert_eq!(action.kind, ActionKind::Get);
    }
}
