/// Binding-call matching.
///
/// The DSL has no declarations.  A variable is "defined" by a call such as
/// `set("name", value)` whose first argument is the variable name as a
/// string literal.  This module recognises those calls and ranks the two
/// binding forms.
use std::collections::HashSet;

use crate::parser::SyntaxNode;
use crate::types::NodeKind;

/// One recognised binding-call shape.  Rules are consulted in ascending
/// `priority`; the first rule with any match is the whole answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingRule {
    pub callee: &'static str,
    pub priority: u8,
}

/// `set` is the canonical binding form.  `setr` is only consulted when no
/// `set` call binds the name, even if a `setr` comes first in the document.
pub const BINDING_RULES: [BindingRule; 2] = [
    BindingRule {
        callee: "set",
        priority: 0,
    },
    BindingRule {
        callee: "setr",
        priority: 1,
    },
];

/// Number of non-argument children in front of the first argument of an
/// argument list: the opening `(`.
pub const LEADING_DELIMITERS: usize = 1;

/// The callee name of a call node, e.g. `"set"` for `set("x", 1)`.
pub fn callee_name<'t>(call: SyntaxNode<'t>) -> Option<&'t str> {
    if call.kind() != NodeKind::Call {
        return None;
    }
    call.named_child(0)
        .filter(|callee| callee.kind() == NodeKind::Identifier)
        .map(|callee| callee.text())
}

/// The first positional argument of a call node.
///
/// Returns `None` for anything that does not have the expected shape:
/// not a call, no argument list, an argument list that does not open with
/// `(`, or an empty list (`set()`), whose child after `(` is the closing
/// `)`.
pub fn first_argument_of<'t>(call: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if call.kind() != NodeKind::Call {
        return None;
    }
    let arguments = call
        .named_child(1)
        .filter(|node| node.kind() == NodeKind::Arguments)?;

    let opening = arguments.child(0)?;
    if opening.is_named() {
        return None;
    }

    arguments
        .child(LEADING_DELIMITERS)
        .filter(|first| first.is_named())
}

/// The string literal a call binds, if it is a binding-shaped call at all.
fn bound_name<'t>(call: SyntaxNode<'t>) -> Option<&'t str> {
    first_argument_of(call)
        .filter(|arg| arg.kind() == NodeKind::String)
        .map(|arg| arg.text())
}

/// All calls binding `varname`, in document order, under the first rule
/// (by priority) that produces any.  Empty when nothing binds it.
pub fn find_binding_calls<'t>(root: SyntaxNode<'t>, varname: &str) -> Vec<SyntaxNode<'t>> {
    let calls = root.descendants_of_kind(NodeKind::Call);

    let mut rules = BINDING_RULES;
    rules.sort_by_key(|rule| rule.priority);

    for rule in rules {
        let matches: Vec<SyntaxNode<'t>> = calls
            .iter()
            .copied()
            .filter(|&call| callee_name(call) == Some(rule.callee))
            .filter(|&call| bound_name(call) == Some(varname))
            .collect();

        if !matches.is_empty() {
            tracing::trace!(callee = rule.callee, count = matches.len(), "binding rule matched");
            return matches;
        }
    }

    Vec::new()
}

/// Every name bound by any binding rule anywhere under `root`.
pub fn bound_names<'t>(root: SyntaxNode<'t>) -> HashSet<&'t str> {
    root.descendants_of_kind(NodeKind::Call)
        .into_iter()
        .filter(|&call| {
            callee_name(call).is_some_and(|name| BINDING_RULES.iter().any(|r| r.callee == name))
        })
        .filter_map(bound_name)
        .collect()
}
