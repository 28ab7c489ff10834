/// Goto definition support.
///
/// This module resolves "go to definition" requests on variable names.
/// The DSL has no scopes or declarations, so a definition is inferred from
/// call-site conventions: a variable is bound by `set("name", value)`, or
/// by `setr("name", value)` when no `set` binds it.
///
/// - [`binding`]: Binding-call recognition — callee names, the
///   first-argument helper, and the ordered `set`/`setr` rule table.
/// - [`resolve`]: The query itself — position to node, the string-literal
///   guard, and conversion of matches into zero-width locations.
pub mod binding;
mod resolve;

pub use resolve::find_definition;
