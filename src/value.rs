//! Runtime values.

use std::rc::Rc;

use ahash::AHashMap;

use crate::{ast::Block, intern::StringId};

/// A record value: an unordered set of uniquely-named fields.
///
/// Shared by `Rc` rather than cloned on assignment or argument passing —
/// there are no mutation operators in this language, so aliasing a record
/// is never observable and the clone is free.
pub type RecordValue = Rc<AHashMap<StringId, Value>>;

/// A list value, shared the same way as [`RecordValue`].
pub type ListValue = Rc<Vec<Value>>;

/// A closure: a function value captured together with the module
/// namespace it was defined in (not the caller's scope — the language is
/// lexically, not dynamically, scoped).
#[derive(Debug, Clone)]
pub struct Closure {
    pub name: StringId,
    pub params: Vec<(StringId, crate::types::Type)>,
    pub return_type: crate::types::Type,
    pub body: Rc<Block>,
    /// The module this function was defined in, used to resolve free
    /// identifiers and sibling function calls when the closure is invoked.
    pub home_module: StringId,
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    String(StringId),
    Boolean(bool),
    Unit,
    Record(RecordValue),
    List(ListValue),
    /// An enum variant, holding its declaring enum and variant names and
    /// an ordered payload (empty for a payload-less variant).
    EnumVariant {
        enum_module: StringId,
        enum_name: StringId,
        variant: StringId,
        payload: Vec<Value>,
    },
    Function(Rc<Closure>),
}

impl Value {
    /// The truthiness used by `if`/`while` conditions and the `and`/`or`
    /// operators' short-circuiting: `false`, `0`, and `""` are falsy,
    /// everything else (including every record, list, enum, and function
    /// value) is truthy.
    #[must_use]
    pub fn is_truthy(&self, interner: &crate::intern::Interner) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::String(s) => !interner.resolve(*s).is_empty(),
            _ => true,
        }
    }

    /// Renders a value the way `print` and the `+` string-coercion rule
    /// do: integers in decimal, booleans as `true`/`false`, strings
    /// verbatim, and `Unit` as `()`.
    #[must_use]
    pub fn display(&self, interner: &crate::intern::Interner) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => interner.resolve(*s).to_string(),
            Value::Unit => "()".to_string(),
            Value::List(items) => {
                let parts: Vec<_> = items.iter().map(|v| v.display(interner)).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Record(fields) => {
                let mut parts: Vec<_> = fields
                    .iter()
                    .map(|(k, v)| format!("{}: {}", interner.resolve(*k), v.display(interner)))
                    .collect();
                parts.sort();
                format!("{{{}}}", parts.join(", "))
            }
            Value::EnumVariant { variant, payload, .. } => {
                if payload.is_empty() {
                    interner.resolve(*variant).to_string()
                } else {
                    let parts: Vec<_> = payload.iter().map(|v| v.display(interner)).collect();
                    format!("{}({})", interner.resolve(*variant), parts.join(", "))
                }
            }
            Value::Function(closure) => format!("<fn {}>", interner.resolve(closure.name)),
        }
    }
}
