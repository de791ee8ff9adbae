//! emberc-object — the runtime value model shared by the compiler (as
//! constants) and the VM (as stack values), spec §2 item 5 / §3.
//!
//! `Value` is a tagged sum of every runtime type Ember programs can
//! produce. Compound variants (`String`, `Array`, `Hash`, `CompiledFunction`)
//! wrap their payload in [`Rc`] so pushing/popping them on the VM's operand
//! stack is a cheap pointer clone rather than a deep copy — the spec's
//! note that "values are reference-counted ... by host means" is exactly
//! this.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use emberc_code::Instructions;

/// A runtime value. `Clone` is O(1) for every variant.
#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Hash(Rc<FxHashMap<HashKey, HashPair>>),
    CompiledFunction(Rc<CompiledFunction>),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::CompiledFunction(_) => "COMPILED_FUNCTION",
            Value::Null => "NULL",
        }
    }

    /// Truthiness as the evaluator would test it — not the rule the VM's
    /// `JumpNotTruthy` uses (spec §4.7: the two rules deliberately
    /// disagree on `Integer(0)`; the VM's simpler rule lives in
    /// `emberc-vm` and is the one tests depend on).
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null | Value::Integer(0))
    }

    /// Hashable values produce a [`HashKey`]; everything else is
    /// unusable as a hash-literal key or an index-expression key (spec
    /// §3, §4.6, §7: "unusable as hash key").
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(n) => Some(HashKey {
                type_tag: HashKeyType::Integer,
                value: *n as u64,
            }),
            Value::Boolean(b) => Some(HashKey {
                type_tag: HashKeyType::Boolean,
                value: *b as u64,
            }),
            Value::String(s) => {
                let mut hasher = rustc_hash::FxHasher::default();
                s.hash(&mut hasher);
                Some(HashKey {
                    type_tag: HashKeyType::String,
                    value: hasher.finish(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(elems) => {
                write!(f, "[")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, "]")
            }
            Value::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, pair) in pairs.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Value::CompiledFunction(func) => write!(f, "CompiledFunction[{:p}]", Rc::as_ptr(func)),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Discriminant for [`HashKey`] — the type tag in spec §3's
/// `HashKey = {typeTag, 64-bit value}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashKeyType {
    Integer,
    Boolean,
    String,
}

/// A compact, hashable key derived from a [`Value`] (spec §3).
/// `Integer`/`Boolean`/`String` are hashable; everything else is not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub type_tag: HashKeyType,
    pub value: u64,
}

/// The original key/value pair a [`HashKey`] was derived from — needed so
/// `Hash`'s `Display` and `emberc-vm`'s `Index` opcode can recover the
/// actual key value, not just its hash.
#[derive(Clone, Debug)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// A function compiled to bytecode (spec §3 runtime value, §4.5 *FnLit*).
#[derive(Debug)]
pub struct CompiledFunction {
    pub instructions: Instructions,
    pub num_locals: usize,
    pub num_params: usize,
}
