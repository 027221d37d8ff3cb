#![allow(dead_code)]

use gpdispatch::{Kind, Kinded};

// ============================================================================
// Test Kinds
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Kind)]
pub enum ValueType {
    #[kind(root)]
    #[kind(name = "object")]
    Object,
    #[kind(name = "int")]
    Int,
    #[kind(extends(Int), name = "bool")]
    Bool,
    #[kind(name = "str")]
    Str,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    None,
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl Kinded for Value {
    type Kind = ValueType;

    fn kind(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Bool(_) => ValueType::Bool,
            Value::Str(_) => ValueType::Str,
            Value::None => ValueType::Object,
        }
    }
}

// ============================================================================
// Test Implementations
// ============================================================================

pub type Describe = fn(&Value, &Value) -> String;

pub fn f(a: &Value, b: &Value) -> String {
    format!("f({a:?}, {b:?})")
}

pub fn g(a: &Value, b: &Value) -> String {
    format!("g({a:?}, {b:?})")
}

pub fn fallback(_: &Value, _: &Value) -> String {
    "fallback".to_string()
}
