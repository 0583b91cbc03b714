//! Dynamic element type for heterogeneous pipelines.
//!
//! Most queries run over plain Rust types and never touch this module. `Value`
//! exists for data whose shape is only known at runtime (decoded JSON, rows
//! from a loosely typed source). Its capabilities are decided per element:
//! lists cannot be hashed, and values of different kinds have no order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::key::Hashable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Immutable sequence; hashable when all of its members are.
    Tuple(Vec<Value>),
    /// Mutable-by-convention sequence; never hashable.
    List(Vec<Value>),
}

impl Value {
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Stable lower-case name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
        }
    }

    pub fn is_hashable(&self) -> bool {
        self.unhashable_part().is_none()
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Order two values, failing with `Error::Incomparable` where
    /// `partial_cmp` has no answer.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering> {
        self.partial_cmp(other).ok_or_else(|| {
            Error::Incomparable(format!(
                "cannot order {} ({}) against {} ({})",
                self,
                self.kind(),
                other,
                other.kind()
            ))
        })
    }

    fn unhashable_part(&self) -> Option<&Value> {
        match self {
            Value::List(_) => Some(self),
            Value::Tuple(items) => items.iter().find_map(Value::unhashable_part),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => float_as_int(*b) == Some(*a),
            (Str(a), Str(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Tuple(a), Tuple(b)) | (List(a), List(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    /// Same-kind values order naturally; ints and floats order numerically;
    /// tuples and lists order lexicographically. Anything else, and NaN, has
    /// no order.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Bool(a), Bool(b)) => a.partial_cmp(b),
            (Int(a), Int(b)) => a.partial_cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Int(a), Float(b)) => int_float_cmp(*a, *b),
            (Float(a), Int(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            (Str(a), Str(b)) => a.partial_cmp(b),
            (Bytes(a), Bytes(b)) => a.partial_cmp(b),
            (Tuple(a), Tuple(b)) | (List(a), List(b)) => seq_partial_cmp(a, b),
            _ => None,
        }
    }
}

/// Exact ordering of an integer against a float, without rounding the integer
/// through `f64`.
fn int_float_cmp(i: i64, x: f64) -> Option<Ordering> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if x.is_nan() {
        return None;
    }
    if x >= LIMIT {
        return Some(Ordering::Less);
    }
    if x < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = x.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(x - whole)),
        other => Some(other),
    }
}

/// Lexicographic comparison that gives up on the first incomparable pair.
fn seq_partial_cmp(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.partial_cmp(y)? {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(a.len().cmp(&b.len()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "'{s}'"),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

/// A `Value` that passed the hashability check.
///
/// Equality here is reflexive (NaN equals NaN) and consistent with `Hash`:
/// an integral float and the equal int are the same key.
#[derive(Debug, Clone)]
pub struct ValueKey(Value);

impl ValueKey {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<ValueKey> for Value {
    fn from(key: ValueKey) -> Self {
        key.0
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for ValueKey {
    fn eq(&self, other: &Self) -> bool {
        key_eq(&self.0, &other.0)
    }
}

impl Eq for ValueKey {}

impl Hash for ValueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

impl Hashable for Value {
    type Key = ValueKey;

    fn hash_key(&self) -> Result<ValueKey> {
        if let Some(part) = self.unhashable_part() {
            return Err(Error::Unhashable(format!(
                "{} of kind '{}' cannot be hashed",
                part,
                part.kind()
            )));
        }
        Ok(ValueKey(self.clone()))
    }
}

fn key_eq(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Float(x), Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Int(i), Float(x)) | (Float(x), Int(i)) => float_as_int(*x) == Some(*i),
        (Tuple(x), Tuple(y)) | (List(x), List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| key_eq(p, q))
        }
        _ => a == b,
    }
}

/// Exact integral value of `x`, if it has one representable as `i64`.
fn float_as_int(x: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x) {
        Some(x as i64)
    } else {
        None
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    use Value::*;

    // Write a kind discriminant first; ints and integral floats share one.
    match value {
        Null => 0u8.hash(state),
        Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Int(i) => {
            2u8.hash(state);
            i.hash(state);
        }
        Float(x) => match float_as_int(*x) {
            Some(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            None => {
                3u8.hash(state);
                let bits = if x.is_nan() { f64::NAN.to_bits() } else { x.to_bits() };
                bits.hash(state);
            }
        },
        Str(s) => {
            4u8.hash(state);
            s.hash(state);
        }
        Bytes(b) => {
            5u8.hash(state);
            b.hash(state);
        }
        Tuple(items) | List(items) => {
            6u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
    }
}
