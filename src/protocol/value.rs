//! Variant values
//!
//! The in-memory form of every value kind the wire format can carry.

use serde::Serialize;

use super::types::{padded_len, VariantType, HEADER_WIDTH};

/// Three-component float vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Components in wire order
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// 3x3 basis, stored as three rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Basis {
    pub rows: [Vector3; 3],
}

impl Basis {
    pub const IDENTITY: Basis = Basis {
        rows: [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
    };

    pub const fn from_rows(x: Vector3, y: Vector3, z: Vector3) -> Self {
        Self { rows: [x, y, z] }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Basis plus origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Transform {
    pub basis: Basis,
    pub origin: Vector3,
}

impl Transform {
    pub const fn new(basis: Basis, origin: Vector3) -> Self {
        Self { basis, origin }
    }

    /// Identity rotation at `origin`
    pub const fn from_origin(origin: Vector3) -> Self {
        Self {
            basis: Basis::IDENTITY,
            origin,
        }
    }
}

/// Insertion-ordered key/value map.
///
/// Entries are encoded in insertion order, so identical dictionaries always
/// produce identical bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: Vec<(Variant, Variant)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Variant>, value: impl Into<Variant>) -> Option<Variant> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Variant) -> Option<&Variant> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Variant, &Variant)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<Variant>, V: Into<Variant>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// A self-describing wire value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Variant {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Vector3(Vector3),
    Basis(Basis),
    Transform(Transform),
    Dictionary(Dictionary),
    Array(Vec<Variant>),
    ByteArray(Vec<u8>),
}

impl Variant {
    /// The tag this value is written with
    pub fn variant_type(&self) -> VariantType {
        match self {
            Variant::Bool(_) => VariantType::Bool,
            Variant::Int(_) => VariantType::Int,
            Variant::Float(_) => VariantType::Float,
            Variant::String(_) => VariantType::String,
            Variant::Vector3(_) => VariantType::Vector3,
            Variant::Basis(_) => VariantType::Basis,
            Variant::Transform(_) => VariantType::Transform,
            Variant::Dictionary(_) => VariantType::Dictionary,
            Variant::Array(_) => VariantType::Array,
            Variant::ByteArray(_) => VariantType::ByteArray,
        }
    }

    /// Exact size of this value on the wire, tag included
    pub fn encoded_len(&self) -> usize {
        HEADER_WIDTH
            + match self {
                Variant::Bool(_) | Variant::Int(_) | Variant::Float(_) => 4,
                Variant::String(s) => 4 + padded_len(s.len()),
                Variant::Vector3(_) => 12,
                Variant::Basis(_) => 36,
                Variant::Transform(_) => 48,
                Variant::Dictionary(dict) => {
                    4 + dict
                        .iter()
                        .map(|(k, v)| k.encoded_len() + v.encoded_len())
                        .sum::<usize>()
                }
                Variant::Array(items) => 4 + items.iter().map(Variant::encoded_len).sum::<usize>(),
                Variant::ByteArray(bytes) => 4 + bytes.len(),
            }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Variant::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Variant::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<Vector3> {
        match self {
            Variant::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Variant::Transform(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Variant::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Variant::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Variant::ByteArray(b) => Some(b),
            _ => None,
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int(v)
    }
}

impl From<f32> for Variant {
    fn from(v: f32) -> Self {
        Variant::Float(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(v.to_string())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(v)
    }
}

impl From<Vector3> for Variant {
    fn from(v: Vector3) -> Self {
        Variant::Vector3(v)
    }
}

impl From<Basis> for Variant {
    fn from(v: Basis) -> Self {
        Variant::Basis(v)
    }
}

impl From<Transform> for Variant {
    fn from(v: Transform) -> Self {
        Variant::Transform(v)
    }
}

impl From<Dictionary> for Variant {
    fn from(v: Dictionary) -> Self {
        Variant::Dictionary(v)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(v: Vec<Variant>) -> Self {
        Variant::Array(v)
    }
}

impl From<Vec<u8>> for Variant {
    fn from(v: Vec<u8>) -> Self {
        Variant::ByteArray(v)
    }
}
