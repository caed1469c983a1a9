//! Named-node, named-attribute document tree.
//!
//! The structured-text parser that produces these trees lives outside this
//! workspace; loaders consume the tree through the typed accessors below and
//! produce save-state documents through the builder methods.

use std::path::{Path, PathBuf};

use crate::error::{Result, TreeError};

/// Characters allowed in a restricted attribute value (enum strings and
/// relative asset paths).
const RESTRICTED_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789._-/";

/// A single named attribute with a string payload and typed accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw string value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Boolean value; accepts `true`/`false` and `1`/`0`.
    pub fn bool_value(&self) -> Result<bool> {
        match self.value.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(self.invalid("expected a boolean")),
        }
    }

    /// Integer value.
    pub fn int_value(&self) -> Result<i32> {
        self.value
            .trim()
            .parse::<i32>()
            .map_err(|_| self.invalid("expected an integer"))
    }

    /// Float value.
    pub fn float_value(&self) -> Result<f32> {
        self.value
            .trim()
            .parse::<f32>()
            .map_err(|_| self.invalid("expected a float"))
    }

    /// Float value clamped to `[min, max]`. Out-of-range document input is
    /// clamped, not rejected.
    pub fn float_value_clamped(&self, min: f32, max: f32) -> Result<f32> {
        Ok(self.float_value()?.clamp(min, max))
    }

    /// Restricted string value: lowercase alphanumerics plus `._-/`, used
    /// for enum-bearing strings and relative asset paths.
    pub fn restricted_value(&self) -> Result<&str> {
        if self.value.is_empty() || !self.value.chars().all(|c| RESTRICTED_CHARS.contains(c)) {
            return Err(self.invalid("expected a restricted string"));
        }
        Ok(&self.value)
    }

    /// Restricted value resolved against a base directory.
    pub fn path_value(&self, base_dir: &Path) -> Result<PathBuf> {
        Ok(base_dir.join(self.restricted_value()?))
    }

    fn invalid(&self, reason: &str) -> TreeError {
        TreeError::InvalidValue {
            attribute: self.name.clone(),
            value: self.value.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A named node with ordered attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ----- attribute access -----

    pub fn attribute(&self, name: &str) -> Result<&Attribute> {
        self.try_attribute(name)
            .ok_or_else(|| TreeError::MissingAttribute {
                node: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    pub fn try_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    // ----- child access -----

    pub fn child(&self, name: &str) -> Result<&TreeNode> {
        self.try_child(name).ok_or_else(|| TreeError::MissingChild {
            node: self.name.clone(),
            child: name.to_string(),
        })
    }

    pub fn try_child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.try_child(name).is_some()
    }

    /// The `index`-th child named `name`, in document order.
    pub fn child_at(&self, name: &str, index: usize) -> Result<&TreeNode> {
        self.children_named(name)
            .nth(index)
            .ok_or_else(|| TreeError::MissingChildAt {
                node: self.name.clone(),
                child: name.to_string(),
                index,
            })
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn children_named<'a, 'b>(&'a self, name: &'b str) -> impl Iterator<Item = &'a TreeNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    // ----- builder side (save-state documents) -----

    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute::new(name, value));
    }

    /// Fixed 6 decimal digits, sufficient for bit-stable round-trips at the
    /// engine's tolerance.
    pub fn add_attribute_f32(&mut self, name: impl Into<String>, value: f32) {
        self.add_attribute(name, format!("{value:.6}"));
    }

    pub fn add_attribute_i32(&mut self, name: impl Into<String>, value: i32) {
        self.add_attribute(name, value.to_string());
    }

    /// Booleans are serialized as `0`/`1` in save-state documents.
    pub fn add_attribute_bool(&mut self, name: impl Into<String>, value: bool) {
        self.add_attribute(name, if value { "1" } else { "0" });
    }

    /// Appends an empty child and returns a handle to fill it in.
    pub fn add_child(&mut self, name: impl Into<String>) -> &mut TreeNode {
        let index = self.children.len();
        self.children.push(TreeNode::new(name));
        &mut self.children[index]
    }

    pub fn push_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }
}

/// A node paired with an optional base node it overrides.
///
/// Loaders resolve attributes and children against the override node first
/// and fall back to the base node, which is how a per-placement document
/// layers on top of the effect definition it references. Resolution is a
/// single explicit level; resolved children are plain nodes from whichever
/// document supplied them.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedNode<'a> {
    over: &'a TreeNode,
    base: Option<&'a TreeNode>,
}

impl<'a> ResolvedNode<'a> {
    /// A plain node with nothing to fall back to.
    pub fn new(node: &'a TreeNode) -> Self {
        Self {
            over: node,
            base: None,
        }
    }

    /// An override node layered over a base node.
    pub fn with_base(over: &'a TreeNode, base: &'a TreeNode) -> Self {
        Self {
            over,
            base: Some(base),
        }
    }

    pub fn name(&self) -> &str {
        self.over.name()
    }

    pub fn attribute(&self, name: &str) -> Result<&'a Attribute> {
        self.try_attribute(name)
            .ok_or_else(|| TreeError::MissingAttribute {
                node: self.over.name().to_string(),
                attribute: name.to_string(),
            })
    }

    pub fn try_attribute(&self, name: &str) -> Option<&'a Attribute> {
        self.over
            .try_attribute(name)
            .or_else(|| self.base.and_then(|b| b.try_attribute(name)))
    }

    pub fn child(&self, name: &str) -> Result<&'a TreeNode> {
        self.try_child(name).ok_or_else(|| TreeError::MissingChild {
            node: self.over.name().to_string(),
            child: name.to_string(),
        })
    }

    pub fn try_child(&self, name: &str) -> Option<&'a TreeNode> {
        self.over
            .try_child(name)
            .or_else(|| self.base.and_then(|b| b.try_child(name)))
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.try_child(name).is_some()
    }
}
