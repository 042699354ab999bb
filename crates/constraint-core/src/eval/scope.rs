//! Bound-variable scopes for quantifier lambdas.
//!
//! A frame is pushed for each element a quantifier visits and popped as soon
//! as the lambda body has been evaluated. Frames are searched innermost first,
//! so a nested lambda may shadow an outer parameter, and any parameter shadows
//! a context field of the same name.

use crate::value::Value;

/// A single frame of bindings. Lambdas bind one name, so a short vector
/// beats a hash map here.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    bindings: Vec<(String, Value)>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame holding one binding.
    pub fn with_binding(name: impl Into<String>, value: Value) -> Self {
        Self {
            bindings: vec![(name.into(), value)],
        }
    }

    /// Bind a name in this frame, replacing any previous binding of it.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.bindings.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.bindings.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// A stack of frames for nested lambda resolution (innermost last).
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Look up a name, searching from innermost to outermost frame.
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rebinding_replaces() {
        let mut frame = Frame::new();
        frame.bind("x", Value::from(1i64));
        frame.bind("x", Value::from(2i64));
        assert_eq!(frame.get("x"), Some(&Value::from(2i64)));
    }

    #[test]
    fn inner_frames_shadow_outer() {
        let mut scopes = ScopeStack::new();
        scopes.push(Frame::with_binding("x", Value::from("outer")));
        scopes.push(Frame::with_binding("x", Value::from("inner")));
        assert_eq!(scopes.resolve("x"), Some(&Value::from("inner")));

        scopes.pop();
        assert_eq!(scopes.resolve("x"), Some(&Value::from("outer")));
    }

    #[test]
    fn outer_bindings_remain_visible() {
        let mut scopes = ScopeStack::new();
        scopes.push(Frame::with_binding("order", Value::from("o1")));
        scopes.push(Frame::with_binding("line", Value::from("l1")));
        assert_eq!(scopes.resolve("order"), Some(&Value::from("o1")));
        assert_eq!(scopes.depth(), 2);
    }

    #[test]
    fn empty_stack_resolves_nothing() {
        let scopes = ScopeStack::new();
        assert!(scopes.is_empty());
        assert_eq!(scopes.resolve("x"), None);
    }
}
