//! Method descriptors and overload sets.

use crate::TypeDescriptor;

/// A resolved parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// Declared name; drives the pointer fallback table.
    pub name: String,
    pub data_type: TypeDescriptor,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, data_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A resolved method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub is_static: bool,
    /// Declared argument count; the arity accepted by generated dispatch.
    pub num_args: usize,
    pub params: Vec<ParamDescriptor>,
    pub return_type: TypeDescriptor,
}

impl MethodDescriptor {
    /// Create an instance method with no parameters.
    pub fn new(name: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            num_args: 0,
            params: Vec::new(),
            return_type,
        }
    }

    /// Add a parameter (also bumps `num_args`).
    pub fn with_param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self.num_args = self.params.len();
        self
    }

    /// Mark as static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Type of the first parameter, if any. Handy for setters.
    pub fn first_param_type(&self) -> Option<&TypeDescriptor> {
        self.params.first().map(|p| &p.data_type)
    }

    /// Check whether every parameter and the return type resolved.
    pub fn is_fully_resolved(&self) -> bool {
        self.return_type.is_resolved() && self.params.iter().all(|p| p.data_type.is_resolved())
    }
}

/// Kind of native virtual a script may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideKind {
    /// `on*` notifications; arguments are forwarded, the result ignored.
    Notification,
    /// A single touch event; the touch is forwarded as a borrowed handle.
    Touch,
    /// A touch collection; forwarded as an array of borrowed handles.
    Touches,
    /// The touch-began hook, whose script result becomes the native result.
    TouchBegan,
    /// Per-frame update taking a time delta.
    Update,
}

impl OverrideKind {
    /// Check whether the forwarded call's boolean result is returned natively.
    pub fn returns_script_result(self) -> bool {
        self == OverrideKind::TouchBegan
    }
}

/// Role of an overload set in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Callable from script through a dispatch routine.
    Regular,
    /// The static factory of a singleton class; also dispatched.
    SingletonFactory,
    /// Forwarded from native code into script, never dispatched.
    Override(OverrideKind),
}

impl MethodKind {
    /// Check whether script code calls this method through dispatch.
    pub fn is_dispatched(self) -> bool {
        !matches!(self, MethodKind::Override(_))
    }
}

/// All overloads sharing one name.
///
/// Only the first-declared overload drives generated dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadSet {
    pub kind: MethodKind,
    pub overloads: Vec<MethodDescriptor>,
}

impl OverloadSet {
    pub fn new(kind: MethodKind, first: MethodDescriptor) -> Self {
        Self {
            kind,
            overloads: vec![first],
        }
    }

    /// The overload used for dispatch.
    pub fn first(&self) -> &MethodDescriptor {
        // An overload set is never constructed empty.
        &self.overloads[0]
    }

    pub fn push(&mut self, overload: MethodDescriptor) {
        self.overloads.push(overload);
    }

    pub fn len(&self) -> usize {
        self.overloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overloads.is_empty()
    }
}
