//! Property descriptors.

use crate::TypeDescriptor;

use super::MethodDescriptor;

/// A scripting-visible property.
///
/// Direct properties come from public fields and are read and written in
/// place. Accessor properties come from prefixed private fields and must go
/// through their getter/setter; either accessor may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Declared field type.
    pub data_type: TypeDescriptor,
    /// Name of the backing field (used for direct access).
    pub field_name: String,
    pub getter: Option<MethodDescriptor>,
    pub setter: Option<MethodDescriptor>,
    /// Raw field access is disallowed.
    pub requires_accessor: bool,
}

impl PropertyDescriptor {
    /// A property read and written straight through the public field.
    pub fn direct(name: impl Into<String>, data_type: TypeDescriptor) -> Self {
        let name = name.into();
        Self {
            field_name: name.clone(),
            name,
            data_type,
            getter: None,
            setter: None,
            requires_accessor: false,
        }
    }

    /// A property that must go through accessors.
    pub fn accessor(
        name: impl Into<String>,
        field_name: impl Into<String>,
        data_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            field_name: field_name.into(),
            getter: None,
            setter: None,
            requires_accessor: true,
        }
    }

    pub fn with_getter(mut self, getter: MethodDescriptor) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn with_setter(mut self, setter: MethodDescriptor) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Check whether generated code may read this property.
    pub fn is_readable(&self) -> bool {
        !self.requires_accessor || self.getter.is_some()
    }

    /// Check whether generated code may write this property.
    pub fn is_writable(&self) -> bool {
        !self.requires_accessor || self.setter.is_some()
    }

    /// Type seen when reading: the getter's return type for accessor properties.
    pub fn read_type(&self) -> &TypeDescriptor {
        match &self.getter {
            Some(getter) if self.requires_accessor => &getter.return_type,
            _ => &self.data_type,
        }
    }

    /// Type expected when writing: the setter's parameter type for accessor properties.
    pub fn write_type(&self) -> &TypeDescriptor {
        match &self.setter {
            Some(setter) if self.requires_accessor => {
                setter.first_param_type().unwrap_or(&self.data_type)
            }
            _ => &self.data_type,
        }
    }

    /// Identifier of this property in the generated enumeration.
    pub fn enum_ident(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => format!("k{}{}", first.to_uppercase(), chars.as_str()),
            None => "k".to_string(),
        }
    }
}
