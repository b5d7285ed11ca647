//! Ownership tags carried by scripting-side handles.

use crate::TypeDescriptor;

/// Whether destroying a script handle frees the native object behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The handle owns a heap copy; the finalizer deletes it.
    Owned,
    /// The object lives elsewhere; the finalizer only frees the handle.
    Borrowed,
}

impl Ownership {
    /// Ownership of a native value crossing into script.
    ///
    /// Values and references are copied onto the heap and owned; live
    /// pointers are borrowed.
    pub fn for_value(desc: &TypeDescriptor) -> Self {
        if desc.is_pointer {
            Ownership::Borrowed
        } else {
            Ownership::Owned
        }
    }

    /// Handle flag constant written into generated code.
    pub fn shell_flag(self) -> &'static str {
        match self {
            Ownership::Owned => "kPointerOwned",
            Ownership::Borrowed => "kPointerTemporary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TargetKind;

    #[test]
    fn values_are_owned_pointers_borrowed() {
        assert_eq!(
            Ownership::for_value(&TypeDescriptor::class("CCPoint")),
            Ownership::Owned
        );
        assert_eq!(
            Ownership::for_value(&TypeDescriptor::reference(TargetKind::Class, "CCSize")),
            Ownership::Owned
        );
        assert_eq!(
            Ownership::for_value(&TypeDescriptor::pointer(TargetKind::Class, "CCNode")),
            Ownership::Borrowed
        );
    }

    #[test]
    fn shell_flags() {
        assert_eq!(Ownership::Owned.shell_flag(), "kPointerOwned");
        assert_eq!(Ownership::Borrowed.shell_flag(), "kPointerTemporary");
    }
}
