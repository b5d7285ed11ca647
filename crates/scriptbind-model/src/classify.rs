//! Member classification.
//!
//! Decides what each field and method of a class declaration becomes in the
//! model, from its name and a few flags only. Nothing here resolves types or
//! touches other classes, so every rule can be tested in isolation.

use regex::Regex;
use thiserror::Error;

use scriptbind_core::{Access, Conventions, OverrideKind, RawField, RawMethod};

/// Error compiling naming conventions into patterns.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid naming convention pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Which accessor a method is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorRole {
    Get,
    Set,
}

/// Why a member was left out of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    NotPublic,
    /// Private or protected field without the accessor prefix.
    HiddenField,
    ExcludedPrefix,
    Destructor,
    Operator,
    /// `step`/`update` internals of the action family.
    ActionInternal,
}

/// What a member becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberClass {
    /// Public field read and written in place.
    PlainProperty(String),
    /// Prefixed field reachable only through accessors.
    AccessorProperty(String),
    RegularMethod,
    AccessorMethod {
        role: AccessorRole,
        property: String,
    },
    SingletonFactory,
    OverrideMethod(OverrideKind),
    Skipped(SkipReason),
}

/// Class-level facts method classification depends on.
#[derive(Debug, Clone, Copy)]
pub struct ClassContext<'a> {
    pub class_name: &'a str,
    /// The class is the action-family root or derives from it.
    pub in_action_family: bool,
}

/// Naming conventions compiled for classification.
#[derive(Debug, Clone)]
pub struct NamingRules {
    conventions: Conventions,
    field_pattern: Regex,
}

impl NamingRules {
    /// Compile `conventions`.
    pub fn new(conventions: Conventions) -> Result<Self, ModelError> {
        let prefix = regex::escape(&conventions.field_prefix);
        let pattern = if conventions.field_type_tags.is_empty() {
            format!(r"^{prefix}(?P<plain>\w+)$")
        } else {
            let tags = regex::escape(&conventions.field_type_tags);
            format!(r"^{prefix}(?:[{tags}](?P<tagged>[A-Z]\w*)|(?P<plain>\w+))$")
        };
        let field_pattern = Regex::new(&pattern)
            .map_err(|source| ModelError::InvalidPattern { pattern, source })?;
        Ok(Self {
            conventions,
            field_pattern,
        })
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    // ==========================================================================
    // Fields
    // ==========================================================================

    /// Property name decoded from a prefixed field name (`m_nCount` -> `count`).
    pub fn decode_field_name(&self, field_name: &str) -> Option<String> {
        if self.conventions.field_prefix.is_empty() {
            return None;
        }
        let captures = self.field_pattern.captures(field_name)?;
        let decoded = captures
            .name("tagged")
            .or_else(|| captures.name("plain"))?
            .as_str();
        Some(uncapitalize(decoded))
    }

    /// Classify a field.
    ///
    /// Prefixed fields become accessor properties at any access level.
    pub fn classify_field(&self, field: &RawField) -> MemberClass {
        if let Some(name) = self.decode_field_name(&field.name) {
            return MemberClass::AccessorProperty(name);
        }
        if field.access.is_public() && !field.name.is_empty() {
            return MemberClass::PlainProperty(field.name.clone());
        }
        MemberClass::Skipped(SkipReason::HiddenField)
    }

    // ==========================================================================
    // Methods
    // ==========================================================================

    /// Classify a method.
    ///
    /// `has_property` reports whether a property of the given name exists;
    /// `get`/`set` methods only become accessors of existing properties.
    pub fn classify_method(
        &self,
        ctx: ClassContext<'_>,
        method: &RawMethod,
        has_property: impl Fn(&str) -> bool,
    ) -> MemberClass {
        let conventions = &self.conventions;
        let name = method.name.as_str();

        if method.access != Access::Public {
            return MemberClass::Skipped(SkipReason::NotPublic);
        }
        if name.starts_with('~') {
            return MemberClass::Skipped(SkipReason::Destructor);
        }
        if name.starts_with("operator") {
            return MemberClass::Skipped(SkipReason::Operator);
        }
        if conventions
            .excluded_method_prefixes
            .iter()
            .any(|p| name.starts_with(p.as_str()))
        {
            return MemberClass::Skipped(SkipReason::ExcludedPrefix);
        }
        if ctx.in_action_family
            && conventions
                .action_excluded_words
                .iter()
                .any(|w| name.contains(w.as_str()))
        {
            return MemberClass::Skipped(SkipReason::ActionInternal);
        }

        if method.is_static && self.is_singleton_factory(ctx.class_name, name) {
            return MemberClass::SingletonFactory;
        }
        if let Some(kind) = self.override_kind(name) {
            return MemberClass::OverrideMethod(kind);
        }
        if let Some((role, property)) = accessor_target(name) {
            let arity = match role {
                AccessorRole::Get => 0,
                AccessorRole::Set => 1,
            };
            if method.num_args == arity && !method.is_static && has_property(&property) {
                return MemberClass::AccessorMethod { role, property };
            }
        }
        MemberClass::RegularMethod
    }

    /// `shared<ClassName>` (case-insensitive, library prefix stripped).
    pub fn is_singleton_factory(&self, class_name: &str, method_name: &str) -> bool {
        let prefix = self.conventions.singleton_prefix.to_lowercase();
        let lowered = method_name.to_lowercase();
        let Some(rest) = lowered.strip_prefix(prefix.as_str()) else {
            return false;
        };
        let stem = self.conventions.strip_class_prefix(class_name).to_lowercase();
        !stem.is_empty() && rest.contains(stem.as_str())
    }

    /// Override kind of a method name, if it is an event hook.
    pub fn override_kind(&self, name: &str) -> Option<OverrideKind> {
        let conventions = &self.conventions;
        if name == conventions.touch_began_method {
            return Some(OverrideKind::TouchBegan);
        }
        if !conventions.touches_prefix.is_empty() && name.starts_with(&conventions.touches_prefix) {
            return Some(OverrideKind::Touches);
        }
        if !conventions.touch_prefix.is_empty() && name.starts_with(&conventions.touch_prefix) {
            return Some(OverrideKind::Touch);
        }
        if let Some(rest) = name.strip_prefix(conventions.notification_prefix.as_str()) {
            // onEnter, not one()
            if !conventions.notification_prefix.is_empty()
                && rest.starts_with(|c: char| c.is_ascii_uppercase())
            {
                return Some(OverrideKind::Notification);
            }
        }
        if name == conventions.update_method {
            return Some(OverrideKind::Update);
        }
        None
    }
}

/// Split `getFoo`/`setFoo` into its role and property name (`foo`).
pub fn accessor_target(name: &str) -> Option<(AccessorRole, String)> {
    let (role, rest) = if let Some(rest) = name.strip_prefix("get") {
        (AccessorRole::Get, rest)
    } else if let Some(rest) = name.strip_prefix("set") {
        (AccessorRole::Set, rest)
    } else {
        return None;
    };
    if rest.is_empty() || !rest.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some((role, uncapitalize(rest)))
}

fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
