//! Naming conventions of the bound library.
//!
//! The extractor classifies members by name: which fields back accessor
//! properties, which static method is a singleton factory, which methods are
//! event hooks a script may override. Those rules depend on the library's
//! house style, so they live here as data. The defaults describe a
//! cocos2d-x style library (`CC` class prefix, `m_nCount` fields, `on*` and
//! `ccTouch*` hooks).

use serde::{Deserialize, Serialize};

/// Library naming conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Class name prefix stripped before singleton matching.
    pub class_prefix: String,
    /// Prefix marking fields that back accessor properties.
    pub field_prefix: String,
    /// Single-letter type tags allowed between the field prefix and the name.
    pub field_type_tags: String,
    /// Universal root class; bindings never wire a prototype to it.
    pub root_class: Option<String>,

    // === Singletons ===
    /// Prefix of the static singleton factory (followed by the class name).
    pub singleton_prefix: String,

    // === Excluded Methods ===
    /// Methods starting with any of these are never bound.
    pub excluded_method_prefixes: Vec<String>,
    /// Root of the action family.
    pub action_family_root: String,
    /// Words excluding a method inside the action family.
    pub action_excluded_words: Vec<String>,

    // === Overrides ===
    /// Prefix of notification hooks (`onEnter`, `onExit`, ...).
    pub notification_prefix: String,
    /// Prefix of single-touch hooks.
    pub touch_prefix: String,
    /// Prefix of multi-touch hooks; checked before `touch_prefix`.
    pub touches_prefix: String,
    /// The touch hook whose script result is returned to native code.
    pub touch_began_method: String,
    /// Native class of a touch.
    pub touch_class: String,
    /// Iterator type over a touch set.
    pub touch_set_iterator: String,

    // === Update ===
    /// Name of the per-frame update hook.
    pub update_method: String,
    /// Methods with this prefix opt a class into the update override.
    pub update_trigger_prefix: String,
    /// Classes that are or derive from this one get the update override.
    pub update_family_root: String,
    /// Native type of the update time delta.
    pub update_delta_type: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            class_prefix: "CC".to_string(),
            field_prefix: "m_".to_string(),
            field_type_tags: "nfpbtus".to_string(),
            root_class: Some("CCObject".to_string()),
            singleton_prefix: "shared".to_string(),
            excluded_method_prefixes: ["node", "description", "copyWithZone", "mutableCopy"]
                .map(String::from)
                .to_vec(),
            action_family_root: "CCAction".to_string(),
            action_excluded_words: ["step", "update"].map(String::from).to_vec(),
            notification_prefix: "on".to_string(),
            touch_prefix: "ccTouch".to_string(),
            touches_prefix: "ccTouches".to_string(),
            touch_began_method: "ccTouchBegan".to_string(),
            touch_class: "CCTouch".to_string(),
            touch_set_iterator: "CCSetIterator".to_string(),
            update_method: "update".to_string(),
            update_trigger_prefix: "scheduleUpdate".to_string(),
            update_family_root: "CCNode".to_string(),
            update_delta_type: "ccTime".to_string(),
        }
    }
}

impl Conventions {
    /// Class name with the library prefix removed.
    pub fn strip_class_prefix<'a>(&self, class_name: &'a str) -> &'a str {
        if self.class_prefix.is_empty() {
            return class_name;
        }
        class_name
            .strip_prefix(self.class_prefix.as_str())
            .unwrap_or(class_name)
    }

    /// Check whether `class_name` is the universal root class.
    pub fn is_root_class(&self, class_name: &str) -> bool {
        self.root_class.as_deref() == Some(class_name)
    }
}
