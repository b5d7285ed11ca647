//! Generator configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! allow_list = ["CCNode", "CCSprite"]
//! output_prefix = "cocos_bindings"
//!
//! [conventions]
//! class_prefix = "CC"
//!
//! [[pointer_fallbacks]]
//! param = "list"
//! native_type = "CCArray"
//! ```

use std::path::Path;

use scriptbind_codegen::FallbackTable;
use scriptbind_core::Conventions;
use serde::{Deserialize, Serialize};

use crate::error::BindError;

/// Classes bound when no allow list is configured.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "CCPoint",
    "CCSize",
    "CCRect",
    "CCDirector",
    "CCNode",
    "CCSprite",
    "CCScene",
    "CCSpriteFrameCache",
    "CCSpriteFrame",
    "CCAction",
    "CCAnimate",
    "CCAnimation",
    "CCRepeatForever",
    "CCLayer",
    "CCTouch",
    "CCSet",
    "CCMoveBy",
    "CCMoveTo",
    "CCRotateTo",
    "CCRotateBy",
    "CCRenderTexture",
    "CCMenu",
    "CCMenuItem",
    "CCMenuItemLabel",
    "CCMenuItemSprite",
    "CCMenuItemImage",
    "CCLabelTTF",
    "CCSequence",
];

/// Configuration of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Classes that get bindings. Every other class is still catalogued.
    pub allow_list: Vec<String>,
    /// Path prefix of the `.hpp`/`.cpp` artifacts.
    pub output_prefix: String,
    pub conventions: Conventions,
    pub pointer_fallbacks: FallbackTable,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            allow_list: DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
            output_prefix: "out".to_string(),
            conventions: Conventions::default(),
            pointer_fallbacks: FallbackTable::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, BindError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BindError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BindError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    // === Builder Methods ===

    pub fn with_allow_list<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn with_pointer_fallbacks(mut self, fallbacks: FallbackTable) -> Self {
        self.pointer_fallbacks = fallbacks;
        self
    }

    /// Check whether `class_name` gets bindings.
    pub fn is_allowed(&self, class_name: &str) -> bool {
        self.allow_list.iter().any(|c| c == class_name)
    }
}
