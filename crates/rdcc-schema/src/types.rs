//! Newtype wrappers for manifest string fields.
//!
//! All newtypes serialize/deserialize as plain strings, so unknown values
//! survive a round trip untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

string_newtype!(
    /// Classification of a component manifest (`"base"`, `"install_component"`, ...).
    ///
    /// Open-ended: values this crate does not recognize are kept as-is.
    ComponentType
);

string_newtype!(
    /// Identifier of an installable product listed in a manifest.
    ProductId
);

impl ComponentType {
    pub const BASE: &'static str = "base";
    pub const INSTALL_COMPONENT: &'static str = "install_component";

    /// `true` for the root image layer type.
    pub fn is_base(&self) -> bool {
        self.0 == Self::BASE
    }

    /// `true` for a layer that installs software atop a base.
    pub fn is_install_component(&self) -> bool {
        self.0 == Self::INSTALL_COMPONENT
    }
}
