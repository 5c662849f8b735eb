use std::{fmt::Display, ops::Deref, sync::Arc};

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            /// 32 hex chars from the OS random source.
            pub fn random() -> Result<Self, getrandom::Error> {
                let mut bytes = [0u8; 16];
                getrandom::getrandom(&mut bytes)?;

                let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                Ok(Self(hex.into()))
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.into())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value.into())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&*self.0, f)
            }
        }
    };
}

string_id! {
    /// Unique within one simulation.
    GateId
}

string_id! {
    WireId
}
