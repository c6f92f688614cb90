use std::fmt;

use facet::Facet;

macro_rules! opaque_id {
    ($name:ident) => {
        /// Opaque, wire-transparent string identifier.
        #[derive(Facet, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[facet(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

opaque_id!(NodeId);
opaque_id!(EdgeId);
opaque_id!(GraphId);
