use std::fmt;

/// Semantic type of a parameter, local or return value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Void,
    /// Transport channel selector.
    Channel,
    /// Reference to a network connection.
    Connection,
    /// Pooled buffer reader handed to RPC readers.
    PooledReader,
    /// Pooled buffer writer acquired by RPC writers.
    PooledWriter,
    /// Open generic type parameter, e.g. `T`.
    Generic(String),
    /// Any other named type, resolved through the codec service.
    Named(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    pub fn is_channel(&self) -> bool {
        matches!(self, TypeRef::Channel)
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, TypeRef::Connection)
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, TypeRef::Generic(_))
    }

    /// Identifier-safe spelling, used when deriving synthesized procedure names. Distinct
    /// types always spell differently.
    pub fn mangled(&self) -> String {
        match self {
            TypeRef::Generic(name) => format!("_g_{}", escape_identifier(name)),
            TypeRef::Named(name) if BUILTIN_SPELLINGS.contains(&name.as_str()) => {
                format!("_n_{}", escape_identifier(name))
            }
            _ => escape_identifier(&self.to_string()),
        }
    }
}

const BUILTIN_SPELLINGS: [&str; 5] = [
    "void",
    "Channel",
    "NetworkConnection",
    "PooledReader",
    "PooledWriter",
];

/// Keeps ASCII alphanumerics and spells every other character as `_<hex>_`, so the output
/// never contains a bare `_` and can be joined with `__` without ambiguity.
pub(crate) fn escape_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push_str(&format!("_{:x}_", u32::from(c)));
        }
    }
    out
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Channel => write!(f, "Channel"),
            TypeRef::Connection => write!(f, "NetworkConnection"),
            TypeRef::PooledReader => write!(f, "PooledReader"),
            TypeRef::PooledWriter => write!(f, "PooledWriter"),
            TypeRef::Generic(name) | TypeRef::Named(name) => write!(f, "{}", name),
        }
    }
}
