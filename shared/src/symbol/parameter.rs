use crate::symbol::type_ref::TypeRef;

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    /// Whether the parameter declares a default value (optional argument).
    pub has_default: bool,
    /// Whether the argument is passed by reference.
    pub by_ref: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
            by_ref: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn by_ref(mut self) -> Self {
        self.by_ref = true;
        self
    }
}
