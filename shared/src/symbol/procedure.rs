use std::fmt;

use crate::{
    symbol::{
        attribute::Attribute,
        body::{Body, BodySlot},
        parameter::Parameter,
        type_ref::{escape_identifier, TypeRef},
    },
    types::RemoteCallKind,
};

const LOGIC_PREFIX: &str = "RpcLogic___";
const WRITER_PREFIX: &str = "RpcWriter___";
const READER_PREFIX: &str = "RpcReader___";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_override: bool,
}

impl Modifiers {
    pub fn private() -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::default()
        }
    }
}

/// A procedure's name together with its parameter-type sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: String,
    pub parameter_types: Vec<TypeRef>,
}

impl Signature {
    fn mangled(&self) -> String {
        let mut out = escape_identifier(&self.name);
        for ty in &self.parameter_types {
            out.push_str("__");
            out.push_str(&ty.mangled());
        }
        out
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, ty) in self.parameter_types.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, ")")
    }
}

/// The part a synthesized procedure plays for its original.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SynthRole {
    Writer(RemoteCallKind),
    Reader(RemoteCallKind),
    Logic,
}

/// Arena key of a synthesized procedure. Deterministic in the original's signature, so
/// re-processing a type finds the same procedure again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SynthKey {
    pub signature: Signature,
    pub role: SynthRole,
}

impl SynthKey {
    pub fn writer(signature: Signature, kind: RemoteCallKind) -> Self {
        Self {
            signature,
            role: SynthRole::Writer(kind),
        }
    }

    pub fn reader(signature: Signature, kind: RemoteCallKind) -> Self {
        Self {
            signature,
            role: SynthRole::Reader(kind),
        }
    }

    pub fn logic(signature: Signature) -> Self {
        Self {
            signature,
            role: SynthRole::Logic,
        }
    }

    pub fn mangled_name(&self) -> String {
        match self.role {
            SynthRole::Writer(kind) => {
                format!("{}{}___{}", WRITER_PREFIX, kind.tag(), self.signature.mangled())
            }
            SynthRole::Reader(kind) => {
                format!("{}{}___{}", READER_PREFIX, kind.tag(), self.signature.mangled())
            }
            SynthRole::Logic => format!("{}{}", LOGIC_PREFIX, self.signature.mangled()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Origin {
    Declared,
    Synthesized(SynthKey),
}

/// A member procedure of a composite type.
#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub generic_parameters: Vec<String>,
    pub return_type: TypeRef,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub body: BodySlot,
    pub origin: Origin,
}

impl Procedure {
    /// A public, void, non-virtual procedure with an empty body.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            return_type: TypeRef::Void,
            attributes: Vec::new(),
            modifiers: Modifiers::default(),
            body: BodySlot::Present(Body::empty_return()),
            origin: Origin::Declared,
        }
    }

    pub fn synthesized(key: SynthKey, modifiers: Modifiers, parameters: Vec<Parameter>) -> Self {
        Self {
            name: key.mangled_name(),
            parameters,
            generic_parameters: Vec::new(),
            return_type: TypeRef::Void,
            attributes: Vec::new(),
            modifiers,
            body: BodySlot::Present(Body::new()),
            origin: Origin::Synthesized(key),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_generic_parameter(mut self, name: impl Into<String>) -> Self {
        self.generic_parameters.push(name.into());
        self
    }

    pub fn returning(mut self, return_type: TypeRef) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = BodySlot::Present(body);
        self
    }

    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            parameter_types: self.parameter_types(),
        }
    }

    pub fn parameter_types(&self) -> Vec<TypeRef> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }

    pub fn is_virtual(&self) -> bool {
        self.modifiers.is_virtual || self.modifiers.is_override
    }

    pub fn synth_key(&self) -> Option<&SynthKey> {
        match &self.origin {
            Origin::Synthesized(key) => Some(key),
            Origin::Declared => None,
        }
    }
}
