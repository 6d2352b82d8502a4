use crate::symbol::{
    instruction::{Instruction, Label, LocalId},
    type_ref::TypeRef,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequencePoint {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

/// Source-mapping metadata that travels with a body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DebugInfo {
    pub sequence_points: Vec<SequencePoint>,
    pub scope: Option<String>,
}

/// Executable body of a procedure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    pub instructions: Vec<Instruction>,
    pub locals: Vec<TypeRef>,
    pub debug: DebugInfo,
    next_label: u32,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        let next_label = Instruction::highest_label(&instructions).map_or(0, |label| label + 1);
        Self {
            instructions,
            locals: Vec::new(),
            debug: DebugInfo::default(),
            next_label,
        }
    }

    /// A body that does nothing but return.
    pub fn empty_return() -> Self {
        Self::from_instructions(vec![Instruction::Return])
    }

    pub fn with_debug(mut self, debug: DebugInfo) -> Self {
        self.debug = debug;
        self
    }

    pub fn declare_local(&mut self, ty: TypeRef) -> LocalId {
        let id = LocalId(self.locals.len());
        self.locals.push(ty);
        id
    }

    pub fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn emit_all(&mut self, instructions: impl IntoIterator<Item = Instruction>) {
        self.instructions.extend(instructions);
    }

    /// Visits every instruction, descending into protected regions.
    pub fn visit(&self, f: &mut dyn FnMut(&Instruction)) {
        visit_block(&self.instructions, f);
    }

    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Instruction)) {
        visit_block_mut(&mut self.instructions, f);
    }
}

fn visit_block(block: &[Instruction], f: &mut dyn FnMut(&Instruction)) {
    for instruction in block {
        f(instruction);
        if let Instruction::Protected { body, cleanup } = instruction {
            visit_block(body, f);
            visit_block(cleanup, f);
        }
    }
}

fn visit_block_mut(block: &mut [Instruction], f: &mut dyn FnMut(&mut Instruction)) {
    for instruction in block.iter_mut() {
        if let Instruction::Protected { body, cleanup } = instruction {
            visit_block_mut(body, f);
            visit_block_mut(cleanup, f);
        }
        f(instruction);
    }
}

/// A procedure's body slot. `Pending` marks a body that has been moved out and must be
/// refilled before the weaving pass completes.
#[derive(Clone, Debug, PartialEq)]
pub enum BodySlot {
    Present(Body),
    Pending,
}

impl BodySlot {
    /// Moves the body out, leaving `Pending` behind.
    pub fn take(&mut self) -> Option<Body> {
        match std::mem::replace(self, BodySlot::Pending) {
            BodySlot::Present(body) => Some(body),
            BodySlot::Pending => None,
        }
    }

    pub fn fill(&mut self, body: Body) {
        *self = BodySlot::Present(body);
    }

    pub fn body(&self) -> Option<&Body> {
        match self {
            BodySlot::Present(body) => Some(body),
            BodySlot::Pending => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut Body> {
        match self {
            BodySlot::Present(body) => Some(body),
            BodySlot::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, BodySlot::Pending)
    }
}
