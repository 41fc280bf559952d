use super::SlotKind;
use crate::description::FheIntDescription;
use crate::dtypes::TfhersIntegerType;
use crate::error::Error;
use crate::module::{FunctionGraph, Node, Shape};

/// A TFHErs input or output: its integer type and tensor shape
#[derive(Clone, Debug, PartialEq)]
pub struct TfhersSlot {
    pub ty: TfhersIntegerType,
    pub shape: Shape,
}

impl TfhersSlot {
    pub fn description(&self) -> FheIntDescription {
        FheIntDescription::from_type(&self.ty)
    }
}

/// TFHErs slots of one function, `None` for the inputs and outputs of another kind
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSignature {
    name: String,
    inputs: Vec<Option<TfhersSlot>>,
    outputs: Vec<Option<TfhersSlot>>,
}

fn scan(nodes: &[Node]) -> Vec<Option<TfhersSlot>> {
    nodes
        .iter()
        .map(|node| {
            node.value_type.as_tfhers().map(|ty| TfhersSlot {
                ty: ty.clone(),
                shape: node.shape.clone(),
            })
        })
        .collect()
}

impl FunctionSignature {
    pub fn from_graph(graph: &FunctionGraph) -> Self {
        Self {
            name: graph.name().to_owned(),
            inputs: scan(graph.ordered_inputs()),
            outputs: scan(graph.ordered_outputs()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Option<TfhersSlot>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Option<TfhersSlot>] {
        &self.outputs
    }

    pub fn slots(&self, kind: SlotKind) -> &[Option<TfhersSlot>] {
        match kind {
            SlotKind::Input => &self.inputs,
            SlotKind::Output => &self.outputs,
        }
    }
}

/// Signatures of all the functions of a module, in declaration order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignatureTable {
    functions: Vec<FunctionSignature>,
}

impl SignatureTable {
    pub fn from_graphs(graphs: &[FunctionGraph]) -> Self {
        Self {
            functions: graphs.iter().map(FunctionSignature::from_graph).collect(),
        }
    }

    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn function(&self, name: &str) -> Result<&FunctionSignature, Error> {
        self.functions
            .iter()
            .find(|signature| signature.name == name)
            .ok_or_else(|| Error::UnknownFunction(name.to_owned()))
    }

    /// Looks up a slot, `Ok(None)` meaning it exists but is not a TFHErs value
    pub fn slot(
        &self,
        function: &str,
        kind: SlotKind,
        index: usize,
    ) -> Result<Option<&TfhersSlot>, Error> {
        let slots = self.function(function)?.slots(kind);
        slots
            .get(index)
            .map(Option::as_ref)
            .ok_or_else(|| Error::SlotOutOfRange {
                function: function.to_owned(),
                kind,
                index,
                count: slots.len(),
            })
    }
}
