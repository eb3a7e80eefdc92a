use std::fmt::Display;

use crate::sexpr::SExpr;

/// A component timestamp, written as upper-case hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub u64);

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

/// The full netlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetList {
    pub components: Vec<Component>,
    pub libparts: Vec<LibPart>,
    pub nets: Vec<Net>,
    /// Top level sections in file order
    pub(crate) layout: Vec<Section>,
}

/// Position of a top level section, so that unknown ones survive a rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Section {
    Components,
    LibParts,
    Nets,
    Other(SExpr),
}

/// A component in the schematic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub reference: String,
    pub tstamp: Option<Timestamp>,
    /// Value, footprint, libsource, ... copied verbatim
    pub fields: Vec<SExpr>,
}

/// A part template shared by the components that use it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibPart {
    pub lib: String,
    pub part: String,
    pub fields: Vec<SExpr>,
    /// Some parts have no pins section at all
    pub pins: Option<Vec<Pin>>,
}

/// An individual pin of a part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub num: String,
    pub name: String,
    pub fields: Vec<SExpr>,
}

/// A node connects a net to a pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub reference: String,
    pub pin: String,
    pub fields: Vec<SExpr>,
}

/// A net
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    /// A unique id for the net
    pub code: u64,
    pub name: String,
    pub fields: Vec<SExpr>,
    pub nodes: Vec<Node>,
}

impl Component {
    pub fn new(reference: &str, tstamp: Option<u64>) -> Self {
        Self {
            reference: reference.to_owned(),
            tstamp: tstamp.map(Timestamp),
            fields: vec![],
        }
    }
}

impl LibPart {
    pub fn new(lib: &str, part: &str, pins: Vec<Pin>) -> Self {
        Self {
            lib: lib.to_owned(),
            part: part.to_owned(),
            fields: vec![],
            pins: Some(pins),
        }
    }
}

impl Pin {
    pub fn new(num: &str, name: &str) -> Self {
        Self {
            num: num.to_owned(),
            name: name.to_owned(),
            fields: vec![],
        }
    }
}

impl Node {
    pub fn new(reference: &str, pin: &str) -> Self {
        Self {
            reference: reference.to_owned(),
            pin: pin.to_owned(),
            fields: vec![],
        }
    }

    /// A copy connected to a different pin
    pub fn with_endpoint(&self, reference: &str, pin: &str) -> Self {
        Self {
            reference: reference.to_owned(),
            pin: pin.to_owned(),
            fields: self.fields.clone(),
        }
    }
}

impl Net {
    pub fn new(code: u64, name: &str, nodes: Vec<Node>) -> Self {
        Self {
            code,
            name: name.to_owned(),
            fields: vec![],
            nodes,
        }
    }
}

impl NetList {
    pub fn new(components: Vec<Component>, libparts: Vec<LibPart>, nets: Vec<Net>) -> Self {
        Self {
            components,
            libparts,
            nets,
            layout: vec![],
        }
    }

    pub fn component(&self, reference: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.reference == reference)
    }

    pub fn libpart(&self, lib: &str, part: &str) -> Option<&LibPart> {
        self.libparts
            .iter()
            .find(|p| p.lib == lib && p.part == part)
    }

    pub fn net(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|n| n.name == name)
    }
}
