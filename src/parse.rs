use std::str::FromStr;

use crate::{
    netlist::Section, sexpr::SExpr, Component, LibPart, Net, NetList, Node, ParseError, Pin,
    Timestamp,
};

impl FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16)
            .map(Timestamp)
            .map_err(|_| ParseError::InvalidTimestamp(s.to_owned()))
    }
}

/// Children other than the ones a record reads itself
fn fields(value: &SExpr, known: &[&str]) -> Vec<SExpr> {
    value
        .items()
        .iter()
        .filter(|c| !c.label().is_some_and(|l| known.contains(&l)))
        .cloned()
        .collect()
}

fn optional_value<'a>(value: &'a SExpr, label: &str) -> Result<Option<&'a str>, ParseError> {
    match value.child(label) {
        Ok(_) => value.value(label).map(Some),
        Err(_) => Ok(None),
    }
}

impl TryFrom<&SExpr> for Pin {
    type Error = ParseError;

    fn try_from(value: &SExpr) -> Result<Self, Self::Error> {
        let num = value.value("num")?.to_owned();
        let name = value.value("name")?.to_owned();
        let fields = fields(value, &["num", "name"]);
        Ok(Pin { num, name, fields })
    }
}

impl TryFrom<&SExpr> for LibPart {
    type Error = ParseError;

    fn try_from(value: &SExpr) -> Result<Self, Self::Error> {
        let lib = value.value("lib")?.to_owned();
        let part = value.value("part")?.to_owned();
        let pins = match value.child("pins") {
            Ok(pins) => Some(
                pins.children("pin")
                    .map(|pin| pin.try_into())
                    .collect::<Result<_, _>>()?,
            ),
            Err(_) => None,
        };
        let fields = fields(value, &["lib", "part", "pins"]);
        Ok(LibPart {
            lib,
            part,
            fields,
            pins,
        })
    }
}

impl TryFrom<&SExpr> for Component {
    type Error = ParseError;

    fn try_from(value: &SExpr) -> Result<Self, Self::Error> {
        let reference = value.value("ref")?.to_owned();
        let tstamp = optional_value(value, "tstamp")?
            .map(str::parse::<Timestamp>)
            .transpose()?;
        let fields = fields(value, &["ref", "tstamp"]);
        Ok(Component {
            reference,
            tstamp,
            fields,
        })
    }
}

impl TryFrom<&SExpr> for Node {
    type Error = ParseError;

    fn try_from(value: &SExpr) -> Result<Self, Self::Error> {
        let reference = value.value("ref")?.to_owned();
        let pin = value.value("pin")?.to_owned();
        let fields = fields(value, &["ref", "pin"]);
        Ok(Node {
            reference,
            pin,
            fields,
        })
    }
}

impl TryFrom<&SExpr> for Net {
    type Error = ParseError;

    fn try_from(value: &SExpr) -> Result<Self, Self::Error> {
        let code = value.value("code")?;
        let code = code
            .parse()
            .map_err(|_| ParseError::InvalidNetCode(code.to_owned()))?;
        let name = value.value("name")?.to_owned();
        let nodes = value
            .children("node")
            .map(|node| node.try_into())
            .collect::<Result<_, _>>()?;
        let fields = fields(value, &["code", "name", "node"]);
        Ok(Net {
            code,
            name,
            fields,
            nodes,
        })
    }
}

impl TryFrom<&SExpr> for NetList {
    type Error = ParseError;

    fn try_from(value: &SExpr) -> Result<Self, Self::Error> {
        match value.label() {
            Some("export") => {}
            Some(label) => return Err(ParseError::UnexpectedRoot(label.to_owned())),
            None => return Err(ParseError::UnexpectedRoot(value.to_string())),
        }

        let mut netlist = NetList::default();
        for section in value.items() {
            match section.label() {
                Some("components") => {
                    netlist.components = section
                        .children("comp")
                        .map(|comp| comp.try_into())
                        .collect::<Result<_, _>>()?;
                    netlist.layout.push(Section::Components);
                }
                Some("libparts") => {
                    netlist.libparts = section
                        .children("libpart")
                        .map(|part| part.try_into())
                        .collect::<Result<_, _>>()?;
                    netlist.layout.push(Section::LibParts);
                }
                Some("nets") => {
                    netlist.nets = section
                        .children("net")
                        .map(|net| net.try_into())
                        .collect::<Result<_, _>>()?;
                    netlist.layout.push(Section::Nets);
                }
                _ => netlist.layout.push(Section::Other(section.clone())),
            }
        }
        Ok(netlist)
    }
}

impl FromStr for NetList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sexpr = SExpr::try_from(s)?;
        NetList::try_from(&sexpr)
    }
}
