use crate::{
    netlist::Section, sexpr::SExpr, Component, LibPart, Net, NetList, Node, Pin,
};

impl From<&Pin> for SExpr {
    fn from(pin: &Pin) -> Self {
        let mut children = vec![SExpr::pair("num", &pin.num), SExpr::pair("name", &pin.name)];
        children.extend(pin.fields.iter().cloned());
        SExpr::list("pin", children)
    }
}

impl From<&LibPart> for SExpr {
    fn from(part: &LibPart) -> Self {
        let mut children = vec![SExpr::pair("lib", &part.lib), SExpr::pair("part", &part.part)];
        children.extend(part.fields.iter().cloned());
        if let Some(pins) = &part.pins {
            children.push(SExpr::list("pins", pins.iter().map(SExpr::from).collect()));
        }
        SExpr::list("libpart", children)
    }
}

impl From<&Component> for SExpr {
    fn from(comp: &Component) -> Self {
        let mut children = vec![SExpr::pair("ref", &comp.reference)];
        children.extend(comp.fields.iter().cloned());
        if let Some(tstamp) = comp.tstamp {
            children.push(SExpr::pair("tstamp", &tstamp.to_string()));
        }
        SExpr::list("comp", children)
    }
}

impl From<&Node> for SExpr {
    fn from(node: &Node) -> Self {
        let mut children = vec![SExpr::pair("ref", &node.reference), SExpr::pair("pin", &node.pin)];
        children.extend(node.fields.iter().cloned());
        SExpr::list("node", children)
    }
}

impl From<&Net> for SExpr {
    fn from(net: &Net) -> Self {
        let mut children = vec![
            SExpr::pair("code", &net.code.to_string()),
            SExpr::pair("name", &net.name),
        ];
        children.extend(net.fields.iter().cloned());
        children.extend(net.nodes.iter().map(SExpr::from));
        SExpr::list("net", children)
    }
}

impl From<&NetList> for SExpr {
    fn from(netlist: &NetList) -> Self {
        let mut layout = netlist.layout.clone();
        for section in [Section::Components, Section::LibParts, Section::Nets] {
            if !layout.contains(&section) {
                layout.push(section);
            }
        }

        let children = layout
            .into_iter()
            .map(|section| match section {
                Section::Components => SExpr::list(
                    "components",
                    netlist.components.iter().map(SExpr::from).collect(),
                ),
                Section::LibParts => SExpr::list(
                    "libparts",
                    netlist.libparts.iter().map(SExpr::from).collect(),
                ),
                Section::Nets => {
                    SExpr::list("nets", netlist.nets.iter().map(SExpr::from).collect())
                }
                Section::Other(sexpr) => sexpr,
            })
            .collect();
        SExpr::list("export", children)
    }
}

impl NetList {
    /// Render as a KiCad `.net` file
    pub fn to_kicad(&self) -> String {
        SExpr::from(self).to_pretty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;

    macro_rules! test_data {
        ($fname:expr) => {
            std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/test/",
                $fname
            ))
            .unwrap()
        };
    }

    #[test]
    fn netlist_round_trips() {
        let netlist: NetList = test_data!("led_matrix.net").parse().unwrap();
        let again: NetList = netlist.to_kicad().parse().unwrap();
        assert_eq!(netlist, again);
    }

    #[test]
    fn writes_records_in_kicad_order() {
        let mut comp = Component::new("R1", Some(0x5C0A1B2C));
        comp.fields.push(SExpr::pair("value", "10k"));
        assert_eq!(
            SExpr::from(&comp).to_string(),
            "(comp (ref R1) (value 10k) (tstamp 5C0A1B2C))"
        );

        let net = Net::new(7, "Net-(R1-Pad1)", vec![Node::new("R1", "1")]);
        assert_eq!(
            SExpr::from(&net).to_string(),
            r#"(net (code 7) (name "Net-(R1-Pad1)") (node (ref R1) (pin 1)))"#
        );
        assert_eq!(Timestamp(0xab).to_string(), "AB");
    }

    #[test]
    fn built_netlist_gets_default_sections() {
        let netlist = NetList::new(
            vec![Component::new("C1", None)],
            vec![LibPart::new("Device", "C", vec![Pin::new("1", "~")])],
            vec![],
        );
        assert_eq!(
            SExpr::from(&netlist).to_string(),
            "(export (components (comp (ref C1))) \
             (libparts (libpart (lib Device) (part C) (pins (pin (num 1) (name ~))))) \
             (nets))"
        );
    }
}
