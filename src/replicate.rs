//! Replication of plural components, pins and nets.
//!
//! Component references drive everything else: `U[1:4]`1` becomes `U1` to
//! `U4`. Pins of a libpart expand their numbers and names. Nets are the
//! tricky part, there are two valid ways to connect them:
//!
//! 1. If the net name or any node it connects is singular, all expanded
//!    nodes are shorted into one net. `U[0:7].VCC` on an unlabeled wire to
//!    `3V3` puts every `Un.VCC` on `3V3`.
//! 2. If the net name and every node expand to the same number of names, one
//!    net is made per position. `U1.OUT[0:7]` wired to `D[15:8].A` connects
//!    `U1.OUT0` to `D15.A`, `U1.OUT1` to `D14.A` and so on.
//!
//! Anything else is an error.

use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::{
    expand::expand_name, Component, IdAllocator, LibPart, Net, NetList, Node, Pin,
    ReplicateError, Timestamp,
};

/// Output nets, merged by name in first-seen order
#[derive(Debug, Default)]
struct MergedNets {
    nets: Vec<Net>,
    by_name: HashMap<String, usize>,
}

impl MergedNets {
    fn add(&mut self, codes: &mut IdAllocator, template: &Net, name: String, nodes: Vec<Node>) {
        if let Some(&i) = self.by_name.get(&name) {
            self.nets[i].nodes.extend(nodes);
            return;
        }
        self.by_name.insert(name.clone(), self.nets.len());
        self.nets.push(Net {
            code: codes.allocate(),
            name,
            fields: template.fields.clone(),
            nodes,
        });
    }
}

/// One replication pass over a netlist
#[derive(Debug)]
pub struct Replicator {
    tstamps: IdAllocator,
    codes: IdAllocator,
    errors: Vec<ReplicateError>,
}

impl Replicator {
    pub fn new(tstamps: IdAllocator, codes: IdAllocator) -> Self {
        Self {
            tstamps,
            codes,
            errors: vec![],
        }
    }

    /// Fresh timestamps start past the ones already in `netlist`; nets are
    /// renumbered from 1.
    pub fn for_netlist(netlist: &NetList) -> Self {
        let used = netlist
            .components
            .iter()
            .filter_map(|c| c.tstamp)
            .map(|Timestamp(t)| t);
        Self::new(IdAllocator::after(used), IdAllocator::new(1, []))
    }

    /// Replicate everything in place.
    ///
    /// A malformed component reference stops the pass before anything is
    /// changed. Pin and net errors are collected: such a pin is left
    /// unexpanded, such a net is dropped, and every other change is still
    /// made.
    pub fn run(mut self, netlist: &mut NetList) -> Result<(), Vec<ReplicateError>> {
        let before = (
            netlist.components.len(),
            netlist.libparts.iter().map(pin_count).sum::<usize>(),
            netlist.nets.len(),
        );

        self.components(&mut netlist.components).map_err(|err| {
            error!("{}", err);
            vec![err]
        })?;
        for part in netlist.libparts.iter_mut() {
            self.pins(part);
        }
        self.nets(&mut netlist.nets);

        info!(
            "components {} -> {}, pins {} -> {}, nets {} -> {}",
            before.0,
            netlist.components.len(),
            before.1,
            netlist.libparts.iter().map(pin_count).sum::<usize>(),
            before.2,
            netlist.nets.len(),
        );

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn record(&mut self, err: ReplicateError) {
        error!("{}", err);
        self.errors.push(err);
    }

    fn components(&mut self, components: &mut Vec<Component>) -> Result<(), ReplicateError> {
        let refs = components
            .iter()
            .map(|comp| {
                expand_name(&comp.reference).map_err(|source| ReplicateError::Component {
                    reference: comp.reference.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut replicated = Vec::with_capacity(refs.iter().map(Vec::len).sum());
        for (comp, refs) in components.drain(..).zip(refs) {
            if refs.len() == 1 {
                replicated.push(comp);
                continue;
            }
            debug!("component {} -> {} copies", comp.reference, refs.len());
            for reference in refs {
                replicated.push(Component {
                    reference,
                    tstamp: Some(Timestamp(self.tstamps.allocate())),
                    fields: comp.fields.clone(),
                });
            }
        }
        *components = replicated;
        Ok(())
    }

    fn pins(&mut self, part: &mut LibPart) {
        let LibPart {
            lib,
            part: name,
            pins: Some(pins),
            ..
        } = part
        else {
            return;
        };

        let mut replicated = Vec::with_capacity(pins.len());
        for pin in pins.drain(..) {
            match replicate_pin(lib, name, &pin) {
                Ok(None) => replicated.push(pin),
                Ok(Some(copies)) => {
                    debug!("pin {}/{} {} -> {} copies", lib, name, pin.num, copies.len());
                    replicated.extend(copies);
                }
                Err(err) => {
                    self.record(err);
                    replicated.push(pin);
                }
            }
        }
        *pins = replicated;
    }

    fn nets(&mut self, nets: &mut Vec<Net>) {
        let mut merged = MergedNets::default();
        for net in nets.drain(..) {
            match replicate_net(&net) {
                Ok(expanded) => {
                    if expanded.len() > 1 || net.nodes.len() > 1 {
                        debug!("net {} -> {} net(s)", net.name, expanded.len());
                    }
                    for (name, nodes) in expanded {
                        merged.add(&mut self.codes, &net, name, nodes);
                    }
                }
                // Its nodes name components that may no longer exist
                Err(err) => self.record(err),
            }
        }
        *nets = merged.nets;
    }
}

/// Expand plural records of `netlist` in place.
///
/// All recoverable errors are returned together, after every valid change
/// has been applied.
pub fn transform(netlist: &mut NetList) -> Result<(), Vec<ReplicateError>> {
    Replicator::for_netlist(netlist).run(netlist)
}

fn pin_count(part: &LibPart) -> usize {
    part.pins.as_ref().map_or(0, Vec::len)
}

/// `None` when the pin is singular and stays as it is
fn replicate_pin(lib: &str, part: &str, pin: &Pin) -> Result<Option<Vec<Pin>>, ReplicateError> {
    let expand = |name: &str| {
        expand_name(name).map_err(|source| ReplicateError::Pin {
            lib: lib.to_owned(),
            part: part.to_owned(),
            source,
        })
    };
    let nums = expand(&pin.num)?;
    let names = expand(&pin.name)?;

    let copy = |num: &str, name: &str| Pin {
        num: num.to_owned(),
        name: name.to_owned(),
        fields: pin.fields.clone(),
    };
    let copies = match (nums.len(), names.len()) {
        (1, 1) => return Ok(None),
        (_, 1) => nums.iter().map(|num| copy(num, &pin.name)).collect(),
        (1, _) => names.iter().map(|name| copy(&pin.num, name)).collect(),
        (n, m) if n == m => nums
            .iter()
            .zip(&names)
            .map(|(num, name)| copy(num, name))
            .collect(),
        (n, m) => {
            return Err(ReplicateError::PinCardinalityMismatch {
                lib: lib.to_owned(),
                part: part.to_owned(),
                num: pin.num.clone(),
                name: pin.name.clone(),
                nums: n,
                names: m,
            })
        }
    };
    Ok(Some(copies))
}

/// The `(name, nodes)` pairs a net turns into
fn replicate_net(net: &Net) -> Result<Vec<(String, Vec<Node>)>, ReplicateError> {
    let expand = |name: &str| {
        expand_name(name).map_err(|source| ReplicateError::Net {
            net: net.name.clone(),
            source,
        })
    };
    let names = expand(&net.name)?;

    // First pass: expand every node, checking whether to short
    let mut short = names.len() == 1;
    let mut mismatch = None;
    let mut endpoints = Vec::with_capacity(net.nodes.len());
    for node in &net.nodes {
        let refs = expand(&node.reference)?;
        let pins = expand(&node.pin)?;
        let expanded: Vec<Node> = refs
            .iter()
            .flat_map(|r| pins.iter().map(move |p| node.with_endpoint(r, p)))
            .collect();
        if expanded.len() == 1 {
            short = true;
        } else if expanded.len() != names.len() && mismatch.is_none() {
            // Only an error if nothing ends up shorted
            mismatch = Some((node, expanded.len()));
        }
        endpoints.push(expanded);
    }

    // Second pass: build the net(s)
    if short {
        let name = names.into_iter().next().unwrap_or_default();
        return Ok(vec![(name, endpoints.into_iter().flatten().collect())]);
    }
    if let Some((node, count)) = mismatch {
        return Err(ReplicateError::NetCardinalityMismatch {
            net: net.name.clone(),
            names: names.len(),
            reference: node.reference.clone(),
            pin: node.pin.clone(),
            nodes: count,
        });
    }
    if endpoints.is_empty() {
        return Ok(vec![]);
    }
    let mut columns: Vec<_> = endpoints.into_iter().map(Vec::into_iter).collect();
    Ok(names
        .into_iter()
        .map(|name| (name, columns.iter_mut().filter_map(Iterator::next).collect()))
        .collect())
}
