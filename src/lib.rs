//! Expand "plural" names in KiCad netlists.
//!
//! A single schematic symbol annotated `U[1:4]`1` stands for four parts. The
//! netlist is loaded, every component, libpart pin and net with a plural
//! name is replicated, and the result is written back as a netlist pcbnew
//! can read. See [`expand`] for the name syntax and [`replicate`] for how
//! nets are connected.
//!
//! ```
//! use kicad_netlist_expand::{expand_name, transform, NetList};
//!
//! assert_eq!(expand_name("A[1,2].B[3,4]").unwrap(), ["A1.B3", "A1.B4", "A2.B3", "A2.B4"]);
//!
//! let mut netlist: NetList = r#"(export
//!     (components (comp (ref "U[1:3]`1") (tstamp 1A)))
//!     (nets (net (code 1) (name GND) (node (ref "U[1:3]`1") (pin 7)))))"#
//!     .parse()
//!     .unwrap();
//! transform(&mut netlist).unwrap();
//! assert_eq!(netlist.components.len(), 3);
//! assert_eq!(netlist.nets[0].nodes.len(), 3);
//! ```

mod alloc;
pub mod error;
pub mod expand;
mod netlist;
mod parse;
pub mod replicate;
pub mod sexpr;
mod write;

pub use alloc::IdAllocator;
pub use error::{Error, ExpandError, ParseError, RangeError, ReplicateError};
pub use expand::{expand_name, expand_range};
pub use netlist::{Component, LibPart, Net, NetList, Node, Pin, Timestamp};
pub use replicate::{transform, Replicator};

/// Read and parse a netlist file
pub fn read_netlist(path: &std::path::Path) -> Result<NetList, Error> {
    let input = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(input.parse()?)
}

/// Write a netlist in the KiCad `.net` format
pub fn write_netlist(path: &std::path::Path, netlist: &NetList) -> Result<(), Error> {
    std::fs::write(path, netlist.to_kicad()).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })
}
