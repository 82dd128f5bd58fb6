//! Reader for the DIMACS `p max` problem format.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use pflow_core::errors::{ErrorInfo, FlowError};
use pflow_core::{Capacity, NodeId};

use crate::ids::unknown_node;
use crate::network::FlowNetwork;

/// A parsed max-flow problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimacsProblem {
    /// Validated network with both terminals set.
    pub network: FlowNetwork,
    /// Text of the first `c` line, without the leading `c `.
    pub first_comment: Option<String>,
    /// Number of arcs announced by the `p` line.
    pub declared_arcs: usize,
}

/// Parses a DIMACS description held in memory.
pub fn parse_dimacs(text: &str) -> Result<DimacsProblem, FlowError> {
    let mut reader = DimacsReader::default();
    for (idx, line) in text.lines().enumerate() {
        reader
            .feed(line)
            .map_err(|err| err.with_context("line", idx + 1))?;
    }
    reader.finish()
}

/// Parses a DIMACS description from any buffered reader.
pub fn read_dimacs<R: BufRead>(input: R) -> Result<DimacsProblem, FlowError> {
    let mut reader = DimacsReader::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line.map_err(|err| FlowError::from(err).with_context("line", idx + 1))?;
        reader
            .feed(&line)
            .map_err(|err| err.with_context("line", idx + 1))?;
    }
    reader.finish()
}

/// Opens and parses a DIMACS file.
pub fn read_dimacs_file(path: impl AsRef<Path>) -> Result<DimacsProblem, FlowError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        FlowError::Io(
            ErrorInfo::new("open-description", err.to_string())
                .with_context("path", path.display()),
        )
    })?;
    read_dimacs(BufReader::new(file)).map_err(|err| err.with_context("path", path.display()))
}

#[derive(Debug, Default)]
struct DimacsReader {
    network: Option<FlowNetwork>,
    declared_arcs: usize,
    first_comment: Option<String>,
}

impl DimacsReader {
    fn feed(&mut self, line: &str) -> Result<(), FlowError> {
        let trimmed = line.trim();
        let mut fields = trimmed.split_whitespace();
        let Some(kind) = fields.next() else {
            return Ok(());
        };
        match kind {
            "c" => {
                if self.first_comment.is_none() {
                    let text = trimmed[1..].trim_start();
                    self.first_comment = Some(text.to_string());
                }
                Ok(())
            }
            "p" => self.problem_line(fields.collect()),
            "n" => self.node_line(fields.collect()),
            "a" => self.arc_line(fields.collect()),
            other => Err(malformed("unknown-line", "unrecognised line designator")
                .with_context("designator", other)),
        }
    }

    fn problem_line(&mut self, fields: Vec<&str>) -> Result<(), FlowError> {
        if self.network.is_some() {
            return Err(malformed(
                "duplicate-problem-line",
                "problem line declared more than once",
            ));
        }
        let [kind, nodes, arcs] = fields[..] else {
            return Err(field_count("p", 3, fields.len()));
        };
        if kind != "max" {
            return Err(malformed("unsupported-problem", "only `p max` problems are supported")
                .with_context("problem", kind));
        }
        let num_nodes: usize = parse_field(nodes, "num_nodes")?;
        let num_arcs: usize = parse_field(arcs, "num_arcs")?;
        if num_nodes < 2 {
            return Err(malformed(
                "too-few-nodes",
                "a max-flow problem needs at least a source and a sink",
            )
            .with_context("num_nodes", num_nodes));
        }
        self.network = Some(FlowNetwork::try_with_capacity(num_nodes, num_arcs)?);
        self.declared_arcs = num_arcs;
        Ok(())
    }

    fn node_line(&mut self, fields: Vec<&str>) -> Result<(), FlowError> {
        let network = self.network_mut()?;
        let [id, role] = fields[..] else {
            return Err(field_count("n", 2, fields.len()));
        };
        let node = parse_node(network, id)?;
        match role {
            "s" => {
                if network.source().is_some() {
                    return Err(malformed("duplicate-source", "source declared more than once"));
                }
                network.set_source(node)
            }
            "t" => {
                if network.sink().is_some() {
                    return Err(malformed("duplicate-sink", "sink declared more than once"));
                }
                network.set_sink(node)
            }
            other => Err(malformed("unknown-node-role", "node role must be `s` or `t`")
                .with_context("role", other)),
        }
    }

    fn arc_line(&mut self, fields: Vec<&str>) -> Result<(), FlowError> {
        let network = self.network_mut()?;
        let [from, to, capacity] = fields[..] else {
            return Err(field_count("a", 3, fields.len()));
        };
        let from = parse_node(network, from)?;
        let to = parse_node(network, to)?;
        let capacity: Capacity = parse_field(capacity, "capacity")?;
        network.add_arc(from, to, capacity)?;
        Ok(())
    }

    fn network_mut(&mut self) -> Result<&mut FlowNetwork, FlowError> {
        self.network.as_mut().ok_or_else(|| {
            malformed(
                "missing-problem-line",
                "problem line must precede node and arc lines",
            )
        })
    }

    fn finish(self) -> Result<DimacsProblem, FlowError> {
        let network = self.network.ok_or_else(|| {
            malformed("missing-problem-line", "description has no problem line")
        })?;
        if network.num_arcs() != self.declared_arcs {
            return Err(
                malformed("arc-count-mismatch", "arc lines do not match the problem line")
                    .with_context("declared", self.declared_arcs)
                    .with_context("found", network.num_arcs()),
            );
        }
        network.validate()?;
        debug!(
            "parsed max-flow description: {} nodes, {} arcs",
            network.num_nodes(),
            network.num_arcs()
        );
        Ok(DimacsProblem {
            network,
            first_comment: self.first_comment,
            declared_arcs: self.declared_arcs,
        })
    }
}

fn parse_node(network: &FlowNetwork, field: &str) -> Result<NodeId, FlowError> {
    let raw: u64 = parse_field(field, "node")?;
    let raw = u32::try_from(raw).map_err(|_| unknown_node(raw, network.num_nodes()))?;
    network.check_node(raw)
}

fn parse_field<T: std::str::FromStr>(field: &str, name: &str) -> Result<T, FlowError> {
    field.parse().map_err(|_| {
        malformed("invalid-field", "field could not be parsed")
            .with_context("field", name)
            .with_context("value", field)
    })
}

fn field_count(kind: &str, expected: usize, found: usize) -> FlowError {
    malformed("field-count", "unexpected number of fields")
        .with_context("kind", kind)
        .with_context("expected", expected)
        .with_context("found", found)
}

fn malformed(code: &str, message: &str) -> FlowError {
    FlowError::MalformedDescription(ErrorInfo::new(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let problem = parse_dimacs("c first\n\nc second\np max 2 1\nn 1 s\nn 2 t\na 1 2 3\n")
            .unwrap();
        assert_eq!(problem.first_comment.as_deref(), Some("first"));
        assert_eq!(problem.network.num_arcs(), 1);
    }

    #[test]
    fn bare_comment_line_is_empty_text() {
        let problem = parse_dimacs("c\np max 2 0\nn 1 s\nn 2 t\n").unwrap();
        assert_eq!(problem.first_comment.as_deref(), Some(""));
    }

    #[test]
    fn negative_capacity_is_its_own_kind() {
        let err = parse_dimacs("p max 2 1\nn 1 s\nn 2 t\na 1 2 -4\n").unwrap_err();
        assert!(matches!(err, FlowError::NegativeCapacity(_)));
        assert_eq!(err.info().context.get("line").map(String::as_str), Some("4"));
    }

    #[test]
    fn huge_node_ids_are_unknown_references() {
        let err = parse_dimacs("p max 2 1\nn 1 s\nn 2 t\na 1 99999999999 1\n").unwrap_err();
        assert!(matches!(err, FlowError::UnknownNodeReference(_)));
    }
}
