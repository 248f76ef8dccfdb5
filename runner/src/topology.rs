//! On-disk JSON topology (§6) plus its conversion into the core's
//! I/O-free [`tis100::machine::Topology`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tis100::machine::{ConsoleSpec, NodeKind as CoreNodeKind, Side as CoreSide, Topology as CoreTopology};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Execution,
    Stack,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Deserialize)]
pub struct ConsoleSpecConfig {
    pub side: Side,
    pub position: usize,
}

#[derive(Debug, Deserialize)]
pub struct TopologyConfig {
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<Vec<NodeKind>>,
    pub console_in: ConsoleSpecConfig,
    pub console_out: ConsoleSpecConfig,
}

impl TopologyConfig {
    pub fn load(path: &Path) -> Result<TopologyConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading topology file {}", path.display()))?;
        let config: TopologyConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing topology JSON {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("topology has zero width or height");
        }
        if self.nodes.len() != self.height {
            bail!(
                "topology declares height {} but has {} node rows",
                self.height,
                self.nodes.len()
            );
        }
        for (row, cells) in self.nodes.iter().enumerate() {
            if cells.len() != self.width {
                bail!(
                    "topology declares width {} but row {row} has {} cells",
                    self.width,
                    cells.len()
                );
            }
        }
        check_position(&self.console_in, self.width, self.height)?;
        check_position(&self.console_out, self.width, self.height)?;
        Ok(())
    }

    /// Converts to the core's `Topology`, which carries no serde/JSON
    /// dependency of its own.
    pub fn into_core(self) -> CoreTopology {
        CoreTopology {
            width: self.width,
            height: self.height,
            nodes: self
                .nodes
                .into_iter()
                .map(|row| row.into_iter().map(convert_node_kind).collect())
                .collect(),
            console_in: convert_console_spec(self.console_in),
            console_out: convert_console_spec(self.console_out),
        }
    }
}

fn check_position(spec: &ConsoleSpecConfig, width: usize, height: usize) -> Result<()> {
    let bound = match spec.side {
        Side::Top | Side::Bottom => width,
        Side::Left | Side::Right => height,
    };
    if spec.position >= bound {
        bail!(
            "console position {} is out of range for a side of length {bound}",
            spec.position
        );
    }
    Ok(())
}

fn convert_node_kind(kind: NodeKind) -> CoreNodeKind {
    match kind {
        NodeKind::Execution => CoreNodeKind::Execution,
        NodeKind::Stack => CoreNodeKind::Stack,
    }
}

fn convert_console_spec(spec: ConsoleSpecConfig) -> ConsoleSpec {
    ConsoleSpec {
        side: convert_side(spec.side),
        position: spec.position,
    }
}

fn convert_side(side: Side) -> CoreSide {
    match side {
        Side::Top => CoreSide::Top,
        Side::Bottom => CoreSide::Bottom,
        Side::Left => CoreSide::Left,
        Side::Right => CoreSide::Right,
    }
}

/// Reads `node_<row>_<col>.tis` for every execution cell out of `dir`
/// (§6 "file-discovery naming convention"). A missing file is left out of
/// the map; the core reports it as `MachineError::MissingNodeSource`.
pub fn discover_sources(
    dir: &Path,
    nodes: &[Vec<NodeKind>],
) -> Result<HashMap<(usize, usize), String>> {
    let mut sources = HashMap::new();
    for (row, cells) in nodes.iter().enumerate() {
        for (col, kind) in cells.iter().enumerate() {
            if !matches!(kind, NodeKind::Execution) {
                continue;
            }
            let path = dir.join(format!("node_{row}_{col}.tis"));
            if path.exists() {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading node source {}", path.display()))?;
                sources.insert((row, col), text);
            }
        }
    }
    Ok(sources)
}
