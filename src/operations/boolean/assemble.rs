use std::f64::consts::{PI, TAU};

use slotmap::{new_key_type, SlotMap};

use crate::error::{OperationError, Result};
use crate::geometry::SkyPoint;
use crate::math::spherical::turning_angle;
use crate::math::COLLINEAR_TOLERANCE;

use super::split::ArcFragment;

new_key_type! {
    /// Key of a junction in the boundary graph.
    struct NodeId;
    /// Key of a directed fragment in the boundary graph.
    struct LinkId;
}

#[derive(Debug)]
struct Node {
    point: SkyPoint,
    outgoing: Vec<LinkId>,
}

#[derive(Debug)]
struct Link {
    from: NodeId,
    to: NodeId,
    used: bool,
}

/// Directed graph of kept fragments; coincident endpoints share a node.
#[derive(Debug, Default)]
struct BoundaryGraph {
    nodes: SlotMap<NodeId, Node>,
    links: SlotMap<LinkId, Link>,
    order: Vec<LinkId>,
}

impl BoundaryGraph {
    fn node_for(&mut self, point: SkyPoint) -> NodeId {
        if let Some((id, _)) = self.nodes.iter().find(|(_, n)| n.point.approx_eq(&point)) {
            return id;
        }
        self.nodes.insert(Node {
            point,
            outgoing: Vec::new(),
        })
    }

    fn add_link(&mut self, start: SkyPoint, end: SkyPoint) {
        let from = self.node_for(start);
        let to = self.node_for(end);
        if from == to {
            return;
        }
        let id = self.links.insert(Link {
            from,
            to,
            used: false,
        });
        self.nodes[from].outgoing.push(id);
        self.order.push(id);
    }

    /// Turning angle from `incoming` onto `candidate`, with U-turns ranked last.
    fn turn(&self, incoming: LinkId, candidate: LinkId) -> f64 {
        let u = self.nodes[self.links[incoming].from].point;
        let v = self.nodes[self.links[incoming].to].point;
        let w = self.nodes[self.links[candidate].to].point;
        let angle = turning_angle(u.vector(), v.vector(), w.vector());
        if angle > PI - COLLINEAR_TOLERANCE {
            angle - TAU
        } else {
            angle
        }
    }

    /// Picks the unused outgoing link at the end of `incoming` with the
    /// sharpest left turn.
    fn next_link(&self, incoming: LinkId) -> Option<LinkId> {
        let at = self.links[incoming].to;
        self.nodes[at]
            .outgoing
            .iter()
            .copied()
            .filter(|&id| !self.links[id].used)
            .max_by(|&x, &y| self.turn(incoming, x).total_cmp(&self.turn(incoming, y)))
    }

    fn trace_loops(mut self) -> Result<Vec<Vec<SkyPoint>>> {
        let mut loops = Vec::new();

        for first in self.order.clone() {
            if self.links[first].used {
                continue;
            }
            let origin = self.links[first].from;
            let mut ring = Vec::new();
            let mut current = first;

            loop {
                self.links[current].used = true;
                let (from, to) = (self.links[current].from, self.links[current].to);
                ring.push(self.nodes[from].point);
                if to == origin {
                    break;
                }
                if ring.len() > self.links.len() {
                    return Err(
                        OperationError::Failed("boundary walk does not close".into()).into(),
                    );
                }
                current = self.next_link(current).ok_or_else(|| {
                    OperationError::Failed(format!(
                        "boundary walk dead-ends at {}",
                        self.nodes[to].point
                    ))
                })?;
            }

            loops.push(ring);
        }

        Ok(loops)
    }
}

/// Joins kept fragments into closed loops.
///
/// Each fragment becomes a directed link between merged endpoint nodes.
/// Loops are traced from unused links; at a node with several exits the
/// sharpest left turn is taken, which keeps loops that only touch at a
/// point apart.
///
/// # Errors
///
/// Returns `OperationError::Failed` if a walk cannot be closed.
pub fn assemble_loops(fragments: &[ArcFragment]) -> Result<Vec<Vec<SkyPoint>>> {
    let mut graph = BoundaryGraph::default();
    for fragment in fragments {
        graph.add_link(fragment.start, fragment.end);
    }
    graph.trace_loops()
}

/// Drops vertices where the boundary runs straight on.
///
/// The keep flags are computed against the unmodified ring in one pass.
#[must_use]
pub fn remove_collinear(ring: Vec<SkyPoint>) -> Vec<SkyPoint> {
    let n = ring.len();
    if n < 3 {
        return ring;
    }
    let keep: Vec<bool> = (0..n)
        .map(|i| {
            let angle = turning_angle(
                ring[(i + n - 1) % n].vector(),
                ring[i].vector(),
                ring[(i + 1) % n].vector(),
            );
            angle.abs() >= COLLINEAR_TOLERANCE
        })
        .collect();
    ring.into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}
