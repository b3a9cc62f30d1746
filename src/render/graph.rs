//! Network graph surface: patient in the middle, donors on a ring.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::Donor;

pub const RING_RADIUS: f64 = 2.0;
/// Both axes span `[-AXIS_EXTENT, AXIS_EXTENT]`.
pub const AXIS_EXTENT: f64 = 3.0;
pub const EDGE_WIDTH: f64 = 3.0;
/// Faintest edge drawn, so weak matches stay visible.
pub const MIN_EDGE_OPACITY: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// `None` for the patient node.
    pub donor_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub donor_id: String,
    pub from: [f64; 2],
    pub to: [f64; 2],
    /// `max(MIN_EDGE_OPACITY, confidence / 100)`.
    pub opacity: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub center: GraphNode,
    pub donors: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub axis_range: [f64; 2],
}

impl Default for GraphView {
    fn default() -> Self {
        Self::build(&[])
    }
}

impl GraphView {
    /// Lay donors out evenly by index; donor `i` of `n` sits at angle `2πi/n`.
    pub fn build(donors: &[Donor]) -> Self {
        let center = GraphNode {
            donor_id: None,
            x: 0.0,
            y: 0.0,
            label: "PATIENT".to_string(),
        };

        let count = donors.len() as f64;
        let (nodes, edges) = donors
            .iter()
            .enumerate()
            .map(|(index, donor)| {
                let angle = 2.0 * PI * index as f64 / count;
                let x = center.x + RING_RADIUS * angle.cos();
                let y = center.y + RING_RADIUS * angle.sin();
                let node = GraphNode {
                    donor_id: Some(donor.id.clone()),
                    x,
                    y,
                    label: format!("{}%", donor.confidence_percent),
                };
                let edge = GraphEdge {
                    donor_id: donor.id.clone(),
                    from: [center.x, center.y],
                    to: [x, y],
                    opacity: edge_opacity(donor.confidence_percent),
                    width: EDGE_WIDTH,
                };
                (node, edge)
            })
            .unzip();

        Self {
            center,
            donors: nodes,
            edges,
            axis_range: [-AXIS_EXTENT, AXIS_EXTENT],
        }
    }
}

pub fn edge_opacity(confidence_percent: u8) -> f64 {
    (f64::from(confidence_percent) / 100.0).max(MIN_EDGE_OPACITY)
}
