//! Bridge model: geometry, assembled stiffness and recorded influence lines.

use std::collections::HashMap;

use log::{debug, info};
use nalgebra::DMatrix;
use ndarray::Array2;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::elements::{Member, Node};
use crate::envelope::{self, Envelope, LoadPattern};
use crate::errors::AnalysisError;
use crate::geometry::{Point, Section};
use crate::profile::{member_kind, DofLayout, SpanProfile, PANEL_LENGTH};
use crate::recovery::axial_force;
use crate::stiffness::{assemble_blocks, flatten_blocks, reduce, ReducedStiffness};
use crate::sweep::{self, LoadCase, LoadPosition, PositionResponse, SAMPLE_SPACING};

/// Tolerance on bottom-chord node spacing.
const CHORD_SPACING_TOLERANCE: f64 = 1.0e-6;

/// Connectivity and section of one member as supplied by a geometry source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberDefinition {
    /// Member identifier.
    pub id: usize,
    /// Start node identifier.
    pub start: usize,
    /// End node identifier.
    pub end: usize,
    /// Section dimensions, if known.
    pub section: Option<Section>,
}

impl MemberDefinition {
    /// Member between `start` and `end` with a known section.
    #[must_use]
    pub fn new(id: usize, start: usize, end: usize, section: Section) -> Self {
        Self {
            id,
            start,
            end,
            section: Some(section),
        }
    }
}

/// Raw geometry of a bridge before validation.
///
/// Node order fixes the global degree-of-freedom order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeDefinition {
    /// Node identifiers and positions.
    pub nodes: Vec<(usize, Point)>,
    /// Member connectivity and sections.
    pub members: Vec<MemberDefinition>,
}

impl BridgeDefinition {
    /// Append a node.
    pub fn add_node(&mut self, id: usize, position: Point) {
        self.nodes.push((id, position));
    }

    /// Append a member.
    pub fn add_member(&mut self, member: MemberDefinition) {
        self.members.push(member);
    }
}

/// Global parameters shared by every member and load position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BridgeParameters {
    /// Young's modulus.
    pub modulus: f64,
    /// Magnitude of the moving load.
    pub unit_load: f64,
    /// Distributed self-weight intensity.
    pub self_weight: f64,
    /// Bottom-chord node identifiers from left to right.
    pub bottom_chord: Vec<usize>,
}

/// A truss bridge ready for moving-load analysis.
#[derive(Debug)]
pub struct Bridge {
    /// Support arrangement.
    profile: SpanProfile,
    /// Global parameters.
    parameters: BridgeParameters,
    /// Joints as graph nodes and members as edges, in definition order.
    graph: Graph<Node, Member>,
    /// Graph index of each node identifier.
    node_lookup: HashMap<usize, NodeIndex>,
    /// Graph index of each member identifier.
    member_lookup: HashMap<usize, EdgeIndex>,
    /// Positional index of each bottom-chord node.
    chord_nodes: Vec<usize>,
    /// Degree-of-freedom layout.
    layout: DofLayout,
    /// Full stiffness matrix.
    global: Array2<f64>,
    /// Factorised reduced stiffness matrix.
    reduced: ReducedStiffness,
    /// Whether the influence lines hold a complete sweep.
    swept: bool,
}

impl Bridge {
    /// Validate the geometry and assemble the stiffness matrices.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the modulus is not positive, a reference
    /// is dangling, a section is degenerate, the bottom chord does not fit the
    /// profile, or the reduced stiffness matrix is singular.
    pub fn new(
        profile: SpanProfile,
        definition: &BridgeDefinition,
        parameters: BridgeParameters,
    ) -> Result<Self, AnalysisError> {
        if !(parameters.modulus > 0.0) {
            return Err(AnalysisError::NonPositiveModulus(parameters.modulus));
        }

        let mut graph = Graph::with_capacity(definition.nodes.len(), definition.members.len());
        let mut node_lookup = HashMap::with_capacity(definition.nodes.len());
        for &(id, position) in &definition.nodes {
            if node_lookup.contains_key(&id) {
                return Err(AnalysisError::DuplicateNode(id));
            }
            node_lookup.insert(id, graph.add_node(Node::new(id, position)));
        }

        let chord_nodes =
            Self::chord_positions(profile, &parameters.bottom_chord, &node_lookup, &graph)?;

        let mut member_lookup = HashMap::with_capacity(definition.members.len());
        for def in &definition.members {
            if member_lookup.contains_key(&def.id) {
                return Err(AnalysisError::DuplicateMember(def.id));
            }
            let endpoint = |node: usize| {
                node_lookup
                    .get(&node)
                    .copied()
                    .ok_or(AnalysisError::UnknownNode { member: def.id, node })
            };
            let (start, end) = (endpoint(def.start)?, endpoint(def.end)?);
            let section = def.section.ok_or(AnalysisError::MissingSection(def.id))?;
            let member = Member::new(
                def.id,
                &graph[start],
                &graph[end],
                section,
                member_kind(def.id),
                parameters.modulus,
            )?;
            member_lookup.insert(def.id, graph.add_edge(start, end, member));
        }

        let layout = DofLayout::for_profile(profile, graph.node_count(), &chord_nodes);
        let blocks = assemble_blocks(
            graph.node_count(),
            graph.edge_references().map(|edge| {
                let (start, end) = (edge.source().index(), edge.target().index());
                (start, end, edge.weight().stiffness())
            }),
        );
        let global = flatten_blocks(&blocks);
        let reduced = ReducedStiffness::new(reduce(&global, &layout))?;
        debug!(
            "assembled {:?} bridge: {} nodes, {} members, {} reduced unknowns",
            profile,
            graph.node_count(),
            graph.edge_count(),
            reduced.len()
        );

        Ok(Self {
            profile,
            parameters,
            graph,
            node_lookup,
            member_lookup,
            chord_nodes,
            layout,
            global,
            reduced,
            swept: false,
        })
    }

    /// Check the bottom chord against the profile and map it to node positions.
    fn chord_positions(
        profile: SpanProfile,
        chord: &[usize],
        node_lookup: &HashMap<usize, NodeIndex>,
        graph: &Graph<Node, Member>,
    ) -> Result<Vec<usize>, AnalysisError> {
        let expected = profile.panel_count() + 1;
        if chord.len() != expected {
            return Err(AnalysisError::InvalidBottomChord(format!(
                "expected {expected} nodes for a {} unit span, found {}",
                profile.span_length(),
                chord.len()
            )));
        }
        if let Some(pair) = chord.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(AnalysisError::InvalidBottomChord(format!(
                "node ids must increase, found {} before {}",
                pair[0], pair[1]
            )));
        }
        let indices = chord
            .iter()
            .map(|id| node_lookup.get(id).copied().ok_or(AnalysisError::UnknownChordNode(*id)))
            .collect::<Result<Vec<_>, _>>()?;
        let origin = graph[indices[0]].position().x;
        for (k, &index) in indices.iter().enumerate() {
            let offset = graph[index].position().x - origin;
            if (offset - k as f64 * PANEL_LENGTH).abs() > CHORD_SPACING_TOLERANCE {
                return Err(AnalysisError::InvalidBottomChord(format!(
                    "node {} sits {offset} from the left end instead of {}",
                    graph[index].id(),
                    k as f64 * PANEL_LENGTH
                )));
            }
        }
        Ok(indices.into_iter().map(NodeIndex::index).collect())
    }

    /// Support arrangement.
    #[must_use]
    pub fn profile(&self) -> SpanProfile {
        self.profile
    }

    /// Global parameters.
    #[must_use]
    pub fn parameters(&self) -> &BridgeParameters {
        &self.parameters
    }

    /// Span length of the bottom chord.
    #[must_use]
    pub fn span_length(&self) -> f64 {
        self.profile.span_length()
    }

    /// Return the number of nodes in the bridge.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members in the bridge.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of load positions in a sweep.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        sweep::sample_count(self.profile.panel_count())
    }

    /// Whether [`Bridge::sweep`] has populated the influence lines.
    #[must_use]
    pub fn is_swept(&self) -> bool {
        self.swept
    }

    /// Look up a node by identifier.
    #[must_use]
    pub fn node(&self, id: usize) -> Option<&Node> {
        self.node_lookup.get(&id).map(|&index| &self.graph[index])
    }

    /// Look up a member by identifier.
    #[must_use]
    pub fn member(&self, id: usize) -> Option<&Member> {
        self.member_lookup.get(&id).map(|&index| &self.graph[index])
    }

    /// Nodes in definition order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Members in definition order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.graph.edge_weights()
    }

    /// Degree-of-freedom layout.
    #[must_use]
    pub fn layout(&self) -> &DofLayout {
        &self.layout
    }

    /// Full stiffness matrix, `(u, v)` per node in node order.
    #[must_use]
    pub fn global_stiffness(&self) -> &Array2<f64> {
        &self.global
    }

    /// Stiffness matrix with the bearing degrees of freedom removed.
    #[must_use]
    pub fn reduced_stiffness(&self) -> &DMatrix<f64> {
        self.reduced.matrix()
    }

    /// Everything needed to solve one load position.
    #[must_use]
    pub fn load_case(&self) -> LoadCase<'_> {
        LoadCase {
            profile: self.profile,
            chord_nodes: &self.chord_nodes,
            layout: &self.layout,
            stiffness: &self.reduced,
            unit_load: self.parameters.unit_load,
        }
    }

    /// Solve the bridge with the moving load at `position`.
    #[must_use]
    pub fn respond(&self, position: LoadPosition) -> PositionResponse {
        let displacements = self.load_case().displacements(position, self.node_count());
        let axial_forces = self
            .graph
            .edge_references()
            .map(|edge| {
                axial_force(
                    edge.weight(),
                    displacements[edge.source().index()],
                    displacements[edge.target().index()],
                )
            })
            .collect();
        PositionResponse {
            displacements,
            axial_forces,
        }
    }

    /// Move the load across the whole bottom chord and record every node's
    /// vertical displacement and every member's axial force.
    ///
    /// Previous influence lines and envelopes are discarded first.
    pub fn sweep(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.clear_displacements();
        }
        for member in self.graph.edge_weights_mut() {
            member.clear_axial_forces();
        }

        let responses: Vec<PositionResponse> = (0..self.sample_count())
            .into_par_iter()
            .map(|sample| self.respond(LoadPosition::new(sample)))
            .collect();

        for response in &responses {
            for (node, displacement) in self.graph.node_weights_mut().zip(&response.displacements) {
                node.record_displacement(displacement.v);
            }
            for (member, force) in self.graph.edge_weights_mut().zip(&response.axial_forces) {
                member.record_axial_force(*force);
            }
        }
        self.swept = true;
        info!(
            "influence lines recorded at {} load positions for {} nodes and {} members",
            responses.len(),
            self.node_count(),
            self.member_count()
        );
    }

    /// Vertical displacement influence line of a node.
    #[must_use]
    pub fn node_displacements(&self, id: usize) -> Option<&[f64]> {
        self.node(id).map(Node::displacements)
    }

    /// Axial force influence line of a member.
    #[must_use]
    pub fn member_axial_forces(&self, id: usize) -> Option<&[f64]> {
        self.member(id).map(Member::axial_forces)
    }

    /// Worst-case forces of a member from the last envelope search.
    #[must_use]
    pub fn member_envelope(&self, id: usize) -> Option<Envelope> {
        self.member(id).and_then(Member::envelope)
    }

    /// Place `pattern` on every member's influence line and keep the extremes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SweepNotRun`] when no influence lines are recorded.
    pub fn search_worst_cases(&mut self, pattern: &LoadPattern) -> Result<(), AnalysisError> {
        if !self.swept {
            return Err(AnalysisError::SweepNotRun);
        }
        let members: Vec<&Member> = self.graph.edge_weights().collect();
        let envelopes: Vec<Envelope> = members
            .par_iter()
            .map(|member| envelope::search(member.axial_forces(), pattern))
            .collect();
        for (member, result) in self.graph.edge_weights_mut().zip(envelopes) {
            member.set_envelope(result);
        }
        info!(
            "worst-case forces found for {} members with a {} sample lane",
            self.member_count(),
            pattern.len()
        );
        Ok(())
    }

    /// Member force under the self-weight spread over the whole span.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SweepNotRun`] when no influence lines are recorded.
    pub fn dead_load_force(&self, id: usize) -> Result<Option<f64>, AnalysisError> {
        if !self.swept {
            return Err(AnalysisError::SweepNotRun);
        }
        Ok(self.member_axial_forces(id).map(|line| {
            self.parameters.self_weight * line.iter().sum::<f64>() * SAMPLE_SPACING
        }))
    }
}
