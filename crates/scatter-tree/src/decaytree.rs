//! Decay trees expanding every cascade of a two-body process.
//!
//! The root stands for the colliding pair and carries the total cross
//! section. Its children are the partial processes, weighted by their cross
//! sections, and every further level is a 1 → n decay weighted by its
//! branching ratio. Multiplying weights along a path gives the exclusive
//! cross section of the leaf's final state.

use scatter_core::registry::{TypeId, TypeRegistry};
use scatter_find::CollisionBranch;

use crate::aggregate::FinalStateCrossSection;

/// One action in a decay tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Label used for printing and intermediate-state names.
    pub name: String,
    /// Cross section (process nodes) or branching ratio (decay nodes).
    pub weight: f64,
    /// Particle types consumed by this action.
    pub initial_particles: Vec<TypeId>,
    /// Particle types produced by this action.
    pub final_particles: Vec<TypeId>,
    /// System state after this action, sorted by type name.
    pub state: Vec<TypeId>,
    /// Subsequent actions.
    pub children: Vec<Node>,
}

impl Node {
    /// Root node of a collision of `a` and `b` with total cross section `weight`.
    pub fn root(registry: &TypeRegistry, a: TypeId, b: TypeId, weight: f64) -> Self {
        Self {
            name: registry.joined_names(&[a, b]),
            weight,
            initial_particles: vec![a, b],
            final_particles: vec![a, b],
            state: vec![a, b],
            children: Vec::new(),
        }
    }

    /// Builds the node of an action following this one, without attaching it.
    ///
    /// The new state is this state minus `initial_particles` plus
    /// `final_particles`, sorted by type name. Different orderings of the
    /// same decays end in identical states.
    pub fn spawn(
        &self,
        registry: &TypeRegistry,
        name: impl Into<String>,
        weight: f64,
        initial_particles: Vec<TypeId>,
        final_particles: Vec<TypeId>,
    ) -> Node {
        let mut state = self.state.clone();
        for consumed in &initial_particles {
            if let Some(position) = state.iter().position(|id| id == consumed) {
                state.remove(position);
            }
        }
        state.extend(final_particles.iter().copied());
        state.sort_by(|a, b| registry.get(*a).name.cmp(&registry.get(*b).name));
        Node {
            name: name.into(),
            weight,
            initial_particles,
            final_particles,
            state,
            children: Vec::new(),
        }
    }

    /// Appends a child action and returns it.
    pub fn add_action(
        &mut self,
        registry: &TypeRegistry,
        name: impl Into<String>,
        weight: f64,
        initial_particles: Vec<TypeId>,
        final_particles: Vec<TypeId>,
    ) -> &mut Node {
        let child = self.spawn(registry, name, weight, initial_particles, final_particles);
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Exclusive cross sections of all leaves, named by their final state.
    pub fn final_state_cross_sections(
        &self,
        registry: &TypeRegistry,
    ) -> Vec<FinalStateCrossSection> {
        self.final_state_cross_sections_with(registry, false)
    }

    /// Like [`Node::final_state_cross_sections`]; with
    /// `show_intermediate_states` the names spell out the whole path as
    /// `node{state}->node{state}`.
    ///
    /// A root without children yields no entries.
    pub fn final_state_cross_sections_with(
        &self,
        registry: &TypeRegistry,
        show_intermediate_states: bool,
    ) -> Vec<FinalStateCrossSection> {
        let mut result = Vec::new();
        if self.children.is_empty() {
            return result;
        }
        self.collect_leaves(registry, 0, "", 1.0, show_intermediate_states, &mut result);
        result
    }

    fn collect_leaves(
        &self,
        registry: &TypeRegistry,
        depth: usize,
        prefix: &str,
        weight: f64,
        show_intermediate_states: bool,
        result: &mut Vec<FinalStateCrossSection>,
    ) {
        // The root carries the total cross section and does not contribute.
        let weight = if depth > 0 { weight * self.weight } else { weight };

        let mut name = String::new();
        if show_intermediate_states {
            name.push_str(prefix);
            if !name.is_empty() {
                name.push_str("->");
            }
            name.push_str(&self.name);
            name.push('{');
        }
        name.push_str(&registry.joined_names(&self.state));
        if show_intermediate_states {
            name.push('}');
        }

        if self.children.is_empty() {
            let mass = registry.total_mass(&self.state);
            result.push(FinalStateCrossSection::new(name, weight, mass));
            return;
        }
        for child in &self.children {
            child.collect_leaves(
                registry,
                depth + 1,
                &name,
                weight,
                show_intermediate_states,
                result,
            );
        }
    }

    /// Indented listing of the tree, one `name weight` line per node.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(0, &mut out);
        out
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        out.push_str(&format!("{}{} {}\n", " ".repeat(depth), self.name, self.weight));
        for child in &self.children {
            child.render_into(depth + 1, out);
        }
    }
}

fn decay_name(registry: &TypeRegistry, parent: TypeId, products: &[TypeId]) -> String {
    format!(
        "[{}->{}]",
        registry.get(parent).name,
        registry.joined_names(products)
    )
}

/// Recursively attaches every kinematically allowed decay below `node`.
///
/// Decays are allowed when the pole masses of the products fit into the
/// parent's pole mass plus the energy left over at `sqrts` (the total
/// centre-of-mass energy of the collision). With several unstable particles
/// each decay order is enumerated, so branch weights are divided by their
/// number. An unstable particle without any allowed branch sets the node's
/// weight to zero.
pub fn add_decays(node: &mut Node, registry: &TypeRegistry, sqrts: f64) {
    let mut n_unstable = 0u32;
    let mut sqrts_minus_masses = sqrts;
    for id in &node.state {
        let ptype = registry.get(*id);
        if !ptype.is_stable() {
            n_unstable += 1;
        }
        sqrts_minus_masses -= ptype.mass;
    }
    let norm = if n_unstable != 0 {
        1.0 / f64::from(n_unstable)
    } else {
        1.0
    };

    for index in 0..node.state.len() {
        let parent = node.state[index];
        let ptype = registry.get(parent);
        if ptype.is_stable() {
            continue;
        }
        let available = sqrts_minus_masses + ptype.mass;
        let mut can_decay = false;
        for branch in &ptype.decay_modes {
            if registry.total_mass(&branch.products) > available {
                continue;
            }
            can_decay = true;
            let mut child = node.spawn(
                registry,
                decay_name(registry, parent, &branch.products),
                norm * branch.weight,
                vec![parent],
                branch.products.clone(),
            );
            add_decays(&mut child, registry, sqrts);
            node.children.push(child);
        }
        if !can_decay {
            node.weight = 0.0;
            return;
        }
    }
}

/// Builds the full decay tree of a collision from its channel list.
///
/// Channels with non-positive weight are left out.
pub fn build_tree(
    registry: &TypeRegistry,
    a: TypeId,
    b: TypeId,
    channels: &[CollisionBranch],
    sqrts: f64,
) -> Node {
    let total: f64 = channels.iter().map(|channel| channel.weight).sum();
    let mut root = Node::root(registry, a, b, total);
    for channel in channels.iter().filter(|channel| channel.weight > 0.0) {
        let process = root.add_action(
            registry,
            channel.description(registry),
            channel.weight,
            vec![a, b],
            channel.products.clone(),
        );
        add_decays(process, registry, sqrts);
    }
    root
}
