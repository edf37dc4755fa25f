//! Genomes are the focus of evolution in NEAT.
//! They are a collection of node and connection genes that can be
//! decoded into a phenotype (a feed-forward network). Genomes can be
//! progressively mutated, thus adding complexity and functionality.

pub mod compatibility;
mod config;
mod errors;
mod genes;
mod history;
mod nodes;
mod snapshot;

pub use config::{CrossoverPolicy, DistanceMetric, GeneticConfig};
pub use errors::{ConfigError, GenomeError, MutationError};
pub use genes::ConnectionGene;
pub use history::InnovationRegistry;
pub use nodes::{ActivationType, NodeGene, NodeRole};
pub use snapshot::{ConnectionSnapshot, GenomeSnapshot, NodeSnapshot};

use crate::populations::FitnessGoal;
use crate::{GenomeId, Innovation, NodeId, SpeciesId};

use ahash::RandomState;
use rand::prelude::{IteratorRandom, Rng, SliceRandom};
use serde::{Deserialize, Serialize};

use std::collections::{HashMap, HashSet};
use std::fmt;

/// A mutable collection of node and connection genes.
///
/// Every connection's endpoints are nodes of the genome,
/// and no two connections share the same endpoints.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    id: GenomeId,
    species: Option<SpeciesId>,
    nodes: HashMap<NodeId, NodeGene, RandomState>,
    connections: HashMap<Innovation, ConnectionGene, RandomState>,
    node_pairings: HashSet<(NodeId, NodeId), RandomState>,
    fitness: f32,
    adjusted_fitness: f32,
    evaluated: bool,
}

impl Genome {
    /// Create a new genome with the specified configuration, with
    /// every input and the bias connected to every output.
    ///
    /// Node and connection identifiers follow the numbering of
    /// [`InnovationRegistry::new`], so all newly created genomes
    /// in a run share their initial structure.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry, NodeRole};
    ///
    /// let config = GeneticConfig {
    ///     input_count: 3,
    ///     output_count: 2,
    ///     ..GeneticConfig::default()
    /// };
    /// let mut registry = InnovationRegistry::new(&config);
    ///
    /// let genome = Genome::new(&config, &mut registry);
    ///
    /// // As configured, the genome should have 3 inputs + 1 bias + 2 outputs.
    /// assert_eq!(genome.nodes().count(), 3 + 1 + 2);
    /// assert_eq!(genome.nodes().filter(|n| n.role() == NodeRole::Input).count(), 3);
    /// assert_eq!(genome.nodes().filter(|n| n.role() == NodeRole::Output).count(), 2);
    ///
    /// // There is a connection from every sensor to every output.
    /// assert_eq!(genome.connections().count(), 4 * 2);
    /// assert!(genome.connections().all(|c| (0..8).contains(&c.innovation())));
    /// ```
    pub fn new(config: &GeneticConfig, registry: &mut InnovationRegistry) -> Genome {
        let mut genome = Self::unconnected(config, registry);
        let sensor_count = config.input_count + 1;
        for target in sensor_count..sensor_count + config.output_count {
            for source in 0..sensor_count {
                let innovation = registry.connection_innovation(source, target);
                genome.insert_connection(ConnectionGene::new(
                    innovation,
                    source,
                    target,
                    ConnectionGene::random_weight(config),
                ));
            }
        }
        genome
    }

    /// Create a new genome with input, bias and output nodes,
    /// but no connections.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig::default();
    /// let mut registry = InnovationRegistry::new(&config);
    ///
    /// let genome = Genome::unconnected(&config, &mut registry);
    /// assert_eq!(genome.nodes().count(), config.input_count + 1 + config.output_count);
    /// assert_eq!(genome.connections().count(), 0);
    /// ```
    pub fn unconnected(config: &GeneticConfig, registry: &mut InnovationRegistry) -> Genome {
        let mut genome = Self::empty(registry.next_genome_id());
        let input_nodes = (0..config.input_count)
            .map(|id| NodeGene::new(id, NodeRole::Input, ActivationType::Identity));
        let bias_node = NodeGene::new(config.input_count, NodeRole::Bias, ActivationType::Identity);
        let output_nodes = (0..config.output_count).map(|o| {
            NodeGene::new(config.input_count + 1 + o, NodeRole::Output, config.output_activation)
        });
        for node in input_nodes.chain(std::iter::once(bias_node)).chain(output_nodes) {
            genome.nodes.insert(node.id(), node);
        }
        genome
    }

    fn empty(id: GenomeId) -> Genome {
        Genome {
            id,
            species: None,
            nodes: HashMap::default(),
            connections: HashMap::default(),
            node_pairings: HashSet::default(),
            fitness: 0.0,
            adjusted_fitness: 0.0,
            evaluated: false,
        }
    }

    /// Adds a new hidden node with the specified id.
    ///
    /// # Errors
    /// Returns an error if a node with the same id
    /// is already present in the genome.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{ActivationType, GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig::default();
    /// let mut genome = Genome::new(&config, &mut InnovationRegistry::new(&config));
    ///
    /// assert!(genome.add_node(10, ActivationType::ReLU).is_ok());
    /// assert!(genome.add_node(10, ActivationType::ReLU).is_err());
    /// ```
    pub fn add_node(
        &mut self,
        id: NodeId,
        activation: ActivationType,
    ) -> Result<&NodeGene, GenomeError> {
        if self.nodes.contains_key(&id) {
            return Err(GenomeError::DuplicateNode(id));
        }
        self.evaluated = false;
        Ok(self
            .nodes
            .entry(id)
            .or_insert_with(|| NodeGene::new(id, NodeRole::Hidden, activation)))
    }

    /// Adds a new enabled connection with the specified
    /// parameters.
    ///
    /// # Errors
    /// Returns an error if the innovation or the endpoint pair
    /// is already present, if either endpoint is missing, or if
    /// the target is an input or bias node.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig::default();
    /// let mut genome = Genome::unconnected(&config, &mut InnovationRegistry::new(&config));
    ///
    /// // Input 0 to output 3.
    /// genome.add_connection(0, 0, 3, 1.5).unwrap();
    /// assert_eq!(genome.connection(0).unwrap().weight(), 1.5);
    ///
    /// // Same endpoints, different innovation.
    /// assert!(genome.add_connection(7, 0, 3, 1.5).is_err());
    /// // Into an input node.
    /// assert!(genome.add_connection(8, 3, 1, 1.5).is_err());
    /// ```
    pub fn add_connection(
        &mut self,
        innovation: Innovation,
        source: NodeId,
        target: NodeId,
        weight: f32,
    ) -> Result<&ConnectionGene, GenomeError> {
        self.check_connection_viability(innovation, source, target)?;
        Ok(self.insert_connection(ConnectionGene::new(innovation, source, target, weight)))
    }

    fn check_connection_viability(
        &self,
        innovation: Innovation,
        source: NodeId,
        target: NodeId,
    ) -> Result<(), GenomeError> {
        if self.connections.contains_key(&innovation) {
            return Err(GenomeError::DuplicateConnection(innovation));
        }
        if self.node_pairings.contains(&(source, target)) {
            return Err(GenomeError::DuplicateEndpoints {
                from: source,
                to: target,
            });
        }
        if !self.nodes.contains_key(&source) {
            return Err(GenomeError::MissingEndpoint {
                innovation,
                node: source,
            });
        }
        match self.nodes.get(&target) {
            None => Err(GenomeError::MissingEndpoint {
                innovation,
                node: target,
            }),
            Some(node) if node.role().is_sensor() => Err(GenomeError::SensorTarget {
                innovation,
                node: target,
            }),
            Some(_) => Ok(()),
        }
    }

    fn insert_connection(&mut self, connection: ConnectionGene) -> &ConnectionGene {
        debug_assert!(self.nodes.contains_key(&connection.source()));
        debug_assert!(self.nodes.contains_key(&connection.target()));
        self.evaluated = false;
        self.node_pairings.insert(connection.endpoints());
        self.connections
            .entry(connection.innovation())
            .or_insert(connection)
    }

    /// Applies every mutation operator: weight perturbation,
    /// then node addition and connection addition with their
    /// configured chances. Mutations that cannot be applied
    /// are skipped.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig {
    ///     node_addition_chance: 1.0,
    ///     connection_addition_chance: 0.0,
    ///     ..GeneticConfig::default()
    /// };
    /// let mut registry = InnovationRegistry::new(&config);
    /// let mut genome = Genome::new(&config, &mut registry);
    ///
    /// genome.mutate(&mut registry, &config);
    ///
    /// // A node was added, splitting one connection into two.
    /// assert_eq!(genome.nodes().count(), 5);
    /// assert_eq!(genome.connections().count(), 5);
    /// ```
    pub fn mutate(&mut self, registry: &mut InnovationRegistry, config: &GeneticConfig) {
        let mut rng = rand::thread_rng();
        self.mutate_weights(config);
        if rng.gen::<f32>() < config.node_addition_chance {
            let _ = self.mutate_add_node(registry, config);
        }
        if rng.gen::<f32>() < config.connection_addition_chance {
            let _ = self.mutate_add_connection(registry, config);
        }
    }

    /// Perturbs the weight of each enabled connection with chance
    /// [`weight_perturbation_chance`], adding zero-mean Gaussian
    /// noise. Disabled connections are left untouched.
    ///
    /// [`weight_perturbation_chance`]: GeneticConfig::weight_perturbation_chance
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig {
    ///     weight_perturbation_chance: 1.0,
    ///     weight_perturbation_std_dev: 0.5,
    ///     ..GeneticConfig::default()
    /// };
    /// let mut genome = Genome::new(&config, &mut InnovationRegistry::new(&config));
    /// let before = genome.connection(0).unwrap().weight();
    ///
    /// genome.mutate_weights(&config);
    ///
    /// assert_ne!(genome.connection(0).unwrap().weight(), before);
    /// ```
    pub fn mutate_weights(&mut self, config: &GeneticConfig) {
        let mut rng = rand::thread_rng();
        let mut perturbed = false;
        for connection in self.connections.values_mut().filter(|c| c.enabled()) {
            if rng.gen::<f32>() < config.weight_perturbation_chance {
                connection.perturb_weight(&mut rng, config);
                perturbed = true;
            }
        }
        if perturbed {
            self.evaluated = false;
        }
    }

    /// Induces a _node mutation_ in the genome: a random enabled
    /// connection `S -> T` with weight `W` is disabled, and a new
    /// hidden node `N` is inserted with connections `S -> N`
    /// (weight 1.0) and `N -> T` (weight `W`).
    ///
    /// If successful, returns the identifiers of the new incoming
    /// connection, node and outgoing connection.
    ///
    /// # Errors
    /// Returns an error if the genome has no enabled connections.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig::default();
    /// let mut registry = InnovationRegistry::new(&config);
    /// let mut genome = Genome::new(&config, &mut registry);
    ///
    /// let (incoming, node, outgoing) = genome.mutate_add_node(&mut registry, &config).unwrap();
    ///
    /// assert_eq!(genome.connection(incoming).unwrap().weight(), 1.0);
    /// assert_eq!(genome.connection(incoming).unwrap().target(), node);
    /// assert_eq!(genome.connection(outgoing).unwrap().source(), node);
    /// assert_eq!(genome.connections().filter(|c| !c.enabled()).count(), 1);
    /// ```
    pub fn mutate_add_node(
        &mut self,
        registry: &mut InnovationRegistry,
        config: &GeneticConfig,
    ) -> Result<(Innovation, NodeId, Innovation), MutationError> {
        let split = self
            .choose_enabled_connection()
            .ok_or(MutationError::NoEnabledConnections)?;
        Ok(self.split_connection(split, registry, config))
    }

    /// Disables `split` and inserts a node in its place.
    fn split_connection(
        &mut self,
        split: Innovation,
        registry: &mut InnovationRegistry,
        config: &GeneticConfig,
    ) -> (Innovation, NodeId, Innovation) {
        let split_gene = self.connections[&split];
        let duplicate = registry
            .registered_split(split)
            .map_or(false, |(incoming, node, outgoing)| {
                self.nodes.contains_key(&node)
                    || self.connections.contains_key(&incoming)
                    || self.connections.contains_key(&outgoing)
            });
        let (incoming, node, outgoing) = registry.split_innovation(&split_gene, duplicate);
        debug_assert!(!self.nodes.contains_key(&node));

        if let Some(gene) = self.connections.get_mut(&split) {
            gene.disable();
        }
        let activation = config
            .hidden_activations
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();
        self.nodes
            .insert(node, NodeGene::new(node, NodeRole::Hidden, activation));
        self.insert_connection(ConnectionGene::new(incoming, split_gene.source(), node, 1.0));
        self.insert_connection(ConnectionGene::new(
            outgoing,
            node,
            split_gene.target(),
            split_gene.weight(),
        ));

        (incoming, node, outgoing)
    }

    fn choose_enabled_connection(&self) -> Option<Innovation> {
        self.connections
            .values()
            .filter(|c| c.enabled())
            .map(|c| c.innovation())
            .choose(&mut rand::thread_rng())
    }

    /// Induces a _connection mutation_ in the genome between a
    /// random source node (any role) and a random target node
    /// (output or hidden). If successful, returns the new
    /// connection's innovation.
    ///
    /// # Errors
    /// Returns an error, leaving the genome unchanged, if the
    /// chosen nodes are already connected (enabled or not) or
    /// if the connection would close a cycle.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry, MutationError};
    ///
    /// let config = GeneticConfig::default();
    /// let mut registry = InnovationRegistry::new(&config);
    ///
    /// // A fully connected genome without hidden nodes
    /// // has no room for new connections.
    /// let mut genome = Genome::new(&config, &mut registry);
    /// assert!(genome.mutate_add_connection(&mut registry, &config).is_err());
    ///
    /// // Without connections, only self loops on the output fail.
    /// let mut genome = Genome::unconnected(&config, &mut registry);
    /// let innovation = loop {
    ///     if let Ok(innovation) = genome.mutate_add_connection(&mut registry, &config) {
    ///         break innovation;
    ///     }
    /// };
    /// assert_eq!(genome.connections().count(), 1);
    /// assert!(innovation < registry.connection_count());
    /// ```
    pub fn mutate_add_connection(
        &mut self,
        registry: &mut InnovationRegistry,
        config: &GeneticConfig,
    ) -> Result<Innovation, MutationError> {
        let mut rng = rand::thread_rng();
        let source = self
            .nodes
            .keys()
            .copied()
            .choose(&mut rng)
            .ok_or(MutationError::NoViableTarget)?;
        let target = self
            .nodes
            .values()
            .filter(|n| !n.role().is_sensor())
            .map(|n| n.id())
            .choose(&mut rng)
            .ok_or(MutationError::NoViableTarget)?;

        if self.node_pairings.contains(&(source, target)) {
            return Err(MutationError::ConnectionExists {
                from: source,
                to: target,
            });
        }
        if source == target || self.reaches(target, source) {
            return Err(MutationError::WouldCycle {
                from: source,
                to: target,
            });
        }

        let innovation = registry.connection_innovation(source, target);
        if self.connections.contains_key(&innovation) {
            return Err(MutationError::ConnectionExists {
                from: source,
                to: target,
            });
        }
        self.insert_connection(ConnectionGene::new(
            innovation,
            source,
            target,
            ConnectionGene::random_weight(config),
        ));
        Ok(innovation)
    }

    /// Returns whether `to` is reachable from `from`
    /// through enabled connections.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut outgoing: HashMap<NodeId, Vec<NodeId>, RandomState> = HashMap::default();
        for connection in self.connections.values().filter(|c| c.enabled()) {
            outgoing
                .entry(connection.source())
                .or_default()
                .push(connection.target());
        }
        let mut visited: HashSet<NodeId, RandomState> = HashSet::default();
        let mut pending = vec![from];
        while let Some(node) = pending.pop() {
            if node == to {
                return true;
            }
            if visited.insert(node) {
                if let Some(targets) = outgoing.get(&node) {
                    pending.extend(targets);
                }
            }
        }
        false
    }

    /// Creates a child genome from two parents, aligning their
    /// connection genes by innovation.
    ///
    /// Matching genes are copied from either parent at random.
    /// A matching gene disabled in either parent stays disabled.
    /// Disjoint and excess genes are inherited from the parent
    /// designated by [`crossover_policy`], as are its input,
    /// bias and output nodes. The child gets a fresh id, the
    /// designated parent's species and no fitness.
    ///
    /// [`crossover_policy`]: GeneticConfig::crossover_policy
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    /// use evoneat::FitnessGoal;
    ///
    /// let config = GeneticConfig::default();
    /// let mut registry = InnovationRegistry::new(&config);
    /// let mut larger = Genome::new(&config, &mut registry);
    /// let smaller = Genome::new(&config, &mut registry);
    /// larger.mutate_add_node(&mut registry, &config).unwrap();
    ///
    /// let child = Genome::crossover(&larger, &smaller, FitnessGoal::Maximize, &mut registry, &config);
    ///
    /// // Unmatched genes come from the larger parent.
    /// assert_eq!(child.connections().count(), larger.connections().count());
    /// assert_eq!(child.nodes().count(), larger.nodes().count());
    /// assert!(!child.is_evaluated());
    /// ```
    pub fn crossover(
        parent1: &Genome,
        parent2: &Genome,
        goal: FitnessGoal,
        registry: &mut InnovationRegistry,
        config: &GeneticConfig,
    ) -> Genome {
        let (primary, secondary) =
            Self::designate_parents(parent1, parent2, goal, config.crossover_policy);
        let mut rng = rand::thread_rng();
        let mut child = Self::empty(registry.next_genome_id());
        child.species = primary.species;

        for node in primary.nodes.values().filter(|n| n.role() != NodeRole::Hidden) {
            child.nodes.insert(node.id(), *node);
        }
        for (innovation, gene) in &primary.connections {
            let inherited = match secondary.connections.get(innovation) {
                Some(other) => {
                    let mut chosen = if rng.gen::<bool>() { *gene } else { *other };
                    if !gene.enabled() || !other.enabled() {
                        chosen.disable();
                    }
                    chosen
                }
                None => *gene,
            };
            for endpoint in [inherited.source(), inherited.target()] {
                if let Some(node) = primary.nodes.get(&endpoint) {
                    child.nodes.entry(endpoint).or_insert(*node);
                }
            }
            child.insert_connection(inherited);
        }

        child
    }

    /// Returns `(primary, secondary)`, with the primary parent
    /// being the one unmatched genes are inherited from.
    fn designate_parents<'a>(
        parent1: &'a Genome,
        parent2: &'a Genome,
        goal: FitnessGoal,
        policy: CrossoverPolicy,
    ) -> (&'a Genome, &'a Genome) {
        let by_size = parent1.connections.len().cmp(&parent2.connections.len());
        let by_fitness = goal.compare(parent1.fitness, parent2.fitness);
        let ordering = match policy {
            CrossoverPolicy::LargerParent => by_size.then(by_fitness),
            CrossoverPolicy::FitterParent => by_fitness.then(by_size),
        };
        if ordering.is_lt() {
            (parent2, parent1)
        } else {
            (parent1, parent2)
        }
    }

    /// Returns a mutation-ready copy of the genome with a fresh id
    /// and no fitness.
    pub(crate) fn asexual_offspring(&self, registry: &mut InnovationRegistry) -> Genome {
        Genome {
            id: registry.next_genome_id(),
            evaluated: false,
            adjusted_fitness: 0.0,
            ..self.clone()
        }
    }

    /// Calculates the compatibility distance between `first` and
    /// `second`. See [`compatibility::distance`].
    pub fn genetic_distance(first: &Genome, second: &Genome, config: &GeneticConfig) -> f32 {
        compatibility::distance(first, second, config)
    }

    pub fn id(&self) -> GenomeId {
        self.id
    }

    /// Returns the species the genome was last assigned to.
    pub fn species(&self) -> Option<SpeciesId> {
        self.species
    }

    pub(crate) fn set_species(&mut self, species: SpeciesId) {
        self.species = Some(species);
    }

    /// Returns an iterator over the genome's connection genes.
    ///
    /// # Notes
    /// No ordering is guaranteed.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.connections.values()
    }

    /// Returns an iterator over the genome's node genes.
    ///
    /// # Notes
    /// No ordering is guaranteed.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeGene> {
        self.nodes.values()
    }

    pub fn connection(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        self.connections.get(&innovation)
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeGene> {
        self.nodes.get(&id)
    }

    /// Sets the genome's fitness and marks it as evaluated.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, InnovationRegistry};
    ///
    /// let config = GeneticConfig::default();
    /// let mut genome = Genome::new(&config, &mut InnovationRegistry::new(&config));
    /// assert!(!genome.is_evaluated());
    ///
    /// genome.set_fitness(3.5);
    /// assert_eq!(genome.fitness(), 3.5);
    /// assert!(genome.is_evaluated());
    /// ```
    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
        self.evaluated = true;
    }

    /// Sets the genome's fitness without marking it as evaluated.
    pub(crate) fn reset_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
        self.evaluated = false;
    }

    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Returns the fitness after sharing within the genome's species.
    pub fn adjusted_fitness(&self) -> f32 {
        self.adjusted_fitness
    }

    pub(crate) fn set_adjusted_fitness(&mut self, adjusted_fitness: f32) {
        self.adjusted_fitness = adjusted_fitness;
    }

    /// Returns whether the current fitness was computed for the
    /// genome's current structure and weights.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nodes: Vec<_> = self.nodes.values().collect();
        nodes.sort_unstable_by_key(|n| n.id());
        let mut connections: Vec<_> = self.connections.values().collect();
        connections.sort_unstable_by_key(|c| c.innovation());
        writeln!(f, "Genome {} (fitness {}):", self.id, self.fitness)?;
        writeln!(f, "\tNodes:")?;
        for node in nodes {
            writeln!(f, "\t\t{}", node)?;
        }
        writeln!(f, "\tConnections:")?;
        for connection in connections {
            writeln!(f, "\t\t{}", connection)?;
        }
        Ok(())
    }
}
