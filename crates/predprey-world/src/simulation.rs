//! Step driver: owns the live population and advances it one tick at a time.

use crate::field::Field;
use crate::organism::Organism;
use crate::species;
use predprey_core::{Error, Location, OrganismId, Result, SimulationConfig, Species};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, event, info, instrument, Level};

/// What an acting organism can reach during its turn.
pub struct Habitat<'a> {
    pub field: &'a mut Field,
    /// Everyone else; the acting organism is taken out for the duration.
    pub population: &'a mut Population,
    pub rng: &'a mut ChaCha8Rng,
}

/// Live organisms in acting order.
#[derive(Debug, Default)]
pub struct Population {
    order: Vec<OrganismId>,
    members: HashMap<OrganismId, Box<dyn Organism>>,
}

impl Population {
    /// Append at the end of the acting order
    pub fn push(&mut self, organism: Box<dyn Organism>) {
        let id = organism.id();
        if self.members.insert(id, organism).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: OrganismId) -> Option<&(dyn Organism + 'static)> {
        self.members.get(&id).map(|o| &**o)
    }

    pub fn get_mut(&mut self, id: OrganismId) -> Option<&mut (dyn Organism + 'static)> {
        self.members.get_mut(&id).map(|o| &mut **o)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Organisms in acting order
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Organism + 'static)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.members.get(id).map(|o| &**o))
    }

    pub fn counts(&self) -> BTreeMap<Species, usize> {
        let mut counts: BTreeMap<Species, usize> =
            Species::all().into_iter().map(|s| (s, 0)).collect();
        for organism in self.members.values() {
            *counts.entry(organism.species()).or_default() += 1;
        }
        counts
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Remove an organism for its turn; its place in the order is kept.
    fn take(&mut self, id: OrganismId) -> Option<Box<dyn Organism>> {
        self.members.remove(&id)
    }

    fn restore(&mut self, organism: Box<dyn Organism>) {
        self.members.insert(organism.id(), organism);
    }

    /// Drop inactive organisms, returning how many went.
    fn retain_active(&mut self) -> usize {
        let before = self.members.len();
        self.members.retain(|_, organism| organism.is_active());
        let members = &self.members;
        self.order.retain(|id| members.contains_key(id));
        before - self.members.len()
    }
}

/// Summary of a [`Simulator::simulate`] run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub steps_run: u64,
    pub final_step: u64,
    pub final_counts: BTreeMap<Species, usize>,
    pub total_births: u64,
    pub total_deaths: u64,
    pub viable: bool,
}

pub struct Simulator {
    field: Field,
    population: Population,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    step: u64,
    total_births: u64,
    total_deaths: u64,
}

impl Simulator {
    /// Validate `config`, build the field and populate it.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::empty(config)?;
        sim.populate();
        Ok(sim)
    }

    /// Like [`Simulator::new`] but with nobody on the field.
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            field: Field::new(config.depth, config.width),
            population: Population::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            step: 0,
            total_births: 0,
            total_deaths: 0,
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Fill the field from scratch. Each cell independently rolls for a fox,
    /// and failing that for a rabbit; both start at a random age.
    pub fn populate(&mut self) {
        self.population.clear();
        self.field.clear_all();

        for row in 0..self.field.depth() {
            for col in 0..self.field.width() {
                let location = Location::new(row, col);
                let species = if self.rng.gen::<f64>() < self.config.fox_creation_probability {
                    Species::Fox
                } else if self.rng.gen::<f64>() < self.config.rabbit_creation_probability {
                    Species::Rabbit
                } else {
                    continue;
                };

                let organism =
                    species::create(species, true, &mut self.field, location, &mut self.rng);
                self.population.push(organism);
            }
        }

        debug!(counts = ?self.population.counts(), "Field populated");
    }

    /// Put a single organism on a vacant cell.
    pub fn spawn(
        &mut self,
        species: Species,
        location: Location,
        random_age: bool,
    ) -> Result<OrganismId> {
        if !self.field.contains(location) {
            return Err(Error::Validation(format!(
                "Location {} outside {}x{} field",
                location,
                self.field.depth(),
                self.field.width()
            )));
        }
        if let Some(occupant) = self.field.organism_at(location) {
            return Err(Error::Validation(format!(
                "Location {} already occupied by {}",
                location, occupant
            )));
        }

        let organism =
            species::create(species, random_age, &mut self.field, location, &mut self.rng);
        let id = organism.id();
        self.population.push(organism);
        Ok(id)
    }

    /// Back to step zero with a fresh population
    pub fn reset(&mut self) {
        self.step = 0;
        self.total_births = 0;
        self.total_deaths = 0;
        self.populate();
        info!("Simulation reset");
    }

    pub fn population_counts(&self) -> BTreeMap<Species, usize> {
        self.population.counts()
    }

    /// More than one species still alive
    pub fn is_viable(&self) -> bool {
        self.population_counts().values().filter(|&&n| n > 0).count() > 1
    }

    /// Run up to `num_steps` steps, stopping early once the field is no
    /// longer viable.
    #[instrument(skip(self), fields(start_step = self.step))]
    pub fn simulate(&mut self, num_steps: u64) -> SimulationReport {
        info!("Starting simulation for {} steps", num_steps);

        let mut steps_run = 0;
        while steps_run < num_steps && self.is_viable() {
            self.simulate_one_step();
            steps_run += 1;
        }

        let report = SimulationReport {
            steps_run,
            final_step: self.step,
            final_counts: self.population_counts(),
            total_births: self.total_births,
            total_deaths: self.total_deaths,
            viable: self.is_viable(),
        };

        info!(
            event = "simulation_summary",
            steps_run = report.steps_run,
            final_step = report.final_step,
            total_births = report.total_births,
            total_deaths = report.total_deaths,
            viable = report.viable,
            counts = ?report.final_counts,
            "Simulation complete"
        );

        report
    }

    /// Advance one tick.
    ///
    /// Everyone active at the start acts once, in population order, and
    /// sees the field as left by those before them. Young born this tick
    /// join at the end of the order afterwards.
    pub fn simulate_one_step(&mut self) {
        self.step += 1;

        let acting: Vec<OrganismId> = self
            .population
            .iter()
            .filter(|o| o.is_active())
            .map(|o| o.id())
            .collect();

        let mut newborns: Vec<Box<dyn Organism>> = Vec::new();
        for id in acting {
            let Some(mut organism) = self.population.take(id) else {
                continue;
            };

            // Eaten earlier in this tick
            if organism.is_active() {
                let mut habitat = Habitat {
                    field: &mut self.field,
                    population: &mut self.population,
                    rng: &mut self.rng,
                };
                organism.act(&mut habitat, &mut newborns);
            }

            self.population.restore(organism);
        }

        let deaths = self.population.retain_active();
        let births = newborns.len();
        for young in newborns {
            self.population.push(young);
        }

        self.total_births += births as u64;
        self.total_deaths += deaths as u64;

        if deaths > 0 {
            event!(
                Level::DEBUG,
                counter_name = "organism_deaths",
                counter_value = deaths,
                step = self.step,
                "Organism deaths"
            );
        }
        if births > 0 {
            event!(
                Level::DEBUG,
                counter_name = "organism_births",
                counter_value = births,
                step = self.step,
                "Organism births"
            );
        }

        if self.config.log_interval > 0 && self.step % self.config.log_interval == 0 {
            self.emit_population_metrics();
        }
    }

    fn emit_population_metrics(&self) {
        let counts = self.population_counts();
        let foxes = counts.get(&Species::Fox).copied().unwrap_or(0);
        let rabbits = counts.get(&Species::Rabbit).copied().unwrap_or(0);

        info!(
            event = "population_metrics",
            step = self.step,
            total_population = self.population.len(),
            foxes = foxes,
            rabbits = rabbits,
            total_births = self.total_births,
            total_deaths = self.total_deaths,
            "Step {}: {} foxes, {} rabbits",
            self.step,
            foxes,
            rabbits
        );

        event!(
            Level::INFO,
            gauge_name = "population_total",
            gauge_value = self.population.len(),
            step = self.step,
            "Population gauge"
        );
    }
}
