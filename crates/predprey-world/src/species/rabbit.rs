//! Rabbits: prey that age, breed and wander.

use super::give_birth;
use crate::field::Field;
use crate::organism::{Lifecycle, Organism};
use crate::simulation::Habitat;
use predprey_core::{BreedingRules, Location, Species, DEFAULT_LAYER};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

#[derive(Debug)]
pub struct Rabbit {
    lifecycle: Lifecycle,
}

impl Rabbit {
    pub const RULES: BreedingRules = BreedingRules::RABBIT;

    pub fn new(
        random_age: bool,
        field: &mut Field,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                random_age,
                Self::RULES.max_age,
                DEFAULT_LAYER,
                field,
                location,
                rng,
            ),
        }
    }
}

impl Organism for Rabbit {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn species(&self) -> Species {
        Species::Rabbit
    }

    fn max_age(&self) -> u32 {
        Self::RULES.max_age
    }

    fn create_organism(
        &self,
        random_age: bool,
        field: &mut Field,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Box<dyn Organism> {
        Box::new(Rabbit::new(random_age, field, location, rng))
    }

    /// Age, breed, then hop to a free neighbouring cell. A rabbit with
    /// nowhere to go dies of overcrowding.
    fn act(&mut self, habitat: &mut Habitat<'_>, newborns: &mut Vec<Box<dyn Organism>>) {
        self.increment_age(habitat.field);
        if !self.is_alive() {
            return;
        }

        give_birth(&*self, &Self::RULES, habitat, newborns);

        let Some(location) = self.location() else {
            return;
        };
        match habitat.field.free_adjacent_location(location, habitat.rng) {
            Some(next) => {
                trace!(organism_id = %self.id(), from = %location, to = %next, "Rabbit moved");
                self.set_location(habitat.field, next);
            }
            None => {
                trace!(organism_id = %self.id(), at = %location, "Rabbit overcrowded");
                self.set_dead(habitat.field);
            }
        }
    }
}
