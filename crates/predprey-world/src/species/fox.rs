//! Foxes: predators that hunt rabbits and starve without them.

use super::give_birth;
use crate::field::Field;
use crate::organism::{Lifecycle, Organism};
use crate::simulation::Habitat;
use predprey_core::{BreedingRules, Location, Species, DEFAULT_LAYER, RABBIT_FOOD_VALUE};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

#[derive(Debug)]
pub struct Fox {
    lifecycle: Lifecycle,
    /// Steps left before starving
    food_level: u32,
}

impl Fox {
    pub const RULES: BreedingRules = BreedingRules::FOX;

    /// A fox with `random_age` also starts with a random food level;
    /// otherwise it starts fully fed.
    pub fn new(
        random_age: bool,
        field: &mut Field,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let lifecycle = Lifecycle::new(
            random_age,
            Self::RULES.max_age,
            DEFAULT_LAYER,
            field,
            location,
            rng,
        );
        let food_level = if random_age {
            rng.gen_range(0..RABBIT_FOOD_VALUE)
        } else {
            RABBIT_FOOD_VALUE
        };

        Self {
            lifecycle,
            food_level,
        }
    }

    pub fn food_level(&self) -> u32 {
        self.food_level
    }

    fn increment_hunger(&mut self, field: &mut Field) {
        self.food_level = self.food_level.saturating_sub(1);
        if self.food_level == 0 {
            self.set_dead(field);
        }
    }

    /// Eat the first live rabbit found next to `location`. Returns the cell
    /// it occupied, now vacant.
    fn find_food(&mut self, location: Location, habitat: &mut Habitat<'_>) -> Option<Location> {
        for candidate in habitat.field.adjacent_locations(location, habitat.rng) {
            let Some(id) = habitat.field.organism_at(candidate) else {
                continue;
            };
            // Occupants missing from the population were born this step
            let Some(prey) = habitat.population.get_mut(id) else {
                continue;
            };

            if prey.species() == Species::Rabbit && prey.is_alive() {
                prey.set_dead(habitat.field);
                self.food_level = RABBIT_FOOD_VALUE;
                trace!(organism_id = %self.id(), prey_id = %id, at = %candidate, "Fox ate rabbit");
                return Some(candidate);
            }
        }

        None
    }
}

impl Organism for Fox {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn species(&self) -> Species {
        Species::Fox
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
        Box::new(Fox::new(random_age, field, location, rng))
    }

    fn act(&mut self, habitat: &mut Habitat<'_>, newborns: &mut Vec<Box<dyn Organism>>) {
        self.increment_age(habitat.field);
        self.increment_hunger(habitat.field);
        if !self.is_alive() {
            return;
        }

        give_birth(&*self, &Self::RULES, habitat, newborns);

        let Some(location) = self.location() else {
            return;
        };
        let next = match self.find_food(location, habitat) {
            Some(prey_cell) => Some(prey_cell),
            None => habitat.field.free_adjacent_location(location, habitat.rng),
        };

        match next {
            Some(next) => self.set_location(habitat.field, next),
            None => {
                trace!(organism_id = %self.id(), at = %location, "Fox overcrowded");
                self.set_dead(habitat.field);
            }
        }
    }
}
