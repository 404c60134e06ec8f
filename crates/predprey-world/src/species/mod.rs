//! Concrete species and the breeding behaviour they share.

pub mod fox;
pub mod rabbit;

pub use fox::Fox;
pub use rabbit::Rabbit;

use crate::field::Field;
use crate::organism::Organism;
use crate::simulation::Habitat;
use predprey_core::{BreedingRules, Location, Species};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Construct an individual of `species` at `location`.
pub fn create(
    species: Species,
    random_age: bool,
    field: &mut Field,
    location: Location,
    rng: &mut ChaCha8Rng,
) -> Box<dyn Organism> {
    match species {
        Species::Rabbit => Box::new(Rabbit::new(random_age, field, location, rng)),
        Species::Fox => Box::new(Fox::new(random_age, field, location, rng)),
    }
}

/// Number of births this step: zero below breeding age or when the
/// breeding roll fails, otherwise uniform in `1..=max_litter_size`.
pub fn litter_size(rules: &BreedingRules, age: u32, rng: &mut ChaCha8Rng) -> usize {
    if rules.can_breed(age)
        && rules.max_litter_size > 0
        && rng.gen::<f64>() < rules.breeding_probability
    {
        rng.gen_range(1..=rules.max_litter_size) as usize
    } else {
        0
    }
}

/// Place newborns of `parent`'s species into free adjacent cells.
///
/// Births beyond the number of free cells are lost. Returns how many were
/// actually born.
pub(crate) fn give_birth(
    parent: &dyn Organism,
    rules: &BreedingRules,
    habitat: &mut Habitat<'_>,
    newborns: &mut Vec<Box<dyn Organism>>,
) -> usize {
    let Some(location) = parent.location() else {
        return 0;
    };

    let births = litter_size(rules, parent.age(), habitat.rng);
    if births == 0 {
        return 0;
    }

    let free = habitat.field.free_adjacent_locations(location, habitat.rng);
    let mut born = 0;
    for loc in free.into_iter().take(births) {
        let young = parent.create_organism(false, habitat.field, loc, habitat.rng);
        newborns.push(young);
        born += 1;
    }

    trace!(
        parent_id = %parent.id(),
        species = %parent.species(),
        litter = births,
        born = born,
        "Birth"
    );
    born
}
