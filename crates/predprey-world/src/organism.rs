//! Organism state and lifecycle.

use crate::field::Field;
use crate::simulation::Habitat;
use predprey_core::{FieldId, Location, OrganismId, Species};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// State every organism owns regardless of species.
///
/// While alive, `location` and `field` are both set and the field cell at
/// `location` holds `id`. Death clears both together and is permanent.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    id: OrganismId,
    age: u32,
    alive: bool,
    location: Option<Location>,
    field: Option<FieldId>,
    layer: u8,
}

impl Lifecycle {
    /// Create the state for a new organism and register it in `field`.
    ///
    /// With `random_age` the starting age is uniform in `[0, max_age)`,
    /// otherwise zero.
    pub fn new(
        random_age: bool,
        max_age: u32,
        layer: u8,
        field: &mut Field,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let age = if random_age && max_age > 0 {
            rng.gen_range(0..max_age)
        } else {
            0
        };

        let mut lifecycle = Self {
            id: OrganismId::from_random_bytes(rng.gen()),
            age,
            alive: true,
            location: None,
            field: Some(field.id()),
            layer,
        };
        lifecycle.set_location(field, location);
        lifecycle
    }

    pub fn id(&self) -> OrganismId {
        self.id
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn field(&self) -> Option<FieldId> {
        self.field
    }

    pub fn layer(&self) -> u8 {
        self.layer
    }

    /// Age by one step. Exceeding `max_age` is fatal; reaching it is not.
    pub fn increment_age(&mut self, max_age: u32, field: &mut Field) {
        self.age += 1;
        if self.age > max_age {
            self.set_dead(field);
        }
    }

    /// Mark dead and vacate the field. Calling again changes nothing.
    pub fn set_dead(&mut self, field: &mut Field) {
        self.alive = false;
        if let Some(location) = self.location.take() {
            debug_assert_eq!(
                self.field,
                Some(field.id()),
                "organism {} dying in a foreign field",
                self.id
            );
            field.clear(location);
            self.field = None;
        }
    }

    /// Move to `new_location`, vacating the previous cell first.
    pub fn set_location(&mut self, field: &mut Field, new_location: Location) {
        debug_assert_eq!(
            self.field,
            Some(field.id()),
            "organism {} is not placed in {}",
            self.id,
            field.id()
        );

        if let Some(old) = self.location {
            field.clear(old);
        }
        field.place(self.id, new_location);
        self.location = Some(new_location);
    }
}

/// One individual taking part in the simulation.
///
/// Species implement the required hooks; the lifecycle operations are
/// provided on top of [`Lifecycle`] and should not be overridden.
pub trait Organism: fmt::Debug {
    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn species(&self) -> Species;

    /// Oldest age this species survives. Constant per species.
    fn max_age(&self) -> u32;

    /// Construct a new individual of the same species at `location`.
    fn create_organism(
        &self,
        random_age: bool,
        field: &mut Field,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Box<dyn Organism>;

    /// Behave for one step: age, feed, move, breed. Offspring go into
    /// `newborns` and must not act until the next step.
    ///
    /// Only called while [`Organism::is_active`] holds.
    fn act(&mut self, habitat: &mut Habitat<'_>, newborns: &mut Vec<Box<dyn Organism>>);

    fn id(&self) -> OrganismId {
        self.lifecycle().id()
    }

    fn age(&self) -> u32 {
        self.lifecycle().age()
    }

    fn location(&self) -> Option<Location> {
        self.lifecycle().location()
    }

    fn is_alive(&self) -> bool {
        self.lifecycle().is_alive()
    }

    /// Whether the driver should keep this organism around
    fn is_active(&self) -> bool {
        self.is_alive()
    }

    fn layer_value(&self) -> u8 {
        self.lifecycle().layer()
    }

    fn increment_age(&mut self, field: &mut Field) {
        let max_age = self.max_age();
        self.lifecycle_mut().increment_age(max_age, field);
    }

    fn set_dead(&mut self, field: &mut Field) {
        self.lifecycle_mut().set_dead(field);
    }

    fn set_location(&mut self, field: &mut Field, new_location: Location) {
        self.lifecycle_mut().set_location(field, new_location);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use predprey_core::DEFAULT_LAYER;
    use rand::SeedableRng;

    /// Short-lived species used to exercise the lifecycle in isolation.
    #[derive(Debug)]
    pub(crate) struct Mayfly {
        lifecycle: Lifecycle,
    }

    impl Mayfly {
        pub(crate) const MAX_AGE: u32 = 3;

        pub(crate) fn new(
            random_age: bool,
            field: &mut Field,
            location: Location,
            rng: &mut ChaCha8Rng,
        ) -> Self {
            Self {
                lifecycle: Lifecycle::new(
                    random_age,
                    Self::MAX_AGE,
                    DEFAULT_LAYER,
                    field,
                    location,
                    rng,
                ),
            }
        }
    }

    impl Organism for Mayfly {
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
            Self::MAX_AGE
        }

        fn create_organism(
            &self,
            random_age: bool,
            field: &mut Field,
            location: Location,
            rng: &mut ChaCha8Rng,
        ) -> Box<dyn Organism> {
            Box::new(Mayfly::new(random_age, field, location, rng))
        }

        fn act(&mut self, habitat: &mut Habitat<'_>, _newborns: &mut Vec<Box<dyn Organism>>) {
            self.increment_age(habitat.field);
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_construction_registers_in_field() {
        let mut field = Field::new(5, 5);
        let mut rng = rng();
        let loc = Location::new(2, 3);

        let mayfly = Mayfly::new(false, &mut field, loc, &mut rng);

        assert_eq!(mayfly.age(), 0);
        assert!(mayfly.is_active());
        assert_eq!(mayfly.location(), Some(loc));
        assert_eq!(mayfly.lifecycle().field(), Some(field.id()));
        assert_eq!(field.organism_at(loc), Some(mayfly.id()));
        assert_eq!(mayfly.layer_value(), DEFAULT_LAYER);
    }

    #[test]
    fn test_aging_to_death() {
        let mut field = Field::new(5, 5);
        let mut rng = rng();
        let loc = Location::new(2, 3);
        let mut mayfly = Mayfly::new(false, &mut field, loc, &mut rng);

        for _ in 0..3 {
            mayfly.increment_age(&mut field);
        }
        assert!(mayfly.is_active());
        assert_eq!(mayfly.age(), 3);
        assert_eq!(field.organism_at(loc), Some(mayfly.id()));

        mayfly.increment_age(&mut field);
        assert!(!mayfly.is_active());
        assert_eq!(mayfly.age(), 4);
        assert_eq!(field.organism_at(loc), None);
        assert_eq!(mayfly.location(), None);
        assert_eq!(mayfly.lifecycle().field(), None);
    }

    #[test]
    fn test_random_age_within_bounds() {
        let mut field = Field::new(10, 10);
        let mut rng = rng();

        for row in 0..10 {
            for col in 0..10 {
                let mayfly = Mayfly::new(true, &mut field, Location::new(row, col), &mut rng);
                assert!(mayfly.age() < Mayfly::MAX_AGE);
            }
        }
    }

    #[test]
    fn test_survivor_count_from_any_start_age() {
        let mut rng = rng();
        for start in 0..=Mayfly::MAX_AGE {
            let mut field = Field::new(2, 2);
            let mut mayfly = Mayfly::new(false, &mut field, Location::new(0, 0), &mut rng);
            mayfly.lifecycle.age = start;

            for _ in 0..(Mayfly::MAX_AGE - start) {
                mayfly.increment_age(&mut field);
            }
            assert!(mayfly.is_active(), "start age {}", start);

            mayfly.increment_age(&mut field);
            assert!(!mayfly.is_active(), "start age {}", start);
        }
    }

    #[test]
    fn test_set_location_moves_between_cells() {
        let mut field = Field::new(5, 5);
        let mut rng = rng();
        let mut a = Mayfly::new(false, &mut field, Location::new(0, 0), &mut rng);
        let b = Mayfly::new(false, &mut field, Location::new(4, 4), &mut rng);

        a.set_location(&mut field, Location::new(1, 1));

        assert_eq!(field.organism_at(Location::new(0, 0)), None);
        assert_eq!(field.organism_at(Location::new(1, 1)), Some(a.id()));
        assert_eq!(a.location(), Some(Location::new(1, 1)));
        assert_eq!(b.location(), Some(Location::new(4, 4)));
        assert_eq!(field.organism_at(Location::new(4, 4)), Some(b.id()));
    }

    #[test]
    fn test_set_location_same_cell() {
        let mut field = Field::new(3, 3);
        let mut rng = rng();
        let loc = Location::new(1, 2);
        let mut mayfly = Mayfly::new(false, &mut field, loc, &mut rng);

        mayfly.set_location(&mut field, loc);
        assert_eq!(field.organism_at(loc), Some(mayfly.id()));
        assert_eq!(field.occupied().count(), 1);
    }

    #[test]
    fn test_set_dead_is_idempotent() {
        let mut field = Field::new(5, 5);
        let mut rng = rng();
        let loc = Location::new(3, 1);
        let mut mayfly = Mayfly::new(false, &mut field, loc, &mut rng);

        mayfly.set_dead(&mut field);
        let age = mayfly.age();
        assert!(!mayfly.is_active());
        assert_eq!(mayfly.location(), None);
        assert_eq!(mayfly.lifecycle().field(), None);
        assert_eq!(field.organism_at(loc), None);

        // A newcomer takes the cell; a second death must not evict it
        let newcomer = Mayfly::new(false, &mut field, loc, &mut rng);
        mayfly.set_dead(&mut field);
        assert!(!mayfly.is_active());
        assert_eq!(mayfly.age(), age);
        assert_eq!(mayfly.location(), None);
        assert_eq!(field.organism_at(loc), Some(newcomer.id()));
    }

    #[test]
    fn test_create_organism_leaves_parent_untouched() {
        let mut field = Field::new(4, 4);
        let mut rng = rng();
        let parent = Mayfly::new(false, &mut field, Location::new(0, 0), &mut rng);

        let child = parent.create_organism(false, &mut field, Location::new(0, 1), &mut rng);

        assert_ne!(child.id(), parent.id());
        assert_eq!(child.age(), 0);
        assert_eq!(parent.location(), Some(Location::new(0, 0)));
        assert_eq!(field.organism_at(Location::new(0, 1)), Some(child.id()));
        assert_eq!(field.organism_at(Location::new(0, 0)), Some(parent.id()));
    }
}
