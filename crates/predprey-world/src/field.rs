//! Dense 2D field recording which organism occupies each cell.

use predprey_core::{FieldId, Location, OrganismId};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// A bounded rectangular field.
///
/// Cells hold organism handles, never organisms: the field is the source of
/// truth for occupancy but does not own anything that stands on it.
#[derive(Debug, Clone)]
pub struct Field {
    id: FieldId,
    depth: usize,
    width: usize,
    cells: Vec<Option<OrganismId>>,
}

impl Field {
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            id: FieldId::next(),
            depth,
            width,
            cells: vec![None; depth * width],
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Put `organism` at `location`, overwriting whatever was there.
    ///
    /// No collision check happens here; callers vacate a cell before
    /// re-using it.
    ///
    /// # Panics
    /// If `location` lies outside the field.
    pub fn place(&mut self, organism: OrganismId, location: Location) {
        let index = self.index(location);
        self.cells[index] = Some(organism);
    }

    /// Vacate `location`. No-op if already vacant.
    ///
    /// # Panics
    /// If `location` lies outside the field.
    pub fn clear(&mut self, location: Location) {
        let index = self.index(location);
        self.cells[index] = None;
    }

    /// Vacate every cell
    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    /// Occupant of `location`, if any.
    ///
    /// # Panics
    /// If `location` lies outside the field.
    pub fn organism_at(&self, location: Location) -> Option<OrganismId> {
        self.cells[self.index(location)]
    }

    pub fn contains(&self, location: Location) -> bool {
        location.row < self.depth && location.col < self.width
    }

    /// All in-bounds neighbours of `location` (8-neighbourhood, centre
    /// excluded) in random order.
    pub fn adjacent_locations(&self, location: Location, rng: &mut ChaCha8Rng) -> Vec<Location> {
        let mut locations = Vec::with_capacity(8);

        for d_row in -1..=1 {
            for d_col in -1..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }

                if let Some(next) = location.offset(d_row, d_col) {
                    if self.contains(next) {
                        locations.push(next);
                    }
                }
            }
        }

        // Randomise so organisms don't drift towards one corner
        locations.shuffle(rng);
        locations
    }

    /// Vacant neighbours of `location`, in random order
    pub fn free_adjacent_locations(
        &self,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Location> {
        self.adjacent_locations(location, rng)
            .into_iter()
            .filter(|loc| self.organism_at(*loc).is_none())
            .collect()
    }

    /// A vacant neighbour of `location`, or `None` if all are taken.
    pub fn free_adjacent_location(
        &self,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Option<Location> {
        self.free_adjacent_locations(location, rng).into_iter().next()
    }

    /// A random neighbour of `location`, occupied or not. `None` only for a
    /// 1x1 field.
    pub fn random_adjacent_location(
        &self,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Option<Location> {
        self.adjacent_locations(location, rng).into_iter().next()
    }

    /// Iterator over occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = (Location, OrganismId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|id| (self.index_to_location(i), id)))
    }

    fn index(&self, location: Location) -> usize {
        assert!(
            self.contains(location),
            "location {} outside {}x{} field",
            location,
            self.depth,
            self.width
        );
        location.row * self.width + location.col
    }

    fn index_to_location(&self, index: usize) -> Location {
        Location::new(index / self.width, index % self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_field_creation() {
        let field = Field::new(5, 7);
        assert_eq!(field.depth(), 5);
        assert_eq!(field.width(), 7);
        assert_eq!(field.cells.len(), 35);
        assert_eq!(field.occupied().count(), 0);
    }

    #[test]
    fn test_place_and_clear() {
        let mut field = Field::new(5, 5);
        let id = OrganismId::from(1u128);
        let loc = Location::new(2, 3);

        field.place(id, loc);
        assert_eq!(field.organism_at(loc), Some(id));

        field.clear(loc);
        assert_eq!(field.organism_at(loc), None);

        // Clearing a vacant cell is harmless
        field.clear(loc);
        assert_eq!(field.organism_at(loc), None);
    }

    #[test]
    fn test_place_overwrites() {
        let mut field = Field::new(3, 3);
        let first = OrganismId::from(1u128);
        let second = OrganismId::from(2u128);
        let loc = Location::new(1, 1);

        field.place(first, loc);
        field.place(second, loc);
        assert_eq!(field.organism_at(loc), Some(second));
        assert_eq!(field.occupied().count(), 1);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let mut field = Field::new(3, 3);
        field.place(OrganismId::from(1u128), Location::new(3, 0));
    }

    #[test]
    fn test_adjacent_locations() {
        let field = Field::new(10, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let neighbors = field.adjacent_locations(Location::new(5, 5), &mut rng);
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&Location::new(5, 5)));

        // Corners and edges are clipped, not wrapped
        let corner = field.adjacent_locations(Location::new(0, 0), &mut rng);
        assert_eq!(corner.len(), 3);
        let edge = field.adjacent_locations(Location::new(9, 4), &mut rng);
        assert_eq!(edge.len(), 5);
        assert!(edge.iter().all(|loc| field.contains(*loc)));
    }

    #[test]
    fn test_free_adjacent_locations() {
        let mut field = Field::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let centre = Location::new(1, 1);

        for (i, loc) in field.adjacent_locations(centre, &mut rng).into_iter().enumerate() {
            if loc != Location::new(0, 0) {
                field.place(OrganismId::from(i as u128), loc);
            }
        }

        assert_eq!(
            field.free_adjacent_locations(centre, &mut rng),
            vec![Location::new(0, 0)]
        );
        assert_eq!(
            field.free_adjacent_location(centre, &mut rng),
            Some(Location::new(0, 0))
        );

        field.place(OrganismId::from(99u128), Location::new(0, 0));
        assert_eq!(field.free_adjacent_location(centre, &mut rng), None);
        assert!(field.random_adjacent_location(centre, &mut rng).is_some());
    }

    #[test]
    fn test_single_cell_field_has_no_neighbours() {
        let field = Field::new(1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(field.random_adjacent_location(Location::new(0, 0), &mut rng), None);
    }

    #[test]
    fn test_occupied_and_clear_all() {
        let mut field = Field::new(4, 6);
        let a = OrganismId::from(1u128);
        let b = OrganismId::from(2u128);
        field.place(a, Location::new(0, 5));
        field.place(b, Location::new(3, 1));

        let mut occupied: Vec<_> = field.occupied().collect();
        occupied.sort_by_key(|(loc, _)| (loc.row, loc.col));
        assert_eq!(occupied, vec![(Location::new(0, 5), a), (Location::new(3, 1), b)]);

        field.clear_all();
        assert_eq!(field.occupied().count(), 0);
    }
}
