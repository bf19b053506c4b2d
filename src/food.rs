use rand::Rng;

use crate::snake::{Position, Snake};

/// Picks a uniformly random free cell by rejection sampling.
///
/// Draws cells over the whole grid and redraws on any snake segment. Returns
/// `None` without sampling when the snake already covers every cell. With few
/// free cells left the expected number of draws grows with
/// `cells / free_cells`; there is no fallback scan.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid_size: u16,
    snake: &Snake,
) -> Option<Position> {
    let total_cells = usize::from(grid_size) * usize::from(grid_size);
    if snake.len() >= total_cells {
        return None;
    }

    let side = i32::from(grid_size);
    loop {
        let candidate = Position {
            x: rng.gen_range(0..side),
            y: rng.gen_range(0..side),
        };

        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::spawn_position;
    use crate::snake::{Position, Snake};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 0 },
            Position { x: 1, y: 0 },
            Position { x: 2, y: 0 },
        ])
        .unwrap();

        for _ in 0..200 {
            let food = spawn_position(&mut rng, 4, &snake).unwrap();
            assert!(!snake.occupies(food));
            assert!(food.is_within_bounds(4));
        }
    }

    #[test]
    fn single_free_cell_is_found() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 0 },
            Position { x: 1, y: 0 },
            Position { x: 1, y: 1 },
        ])
        .unwrap();

        assert_eq!(
            spawn_position(&mut rng, 2, &snake),
            Some(Position { x: 0, y: 1 })
        );
    }

    #[test]
    fn full_board_yields_no_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 0 },
            Position { x: 1, y: 0 },
            Position { x: 1, y: 1 },
            Position { x: 0, y: 1 },
        ])
        .unwrap();

        assert_eq!(spawn_position(&mut rng, 2, &snake), None);
    }

    #[test]
    fn sampling_reaches_every_free_cell() {
        let mut rng = StdRng::seed_from_u64(99);
        let snake = Snake::new(Position { x: 1, y: 1 });

        let seen: HashSet<_> = (0..500)
            .filter_map(|_| spawn_position(&mut rng, 3, &snake))
            .collect();

        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&Position { x: 1, y: 1 }));
    }
}
