use rand::seq::index;
use rand::Rng;
use std::collections::BTreeSet;

/// Clamps a requested impostor count into `[1, player_count - 1]`.
pub fn clamp_impostor_count(requested: i64, player_count: usize) -> usize {
    let max = player_count.saturating_sub(1).max(1) as i64;
    requested.clamp(1, max) as usize
}

/// Draws the impostor positions by simple random sampling without replacement.
pub fn assign_impostors<R: Rng + ?Sized>(
    player_count: usize,
    requested: i64,
    rng: &mut R,
) -> BTreeSet<usize> {
    let count = clamp_impostor_count(requested, player_count).min(player_count);
    index::sample(rng, player_count, count).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn clamp_keeps_a_civilian_and_an_impostor() {
        assert_eq!(clamp_impostor_count(5, 4), 3);
        assert_eq!(clamp_impostor_count(0, 4), 1);
        assert_eq!(clamp_impostor_count(-3, 10), 1);
        assert_eq!(clamp_impostor_count(2, 3), 2);
        assert_eq!(clamp_impostor_count(1, 3), 1);

        for players in 3..=20 {
            for requested in -5..30 {
                let effective = clamp_impostor_count(requested, players);
                assert!(effective >= 1 && effective < players);
            }
        }
    }

    #[test]
    fn assigns_exactly_the_clamped_number_of_distinct_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for players in 3..=20 {
            for requested in [-1, 1, 2, 5, 25] {
                let impostors = assign_impostors(players, requested, &mut rng);
                assert_eq!(impostors.len(), clamp_impostor_count(requested, players));
                assert!(impostors.iter().all(|&p| p < players));
            }
        }
    }

    #[test]
    fn every_position_is_equally_likely() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let players = 6;
        let trials = 6_000;
        let mut hits = vec![0usize; players];

        for _ in 0..trials {
            for position in assign_impostors(players, 2, &mut rng) {
                hits[position] += 1;
            }
        }

        // Each position is drawn with probability 2/6.
        let expected = trials * 2 / players;
        for (position, count) in hits.iter().enumerate() {
            let deviation = (*count as i64 - expected as i64).abs();
            assert!(deviation < 200, "position {position} drawn {count} times");
        }
    }
}
