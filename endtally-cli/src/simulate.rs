use anyhow::Result;
use endtally_game::{Game, MAX_END_MARGIN, Side};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fill `game` with `ends` seeded random ends. The same seed always yields the
/// same sequence, so a simulated card can be reproduced exactly.
///
/// # Errors
///
/// Propagates ledger errors and margins that do not fit the ledger's range.
pub fn fill_random_ends(game: &mut Game, seed: u64, ends: usize) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..ends {
        let margin = rng.gen_range(0..=MAX_END_MARGIN);
        let side = match (margin, rng.gen_bool(0.5)) {
            (0, _) => Side::Tie,
            (_, true) => Side::A,
            (_, false) => Side::B,
        };
        game.record_end(i32::try_from(margin)?, side)?;
    }
    log::debug!("simulated {ends} ends from seed {seed}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_card() {
        let mut first = Game::new("a", 0);
        let mut second = Game::new("b", 0);
        fill_random_ends(&mut first, 1337, 8).unwrap();
        fill_random_ends(&mut second, 1337, 8).unwrap();
        assert_eq!(first.snapshot(), second.snapshot());
        assert_eq!(first.ends(), 8);
        assert!(
            first
                .snapshot()
                .iter()
                .all(|v| v.unsigned_abs() <= MAX_END_MARGIN)
        );
    }

    #[test]
    fn simulated_ends_keep_their_margins() {
        let mut game = Game::new("d", 0);
        fill_random_ends(&mut game, 42, 32).unwrap();
        let snapshot = game.snapshot();
        assert!(snapshot.iter().any(|v| *v > 0));
        assert!(snapshot.iter().any(|v| *v < 0));
    }

    #[test]
    fn zero_ends_leaves_game_empty() {
        let mut game = Game::new("c", 0);
        fill_random_ends(&mut game, 7, 0).unwrap();
        assert_eq!(game.ends(), 0);
    }
}
