use rand::Rng;

/// Randomized stop/go order for a task block (`true` = stop trial).
///
/// `floor(total * stop_ratio)` stops, the rest go. Built incrementally: a
/// stop may be placed only while stops remain and the previous two placed
/// trials were not both stops. When both placements are legal the choice is
/// weighted by the remaining counts, keeping the realized ratio near target
/// without being predictable. Total counts always win over spacing.
pub fn generate_stop_sequence<R: Rng>(rng: &mut R, total: usize, stop_ratio: f64) -> Vec<bool> {
    let num_stop = (total as f64 * stop_ratio).floor() as usize;
    let mut stop_left = num_stop;
    let mut go_left = total - num_stop;

    let mut trials = Vec::with_capacity(total);

    while stop_left + go_left > 0 {
        let tail_two_stops =
            trials.len() >= 2 && trials[trials.len() - 1] && trials[trials.len() - 2];
        let can_add_stop = stop_left > 0 && !tail_two_stops;
        let can_add_go = go_left > 0;

        let choice = if can_add_stop && can_add_go {
            rng.random::<f64>() < stop_left as f64 / (stop_left + go_left) as f64
        } else if can_add_stop {
            true
        } else if can_add_go {
            false
        } else {
            // Only stops remain behind a stop-stop tail; counts take
            // precedence over spacing.
            true
        };

        trials.push(choice);
        if choice {
            stop_left -= 1;
        } else {
            go_left -= 1;
        }
    }

    trials
}

/// Practice order: exactly `stops` stop trials at distinct uniform-random
/// positions, no spacing constraint.
pub fn practice_sequence<R: Rng>(rng: &mut R, total: usize, stops: usize) -> Vec<bool> {
    debug_assert!(stops <= total);
    let mut trials = vec![false; total];
    let mut placed = 0;
    while placed < stops {
        let index = rng.random_range(0..total);
        if !trials[index] {
            trials[index] = true;
            placed += 1;
        }
    }
    trials
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn max_stop_run(trials: &[bool]) -> usize {
        let mut run = 0;
        let mut best = 0;
        for &stop in trials {
            run = if stop { run + 1 } else { 0 };
            best = best.max(run);
        }
        best
    }

    #[test]
    fn counts_match_floor_of_ratio() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trials = generate_stop_sequence(&mut rng, 200, 0.25);
            assert_eq!(trials.len(), 200);
            assert_eq!(trials.iter().filter(|&&s| s).count(), 50);
            assert_eq!(trials.iter().filter(|&&s| !s).count(), 150);
        }
    }

    #[test]
    fn never_three_consecutive_stops_at_task_ratio() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trials = generate_stop_sequence(&mut rng, 200, 0.25);
            assert!(max_stop_run(&trials) <= 2, "seed {seed} produced a 3-run");
        }
    }

    #[test]
    fn floor_applies_to_fractional_stop_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = generate_stop_sequence(&mut rng, 10, 0.26);
        assert_eq!(trials.iter().filter(|&&s| s).count(), 2);
    }

    #[test]
    fn extreme_ratio_still_preserves_counts() {
        let mut rng = StdRng::seed_from_u64(3);
        let trials = generate_stop_sequence(&mut rng, 10, 0.9);
        assert_eq!(trials.len(), 10);
        assert_eq!(trials.iter().filter(|&&s| s).count(), 9);
    }

    #[test]
    fn practice_places_exactly_the_requested_stops() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trials = practice_sequence(&mut rng, 10, 4);
            assert_eq!(trials.len(), 10);
            assert_eq!(trials.iter().filter(|&&s| s).count(), 4);
        }
    }
}
