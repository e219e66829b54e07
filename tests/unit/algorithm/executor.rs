//! Tests for the solver state machine, its configuration and the restart driver

#[cfg(test)]
mod tests {
    use edgetile::algorithm::executor::{
        DEFAULT_BACKTRACK, RandomSelector, RecoveryPolicy, RunLimits, Solver, SolverConfig,
        StepStatus, solve_with_restarts,
    };
    use edgetile::algorithm::propagation::first_incompatible_pair;
    use edgetile::io::configuration::{
        DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_STEPS, DEFAULT_SEED, DEFAULT_STEPS_PER_CELL,
    };
    use edgetile::io::error::AlgorithmError;
    use edgetile::spatial::grid::{Bounds, GridModel};
    use edgetile::spatial::registry::TileRegistry;
    use edgetile::spatial::tiles::Tile;
    use edgetile::spatial::tileset::{Cartesian, EAST, NORTH, SOUTH, WEST};

    fn tile(name: &str, [north, east, south, west]: [&str; 4], weight: f64) -> Tile {
        Tile::new(name)
            .with_side(NORTH, north)
            .with_side(EAST, east)
            .with_side(SOUTH, south)
            .with_side(WEST, west)
            .with_weight(weight)
    }

    // On a 2x2 grid, committing "trap" or "hook" to the first cell always
    // contradicts, while "plain" everywhere is a solution
    fn trap_registry(plain_weight: f64) -> TileRegistry {
        let tiles = vec![
            tile("plain", ["0", "0", "0", "0"], plain_weight),
            tile("trap", ["0", "1", "1", "1"], 1.0),
            tile("hook", ["1", "1", "1", "0"], 1.0),
        ];
        TileRegistry::build(&Cartesian::new(tiles)).expect("valid catalogue")
    }

    fn square(registry: &TileRegistry, size: i32) -> GridModel<'_> {
        let bounds = Bounds::new(0, 0, size - 1, size - 1).expect("valid bounds");
        GridModel::new(bounds, registry).expect("non-empty registry")
    }

    // Tests only InProgress allows further steps
    // Verified by treating Contradiction as non-terminal
    #[test]
    fn test_status_terminality() {
        assert!(!StepStatus::InProgress.is_terminal());
        assert!(StepStatus::Solved.is_terminal());
        assert!(StepStatus::Contradiction.is_terminal());
    }

    // Tests recovery policies resolve case-insensitively and reject unknown names
    // Verified by making name matching case-sensitive
    #[test]
    fn test_recovery_policy_from_name() {
        assert_eq!(
            RecoveryPolicy::from_name("Halt", 5).expect("known policy"),
            RecoveryPolicy::Halt
        );
        assert_eq!(
            RecoveryPolicy::from_name("BACKTRACK", 5).expect("known policy"),
            RecoveryPolicy::Backtrack { max_backtracks: 5 }
        );
        assert!(matches!(
            RecoveryPolicy::from_name("retry", 5),
            Err(AlgorithmError::InvalidParameter {
                parameter: "recovery",
                ..
            })
        ));
    }

    // Tests configuration defaults match the documented constants
    // Verified by changing the default seed
    #[test]
    fn test_config_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.recovery, RecoveryPolicy::Halt);
        assert_eq!(config.bounds.cell_count(), 100);

        let limits = RunLimits::default();
        assert_eq!(limits.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(limits.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert!(matches!(DEFAULT_BACKTRACK, RecoveryPolicy::Backtrack { .. }));
    }

    // Tests derived step budgets cover every cell of large grids
    // Verified by returning the fixed default for every grid
    #[test]
    fn test_limits_for_bounds() {
        let small = Bounds::new(0, 0, 9, 9).expect("valid bounds");
        assert_eq!(RunLimits::for_bounds(small).max_steps, DEFAULT_MAX_STEPS);

        let large = Bounds::new(0, 0, 499, 499).expect("valid bounds");
        let limits = RunLimits::for_bounds(large);
        assert_eq!(limits.max_steps, large.cell_count() * DEFAULT_STEPS_PER_CELL);
        assert_eq!(limits.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    // Tests explicit bounds are validated when building a configuration
    // Verified by skipping bounds validation in with_bounds
    #[test]
    fn test_config_with_bounds() {
        let config = SolverConfig::with_bounds(-2, -1, 2, 1).expect("valid bounds");
        assert_eq!(config.bounds.width(), 5);
        assert_eq!(config.bounds.height(), 3);
        assert!(matches!(
            SolverConfig::with_bounds(3, 0, 2, 0),
            Err(AlgorithmError::DegenerateBounds { axis: "x", .. })
        ));
    }

    // Tests the configured tileset yields a registry and grid
    // Verified by building an empty catalogue
    #[test]
    fn test_config_registry_and_grid() {
        let config = SolverConfig::default();
        let registry = config.registry().expect("built-in catalogue is valid");
        assert_eq!(registry.tileset_name(), "cartesian");
        let grid = config.grid(&registry).expect("grid builds");
        assert_eq!(grid.undecided_count(), 100);
    }

    // Tests weighted choice is deterministic per seed and honours zero weights
    // Verified by ignoring the seed when creating the generator
    #[test]
    fn test_weighted_choice() {
        let weights = [1.0, 2.0, 3.0];
        let mut first = RandomSelector::new(7);
        let mut second = RandomSelector::new(7);
        for _ in 0..20 {
            assert_eq!(
                first.weighted_choice(&weights),
                second.weighted_choice(&weights)
            );
        }

        let mut selector = RandomSelector::new(3);
        for _ in 0..50 {
            assert_eq!(selector.weighted_choice(&[0.0, 5.0, 0.0]), 1);
        }
        assert_eq!(selector.weighted_choice(&[]), 0);
    }

    // Tests a single-cell grid with one tile solves in one step without revisions
    // Verified by counting the committed cell itself as revised
    #[test]
    fn test_single_cell_solves_in_one_step() {
        let tiles = vec![tile("only", ["a", "a", "a", "a"], 1.0)];
        let registry = TileRegistry::build(&Cartesian::new(tiles)).expect("valid catalogue");
        let mut solver = Solver::new(square(&registry, 1), 0, RecoveryPolicy::Halt);

        let outcome = solver.step();
        assert_eq!(outcome.status, StepStatus::Solved);
        assert_eq!(outcome.revised, 0);
        let placement = outcome.placement.expect("a cell was committed");
        assert_eq!(placement.position, [0, 0]);
        assert_eq!(placement.candidates, 1);
        assert_eq!(solver.steps(), 1);
    }

    // Tests terminal states are sticky and do not consume steps
    // Verified by removing the terminal early return
    #[test]
    fn test_terminal_state_is_sticky() {
        let tiles = vec![tile("only", ["a", "a", "a", "a"], 1.0)];
        let registry = TileRegistry::build(&Cartesian::new(tiles)).expect("valid catalogue");
        let mut solver = Solver::new(square(&registry, 1), 0, RecoveryPolicy::Halt);
        assert_eq!(solver.run(10), StepStatus::Solved);

        let outcome = solver.step();
        assert_eq!(outcome.status, StepStatus::Solved);
        assert!(outcome.placement.is_none());
        assert_eq!(solver.steps(), 1);
    }

    // Tests a fully pinned grid is solved on the first step
    // Verified by selecting before checking for completion
    #[test]
    fn test_fully_pinned_grid() {
        let registry = trap_registry(1.0);
        let mut grid = square(&registry, 2);
        for position in grid.positions() {
            grid.pin(position, "plain").expect("plain exists");
        }
        let mut solver = Solver::new(grid, 0, RecoveryPolicy::Halt);
        let outcome = solver.step();
        assert_eq!(outcome.status, StepStatus::Solved);
        assert!(outcome.placement.is_none());
    }

    // Tests adjacent pins with mismatched sides are a contradiction under any policy
    // Verified by skipping the pin compatibility check
    #[test]
    fn test_conflicting_pins() {
        let registry = trap_registry(1.0);
        let mut grid = square(&registry, 2);
        grid.pin([0, 0], "plain").expect("plain exists");
        grid.pin([1, 0], "trap").expect("trap exists");

        let mut solver = Solver::new(grid, 0, DEFAULT_BACKTRACK);
        assert_eq!(solver.step().status, StepStatus::Contradiction);
        assert_eq!(solver.backtracks(), 0);
    }

    // Tests a pin that leaves a neighbour without options is reported immediately
    // Verified by not propagating pins before the first selection
    #[test]
    fn test_pin_propagation_contradiction() {
        let registry = trap_registry(1.0);
        let mut grid = square(&registry, 2);
        grid.pin([0, 0], "trap").expect("trap exists");
        let mut solver = Solver::new(grid, 0, RecoveryPolicy::Halt);
        assert_eq!(solver.step().status, StepStatus::Contradiction);
    }

    // Tests pins survive solving and constrain their neighbours
    // Verified by clearing pinned cells when the solver starts
    #[test]
    fn test_pins_are_respected() {
        let registry = trap_registry(1.0);
        let mut grid = square(&registry, 2);
        grid.pin([1, 1], "plain").expect("plain exists");
        let mut solver = Solver::new(grid, 9, DEFAULT_BACKTRACK);
        assert_eq!(solver.run(100), StepStatus::Solved);
        assert_eq!(solver.grid().tile_name_at([1, 1]), Some("plain"));
        assert_eq!(first_incompatible_pair(solver.grid()), None);
    }

    // Tests halting stops at the first contradiction
    // Verified by backtracking under the halt policy
    #[test]
    fn test_halt_reports_contradiction() {
        let registry = trap_registry(1e-9);
        let mut solver = Solver::new(square(&registry, 2), 1, RecoveryPolicy::Halt);
        assert_eq!(solver.run(100), StepStatus::Contradiction);
        assert_eq!(solver.backtracks(), 0);
        assert!(solver.grid().first_contradiction().is_some());
    }

    // Tests backtracking recovers from a contradicting first choice
    // Verified by returning Contradiction instead of unwinding the choice stack
    #[test]
    fn test_backtracking_recovers() {
        let registry = trap_registry(1e-9);
        let mut solver = Solver::new(square(&registry, 2), 1, DEFAULT_BACKTRACK);
        assert_eq!(solver.run(100), StepStatus::Solved);
        assert!(solver.backtracks() >= 1);
        let grid = solver.grid();
        assert!(grid.is_solved());
        assert_eq!(first_incompatible_pair(grid), None);
        assert_eq!(grid.tile_name_at([0, 0]), Some("plain"));
    }

    // Tests an exhausted backtrack budget ends the run
    // Verified by ignoring the budget in the recovery policy
    #[test]
    fn test_backtrack_budget() {
        let registry = trap_registry(1e-9);
        let policy = RecoveryPolicy::Backtrack { max_backtracks: 0 };
        let mut solver = Solver::new(square(&registry, 2), 1, policy);
        assert_eq!(solver.run(100), StepStatus::Contradiction);
    }

    // Tests a long backtracking run never holds more choice points than its budget
    // Verified by keeping every choice point for the whole run
    #[test]
    fn test_choice_depth_is_bounded() {
        let registry = TileRegistry::build(&Cartesian::pipes()).expect("valid catalogue");
        let policy = RecoveryPolicy::Backtrack { max_backtracks: 8 };
        let mut solver = Solver::new(square(&registry, 20), 3, policy);

        while !solver.step().status.is_terminal() {
            assert!(solver.open_choices() <= 8);
        }
        assert!(solver.backtracks() <= 8);
        assert!(solver.open_choices() <= 8);
    }

    // Tests propagation consults the support cache and reuses its entries
    // Verified by bypassing the cache during propagation
    #[test]
    fn test_cache_stats_accumulate() {
        let registry = TileRegistry::build(&Cartesian::pipes()).expect("valid catalogue");
        let mut solver = Solver::new(square(&registry, 8), 9, RecoveryPolicy::Halt);
        assert_eq!(solver.cache_stats().hits + solver.cache_stats().misses, 0);

        solver.run(DEFAULT_MAX_STEPS);
        let stats = solver.cache_stats();
        assert!(stats.misses > 0);
        assert!(stats.hits > 0);
    }

    // Tests solving from a configuration uses its seed and bounds
    // Verified by ignoring the configured seed
    #[test]
    fn test_from_config() {
        let registry = trap_registry(1.0);
        let mut config = SolverConfig::with_bounds(0, 0, 1, 1).expect("valid bounds");
        config.seed = 77;
        let solver = Solver::from_config(&registry, &config).expect("grid builds");
        assert_eq!(solver.seed(), 77);
        assert_eq!(solver.status(), StepStatus::InProgress);
        assert_eq!(solver.grid().bounds().cell_count(), 4);
    }

    // Tests zero attempts is rejected
    // Verified by removing the attempt count validation
    #[test]
    fn test_restarts_require_attempts() {
        let registry = trap_registry(1.0);
        let template = square(&registry, 2);
        let limits = RunLimits {
            max_steps: 10,
            max_attempts: 0,
        };
        let result = solve_with_restarts(&template, &SolverConfig::default(), limits, |_, _, _| {});
        assert!(matches!(
            result,
            Err(AlgorithmError::InvalidParameter {
                parameter: "max_attempts",
                ..
            })
        ));
    }

    // Tests every attempt is made with the next seed when all of them fail
    // Verified by reusing the base seed for each attempt
    #[test]
    fn test_restarts_advance_seed() {
        let registry = trap_registry(1e-9);
        let template = square(&registry, 2);
        let config = SolverConfig {
            seed: 100,
            ..SolverConfig::default()
        };
        let limits = RunLimits {
            max_steps: 100,
            max_attempts: 3,
        };

        let mut observed = Vec::new();
        let summary = solve_with_restarts(&template, &config, limits, |attempt, outcome, _| {
            if outcome.status.is_terminal() {
                observed.push(attempt);
            }
        })
        .expect("attempts were allowed");

        assert_eq!(summary.status, StepStatus::Contradiction);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.seed, 102);
        assert_eq!(observed, vec![0, 1, 2]);
    }

    // Tests restarts stop at the first solved attempt
    // Verified by continuing after a solved attempt
    #[test]
    fn test_restarts_stop_when_solved() {
        let registry = trap_registry(1.0);
        let template = square(&registry, 2);
        let config = SolverConfig::default();
        let limits = RunLimits {
            max_steps: 100,
            max_attempts: 60,
        };
        let summary = solve_with_restarts(&template, &config, limits, |_, _, _| {})
            .expect("attempts were allowed");

        assert_eq!(summary.status, StepStatus::Solved);
        assert!(summary.grid.is_solved());
        assert_eq!(summary.seed, config.seed + summary.attempts as u64 - 1);
        // The template itself is never modified
        assert_eq!(template.committed_count(), 0);
    }
}
