#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use anyhow::{Result, bail};
    use float_cmp::approx_eq;
    use rand::prelude::SmallRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    use padpack::entities::{DistanceMode, OptimizerKind};
    use padpack::geometry::geo_traits::CollidesWith;
    use padpack::geometry::outline::{Outline, construct_outlines, outline_edges};
    use padpack::geometry::primitives::{Edge, Point, Rect};
    use padpack::solvers::irls::{
        IrlsSolver, MultiOffsetIrlsSolver, OffsetTargets, TwoPhaseIrlsSolver, unconstrained,
    };
    use padpack::solvers::largest_rect::{LargestRectSolver, largest_rect_outside_outline};
    use padpack::solvers::segment_candidate::SegmentCandidateSolver;
    use padpack::solvers::{Solver, SolverState};
    use padpack::util::IrlsConfig;

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    fn assert_close(p: Point, expected: Point, tolerance: f64) {
        assert!(
            p.distance(&expected) < tolerance,
            "{p:?} is not within {tolerance} of {expected:?}"
        );
    }

    /// Solves itself after `target` steps
    struct CountingSolver {
        state: SolverState,
        target: usize,
        count: usize,
        setups: usize,
        best_effort: bool,
        fail_setup: bool,
        fail_at: Option<usize>,
    }

    impl CountingSolver {
        fn new(target: usize, max_iterations: usize) -> Self {
            CountingSolver {
                state: SolverState::new(max_iterations),
                target,
                count: 0,
                setups: 0,
                best_effort: false,
                fail_setup: false,
                fail_at: None,
            }
        }
    }

    impl Solver for CountingSolver {
        fn name(&self) -> &'static str {
            "CountingSolver"
        }

        fn state(&self) -> &SolverState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut SolverState {
            &mut self.state
        }

        fn setup_impl(&mut self) -> Result<()> {
            self.setups += 1;
            if self.fail_setup {
                bail!("broken setup");
            }
            Ok(())
        }

        fn step_impl(&mut self) -> Result<()> {
            self.count += 1;
            if Some(self.count) == self.fail_at {
                bail!("boom at step {}", self.count);
            }
            if self.count == self.target {
                self.state.mark_solved();
            }
            Ok(())
        }

        fn accept_best_effort(&mut self) -> bool {
            self.best_effort
        }
    }

    #[test]
    fn solver_runs_setup_once_and_stops_when_solved() -> Result<()> {
        let mut solver = CountingSolver::new(5, 100);
        solver.solve()?;
        assert!(solver.solved());
        assert!(!solver.failed());
        assert_eq!(solver.setups, 1);
        assert_eq!(solver.count, 5);
        assert_eq!(solver.iterations(), 5);

        //stepping a terminal solver is a no-op
        solver.step()?;
        assert_eq!(solver.count, 5);
        assert_eq!(solver.iterations(), 5);
        assert_eq!(solver.error(), None);
        Ok(())
    }

    #[test]
    fn iteration_ceiling_fails_solver() -> Result<()> {
        let mut solver = CountingSolver::new(10, 3);
        solver.solve()?;
        assert!(solver.failed());
        assert_eq!(solver.error(), Some("ran out of iterations"));
        assert_eq!(solver.count, 3);
        Ok(())
    }

    #[test]
    fn iteration_ceiling_with_best_effort_solves() -> Result<()> {
        let mut solver = CountingSolver::new(10, 3);
        solver.best_effort = true;
        solver.solve()?;
        assert!(solver.solved());
        assert_eq!(solver.count, 3);
        Ok(())
    }

    #[test]
    fn step_error_is_recorded_and_returned() {
        let mut solver = CountingSolver::new(10, 100);
        solver.fail_at = Some(2);
        let err = solver.solve().unwrap_err();
        assert!(err.to_string().contains("boom at step 2"));
        assert!(solver.failed());
        assert!(solver.error().is_some_and(|e| e.contains("boom")));

        //the solver stays failed
        assert!(solver.step().is_ok());
        assert_eq!(solver.count, 2);
        assert!(solver.failed());
    }

    #[test]
    fn setup_error_fails_solver() {
        let mut solver = CountingSolver::new(10, 100);
        solver.fail_setup = true;
        assert!(solver.step().is_err());
        assert!(solver.failed());
        assert_eq!(solver.count, 0);
        assert_eq!(solver.error(), Some("broken setup"));
    }

    #[test]
    fn irls_single_target_converges() -> Result<()> {
        init_logger();
        let groups = vec![OffsetTargets::new(Point::ORIGIN, vec![Point(100.0, 100.0)])];
        let mut solver = MultiOffsetIrlsSolver::new(
            Point::ORIGIN,
            groups,
            DistanceMode::Linear,
            IrlsConfig::default(),
            unconstrained(),
        );
        solver.solve()?;
        assert!(solver.solved());
        assert_close(solver.position(), Point(100.0, 100.0), 1e-3);

        let (position, iterations) = (solver.position(), solver.iterations());
        solver.step()?;
        assert_eq!(solver.position(), position);
        assert_eq!(solver.iterations(), iterations);
        Ok(())
    }

    #[test]
    fn irls_geometric_median_of_triangle() -> Result<()> {
        let h = 5.0 * 3.0_f64.sqrt();
        let targets = vec![Point(0.0, 0.0), Point(10.0, 0.0), Point(5.0, h)];
        let config = IrlsConfig {
            max_iterations: 1000,
            ..IrlsConfig::default()
        };
        let mut solver = IrlsSolver::new(
            Point(5.0, 5.0),
            targets,
            DistanceMode::Linear,
            config,
            unconstrained(),
        );
        solver.solve()?;
        assert!(solver.solved());
        assert_close(solver.position(), Point(5.0, h / 3.0), 1e-3);
        assert!(approx_eq!(f64, solver.cost(), 3.0 * 10.0 / 3.0_f64.sqrt(), epsilon = 1e-3));
        Ok(())
    }

    #[test_case(DistanceMode::Linear; "linear")]
    #[test_case(DistanceMode::Squared; "squared")]
    fn irls_balances_offset_groups(mode: DistanceMode) -> Result<()> {
        let groups = vec![
            OffsetTargets::new(Point(-1.0, 0.0), vec![Point(-1.0, 5.0)]),
            OffsetTargets::new(Point(1.0, 0.0), vec![Point(1.0, 5.0)]),
        ];
        let mut solver =
            MultiOffsetIrlsSolver::new(Point::ORIGIN, groups, mode, IrlsConfig::default(), unconstrained());
        solver.solve()?;
        assert!(solver.solved());
        assert_close(solver.position(), Point(0.0, 5.0), 1e-6);
        assert!(solver.cost() < 1e-6);
        Ok(())
    }

    #[test]
    fn irls_respects_constraint() -> Result<()> {
        let mut solver = IrlsSolver::new(
            Point(-4.0, 0.0),
            vec![Point(3.0, 5.0)],
            DistanceMode::Linear,
            IrlsConfig::default(),
            Rc::new(|p: Point| Point(p.0, 0.0)),
        );
        solver.solve()?;
        assert!(solver.solved());
        assert_close(solver.position(), Point(3.0, 0.0), 1e-6);
        Ok(())
    }

    #[test]
    fn irls_without_targets_stays_put() -> Result<()> {
        let groups = vec![OffsetTargets::new(Point(1.0, 1.0), vec![])];
        let mut solver = MultiOffsetIrlsSolver::new(
            Point(7.0, -3.0),
            groups,
            DistanceMode::Squared,
            IrlsConfig::default(),
            unconstrained(),
        );
        solver.step()?;
        assert!(solver.solved());
        assert_eq!(solver.iterations(), 0);
        assert_eq!(solver.position(), Point(7.0, -3.0));
        assert_eq!(solver.closest_connection(), None);
        Ok(())
    }

    #[test]
    fn irls_fails_when_out_of_iterations() -> Result<()> {
        let h = 5.0 * 3.0_f64.sqrt();
        let config = IrlsConfig {
            max_iterations: 2,
            ..IrlsConfig::default()
        };
        let mut solver = IrlsSolver::new(
            Point(50.0, 50.0),
            vec![Point(0.0, 0.0), Point(10.0, 0.0), Point(5.0, h)],
            DistanceMode::Linear,
            config,
            unconstrained(),
        );
        solver.solve()?;
        assert!(solver.failed());
        assert_eq!(solver.error(), Some("ran out of iterations"));
        Ok(())
    }

    #[test]
    fn two_phase_pulls_closest_connection_tight() -> Result<()> {
        let groups = vec![OffsetTargets::new(
            Point::ORIGIN,
            vec![Point(0.0, 0.0), Point(10.0, 0.0), Point(0.0, 2.0)],
        )];
        let mut solver =
            TwoPhaseIrlsSolver::new(Point(5.0, 5.0), groups, IrlsConfig::default(), unconstrained());
        solver.solve()?;
        assert!(solver.solved());
        assert!(solver.in_closest_phase());
        //the sum phase ends at the centroid, where (0, 0) is the closest target
        assert_close(solver.position(), Point(0.0, 0.0), 1e-6);
        assert_eq!(
            solver.sub_solver_chain(),
            vec!["TwoPhaseIrlsSolver", "MultiOffsetIrlsSolver"]
        );
        Ok(())
    }

    #[test]
    fn largest_rect_left_of_square() {
        let square = construct_outlines(&[Rect::try_new(100.0, 100.0, 200.0, 200.0).unwrap()]);
        let edges = outline_edges(&square).copied().collect::<Vec<_>>();
        let bounds = Rect::try_new(0.0, 0.0, 300.0, 300.0).unwrap();

        let r = largest_rect_outside_outline(&edges, Point(50.0, 150.0), bounds).unwrap();
        assert!(r.collides_with(&Point(50.0, 150.0)));
        assert!(bounds.contains_rect(&r, 1e-9));
        assert_eq!(r, Rect::try_new(0.0, 0.0, 100.0, 300.0).unwrap());

        assert_eq!(largest_rect_outside_outline(&edges, Point(150.0, 150.0), bounds), None);
        assert_eq!(largest_rect_outside_outline(&edges, Point(350.0, 150.0), bounds), None);
        assert_eq!(largest_rect_outside_outline(&edges, Point(50.0, -1.0), bounds), None);
    }

    #[test]
    fn largest_rect_fills_corner_of_l_shape() -> Result<()> {
        let l_shape = construct_outlines(&[
            Rect::try_new(0.0, 0.0, 10.0, 2.0)?,
            Rect::try_new(0.0, 0.0, 2.0, 10.0)?,
        ]);
        let edges = outline_edges(&l_shape).copied().collect::<Vec<_>>();
        let bounds = Rect::try_new(0.0, 0.0, 10.0, 10.0)?;

        let mut solver = LargestRectSolver::new(edges, Point(5.0, 5.0), bounds);
        solver.solve()?;
        assert!(solver.solved());
        assert_eq!(solver.iterations(), 1);
        assert_eq!(solver.result(), Some(Rect::try_new(2.0, 2.0, 10.0, 10.0)?));
        Ok(())
    }

    #[test]
    fn largest_rect_never_overlaps_occupied_space() {
        let mut rng = SmallRng::seed_from_u64(0);
        let bounds = Rect::try_new(-10.0, -10.0, 60.0, 60.0).unwrap();
        for _ in 0..50 {
            let rects = (0..6)
                .map(|_| {
                    let (x, y) = (rng.random_range(0.0..45.0), rng.random_range(0.0..45.0));
                    let (w, h) = (rng.random_range(1.0..10.0), rng.random_range(1.0..10.0));
                    Rect::try_new(x, y, x + w, y + h).unwrap()
                })
                .collect::<Vec<_>>();
            let outlines = construct_outlines(&rects);
            let edges = outline_edges(&outlines).copied().collect::<Vec<_>>();

            let origin = loop {
                let p = Point(rng.random_range(-10.0..60.0), rng.random_range(-10.0..60.0));
                if rects.iter().all(|r| !r.collides_with(&p)) {
                    break p;
                }
            };
            let r = largest_rect_outside_outline(&edges, origin, bounds)
                .expect("a free origin always has a free rectangle");
            assert!(r.collides_with(&origin));
            assert!(bounds.contains_rect(&r, 1e-9));
            assert!(r.area() > 0.0);
            for occupied in &rects {
                assert!(r.gap_to(occupied) >= -1e-9, "{r:?} overlaps {occupied:?}");
            }
        }
    }

    fn block() -> Rc<Vec<Outline>> {
        Rc::new(construct_outlines(&[Rect::try_new(0.0, 0.0, 10.0, 10.0).unwrap()]))
    }

    fn bottom_edge(outlines: &[Outline]) -> Edge {
        *outline_edges(outlines)
            .find(|e| e.is_horizontal() && e.start.1 == 0.0)
            .unwrap()
    }

    #[test_case(Point(5.0, -20.0), Point(5.0, -1.0); "straight below")]
    #[test_case(Point(30.0, -5.0), Point(10.0, -1.0); "clamped to segment end")]
    fn segment_candidate_snaps_flush_against_segment(target: Point, expected: Point) -> Result<()> {
        init_logger();
        let outlines = block();
        let segment = bottom_edge(&outlines);
        let footprint = Rect::from_center(Point::ORIGIN, 2.0, 2.0);
        let groups = vec![OffsetTargets::new(Point::ORIGIN, vec![target])];
        let mut solver = SegmentCandidateSolver::new(
            segment,
            outlines,
            footprint,
            groups,
            OptimizerKind::MultiOffset(DistanceMode::Linear),
            IrlsConfig::default(),
            0.0,
            None,
        );
        solver.solve()?;
        assert!(solver.solved());
        assert!(solver.converged());
        assert_close(solver.optimal_position().unwrap(), expected, 1e-6);
        assert_eq!(
            solver.viable_bounds(),
            Some(Rect::try_new(-3.0, -3.0, 13.0, -1.0)?)
        );
        let cost = solver.cost(DistanceMode::Linear).unwrap();
        assert!(approx_eq!(f64, cost, expected.distance(&target), epsilon = 1e-6));
        Ok(())
    }

    #[test]
    fn segment_candidate_with_two_phase_optimizer() -> Result<()> {
        let outlines = block();
        let segment = bottom_edge(&outlines);
        let groups = vec![
            OffsetTargets::new(Point(-0.5, 0.0), vec![Point(2.0, -4.0)]),
            OffsetTargets::new(Point(0.5, 0.0), vec![Point(8.0, -4.0)]),
        ];
        let mut solver = SegmentCandidateSolver::new(
            segment,
            outlines,
            Rect::from_center(Point::ORIGIN, 2.0, 1.0),
            groups,
            OptimizerKind::TwoPhase,
            IrlsConfig::default(),
            0.25,
            None,
        );
        solver.solve()?;
        assert!(solver.solved());
        let p = solver.optimal_position().unwrap();
        //flush against the bottom of the block
        assert!(approx_eq!(f64, p.1, -0.5, epsilon = 1e-9));
        assert!((0.0..=10.0).contains(&p.0));
        assert_eq!(
            solver.sub_solver_chain()[..2],
            ["SegmentCandidateSolver", "TwoPhaseIrlsSolver"]
        );
        Ok(())
    }

    #[test]
    fn segment_candidate_without_room_fails() -> Result<()> {
        let outlines = block();
        let segment = bottom_edge(&outlines);
        let hard_bounds = Rect::try_new(-1.0, -1.5, 11.0, 11.0)?;
        let mut solver = SegmentCandidateSolver::new(
            segment,
            outlines,
            Rect::from_center(Point::ORIGIN, 2.0, 2.0),
            vec![OffsetTargets::new(Point::ORIGIN, vec![Point(5.0, -20.0)])],
            OptimizerKind::MultiOffset(DistanceMode::Squared),
            IrlsConfig::default(),
            0.0,
            Some(hard_bounds),
        );
        solver.solve()?;
        assert!(solver.failed());
        assert!(solver.error().is_some_and(|e| e.starts_with("nowhere to fit")));
        assert_eq!(solver.optimal_position(), None);
        Ok(())
    }

    #[test]
    fn segment_candidate_inside_occupied_space_errors() {
        let outlines = block();
        let interior = Edge::new(Point(2.0, 5.0), Point(8.0, 5.0));
        let mut solver = SegmentCandidateSolver::new(
            interior,
            outlines,
            Rect::from_center(Point::ORIGIN, 1.0, 1.0),
            vec![],
            OptimizerKind::MultiOffset(DistanceMode::Linear),
            IrlsConfig::default(),
            0.0,
            None,
        );
        assert!(solver.solve().is_err());
        assert!(solver.failed());
        assert!(solver.error().is_some_and(|e| e.contains("no outward normal")));
    }

    #[test]
    fn degenerate_segment_fails() -> Result<()> {
        let outlines = block();
        let mut solver = SegmentCandidateSolver::new(
            Edge::new(Point(3.0, 0.0), Point(3.0, 0.0)),
            outlines,
            Rect::from_center(Point::ORIGIN, 1.0, 1.0),
            vec![],
            OptimizerKind::MultiOffset(DistanceMode::Linear),
            IrlsConfig::default(),
            0.0,
            None,
        );
        solver.solve()?;
        assert!(solver.failed());
        assert_eq!(solver.error(), Some("zero-length outline segment"));
        Ok(())
    }
}
