use descent::{
    DescentErr,
    config::Hyperparameters,
    dataset::Sample,
    objective::{LinearObjective, Objective},
    optimization::{Convergence, GradientDescent, State, Status},
    preprocessing::MinMaxRange,
};

fn unit_range() -> MinMaxRange {
    MinMaxRange::new(0., 1.).unwrap()
}

/// `target = 2 * feature`, with a bias feature.
fn doubling() -> Vec<Sample> {
    [0., 0.25, 0.5, 0.75, 1.]
        .into_iter()
        .map(|x| Sample::new(vec![1., x], vec![2. * x]))
        .collect()
}

fn plain_descent() -> Hyperparameters {
    Hyperparameters {
        learning_rate: 0.1,
        epsilon: 1e-4,
        adaptive_rate: 0.,
        momentum: 0.,
        acceptable_error: 1e-12,
        theta_convergence: 0.,
        ..Default::default()
    }
}

#[test]
fn perfectly_linear_data_recovers_slope() {
    let hyper = plain_descent();
    let mut gd = GradientDescent::builder(LinearObjective::new(), doubling(), unit_range())
        .hyperparameters(hyper.clone())
        .build()
        .unwrap();

    let fit = gd.run().unwrap();

    assert_eq!(fit.status, Status::Converged(Convergence::AcceptableError));
    assert!(fit.error < hyper.acceptable_error);
    assert!((fit.theta[1] - 2.).abs() < hyper.epsilon);
    assert!(fit.theta[0].abs() < hyper.epsilon);
    assert_eq!(gd.state(), State::Converged);

    let error = gd.objective().error(&fit.theta, gd.samples()).unwrap();
    assert!(error < 1e-10);
}

#[test]
fn adaptive_rate_and_momentum_converge() {
    let hyper = Hyperparameters {
        learning_rate: 0.05,
        adaptive_rate: 0.05,
        momentum: 0.3,
        acceptable_error: 1e-10,
        max_learning_rate: 0.2,
        ..plain_descent()
    };

    let mut gd = GradientDescent::builder(LinearObjective::new(), doubling(), unit_range())
        .hyperparameters(hyper)
        .build()
        .unwrap();

    let fit = gd.run().unwrap();
    assert!((fit.theta[1] - 2.).abs() < 1e-3);
}

#[test]
fn runs_are_deterministic() {
    let hyper = Hyperparameters {
        acceptable_error: 0.,
        theta_convergence: 0.,
        max_iterations: 50,
        ..Default::default()
    };

    let run = || {
        let mut gd = GradientDescent::builder(LinearObjective::new(), doubling(), unit_range())
            .hyperparameters(hyper.clone())
            .build()
            .unwrap();

        let Err(DescentErr::DidNotConverge { theta, .. }) = gd.run() else {
            panic!("expected the run to hit the iteration cap");
        };

        (theta, gd.theta().to_vec(), gd.loss_history().to_vec())
    };

    assert_eq!(run(), run());
}

#[test]
fn single_pass_follows_candidate_and_seeds_momentum() {
    let hyper = Hyperparameters {
        learning_rate: 0.1,
        adaptive_rate: 0.5,
        momentum: 0.5,
        max_iterations: 1,
        ..Default::default()
    };

    let samples = vec![
        Sample::new(vec![1., 1.], vec![0.]),
        Sample::new(vec![1., 2.], vec![1.]),
    ];

    let mut gd = GradientDescent::builder(LinearObjective::new(), samples, unit_range())
        .hyperparameters(hyper)
        .build()
        .unwrap();

    let Err(DescentErr::DidNotConverge { iterations, .. }) = gd.run() else {
        panic!("expected the run to stop after one iteration");
    };
    assert_eq!(iterations, 1);

    // Rate 0.15. First sample at [1, 1]: step 0.3, seeded velocity 0.45, candidate 0.55.
    // Second sample at [0.55, 0.55]: steps [0.0975, 0.195], velocities [0.3225, 0.42].
    let expected = [0.2275, 0.13];
    assert!(
        gd.theta()
            .iter()
            .zip(expected)
            .all(|(t, e)| (t - e).abs() < 1e-12),
        "theta was {:?}",
        gd.theta()
    );
}

#[test]
fn huge_acceptable_error_exits_after_one_iteration() {
    let hyper = Hyperparameters {
        acceptable_error: 1e10,
        ..Default::default()
    };

    let samples = vec![
        Sample::new(vec![1., 7.], vec![-40.]),
        Sample::new(vec![1., -3.], vec![12.]),
    ];

    let mut gd = GradientDescent::builder(LinearObjective::new(), samples, unit_range())
        .hyperparameters(hyper)
        .build()
        .unwrap();

    let fit = gd.run().unwrap();

    assert_eq!(fit.iterations, 1);
    assert_eq!(fit.status, Status::Converged(Convergence::AcceptableError));
    assert_eq!(gd.loss_history().len(), 1);
}

#[test]
fn all_zero_dataset_converges_immediately() {
    let samples = vec![Sample::new(vec![0., 0.], vec![0.]); 3];
    let obj = LinearObjective::new();
    assert_eq!(obj.error(&[1., 1.], &samples).unwrap(), 0.);

    let mut gd = GradientDescent::builder(obj, samples, unit_range())
        .build()
        .unwrap();
    let fit = gd.run().unwrap();

    assert_eq!(fit.iterations, 1);
    assert_eq!(fit.error, 0.);
    assert_eq!(fit.theta, [1., 1.]);
}

#[test]
fn padded_initial_theta_uses_default_fill() {
    let gd = GradientDescent::builder(LinearObjective::new(), doubling(), unit_range())
        .initial_theta(vec![])
        .build()
        .unwrap();

    assert_eq!(gd.theta(), [1., 1.]);
}

#[test]
fn features_shorter_than_theta() {
    let obj = LinearObjective::new();
    let sample = Sample::new(vec![1.], vec![1.]);
    let mut grad = [0.; 2];

    assert!(matches!(
        obj.gradient(&sample, &[1., 1.], &mut grad),
        Err(DescentErr::DimensionMismatch { .. })
    ));
}
