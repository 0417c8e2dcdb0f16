//! Population sizing and history alignment tests.

use churnsim_core::{HistoryCell, SimConfig, Simulation};

fn run(initial: usize, per_period: usize, periods: u64, seed: u64) -> Simulation {
    let mut config = SimConfig::default_test();
    config.initial_population = initial;
    config.new_per_period = per_period;
    config.total_periods = periods;
    let mut sim = Simulation::seeded(config, seed).unwrap();
    sim.run_simulation().unwrap();
    sim
}

#[test]
fn table_shape_matches_population_formula() {
    for (initial, per_period, periods) in [(50, 5, 12), (0, 3, 4), (7, 0, 9), (1, 1, 0)] {
        let sim = run(initial, per_period, periods, 42);
        let table = sim.history_table().unwrap();
        assert_eq!(
            table.row_count(),
            initial + per_period * periods as usize,
            "rows for ({initial}, {per_period}, {periods})"
        );
        assert_eq!(table.column_count(), periods as usize + 1);
        for row in table.rows() {
            assert_eq!(row.cells.len(), periods as usize + 1);
        }
    }
}

#[test]
fn every_history_spans_the_whole_run() {
    let sim = run(20, 4, 10, 7);
    for c in sim.customers() {
        assert_eq!(c.history().len(), 11, "customer {}", c.customer_id());
        assert_eq!(c.observed_history().len() as u64, 10 - c.birth_period() + 1);
    }
}

#[test]
fn rows_are_absent_before_birth_and_verbatim_after() {
    let sim = run(10, 3, 8, 99);
    let table = sim.history_table().unwrap();
    for (row, customer) in table.rows().iter().zip(sim.customers()) {
        let birth = customer.birth_period() as usize;
        assert_eq!(row.customer_id, customer.customer_id());
        assert_eq!(row.birth_period, customer.birth_period());
        assert!(row.cells[..birth].iter().all(|c| c.is_absent()));
        assert_eq!(&row.cells[birth..], customer.observed_history());
        assert!(row.cells[birth..].iter().all(|c| !c.is_absent()));
    }
}

#[test]
fn cohorts_are_born_in_order() {
    let sim = run(3, 2, 4, 5);
    let births: Vec<u64> = sim.customers().iter().map(|c| c.birth_period()).collect();
    assert_eq!(births, vec![0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4]);
}

#[test]
fn one_initial_one_new_one_period_gives_two_by_two() {
    let sim = run(1, 1, 1, 3);
    let table = sim.history_table().unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_count(), 2);

    let first = &table.rows()[0].cells;
    assert!(first.iter().all(|c| !c.is_absent()));

    let second = &table.rows()[1].cells;
    assert_eq!(second[0], HistoryCell::Absent);
    assert!(!second[1].is_absent());
}

#[test]
fn absorbing_state_is_never_left() {
    let sim = run(200, 10, 24, 2024);
    let churned = sim.model().state_id("churned").unwrap();
    assert!(sim.model().is_absorbing(churned));

    let table = sim.history_table().unwrap();
    let mut saw_churn = false;
    for row in table.rows() {
        if let Some(first) = row.cells.iter().position(|c| c.state() == Some(churned)) {
            saw_churn = true;
            assert!(
                row.cells[first..].iter().all(|c| c.state() == Some(churned)),
                "{} left the churned state",
                row.customer_id
            );
        }
    }
    assert!(saw_churn, "expected some churn over 24 periods");
}

#[test]
fn initial_states_come_from_the_initial_set() {
    let mut config = SimConfig::default_test();
    config.possible_initial_states = vec!["premium".into()];
    config.initial_population = 30;
    config.new_per_period = 2;
    config.total_periods = 5;
    let mut sim = Simulation::seeded(config, 8).unwrap();
    sim.run_simulation().unwrap();

    let premium = sim.model().state_id("premium").unwrap();
    for c in sim.customers() {
        assert_eq!(c.observed_history()[0], HistoryCell::State(premium));
    }
}

#[test]
fn columns_and_cells_agree_with_rows() {
    let sim = run(6, 2, 5, 11);
    let table = sim.history_table().unwrap();
    for t in 0..table.column_count() {
        let column = table.column(t).unwrap();
        assert_eq!(column.len(), table.row_count());
        for (i, cell) in column.iter().enumerate() {
            assert_eq!(table.cell(i, t), Some(*cell));
            assert_eq!(table.row(i).unwrap().cells[t], *cell);
        }
    }
    assert_eq!(table.column(table.column_count()), None);
    assert_eq!(table.cell(0, table.column_count()), None);
    assert_eq!(table.cell(table.row_count(), 0), None);
    assert_eq!(table.cell(0, table.column_count()), None);
}
