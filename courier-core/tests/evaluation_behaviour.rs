//! Behaviour tests for evaluating package sets against loaded maps.
#![expect(
    clippy::expect_used,
    reason = "behaviour steps fail fast when the scenario state is missing"
)]

use std::cell::RefCell;

use courier_core::test_support::{MapText, packages_text};
use courier_core::{EvaluationResult, Package, RoutingMode, Session, SessionError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Scenario state: the map and packages to load, plus the evaluation outcome.
#[derive(Debug, Default)]
struct EvaluationWorld {
    map: RefCell<MapText>,
    packages: RefCell<Vec<Package>>,
    routing: RefCell<RoutingMode>,
    outcome: RefCell<Option<Result<EvaluationResult, SessionError>>>,
}

impl EvaluationWorld {
    fn with_result<F>(&self, check: F)
    where
        F: FnOnce(&EvaluationResult),
    {
        let outcome = self.outcome.borrow();
        let result = outcome
            .as_ref()
            .expect("evaluation should have run")
            .as_ref()
            .expect("evaluation should succeed");
        check(result);
    }
}

#[fixture]
fn world() -> EvaluationWorld {
    EvaluationWorld::default()
}

#[given("the two-node map A-B with edge weight 10")]
fn two_node_map(world: &EvaluationWorld) {
    world.map.replace(MapText::new(["A", "B"]).edge(1, 2, 10.0));
}

#[given("a three-node map where only A and B are joined")]
fn three_node_map(world: &EvaluationWorld) {
    world
        .map
        .replace(MapText::new(["A", "B", "C"]).edge(1, 2, 10.0));
}

#[given("an extra edge from B to C of weight 5")]
fn extra_edge(world: &EvaluationWorld) {
    let map = world.map.take();
    world.map.replace(map.edge(2, 3, 5.0));
}

#[given("a package {id} weighing {weight} bound for {destination} with deadline {deadline}")]
fn add_package(
    world: &EvaluationWorld,
    id: String,
    weight: f64,
    destination: String,
    deadline: i64,
) {
    world
        .packages
        .borrow_mut()
        .push(Package::new(id, weight, destination, 0, deadline));
}

#[given("shortest-path routing is selected")]
fn shortest_path_routing(world: &EvaluationWorld) {
    world.routing.replace(RoutingMode::ShortestPath);
}

#[when("the packages are evaluated")]
fn evaluate(world: &EvaluationWorld) {
    let mut session = Session::default().with_routing(*world.routing.borrow());
    let map = world.map.borrow().render();
    let packages = packages_text(&world.packages.borrow());
    let outcome = session
        .load_map_from(map.as_bytes())
        .and_then(|_| session.load_packages_from(packages.as_bytes()))
        .and_then(|_| session.evaluate().cloned());
    world.outcome.replace(Some(outcome));
}

#[then("the total cost is {cost}")]
fn total_cost(world: &EvaluationWorld, cost: f64) {
    world.with_result(|result| assert_eq!(result.total_cost, cost));
}

#[then("{late} packages are late")]
fn late_packages(world: &EvaluationWorld, late: usize) {
    world.with_result(|result| assert_eq!(result.late_packages, late));
}

#[then("{count} packages have no route")]
fn unreachable_packages(world: &EvaluationWorld, count: usize) {
    world.with_result(|result| assert_eq!(result.unreachable_packages, count));
}

#[scenario(path = "tests/features/evaluation.feature", index = 0)]
fn late_package(world: EvaluationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/evaluation.feature", index = 1)]
fn package_on_time(world: EvaluationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/evaluation.feature", index = 2)]
fn destination_without_edge(world: EvaluationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/evaluation.feature", index = 3)]
fn shortest_path_two_hops(world: EvaluationWorld) {
    let _ = world;
}
