//! Operator-level estimation tests
//!
//! Builds operator chains directly on in-memory statistics and checks the
//! estimated sizes and label fractions.

#[path = "testutils/mod.rs"]
mod testutils;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use graphcard::algebra::{DbProperties, Expression, Operator, ResultProperties, TypeSet};
use graphcard::stats::TypeSummary;
use graphcard::{
    Direction, EstimatorConfig, GraphStatistics, GraphStatisticsView, JoinStrategy,
    LabelDistribution, PropertyPredicate, Query, ANY_LABEL,
};
use testutils::estimator_fixture::*;

fn knows() -> TypeSet {
    TypeSet::from([KNOWS])
}

fn assert_no_nan(props: &ResultProperties) {
    assert!(!props.size().is_nan());
    for (variable, fractions) in props.node_labels() {
        for (label, fraction) in fractions {
            assert!(
                !fraction.is_nan(),
                "fraction of label {} on {} is NaN",
                label,
                variable
            );
        }
    }
}

#[test]
fn test_get_nodes_and_label_selection() {
    let fixture = EstimatorFixture::social();
    let all = fixture.chain("n", vec![]);
    assert_eq!(all.size(), 100.0);
    assert!(all.properties().is_initial());
    assert_close(all.properties().fraction("n", PERSON), 1.0);
    assert_close(all.properties().fraction("n", EMPLOYEE), 0.3);

    let employees = fixture.chain("n", vec![Operator::label_selection("n", EMPLOYEE)]);
    assert_close(employees.size(), 30.0);
    assert!(!employees.properties().is_initial());
    assert_close(employees.properties().fraction("n", EMPLOYEE), 1.0);
    // every employee is a person
    assert_close(employees.properties().fraction("n", PERSON), 1.0);
}

#[test]
fn test_initial_expand_is_exact() {
    let fixture = EstimatorFixture::social();
    let expr = fixture.chain(
        "a",
        vec![Operator::expand("a", Direction::Outgoing, "$e0", knows(), "b")],
    );
    assert_eq!(expr.size(), 500.0);
    assert_close(expr.properties().fraction("b", EMPLOYEE), 0.3);
    assert_close(expr.properties().fraction("a", EMPLOYEE), 240.0 / 500.0);
}

#[test]
fn test_undirected_expand_counts_both_directions() {
    let fixture = EstimatorFixture::geo();
    let expr = fixture.chain(
        "a",
        vec![
            Operator::label_selection("a", PERSON),
            Operator::expand("a", Direction::Both, "$e0", knows(), "b"),
        ],
    );
    assert_close(expr.size(), 800.0);
}

#[test]
fn test_disjoint_label_selections_partition_nodes() {
    let fixture = EstimatorFixture::geo();
    let total: f64 = [PERSON, EMPLOYEE, CITY, COUNTRY]
        .into_iter()
        .map(|label| {
            fixture
                .chain("n", vec![Operator::label_selection("n", label)])
                .size()
        })
        .sum();
    assert_close(total, 200.0);

    let cities = fixture.chain("n", vec![Operator::label_selection("n", CITY)]);
    assert_close(cities.properties().fraction("n", CITY), 1.0);
    assert_eq!(cities.properties().fraction("n", PERSON), 0.0);
    assert_eq!(cities.properties().fraction("n", COUNTRY), 0.0);
}

#[test]
fn test_estimated_expand_along_chain() {
    let fixture = EstimatorFixture::geo();
    let expr = fixture.chain(
        "c",
        vec![
            Operator::label_selection("c", CITY),
            Operator::expand("c", Direction::Incoming, "$e0", TypeSet::from([LOCATED_IN]), "p"),
            Operator::expand("c", Direction::Outgoing, "$e1", TypeSet::from([LOCATED_IN]), "k"),
        ],
    );
    // 100 persons in 50 cities, every city in one country
    assert_close(expr.size(), 100.0);
    assert_close(expr.properties().fraction("p", PERSON), 1.0);
    assert_close(expr.properties().fraction("k", COUNTRY), 1.0);
    assert_close(expr.properties().fraction("c", CITY), 1.0);
}

#[test]
fn test_single_group_expand_uses_weighted_degree() {
    let statistics = GraphStatistics::builder(100.0)
        .label("A", 0, 40.0)
        .relationship_type("R", 0, TypeSummary::default())
        .relationships(0, 0, ANY_LABEL, 120.0)
        .relationships(ANY_LABEL, 0, ANY_LABEL, 200.0)
        .build();
    let db = DbProperties::new(
        Arc::new(GraphStatisticsView::new(Arc::new(statistics))),
        Arc::new(LabelDistribution::single_group([0])),
    );
    let input = ResultProperties::new(
        BTreeMap::from([("a".to_string(), BTreeMap::from([(0, 0.25)]))]),
        BTreeMap::new(),
        80.0,
        false,
    )
    .unwrap();

    let out = Operator::expand("a", Direction::Outgoing, "$e0", TypeSet::from([0]), "b")
        .compute(&db, &[&input])
        .unwrap();
    // 0.25 * 120/40 + 0.75 * 200/100
    assert_close(out.size(), 80.0 * 2.25);
}

#[test]
fn test_static_selectivity_per_predicate() {
    let fixture = EstimatorFixture::geo();
    let predicates = BTreeMap::from([
        (NAME, PropertyPredicate::value("Alice")),
        (AGE, PropertyPredicate::equals_number(30.0).unwrap()),
    ]);
    let expr = fixture.chain(
        "a",
        vec![
            Operator::label_selection("a", PERSON),
            Operator::property_selection("a", predicates, Some(0.5)),
        ],
    );
    assert_close(expr.size(), 25.0);
    // no label keeps a fraction once the selectivity is fixed
    assert_eq!(expr.properties().fraction("a", PERSON), 0.0);
}

#[test]
fn test_property_selection_uses_distinct_values() {
    let fixture = EstimatorFixture::social();
    let predicates = BTreeMap::from([(NAME, PropertyPredicate::value("Bob"))]);
    let expr = fixture.chain(
        "a",
        vec![
            Operator::label_selection("a", PERSON),
            Operator::property_selection("a", predicates, None),
        ],
    );
    // mean over the candidate labels; employees carry no name statistics
    let selectivity = (1.0 / 80.0) / 2.0;
    assert_close(expr.size(), 100.0 * selectivity);
    assert_eq!(expr.properties().fraction("a", EMPLOYEE), 0.0);
    assert_close(expr.properties().fraction("a", PERSON), 1.0);
}

#[test]
fn test_node_join_is_commutative() {
    let fixture = EstimatorFixture::geo();
    let db = fixture.db();
    let persons = || fixture.chain("a", vec![Operator::label_selection("a", PERSON)]);
    let friends = || {
        fixture.chain(
            "a",
            vec![Operator::expand("a", Direction::Outgoing, "$e0", knows(), "b")],
        )
    };

    let left = Expression::new(Operator::NodeJoin, vec![persons(), friends()], &db).unwrap();
    let right = Expression::new(Operator::NodeJoin, vec![friends(), persons()], &db).unwrap();
    assert_close(left.size(), right.size());
    assert_close(left.size(), 100.0 * 400.0 / 200.0);
    assert_eq!(left.properties().types("$e0"), Some(&knows()));

    let cities = fixture.chain("c", vec![Operator::label_selection("c", CITY)]);
    let cross = Expression::new(Operator::NodeJoin, vec![persons(), cities], &db).unwrap();
    assert_close(cross.size(), 100.0 * 50.0);
}

#[test]
fn test_empty_database_yields_zero_without_nan() {
    let statistics = GraphStatistics::builder(0.0)
        .label("A", 0, 0.0)
        .relationship_type("R", 0, TypeSummary::default())
        .property("p", 0)
        .build();
    let db = DbProperties::new(
        Arc::new(GraphStatisticsView::new(Arc::new(statistics))),
        Arc::new(LabelDistribution::single_group([0])),
    );
    let r = TypeSet::from([0]);
    let operators = vec![
        Operator::expand("a", Direction::Outgoing, "$e0", r.clone(), "b"),
        Operator::label_selection("a", 0),
        Operator::property_selection("a", BTreeMap::from([(0, PropertyPredicate::value("x"))]), None),
        Operator::expand("b", Direction::Outgoing, "$e1", r.clone(), "c"),
        Operator::type_selection("$e1", r.clone()),
        Operator::expand("c", Direction::Outgoing, "$e2", r.clone(), "$v3"),
        Operator::merge_on("a", "$v3"),
        Operator::expand("a", Direction::Incoming, "$e4", r, "$v5"),
        Operator::self_join("b", "$v5"),
    ];

    let mut expr = Expression::leaf(Operator::get_nodes("a"), &db).unwrap();
    assert_eq!(expr.size(), 0.0);
    for op in operators {
        expr = expr.apply(op, &db).unwrap();
        assert_eq!(expr.size(), 0.0, "after {}", expr.operator());
        assert_no_nan(expr.properties());
    }

    let other = Expression::leaf(Operator::get_nodes("a"), &db).unwrap();
    let joined = Expression::new(Operator::NodeJoin, vec![expr, other], &db).unwrap();
    assert_eq!(joined.size(), 0.0);
    assert_no_nan(joined.properties());
}

#[test]
fn test_contract_violations() {
    let fixture = EstimatorFixture::social();
    let db = fixture.db();
    let expr = fixture.chain("a", vec![]);

    let err = expr
        .clone()
        .apply(Operator::expand("x", Direction::Outgoing, "$e0", knows(), "b"), &db)
        .unwrap_err();
    assert_eq!(err, graphcard::EstimatorError::VariableNotBound("x".into()));

    let err = expr
        .clone()
        .apply(Operator::merge_on("a", "a"), &db)
        .unwrap_err();
    assert_eq!(err, graphcard::EstimatorError::SameVariableMerge("a".into()));

    let err = Operator::NodeJoin
        .compute(&db, &[expr.properties()])
        .unwrap_err();
    assert!(matches!(
        err,
        graphcard::EstimatorError::ArityMismatch { expected: 2, actual: 1, .. }
    ));
}

#[test]
fn test_rebuilding_a_plan_is_deterministic() {
    let fixture = EstimatorFixture::geo();
    let estimator = fixture.estimator(EstimatorConfig::default());
    let query = Query::parse(
        "(a:Person)-[:KNOWS]->(b:Person)-[:KNOWS]->(c:Person)-[:KNOWS]->(a)",
        None,
    )
    .unwrap();

    let first = estimator.plan(&query).unwrap();
    let second = estimator.plan(&query).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        estimator.estimate(&query).unwrap().to_bits(),
        first.size().to_bits()
    );
}

#[test]
fn test_estimator_handles_all_join_strategies() {
    let fixture = EstimatorFixture::geo();
    let query = Query::parse(
        "(a:Person)-[:KNOWS]->(b:Person)-[:KNOWS]->(c:Person)-[:KNOWS]->(a)",
        None,
    )
    .unwrap();

    for strategy in [JoinStrategy::MergeOn, JoinStrategy::SelfJoin] {
        let estimator = fixture.estimator(EstimatorConfig {
            join_strategy: strategy,
            ..Default::default()
        });
        let estimate = estimator.estimate(&query).unwrap();
        assert!(estimate.is_finite() && estimate > 0.0, "{}: {}", strategy, estimate);

        let plan = estimator.plan(&query).unwrap();
        let variables: BTreeSet<&str> = plan.properties().node_variables().collect();
        assert_eq!(variables, BTreeSet::from(["a", "b", "c"]));
    }
}
