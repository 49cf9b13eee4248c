//! In-memory statistics fixtures
//!
//! The social graph has 100 nodes: 100 Person (0), 30 Employee (1, a
//! sub-label of Person). KNOWS (0) relationships connect persons, 500 of them.
//! The geo graph adds disjoint City (2) and Country (3) labels.

use graphcard::algebra::{DbProperties, Expression, Operator};
use graphcard::stats::{PropertyStats, TypeSummary};
use graphcard::{
    CardinalityEstimator, EstimatorConfig, GraphStatistics, GraphStatisticsView, LabelDistribution,
    ANY_LABEL, ANY_TYPE,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub const PERSON: i32 = 0;
pub const EMPLOYEE: i32 = 1;
pub const CITY: i32 = 2;
pub const COUNTRY: i32 = 3;
pub const KNOWS: i32 = 0;
pub const LOCATED_IN: i32 = 1;
pub const NAME: i32 = 0;
pub const AGE: i32 = 1;

/// Statistics plus label distribution, ready for operators and estimators
pub struct EstimatorFixture {
    pub statistics: Arc<GraphStatistics>,
    pub distribution: LabelDistribution,
}

impl EstimatorFixture {
    /// Person/Employee graph in one overlap group
    pub fn social() -> Self {
        let statistics = GraphStatistics::builder(100.0)
            .label("Person", PERSON, 100.0)
            .label("Employee", EMPLOYEE, 30.0)
            .relationship_type(
                "KNOWS",
                KNOWS,
                TypeSummary {
                    outgoing: 500.0,
                    incoming: 500.0,
                    ..Default::default()
                },
            )
            .property("name", NAME)
            .property("age", AGE)
            .add_relationships(PERSON, KNOWS, PERSON, 500.0)
            .relationships(EMPLOYEE, KNOWS, ANY_LABEL, 240.0)
            .relationships(EMPLOYEE, ANY_TYPE, ANY_LABEL, 240.0)
            .relationships(EMPLOYEE, KNOWS, PERSON, 240.0)
            .relationships(ANY_LABEL, KNOWS, EMPLOYEE, 150.0)
            .relationships(PERSON, KNOWS, EMPLOYEE, 150.0)
            .label_property(PERSON, NAME, PropertyStats::new(100.0, 80.0, 0.0))
            .label_property(
                PERSON,
                AGE,
                PropertyStats::new(100.0, 60.0, 100.0).with_quantiles(vec![0.0, 20.0, 40.0, 60.0, 80.0]),
            )
            .build();

        let mut sublabels = HashMap::new();
        sublabels.insert(PERSON, BTreeSet::from([EMPLOYEE]));
        let distribution =
            LabelDistribution::new(vec![BTreeSet::from([PERSON, EMPLOYEE])], sublabels)
                .expect("valid distribution");
        Self {
            statistics: Arc::new(statistics),
            distribution,
        }
    }

    /// Four labels, each in its own group
    pub fn geo() -> Self {
        let statistics = GraphStatistics::builder(200.0)
            .label("Person", PERSON, 100.0)
            .label("Employee", EMPLOYEE, 30.0)
            .label("City", CITY, 50.0)
            .label("Country", COUNTRY, 20.0)
            .relationship_type("KNOWS", KNOWS, TypeSummary::default())
            .relationship_type("LOCATED_IN", LOCATED_IN, TypeSummary::default())
            .add_relationships(PERSON, KNOWS, PERSON, 400.0)
            .add_relationships(PERSON, LOCATED_IN, CITY, 100.0)
            .add_relationships(CITY, LOCATED_IN, COUNTRY, 50.0)
            .build();
        let distribution = LabelDistribution::disjoint([PERSON, EMPLOYEE, CITY, COUNTRY]);
        Self {
            statistics: Arc::new(statistics),
            distribution,
        }
    }

    pub fn db(&self) -> DbProperties {
        DbProperties::new(
            Arc::new(GraphStatisticsView::new(Arc::clone(&self.statistics))),
            Arc::new(self.distribution.clone()),
        )
    }

    pub fn estimator(&self, config: EstimatorConfig) -> CardinalityEstimator {
        CardinalityEstimator::new(
            Arc::clone(&self.statistics),
            Some(self.distribution.clone()),
            config,
        )
        .expect("valid estimator")
    }

    /// Builds a chain of unary operators on top of `GetNodes(variable)`
    pub fn chain(&self, variable: &str, operators: Vec<Operator>) -> Expression {
        let db = self.db();
        operators
            .into_iter()
            .try_fold(
                Expression::leaf(Operator::get_nodes(variable), &db).expect("leaf"),
                |expr, op| expr.apply(op, &db),
            )
            .expect("valid operator chain")
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
