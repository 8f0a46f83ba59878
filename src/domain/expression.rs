// Expression classification - scalars versus backend queries
use super::color::{palette_color, Color};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Scalar(f64),
    Query(String),
}

impl Expression {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) => Expression::Scalar(value),
            Err(_) => Expression::Query(raw.to_string()),
        }
    }
}

/// A classified entry remembering where it sat in the submitted list.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T> {
    pub index: usize,
    pub color: Color,
    pub item: T,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub scalars: Vec<Slot<f64>>,
    pub queries: Vec<Slot<String>>,
}

/// Partition expressions into scalars and queries, keeping submission order.
///
/// Every expression consumes one palette slot, so a scalar shifts the colors
/// of the queries after it exactly as another query would.
pub fn classify(expressions: &[String]) -> Classification {
    let mut classification = Classification::default();

    for (index, raw) in expressions.iter().enumerate() {
        let color = palette_color(index);
        match Expression::parse(raw) {
            Expression::Scalar(item) => classification.scalars.push(Slot { index, color, item }),
            Expression::Query(item) => classification.queries.push(Slot { index, color, item }),
        }
    }

    classification
}
