//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.
//! Scores are white-positive: larger is better for White regardless of the
//! side to move.

use crate::position::chess_types::*;
use crate::position::position::Position;

pub trait Evaluator: Send + Sync {
    fn evaluate(&self, position: &Position) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20_000,
        }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> i32 {
        position
            .squares()
            .iter()
            .map(|piece| match (piece.kind(), piece.color()) {
                (Some(kind), Some(Color::White)) => Self::piece_value(kind),
                (Some(kind), Some(Color::Black)) => -Self::piece_value(kind),
                _ => 0,
            })
            .sum()
    }
}

/// Weighted sum of component evaluators.
pub struct CompositeEvaluator {
    terms: Vec<(Box<dyn Evaluator>, i32)>,
}

impl CompositeEvaluator {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn with_term(mut self, evaluator: impl Evaluator + 'static, weight: i32) -> Self {
        self.terms.push((Box::new(evaluator), weight));
        self
    }

    pub fn push_term(&mut self, evaluator: Box<dyn Evaluator>, weight: i32) {
        self.terms.push((evaluator, weight));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for CompositeEvaluator {
    /// Material only, unit weight.
    fn default() -> Self {
        Self::new().with_term(MaterialEvaluator, 1)
    }
}

impl Evaluator for CompositeEvaluator {
    fn evaluate(&self, position: &Position) -> i32 {
        self.terms
            .iter()
            .map(|(evaluator, weight)| weight.saturating_mul(evaluator.evaluate(position)))
            .fold(0i32, i32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_from_diagram;

    struct Constant(i32);

    impl Evaluator for Constant {
        fn evaluate(&self, _position: &Position) -> i32 {
            self.0
        }
    }

    #[test]
    fn start_position_material_is_balanced() {
        let pos = Position::standard().expect("standard");
        assert_eq!(MaterialEvaluator.evaluate(&pos), 0);
    }

    #[test]
    fn material_is_white_positive_for_either_side_to_move() {
        for side in ["w", "b"] {
            let setup = setup_from_diagram(
                &["....k...", "........", "........", "........", "........", "........", "........", "...QK..."],
                &format!("{side} - -"),
            );
            let pos = Position::from_setup(&setup).expect("position");
            assert_eq!(MaterialEvaluator.evaluate(&pos), 900);
        }
    }

    #[test]
    fn composite_sums_weighted_terms() {
        let pos = Position::standard().expect("standard");
        let composite = CompositeEvaluator::new()
            .with_term(Constant(7), 3)
            .with_term(Constant(-2), 5);
        assert_eq!(composite.evaluate(&pos), 11);
        assert_eq!(composite.len(), 2);
        assert!(CompositeEvaluator::new().is_empty());
        assert_eq!(CompositeEvaluator::new().evaluate(&pos), 0);
    }

    #[test]
    fn default_composite_matches_material() {
        let setup = setup_from_diagram(
            &["....k...", "......r.", "........", "........", "........", "........", "PP......", "....K..."],
            "w - -",
        );
        let pos = Position::from_setup(&setup).expect("position");
        assert_eq!(CompositeEvaluator::default().evaluate(&pos), -300);
        assert_eq!(MaterialEvaluator.evaluate(&pos), -300);
    }
}
