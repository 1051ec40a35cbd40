//! Delta-debugging reduction of an unequivocal combination.
//!
//! Exhaustive minimal-subset search is exponential in constraint count, so
//! reduction uses a ddmin-style schedule instead: partition the working list
//! into `n` contiguous deltas, test each delta alone, then each complement,
//! adjusting the granularity as the schedule prescribes. The output is
//! locally 1-minimal with respect to this partition sequence, not globally
//! minimal; the schedule-dependence is an accepted cost/quality tradeoff.

use crate::cancel::Cancellation;
use crate::constraint::{Combination, Constraint};
use crate::tree::ViewTree;

/// Reduce `combination` to a locally minimal unequivocal combination.
///
/// Expects an unequivocal input; the working list stays unequivocal through
/// every reduction step, so on expiry of the cancellation signal the current
/// list is returned as the best result so far.
#[must_use]
pub fn minimize(
    tree: &ViewTree,
    combination: Combination,
    cancellation: &Cancellation,
) -> Combination {
    debug_assert!(combination.is_unequivocal(tree));

    let target = combination.target();
    let mut working: Vec<Constraint> = combination.constraints().to_vec();
    let mut granularity = 2usize;

    while working.len() > 1 && granularity <= working.len() {
        if cancellation.is_expired() {
            break;
        }

        let (deltas, complements) = partition(&working, granularity);

        let unequivocal = |constraints: &Vec<Constraint>| {
            Combination::from_constraints(target, constraints.clone()).is_unequivocal(tree)
        };

        if let Some(delta) = deltas.iter().find(|delta| unequivocal(delta)) {
            working = delta.clone();
            granularity = 2;
            continue;
        }

        if let Some(complement) = complements.iter().find(|complement| unequivocal(complement)) {
            working = complement.clone();
            granularity = (granularity - 1).max(2);
            continue;
        }

        granularity *= 2;
    }

    Combination::from_constraints(target, working)
}

/// Split `working` into `granularity` contiguous near-equal deltas and their
/// complements. Complements that duplicate a delta are not returned, so the
/// two-way split does not re-test its own halves.
fn partition(
    working: &[Constraint],
    granularity: usize,
) -> (Vec<Vec<Constraint>>, Vec<Vec<Constraint>>) {
    let chunk = working.len() / granularity;
    let mut deltas = Vec::new();
    let mut complements = Vec::new();

    let mut start = 0;
    while start < working.len() {
        let end = (start + chunk).min(working.len());
        deltas.push(working[start..end].to_vec());

        let mut complement = working[..start].to_vec();
        complement.extend_from_slice(&working[end..]);
        complements.push(complement);

        start += chunk;
    }

    complements.retain(|complement| !deltas.contains(complement));
    (deltas, complements)
}
