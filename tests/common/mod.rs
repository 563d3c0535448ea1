#![allow(dead_code)]

pub use taskdag_test_utils::builders;
pub use taskdag_test_utils::init_tracing;
pub use taskdag_test_utils::invariants::check_invariants;

/// Panic with the violation if the graph breaks an invariant.
pub fn assert_invariants(dag: &taskdag::dag::TaskDag) {
    if let Err(violation) = check_invariants(dag) {
        panic!("invariant violated: {violation}");
    }
}
