//! Bracket business logic: validation, standings, third-place assignment, knockout propagation.

mod assignment;
mod evaluate;
mod knockout;
mod standings;
mod third_place;
mod validation;

pub use assignment::{
    assign_third_placed, build_round_of_32, FixedSlot, ThirdPlaceAssignment, ThirdPlaceSlot,
    ROUND_OF_32_FIXED, ROUND_OF_32_THIRD_SLOTS,
};
pub use evaluate::{build_bracket, evaluate};
pub use knockout::{
    compute_bracket, compute_match, record_winner, KnockoutMatch, TeamSource, LATER_ROUNDS,
};
pub use standings::{resolve_seed, resolve_seed_code, validate_standings};
pub use third_place::{
    extract_third_placed, select_qualified, validate_qualified_count, QUALIFIED_THIRDS,
};
pub use validation::{is_valid_permutation, ordinal};
