//! Round of 32: match templates and assignment of the 8 qualified thirds to their slots.

use crate::logic::standings::resolve_seed;
use crate::models::GroupId::{A, B, C, D, E, F, G, H, I, J, K, L};
use crate::models::{
    BracketError, GroupId, MatchId, MatchView, Participant, SeedCode, Standings,
    ThirdPlaceCandidate,
};
use std::collections::BTreeMap;

/// Round-of-32 match between two fixed seeds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedSlot {
    pub match_id: MatchId,
    pub home: SeedCode,
    pub away: SeedCode,
}

/// Round-of-32 match between a fixed seed and one of the qualified thirds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ThirdPlaceSlot {
    pub match_id: MatchId,
    pub opponent: SeedCode,
    /// Groups whose third-placed team may be drawn into this match.
    pub eligible: &'static [GroupId],
}

impl ThirdPlaceSlot {
    pub fn accepts(&self, group: GroupId) -> bool {
        self.eligible.contains(&group)
    }
}

/// Match id → third-placed team drawn into that match.
pub type ThirdPlaceAssignment = BTreeMap<MatchId, ThirdPlaceCandidate>;

const fn fixed(id: u8, home: (u8, GroupId), away: (u8, GroupId)) -> FixedSlot {
    FixedSlot {
        match_id: MatchId::new_unchecked(id),
        home: SeedCode::new(home.0, home.1),
        away: SeedCode::new(away.0, away.1),
    }
}

const fn third(id: u8, winner_of: GroupId, eligible: &'static [GroupId]) -> ThirdPlaceSlot {
    ThirdPlaceSlot {
        match_id: MatchId::new_unchecked(id),
        opponent: SeedCode::new(1, winner_of),
        eligible,
    }
}

/// The 8 round-of-32 matches without a third-placed team.
pub const ROUND_OF_32_FIXED: [FixedSlot; 8] = [
    fixed(73, (2, A), (2, B)),
    fixed(75, (1, F), (2, C)),
    fixed(76, (1, C), (2, F)),
    fixed(78, (2, E), (2, I)),
    fixed(83, (2, K), (2, L)),
    fixed(84, (1, H), (2, J)),
    fixed(86, (1, J), (2, H)),
    fixed(88, (2, D), (2, G)),
];

/// The 8 round-of-32 matches where a group winner meets a qualified third.
pub const ROUND_OF_32_THIRD_SLOTS: [ThirdPlaceSlot; 8] = [
    third(74, E, &[A, B, C, D, F]),
    third(77, I, &[C, D, F, G, H]),
    third(79, A, &[C, E, F, H, I]),
    third(80, L, &[E, H, I, J, K]),
    third(81, D, &[B, E, F, I, J]),
    third(82, G, &[A, E, H, I, J]),
    third(85, B, &[E, F, G, I, J]),
    third(87, K, &[D, E, I, J, L]),
];

/// Assign each qualified third to a distinct slot whose eligible groups contain its group.
///
/// Depth-first search over the candidates sorted by (group, team), trying slots in the
/// order given, so identical input always yields the same assignment. Nothing is
/// returned unless every candidate is placed.
pub fn assign_third_placed(
    qualified: &[ThirdPlaceCandidate],
    slots: &[ThirdPlaceSlot],
) -> Result<ThirdPlaceAssignment, BracketError> {
    if qualified.len() != slots.len() {
        return Err(BracketError::InvalidQualifiedCount {
            selected: qualified.len(),
        });
    }

    let mut order: Vec<&ThirdPlaceCandidate> = qualified.iter().collect();
    order.sort();

    let mut used = vec![false; slots.len()];
    let mut placed: Vec<usize> = Vec::with_capacity(order.len());
    if !place_from(0, &order, slots, &mut used, &mut placed) {
        let groups = order.iter().map(|c| c.group).collect();
        log::debug!("No valid third-place assignment for {:?}", order);
        return Err(BracketError::UnassignableThirdPlace { groups });
    }

    let assignment: ThirdPlaceAssignment = order
        .iter()
        .zip(&placed)
        .map(|(candidate, &slot)| (slots[slot].match_id, (*candidate).clone()))
        .collect();
    log::debug!("Third-place assignment: {:?}", assignment);
    Ok(assignment)
}

/// Place `order[i..]`, given the slots already `used`. `placed[k]` is the slot index of `order[k]`.
fn place_from(
    i: usize,
    order: &[&ThirdPlaceCandidate],
    slots: &[ThirdPlaceSlot],
    used: &mut [bool],
    placed: &mut Vec<usize>,
) -> bool {
    let Some(candidate) = order.get(i) else {
        return true;
    };
    for (s, slot) in slots.iter().enumerate() {
        if used[s] || !slot.accepts(candidate.group) {
            continue;
        }
        used[s] = true;
        placed.push(s);
        if place_from(i + 1, order, slots, used, placed) {
            return true;
        }
        placed.pop();
        used[s] = false;
    }
    false
}

/// Build the 16 round-of-32 matches (M73..M88, no winners yet).
///
/// Fixed seeds resolve through the standings; the third-placed side of each
/// third-place slot comes from [`assign_third_placed`].
pub fn build_round_of_32(
    standings: &Standings,
    qualified: &[ThirdPlaceCandidate],
) -> Result<Vec<MatchView>, BracketError> {
    let assignment = assign_third_placed(qualified, &ROUND_OF_32_THIRD_SLOTS)?;

    let mut matches: Vec<MatchView> = Vec::with_capacity(16);
    for slot in &ROUND_OF_32_FIXED {
        matches.push(MatchView {
            id: slot.match_id,
            round: slot.match_id.round(),
            description: format!("{} vs {}", slot.home, slot.away),
            team_1: resolve_seed(slot.home, standings).into(),
            team_2: resolve_seed(slot.away, standings).into(),
            winner: None,
        });
    }
    for slot in &ROUND_OF_32_THIRD_SLOTS {
        let (code, team_2) = match assignment.get(&slot.match_id) {
            Some(c) => (format!("3{}", c.group), Participant::Team(c.team.clone())),
            None => ("3?".to_string(), Participant::Pending),
        };
        matches.push(MatchView {
            id: slot.match_id,
            round: slot.match_id.round(),
            description: format!("{} vs {}", slot.opponent, code),
            team_1: resolve_seed(slot.opponent, standings).into(),
            team_2,
            winner: None,
        });
    }
    matches.sort_by_key(|m| m.id);
    Ok(matches)
}
