use std::collections::{HashMap, HashSet};
use tracing::debug;
use seatwise_catalog::Seat;
use seatwise_shared::{PreferenceCategory, UnassignedPassenger};
use crate::models::{BulkAssignmentSuggestion, Confidence, SuggestionSource};
use crate::rules::{CompanionMatcher, PositionRule};

const FALLBACK_REASON: &str = "standard assignment";

/// Proposes seats for waiting passengers.
///
/// Passes run companion, position, fallback; each pass only sees the
/// passengers and seats earlier passes left over. Planning is pure: the
/// caller applies accepted suggestions through the assignment operations.
#[derive(Debug, Clone, Default)]
pub struct BulkPlanner {
    companion: CompanionMatcher,
}

impl BulkPlanner {
    pub fn new() -> Self {
        Self {
            companion: CompanionMatcher::new(),
        }
    }

    pub fn plan(
        &self,
        unassigned: &[UnassignedPassenger],
        free_seats: &[Seat],
    ) -> Vec<BulkAssignmentSuggestion> {
        if unassigned.is_empty() || free_seats.is_empty() {
            return Vec::new();
        }

        let mut state = PlanState::new(unassigned, free_seats);

        self.companion_pass(&mut state);
        let after_companion = state.suggestions.len();

        self.position_pass(&mut state);
        let after_position = state.suggestions.len();

        self.fallback_pass(&mut state);

        let mut suggestions = state.suggestions;
        annotate_conflicts(&mut suggestions);

        debug!(
            "Bulk plan: {} companion, {} position, {} fallback suggestions for {} passengers / {} seats",
            after_companion,
            after_position - after_companion,
            suggestions.len() - after_position,
            unassigned.len(),
            free_seats.len(),
        );

        suggestions
    }

    fn companion_pass(&self, state: &mut PlanState<'_>) {
        for i in 0..state.passengers.len() {
            if state.passenger_done[i] {
                continue;
            }
            let passenger = state.passengers[i];
            if passenger.passenger.preference_type != Some(PreferenceCategory::Companion) {
                continue;
            }
            let Some(wanted) = passenger
                .passenger
                .preference_text()
                .and_then(|text| self.companion.target_name(text))
            else {
                continue;
            };

            let partner = (0..state.passengers.len()).find(|&j| {
                j != i
                    && !state.passenger_done[j]
                    && CompanionMatcher::names_match(&wanted, state.passengers[j].name())
            });
            let Some(j) = partner else {
                debug!("No waiting companion '{}' for {}", wanted, passenger.name());
                continue;
            };

            let Some((first, second)) = state.adjacent_pair() else {
                debug!("No adjacent seat pair left for {} and companion", passenger.name());
                continue;
            };

            let companion = state.passengers[j];
            state.take(
                i,
                first,
                format!("Seated next to {}", companion.name()),
                Confidence::High,
                SuggestionSource::Companion,
            );
            state.take(
                j,
                second,
                format!("Seated next to {}", passenger.name()),
                Confidence::High,
                SuggestionSource::Companion,
            );
        }
    }

    fn position_pass(&self, state: &mut PlanState<'_>) {
        for i in 0..state.passengers.len() {
            if state.passenger_done[i] {
                continue;
            }
            let passenger = state.passengers[i];
            if passenger.passenger.preference_type != Some(PreferenceCategory::Position) {
                continue;
            }
            let Some(text) = passenger.passenger.preference_text() else {
                continue;
            };

            for rule in PositionRule::matching(text) {
                if let Some(seat) = state.seat_for(rule) {
                    state.take(
                        i,
                        seat,
                        format!("Preference: {}", rule.describe()),
                        Confidence::High,
                        SuggestionSource::Position,
                    );
                    break;
                }
            }
        }
    }

    fn fallback_pass(&self, state: &mut PlanState<'_>) {
        let passengers: Vec<usize> = (0..state.passengers.len())
            .filter(|&i| !state.passenger_done[i])
            .collect();
        let seats: Vec<usize> = state.free_in_logical_order().collect();

        for (passenger, seat) in passengers.into_iter().zip(seats) {
            state.take(
                passenger,
                seat,
                FALLBACK_REASON.to_string(),
                Confidence::Medium,
                SuggestionSource::Fallback,
            );
        }
    }
}

/// Working set shared by the passes
struct PlanState<'a> {
    passengers: Vec<&'a UnassignedPassenger>,
    passenger_done: Vec<bool>,
    /// Seats in map order (grid row, then column)
    seats: Vec<&'a Seat>,
    seat_taken: Vec<bool>,
    /// Indices into `seats`, ordered by logical row then letter
    logical_order: Vec<usize>,
    suggestions: Vec<BulkAssignmentSuggestion>,
}

impl<'a> PlanState<'a> {
    fn new(unassigned: &'a [UnassignedPassenger], free_seats: &'a [Seat]) -> Self {
        let mut seen_passengers = HashSet::new();
        let passengers: Vec<&UnassignedPassenger> = unassigned
            .iter()
            .filter(|passenger| seen_passengers.insert(passenger.id.as_str()))
            .collect();

        let mut seen_seats = HashSet::new();
        let mut seats: Vec<&Seat> = free_seats
            .iter()
            .filter(|seat| seat.seat_type.is_passenger_seat())
            .filter(|seat| seen_seats.insert(seat.id))
            .collect();
        seats.sort_by_key(|seat| (seat.row, seat.column));

        let mut logical_order: Vec<usize> = (0..seats.len()).collect();
        logical_order.sort_by_key(|&i| (seats[i].logical_key(), seats[i].row, seats[i].column));

        Self {
            passenger_done: vec![false; passengers.len()],
            seat_taken: vec![false; seats.len()],
            passengers,
            seats,
            logical_order,
            suggestions: Vec::new(),
        }
    }

    fn take(
        &mut self,
        passenger: usize,
        seat: usize,
        reason: String,
        confidence: Confidence,
        source: SuggestionSource,
    ) {
        self.passenger_done[passenger] = true;
        self.seat_taken[seat] = true;
        self.suggestions.push(BulkAssignmentSuggestion::new(
            self.passengers[passenger],
            self.seats[seat],
            reason,
            confidence,
            source,
        ));
    }

    fn free_in_logical_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.logical_order
            .iter()
            .copied()
            .filter(|&seat| !self.seat_taken[seat])
    }

    /// First free seat in map order that has a free logical neighbour
    fn adjacent_pair(&self) -> Option<(usize, usize)> {
        let free: Vec<usize> = (0..self.seats.len())
            .filter(|&seat| !self.seat_taken[seat])
            .collect();

        free.iter().find_map(|&first| {
            free.iter()
                .copied()
                .find(|&second| self.seats[first].is_adjacent_to(self.seats[second]))
                .map(|second| (first, second))
        })
    }

    fn seat_for(&self, rule: PositionRule) -> Option<usize> {
        let mut free = self.free_in_logical_order();
        match rule {
            PositionRule::Forward => free.next(),
            PositionRule::Backward => {
                let candidates: Vec<usize> = free.collect();
                let last_row = candidates
                    .iter()
                    .filter_map(|&seat| self.seats[seat].row_number)
                    .max()?;
                candidates
                    .into_iter()
                    .find(|&seat| self.seats[seat].row_number == Some(last_row))
            }
            PositionRule::Window => free.find(|&seat| self.seats[seat].is_window()),
            PositionRule::Aisle => free.find(|&seat| self.seats[seat].is_aisle()),
        }
    }
}

/// High-confidence position suggestions competing for one row get an advisory note
fn annotate_conflicts(suggestions: &mut [BulkAssignmentSuggestion]) {
    let mut rows: HashMap<u32, Vec<usize>> = HashMap::new();
    for (index, suggestion) in suggestions.iter().enumerate() {
        if suggestion.source != SuggestionSource::Position || suggestion.confidence != Confidence::High {
            continue;
        }
        if let Some(row) = suggestion.row_number {
            rows.entry(row).or_default().push(index);
        }
    }

    for (row, members) in rows {
        if members.len() < 2 {
            continue;
        }
        for &index in &members {
            let competitors: Vec<String> = members
                .iter()
                .filter(|&&other| other != index)
                .map(|&other| suggestions[other].passenger_name().to_string())
                .collect();
            for name in competitors {
                suggestions[index]
                    .conflicts
                    .push(format!("Row {} is also requested by {}", row, name));
            }
        }
    }
}
