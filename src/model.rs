use std::collections::BTreeMap;
use std::fmt;

use crate::palette::Color;

/// A capacity-bounded stack of color tokens. The top of the vessel is the last element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Vessel {
    colors: Vec<Color>,
    capacity: usize,
}

impl Vessel {
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// A vessel filled to the brim with one color.
    pub fn full_of(color: Color, capacity: usize) -> Self {
        Self {
            colors: vec![color; capacity],
            capacity,
        }
    }

    /// Parse a vessel from its letter representation, bottom first.
    ///
    /// `"AAB."` is a vessel of capacity 4 holding two `A` under one `B`. Empty slots must come
    /// after every token, and every letter must name a palette color.
    pub fn new_from_repr(repr: &str) -> Option<Self> {
        let repr = repr.trim();
        let mut colors = Vec::new();
        let mut seen_empty = false;
        for ch in repr.chars() {
            if ch == '.' {
                seen_empty = true;
                continue;
            }
            if seen_empty {
                return None;
            }
            colors.push(Color::from_letter(ch)?);
        }
        Some(Self {
            colors,
            capacity: repr.chars().count(),
        })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= self.capacity
    }

    pub fn free_space(&self) -> usize {
        self.capacity.saturating_sub(self.colors.len())
    }

    pub fn top(&self) -> Option<Color> {
        self.colors.last().copied()
    }

    /// Length of the run of the top color, counted downward from the top.
    pub fn top_run(&self) -> usize {
        let Some(top) = self.top() else {
            return 0;
        };
        self.colors.iter().rev().take_while(|c| **c == top).count()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn distinct_colors(&self) -> usize {
        let mut seen: Vec<Color> = Vec::with_capacity(self.colors.len());
        for color in &self.colors {
            if !seen.contains(color) {
                seen.push(*color);
            }
        }
        seen.len()
    }

    pub fn is_monochrome(&self) -> bool {
        self.distinct_colors() <= 1
    }

    pub(crate) fn push(&mut self, color: Color) {
        debug_assert!(!self.is_full(), "vessel overflow");
        self.colors.push(color);
    }

    pub(crate) fn pop(&mut self) -> Option<Color> {
        self.colors.pop()
    }

    pub fn get_text_representation(&self) -> String {
        self.colors
            .iter()
            .map(|c| c.letter())
            .chain(std::iter::repeat_n('.', self.free_space()))
            .collect()
    }
}

/// An arrangement of vessels sharing one capacity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    vessels: Vec<Vessel>,
    capacity: usize,
}

impl PuzzleState {
    /// Build a state from raw vessel contents.
    ///
    /// Returns `None` when a vessel holds more tokens than `capacity`.
    pub fn new(capacity: usize, tubes: Vec<Vec<Color>>) -> Option<Self> {
        if tubes.iter().any(|t| t.len() > capacity) {
            return None;
        }
        let vessels = tubes
            .into_iter()
            .map(|colors| Vessel { colors, capacity })
            .collect();
        Some(Self { vessels, capacity })
    }

    /// One full vessel per color followed by `extra_empty` empty vessels.
    pub fn sorted(capacity: usize, colors: &[Color], extra_empty: usize) -> Self {
        let mut vessels: Vec<Vessel> = colors
            .iter()
            .map(|color| Vessel::full_of(*color, capacity))
            .collect();
        vessels.extend((0..extra_empty).map(|_| Vessel::new(capacity)));
        Self { vessels, capacity }
    }

    /// Parse a whitespace separated list of vessel representations, e.g. `"AAB. A... ...."`.
    ///
    /// Every vessel must have the same capacity.
    pub fn new_from_repr(repr: &str) -> Option<Self> {
        let vessels: Vec<Vessel> = repr
            .split_whitespace()
            .map(Vessel::new_from_repr)
            .collect::<Option<_>>()?;
        let capacity = vessels.first()?.capacity();
        if vessels.iter().any(|v| v.capacity() != capacity) {
            return None;
        }
        Some(Self { vessels, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn vessel(&self, index: usize) -> Option<&Vessel> {
        self.vessels.get(index)
    }

    pub(crate) fn vessels_mut(&mut self) -> &mut Vec<Vessel> {
        &mut self.vessels
    }

    /// Token count per color across all vessels.
    pub fn color_counts(&self) -> BTreeMap<Color, usize> {
        let mut counts = BTreeMap::new();
        for color in self.vessels.iter().flat_map(|v| v.colors.iter()) {
            *counts.entry(*color).or_insert(0) += 1;
        }
        counts
    }

    /// Whether every color present fills exactly one vessel's worth of tokens.
    pub fn is_balanced(&self) -> bool {
        self.color_counts().values().all(|n| *n == self.capacity)
    }

    /// The vessel contents, ordered as they are rendered.
    pub fn tubes(&self) -> Vec<Vec<Color>> {
        self.vessels.iter().map(|v| v.colors.clone()).collect()
    }

    /// The vessel contents with vessel order discarded.
    ///
    /// Two states with the same canonical form are the same puzzle, since every vessel shares
    /// one capacity.
    pub fn canonical(&self) -> Vec<Vec<Color>> {
        let mut tubes = self.tubes();
        tubes.sort_unstable();
        tubes
    }

    pub fn get_text_representation(&self) -> String {
        self.vessels
            .iter()
            .map(|v| v.get_text_representation())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_text_representation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = Color::new(0).unwrap();
    const B: Color = Color::new(1).unwrap();

    #[test]
    fn parses_vessel_repr() {
        let vessel = Vessel::new_from_repr("AAB.").unwrap();
        assert_eq!(vessel.capacity(), 4);
        assert_eq!(vessel.colors(), &[A, A, B]);
        assert_eq!(vessel.top(), Some(B));
        assert_eq!(vessel.free_space(), 1);
        assert_eq!(vessel.get_text_representation(), "AAB.");
    }

    #[test]
    fn rejects_gaps_below_tokens() {
        assert!(Vessel::new_from_repr("A.B.").is_none());
        assert!(Vessel::new_from_repr("A?..").is_none());
    }

    #[test]
    fn letters_outside_the_palette_are_rejected() {
        assert!(Vessel::new_from_repr("Z...").is_none());
        assert!(PuzzleState::new_from_repr("Z... F...").is_none());
        assert!(PuzzleState::new_from_repr("T... F...").is_some());
    }

    #[test]
    fn parsed_states_survive_a_json_round_trip() {
        let state = PuzzleState::new_from_repr("TFA. F... AT.. ....").unwrap();
        let json = serde_json::to_string(&state.tubes()).unwrap();
        let tubes: Vec<Vec<Color>> = serde_json::from_str(&json).unwrap();
        assert_eq!(PuzzleState::new(state.capacity(), tubes), Some(state));
    }

    #[test]
    fn top_run_counts_matching_tokens_from_the_top() {
        assert_eq!(Vessel::new_from_repr("BAAA").unwrap().top_run(), 3);
        assert_eq!(Vessel::new_from_repr("AAB.").unwrap().top_run(), 1);
        assert_eq!(Vessel::new_from_repr("....").unwrap().top_run(), 0);
    }

    #[test]
    fn sorted_state_holds_one_full_vessel_per_color() {
        let state = PuzzleState::sorted(4, &[A, B], 2);
        assert_eq!(state.len(), 4);
        assert_eq!(state.get_text_representation(), "AAAA BBBB .... ....");
        assert!(state.is_balanced());
        assert_eq!(state.color_counts().get(&A), Some(&4));
    }

    #[test]
    fn state_repr_requires_one_capacity() {
        assert!(PuzzleState::new_from_repr("AA. A..").is_some());
        assert!(PuzzleState::new_from_repr("AA. A.").is_none());
        assert!(PuzzleState::new_from_repr("").is_none());
    }

    #[test]
    fn canonical_ignores_vessel_order() {
        let a = PuzzleState::new_from_repr("AB.. BA.. ....").unwrap();
        let b = PuzzleState::new_from_repr(".... BA.. AB..").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn new_rejects_overfull_vessels() {
        assert!(PuzzleState::new(2, vec![vec![A, A, A]]).is_none());
        assert!(PuzzleState::new(3, vec![vec![A, A, A], vec![]]).is_some());
    }
}
