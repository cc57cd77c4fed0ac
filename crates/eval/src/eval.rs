// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! It provides a [HandValue::eval] method that computes the value of the best 5
//! cards hand out of 5, 6, or 7 cards, the value keeps the best hand so that it
//! can be shown to the players.
//!
//! The score layout is:
//!
//! ```text
//!   +--------+--------+--------+--------+
//!   |xxxxxxxx|kkkkaaaa|bbbbcccc|ddddeeee|
//!   +--------+--------+--------+--------+
//!   k = hand category (high card=0,...,straight flush=8)
//!   a..e = tie breaking ranks (deuce=0,...,ace=12) in decreasing importance
//! ```
use riverboat_cards::Card;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// Ranks bits for the wheel straight (A-2-3-4-5).
const WHEEL: u32 = 0x100F;

/// The rank index of the five.
const FIVE: u32 = 3;

/// The rank index of the ace.
const ACE: u32 = 12;

/// A hand category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// No pairs.
    HighCard = 0,
    /// A pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Five cards in sequence.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Five cards in sequence of the same suit.
    StraightFlush,
}

impl HandRank {
    /// Extracts the category from a score.
    pub fn from_score(score: u32) -> HandRank {
        match (score >> 20) & 0xF {
            0 => HandRank::HighCard,
            1 => HandRank::OnePair,
            2 => HandRank::TwoPair,
            3 => HandRank::ThreeOfAKind,
            4 => HandRank::Straight,
            5 => HandRank::Flush,
            6 => HandRank::FullHouse,
            7 => HandRank::FourOfAKind,
            _ => HandRank::StraightFlush,
        }
    }

    /// The category label.
    pub fn label(&self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
        }
    }

    /// The display label for a score, the ace high straight flush gets its
    /// own name.
    pub fn label_for_score(score: u32) -> &'static str {
        let rank = Self::from_score(score);
        if rank == HandRank::StraightFlush && (score >> 16) & 0xF == ACE {
            "Royal Flush"
        } else {
            rank.label()
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The value of a hand with the best 5 cards that make it.
#[derive(Debug, Clone, Copy)]
pub struct HandValue {
    score: u32,
    hand: [Card; 5],
}

impl HandValue {
    /// Evaluates the best 5 cards hand in `cards`.
    ///
    /// Panics if the number of cards is not 5 <= n <= 7.
    pub fn eval(cards: &[Card]) -> Self {
        let n = cards.len();
        assert!((5..=7).contains(&n), "5 <= cards <= 7");

        let hand = [cards[0], cards[1], cards[2], cards[3], cards[4]];
        let mut best = HandValue {
            score: eval5(&hand),
            hand,
        };

        for a in 0..n - 4 {
            for b in a + 1..n - 3 {
                for c in b + 1..n - 2 {
                    for d in c + 1..n - 1 {
                        for e in d + 1..n {
                            let hand = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                            let value = HandValue {
                                score: eval5(&hand),
                                hand,
                            };

                            if value.score > best.score {
                                best = value;
                            }
                        }
                    }
                }
            }
        }

        best
    }

    /// The hand score, a higher score is a stronger hand.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The hand category.
    pub fn rank(&self) -> HandRank {
        HandRank::from_score(self.score)
    }

    /// The hand label.
    pub fn label(&self) -> &'static str {
        HandRank::label_for_score(self.score)
    }

    /// The 5 cards that make this hand.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }
}

impl PartialEq for HandValue {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl Eq for HandValue {}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

/// Scores a 5 cards hand.
fn eval5(cards: &[Card; 5]) -> u32 {
    let is_flush = cards.iter().fold(0xF000, |acc, c| acc & c.id()) != 0;
    let ranks_mask = cards.iter().fold(0, |acc, c| acc | c.rank_flag());

    // Ranks groups sorted by count and then by rank.
    let mut counts = [0u8; 13];
    for c in cards {
        counts[c.rank_bits() as usize] += 1;
    }

    let mut groups = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(rank, count)| (*count, rank as u32))
        .collect::<Vec<_>>();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let ranks = groups.iter().map(|(_, rank)| *rank).collect::<Vec<_>>();

    let (category, ranks) = match (straight_high(ranks_mask), is_flush) {
        (Some(high), true) => (HandRank::StraightFlush, vec![high]),
        _ if groups[0].0 == 4 => (HandRank::FourOfAKind, ranks),
        _ if groups[0].0 == 3 && groups[1].0 == 2 => (HandRank::FullHouse, ranks),
        (_, true) => (HandRank::Flush, ranks),
        (Some(high), false) => (HandRank::Straight, vec![high]),
        _ if groups[0].0 == 3 => (HandRank::ThreeOfAKind, ranks),
        _ if groups[0].0 == 2 && groups[1].0 == 2 => (HandRank::TwoPair, ranks),
        _ if groups[0].0 == 2 => (HandRank::OnePair, ranks),
        _ => (HandRank::HighCard, ranks),
    };

    ranks
        .iter()
        .enumerate()
        .fold((category as u32) << 20, |score, (idx, rank)| {
            score | (rank << (16 - 4 * idx))
        })
}

/// Returns the rank of the highest card if the ranks make a straight.
fn straight_high(ranks_mask: u32) -> Option<u32> {
    if ranks_mask.count_ones() != 5 {
        return None;
    }

    if ranks_mask == WHEEL {
        return Some(FIVE);
    }

    let low = ranks_mask.trailing_zeros();
    (ranks_mask >> low == 0b11111).then_some(low + 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
    use riverboat_cards::Deck;

    fn cards(codes: &str) -> Vec<Card> {
        codes
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect()
    }

    fn value(codes: &str) -> HandValue {
        HandValue::eval(&cards(codes))
    }

    #[test]
    fn hand_categories() {
        assert_eq!(value("Ah Kh Qh Jh Th").rank(), HandRank::StraightFlush);
        assert_eq!(value("Ah Kh Qh Jh Th").label(), "Royal Flush");
        assert_eq!(value("5d 4d 3d 2d Ad").label(), "Straight Flush");
        assert_eq!(value("9c 9d 9h 9s 2c").rank(), HandRank::FourOfAKind);
        assert_eq!(value("9c 9d 9h 2s 2c").rank(), HandRank::FullHouse);
        assert_eq!(value("Kc 9c 7c 4c 2c").rank(), HandRank::Flush);
        assert_eq!(value("5c 4d 3h 2s Ac").rank(), HandRank::Straight);
        assert_eq!(value("Tc Jd Qh Ks Ac").rank(), HandRank::Straight);
        assert_eq!(value("9c 9d 9h Ks 2c").rank(), HandRank::ThreeOfAKind);
        assert_eq!(value("9c 9d 2h Ks 2c").rank(), HandRank::TwoPair);
        assert_eq!(value("9c 9d 3h Ks 2c").rank(), HandRank::OnePair);
        assert_eq!(value("9c 8d 3h Ks 2c").rank(), HandRank::HighCard);
        assert_eq!(value("9c 8d 3h Ks 2c").label(), "High Card");
        assert_eq!(value("9c 9d 3h Ks 2c").label(), "Pair");
    }

    #[test]
    fn hand_ordering() {
        // The wheel is the lowest straight.
        assert!(value("6c 5d 4h 3s 2c") > value("5c 4d 3h 2s Ac"));

        // Kickers break ties.
        assert!(value("Ac Ad Kh Qs 3c") > value("Ac Ad Kh Js Tc"));
        assert!(value("Kc Kd 2h 2s Ac") > value("Qc Qd Jh Js Ac"));
        assert!(value("3c 3d 3h 2s 2c") > value("2c 2d 2h As Ac"));
        assert!(value("Ac Qc 9c 7c 5c") > value("Ac Qc 9c 7c 4c"));

        // Suits never matter.
        assert_eq!(value("Ac Kd Qh 9s 8c"), value("As Kh Qd 9c 8d"));
    }

    #[test]
    fn best_of_seven() {
        // Board plays: both players split.
        let v1 = value("2c 3d Ah Kh Qh Jh Th");
        let v2 = value("4c 5d Ah Kh Qh Jh Th");
        assert_eq!(v1, v2);

        let v = value("9s 9h 9d Kc Kd 2s 3s");
        assert_eq!(v.rank(), HandRank::FullHouse);
        assert_eq!(v.hand(), cards("9s 9h 9d Kc Kd").as_slice());

        // Six cards evaluation.
        assert_eq!(value("9s 8s 7s 6s 5s 4s").label(), "Straight Flush");
    }

    #[test]
    fn score_is_total_order_on_strength() {
        // The best hand is never worse than any 5 cards subset.
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let mut deck = Deck::default().deal(52).unwrap();
            deck.shuffle(&mut rng);
            let best = HandValue::eval(&deck[..7]);
            assert!(best >= HandValue::eval(&deck[..5]));
            assert!(best >= HandValue::eval(&deck[2..7]));
            assert_eq!(best, HandValue::eval(best.hand()));
        }
    }

    #[test]
    fn all_five_cards_hands() {
        let deck = Deck::default().deal(52).unwrap();
        let mut counts = [0usize; 9];
        let n = deck.len();

        for a in 0..n {
            for b in a + 1..n {
                for c in b + 1..n {
                    for d in c + 1..n {
                        for e in d + 1..n {
                            let hand = [deck[a], deck[b], deck[c], deck[d], deck[e]];
                            counts[HandRank::from_score(eval5(&hand)) as usize] += 1;
                        }
                    }
                }
            }
        }

        assert_eq!(counts[HandRank::HighCard as usize], 1_302_540);
        assert_eq!(counts[HandRank::OnePair as usize], 1_098_240);
        assert_eq!(counts[HandRank::TwoPair as usize], 123_552);
        assert_eq!(counts[HandRank::ThreeOfAKind as usize], 54_912);
        assert_eq!(counts[HandRank::Straight as usize], 10_200);
        assert_eq!(counts[HandRank::Flush as usize], 5_108);
        assert_eq!(counts[HandRank::FullHouse as usize], 3_744);
        assert_eq!(counts[HandRank::FourOfAKind as usize], 624);
        assert_eq!(counts[HandRank::StraightFlush as usize], 40);
    }
}
