use serde::{Deserialize, Serialize};

/// Card suits, serialized as the single-letter codes the server speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "C")]
    Clubs,
    #[serde(rename = "D")]
    Diamonds,
    #[serde(rename = "H")]
    Hearts,
    #[serde(rename = "S")]
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn name(&self) -> &'static str {
        match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Suit::Clubs => "\u{2663}",
            Suit::Diamonds => "\u{2666}",
            Suit::Hearts => "\u{2665}",
            Suit::Spades => "\u{2660}",
        }
    }
}

/// A playing card as reported by the server. Rank runs 1 (ace) through
/// 13 (king); the client never constructs cards outside a test context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
}

impl Card {
    pub fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    pub fn rank_name(&self) -> String {
        match self.rank {
            1 => "Ace".to_string(),
            11 => "Jack".to_string(),
            12 => "Queen".to_string(),
            13 => "King".to_string(),
            rank => rank.to_string(),
        }
    }

    /// Long-form name, e.g. "Queen of Hearts".
    pub fn display_name(&self) -> String {
        format!("{} of {}", self.rank_name(), self.suit.name())
    }

    /// Compact label, e.g. "Q♥".
    pub fn label(&self) -> String {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            rank => rank.to_string(),
        };
        format!("{}{}", rank, self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(Card::new(Suit::Spades, 1).display_name(), "Ace of Spades");
        assert_eq!(Card::new(Suit::Hearts, 12).display_name(), "Queen of Hearts");
        assert_eq!(Card::new(Suit::Clubs, 11).display_name(), "Jack of Clubs");
        assert_eq!(Card::new(Suit::Diamonds, 13).display_name(), "King of Diamonds");
        assert_eq!(Card::new(Suit::Diamonds, 10).display_name(), "10 of Diamonds");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Card::new(Suit::Spades, 1).label(), "A\u{2660}");
        assert_eq!(Card::new(Suit::Hearts, 10).label(), "10\u{2665}");
        assert_eq!(Card::new(Suit::Clubs, 13).label(), "K\u{2663}");
    }

    #[test]
    fn test_suit_wire_codes() {
        for (suit, code) in [
            (Suit::Clubs, "\"C\""),
            (Suit::Diamonds, "\"D\""),
            (Suit::Hearts, "\"H\""),
            (Suit::Spades, "\"S\""),
        ] {
            assert_eq!(serde_json::to_string(&suit).unwrap(), code);
            assert_eq!(serde_json::from_str::<Suit>(code).unwrap(), suit);
        }
    }

    #[test]
    fn test_card_decode() {
        let card: Card = serde_json::from_str(r#"{"suit":"H","rank":5}"#).unwrap();
        assert_eq!(card, Card::new(Suit::Hearts, 5));
    }
}
