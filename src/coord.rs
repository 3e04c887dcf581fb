use std::{fmt, ops};

use itertools::Itertools;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::force::Force;


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;


// Row form a force's point of view: row 0 is the row where the force's pieces start.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SubjectiveRow {
    idx: u8, // 0-based
}

impl SubjectiveRow {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub const fn from_one_based(idx: u8) -> Self { Self::from_zero_based(idx - 1) }
    pub fn to_row(self, force: Force) -> Row {
        match force {
            Force::White => Row::from_zero_based(self.idx),
            Force::Black => Row::from_zero_based(NUM_ROWS - self.idx - 1),
        }
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('1' as u32)?;
        (idx < NUM_ROWS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}

impl ops::Sub for Row {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_COLS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('a' as u32)?;
        (idx < NUM_COLS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
}

impl ops::Sub for Col {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


// A board square. Serialized as its algebraic name ("e4"), which is what the server uses.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.chars().collect_tuple()?;
        Some(Coord {
            row: Row::from_algebraic(row)?,
            col: Col::from_algebraic(col)?,
        })
    }
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }
    pub fn is_light(self) -> bool { (self.row.to_zero_based() + self.col.to_zero_based()) % 2 == 1 }
    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
    // Board order as seen by White: rank 8 first, files a to h within a rank.
    pub fn all_display_order() -> impl Iterator<Item = Coord> {
        Row::all().rev().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
}

// Returns (row delta, col delta).
impl ops::Sub for Coord {
    type Output = (i8, i8);
    fn sub(self, other: Self) -> Self::Output { (self.row - other.row, self.col - other.col) }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}{})", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_algebraic())
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Coord::from_algebraic(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid square: \"{s}\"")))
    }
}


impl Row {
    #![allow(dead_code)]
    pub const _1: Row = Row::from_zero_based(0);
    pub const _2: Row = Row::from_zero_based(1);
    pub const _3: Row = Row::from_zero_based(2);
    pub const _4: Row = Row::from_zero_based(3);
    pub const _5: Row = Row::from_zero_based(4);
    pub const _6: Row = Row::from_zero_based(5);
    pub const _7: Row = Row::from_zero_based(6);
    pub const _8: Row = Row::from_zero_based(7);
}

impl Col {
    #![allow(dead_code)]
    pub const A: Col = Col::from_zero_based(0);
    pub const B: Col = Col::from_zero_based(1);
    pub const C: Col = Col::from_zero_based(2);
    pub const D: Col = Col::from_zero_based(3);
    pub const E: Col = Col::from_zero_based(4);
    pub const F: Col = Col::from_zero_based(5);
    pub const G: Col = Col::from_zero_based(6);
    pub const H: Col = Col::from_zero_based(7);
}

macro_rules! coord_consts {
    ($($name:ident = $col:ident $row:ident),* $(,)?) => {
        impl Coord {
            #![allow(dead_code)]
            $(pub const $name: Coord = Coord::new(Row::$row, Col::$col);)*
        }
    };
}

coord_consts! {
    A1 = A _1, A2 = A _2, A3 = A _3, A4 = A _4, A5 = A _5, A6 = A _6, A7 = A _7, A8 = A _8,
    B1 = B _1, B2 = B _2, B3 = B _3, B4 = B _4, B5 = B _5, B6 = B _6, B7 = B _7, B8 = B _8,
    C1 = C _1, C2 = C _2, C3 = C _3, C4 = C _4, C5 = C _5, C6 = C _6, C7 = C _7, C8 = C _8,
    D1 = D _1, D2 = D _2, D3 = D _3, D4 = D _4, D5 = D _5, D6 = D _6, D7 = D _7, D8 = D _8,
    E1 = E _1, E2 = E _2, E3 = E _3, E4 = E _4, E5 = E _5, E6 = E _6, E7 = E _7, E8 = E _8,
    F1 = F _1, F2 = F _2, F3 = F _3, F4 = F _4, F5 = F _5, F6 = F _6, F7 = F _7, F8 = F _8,
    G1 = G _1, G2 = G _2, G3 = G _3, G4 = G _4, G5 = G _5, G6 = G _6, G7 = G _7, G8 = G _8,
    H1 = H _1, H2 = H _2, H3 = H _3, H4 = H _4, H5 = H _5, H6 = H _6, H7 = H _7, H8 = H _8,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic() {
        assert_eq!(Coord::from_algebraic("e4"), Some(Coord::E4));
        assert_eq!(Coord::from_algebraic("h8"), Some(Coord::H8));
        assert_eq!(Coord::from_algebraic("i1"), None);
        assert_eq!(Coord::from_algebraic("a9"), None);
        assert_eq!(Coord::from_algebraic("a0"), None);
        assert_eq!(Coord::from_algebraic("e44"), None);
        assert_eq!(Coord::C7.to_algebraic(), "c7");
    }

    #[test]
    fn display_order() {
        let order = Coord::all_display_order().collect_vec();
        assert_eq!(order.len(), 64);
        assert_eq!(order[0], Coord::A8);
        assert_eq!(order[7], Coord::H8);
        assert_eq!(order[63], Coord::H1);
    }

    #[test]
    fn square_colors() {
        assert!(!Coord::A1.is_light());
        assert!(Coord::H1.is_light());
        assert!(!Coord::H8.is_light());
    }

    #[test]
    fn subjective_rows() {
        assert_eq!(SubjectiveRow::from_one_based(2).to_row(Force::White), Row::_2);
        assert_eq!(SubjectiveRow::from_one_based(2).to_row(Force::Black), Row::_7);
    }
}
