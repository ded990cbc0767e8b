//! Coin denominations and the geometry table that identifies them.

use std::ops::Bound::{self, Excluded, Included, Unbounded};
use std::ops::RangeBounds;

use serde::{Deserialize, Serialize};

/// Coin value in cents of the currency unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denomination {
    OneCent,
    TwoCents,
    FiveCents,
    TenCents,
    TwentyCents,
    FiftyCents,
    OneUnit,
    TwoUnits,
}

impl Denomination {
    pub const ALL: [Denomination; 8] = [
        Denomination::OneCent,
        Denomination::TwoCents,
        Denomination::FiveCents,
        Denomination::TenCents,
        Denomination::TwentyCents,
        Denomination::FiftyCents,
        Denomination::OneUnit,
        Denomination::TwoUnits,
    ];

    pub const fn cents(self) -> u32 {
        match self {
            Denomination::OneCent => 1,
            Denomination::TwoCents => 2,
            Denomination::FiveCents => 5,
            Denomination::TenCents => 10,
            Denomination::TwentyCents => 20,
            Denomination::FiftyCents => 50,
            Denomination::OneUnit => 100,
            Denomination::TwoUnits => 200,
        }
    }

    pub fn from_cents(cents: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.cents() == cents)
    }

    /// First rule of [`DENOMINATION_TABLE`] matching the blob geometry.
    pub fn classify(area: usize, perimeter: usize) -> Option<Self> {
        DENOMINATION_TABLE
            .iter()
            .find(|rule| rule.matches(area, perimeter))
            .map(|rule| rule.denomination)
    }
}

/// One `(area, perimeter) -> denomination` window.
#[derive(Clone, Copy, Debug)]
pub struct CoinRule {
    pub area: (Bound<usize>, Bound<usize>),
    pub perimeter: (Bound<usize>, Bound<usize>),
    pub denomination: Denomination,
}

impl CoinRule {
    pub fn matches(&self, area: usize, perimeter: usize) -> bool {
        self.area.contains(&area) && self.perimeter.contains(&perimeter)
    }
}

const ANY: (Bound<usize>, Bound<usize>) = (Unbounded, Unbounded);

/// Ordered identification table; the first match wins.
///
/// The windows were tuned against the bounding-box-width perimeter estimate
/// of `coin_counter_blobs::estimate_perimeter`.
pub const DENOMINATION_TABLE: [CoinRule; 8] = [
    CoinRule {
        area: (Included(24500), Included(25500)),
        perimeter: (Excluded(550), Excluded(600)),
        denomination: Denomination::FiftyCents,
    },
    CoinRule {
        area: (Included(20000), Included(21500)),
        perimeter: (Excluded(500), Excluded(550)),
        denomination: Denomination::TwentyCents,
    },
    CoinRule {
        area: (Included(27000), Included(28000)),
        perimeter: (Excluded(600), Excluded(650)),
        denomination: Denomination::TwoUnits,
    },
    CoinRule {
        area: (Included(16000), Included(17000)),
        perimeter: (Excluded(450), Included(500)),
        denomination: Denomination::TenCents,
    },
    CoinRule {
        area: (Included(17500), Included(19000)),
        perimeter: ANY,
        denomination: Denomination::FiveCents,
    },
    CoinRule {
        area: (Included(21000), Unbounded),
        perimeter: (Excluded(500), Unbounded),
        denomination: Denomination::OneUnit,
    },
    CoinRule {
        area: (Included(14000), Excluded(15500)),
        perimeter: ANY,
        denomination: Denomination::TwoCents,
    },
    CoinRule {
        area: (Unbounded, Excluded(12000)),
        perimeter: ANY,
        denomination: Denomination::OneCent,
    },
];

/// Coin value in cents for a blob geometry, 0 when no rule matches.
pub fn identify_coin(area: usize, perimeter: usize) -> u32 {
    Denomination::classify(area, perimeter).map_or(0, Denomination::cents)
}
