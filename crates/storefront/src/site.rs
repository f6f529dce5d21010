//! The two sites served by this binary and their static catalogs.
//!
//! Product data lives in code, the way the marketing pages carried it in
//! markup: each card has an id, name, price string and category.

use std::fmt;
use std::str::FromStr;

use suresh_core::{CategoryId, Price, ProductId};

/// Which site this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Site {
    /// Suresh Bikes, the bike shop.
    #[default]
    Bikes,
    /// The athlete's personal site with a small gear shop.
    Athlete,
}

/// Unknown site name.
#[derive(Debug, thiserror::Error)]
#[error("unknown site {0:?} (expected \"bikes\" or \"athlete\")")]
pub struct UnknownSite(String);

impl FromStr for Site {
    type Err = UnknownSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bikes" | "bike" | "shop" => Ok(Self::Bikes),
            "athlete" => Ok(Self::Athlete),
            other => Err(UnknownSite(other.to_owned())),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bikes => "bikes",
            Self::Athlete => "athlete",
        })
    }
}

/// A product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: &'static str,
    /// Raw price as it appears on the card's add-to-cart button.
    pub price: &'static str,
    pub category: CategoryId,
    pub blurb: &'static str,
}

impl Product {
    fn new(
        id: &str,
        name: &'static str,
        price: &'static str,
        category: &str,
        blurb: &'static str,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name,
            price,
            category: CategoryId::new(category),
            blurb,
        }
    }

    /// Price formatted for display; falls back to the raw text.
    #[must_use]
    pub fn price_display(&self) -> String {
        Price::parse(self.price).map_or_else(|_| self.price.to_owned(), |p| p.display())
    }

    /// Whether this product is shown under `filter`.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        filter == ALL_CATEGORIES || self.category.as_str() == filter
    }
}

/// Filter value that shows every product.
pub const ALL_CATEGORIES: &str = "all";

impl Site {
    /// Durable storage key for this site's cart.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Bikes => "sureshCart",
            Self::Athlete => "sureshAthleteCart",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bikes => "Suresh Bikes",
            Self::Athlete => "Suresh Kumar",
        }
    }

    #[must_use]
    pub const fn tagline(self) -> &'static str {
        match self {
            Self::Bikes => "Road, mountain and city bikes, tuned by riders.",
            Self::Athlete => "Endurance cyclist. Coach. Always chasing the next climb.",
        }
    }

    #[must_use]
    pub const fn about(self) -> &'static str {
        match self {
            Self::Bikes => {
                "A neighbourhood workshop run by riders. Every bike leaves the stand \
                 fitted, tuned and ready for the road it was bought for."
            }
            Self::Athlete => {
                "Twelve years of stage races, gravel epics and coaching riders of every \
                 level. The shop funds the next season."
            }
        }
    }

    /// Filter buttons as `(value, label)`, starting with "all".
    #[must_use]
    pub const fn categories(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Bikes => &[
                (ALL_CATEGORIES, "All"),
                ("road", "Road"),
                ("mountain", "Mountain"),
                ("city", "City"),
                ("accessories", "Accessories"),
            ],
            Self::Athlete => &[
                (ALL_CATEGORIES, "All"),
                ("training", "Training"),
                ("merch", "Merch"),
            ],
        }
    }

    /// Every product card for this site, in page order.
    #[must_use]
    pub fn catalog(self) -> Vec<Product> {
        match self {
            Self::Bikes => vec![
                Product::new("b1", "Road Bike", "1200", "road", "Carbon frame, 105 groupset."),
                Product::new("b3", "Aero Road Bike", "2450", "road", "Deep wheels, race geometry."),
                Product::new("m1", "Trail Hardtail", "980", "mountain", "29er with 120mm fork."),
                Product::new("m2", "Full Suspension", "3100", "mountain", "Built for rough descents."),
                Product::new("c1", "City Commuter", "640", "city", "Fenders, rack and hub gears."),
                Product::new("b2", "Helmet", "85", "accessories", "MIPS certified, vented."),
                Product::new("a2", "Bike Lights", "45.50", "accessories", "USB rechargeable pair."),
            ],
            Self::Athlete => vec![
                Product::new("t1", "12-Week Base Plan", "49", "training", "Structured endurance block."),
                Product::new("t2", "1:1 Coaching Month", "250", "training", "Weekly calls and plan tweaks."),
                Product::new("g1", "Signed Race Jersey", "120", "merch", "Worn on the podium, signed."),
                Product::new("g2", "Team Bottle", "12.99", "merch", "750ml, BPA free."),
            ],
        }
    }

    /// Products shown under `filter` (`None` or `"all"` shows everything).
    #[must_use]
    pub fn filter(self, filter: Option<&str>) -> Vec<Product> {
        let filter = filter.map_or(ALL_CATEGORIES, str::trim);
        self.catalog()
            .into_iter()
            .filter(|product| product.matches(filter))
            .collect()
    }
}
