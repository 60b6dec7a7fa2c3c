//! Read-only registry of event packages and service providers
//!
//! The catalog is built once at process start and shared behind an `Arc`.
//! Two sub-registries feed distinct page sections; a merged lookup serves
//! id-based add-to-cart resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A fixed, named offering used as the template for cart items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier (e.g. "birthday", "waiters")
    pub key: String,

    /// Display name, copied onto cart items at add-time
    pub name: String,

    /// Currency-agnostic unit price
    pub price: f64,

    /// Billing unit ("per hour", "per event"); absent for flat packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    pub description: String,

    #[serde(default)]
    pub features: Vec<String>,
}

impl CatalogEntry {
    fn new(
        key: &str,
        name: &str,
        price: f64,
        unit: Option<&str>,
        description: &str,
        features: [&str; 5],
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            price,
            unit: unit.map(str::to_string),
            description: description.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Unit label shown next to the price, empty for flat packages
    pub fn unit_label(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }
}

/// The immutable catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    packages: IndexMap<String, CatalogEntry>,
    providers: IndexMap<String, CatalogEntry>,
    entries: IndexMap<String, CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from its two sub-registries
    ///
    /// Packages are merged first and providers second, so a provider entry
    /// replaces a package entry registered under the same key.
    pub fn new(packages: Vec<CatalogEntry>, providers: Vec<CatalogEntry>) -> Self {
        let packages: IndexMap<_, _> = packages.into_iter().map(|e| (e.key.clone(), e)).collect();
        let providers: IndexMap<_, _> =
            providers.into_iter().map(|e| (e.key.clone(), e)).collect();

        let mut entries = packages.clone();
        for (key, entry) in &providers {
            entries.insert(key.clone(), entry.clone());
        }

        Self {
            packages,
            providers,
            entries,
        }
    }

    /// The offerings of Phew !! Event Management
    pub fn standard() -> Self {
        Self::new(standard_packages(), standard_providers())
    }

    /// Every entry, packages first, keyed by identifier
    pub fn entries(&self) -> &IndexMap<String, CatalogEntry> {
        &self.entries
    }

    pub fn packages(&self) -> &IndexMap<String, CatalogEntry> {
        &self.packages
    }

    pub fn providers(&self) -> &IndexMap<String, CatalogEntry> {
        &self.providers
    }

    /// Resolve a key against the merged lookup
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_packages() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(
            "birthday",
            "Birthday Party Package",
            299.99,
            None,
            "Complete birthday celebration with decorations, cake, entertainment, and party favors.",
            [
                "Custom decorations",
                "Birthday cake",
                "Entertainment",
                "Party favors",
                "Photography",
            ],
        ),
        CatalogEntry::new(
            "baby_shower",
            "Baby Shower Package",
            399.99,
            None,
            "Elegant baby shower setup with themed decorations, games, and refreshments.",
            [
                "Themed decorations",
                "Games & activities",
                "Refreshments",
                "Gift table setup",
                "Photo booth",
            ],
        ),
        CatalogEntry::new(
            "wedding",
            "Wedding Ceremony Package",
            1999.99,
            None,
            "Comprehensive wedding package with venue decoration, catering, and coordination.",
            [
                "Venue decoration",
                "Catering service",
                "Wedding coordination",
                "Floral arrangements",
                "Music & lighting",
            ],
        ),
        CatalogEntry::new(
            "pre_wedding",
            "Pre-Wedding Celebration",
            899.99,
            None,
            "Pre-wedding events including engagement party, sangeet, and mehendi ceremonies.",
            [
                "Multiple event setup",
                "Traditional decorations",
                "Music & dance floor",
                "Catering",
                "Photography",
            ],
        ),
        CatalogEntry::new(
            "corporate",
            "Corporate Events Package",
            799.99,
            None,
            "Professional corporate event management for conferences, meetings, and team building.",
            [
                "Professional setup",
                "AV equipment",
                "Catering service",
                "Registration desk",
                "Event coordination",
            ],
        ),
        CatalogEntry::new(
            "house_party",
            "House Party Package",
            199.99,
            None,
            "Intimate house party setup with music, lighting, and refreshments.",
            [
                "Music system",
                "Party lighting",
                "Refreshments",
                "Games & entertainment",
                "Cleanup service",
            ],
        ),
        CatalogEntry::new(
            "anniversary",
            "Anniversary Celebration",
            599.99,
            None,
            "Romantic anniversary celebration with elegant decorations and dinner setup.",
            [
                "Romantic decorations",
                "Dinner setup",
                "Floral arrangements",
                "Candle lighting",
                "Photography",
            ],
        ),
    ]
}

fn standard_providers() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(
            "house_help",
            "House Help Services",
            25.00,
            Some("per hour"),
            "Professional house help for event preparation, service, and assistance.",
            [
                "Event setup assistance",
                "Guest service",
                "Kitchen help",
                "General event support",
                "Flexible hours",
            ],
        ),
        CatalogEntry::new(
            "waiters",
            "Professional Waiters",
            30.00,
            Some("per hour"),
            "Experienced waitstaff for seamless food and beverage service at your event.",
            [
                "Professional service",
                "Food & beverage serving",
                "Table management",
                "Guest assistance",
                "Uniform provided",
            ],
        ),
        CatalogEntry::new(
            "bartenders",
            "Expert Bartenders",
            45.00,
            Some("per hour"),
            "Skilled bartenders to craft cocktails and manage your event bar service.",
            [
                "Professional mixology",
                "Bar setup & management",
                "Custom cocktail menu",
                "Equipment provided",
                "TIPS certified",
            ],
        ),
        CatalogEntry::new(
            "decorators",
            "Event Decorators",
            150.00,
            Some("per event"),
            "Creative decorators to transform your venue with stunning visual designs.",
            [
                "Custom decoration design",
                "Theme development",
                "Setup & installation",
                "Quality materials",
                "Cleanup included",
            ],
        ),
        CatalogEntry::new(
            "musicians",
            "Live Musicians",
            200.00,
            Some("per event"),
            "Talented musicians to provide live entertainment for your special occasion.",
            [
                "Live music performance",
                "Various music genres",
                "Professional equipment",
                "Custom playlist",
                "Sound system included",
            ],
        ),
        CatalogEntry::new(
            "cleaners",
            "After Party Cleaners",
            120.00,
            Some("per event"),
            "Professional cleaning crew for post-event cleanup and venue restoration.",
            [
                "Complete venue cleanup",
                "Trash removal",
                "Equipment breakdown",
                "Venue restoration",
                "Next-day service available",
            ],
        ),
    ]
}
