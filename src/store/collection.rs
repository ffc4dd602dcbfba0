//! Collection names and ordered entity collections.
//!
//! Collection names are a closed set. Each name carries the identity scheme its external
//! format uses and the insert policy new entities follow.

use crate::error::StoreError;
use crate::store::entity::{Entity, EntityId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// How fresh identity keys are issued for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityScheme {
    /// Globally-unique opaque string keys.
    Opaque,
    /// Numeric ids from the legacy millisecond clock.
    LegacyNumeric,
}

/// Where a newly inserted entity lands in its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPolicy {
    /// New entity is shown first.
    Prepend,
    /// New entity is appended in insertion order.
    Append,
}

macro_rules! collections {
    ($($variant:ident => $name:literal, $scheme:ident, $policy:ident;)+) => {
        /// Every collection held by the state tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum CollectionName {
            $($variant,)+
        }

        impl CollectionName {
            /// All collections in declaration order.
            pub const ALL: &'static [CollectionName] = &[$(CollectionName::$variant,)+];

            /// Snapshot key of the collection.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(CollectionName::$variant => $name,)+
                }
            }

            pub fn identity_scheme(self) -> IdentityScheme {
                match self {
                    $(CollectionName::$variant => IdentityScheme::$scheme,)+
                }
            }

            /// Default insert position for new entities.
            pub fn insert_policy(self) -> InsertPolicy {
                match self {
                    $(CollectionName::$variant => InsertPolicy::$policy,)+
                }
            }
        }

        impl FromStr for CollectionName {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(CollectionName::$variant),)+
                    other => Err(StoreError::UnknownCollection(other.to_string())),
                }
            }
        }
    };
}

collections! {
    // storefront catalog
    FeaturedProducts => "featuredProducts", LegacyNumeric, Append;
    BestSellers => "bestSellers", LegacyNumeric, Append;
    NewArrivals => "newArrivals", LegacyNumeric, Append;
    Offers => "offers", LegacyNumeric, Append;
    Categories => "categories", LegacyNumeric, Append;
    Brands => "brands", Opaque, Append;
    Bundles => "bundles", Opaque, Prepend;
    GiftCards => "giftCards", Opaque, Prepend;
    Reviews => "reviews", Opaque, Prepend;
    Wishlists => "wishlists", Opaque, Append;
    // storefront content
    Banners => "banners", LegacyNumeric, Append;
    Popups => "popups", Opaque, Prepend;
    Testimonials => "testimonials", Opaque, Prepend;
    BlogPosts => "blogPosts", Opaque, Prepend;
    Pages => "pages", Opaque, Append;
    Menus => "menus", Opaque, Append;
    Faqs => "faqs", Opaque, Append;
    MediaLibrary => "mediaLibrary", Opaque, Prepend;
    GeneratedAssets => "generatedAssets", Opaque, Prepend;
    // sales
    Orders => "orders", Opaque, Prepend;
    Returns => "returns", Opaque, Prepend;
    Refunds => "refunds", Opaque, Prepend;
    Payments => "payments", Opaque, Prepend;
    PaymentMethods => "paymentMethods", Opaque, Append;
    AbandonedCarts => "abandonedCarts", Opaque, Prepend;
    Customers => "customers", Opaque, Prepend;
    CustomerSegments => "customerSegments", Opaque, Append;
    Users => "users", LegacyNumeric, Append;
    // pricing
    PriceRules => "priceRules", Opaque, Prepend;
    Coupons => "coupons", Opaque, Prepend;
    Promotions => "promotions", Opaque, Prepend;
    TaxRules => "taxRules", Opaque, Append;
    // fiscal
    Invoices => "invoices", Opaque, Prepend;
    FiscalDocuments => "fiscalDocuments", Opaque, Prepend;
    Expenses => "expenses", Opaque, Prepend;
    Budgets => "budgets", Opaque, Append;
    // logistics
    Warehouses => "warehouses", Opaque, Append;
    StockMovements => "stockMovements", Opaque, Prepend;
    Suppliers => "suppliers", Opaque, Append;
    PurchaseOrders => "purchaseOrders", Opaque, Prepend;
    ShippingZones => "shippingZones", Opaque, Append;
    Carriers => "carriers", Opaque, Append;
    Shipments => "shipments", Opaque, Prepend;
    PhysicalStores => "physicalStores", Opaque, Append;
    // marketing
    Campaigns => "campaigns", Opaque, Prepend;
    Newsletters => "newsletters", Opaque, Prepend;
    EmailTemplates => "emailTemplates", Opaque, Append;
    SocialPosts => "socialPosts", Opaque, Prepend;
    Affiliates => "affiliates", Opaque, Append;
    Influencers => "influencers", Opaque, Append;
    LoyaltyMembers => "loyaltyMembers", Opaque, Append;
    Rewards => "rewards", Opaque, Append;
    Referrals => "referrals", Opaque, Prepend;
    Surveys => "surveys", Opaque, Prepend;
    Events => "events", Opaque, Prepend;
    SalesGoals => "salesGoals", Opaque, Append;
    KpiTargets => "kpiTargets", Opaque, Append;
    // people
    Employees => "employees", Opaque, Append;
    Departments => "departments", Opaque, Append;
    JobOpenings => "jobOpenings", Opaque, Prepend;
    Candidates => "candidates", Opaque, Prepend;
    TimeOffRequests => "timeOffRequests", Opaque, Prepend;
    Payrolls => "payrolls", Opaque, Prepend;
    Trainings => "trainings", Opaque, Append;
    // sustainability
    SustainabilityReports => "sustainabilityReports", Opaque, Prepend;
    CarbonOffsets => "carbonOffsets", Opaque, Prepend;
    RecyclingPrograms => "recyclingPrograms", Opaque, Append;
    Certifications => "certifications", Opaque, Append;
    SocialProjects => "socialProjects", Opaque, Append;
    // support and operations
    SupportTickets => "supportTickets", Opaque, Prepend;
    ChatMessages => "chatMessages", Opaque, Append;
    Notifications => "notifications", Opaque, Prepend;
    AuditLogs => "auditLogs", Opaque, Prepend;
    Webhooks => "webhooks", Opaque, Append;
    Integrations => "integrations", Opaque, Append;
    ApiKeys => "apiKeys", Opaque, Prepend;
    Tasks => "tasks", Opaque, Prepend;
    Announcements => "announcements", Opaque, Prepend;
}

impl CollectionName {
    /// Product-section collections, in the order the storefront lists them.
    pub const PRODUCT_SECTIONS: &'static [CollectionName] = &[
        CollectionName::FeaturedProducts,
        CollectionName::BestSellers,
        CollectionName::NewArrivals,
        CollectionName::Offers,
    ];

    pub fn is_product_section(self) -> bool {
        Self::PRODUCT_SECTIONS.contains(&self)
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CollectionName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CollectionName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered entities of one kind.
///
/// Storage is shared: cloning a collection is cheap and keeps its identity, and every
/// modification yields a new collection with fresh identity.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    entities: Arc<Vec<Entity>>,
}

impl Collection {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities: Arc::new(entities),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.entities.iter().position(|e| &e.id == id)
    }

    /// True when both collections share the same storage.
    pub fn same_identity(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.entities, &other.entities)
    }

    /// Replace the entity with the same id in place, or insert it per `policy`.
    pub fn upserted(&self, entity: Entity, policy: InsertPolicy) -> Collection {
        let mut entities: Vec<Entity> = self.entities.as_ref().clone();
        match entities.iter().position(|e| e.id == entity.id) {
            Some(index) => entities[index] = entity,
            None => match policy {
                InsertPolicy::Prepend => entities.insert(0, entity),
                InsertPolicy::Append => entities.push(entity),
            },
        }
        Collection::new(entities)
    }

    /// Collection without the entity, or `None` when the id is absent.
    pub fn without(&self, id: &EntityId) -> Option<Collection> {
        let index = self.position(id)?;
        let mut entities: Vec<Entity> = self.entities.as_ref().clone();
        entities.remove(index);
        Some(Collection::new(entities))
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other) || self.entities == other.entities
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
