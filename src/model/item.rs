use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_AUCTION_DURATION_SECS, DEFAULT_START_DELAY_SECS, MAX_WIRE_VALUE_SIZE};
use crate::error::AuctionResult;
use crate::util::{cbor_from_limited_reader, to_cbor};

/// Status of an auction record.
///
/// `Pending` is the initial status at submission. `Rejected`, `Sold` and
/// `Delisted` are terminal: bids and settlement on them always fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// Submitted, waiting for review
    Pending,
    /// Review passed, may be listed
    Approved,
    /// Review failed; `reason` carries the explanation
    Rejected,
    /// Open on the marketplace and accepting bids
    Listed,
    /// Settled with an ownership transfer
    Sold,
    /// Closed without an ownership transfer
    Delisted,
}

impl ItemStatus {
    /// Whether the record accepts no further lifecycle transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Sold | Self::Delisted)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Listed => "LISTED",
            Self::Sold => "SOLD",
            Self::Delisted => "DELISTED",
        };
        f.write_str(s)
    }
}

/// Outcome of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub const fn status(self) -> ItemStatus {
        match self {
            Self::Approved => ItemStatus::Approved,
            Self::Rejected => ItemStatus::Rejected,
        }
    }
}

/// One auction record: a listed good with its lifecycle status.
///
/// Records are never physically deleted; `Sold` and `Delisted` are
/// terminal logical states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionItem {
    /// Store-assigned identity, immutable.
    pub id: u64,

    /// Title of the item (publicly visible)
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Category label used for browsing
    pub category: String,

    /// Opaque reference to the primary image asset
    pub image_ref: String,

    /// Opaque references to attachment assets, ordered, possibly empty
    #[serde(default)]
    pub attachment_refs: Vec<String>,

    /// Current owner's address (string identity)
    pub owner_address: String,

    /// Current owner's internal user id, when known
    pub owner_id: Option<u64>,

    /// Ask price set at creation, immutable
    pub start_price: Decimal,

    /// Highest accepted price so far; `None` until listing.
    /// Once set, monotonically non-decreasing for the record's lifetime.
    pub current_price: Option<Decimal>,

    /// Lifecycle status
    pub status: ItemStatus,

    /// Rejection or closure note
    pub reason: Option<String>,

    /// Unix timestamp of submission
    pub created_at: u64,

    /// Unix timestamp of the last mutation
    pub updated_at: u64,

    /// Start of the bidding window (inclusive)
    pub auction_start: u64,

    /// End of the bidding window (exclusive)
    pub auction_end: u64,
}

impl AuctionItem {
    /// Whether `now` falls inside the bidding window `[start, end)`.
    pub const fn window_contains(&self, now: u64) -> bool {
        now >= self.auction_start && now < self.auction_end
    }

    /// Whether the bidding window is over at `now`.
    pub const fn has_ended(&self, now: u64) -> bool {
        now >= self.auction_end
    }

    /// The price a new bid must exceed: the current price when set,
    /// otherwise the start price.
    pub fn bid_floor(&self) -> Decimal {
        self.current_price.unwrap_or(self.start_price)
    }

    /// Serialize the record to CBOR bytes for wire transport.
    pub fn to_cbor(&self) -> AuctionResult<Vec<u8>> {
        to_cbor(self)
    }

    /// Deserialize a record from CBOR bytes.
    pub fn from_cbor(data: &[u8]) -> AuctionResult<Self> {
        cbor_from_limited_reader(data, MAX_WIRE_VALUE_SIZE)
    }
}

/// A validated submission payload, ready for the engine.
///
/// Build one through [`ItemDraft::builder`]; the builder rejects drafts
/// with missing mandatory fields.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_ref: String,
    pub attachment_refs: Vec<String>,
    pub owner_address: String,
    pub owner_id: Option<u64>,
    pub start_price: Decimal,
    /// Explicit bidding window; defaults applied at submission when unset.
    pub window: Option<(u64, u64)>,
}

impl ItemDraft {
    /// Create a new draft builder.
    pub const fn builder() -> DraftBuilder {
        DraftBuilder::new()
    }

    /// Resolve the bidding window against `now`, applying the default
    /// `[now + 1 day, now + 7 days)` when the submitter gave none.
    pub fn resolve_window(&self, now: u64) -> (u64, u64) {
        self.window.unwrap_or((
            now + DEFAULT_START_DELAY_SECS,
            now + DEFAULT_AUCTION_DURATION_SECS,
        ))
    }
}

/// Builder for submission drafts.
#[derive(Debug, Default)]
pub struct DraftBuilder {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    image_ref: Option<String>,
    attachment_refs: Vec<String>,
    owner_address: Option<String>,
    owner_id: Option<u64>,
    start_price: Option<Decimal>,
    window: Option<(u64, u64)>,
}

impl DraftBuilder {
    pub const fn new() -> Self {
        Self {
            title: None,
            description: None,
            category: None,
            image_ref: None,
            attachment_refs: Vec::new(),
            owner_address: None,
            owner_id: None,
            start_price: None,
            window: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    #[must_use]
    pub fn attachment_refs(mut self, refs: Vec<String>) -> Self {
        self.attachment_refs = refs;
        self
    }

    #[must_use]
    pub fn owner_address(mut self, address: impl Into<String>) -> Self {
        self.owner_address = Some(address.into());
        self
    }

    #[must_use]
    pub const fn owner_id(mut self, id: u64) -> Self {
        self.owner_id = Some(id);
        self
    }

    #[must_use]
    pub const fn start_price(mut self, price: Decimal) -> Self {
        self.start_price = Some(price);
        self
    }

    /// Set an explicit bidding window `[start, end)`.
    #[must_use]
    pub const fn window(mut self, start: u64, end: u64) -> Self {
        self.window = Some((start, end));
        self
    }

    /// Build the draft (returns an error if required fields are missing).
    pub fn build(self) -> Result<ItemDraft, String> {
        Ok(ItemDraft {
            title: self.title.ok_or("title is required")?,
            description: self.description.ok_or("description is required")?,
            category: self.category.ok_or("category is required")?,
            image_ref: self.image_ref.ok_or("image_ref is required")?,
            attachment_refs: self.attachment_refs,
            owner_address: self.owner_address.ok_or("owner_address is required")?,
            owner_id: self.owner_id,
            start_price: self.start_price.ok_or("start_price is required")?,
            window: self.window,
        })
    }
}
