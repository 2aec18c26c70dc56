//! Submission, review and listing: the status transitions that carry a
//! record from `Pending` to `Listed`.

use rust_decimal::Decimal;
use tracing::info;

use super::AuctionEngine;
use crate::error::{AuctionError, AuctionResult};
use crate::model::{AuctionItem, ItemDraft, ItemStatus, ReviewDecision};
use crate::traits::{
    AssetStore, ItemPatch, NewItem, RecordStore, TimeProvider, UpdateGuard,
};

impl<S: RecordStore, T: TimeProvider> AuctionEngine<S, T> {
    /// Submit a new item for review.
    ///
    /// The record is created with status `Pending` and the default
    /// bidding window `[now + 1 day, now + 7 days)` unless the draft
    /// carries an explicit window. The store assigns the identity
    /// atomically with the insert.
    pub async fn submit(&self, draft: ItemDraft) -> AuctionResult<AuctionItem> {
        let now = self.now();
        let (auction_start, auction_end) = draft.resolve_window(now);
        if auction_start >= auction_end {
            return Err(AuctionError::Validation(format!(
                "auction window is empty: start {auction_start} >= end {auction_end}"
            )));
        }

        let item = self
            .store()
            .insert_item(NewItem {
                title: draft.title,
                description: draft.description,
                category: draft.category,
                image_ref: draft.image_ref,
                attachment_refs: draft.attachment_refs,
                owner_address: draft.owner_address,
                owner_id: draft.owner_id,
                start_price: draft.start_price,
                status: ItemStatus::Pending,
                created_at: now,
                updated_at: now,
                auction_start,
                auction_end,
            })
            .await
            .map_err(AuctionError::store)?;

        info!(id = item.id, title = %item.title, "Submitted item for review");
        Ok(item)
    }

    /// Store the primary image and attachments, then submit.
    ///
    /// `image` and each attachment are `(bytes, original_name)` pairs.
    /// The returned references land in the draft verbatim; the engine
    /// never interprets them.
    pub async fn submit_with_assets<A: AssetStore>(
        &self,
        assets: &A,
        mut draft: ItemDraft,
        image: (&[u8], &str),
        attachments: &[(&[u8], &str)],
    ) -> AuctionResult<AuctionItem> {
        draft.image_ref = assets
            .store(image.0, image.1)
            .await
            .map_err(AuctionError::store)?;

        let mut refs = Vec::with_capacity(attachments.len());
        for (bytes, name) in attachments {
            if bytes.is_empty() {
                continue;
            }
            refs.push(assets.store(bytes, name).await.map_err(AuctionError::store)?);
        }
        draft.attachment_refs = refs;

        self.submit(draft).await
    }

    /// Review a submission, overwriting status and reason.
    ///
    /// Re-reviewing a non-`Pending` record is allowed as an
    /// administrative override; the caller is trusted to mean it.
    pub async fn review(
        &self,
        id: u64,
        decision: ReviewDecision,
        reason: Option<String>,
    ) -> AuctionResult<AuctionItem> {
        // Existence check so a bad id fails NotFound, not a silent no-op.
        let _ = self.require_item(id).await?;

        let applied = self
            .store()
            .update_item(
                id,
                ItemPatch {
                    status: Some(decision.status()),
                    reason: Some(reason),
                    updated_at: self.now(),
                    ..ItemPatch::default()
                },
                None,
            )
            .await
            .map_err(AuctionError::store)?;
        if !applied {
            return Err(AuctionError::NotFound(id));
        }

        let item = self.reload_item(id).await?;
        info!(id, status = %item.status, "Reviewed item");
        Ok(item)
    }

    /// List an approved item on the marketplace at an ask price.
    ///
    /// Conditional on the record still being `Approved` at commit time;
    /// of two concurrent listers exactly one succeeds, the other gets
    /// `Conflict`.
    pub async fn list(&self, id: u64, ask_price: Decimal) -> AuctionResult<AuctionItem> {
        let item = self.require_item(id).await?;
        if item.status != ItemStatus::Approved {
            return Err(AuctionError::InvalidState(format!(
                "item {id} is {}, only APPROVED items can be listed",
                item.status
            )));
        }

        let applied = self
            .store()
            .update_item(
                id,
                ItemPatch {
                    status: Some(ItemStatus::Listed),
                    current_price: Some(ask_price),
                    updated_at: self.now(),
                    ..ItemPatch::default()
                },
                Some(UpdateGuard::status_is(ItemStatus::Approved)),
            )
            .await
            .map_err(AuctionError::store)?;
        if !applied {
            return Err(AuctionError::Conflict(format!(
                "item {id} left APPROVED before the listing committed"
            )));
        }

        let item = self.reload_item(id).await?;
        info!(id, price = %ask_price, "Listed item on the marketplace");
        Ok(item)
    }
}
