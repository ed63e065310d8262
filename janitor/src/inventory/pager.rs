use futures::stream::{self, Stream, StreamExt};

use super::{ListedSnapshot, OwnerScope, SnapshotInventory};
use crate::errors::InventoryError;

enum Cursor {
    First,
    Next(String),
    /// The page fetched with this token pointed back at itself
    Repeated(String),
    Exhausted,
}

/// Lazily drain every page of snapshots owned by `owner`.
///
/// The next page is requested only once the previous one has been consumed. A
/// page error is yielded once and ends the stream, since there is no cursor to
/// resume from. A page whose `next_token` equals the token it was fetched with
/// is yielded, followed by an [`InventoryError::RepeatedToken`] that ends the
/// stream. Each call starts again from the first page.
pub fn owned_snapshots<'a>(
    inventory: &'a dyn SnapshotInventory,
    owner: &'a OwnerScope,
) -> impl Stream<Item = Result<ListedSnapshot, InventoryError>> + 'a {
    stream::unfold(Cursor::First, move |cursor| async move {
        let token = match cursor {
            Cursor::First => None,
            Cursor::Next(token) => Some(token),
            Cursor::Repeated(token) => {
                let err = InventoryError::RepeatedToken {
                    operation: "list snapshots".to_string(),
                    token,
                };
                return Some((Err(err), Cursor::Exhausted));
            }
            Cursor::Exhausted => return None,
        };

        match inventory.list_snapshots_page(owner, token.as_deref()).await {
            Ok(page) => {
                let next = match page.next_token {
                    Some(next) if next.is_empty() => Cursor::Exhausted,
                    Some(next) if token.as_deref() == Some(next.as_str()) => Cursor::Repeated(next),
                    Some(next) => Cursor::Next(next),
                    None => Cursor::Exhausted,
                };
                Some((Ok(page.entries), next))
            }
            Err(e) => Some((Err(e), Cursor::Exhausted)),
        }
    })
    .flat_map(|page| {
        let items: Vec<Result<ListedSnapshot, InventoryError>> = match page {
            Ok(entries) => entries.into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        stream::iter(items)
    })
}
