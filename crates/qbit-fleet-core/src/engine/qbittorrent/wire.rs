//! JSON shape of `/api/v2/torrents/info`.

use serde::Deserialize;

use crate::item::{EngineState, Item, ItemId};

/// The fields the controller reads; the engine sends many more.
#[derive(Debug, Deserialize)]
pub(super) struct TorrentInfo {
    pub hash: String,
    #[serde(default)]
    pub added_on: i64,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub state: String,
}

impl From<TorrentInfo> for Item {
    fn from(t: TorrentInfo) -> Self {
        Item {
            id: ItemId::new(t.hash),
            added_at: t.added_on,
            progress: t.progress,
            // The engine reports -1 while metadata is unknown.
            size_bytes: u64::try_from(t.size).unwrap_or(0),
            state: EngineState::parse(&t.state),
        }
    }
}

pub(super) fn parse_torrent_list(body: &[u8]) -> Result<Vec<Item>, serde_json::Error> {
    let list: Vec<TorrentInfo> = serde_json::from_slice(body)?;
    Ok(list.into_iter().map(Item::from).collect())
}
