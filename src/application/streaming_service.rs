// Streaming dashboard service - refresh every tile concurrently and stream results
use crate::application::bar_tile_service::{BarTileService, RefreshOutcome};
use crate::domain::chart::Plot;
use crate::domain::tile::WidgetType;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSkeleton {
    pub id: String,
    pub title: String,
    pub widget_type: WidgetType,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum StreamMessage {
    Skeleton { tiles: Vec<TileSkeleton> },
    TileUpdate { tile_id: String, plot: Plot },
    TileUnchanged { tile_id: String },
    TileFailed { tile_id: String, error: String },
    Complete { tile_count: usize, duration_ms: i64 },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    tiles: BarTileService,
}

impl StreamingDashboardService {
    pub fn new(tiles: BarTileService) -> Self {
        Self { tiles }
    }

    pub async fn stream_dashboard(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(100);
        let start_time = Instant::now();

        // 1. Skeleton first so the page can lay tiles out before data arrives
        let skeleton: Vec<TileSkeleton> = self
            .tiles
            .tiles()
            .await
            .into_iter()
            .map(|t| TileSkeleton {
                id: t.id,
                title: t.title,
                widget_type: t.tile_context.widget_type,
            })
            .collect();
        let tile_count = skeleton.len();
        let _ = tx.send(StreamMessage::Skeleton { tiles: skeleton }).await;

        // 2. One refresh per tile, completion once all have reported
        let mut refreshes = JoinSet::new();
        for id in self.tiles.tile_ids() {
            let service = self.tiles.clone();
            let tx = tx.clone();
            let tile_id = id.clone();

            refreshes.spawn(async move {
                let msg = match service.refresh(&tile_id).await {
                    Ok(RefreshOutcome::Rendered(plot)) => StreamMessage::TileUpdate { tile_id, plot },
                    Ok(RefreshOutcome::Unchanged(_)) => StreamMessage::TileUnchanged { tile_id },
                    Err(e) => StreamMessage::TileFailed {
                        tile_id,
                        error: e.to_string(),
                    },
                };
                let _ = tx.send(msg).await;
            });
        }

        tokio::spawn(async move {
            while let Some(joined) = refreshes.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!("Tile refresh task failed: {}", e);
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            tracing::info!("Dashboard stream of {} tiles done in {}ms", tile_count, duration_ms);
            let _ = tx
                .send(StreamMessage::Complete {
                    tile_count,
                    duration_ms,
                })
                .await;
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::bar_tile_service::tests::{sample_tile, FakeRepository};
    use crate::domain::analytics::GroupResponse;
    use crate::domain::context::DashboardContext;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stream_sends_skeleton_updates_and_completion() {
        let repo = Arc::new(FakeRepository::with_responses(vec![
            Ok(GroupResponse::from_pairs([("A", 1.0)])),
            Err(anyhow::anyhow!("backend down")),
        ]));
        let tiles = BarTileService::new(
            repo,
            vec![sample_tile("t1"), sample_tile("t2"), sample_tile("t3")],
            DashboardContext::default(),
        );
        let service = StreamingDashboardService::new(tiles);

        let mut rx = service.stream_dashboard().await;
        let mut messages = Vec::new();
        while let Some(msg) = rx.recv().await {
            messages.push(msg);
        }

        assert!(matches!(&messages[0], StreamMessage::Skeleton { tiles } if tiles.len() == 3));
        assert!(matches!(
            messages.last(),
            Some(StreamMessage::Complete { tile_count: 3, .. })
        ));

        let middle = &messages[1..messages.len() - 1];
        assert_eq!(middle.len(), 3);
        assert_eq!(
            middle
                .iter()
                .filter(|m| matches!(m, StreamMessage::TileUpdate { .. }))
                .count(),
            1
        );
        assert_eq!(
            middle
                .iter()
                .filter(|m| matches!(m, StreamMessage::TileFailed { .. }))
                .count(),
            1
        );
        assert_eq!(
            middle
                .iter()
                .filter(|m| matches!(m, StreamMessage::TileUnchanged { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_message_wire_format() {
        let msg = StreamMessage::TileUnchanged {
            tile_id: "t1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            serde_json::json!({"type": "tile_unchanged", "tileId": "t1"})
        );
    }
}
