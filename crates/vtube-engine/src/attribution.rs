//! View attribution service.
//!
//! Records one view per video-detail access, classifies the viewer, and
//! derives the fan-view percentage and post-publish follower growth at
//! read time. Repeated views by the same viewer all count; there is no
//! de-duplication window.

use tracing::debug;

use vtube_models::{Video, VideoAnalytics, VideoId, Viewer, ViewerClass};
use vtube_store::{Db, FollowRepository, VideoRepository};

use crate::error::{EngineError, EngineResult};

/// Classify a viewer against a video's owner and the follow graph.
///
/// The follow check is only consulted for an authenticated non-owner;
/// anonymous and owner views never touch the graph.
pub fn classify(video: &Video, viewer: &Viewer, follows_owner: bool) -> ViewerClass {
    match viewer.user_id() {
        None => ViewerClass::Anonymous,
        Some(id) if id == video.user_id => ViewerClass::Author,
        Some(_) if follows_owner => ViewerClass::Follower,
        Some(_) => ViewerClass::Other,
    }
}

/// Records and attributes views, and serves the derived analytics.
#[derive(Clone)]
pub struct ViewAttributionService {
    videos: VideoRepository,
    follows: FollowRepository,
}

impl ViewAttributionService {
    /// Create a new view attribution service.
    pub fn new(db: Db) -> Self {
        Self {
            videos: VideoRepository::new(db.clone()),
            follows: FollowRepository::new(db),
        }
    }

    /// Record one view and return the video payload augmented with the
    /// derived metrics.
    ///
    /// The total counter always moves; author and follower views
    /// additionally move their attribution counter. The increment is a
    /// single atomic statement in the store, so concurrent views cannot
    /// lose counts and a failed call leaves no partial mutation.
    pub async fn record_view(
        &self,
        video_id: VideoId,
        viewer: &Viewer,
    ) -> EngineResult<VideoAnalytics> {
        let video = self.require_video(video_id).await?;

        let follows_owner = match viewer.user_id() {
            Some(id) if id != video.user_id => {
                self.follows.is_following(id, video.user_id).await?
            }
            _ => false,
        };
        let class = classify(&video, viewer, follows_owner);
        debug!("Classified view on video {} as {}", video_id, class);

        let updated = self
            .videos
            .record_view(video_id, class)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("video {video_id} not found")))?;

        self.analytics_for(updated).await
    }

    /// The derived analytics payload without recording a view.
    pub async fn analytics(&self, video_id: VideoId) -> EngineResult<VideoAnalytics> {
        let video = self.require_video(video_id).await?;
        self.analytics_for(video).await
    }

    async fn analytics_for(&self, video: Video) -> EngineResult<VideoAnalytics> {
        let new_followers = self
            .follows
            .count_since(video.user_id, video.created_at)
            .await?;
        Ok(VideoAnalytics::new(video, new_followers))
    }

    async fn require_video(&self, id: VideoId) -> EngineResult<Video> {
        self.videos
            .get(id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("video {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vtube_models::UserId;

    fn video_owned_by(owner: i64) -> Video {
        Video {
            id: VideoId(1),
            user_id: UserId(owner),
            title: "t".to_string(),
            description: None,
            url: "uploads/1.mp4".to_string(),
            thumbnail_url: None,
            views: 0,
            author_views: 0,
            follower_views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_classify_anonymous() {
        let video = video_owned_by(2);
        assert_eq!(
            classify(&video, &Viewer::Anonymous, false),
            ViewerClass::Anonymous
        );
        // The follow flag is irrelevant without an identity.
        assert_eq!(
            classify(&video, &Viewer::Anonymous, true),
            ViewerClass::Anonymous
        );
    }

    #[test]
    fn test_classify_author_wins_over_follow() {
        let video = video_owned_by(2);
        assert_eq!(
            classify(&video, &Viewer::User(UserId(2)), true),
            ViewerClass::Author
        );
    }

    #[test]
    fn test_classify_follower_and_other() {
        let video = video_owned_by(2);
        assert_eq!(
            classify(&video, &Viewer::User(UserId(1)), true),
            ViewerClass::Follower
        );
        assert_eq!(
            classify(&video, &Viewer::User(UserId(1)), false),
            ViewerClass::Other
        );
    }
}
