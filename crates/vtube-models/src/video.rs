//! Video record and view-attribution analytics.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::id::{UserId, VideoId};

/// A published video with its view-attribution counters.
///
/// The three stored counters split every recorded view into buckets:
/// `views` is the unconditional total, `author_views` counts views by the
/// owner, `follower_views` counts views by users who followed the owner at
/// view time. "Other" views are implicit (`views - author_views -
/// follower_views`). Counters never decrease and are only mutated by the
/// view-attribution path, so `author_views + follower_views <= views`
/// holds at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Unique video ID
    pub id: VideoId,

    /// Owner (creator) user ID
    pub user_id: UserId,

    /// Video title
    pub title: String,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Playback URL
    pub url: String,

    /// Optional thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Total recorded views
    pub views: i64,

    /// Views attributed to the owner
    pub author_views: i64,

    /// Views attributed to followers of the owner
    pub follower_views: i64,

    /// Publish timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Views not attributed to the author or a follower.
    pub fn other_views(&self) -> i64 {
        self.views - self.author_views - self.follower_views
    }

    /// Views eligible for the fan percentage: everything except the
    /// author's own views. Clamped at zero so a counter glitch can never
    /// produce a negative denominator.
    pub fn valid_views(&self) -> i64 {
        (self.views - self.author_views).max(0)
    }

    /// Share of valid views that came from followers, in percent.
    ///
    /// Zero when there are no valid views yet.
    pub fn fan_view_percent(&self) -> f64 {
        let valid = self.valid_views();
        if valid > 0 {
            self.follower_views as f64 / valid as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Fan view percentage formatted to two decimals for the wire,
    /// e.g. `"33.33"`.
    pub fn fan_view_percent_formatted(&self) -> String {
        format!("{:.2}", self.fan_view_percent())
    }

    /// True while the stored counters are mutually consistent.
    pub fn counters_consistent(&self) -> bool {
        self.author_views >= 0
            && self.follower_views >= 0
            && self.author_views + self.follower_views <= self.views
    }
}

/// Fields supplied when publishing a new video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Video detail payload augmented with read-time analytics.
///
/// Derived on every read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalytics {
    #[serde(flatten)]
    pub video: Video,

    /// Follow edges pointing at the owner created after the video was
    /// published
    pub new_followers_count: i64,

    /// Fan view percentage, two-decimal string (`"0.00"`–`"100.00"`)
    pub fan_view_percent: String,
}

impl VideoAnalytics {
    /// Assemble the payload from a stored video and a follower-growth count.
    pub fn new(video: Video, new_followers_count: i64) -> Self {
        let fan_view_percent = video.fan_view_percent_formatted();
        Self {
            video,
            new_followers_count,
            fan_view_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_with_counts(views: i64, author: i64, follower: i64) -> Video {
        Video {
            id: VideoId(1),
            user_id: UserId(2),
            title: "t".to_string(),
            description: None,
            url: "uploads/1.mp4".to_string(),
            thumbnail_url: None,
            views,
            author_views: author,
            follower_views: follower,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fan_percent_zero_without_views() {
        let v = video_with_counts(0, 0, 0);
        assert_eq!(v.fan_view_percent(), 0.0);
        assert_eq!(v.fan_view_percent_formatted(), "0.00");
    }

    #[test]
    fn test_fan_percent_zero_when_only_author_views() {
        let v = video_with_counts(3, 3, 0);
        assert_eq!(v.valid_views(), 0);
        assert_eq!(v.fan_view_percent_formatted(), "0.00");
    }

    #[test]
    fn test_fan_percent_excludes_author_views() {
        // 2 views total, 1 author view, 1 follower view: the author view
        // is removed from the denominator so the follower share is 100%.
        let v = video_with_counts(2, 1, 1);
        assert_eq!(v.valid_views(), 1);
        assert_eq!(v.fan_view_percent_formatted(), "100.00");
    }

    #[test]
    fn test_fan_percent_rounds_to_two_decimals() {
        let v = video_with_counts(3, 0, 1);
        assert_eq!(v.fan_view_percent_formatted(), "33.33");

        let v = video_with_counts(3, 0, 2);
        assert_eq!(v.fan_view_percent_formatted(), "66.67");
    }

    #[test]
    fn test_other_views() {
        let v = video_with_counts(10, 2, 5);
        assert_eq!(v.other_views(), 3);
        assert!(v.counters_consistent());
    }

    #[test]
    fn test_counters_inconsistent_when_attributed_exceeds_total() {
        let v = video_with_counts(1, 1, 1);
        assert!(!v.counters_consistent());
    }

    #[test]
    fn test_analytics_payload_wire_shape() {
        let v = video_with_counts(4, 1, 3);
        let analytics = VideoAnalytics::new(v, 2);
        let json = serde_json::to_value(&analytics).unwrap();

        // Flattened video fields plus the derived metrics, all camelCase.
        assert_eq!(json["views"], 4);
        assert_eq!(json["authorViews"], 1);
        assert_eq!(json["followerViews"], 3);
        assert_eq!(json["newFollowersCount"], 2);
        assert_eq!(json["fanViewPercent"], "100.00");
    }
}
