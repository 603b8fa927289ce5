use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to record one swipe and resolve the match decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSwipeRequest {
    #[serde(alias = "user_id_1", rename = "userA")]
    pub user_a: i64,
    #[serde(alias = "user_id_2", rename = "userB")]
    pub user_b: i64,
    #[serde(alias = "swipe_direction", rename = "direction")]
    pub direction: String,
}

/// Feed request parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedQuery {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 0.1, max = 20000.0))]
    #[serde(alias = "radius_km", rename = "radiusKm", default = "default_radius_km")]
    pub radius_km: f64,
}

fn default_radius_km() -> f64 {
    50.0
}

/// Request to create a user profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "first_name", rename = "firstName")]
    pub first_name: String,
    #[validate(length(min = 1))]
    #[serde(alias = "last_name", rename = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Request to create a match directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    #[serde(alias = "user_id_1", rename = "userA")]
    pub user_a: i64,
    #[serde(alias = "user_id_2", rename = "userB")]
    pub user_b: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_request_accepts_both_field_styles() {
        let camel: RecordSwipeRequest =
            serde_json::from_str(r#"{"userA":1,"userB":2,"direction":"right"}"#).unwrap();
        assert_eq!(camel.user_a, 1);

        let snake: RecordSwipeRequest =
            serde_json::from_str(r#"{"user_id_1":1,"user_id_2":2,"swipe_direction":"left"}"#)
                .unwrap();
        assert_eq!(snake.direction, "left");
    }

    #[test]
    fn test_feed_query_defaults_radius() {
        let query: FeedQuery =
            serde_json::from_str(r#"{"userId":5,"latitude":40.7,"longitude":-74.0}"#).unwrap();
        assert_eq!(query.radius_km, 50.0);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_feed_query_rejects_bad_latitude() {
        let query: FeedQuery =
            serde_json::from_str(r#"{"userId":5,"latitude":123.0,"longitude":0.0}"#).unwrap();
        assert!(query.validate().is_err());
    }
}
