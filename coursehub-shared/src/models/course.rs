//! Request body for creating and updating a course.

use serde::{Deserialize, Serialize};

/// Body of `POST courses` and `PUT courses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    /// Course title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Listed price.
    pub price: f64,
    /// Price estimate shown before discounts; zero when not given.
    pub estimation_price: f64,
    /// Expected duration, in hours.
    pub duration: f64,
    /// Category tags.
    pub category: Vec<String>,
    /// Free course flag.
    pub is_free: bool,
    /// Visible to students.
    pub is_published: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn course_request_wire_shape() {
        let request = CourseRequest {
            title: "Rust".to_string(),
            description: "Ownership from scratch".to_string(),
            price: 49.0,
            estimation_price: 79.0,
            duration: 12.5,
            category: vec!["programming".to_string()],
            is_free: false,
            is_published: true,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "title": "Rust",
                "description": "Ownership from scratch",
                "price": 49.0,
                "estimationPrice": 79.0,
                "duration": 12.5,
                "category": ["programming"],
                "isFree": false,
                "isPublished": true
            })
        );
    }
}
