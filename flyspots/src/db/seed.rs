//! Built-in sample data for the local store.

use chrono::NaiveDate;

use crate::models::{
    Coordinates, Difficulty, LandscapeType, Review, ReviewId, Spot, SpotId, StarRating,
};

pub fn sample_spots() -> Vec<Spot> {
    vec![
        Spot {
            id: SpotId(1),
            name: "Mount Carmel Overlook".to_string(),
            landscape_type: LandscapeType::Mountain,
            rating: 4.8,
            distance_km: 2.5,
            difficulty: Difficulty::Expert,
            description: "Stunning mountain views with challenging wind conditions".to_string(),
            restrictions: "Day flights only".to_string(),
            coordinates: Coordinates::new(32.7767, 34.9796),
            review_count: 15,
            photo_count: 8,
            video_count: 3,
            tags: vec![],
        },
        Spot {
            id: SpotId(2),
            name: "Tel Aviv Beach".to_string(),
            landscape_type: LandscapeType::Coastal,
            rating: 4.2,
            distance_km: 5.1,
            difficulty: Difficulty::Beginner,
            description: "Beautiful coastal shots with minimal obstacles".to_string(),
            restrictions: "Stay 250m from people".to_string(),
            coordinates: Coordinates::new(32.0853, 34.7818),
            review_count: 23,
            photo_count: 12,
            video_count: 5,
            tags: vec![],
        },
        Spot {
            id: SpotId(3),
            name: "Yarkon Park".to_string(),
            landscape_type: LandscapeType::Urban,
            rating: 4.5,
            distance_km: 1.8,
            difficulty: Difficulty::Intermediate,
            description: "Urban park with river views and city skyline".to_string(),
            restrictions: "Weekend restrictions apply".to_string(),
            coordinates: Coordinates::new(32.1133, 34.8044),
            review_count: 18,
            photo_count: 6,
            video_count: 4,
            tags: vec![],
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn review(
    id: u64,
    author: &str,
    stars: u8,
    (year, month, day): (i32, u32, u32),
    comment: &str,
    likes: u32,
    (photos, videos): (u32, u32),
    tags: &[&str],
) -> Option<Review> {
    Some(Review {
        id: ReviewId(id),
        spot_id: SpotId(2),
        author: author.to_string(),
        rating: StarRating::new(stars)?,
        comment: comment.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day)?,
        likes,
        reports: 0,
        photo_count: photos,
        video_count: videos,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    })
}

/// Sample reviews of Tel Aviv Beach, newest first.
pub fn sample_reviews() -> Vec<Review> {
    [
        review(
            1,
            "FPVPilot_Alex",
            5,
            (2024, 8, 15),
            "Absolutely stunning location! Perfect for cinematic shots during golden hour. Wind conditions were manageable and the views are incredible. Highly recommend for intermediate to advanced pilots.",
            12,
            (3, 1),
            &["scenic", "windy", "golden-hour"],
        ),
        review(
            2,
            "DroneExplorer",
            4,
            (2024, 8, 10),
            "Great spot for FPV flying! The coastal views are amazing and there's plenty of space to fly safely. Just be careful of the wind near the cliff edges. Best time is early morning.",
            8,
            (2, 0),
            &["coastal", "morning", "spacious"],
        ),
        review(
            3,
            "CinematicFPV",
            4,
            (2024, 8, 5),
            "Solid location for practice flights. Not too challenging but offers good variety for different shot types. Parking can be tricky during weekends.",
            5,
            (1, 2),
            &["practice", "weekend", "parking"],
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
