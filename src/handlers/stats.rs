use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;

use crate::services::aggregation::{
    calculate_language_stats, calculate_repo_stats, calculate_streaks, last_90_days,
};
use crate::services::github::ContributionSource;
use crate::services::svg::render_badge;
use crate::utils::validators::validate_username;

const CACHE_CONTROL: &str = "public, max-age=14400";

#[derive(Debug, Deserialize)]
pub struct BadgeQuery {
    pub username: Option<String>,
}

/// GET /api/stats?username=<login>
/// Fetch, aggregate and render the contribution badge for one user.
pub async fn get_stats(
    source: web::Data<dyn ContributionSource>,
    query: web::Query<BadgeQuery>,
) -> impl Responder {
    let username = match query.username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => {
            return HttpResponse::BadRequest()
                .content_type("text/plain")
                .body("Username parameter is required");
        }
    };

    if let Err(error) = validate_username(username) {
        return HttpResponse::BadRequest()
            .content_type("text/plain")
            .body(error.to_string());
    }

    let stats = match source.fetch_user_stats(username).await {
        Ok(stats) => stats,
        Err(error) => {
            log::error!("Error generating stats for {}: {}", username, error);
            return HttpResponse::InternalServerError()
                .content_type("text/plain")
                .body(format!("Error: {}", error));
        }
    };

    let today = Utc::now().date_naive();
    let streaks = calculate_streaks(&stats.calendar.weeks, today);
    let activity_days = last_90_days(&stats.calendar.weeks);
    let languages = calculate_language_stats(&stats.repositories);
    let repo_stats = calculate_repo_stats(&stats.repositories);

    log::info!(
        "Stats for {}: {} contributions, current streak {}, longest streak {}, {} repositories",
        username,
        stats.calendar.total_contributions,
        streaks.current,
        streaks.longest,
        stats.repositories.len()
    );

    let svg = render_badge(
        stats.calendar.total_contributions,
        &streaks,
        &activity_days,
        &languages,
        stats.created_at,
        &repo_stats,
    );

    HttpResponse::Ok()
        .content_type("image/svg+xml")
        .insert_header((header::CACHE_CONTROL, CACHE_CONTROL))
        .body(svg)
}
