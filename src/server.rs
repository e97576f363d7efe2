use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate, Weekday};
use hub_calendar::{
    build_month_grid, filter_events, select_upcoming, to_ics, Category, CategoryDefinition,
    CategorySet, EventStore, Month, DEFAULT_UPCOMING_LIMIT,
};
use serde::{Deserialize, Serialize};

use crate::cache::{GridCache, GridKey};

pub struct AppState {
    pub store: EventStore,
    pub week_start: Weekday,
    pub today: Option<NaiveDate>,
    pub grids: GridCache,
}

impl AppState {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/calendar/grid", get(handle_grid))
        .route("/calendar/upcoming", get(handle_upcoming))
        .route("/calendar/events/:id", get(handle_event))
        .route("/calendar/categories", get(handle_categories))
        .route("/calendar.ics", get(handle_ics))
        .fallback(|| async { Redirect::permanent(env!("CARGO_PKG_REPOSITORY")) })
        .with_state(Arc::new(state))
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

/// Missing means every category, an empty value means none.
fn active_categories(categories: Option<&str>) -> Result<CategorySet, Response> {
    match categories {
        None => Ok(CategorySet::all()),
        Some(categories) => categories
            .parse()
            .map_err(|err| bad_request(format!("Invalid categories: {err}"))),
    }
}

#[derive(Deserialize)]
struct GridQuery {
    month: Option<String>,
    categories: Option<String>,
}

async fn handle_grid(State(state): State<Arc<AppState>>, Query(query): Query<GridQuery>) -> Response {
    let today = state.today();

    let month = match query.month.as_deref() {
        None => Month::containing(today),
        Some(month) => month.parse::<Month>(),
    };

    let month = match month {
        Ok(month) => month,
        Err(err) => return bad_request(err.to_string()),
    };

    let active = match active_categories(query.categories.as_deref()) {
        Ok(active) => active,
        Err(response) => return response,
    };

    let key = GridKey {
        month,
        active,
        today,
        week_start: state.week_start,
    };

    let grid = state.grids.get_or_build(key, || {
        log::debug!("Building month grid for {month}");
        build_month_grid(
            month,
            filter_events(state.store.events(), active),
            today,
            state.week_start,
        )
    });

    Json(grid.as_ref()).into_response()
}

#[derive(Deserialize)]
struct UpcomingQuery {
    limit: Option<usize>,
}

async fn handle_upcoming(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpcomingQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    let upcoming = select_upcoming(state.store.semesters(), state.today(), limit);

    Json(upcoming).into_response()
}

async fn handle_event(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.store.detail(&id) {
        Some(detail) => Json(detail).into_response(),
        None => (StatusCode::NOT_FOUND, format!("No event with id '{id}'")).into_response(),
    }
}

#[derive(Serialize)]
struct CategoryEntry {
    key: Category,
    #[serde(flatten)]
    definition: CategoryDefinition,
}

async fn handle_categories() -> Json<Vec<CategoryEntry>> {
    Json(
        Category::ALL
            .into_iter()
            .map(|key| CategoryEntry {
                key,
                definition: key.definition(),
            })
            .collect(),
    )
}

#[derive(Deserialize)]
struct IcsQuery {
    categories: Option<String>,
}

async fn handle_ics(State(state): State<Arc<AppState>>, Query(query): Query<IcsQuery>) -> Response {
    let active = match active_categories(query.categories.as_deref()) {
        Ok(active) => active,
        Err(response) => return response,
    };

    let events = filter_events(state.store.events(), active);

    (
        [("content-type", "text/calendar")],
        to_ics("Academic Calendar", events).to_string(),
    )
        .into_response()
}
