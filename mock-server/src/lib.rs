use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_RATE_LIMIT: u32 = 5000;
const DEFAULT_PER_PAGE: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Menu {
    pub id: u64,
    pub name: String,
    pub sponsor: String,
    pub location: String,
    pub year: i32,
    pub date: String,
    pub status: String,
    pub page_count: u32,
    pub dish_count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    pub page_number: u32,
    pub image_id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dish {
    pub id: u64,
    pub name: String,
    pub menus_appeared: u32,
    pub first_appeared: i32,
    pub last_appeared: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub per_page: Option<usize>,
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MenusQuery {
    pub per_page: Option<usize>,
    pub page: Option<usize>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub sort_by: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub per_page: Option<usize>,
    pub page: Option<usize>,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Seeded archive plus the per-token quota shared by every request.
pub struct Archive {
    pub menus: Vec<Menu>,
    pub pages: HashMap<u64, Vec<Page>>,
    pub dishes: Vec<Dish>,
    pub menu_dishes: HashMap<u64, Vec<u64>>,
    pub limit: u32,
    pub remaining: RwLock<u32>,
}

pub type Db = Arc<Archive>;

pub fn app() -> Router {
    app_with_limit(DEFAULT_RATE_LIMIT)
}

pub fn app_with_limit(limit: u32) -> Router {
    let db: Db = Arc::new(seed(limit));
    Router::new()
        .route("/menus", get(list_menus))
        .route("/menus/{id}", get(get_menu))
        .route("/menus/{id}/pages", get(menu_pages))
        .route("/menus/{id}/dishes", get(menu_dishes))
        .route("/dishes/search", get(search_dishes))
        .layer(middleware::from_fn_with_state(db.clone(), quota))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Rejects requests without a token and stamps the rate-limit headers on
/// every response, errors included.
async fn quota(State(db): State<Db>, request: Request, next: Next) -> Response {
    let remaining = {
        let mut remaining = db.remaining.write().await;
        *remaining = remaining.saturating_sub(1);
        *remaining
    };

    let token = Query::<TokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.token)
        .filter(|t| !t.is_empty());

    let mut response = match token {
        Some(_) => next.run(request).await,
        None => error(StatusCode::UNAUTHORIZED, "token required"),
    };

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(db.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    response
}

async fn list_menus(State(db): State<Db>, Query(q): Query<MenusQuery>) -> Json<Value> {
    let mut menus: Vec<Menu> = db
        .menus
        .iter()
        .filter(|m| q.min_year.is_none_or(|min| m.year >= min))
        .filter(|m| q.max_year.is_none_or(|max| m.year <= max))
        .filter(|m| q.status.as_deref().is_none_or(|s| m.status == s))
        .cloned()
        .collect();

    match q.sort_by.as_deref() {
        Some("date") => menus.sort_by(|a, b| a.date.cmp(&b.date)),
        Some("name") => menus.sort_by(|a, b| a.name.cmp(&b.name)),
        Some("dish_count") => menus.sort_by_key(|m| m.dish_count),
        _ => {}
    }

    let count = menus.len();
    let menus = paginate(&menus, q.per_page, q.page);
    Json(json!({ "stats": { "count": count }, "menus": menus }))
}

async fn get_menu(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Menu>, Response> {
    find_menu(&db, id).cloned().map(Json)
}

async fn menu_pages(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Value>, Response> {
    find_menu(&db, id)?;
    let pages = db.pages.get(&id).map(Vec::as_slice).unwrap_or_default();
    let pages = paginate(pages, q.per_page, q.page);
    Ok(Json(json!({ "pages": pages })))
}

async fn menu_dishes(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Value>, Response> {
    find_menu(&db, id)?;
    let dishes: Vec<Dish> = db
        .menu_dishes
        .get(&id)
        .into_iter()
        .flatten()
        .filter_map(|dish_id| db.dishes.iter().find(|d| d.id == *dish_id))
        .cloned()
        .collect();
    let dishes = paginate(&dishes, q.per_page, q.page);
    Ok(Json(json!({ "dishes": dishes })))
}

async fn search_dishes(
    State(db): State<Db>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Value>, Response> {
    let query = q
        .query
        .filter(|s| !s.is_empty())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "query required"))?
        .to_lowercase();
    let dishes: Vec<Dish> = db
        .dishes
        .iter()
        .filter(|d| d.name.to_lowercase().contains(&query))
        .cloned()
        .collect();
    let count = dishes.len();
    let dishes = paginate(&dishes, q.per_page, q.page);
    Ok(Json(json!({ "stats": { "count": count }, "dishes": dishes })))
}

fn find_menu(db: &Archive, id: u64) -> Result<&Menu, Response> {
    db.menus
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "menu not found"))
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn paginate<T: Clone>(items: &[T], per_page: Option<usize>, page: Option<usize>) -> Vec<T> {
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
    let page = page.unwrap_or(1).max(1);
    items
        .iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect()
}

fn seed(limit: u32) -> Archive {
    let menu = |id, name: &str, sponsor: &str, location: &str, year, date: &str, status: &str| Menu {
        id,
        name: name.to_string(),
        sponsor: sponsor.to_string(),
        location: location.to_string(),
        year,
        date: date.to_string(),
        status: status.to_string(),
        page_count: 2,
        dish_count: 0,
    };
    let dish = |id, name: &str, menus_appeared, first_appeared, last_appeared| Dish {
        id,
        name: name.to_string(),
        menus_appeared,
        first_appeared,
        last_appeared,
    };

    let dishes = vec![
        dish(1, "Swedish Meatballs", 212, 1900, 1987),
        dish(2, "Spaghetti and Meatballs", 96, 1914, 1989),
        dish(3, "Consomme Printaniere Royal", 1287, 1880, 1987),
        dish(4, "Chicken Gumbo", 1102, 1855, 1978),
        dish(5, "Apple Pie", 2470, 1851, 2008),
    ];

    let menu_dishes = HashMap::from([
        (12463, vec![3, 4]),
        (30924, vec![1, 2, 5]),
        (31054, vec![2, 3, 5]),
    ]);

    let mut menus = vec![
        menu(12463, "Breakfast", "Hotel Eastman", "Hot Springs, AR", 1900, "1900-04-15", "complete"),
        menu(30924, "Dinner", "Waldorf Astoria", "New York, NY", 1950, "1950-11-02", "complete"),
        menu(31054, "Luncheon", "Hotel Pierre", "New York, NY", 1951, "1951-03-18", "under review"),
    ];
    for m in &mut menus {
        m.dish_count = menu_dishes.get(&m.id).map_or(0, |d| d.len() as u32);
    }

    let pages = menus
        .iter()
        .map(|m| {
            let pages = (1..=m.page_count)
                .map(|n| Page {
                    id: m.id * 10 + u64::from(n),
                    page_number: n,
                    image_id: 4_000_000 + m.id * 10 + u64::from(n),
                })
                .collect();
            (m.id, pages)
        })
        .collect();

    Archive {
        menus,
        pages,
        dishes,
        menu_dishes,
        limit,
        remaining: RwLock::new(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_defaults_to_first_page() {
        let items: Vec<u32> = (1..=60).collect();
        let page = paginate(&items, None, None);
        assert_eq!(page.len(), DEFAULT_PER_PAGE);
        assert_eq!(page[0], 1);
    }

    #[test]
    fn paginate_skips_whole_pages() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(paginate(&items, Some(3), Some(2)), vec![4, 5, 6]);
        assert_eq!(paginate(&items, Some(3), Some(4)), vec![10]);
        assert!(paginate(&items, Some(3), Some(5)).is_empty());
    }

    #[test]
    fn paginate_clamps_zero_values() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(paginate(&items, Some(0), Some(0)), vec![1]);
    }

    #[test]
    fn seed_counts_dishes_per_menu() {
        let archive = seed(10);
        let dinner = archive.menus.iter().find(|m| m.id == 30924).unwrap();
        assert_eq!(dinner.dish_count, 3);
        assert_eq!(archive.pages[&30924].len(), 2);
    }

    #[test]
    fn menu_serializes_to_json() {
        let archive = seed(10);
        let json = serde_json::to_value(&archive.menus[0]).unwrap();
        assert_eq!(json["id"], 12463);
        assert_eq!(json["year"], 1900);
        assert_eq!(json["status"], "complete");
    }

    #[test]
    fn menus_query_all_fields_optional() {
        let q: MenusQuery = serde_json::from_str("{}").unwrap();
        assert!(q.min_year.is_none());
        assert!(q.sort_by.is_none());
    }
}
