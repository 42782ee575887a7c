//! Catalog integration tests against a running server

use reqwest::{redirect::Policy, Client, Response};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Suffix keeping names unique between runs
fn unique() -> String {
    chrono::Utc::now().timestamp_micros().to_string()
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get("location")
        .expect("No location header")
        .to_str()
        .unwrap()
        .to_string()
}

async fn get_json(client: &Client, path: &str) -> (u16, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn post_form(client: &Client, path: &str, form: &[(&str, &str)]) -> Response {
    client
        .post(format!("{}{}", BASE_URL, path))
        .form(form)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let (status, body) = get_json(&client(), "/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_root_redirects_to_catalog() {
    let response = client()
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/catalog");
}

#[tokio::test]
#[ignore]
async fn test_catalog_counts() {
    let (status, body) = get_json(&client(), "/catalog").await;

    assert_eq!(status, 200);
    assert_eq!(body["template"], "index");
    for key in [
        "book_count",
        "book_instance_count",
        "book_instance_available_count",
        "author_count",
        "genre_count",
    ] {
        assert!(body["data"][key].is_number(), "missing count {}", key);
    }
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = client();
    let family = format!("Austen{}", unique());

    let response = post_form(
        &client,
        "/catalog/author/create",
        &[
            ("first_name", "Jane"),
            ("family_name", family.as_str()),
            ("date_of_birth", "1775-12-16"),
            ("date_of_death", "1817-07-18"),
        ],
    )
    .await;
    assert_eq!(response.status(), 303);
    let url = location(&response);

    let (status, body) = get_json(&client, &url).await;
    assert_eq!(status, 200);
    assert_eq!(body["author"]["name"], format!("{}, Jane", family));
    assert_eq!(body["books"], Value::Array(vec![]));

    // Same natural key resolves to the existing record
    let response = post_form(
        &client,
        "/catalog/author/create",
        &[("first_name", "Jane"), ("family_name", family.as_str())],
    )
    .await;
    assert_eq!(location(&response), url);

    let response = post_form(&client, &format!("{}/delete", url), &[]).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/catalog/authors");

    let (status, body) = get_json(&client, &url).await;
    assert_eq!(status, 404);
    assert_eq!(body["template"], "error");
}

#[tokio::test]
#[ignore]
async fn test_invalid_author_is_rejected() {
    let response = post_form(
        &client(),
        "/catalog/author/create",
        &[("first_name", "Jane!"), ("family_name", "")],
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["template"], "author_form");
    assert!(body["errors"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
#[ignore]
async fn test_genre_create_is_idempotent() {
    let client = client();
    let name = format!("Fantasy{}", unique());

    let first = post_form(&client, "/catalog/genre/create", &[("name", name.as_str())]).await;
    let second = post_form(&client, "/catalog/genre/create", &[("name", name.as_str())]).await;

    assert_eq!(first.status(), 303);
    assert_eq!(location(&first), location(&second));
}

#[tokio::test]
#[ignore]
async fn test_book_with_copy_cannot_be_deleted() {
    let client = client();
    let suffix = unique();
    let family = format!("Guin{}", suffix);

    let author = post_form(
        &client,
        "/catalog/author/create",
        &[("first_name", "Ursula"), ("family_name", family.as_str())],
    )
    .await;
    let author_id = location(&author).rsplit('/').next().unwrap().to_string();

    let scifi = format!("SciFi{}", suffix);
    let myth = format!("Myth{}", suffix);
    let genre_a = post_form(&client, "/catalog/genre/create", &[("name", scifi.as_str())]).await;
    let genre_b = post_form(&client, "/catalog/genre/create", &[("name", myth.as_str())]).await;
    let genre_a = location(&genre_a).rsplit('/').next().unwrap().to_string();
    let genre_b = location(&genre_b).rsplit('/').next().unwrap().to_string();

    let book = post_form(
        &client,
        "/catalog/book/create",
        &[
            ("title", "The Dispossessed"),
            ("author", author_id.as_str()),
            ("summary", "An ambiguous utopia."),
            ("isbn", "9780061054884"),
            ("genre", genre_a.as_str()),
            ("genre", genre_b.as_str()),
        ],
    )
    .await;
    assert_eq!(book.status(), 303);
    let book_url = location(&book);
    let book_id = book_url.rsplit('/').next().unwrap().to_string();

    let (_, body) = get_json(&client, &book_url).await;
    assert_eq!(body["book"]["genres"].as_array().unwrap().len(), 2);

    let copy = post_form(
        &client,
        "/catalog/bookinstance/create",
        &[
            ("book", book_id.as_str()),
            ("imprint", "Harper, 1974"),
            ("status", "Available"),
            ("due_back", ""),
        ],
    )
    .await;
    assert_eq!(copy.status(), 303);
    let copy_url = location(&copy);

    let refused = post_form(&client, &format!("{}/delete", book_url), &[]).await;
    assert_eq!(refused.status(), 200);
    let body: Value = refused.json().await.expect("Failed to parse response");
    assert_eq!(body["template"], "book_delete");

    let response = post_form(&client, &format!("{}/delete", copy_url), &[]).await;
    assert_eq!(location(&response), "/catalog/bookinstances");
    let response = post_form(&client, &format!("{}/delete", book_url), &[]).await;
    assert_eq!(location(&response), "/catalog/books");
}

/// Id at the end of a redirect location
fn created_id(response: &Response) -> String {
    location(response).rsplit('/').next().unwrap().to_string()
}

/// Values of `field` in `list`, keeping only entries that belong to this run
fn run_values(body: &Value, list: &str, field: &str, suffix: &str) -> Vec<String> {
    body[list]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|entry| entry[field].as_str())
        .filter(|value| value.contains(suffix))
        .map(String::from)
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_lists_sorted_ascending() {
    let client = client();
    let suffix = unique();

    // Created in reverse of the expected listing order
    let zola = format!("Zola{}", suffix);
    let balzac = format!("Balzac{}", suffix);
    let zola_id = created_id(
        &post_form(
            &client,
            "/catalog/author/create",
            &[("first_name", "Emile"), ("family_name", zola.as_str())],
        )
        .await,
    );
    let balzac_id = created_id(
        &post_form(
            &client,
            "/catalog/author/create",
            &[("first_name", "Honore"), ("family_name", balzac.as_str())],
        )
        .await,
    );

    let realism = format!("Realism{}", suffix);
    let comedy = format!("Comedy{}", suffix);
    let realism_id =
        created_id(&post_form(&client, "/catalog/genre/create", &[("name", realism.as_str())]).await);
    let comedy_id =
        created_id(&post_form(&client, "/catalog/genre/create", &[("name", comedy.as_str())]).await);

    let nana = format!("Nana {}", suffix);
    let eugenie = format!("Eugenie Grandet {}", suffix);
    let nana_id = created_id(
        &post_form(
            &client,
            "/catalog/book/create",
            &[
                ("title", nana.as_str()),
                ("author", zola_id.as_str()),
                ("summary", "A courtesan in the Second Empire."),
                ("isbn", "9780140444636"),
            ],
        )
        .await,
    );
    let eugenie_id = created_id(
        &post_form(
            &client,
            "/catalog/book/create",
            &[
                ("title", eugenie.as_str()),
                ("author", balzac_id.as_str()),
                ("summary", "A miser and his daughter."),
                ("isbn", "9780140440508"),
            ],
        )
        .await,
    );

    let (_, authors) = get_json(&client, "/catalog/authors").await;
    assert_eq!(
        run_values(&authors, "author_list", "family_name", &suffix),
        vec![balzac.clone(), zola.clone()]
    );

    let (_, genres) = get_json(&client, "/catalog/genres").await;
    assert_eq!(
        run_values(&genres, "genre_list", "name", &suffix),
        vec![comedy.clone(), realism.clone()]
    );

    let (_, books) = get_json(&client, "/catalog/books").await;
    assert_eq!(
        run_values(&books, "book_list", "title", &suffix),
        vec![eugenie.clone(), nana.clone()]
    );

    for path in [
        format!("/catalog/book/{}/delete", nana_id),
        format!("/catalog/book/{}/delete", eugenie_id),
        format!("/catalog/author/{}/delete", zola_id),
        format!("/catalog/author/{}/delete", balzac_id),
        format!("/catalog/genre/{}/delete", realism_id),
        format!("/catalog/genre/{}/delete", comedy_id),
    ] {
        post_form(&client, &path, &[]).await;
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_records_are_404() {
    let client = client();
    for path in [
        "/catalog/author/999999999",
        "/catalog/book/abc",
        "/catalog/genre/999999999",
        "/catalog/bookinstance/999999999",
    ] {
        let (status, body) = get_json(&client, path).await;
        assert_eq!(status, 404, "{}", path);
        assert_eq!(body["template"], "error");
    }
}
