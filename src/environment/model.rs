use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use url::Url;

use super::queries;

// Entities

/// A geographic position. `lat`/`lng` are the wire names the backend uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The `[lng, lat]` pair order the map widget consumes.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Medium {
    Physical,
    Digital,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InquiryKind {
    Request,
    Offer,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reader {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub am_i_following: Option<bool>,
    #[serde(default)]
    pub interests: Option<Connection<UserInterest>>,
}

impl PartialEq for Reader {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Reader {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub small_cover_url: Option<String>,
    #[serde(default)]
    pub medium_cover_url: Option<String>,
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

/// A specific copy of a book a reader offers, pinned to a location.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: String,
    pub medium: Medium,
    pub reader: Reader,
    pub book: Book,
    pub location: Coordinate,
}

impl PartialEq for BookInstance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BookInstance {}

/// An item (book, media) a user expressed interest in. Interests that
/// carry a location show up as map markers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInterest {
    pub id: String,
    pub title: String,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub inserted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<Reader>,
    #[serde(default)]
    pub creators: Option<Connection<Author>>,
    #[serde(default)]
    pub location: Option<Coordinate>,
}

impl PartialEq for UserInterest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserInterest {}

/// The book instance an inquiry is about, as the activity query selects it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquirySubject {
    pub reader: Reader,
    pub book: Book,
}

/// A request or offer record linking a user to a book instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: String,
    #[serde(default)]
    pub offering: Option<String>,
    #[serde(default)]
    pub user: Option<Reader>,
    #[serde(default)]
    pub book_instance: Option<InquirySubject>,
}

impl PartialEq for Inquiry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Inquiry {}

// The paged edge/node shape every list field comes back in. `cursor` and
// `pageInfo` are part of the wire shape; no caller paginates yet.

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: Option<PageInfo>,
}

impl<T> Connection<T> {
    pub fn nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// What the activity query returns: inquiries made by the user, requests
/// made to them, and their tracked interests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub inquiries: Connection<Inquiry>,
    #[serde(default)]
    pub requests: Connection<Inquiry>,
    #[serde(default)]
    pub interests: Connection<UserInterest>,
}

// Errors

#[derive(Debug, Error)]
pub enum ApiError {
    /// The session token is missing or expired. Callers branch to the
    /// login flow on this one instead of showing a transport failure.
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

// Wire shapes

#[derive(Serialize)]
struct GraphRequest<'a, V: Serialize> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<V>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct GraphResponse<T> {
    #[serde(default)]
    data: Option<T>,
}

#[derive(Serialize)]
struct SearchVariables<'a> {
    term: Option<&'a str>,
    lat: f64,
    lng: f64,
    offerings: Option<&'a [String]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostBookVariables<'a> {
    book_id: &'a str,
    lat: f64,
    lng: f64,
    offerings: &'a [String],
    medium: Medium,
}

#[derive(Serialize)]
struct ReaderVariables<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct InquiryRequest<'a> {
    book_instance_id: &'a str,
    #[serde(rename = "type")]
    kind: InquiryKind,
}

#[derive(Deserialize)]
struct BookInstancesData {
    #[serde(rename = "bookInstances")]
    book_instances: Vec<BookInstance>,
}

#[derive(Deserialize)]
struct PostBookData {
    #[serde(rename = "postBook")]
    post_book: BookInstance,
}

#[derive(Deserialize)]
struct MeData<T> {
    me: T,
}

#[derive(Deserialize)]
struct FeedData {
    feed: Connection<UserInterest>,
}

#[derive(Deserialize)]
struct ReaderData {
    reader: Reader,
}

#[derive(Deserialize)]
struct UpdateProfileData {
    #[serde(rename = "updateProfile")]
    update_profile: Reader,
}

// Client

/// One client per backend. Each operation performs a single request,
/// no retries, no caching; concurrent calls are independent and
/// last-resolved wins.
#[derive(Clone)]
pub struct Api {
    graph_url: Url,
    inquiries_url: Url,
    client: reqwest::Client,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api").finish()
    }
}

impl Api {
    pub fn new(base: Url) -> Result<Self, url::ParseError> {
        let graph_url = base.join("api/graph")?;
        let inquiries_url = base.join("api/inquiries")?;
        Ok(Self {
            graph_url,
            inquiries_url,
            client: reqwest::Client::new(),
        })
    }

    /// Search book instances around a coordinate, optionally narrowed by a
    /// free-text term and an offerings filter.
    pub async fn book_instances(
        &self,
        token: Option<&str>,
        term: Option<&str>,
        center: Coordinate,
        offerings: Option<&[String]>,
    ) -> Result<Vec<BookInstance>, ApiError> {
        log::trace!("Book instances");
        let variables = SearchVariables {
            term,
            lat: center.lat,
            lng: center.lng,
            offerings,
        };
        let data: BookInstancesData = self
            .graph(token, queries::BOOK_INSTANCES, Some(variables))
            .await
            .log_error("book_instances")?;
        Ok(data.book_instances)
    }

    /// Offer a book at a location.
    pub async fn post_book(
        &self,
        token: Option<&str>,
        book_id: &str,
        location: Coordinate,
        offerings: &[String],
        medium: Medium,
    ) -> Result<BookInstance, ApiError> {
        log::trace!("Post book");
        let variables = PostBookVariables {
            book_id,
            lat: location.lat,
            lng: location.lng,
            offerings,
            medium,
        };
        let data: PostBookData = self
            .graph(token, queries::POST_BOOK, Some(variables))
            .await
            .log_error("post_book")?;
        Ok(data.post_book)
    }

    /// File a request or offer against a book instance. This is the one
    /// REST operation of the backend.
    pub async fn inquire(
        &self,
        token: Option<&str>,
        book_instance_id: &str,
        kind: InquiryKind,
    ) -> Result<Inquiry, ApiError> {
        log::trace!("Inquire {kind}");
        let body = InquiryRequest {
            book_instance_id,
            kind,
        };
        let response = authorized(self.client.post(self.inquiries_url.clone()), token)
            .json(&body)
            .send()
            .await?;
        decode(response).await.log_error("inquire")
    }

    /// The profile behind the current session token.
    pub async fn me(&self, token: Option<&str>) -> Result<Reader, ApiError> {
        log::trace!("Me");
        let data: MeData<Reader> = self
            .graph(token, queries::ME, NO_VARIABLES)
            .await
            .log_error("me")?;
        Ok(data.me)
    }

    /// One page of the personal feed, page size fixed by the document.
    pub async fn my_feed(&self, token: Option<&str>) -> Result<Connection<UserInterest>, ApiError> {
        log::trace!("My feed");
        let data: MeData<FeedData> = self
            .graph(token, queries::MY_FEED, NO_VARIABLES)
            .await
            .log_error("my_feed")?;
        Ok(data.me.feed)
    }

    /// Inquiries, requests and interests of the current user, one page each.
    pub async fn my_activity(&self, token: Option<&str>) -> Result<Activity, ApiError> {
        log::trace!("My activity");
        let data: MeData<Activity> = self
            .graph(token, queries::MY_ACTIVITY, NO_VARIABLES)
            .await
            .log_error("my_activity")?;
        Ok(data.me)
    }

    /// Another reader's profile with one page of their interests.
    pub async fn reader(&self, token: Option<&str>, id: &str) -> Result<Reader, ApiError> {
        log::trace!("Reader {id}");
        let data: ReaderData = self
            .graph(token, queries::READER, Some(ReaderVariables { id }))
            .await
            .log_error("reader")?;
        Ok(data.reader)
    }

    /// Replace the profile photo. The document and variables travel in the
    /// multipart body next to the binary part, as the upload endpoint
    /// expects them.
    pub async fn upload_photo(
        &self,
        token: Option<&str>,
        file_name: &str,
        photo: Vec<u8>,
    ) -> Result<Reader, ApiError> {
        log::trace!("Upload photo {file_name}");
        let form = Form::new()
            .part("photoFile", Part::bytes(photo).file_name(file_name.to_string()))
            .text("query", queries::UPDATE_PROFILE)
            .text("variables", serde_json::json!({ "photo": "photoFile" }).to_string());
        let response = authorized(self.client.post(self.graph_url.clone()), token)
            .multipart(form)
            .send()
            .await?;
        let data: UpdateProfileData = unwrap_graph(response).await.log_error("upload_photo")?;
        Ok(data.update_profile)
    }

    async fn graph<V: Serialize, T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        query: &'static str,
        variables: Option<V>,
    ) -> Result<T, ApiError> {
        let request = GraphRequest { query, variables };
        let response = authorized(self.client.post(self.graph_url.clone()), token)
            .json(&request)
            .send()
            .await?;
        unwrap_graph(response).await
    }
}

const NO_VARIABLES: Option<()> = None;

fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Classify the response: 401 becomes the unauthorized sentinel, every
/// other failure keeps its underlying error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    let response = response.error_for_status()?;
    Ok(response.json().await?)
}

async fn unwrap_graph<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body: GraphResponse<T> = decode(response).await?;
    body.data
        .ok_or_else(|| ApiError::Malformed("response payload carries no data field".to_string()))
}

trait ResultExt {
    fn log_error(self, call: &'static str) -> Self;
}

impl<T> ResultExt for Result<T, ApiError> {
    fn log_error(self, call: &'static str) -> Self {
        if let Err(error) = &self {
            log::error!("API Error: {call} {error:?}");
        }
        self
    }
}

#[allow(unused)]
#[cfg(debug_assertions)]
pub mod mock {
    use super::*;

    pub fn make_reader() -> Reader {
        Reader {
            id: "reader-1".to_string(),
            name: "Alex".to_string(),
            email: Some("alex@example.com".to_string()),
            username: Some("alex".to_string()),
            photos: vec![],
            am_i_following: None,
            interests: None,
        }
    }

    pub fn make_book() -> Book {
        Book {
            id: "book-1".to_string(),
            title: "The Dispossessed".to_string(),
            isbn: None,
            tags: vec!["sf".to_string()],
            authors: vec![Author {
                id: "author-1".to_string(),
                name: "Ursula K. Le Guin".to_string(),
                bio: None,
            }],
            small_cover_url: Some("https://covers.example.com/s/1.jpg".to_string()),
            medium_cover_url: Some("https://covers.example.com/m/1.jpg".to_string()),
        }
    }

    pub fn make_book_instance(id: &str, lat: f64, lng: f64) -> BookInstance {
        BookInstance {
            id: id.to_string(),
            medium: Medium::Physical,
            reader: make_reader(),
            book: make_book(),
            location: Coordinate::new(lat, lng),
        }
    }

    pub fn make_interest(id: &str, location: Option<Coordinate>) -> UserInterest {
        UserInterest {
            id: id.to_string(),
            title: "A Wizard of Earthsea".to_string(),
            reference: Some("isbn:9780547773742".to_string()),
            kind: Some("book".to_string()),
            thumbnail: None,
            inserted_at: None,
            user: None,
            creators: Some(Connection {
                edges: vec![Edge {
                    node: Author {
                        id: "author-1".to_string(),
                        name: "Ursula K. Le Guin".to_string(),
                        bio: None,
                    },
                    cursor: None,
                }],
                page_info: None,
            }),
            location,
        }
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
