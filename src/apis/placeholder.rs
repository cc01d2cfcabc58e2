use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use super::build_url;
use crate::{
    json::{decode, missing_fields},
    transport::Transport,
    FetchError, RequestExecutor, Result,
};

const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Fields a user record must carry to be displayed.
const REQUIRED_USER_FIELDS: &[&str] = &["name", "email", "phone"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: u64,
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

/// Client for the JSONPlaceholder fake REST API.
#[derive(Debug)]
pub struct Placeholder<'a, T> {
    executor: &'a RequestExecutor<T>,
    base_url: String,
}

impl<'a, T: Transport> Placeholder<'a, T> {
    pub fn new(executor: &'a RequestExecutor<T>) -> Self {
        Self {
            executor,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn post(&self, id: u64) -> Result<Post> {
        self.fetch(&format!("posts/{id}"), &[]).await
    }

    /// Creates a post. JSONPlaceholder echoes the payload back with a new id
    /// and does not persist it.
    pub async fn create_post(&self, title: &str, body: &str, user_id: u64) -> Result<Post> {
        if title.trim().is_empty() {
            return Err(FetchError::Validation("post title is empty".to_owned()));
        }
        if body.trim().is_empty() {
            return Err(FetchError::Validation("post body is empty".to_owned()));
        }
        let url = build_url(&self.base_url, "posts", &[])?;
        let payload = json!({
            "title": title,
            "body": body,
            "userId": user_id,
        });
        let value = self.executor.post_json(&url, &payload).await.into_result()?;
        decode(value)
    }

    pub async fn posts_by_user(&self, user_id: u64) -> Result<Vec<Post>> {
        self.fetch("posts", &[("userId", user_id.to_string())]).await
    }

    pub async fn post_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        self.fetch(&format!("posts/{post_id}/comments"), &[]).await
    }

    /// Fetches one user, rejecting records without name, email or phone.
    pub async fn user(&self, id: u64) -> Result<User> {
        let url = build_url(&self.base_url, &format!("users/{id}"), &[])?;
        let value = self.executor.get(&url).await.into_result()?;

        let missing = missing_fields(&value, REQUIRED_USER_FIELDS);
        if !missing.is_empty() {
            return Err(FetchError::Validation(format!(
                "user {id} is missing fields: {}",
                missing.join(", ")
            )));
        }
        decode(value)
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.fetch("users", &[]).await
    }

    /// Lists todos, optionally filtered by owner and completion status.
    pub async fn todos(&self, user_id: Option<u64>, completed: Option<bool>) -> Result<Vec<Todo>> {
        let mut params = Vec::new();
        if let Some(user_id) = user_id {
            params.push(("userId", user_id.to_string()));
        }
        if let Some(completed) = completed {
            params.push(("completed", completed.to_string()));
        }
        self.fetch("todos", &params).await
    }

    async fn fetch<D>(&self, path: &str, params: &[(&str, String)]) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let url = build_url(&self.base_url, path, params)?;
        self.executor.get_json(&url).await
    }
}
