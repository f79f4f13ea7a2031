mod articles;
mod auth;
mod health_check;
mod says;
mod tags;

pub use articles::{add_article, delete_article, get_article, list_articles, update_article};
pub use auth::{check_password, login, update_user};
pub use health_check::{health_check, index};
pub use says::{add_say, delete_say, list_says, update_say};
pub use tags::{add_tag, delete_tag, list_tags, update_tag};

use serde::Serialize;

/// Success body shared by every handler: `{"msg": "ok", "data": ...}`
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub msg: &'static str,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { msg: "ok", data }
    }
}
