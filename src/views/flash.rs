use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use url::form_urlencoded;

/// Cookie holding messages queued for the next rendered page
pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashMessage {
    pub category: String,
    pub message: String,
}

impl FlashMessage {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self { category: category.into(), message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("success", message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new("danger", message)
    }
}

/// Messages stored by an earlier response, oldest first
pub fn pending(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

pub fn encode(messages: &[FlashMessage]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for flash in messages {
        serializer.append_pair(&flash.category, &flash.message);
    }
    serializer.finish()
}

pub fn decode(value: &str) -> Vec<FlashMessage> {
    form_urlencoded::parse(value.as_bytes())
        .map(|(category, message)| FlashMessage::new(category, message))
        .collect()
}

/// Queue `messages` for the next page, or drop the cookie when none remain
pub(crate) fn store(jar: CookieJar, messages: &[FlashMessage]) -> CookieJar {
    if messages.is_empty() {
        return clear(jar);
    }

    let cookie = Cookie::build((FLASH_COOKIE, encode(messages)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

pub(crate) fn clear(jar: CookieJar) -> CookieJar {
    if jar.get(FLASH_COOKIE).is_none() {
        return jar;
    }
    jar.remove(Cookie::build(FLASH_COOKIE).path("/"))
}
