use url::form_urlencoded;

use crate::database::models::User;
use crate::error::ApiError;
use crate::views::response::ViewResponse;

/// Parsed `application/x-www-form-urlencoded` body. Keeps every pair in
/// submission order so repeated fields (multi-selects) are not lost.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(body: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    /// First value submitted for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 400 when the field was not submitted
    pub fn require(&self, name: &str) -> Result<&str, ApiError> {
        self.get(name)
            .ok_or_else(|| ApiError::bad_request(format!("Missing form field: {}", name)))
    }

    /// Missing fields read as empty
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Browsers submit `on` for a ticked checkbox and nothing otherwise
    pub fn checkbox(&self, name: &str) -> bool {
        self.get(name) == Some("on")
    }

    /// Values of a repeated field that parse as ids; anything else is skipped
    pub fn ids(&self, name: &str) -> Vec<i64> {
        self.get_all(name)
            .into_iter()
            .filter_map(|value| value.trim().parse().ok())
            .collect()
    }
}

/// Sign-in and registration pages send a signed-in visitor home
pub fn redirect_if_signed_in(user: Option<&User>) -> Option<ViewResponse> {
    user.map(|_| ViewResponse::redirect("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_fields_keep_order() {
        let form = FormData::parse(b"name=Party+Night&games=3&games=x&games=1&highlight=on");
        assert_eq!(form.get("name"), Some("Party Night"));
        assert_eq!(form.get_all("games"), vec!["3", "x", "1"]);
        assert_eq!(form.ids("games"), vec![3, 1]);
        assert!(form.checkbox("highlight"));
        assert!(!form.checkbox("missing"));
        assert_eq!(form.get_or_empty("description"), "");
        assert!(form.require("description").is_err());
    }
}
