//! Markup lookups for the site's HTML forms.
//!
//! Every selector the protocol depends on lives in this file. When the site
//! changes its layout this is the only place that needs to follow. A lookup
//! that finds nothing is reported as [`ProtocolError::Scrape`] naming the page
//! and the field.

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::debug;

use super::types::{EditSelections, Rating, SubmissionInfo};
use super::ProtocolError;

/// Form on the submission creation pages.
const SUBMIT_FORM: &str = "form#myform";
/// Form on a submission's edit page.
const EDIT_FORM: &str = "form[name=MsgForm]";
/// Element holding the site's error text on a failed form post.
const ERROR_MESSAGE: &str = ".redirect-message";
const NOTIFICATION_LINK: &str = "a.notification-container";

/// A parsed page with fallible lookups.
pub(crate) struct FormPage {
    page: &'static str,
    html: Html,
}

impl FormPage {
    pub fn parse(page: &'static str, body: &str) -> Self {
        Self {
            page,
            html: Html::parse_document(body),
        }
    }

    fn selector(&self, css: &str) -> Result<Selector, ProtocolError> {
        Selector::parse(css).map_err(|_| ProtocolError::scrape(self.page, css))
    }

    fn all(&self, css: &str) -> Result<Vec<ElementRef<'_>>, ProtocolError> {
        let selector = self.selector(css)?;
        Ok(self.html.select(&selector).collect())
    }

    fn first(&self, css: &str) -> Result<Option<ElementRef<'_>>, ProtocolError> {
        let selector = self.selector(css)?;
        Ok(self.html.select(&selector).next())
    }

    /// `value` attribute of the named input inside `form`.
    pub fn input_value(&self, form: &str, name: &str) -> Result<String, ProtocolError> {
        let css = format!(r#"{} input[name="{}"]"#, form, name);
        self.first(&css)?
            .and_then(|el| el.value().attr("value"))
            .map(str::to_string)
            .ok_or_else(|| ProtocolError::scrape(self.page, format!("input {}", name)))
    }

    /// `value` attribute of the checked input named `name`.
    pub fn checked_value(&self, form: &str, name: &str) -> Result<String, ProtocolError> {
        self.checked_values(form, name)?
            .into_iter()
            .next()
            .ok_or_else(|| ProtocolError::scrape(self.page, format!("checked input {}", name)))
    }

    /// `value` attributes of every checked input named `name`. May be empty.
    pub fn checked_values(&self, form: &str, name: &str) -> Result<Vec<String>, ProtocolError> {
        let css = format!(r#"{} input[name="{}"][checked]"#, form, name);
        Ok(self
            .all(&css)?
            .into_iter()
            .filter_map(|el| el.value().attr("value").map(str::to_string))
            .collect())
    }

    /// Whether an input named `name` carries the `checked` attribute.
    pub fn is_checked(&self, form: &str, name: &str) -> Result<bool, ProtocolError> {
        let css = format!(r#"{} input[name="{}"][checked]"#, form, name);
        Ok(self.first(&css)?.is_some())
    }

    /// `value` of the selected option of the named select.
    pub fn selected_option(&self, form: &str, name: &str) -> Result<String, ProtocolError> {
        let css = format!(r#"{} select[name="{}"] option[selected]"#, form, name);
        self.first(&css)?
            .and_then(|el| el.value().attr("value"))
            .map(str::to_string)
            .ok_or_else(|| ProtocolError::scrape(self.page, format!("selected option of {}", name)))
    }

    /// Text content of the named textarea.
    pub fn textarea(&self, form: &str, name: &str) -> Result<String, ProtocolError> {
        let css = format!(r#"{} textarea[name="{}"]"#, form, name);
        self.first(&css)?
            .map(|el| el.text().collect::<String>())
            .ok_or_else(|| ProtocolError::scrape(self.page, format!("textarea {}", name)))
    }

    /// Text content of the first element matching `css`.
    pub fn text(&self, css: &str) -> Result<String, ProtocolError> {
        self.first(css)?
            .map(|el| el.text().collect::<String>())
            .ok_or_else(|| ProtocolError::scrape(self.page, css))
    }

    /// Attribute values of every element matching `css`.
    pub fn attrs(&self, css: &str, attr: &str) -> Result<Vec<String>, ProtocolError> {
        Ok(self
            .all(css)?
            .into_iter()
            .filter_map(|el| el.value().attr(attr).map(str::to_string))
            .collect())
    }
}

/// Upload limit and one-time key from `/submit/`.
pub(crate) fn parse_submit_form(body: &str) -> Result<(u64, String), ProtocolError> {
    let page = FormPage::parse("submission form", body);
    let max_size = page.input_value(SUBMIT_FORM, "MAX_FILE_SIZE")?;
    let max_size = max_size
        .trim()
        .parse::<u64>()
        .map_err(|_| ProtocolError::scrape("submission form", "numeric MAX_FILE_SIZE"))?;
    let key = page.input_value(SUBMIT_FORM, "key")?;
    Ok((max_size, key))
}

/// One-time key from the finalize page.
pub(crate) fn parse_finalize_key(body: &str) -> Result<String, ProtocolError> {
    FormPage::parse("finalize form", body).input_value(SUBMIT_FORM, "key")
}

/// Key and selections the edit form expects back unchanged.
pub(crate) fn parse_edit_selections(body: &str) -> Result<EditSelections, ProtocolError> {
    let page = FormPage::parse("edit page", body);
    Ok(EditSelections {
        key: page.input_value(EDIT_FORM, "key")?,
        cat: page.selected_option(EDIT_FORM, "cat")?,
        atype: page.selected_option(EDIT_FORM, "atype")?,
        species: page.selected_option(EDIT_FORM, "species")?,
        gender: page.selected_option(EDIT_FORM, "gender")?,
        folder_ids: page.checked_values(EDIT_FORM, "folder_ids[]")?,
    })
}

/// Current submission metadata from the edit page.
pub(crate) fn parse_submission_info(body: &str) -> Result<SubmissionInfo, ProtocolError> {
    let page = FormPage::parse("edit page", body);

    let rating_code = page.checked_value(EDIT_FORM, "rating")?;
    let rating = rating_code
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(Rating::from_code)
        .ok_or_else(|| {
            ProtocolError::scrape("edit page", format!("known rating code (got {:?})", rating_code))
        })?;

    Ok(SubmissionInfo {
        title: page.input_value(EDIT_FORM, "title")?,
        description: page.textarea(EDIT_FORM, "message")?,
        keywords: page.textarea(EDIT_FORM, "keywords")?,
        rating,
        lock_comments: page.is_checked(EDIT_FORM, "lock_comments")?,
        scrap: page.is_checked(EDIT_FORM, "scrap")?,
        cat: page.selected_option(EDIT_FORM, "cat")?,
        atype: page.selected_option(EDIT_FORM, "atype")?,
        species: page.selected_option(EDIT_FORM, "species")?,
        gender: page.selected_option(EDIT_FORM, "gender")?,
        folder_ids: page.checked_values(EDIT_FORM, "folder_ids[]")?,
    })
}

/// The site's own explanation on a failed form post, exactly as rendered.
pub(crate) fn parse_error_message(body: &str) -> Result<String, ProtocolError> {
    FormPage::parse("error page", body).text(ERROR_MESSAGE)
}

/// Notification counters from the front page, keyed by kind.
pub(crate) fn parse_notifications(body: &str) -> Result<BTreeMap<String, u64>, ProtocolError> {
    let page = FormPage::parse("front page", body);
    let mut titles = page.attrs(NOTIFICATION_LINK, "title")?;
    titles.dedup();

    let mut counters = BTreeMap::new();
    for title in titles {
        let mut words = title.split_whitespace();
        let (Some(count), Some(kind)) = (words.next(), words.next()) else {
            debug!("Ignoring notification title {:?}", title);
            continue;
        };
        let Ok(count) = count.replace(',', "").parse::<u64>() else {
            debug!("Ignoring notification title {:?}", title);
            continue;
        };
        match notification_kind(kind) {
            Some(kind) => {
                counters.insert(kind.to_string(), count);
            }
            None => debug!("Unknown notification kind {:?}", kind),
        }
    }

    Ok(counters)
}

fn notification_kind(kind: &str) -> Option<&'static str> {
    let kind = kind.trim().to_lowercase();
    let singular = kind.strip_suffix('s').unwrap_or(&kind);
    match singular {
        "submission" => Some("submissions"),
        "watch" | "watche" => Some("watches"),
        "comment" => Some("comments"),
        "favorite" | "favourite" => Some("favourites"),
        "journal" => Some("journals"),
        "unread" | "note" => Some("notes"),
        "troubleticket" => Some("trouble_tickets"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMIT_PAGE: &str = r#"<html><body>
        <form id="myform" action="/submit/upload/" method="post">
          <input type="hidden" name="MAX_FILE_SIZE" value="10485760">
          <input type="hidden" name="key" value="abc123">
        </form></body></html>"#;

    const EDIT_PAGE: &str = r#"<html><body>
        <form name="MsgForm" method="post">
          <input type="hidden" name="key" value="edit-key">
          <input type="text" name="title" value="My Title">
          <textarea name="message">Line one
Line two</textarea>
          <textarea name="keywords">cat dog</textarea>
          <input type="radio" name="rating" value="0">
          <input type="radio" name="rating" value="2" checked>
          <input type="radio" name="rating" value="1">
          <input type="checkbox" name="lock_comments" value="1">
          <input type="checkbox" name="scrap" value="1" checked>
          <select name="cat"><option value="1">A</option><option value="2" selected>B</option></select>
          <select name="atype"><option value="1" selected>All</option></select>
          <select name="species"><option value="1" selected>Any</option></select>
          <select name="gender"><option value="0" selected>Any</option></select>
          <input type="checkbox" name="folder_ids[]" value="11" checked>
          <input type="checkbox" name="folder_ids[]" value="12">
          <input type="checkbox" name="folder_ids[]" value="13" checked>
        </form></body></html>"#;

    #[test]
    fn test_parse_submit_form() {
        let (max, key) = parse_submit_form(SUBMIT_PAGE).unwrap();
        assert_eq!(max, 10_485_760);
        assert_eq!(key, "abc123");
    }

    #[test]
    fn test_parse_submit_form_missing_key() {
        let body = r#"<form id="myform"><input name="MAX_FILE_SIZE" value="10"></form>"#;
        let err = parse_submit_form(body).unwrap_err();
        match err {
            ProtocolError::Scrape { page, field } => {
                assert_eq!(page, "submission form");
                assert!(field.contains("key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_submit_form_non_numeric_limit() {
        let body = r#"<form id="myform"><input name="MAX_FILE_SIZE" value="big"><input name="key" value="k"></form>"#;
        assert!(matches!(
            parse_submit_form(body).unwrap_err(),
            ProtocolError::Scrape { .. }
        ));
    }

    #[test]
    fn test_parse_submission_info() {
        let info = parse_submission_info(EDIT_PAGE).unwrap();
        assert_eq!(info.title, "My Title");
        assert_eq!(info.description, "Line one\nLine two");
        assert_eq!(info.keywords, "cat dog");
        assert_eq!(info.rating, Rating::Mature);
        assert!(!info.lock_comments);
        assert!(info.scrap);
        assert_eq!(info.cat, "2");
        assert_eq!(info.gender, "0");
        assert_eq!(info.folder_ids, vec!["11", "13"]);
    }

    #[test]
    fn test_parse_edit_selections() {
        let selections = parse_edit_selections(EDIT_PAGE).unwrap();
        assert_eq!(selections.key, "edit-key");
        assert_eq!(selections.cat, "2");
        assert_eq!(selections.atype, "1");
        assert_eq!(selections.species, "1");
        assert_eq!(selections.folder_ids, vec!["11", "13"]);
    }

    #[test]
    fn test_parse_submission_info_unknown_rating() {
        let body = EDIT_PAGE.replace(r#"value="2" checked"#, r#"value="7" checked"#);
        assert!(matches!(
            parse_submission_info(&body).unwrap_err(),
            ProtocolError::Scrape { .. }
        ));
    }

    #[test]
    fn test_parse_error_message() {
        let body = r#"<div class="redirect-message">Submission title is too short.</div>"#;
        assert_eq!(
            parse_error_message(body).unwrap(),
            "Submission title is too short."
        );
        let padded = "<div class=\"redirect-message\">\n  Too short. \n</div>";
        assert_eq!(parse_error_message(padded).unwrap(), "\n  Too short. \n");
        assert!(parse_error_message("<p>nothing</p>").is_err());
    }

    #[test]
    fn test_parse_notifications() {
        let body = r#"
            <a class="notification-container" title="1,234 Submission Notifications" href="/msg/submissions/">1234S</a>
            <a class="notification-container" title="1,234 Submission Notifications" href="/msg/submissions/">1234S</a>
            <a class="notification-container" title="3 Comment Notifications" href="/msg/others/">3C</a>
            <a class="notification-container" title="2 Unread Notes" href="/msg/pms/">2N</a>
            <a class="notification-container" title="5 Mystery Things" href="/">5M</a>"#;
        let counters = parse_notifications(body).unwrap();
        assert_eq!(counters.get("submissions"), Some(&1234));
        assert_eq!(counters.get("comments"), Some(&3));
        assert_eq!(counters.get("notes"), Some(&2));
        assert_eq!(counters.len(), 3);
    }
}
