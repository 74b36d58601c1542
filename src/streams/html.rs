use scraper::{ElementRef, Selector};

use crate::app::{Result, TapError};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| TapError::malformed(format!("invalid selector `{}`: {}", css, e)))
}

/// Concatenated text of the element and its descendants, trimmed
pub(crate) fn text_content(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn href<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    element.value().attr("href")
}
