//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::source::{Item, ItemsPage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned pages keyed by the requested cursor
struct FixtureSource {
    pages: HashMap<Option<String>, Result<ItemsPage>>,
    requests: Mutex<Vec<(String, u32, Option<String>)>>,
}

impl FixtureSource {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn page(mut self, cursor: Option<&str>, ids: &[&str], next: Option<&str>) -> Self {
        let items = ids.iter().map(|id| Item::new(*id, format!("Item {id}"))).collect();
        self.pages.insert(
            cursor.map(str::to_string),
            Ok(ItemsPage::new(items, next.map(str::to_string))),
        );
        self
    }

    fn failing(mut self, cursor: Option<&str>, error: Error) -> Self {
        self.pages.insert(cursor.map(str::to_string), Err(error));
        self
    }

    fn requested_cursors(&self) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, c)| c.clone())
            .collect()
    }
}

#[async_trait]
impl PageSource for FixtureSource {
    async fn fetch_page(
        &self,
        board_id: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<ItemsPage> {
        self.requests.lock().unwrap().push((
            board_id.to_string(),
            limit,
            cursor.map(str::to_string),
        ));
        match self.pages.get(&cursor.map(str::to_string)) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(e)) => Err(Error::upstream(e.to_string())),
            None => Err(Error::upstream(format!("unexpected cursor {cursor:?}"))),
        }
    }
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state = PaginationState::new();
    assert_eq!(state.page, 0);
    assert!(state.cursor.is_none());
    assert_eq!(state.total_fetched, 0);
    assert!(!state.done);
}

#[test]
fn test_pagination_state_advance() {
    let mut state = PaginationState::new();

    state.advance(10, Some("abc".to_string()));
    assert_eq!(state.page, 1);
    assert_eq!(state.total_fetched, 10);
    assert_eq!(state.cursor.as_deref(), Some("abc"));
    assert!(!state.done);

    state.advance(3, None);
    assert_eq!(state.page, 2);
    assert_eq!(state.total_fetched, 13);
    assert!(state.cursor.is_none());
    assert!(state.done);
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[tokio::test]
async fn test_three_pages_returned_in_order_exactly_once() {
    let source = FixtureSource::new()
        .page(None, &["1", "2"], Some("B"))
        .page(Some("B"), &["3", "4"], Some("C"))
        .page(Some("C"), &["5"], None);

    let extraction = CursorPaginator::new(2)
        .fetch_all(&source, "9718729717")
        .await
        .unwrap();

    let ids: Vec<_> = extraction
        .items
        .iter()
        .map(|i| i.id.clone().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(extraction.pages(), 3);
    assert_eq!(extraction.state.total_fetched, 5);
    assert!(extraction.state.done);
    assert_eq!(extraction.board_id, "9718729717");

    assert_eq!(
        source.requested_cursors(),
        vec![None, Some("B".to_string()), Some("C".to_string())]
    );
}

#[tokio::test]
async fn test_page_limit_and_board_are_forwarded() {
    let source = FixtureSource::new().page(None, &["1"], None);

    CursorPaginator::new(25).fetch_all(&source, "42").await.unwrap();

    let requests = source.requests.lock().unwrap().clone();
    assert_eq!(requests, vec![("42".to_string(), 25, None)]);
}

#[tokio::test]
async fn test_single_empty_page() {
    let source = FixtureSource::new().page(None, &[], None);

    let extraction = CursorPaginator::default()
        .fetch_all(&source, "1")
        .await
        .unwrap();

    assert!(extraction.items.is_empty());
    assert_eq!(extraction.pages(), 1);
}

#[tokio::test]
async fn test_empty_page_with_cursor_keeps_going() {
    let source = FixtureSource::new()
        .page(None, &[], Some("next"))
        .page(Some("next"), &["7"], None);

    let extraction = CursorPaginator::default()
        .fetch_all(&source, "1")
        .await
        .unwrap();

    assert_eq!(extraction.items.len(), 1);
    assert_eq!(extraction.pages(), 2);
}

#[tokio::test]
async fn test_failure_mid_extraction_returns_no_items() {
    let source = FixtureSource::new()
        .page(None, &["1", "2"], Some("B"))
        .failing(Some("B"), Error::upstream("complexity budget exhausted"));

    let err = CursorPaginator::default()
        .fetch_all(&source, "1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream { .. }));
    assert!(err.to_string().contains("complexity budget exhausted"));
}
