//! Lazy, bounded pagination over a `RemoteStoreClient`

use std::collections::VecDeque;

use super::traits::{Page, RemoteStoreClient, StoreResult};
use crate::types::Parameter;

/// Items requested per page
pub const PAGE_SIZE: usize = 10;

/// Pages fetched at most per listing; anything beyond is silently dropped
pub const MAX_PAGES: usize = 50;

type PageFetch<'a, T> = Box<dyn FnMut(Option<&str>) -> StoreResult<Page<T>> + 'a>;

/// Iterator over the items of a paginated listing
///
/// Pages are fetched one at a time, only when the previous page has been
/// drained. Iteration stops after the last page, after `max_pages` pages, or
/// after the first failed fetch, whose error is yielded once.
pub struct Pages<'a, T> {
    fetch: PageFetch<'a, T>,
    buffer: VecDeque<T>,
    next_token: Option<String>,
    pages_fetched: usize,
    max_pages: usize,
    finished: bool,
}

impl<'a, T> Pages<'a, T> {
    /// Paginate with a custom page fetcher and page cap
    pub fn new<F>(max_pages: usize, fetch: F) -> Self
    where
        F: FnMut(Option<&str>) -> StoreResult<Page<T>> + 'a,
    {
        Self {
            fetch: Box::new(fetch),
            buffer: VecDeque::new(),
            next_token: None,
            pages_fetched: 0,
            max_pages,
            finished: false,
        }
    }

    /// Number of pages requested so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl<T> Iterator for Pages<'_, T> {
    type Item = StoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.finished || self.pages_fetched >= self.max_pages {
                self.finished = true;
                return None;
            }

            match (self.fetch)(self.next_token.as_deref()) {
                Ok(page) => {
                    self.pages_fetched += 1;
                    self.finished = page.next_token.is_none();
                    self.next_token = page.next_token;
                    self.buffer.extend(page.items);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T> std::fmt::Debug for Pages<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pages")
            .field("buffered", &self.buffer.len())
            .field("pages_fetched", &self.pages_fetched)
            .field("max_pages", &self.max_pages)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Secret names matching `path_filter`, at most `MAX_PAGES` pages of `PAGE_SIZE`
pub fn list_secret_names<'a>(
    client: &'a dyn RemoteStoreClient,
    path_filter: &'a str,
) -> Pages<'a, String> {
    Pages::new(MAX_PAGES, move |token: Option<&str>| {
        client.list_secret_names_page(path_filter, PAGE_SIZE, token)
    })
}

/// Decrypted parameters under `path_prefix`, at most `MAX_PAGES` pages of `PAGE_SIZE`
pub fn list_parameters<'a>(
    client: &'a dyn RemoteStoreClient,
    path_prefix: &'a str,
    recursive: bool,
) -> Pages<'a, Parameter> {
    Pages::new(MAX_PAGES, move |token: Option<&str>| {
        client.list_parameters_page(path_prefix, recursive, PAGE_SIZE, token)
    })
}
